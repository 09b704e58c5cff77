// src/rng.rs
//! A small, fully deterministic PRNG independent of the `rand` crate.
//!
//! Both solvers need byte-for-byte reproducible sequences across platforms
//! and (eventually) across reimplementations. The core never reaches for
//! `rand`'s default generator; its algorithm and constants are not part of
//! any stability contract. Mulberry32 is simple enough to pin down exactly:
//! 32-bit state, wrapping arithmetic, four fixed constants.

/// Mulberry32 PRNG. Two generators seeded identically produce identical
/// sequences, forever, regardless of host platform word size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Returns the next raw u32 in the sequence, advancing state.
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B79F5);
        let mut z = self.state;
        z = (z ^ (z >> 15)).wrapping_mul(z | 1);
        z ^= z.wrapping_add((z ^ (z >> 7)).wrapping_mul(z | 61));
        z ^ (z >> 14)
    }

    /// Uniform float in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u32() as f64) / (u32::MAX as f64 + 1.0)
    }

    /// Uniform float in [lo, hi).
    pub fn next_float(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Uniform integer in [lo, hi_excl). Returns `lo` if the range is empty.
    pub fn next_int(&mut self, lo: i64, hi_excl: i64) -> i64 {
        if hi_excl <= lo {
            return lo;
        }
        let span = (hi_excl - lo) as f64;
        lo + (self.next_f64() * span).floor() as i64
    }

    /// True with probability `p` (clamped to [0, 1]).
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p.clamp(0.0, 1.0)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        if slice.len() < 2 {
            return;
        }
        for i in (1..slice.len()).rev() {
            let j = self.next_int(0, i as i64 + 1) as usize;
            slice.swap(i, j);
        }
    }

    /// Picks a uniformly random index in `[0, len)`. Returns `None` if `len == 0`.
    pub fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.next_int(0, len as i64) as usize)
        }
    }
}

/// A clock-derived seed for hosts that don't care about reproducibility.
/// Solver constructors still take an explicit `u32` seed; this is a
/// convenience for callers who want "some seed" rather than a fixed one.
/// Never used internally: every test and example in this crate passes an
/// explicit seed so its results stay reproducible.
pub fn random_seed() -> u32 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(0x2545F491)
}
