// src/room.rs
//! Caller-supplied room and adjacency requests, shared by both solvers.

use serde::{Deserialize, Serialize};

/// The footprint a placed room claims beyond its core rectangle, on the
/// discrete grid. Unused by the continuous refiner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorridorRule {
    None,
    OneSide,
    TwoSides,
    AllSides,
}

impl Default for CorridorRule {
    fn default() -> Self {
        CorridorRule::None
    }
}

/// One room the caller wants placed: a unique id, a target area, and an
/// allowed aspect-ratio range `[1/target_ratio, target_ratio]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRequest {
    pub id: String,
    pub target_area: f64,
    pub target_ratio: f64,
    #[serde(default)]
    pub corridor_rule: CorridorRule,
}

impl RoomRequest {
    pub fn new(id: impl Into<String>, target_area: f64, target_ratio: f64) -> Self {
        Self {
            id: id.into(),
            target_area,
            target_ratio,
            corridor_rule: CorridorRule::None,
        }
    }

    pub fn with_corridor_rule(mut self, rule: CorridorRule) -> Self {
        self.corridor_rule = rule;
        self
    }

    /// The allowed width/height ratio interval `[1/target_ratio, target_ratio]`.
    pub fn ratio_bounds(&self) -> (f64, f64) {
        (1.0 / self.target_ratio, self.target_ratio)
    }
}

/// An unordered soft requirement that two rooms be adjacent, weighted.
/// The same pair may appear more than once; weights add.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjacency {
    pub a: String,
    pub b: String,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

impl Adjacency {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn touches(&self, id: &str) -> bool {
        self.a == id || self.b == id
    }

    pub fn other(&self, id: &str) -> Option<&str> {
        if self.a == id {
            Some(&self.b)
        } else if self.b == id {
            Some(&self.a)
        } else {
            None
        }
    }
}
