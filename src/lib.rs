// src/lib.rs
//! A deterministic procedural floor-plan generator.
//!
//! Given a polygonal site boundary, a set of room requests, and pairwise
//! room-adjacency requirements, this crate produces a concrete layout: every
//! room is an axis-aligned rectangle placed inside the boundary, rooms do
//! not overlap, requested adjacencies share wall segments, and a single
//! connected corridor network joins every room to a designated entrance.
//!
//! Two independent, composable solvers are provided:
//!
//! - [`discrete::DiscreteSolver`], an integer-grid, "magnetizing"
//!   greedy-plus-mutation placer that decides room topology and carries a
//!   corridor spanning tree from a start cell.
//! - [`continuous::GeneCollection`], a population-based evolutionary
//!   refiner that takes continuous-coordinate rectangles (optionally seeded
//!   from the discrete solver's output) and squishes, translates, mutates,
//!   and recombines them under polygon-overlap and boundary constraints.
//!
//! Both are single-threaded and synchronous: there are no suspension points
//! inside `solve()` or `iterate()`, and all behavior is in-process with no
//! file I/O.

pub mod continuous;
pub mod discrete;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod rng;
pub mod room;
pub mod solver;
pub mod validate;

pub use error::{FloorplanError, Result};
pub use rng::random_seed;
pub use room::{Adjacency, CorridorRule, RoomRequest};
pub use solver::FloorplanSolver;
