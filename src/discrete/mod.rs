// src/discrete/mod.rs
//! The discrete topological solver: an integer-grid, "magnetizing"
//! greedy-plus-mutation placer that decides room topology and carries a
//! single connected corridor spanning tree from a start cell.

mod config;
mod placed_room;
mod solver;

pub use config::{DiscreteConfig, DiscreteWeights};
pub use placed_room::PlacedRoom;
pub use solver::{DiscreteSolver, GridState};
