// src/error.rs
//! Construction-time validation failures shared by both solver facades.

use thiserror::Error;

/// Everything that can go wrong while validating caller-supplied input,
/// before any solver state is created. Nothing past construction is
/// fallible (see the crate-level error handling notes).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FloorplanError {
    #[error("boundary polygon must have at least 3 vertices, got {0}")]
    BoundaryTooSmall(usize),

    #[error("room `{id}` has non-positive target_area {target_area}")]
    NonPositiveArea { id: String, target_area: f64 },

    #[error("room `{id}` has target_ratio {target_ratio} < 1.0")]
    InvalidTargetRatio { id: String, target_ratio: f64 },

    #[error("duplicate room id `{0}`")]
    DuplicateRoomId(String),

    #[error("room requests must not have an empty id")]
    EmptyRoomId,

    #[error("adjacency references unknown room id `{0}`")]
    UnknownAdjacencyId(String),

    #[error("population_size must be >= 2, got {0}")]
    PopulationTooSmall(usize),
}

pub type Result<T> = std::result::Result<T, FloorplanError>;
