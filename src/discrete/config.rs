// src/discrete/config.rs

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Scoring weights used by `find_best_placement`'s candidate scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscreteWeights {
    pub compactness: f64,
    pub adjacency: f64,
    /// Reserved: not yet consumed by any scoring term.
    pub corridor: f64,
}

impl Default for DiscreteWeights {
    fn default() -> Self {
        Self {
            compactness: 2.0,
            adjacency: 3.0,
            corridor: 0.5,
        }
    }
}

/// Tunables for the discrete topological solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscreteConfig {
    /// Meters per grid cell.
    pub grid_resolution: f64,
    /// Outer snapshot/mutate/evaluate rounds.
    pub max_iterations: u32,
    /// Fraction of placed rooms removed per refinement round.
    pub mutation_rate: f64,
    /// Seed of the corridor network, in world coordinates. `None` defaults
    /// to the grid's center cell.
    pub start_point: Option<Vec2>,
    pub weights: DiscreteWeights,
}

impl Default for DiscreteConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 1.0,
            max_iterations: 500,
            mutation_rate: 0.3,
            start_point: None,
            weights: DiscreteWeights::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let mut config = DiscreteConfig::default();
        config.start_point = Some(Vec2::new(3.0, 4.0));
        let json = serde_json::to_string(&config).unwrap();
        let back: DiscreteConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults_in_weights() {
        let json = r#"{"compactness": 5.0, "adjacency": 3.0, "corridor": 0.5}"#;
        let weights: DiscreteWeights = serde_json::from_str(json).unwrap();
        assert_eq!(weights.compactness, 5.0);
    }
}
