// src/continuous/config.rs

use serde::{Deserialize, Serialize};

/// Tunables for the continuous geometric refiner (gene collection +
/// per-gene physics). All fractions are in `[0, 1]` unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub population_size: usize,

    pub mutation_rate: f64,
    /// World-unit translation jitter; per-axis draws are `+/- strength/2`.
    pub mutation_strength: f64,
    pub crossover_rate: f64,
    /// Fraction of the (sorted) population culled and refilled each generation.
    pub selection_pressure: f64,
    /// Fraction of the sorted population eligible as crossover parents.
    pub parent_pool_fraction: f64,

    /// 0 = pure topology, 1 = pure geometry.
    pub fitness_balance: f64,
    pub use_quadratic_penalty: bool,

    pub aspect_ratio_mutation_rate: f64,

    pub use_partner_bias: bool,
    pub partner_bias_rate: f64,

    pub use_swap_mutation: bool,
    pub swap_mutation_rate: f64,

    pub use_aggressive_inflation: bool,
    pub inflation_rate: f64,
    pub inflation_threshold: f64,

    pub use_adjacency_attraction: bool,
    pub adjacency_attraction_strength: f64,

    /// Extra physics ticks applied to newborns before next evaluation;
    /// clamped to <=5 regardless of the configured value.
    pub warm_up_iterations: u32,

    pub use_fresh_blood: bool,
    pub fresh_blood_interval: u32,
    pub fresh_blood_warm_up: u32,

    pub use_non_linear_overlap_penalty: bool,
    pub overlap_penalty_exponent: f64,
}

impl SpringConfig {
    pub fn clamped_warm_up_iterations(&self) -> u32 {
        self.warm_up_iterations.min(5)
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            population_size: 30,
            mutation_rate: 0.3,
            mutation_strength: 2.0,
            crossover_rate: 0.5,
            selection_pressure: 0.2,
            parent_pool_fraction: 0.5,
            fitness_balance: 0.5,
            use_quadratic_penalty: true,
            aspect_ratio_mutation_rate: 0.1,
            use_partner_bias: true,
            partner_bias_rate: 0.2,
            use_swap_mutation: true,
            swap_mutation_rate: 0.05,
            use_aggressive_inflation: false,
            inflation_rate: 1.05,
            inflation_threshold: 0.9,
            use_adjacency_attraction: true,
            adjacency_attraction_strength: 0.15,
            warm_up_iterations: 3,
            use_fresh_blood: true,
            fresh_blood_interval: 20,
            fresh_blood_warm_up: 5,
            use_non_linear_overlap_penalty: false,
            overlap_penalty_exponent: 1.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let config = SpringConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: SpringConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{"population_size": 40}"#;
        let config: SpringConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.population_size, 40);
        assert_eq!(config.mutation_rate, SpringConfig::default().mutation_rate);
    }
}
