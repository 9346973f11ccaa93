use serde::{Deserialize, Serialize};

use crate::error::{MartingaleError, Result};

/// Default number of simulated paths.
pub const DEFAULT_N_PATHS: usize = 1000;
/// Default number of time steps per path.
pub const DEFAULT_N_STEPS: usize = 20;
/// Default tolerance for the unconditional martingale check.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Parameters of a single simulation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of independent paths.
    pub n_paths: usize,
    /// Number of time steps per path.
    pub n_steps: usize,
    /// Optional seed for reproducible runs.
    pub seed: Option<u64>,
    /// Tolerance passed to the martingale check.
    pub tolerance: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_paths: DEFAULT_N_PATHS,
            n_steps: DEFAULT_N_STEPS,
            seed: None,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration with the given shape.
    #[must_use]
    pub fn new(n_paths: usize, n_steps: usize) -> Self {
        Self {
            n_paths,
            n_steps,
            ..Default::default()
        }
    }

    /// Sets a seed for reproducible simulations.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the martingale check tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Checks that the shape is positive and the tolerance usable.
    ///
    /// # Errors
    ///
    /// Returns `MartingaleError::Config` describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.n_paths == 0 {
            return Err(MartingaleError::Config("n_paths must be positive".into()));
        }
        if self.n_steps == 0 {
            return Err(MartingaleError::Config("n_steps must be positive".into()));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(MartingaleError::Config(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_library_defaults() {
        let config = SimulationConfig::default();

        assert_eq!(config.n_paths, 1000);
        assert_eq!(config.n_steps, 20);
        assert!(config.seed.is_none());
        assert!((config.tolerance - 1e-6).abs() < f64::EPSILON);
    }

    #[test]
    fn builders_set_fields() {
        let config = SimulationConfig::new(50, 8)
            .with_seed(7)
            .with_tolerance(0.01);

        assert_eq!(config.n_paths, 50);
        assert_eq!(config.n_steps, 8);
        assert_eq!(config.seed, Some(7));
        assert!((config.tolerance - 0.01).abs() < f64::EPSILON);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_shape() {
        assert!(SimulationConfig::new(0, 5).validate().is_err());
        assert!(SimulationConfig::new(5, 0).validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_tolerance() {
        let negative = SimulationConfig::default().with_tolerance(-1.0);
        let nan = SimulationConfig::default().with_tolerance(f64::NAN);

        assert!(matches!(negative.validate(), Err(MartingaleError::Config(_))));
        assert!(matches!(nan.validate(), Err(MartingaleError::Config(_))));
    }

    #[test]
    fn serde_round_trip_keeps_seed() {
        let config = SimulationConfig::new(10, 4).with_seed(99);
        let json = serde_json::to_string(&config).unwrap();
        let back: SimulationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
