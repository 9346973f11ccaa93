//! Optional loading of [`SimulationConfig`] from a TOML file and the
//! environment.
//!
//! Nothing in the analysis functions calls this loader; they take their
//! parameters as arguments. Binaries and tests that want file or env driven
//! parameters call [`ConfigLoader::load`] themselves.

use std::path::Path;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::config::SimulationConfig;

/// Prefix for environment overrides, e.g. `MARTINGALE_N_PATHS=5000`.
pub const ENV_PREFIX: &str = "MARTINGALE_";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads simulation parameters by merging defaults, a TOML file and
    /// `MARTINGALE_`-prefixed environment variables, in that order.
    ///
    /// A missing TOML file is not an error; its layer is simply empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a layer cannot be parsed or the merged
    /// configuration fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<SimulationConfig> {
        let path = path.as_ref();
        let config: SimulationConfig = Figment::from(Serialized::defaults(
            SimulationConfig::default(),
        ))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .with_context(|| format!("failed to load simulation config from {}", path.display()))?;

        config.validate()?;
        tracing::debug!(
            n_paths = config.n_paths,
            n_steps = config.n_steps,
            seed = ?config.seed,
            "loaded simulation config"
        );

        Ok(config)
    }
}
