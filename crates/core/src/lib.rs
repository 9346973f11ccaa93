pub mod config;
pub mod config_loader;
pub mod error;
pub mod matrix;

pub use config::{SimulationConfig, DEFAULT_N_PATHS, DEFAULT_N_STEPS, DEFAULT_TOLERANCE};
pub use config_loader::ConfigLoader;
pub use error::{MartingaleError, Result};
pub use matrix::Matrix;

/// One ±1 coin toss per cell.
pub type TossMatrix = Matrix<i64>;
/// Running sums of a `TossMatrix` along the time axis.
pub type PartialSumMatrix = Matrix<i64>;
/// Integer width used for stakes and cumulative winnings.
pub type Stake = i128;
