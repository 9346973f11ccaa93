//! Simulation and analysis of ±1 coin-toss processes.
//!
//! - [`paths`]: toss generation and partial sums
//! - [`conditional`]: empirical conditional expectations grouped by history
//!   or by partial sum
//! - [`betting`]: the doubling strategy with stop-after-first-win
//! - [`martingale`]: unconditional mean-stability check and conditional drift

pub mod betting;
pub mod conditional;
pub mod martingale;
pub mod observation;
pub mod paths;

pub use betting::{
    run_betting_strategy, simulate_betting_strategy, simulate_betting_strategy_with_rng,
    BettingSimulation, BettingState, BettingSummary,
};
pub use conditional::{
    estimate_by_history, estimate_by_partial_sum, ConditionalExpectationMap, GroupEstimate,
    HistoryKey,
};
pub use martingale::{
    check_martingale_property, conditional_drift, martingale_report, step_means, DriftEstimate,
    MartingaleReport, DEFAULT_TOLERANCE,
};
pub use observation::{ExactF64, Observation};
pub use paths::{build_partial_sums, generate_tosses, generate_tosses_seeded, seeded_rng, LOSS, WIN};
