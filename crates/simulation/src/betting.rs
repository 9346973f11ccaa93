//! Doubling ("martingale") betting strategy over coin-toss paths.
//!
//! Each path bets 1 on its first toss, doubles the stake after every loss
//! and stops for good after its first win. Once stopped, the stake is 0 and
//! cumulative winnings are carried forward unchanged.
//!
//! # Stake width
//!
//! Stakes and winnings are [`Stake`] (`i128`). A path that keeps losing
//! stakes `2^t` at step `t`, which is exact up to `t = 126`. Beyond that the
//! doubling saturates at `i128::MAX` and winnings saturate at the `i128`
//! bounds instead of wrapping; a warning is logged when this happens.
//!
//! # Example
//!
//! ```ignore
//! use martingale_lab_sim::betting::simulate_betting_strategy;
//!
//! let sim = simulate_betting_strategy(1000, 20, Some(42));
//! let summary = sim.summary();
//! println!("stopped: {:.1}%", summary.prob_stopped * 100.0);
//! ```

use martingale_lab_core::{Matrix, Stake, TossMatrix};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::paths::{generate_tosses, seeded_rng, LOSS};

/// Per-path betting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BettingState {
    /// Still wagering `stake` on the current toss.
    Betting {
        /// Amount wagered on the current toss.
        stake: Stake,
    },
    /// A win has been recorded; no further wagers.
    Stopped,
}

impl BettingState {
    /// Stake placed on a path's first toss.
    pub const INITIAL_STAKE: Stake = 1;

    /// State on entering step 0.
    #[must_use]
    pub fn start() -> Self {
        Self::Betting {
            stake: Self::INITIAL_STAKE,
        }
    }

    /// Moves to the next step given the toss just observed.
    ///
    /// A toss equal to [`LOSS`] doubles the stake. Any other value is a win
    /// and stops betting. `Stopped` is absorbing.
    #[must_use]
    pub fn advance(self, previous_toss: i64) -> Self {
        match self {
            Self::Betting { stake } if previous_toss == LOSS => Self::Betting {
                stake: stake.saturating_mul(2),
            },
            Self::Betting { .. } | Self::Stopped => Self::Stopped,
        }
    }

    /// Current wager, 0 once stopped.
    #[must_use]
    pub fn stake(self) -> Stake {
        match self {
            Self::Betting { stake } => stake,
            Self::Stopped => 0,
        }
    }

    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Winnings after settling `toss` in this state.
    #[must_use]
    pub fn settle(self, winnings: Stake, toss: i64) -> Stake {
        match self {
            Self::Betting { stake } => winnings.saturating_add(stake.saturating_mul(Stake::from(toss))),
            Self::Stopped => winnings,
        }
    }
}

/// Tosses, bets and cumulative winnings of a betting run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BettingSimulation {
    /// Coin tosses `X`.
    pub tosses: TossMatrix,
    /// Stake `B[i, t]` placed by path `i` at step `t`.
    pub bets: Matrix<Stake>,
    /// Cumulative winnings `W[i, t]` through step `t`.
    pub winnings: Matrix<Stake>,
}

/// Aggregate view of a betting run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BettingSummary {
    pub n_paths: usize,
    pub n_steps: usize,
    /// Paths that recorded a win and stopped.
    pub stopped_paths: usize,
    /// Paths that lost every toss.
    pub never_won: usize,
    /// Fraction of paths that stopped.
    pub prob_stopped: f64,
    /// Mean of final winnings across paths.
    pub mean_final_winnings: f64,
    pub min_final_winnings: Stake,
    pub max_final_winnings: Stake,
    /// Largest stake placed by any path.
    pub max_stake: Stake,
}

impl BettingSimulation {
    /// Step at which path `i` stopped betting, if it won within the horizon.
    ///
    /// This is the step right after the first win, so it equals `n_steps`
    /// when the win is on the last toss.
    #[must_use]
    pub fn stop_step(&self, i: usize) -> Option<usize> {
        self.tosses
            .row(i)
            .iter()
            .position(|&x| x != LOSS)
            .map(|win_step| win_step + 1)
    }

    /// Final winnings of every path.
    #[must_use]
    pub fn final_winnings(&self) -> Vec<Stake> {
        match self.winnings.n_steps() {
            0 => vec![0; self.winnings.n_paths()],
            n => self.winnings.column(n - 1),
        }
    }

    /// Summarizes stop rates, final winnings and stake growth.
    #[must_use]
    pub fn summary(&self) -> BettingSummary {
        let (n_paths, n_steps) = self.tosses.shape();
        let finals = self.final_winnings();

        let stopped_paths = (0..n_paths).filter(|&i| self.stop_step(i).is_some()).count();
        let never_won = n_paths - stopped_paths;

        let (prob_stopped, mean_final_winnings) = if n_paths == 0 {
            (0.0, 0.0)
        } else {
            let total: f64 = finals.iter().map(|&w| w as f64).sum();
            (
                stopped_paths as f64 / n_paths as f64,
                total / n_paths as f64,
            )
        };

        BettingSummary {
            n_paths,
            n_steps,
            stopped_paths,
            never_won,
            prob_stopped,
            mean_final_winnings,
            min_final_winnings: finals.iter().copied().min().unwrap_or(0),
            max_final_winnings: finals.iter().copied().max().unwrap_or(0),
            max_stake: self.bets.rows().flatten().copied().max().unwrap_or(0),
        }
    }
}

/// Runs the doubling strategy over already-drawn tosses.
///
/// Only a toss equal to [`LOSS`] counts as a loss; any other value ends the
/// path's betting, and its winnings still move by `stake * toss` on that step.
#[must_use]
pub fn run_betting_strategy(tosses: &TossMatrix) -> BettingSimulation {
    let (n_paths, n_steps) = tosses.shape();
    let mut bets = Matrix::zeros(n_paths, n_steps);
    let mut winnings = Matrix::zeros(n_paths, n_steps);
    let mut saturated_paths = 0_usize;

    for (i, path) in tosses.rows().enumerate() {
        let mut state = BettingState::start();
        let mut total: Stake = 0;

        for (t, &toss) in path.iter().enumerate() {
            if t > 0 {
                state = state.advance(path[t - 1]);
            }
            total = state.settle(total, toss);
            bets.set(i, t, state.stake());
            winnings.set(i, t, total);
        }

        if state.stake() == Stake::MAX {
            saturated_paths += 1;
        }
    }

    if saturated_paths > 0 {
        tracing::warn!(
            saturated_paths,
            n_steps,
            "stake doubling saturated at i128::MAX"
        );
    }

    tracing::debug!(n_paths, n_steps, "ran doubling strategy");

    BettingSimulation {
        tosses: tosses.clone(),
        bets,
        winnings,
    }
}

/// Draws tosses from `rng` and runs the doubling strategy over them.
pub fn simulate_betting_strategy_with_rng<R: Rng + ?Sized>(
    n_paths: usize,
    n_steps: usize,
    rng: &mut R,
) -> BettingSimulation {
    let tosses = generate_tosses(n_paths, n_steps, rng);
    run_betting_strategy(&tosses)
}

/// Draws tosses from a generator seeded with `seed` and runs the strategy.
#[must_use]
pub fn simulate_betting_strategy(
    n_paths: usize,
    n_steps: usize,
    seed: Option<u64>,
) -> BettingSimulation {
    let mut rng = seeded_rng(seed);
    simulate_betting_strategy_with_rng(n_paths, n_steps, &mut rng)
}
