//! Coin-toss path generation and partial sums.
//!
//! Randomness is always drawn from an explicit generator. Callers that need
//! reproducible paths pass a seed to [`seeded_rng`] (or use
//! [`generate_tosses_seeded`]) instead of relying on process-wide state.

use martingale_lab_core::{Matrix, PartialSumMatrix, TossMatrix};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Value of a winning toss.
pub const WIN: i64 = 1;
/// Value of a losing toss.
pub const LOSS: i64 = -1;

/// Creates the generator used by every simulation in this crate.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Draws an `n_paths × n_steps` matrix of independent fair ±1 tosses.
pub fn generate_tosses<R: Rng + ?Sized>(n_paths: usize, n_steps: usize, rng: &mut R) -> TossMatrix {
    Matrix::from_fn(n_paths, n_steps, |_, _| if rng.gen::<bool>() { WIN } else { LOSS })
}

/// Same as [`generate_tosses`] with a generator built from `seed`.
#[must_use]
pub fn generate_tosses_seeded(n_paths: usize, n_steps: usize, seed: Option<u64>) -> TossMatrix {
    let mut rng = seeded_rng(seed);
    generate_tosses(n_paths, n_steps, &mut rng)
}

/// Running sum of each path along the time axis.
///
/// `S[i, 0] = X[i, 0]` and `S[i, t] = S[i, t - 1] + X[i, t]`.
#[must_use]
pub fn build_partial_sums(tosses: &TossMatrix) -> PartialSumMatrix {
    let mut sums = tosses.clone();
    for i in 0..sums.n_paths() {
        let row = sums.row_mut(i);
        for t in 1..row.len() {
            row[t] += row[t - 1];
        }
    }
    sums
}
