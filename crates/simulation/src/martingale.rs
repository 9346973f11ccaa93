//! Martingale diagnostics for simulated processes.
//!
//! [`check_martingale_property`] compares the cross-path mean of a process at
//! consecutive steps. Equal means are necessary but not sufficient for the
//! martingale property, which requires `E[M_{t+1} | F_t] = M_t`; the cheaper
//! unconditional check is what it reports.
//!
//! [`conditional_drift`] looks one level deeper for partial-sum processes: it
//! estimates the predictable increment `E[S_{t+1} | S_t = s] - s` of the Doob
//! decomposition for every observed state `s`. A fair process shows drift near
//! zero in every state.

use martingale_lab_core::{Matrix, Result};
use serde::{Deserialize, Serialize};

pub use martingale_lab_core::DEFAULT_TOLERANCE;

use crate::conditional::estimate_by_partial_sum;
use crate::observation::Observation;

/// Per-step means and the outcome of the unconditional check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MartingaleReport {
    /// Cross-path mean at each step.
    pub means: Vec<f64>,
    /// `|mean(t + 1) - mean(t)|` for each consecutive pair.
    pub differences: Vec<f64>,
    /// Tolerance the differences were compared against.
    pub tolerance: f64,
    /// `differences[t] < tolerance`, in increasing `t`.
    pub holds: Vec<bool>,
}

impl MartingaleReport {
    /// True when every consecutive pair passed.
    #[must_use]
    pub fn all_hold(&self) -> bool {
        self.holds.iter().all(|&h| h)
    }

    /// First `t` where the means differ by at least the tolerance.
    #[must_use]
    pub fn first_violation(&self) -> Option<usize> {
        self.holds.iter().position(|&h| !h)
    }
}

/// Cross-path mean of every column.
///
/// An empty process (no paths) yields `NaN` means.
#[must_use]
pub fn step_means<T: Observation>(process: &Matrix<T>) -> Vec<f64> {
    let n_paths = process.n_paths() as f64;
    let mut sums = vec![0.0; process.n_steps()];

    for path in process.rows() {
        for (sum, &x) in sums.iter_mut().zip(path) {
            *sum += x.value();
        }
    }

    sums.into_iter().map(|s| s / n_paths).collect()
}

/// Builds the full report behind [`check_martingale_property`].
#[must_use]
pub fn martingale_report<T: Observation>(process: &Matrix<T>, tol: f64) -> MartingaleReport {
    let means = step_means(process);
    let differences: Vec<f64> = means.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
    let holds = differences.iter().map(|&d| d < tol).collect();

    let report = MartingaleReport {
        means,
        differences,
        tolerance: tol,
        holds,
    };

    tracing::debug!(
        n_paths = process.n_paths(),
        n_steps = process.n_steps(),
        tol,
        first_violation = ?report.first_violation(),
        "checked unconditional martingale property"
    );

    report
}

/// For each `t` in `0..n_steps - 1`, whether `|mean(t + 1) - mean(t)| < tol`.
///
/// Means are taken across paths, unconditionally. See the module docs for
/// why this is weaker than the martingale property.
#[must_use]
pub fn check_martingale_property<T: Observation>(process: &Matrix<T>, tol: f64) -> Vec<bool> {
    martingale_report(process, tol).holds
}

/// Predictable increment estimated for one partial-sum state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftEstimate {
    /// Observed value `s` of `S_t`.
    pub state: f64,
    /// Empirical `E[S_{t+1} | S_t = s]`.
    pub expected_next: f64,
    /// `expected_next - state`.
    pub drift: f64,
    /// Paths in state `s` at `t`.
    pub count: usize,
}

/// Estimates `E[S_{t+1} | S_t = s] - s` for every state observed at `t`,
/// sorted by state.
///
/// # Errors
///
/// Returns `InvalidArgument` unless `0 <= t < n_steps - 1`.
pub fn conditional_drift<T: Observation>(
    partial_sums: &Matrix<T>,
    t: i64,
) -> Result<Vec<DriftEstimate>> {
    let estimates = estimate_by_partial_sum(partial_sums, t)?;

    let mut drifts: Vec<DriftEstimate> = estimates
        .iter()
        .map(|(key, group)| {
            let state = T::key_value(key);
            DriftEstimate {
                state,
                expected_next: group.mean,
                drift: group.mean - state,
                count: group.count(),
            }
        })
        .collect();
    drifts.sort_by(|a, b| a.state.total_cmp(&b.state));

    Ok(drifts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{build_partial_sums, generate_tosses_seeded};
    use martingale_lab_core::MartingaleError;

    #[test]
    fn constant_mean_process_passes_everywhere() {
        let process = Matrix::from_rows(vec![vec![1, -1, 3, 0], vec![-1, 1, -3, 0]]).unwrap();

        let holds = check_martingale_property(&process, DEFAULT_TOLERANCE);

        assert_eq!(holds, vec![true, true, true]);
    }

    #[test]
    fn increasing_mean_fails_at_that_step() {
        let process = Matrix::from_rows(vec![vec![0.0, 0.0, 1.0, 1.0], vec![0.0, 0.0, 1.0, 1.0]])
            .unwrap();

        let report = martingale_report(&process, DEFAULT_TOLERANCE);

        assert_eq!(report.holds, vec![true, false, true]);
        assert_eq!(report.first_violation(), Some(1));
        assert!(!report.all_hold());
        assert!((report.differences[1] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn difference_equal_to_tolerance_fails() {
        let process = Matrix::from_rows(vec![vec![0.0, 0.5]]).unwrap();
        assert_eq!(check_martingale_property(&process, 0.5), vec![false]);
        assert_eq!(check_martingale_property(&process, 0.75), vec![true]);
    }

    #[test]
    fn output_length_is_steps_minus_one() {
        let process = generate_tosses_seeded(10, 9, Some(1));
        assert_eq!(check_martingale_property(&process, 1.0).len(), 8);

        let single: Matrix<i64> = Matrix::zeros(3, 1);
        assert!(check_martingale_property(&single, 1.0).is_empty());
    }

    #[test]
    fn empty_process_reports_nan_means_and_all_false() {
        let empty: Matrix<i64> = Matrix::zeros(0, 4);

        let report = martingale_report(&empty, 1.0);

        assert!(report.means.iter().all(|m| m.is_nan()));
        assert_eq!(report.holds, vec![false, false, false]);
        assert_eq!(report.first_violation(), Some(0));
    }

    #[test]
    fn step_means_average_columns() {
        let process = Matrix::from_rows(vec![vec![1_i64, 2], vec![3, 6]]).unwrap();
        assert_eq!(step_means(&process), vec![2.0, 4.0]);
    }

    #[test]
    fn drift_of_deterministic_walk() {
        let sums = Matrix::from_rows(vec![vec![1, 2, 3], vec![-1, 0, 1], vec![1, 0, -1]]).unwrap();

        let drifts = conditional_drift(&sums, 0).unwrap();

        assert_eq!(drifts.len(), 2);
        assert!((drifts[0].state + 1.0).abs() < 1e-12);
        assert!((drifts[0].drift - 1.0).abs() < 1e-12);
        assert!((drifts[1].state - 1.0).abs() < 1e-12);
        assert!((drifts[1].expected_next - 1.0).abs() < 1e-12);
        assert!(drifts[1].drift.abs() < 1e-12);
        assert_eq!(drifts[1].count, 2);
    }

    #[test]
    fn fair_walk_has_small_drift() {
        let sums = build_partial_sums(&generate_tosses_seeded(20_000, 6, Some(42)));

        for drift in conditional_drift(&sums, 3).unwrap() {
            if drift.count >= 500 {
                assert!(drift.drift.abs() < 0.15, "drift at state {} was {}", drift.state, drift.drift);
            }
        }
    }

    #[test]
    fn drift_validates_time_index() {
        let sums = Matrix::from_rows(vec![vec![1_i64, 2]]).unwrap();
        assert!(matches!(
            conditional_drift(&sums, 1),
            Err(MartingaleError::InvalidArgument(_))
        ));
    }
}
