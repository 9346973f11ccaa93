//! Empirical conditional expectations from simulated paths.
//!
//! Paths are partitioned at a fixed time `t` by a grouping key, and each
//! group's mean of the next-step observation is the estimate of
//! `E[next | key]`. Two keys are supported:
//!
//! - the full history `(X_0, ..., X_t)` of a path ([`estimate_by_history`]);
//! - the single value `S_t` of a path ([`estimate_by_partial_sum`]), whose
//!   next-step observation is `S_{t+1}`.
//!
//! Grouping uses exact equality (see [`Observation`]). Only keys that occur
//! in the input appear in the result, and every path lands in exactly one
//! group.

use std::collections::hash_map::{self, HashMap};
use std::hash::Hash;
use std::ops::Deref;

use martingale_lab_core::{Matrix, MartingaleError, Result};
use serde::{Deserialize, Serialize};

use crate::observation::Observation;

/// Prefix `(X_0, ..., X_t)` of one path, used as a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryKey<K>(Vec<K>);

impl<K> HistoryKey<K> {
    #[must_use]
    pub fn new(values: Vec<K>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[K] {
        &self.0
    }
}

impl<K> From<Vec<K>> for HistoryKey<K> {
    fn from(values: Vec<K>) -> Self {
        Self(values)
    }
}

impl<K> Deref for HistoryKey<K> {
    type Target = [K];

    fn deref(&self) -> &[K] {
        &self.0
    }
}

/// Estimate for one group of paths sharing a key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEstimate {
    /// Mean of the next-step observation over the group.
    pub mean: f64,
    /// Indices of the paths in the group, ascending.
    pub paths: Vec<usize>,
}

impl GroupEstimate {
    /// Number of paths that formed the estimate.
    #[must_use]
    pub fn count(&self) -> usize {
        self.paths.len()
    }
}

/// Conditional expectation estimates keyed by the observed conditioning key.
#[derive(Debug, Clone)]
pub struct ConditionalExpectationMap<K> {
    t: usize,
    groups: HashMap<K, GroupEstimate>,
}

impl<K: Eq + Hash> ConditionalExpectationMap<K> {
    /// Time index the estimates condition on.
    #[must_use]
    pub fn t(&self) -> usize {
        self.t
    }

    /// Estimated conditional expectation for `key`, if the key was observed.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<f64> {
        self.groups.get(key).map(|g| g.mean)
    }

    /// Full group for `key`, including member paths.
    #[must_use]
    pub fn group(&self, key: &K) -> Option<&GroupEstimate> {
        self.groups.get(key)
    }

    /// Number of distinct keys observed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> hash_map::Keys<'_, K, GroupEstimate> {
        self.groups.keys()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, K, GroupEstimate> {
        self.groups.iter()
    }

    /// Total number of paths across all groups.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.groups.values().map(GroupEstimate::count).sum()
    }
}

impl<'a, K> IntoIterator for &'a ConditionalExpectationMap<K> {
    type Item = (&'a K, &'a GroupEstimate);
    type IntoIter = hash_map::Iter<'a, K, GroupEstimate>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Checks `0 <= t < n_steps - 1` and converts `t` to an index.
fn validate_time(t: i64, n_steps: usize) -> Result<usize> {
    match usize::try_from(t) {
        Ok(idx) if idx + 1 < n_steps => Ok(idx),
        _ => Err(MartingaleError::time_out_of_range(t, n_steps)),
    }
}

/// Groups every path by `key_of(path)` and averages `next_of(path)`.
fn estimate_grouped<T, K>(
    matrix: &Matrix<T>,
    t: usize,
    key_of: impl Fn(&[T]) -> K,
    next_of: impl Fn(&[T]) -> f64,
) -> ConditionalExpectationMap<K>
where
    T: Copy,
    K: Eq + Hash,
{
    let mut sums: HashMap<K, (f64, Vec<usize>)> = HashMap::new();

    for (i, path) in matrix.rows().enumerate() {
        let (sum, members) = sums.entry(key_of(path)).or_insert_with(|| (0.0, Vec::new()));
        *sum += next_of(path);
        members.push(i);
    }

    let groups = sums
        .into_iter()
        .map(|(key, (sum, paths))| {
            let mean = sum / paths.len() as f64;
            (key, GroupEstimate { mean, paths })
        })
        .collect();

    ConditionalExpectationMap { t, groups }
}

/// Estimates `E[X_{t+1} | X_0, ..., X_t]` by grouping paths on their history.
///
/// Values are not checked to be ±1; whatever histories occur are grouped.
///
/// # Errors
///
/// Returns `InvalidArgument` unless `0 <= t < n_steps - 1`.
pub fn estimate_by_history<T: Observation>(
    paths: &Matrix<T>,
    t: i64,
) -> Result<ConditionalExpectationMap<HistoryKey<T::Key>>> {
    let t = validate_time(t, paths.n_steps())?;

    let estimates: ConditionalExpectationMap<HistoryKey<T::Key>> = estimate_grouped(
        paths,
        t,
        |path| HistoryKey::new(path[..=t].iter().map(|&x| x.key()).collect()),
        |path| path[t + 1].value(),
    );

    tracing::debug!(
        n_paths = paths.n_paths(),
        n_steps = paths.n_steps(),
        t,
        groups = estimates.len(),
        "estimated conditional expectation by history"
    );

    Ok(estimates)
}

/// Estimates `E[S_{t+1} | S_t]` by grouping paths on their partial sum at `t`.
///
/// # Errors
///
/// Returns `InvalidArgument` unless `0 <= t < n_steps - 1`.
pub fn estimate_by_partial_sum<T: Observation>(
    partial_sums: &Matrix<T>,
    t: i64,
) -> Result<ConditionalExpectationMap<T::Key>> {
    let t = validate_time(t, partial_sums.n_steps())?;

    let estimates = estimate_grouped(
        partial_sums,
        t,
        |path| path[t].key(),
        |path| path[t + 1].value(),
    );

    tracing::debug!(
        n_paths = partial_sums.n_paths(),
        n_steps = partial_sums.n_steps(),
        t,
        groups = estimates.len(),
        "estimated conditional expectation by partial sum"
    );

    Ok(estimates)
}
