//! Integration tests for the coin-toss analysis pipeline.
//!
//! These tests drive the public API end to end:
//! - toss generation feeding partial sums and conditional estimates
//! - the doubling strategy's stop-after-first-win guarantee on random paths
//! - martingale checks on simulated winnings and partial sums

use martingale_lab_core::{MartingaleError, SimulationConfig};
use martingale_lab_sim::{
    build_partial_sums, check_martingale_property, estimate_by_history, estimate_by_partial_sum,
    generate_tosses, martingale_report, seeded_rng, simulate_betting_strategy,
    simulate_betting_strategy_with_rng, step_means, HistoryKey, DEFAULT_TOLERANCE,
};

// =============================================================================
// Helper Functions
// =============================================================================

fn config() -> SimulationConfig {
    SimulationConfig::new(5_000, 12).with_seed(42)
}

// =============================================================================
// Conditional expectation
// =============================================================================

#[test]
fn history_estimates_cover_every_path_for_each_t() {
    let config = config();
    let mut rng = seeded_rng(config.seed);
    let tosses = generate_tosses(config.n_paths, config.n_steps, &mut rng);

    for t in 0..(config.n_steps as i64 - 1) {
        let estimates = estimate_by_history(&tosses, t).unwrap();
        assert_eq!(estimates.path_count(), config.n_paths);
        assert!(estimates.keys().all(|k| k.len() == t as usize + 1));
    }
}

#[test]
fn next_toss_is_unpredictable_from_short_history() {
    let tosses = generate_tosses(20_000, 4, &mut seeded_rng(Some(7)));

    let estimates = estimate_by_history(&tosses, 1).unwrap();

    assert_eq!(estimates.len(), 4);
    for history in [[1_i64, 1], [1, -1], [-1, 1], [-1, -1]] {
        let mean = estimates.get(&HistoryKey::from(history.to_vec())).unwrap();
        assert!(mean.abs() < 0.07, "E[X_2 | {history:?}] was {mean}");
    }
}

#[test]
fn partial_sum_estimate_tracks_current_value() {
    let tosses = generate_tosses(20_000, 5, &mut seeded_rng(Some(3)));
    let sums = build_partial_sums(&tosses);

    let estimates = estimate_by_partial_sum(&sums, 2).unwrap();

    // S_2 takes values in {-3, -1, 1, 3}
    assert_eq!(estimates.len(), 4);
    for (&state, group) in &estimates {
        assert!(
            (group.mean - state as f64).abs() < 0.1,
            "E[S_3 | S_2 = {state}] was {}",
            group.mean
        );
    }
}

#[test]
fn estimators_reject_last_and_negative_t() {
    let tosses = generate_tosses(10, 6, &mut seeded_rng(Some(1)));
    let sums = build_partial_sums(&tosses);

    for t in [-1, 5, 100] {
        assert!(matches!(
            estimate_by_history(&tosses, t),
            Err(MartingaleError::InvalidArgument(_))
        ));
        assert!(matches!(
            estimate_by_partial_sum(&sums, t),
            Err(MartingaleError::InvalidArgument(_))
        ));
    }
}

// =============================================================================
// Betting strategy
// =============================================================================

#[test]
fn stopped_paths_never_bet_again() {
    let sim = simulate_betting_strategy(2_000, 15, Some(42));

    for i in 0..sim.tosses.n_paths() {
        let bets = sim.bets.row(i);
        let winnings = sim.winnings.row(i);

        if let Some(stop) = sim.stop_step(i) {
            for t in stop..bets.len() {
                assert_eq!(bets[t], 0, "path {i} bet after stopping");
                assert_eq!(winnings[t], winnings[stop - 1], "path {i} winnings moved");
            }
            // a completed doubling cycle always nets exactly one unit
            assert_eq!(winnings[bets.len() - 1], 1);
        } else {
            assert!(bets.iter().all(|&b| b > 0));
        }
    }
}

#[test]
fn bets_double_until_first_win() {
    let sim = simulate_betting_strategy(500, 10, Some(9));

    for i in 0..sim.tosses.n_paths() {
        let tosses = sim.tosses.row(i);
        let bets = sim.bets.row(i);
        assert_eq!(bets[0], 1);
        for t in 1..bets.len() {
            if bets[t - 1] > 0 && tosses[t - 1] == -1 {
                assert_eq!(bets[t], 2 * bets[t - 1]);
            }
        }
    }
}

#[test]
fn stop_probability_matches_geometric_law() {
    let sim = simulate_betting_strategy(20_000, 6, Some(11));
    let summary = sim.summary();

    // P(at least one win in 6 fair tosses) = 1 - 2^-6
    let expected = 1.0 - 1.0 / 64.0;
    assert!((summary.prob_stopped - expected).abs() < 0.01);
    assert_eq!(summary.stopped_paths + summary.never_won, 20_000);
    assert_eq!(summary.max_final_winnings, 1);
}

#[test]
fn explicit_generator_matches_seeded_entry_point() {
    let a = simulate_betting_strategy(50, 8, Some(5));
    let b = simulate_betting_strategy_with_rng(50, 8, &mut seeded_rng(Some(5)));
    assert_eq!(a, b);
}

// =============================================================================
// Martingale checks
// =============================================================================

#[test]
fn winnings_mean_stays_near_zero_early() {
    let sim = simulate_betting_strategy(20_000, 4, Some(21));
    let means = step_means(&sim.winnings);

    assert!(means[3].abs() < 0.25, "mean winnings at t=3 was {}", means[3]);
}

#[test]
fn martingale_check_length_and_loose_tolerance() {
    let config = config();
    let sums = build_partial_sums(&generate_tosses(
        config.n_paths,
        config.n_steps,
        &mut seeded_rng(config.seed),
    ));

    let tight = check_martingale_property(&sums, DEFAULT_TOLERANCE);
    let loose = martingale_report(&sums, 1.0);

    assert_eq!(tight.len(), config.n_steps - 1);
    assert!(loose.all_hold());
}
