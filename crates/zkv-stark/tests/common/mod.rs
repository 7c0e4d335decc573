//! Shared fixture helpers for the integration tests.

#![allow(dead_code)]

use zkv_prover::fixtures::{self, Fixture};
use zkv_stark::FriOptions;

/// Small but multi-fold parameters: `n = 16`, `N = 64`, three FRI folds.
pub fn small_fri() -> FriOptions {
    FriOptions {
        log_blowup: 2,
        num_queries: 12,
        log_remainder_len: 1,
    }
}

pub fn fixture(name: &str) -> Fixture {
    fixtures::by_name(name, 4, small_fri()).unwrap()
}
