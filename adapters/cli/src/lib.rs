#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter internals for Grid Rush.
//!
//! The binary in `main.rs` stays thin; session orchestration, input pacing,
//! and high-score persistence live here so the integration tests can drive
//! them directly.

pub mod high_scores;
pub mod input;
pub mod session;
