//! Alert jobs: the snapshot-diff-notify pipeline and its four
//! implementations (big plays, injuries, transactions, zero points).
//!
//! Detectors are pure functions over in-memory snapshots and seen-state;
//! all network access lives in `fetch` and in the caller-supplied clients.

pub mod big_plays;
pub mod fetch;
pub mod injuries;
pub mod pipeline;
pub mod transactions;
pub mod zero_points;

pub use pipeline::{run_job, AlertJob, JobOutcome};
