//! Sleeper API client library.
//!
//! Read-only REST access to `api.sleeper.app`. No auth, no pagination;
//! every endpoint is a single GET.

pub mod rest;

pub use rest::SleeperClient;
