//! Shared plumbing for the Fragma Society backend crates:
//! logging setup, startup environment checks, response envelope types and
//! Prometheus counters.

pub mod types;
pub mod utils;
pub mod env;
pub mod metrics;
