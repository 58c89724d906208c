//! Detached side effects (emails, CRM relay).
//!
//! The request that triggers them never waits; failures are logged and
//! counted in `fragma_side_effect_failures_total`.

use std::fmt::Display;
use std::future::Future;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub fn spawn_side_effect<F, E>(kind: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    tokio::spawn(async move {
        match fut.await {
            Ok(()) => debug!(kind, "side effect done"),
            Err(e) => {
                common::metrics::side_effect_failed(kind);
                warn!(kind, error = %e, "side effect failed");
            }
        }
    })
}
