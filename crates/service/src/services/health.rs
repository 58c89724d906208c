use std::sync::Arc;

use common::types::HealthResponse;
use tracing::warn;

use crate::repository::HealthProbe;

pub struct HealthService<R: HealthProbe + ?Sized> {
    repo: Arc<R>,
    version: &'static str,
}

impl<R: HealthProbe + ?Sized> HealthService<R> {
    pub fn new(repo: Arc<R>, version: &'static str) -> Self { Self { repo, version } }

    /// Ping the database; a failure yields the degraded body instead of an error.
    pub async fn check(&self) -> HealthResponse {
        match self.repo.ping().await {
            Ok(()) => HealthResponse::connected(self.version),
            Err(e) => {
                warn!(error = %e, "database ping failed");
                HealthResponse::disconnected(self.version)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::mock::MockStore;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn reports_database_state() {
        let store = Arc::new(MockStore::default());
        let svc = HealthService::new(store.clone(), "1.2.3");
        let ok = svc.check().await;
        assert!(ok.success);
        assert_eq!(ok.version, "1.2.3");

        store.fail_ping.store(true, Ordering::SeqCst);
        let down = svc.check().await;
        assert!(!down.success);
        assert_eq!(down.database, "disconnected");
    }
}
