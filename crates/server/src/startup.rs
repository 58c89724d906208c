use std::sync::Arc;

use configs::AppConfig;
use migration::{Migrator, MigratorTrait};
use service::repo::SeaOrmRepository;
use service::repository::Repository;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::{AppState, Integrations};

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!(event = "shutdown_signal", "shutdown signal received, draining connections");
}

/// Public entry: connect, migrate, build the app and serve until a shutdown signal.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_static_dir(&cfg.server.static_dir).await;

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        Migrator::up(&db, None).await.map_err(|e| StartupError::Database(e.to_string()))?;
        info!(event = "migrations_applied", "database schema up to date");
    }

    let integrations = Integrations::from_config(&cfg).map_err(StartupError::from)?;
    info!(
        event = "integrations",
        email = integrations.email.is_some(),
        crm = integrations.crm.is_some(),
        kyc = integrations.kyc.is_some(),
        admin = cfg.admin.api_key.is_some(),
        "integration status"
    );

    let repo: Arc<dyn Repository> = Arc::new(SeaOrmRepository::new(db));
    let state = AppState::new(repo, integrations, cfg.admin.api_key.as_deref());
    let cors = routes::build_cors(&cfg.server.cors_origins);
    let app = routes::build_router(state, cors, &cfg.server.static_dir);

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, environment = ?cfg.environment, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
