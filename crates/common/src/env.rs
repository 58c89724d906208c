//! Environment/runtime helpers
//!
//! Sanity checks run once at startup before the listener is bound.

use std::path::Path;

use tracing::warn;

/// Check the SPA build directory. A missing directory or a missing
/// `index.html` only produces a warning: the API stays usable and static
/// requests fall through to 404.
pub async fn ensure_static_dir(static_dir: &str) -> bool {
    if tokio::fs::metadata(static_dir).await.is_err() {
        warn!(%static_dir, "frontend assets directory not found; static assets will 404");
        return false;
    }
    let index = Path::new(static_dir).join("index.html");
    if tokio::fs::metadata(&index).await.is_err() {
        warn!(index = %index.display(), "index.html missing; SPA fallback disabled");
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_dir_reports_false() {
        assert!(!ensure_static_dir("/definitely/not/here").await);
    }

    #[tokio::test]
    async fn dir_with_index_reports_true() -> anyhow::Result<()> {
        let dir = std::env::temp_dir().join(format!("fragma-static-{}", std::process::id()));
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join("index.html"), "<html></html>").await?;
        assert!(ensure_static_dir(dir.to_str().unwrap_or_default()).await);
        tokio::fs::remove_dir_all(&dir).await?;
        Ok(())
    }
}
