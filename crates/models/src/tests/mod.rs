//! Database-backed tests. They need a reachable Postgres in `DATABASE_URL`
//! and are skipped when it is missing or `SKIP_DB_TESTS` is set.

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

mod crud_tests;

pub(crate) async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match crate::db::connect_from_env().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}
