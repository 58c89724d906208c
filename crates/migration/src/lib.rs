//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_users;
mod m20240301_000002_create_deals;
mod m20240301_000003_create_newsletter_subscribers;
mod m20240301_000004_create_early_access_submissions;
mod m20240301_000005_create_wallets;
mod m20240301_000006_create_transfers;
mod m20240301_000007_create_payment_methods;
mod m20240301_000008_create_user_documents;
mod m20240301_000009_create_user_investments;
mod m20240301_000010_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_users::Migration),
            Box::new(m20240301_000002_create_deals::Migration),
            Box::new(m20240301_000003_create_newsletter_subscribers::Migration),
            Box::new(m20240301_000004_create_early_access_submissions::Migration),
            // wallets before transfers (transfers.wallet_id)
            Box::new(m20240301_000005_create_wallets::Migration),
            Box::new(m20240301_000006_create_transfers::Migration),
            Box::new(m20240301_000007_create_payment_methods::Migration),
            Box::new(m20240301_000008_create_user_documents::Migration),
            Box::new(m20240301_000009_create_user_investments::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000010_add_indexes::Migration),
        ]
    }
}
