//! Business layer for the Fragma Society backend.
//! - Services hold the rules; storage sits behind the traits in [`repository`].
//! - Third-party APIs (KYC, email, CRM) sit behind the traits in [`integrations`].
//! - Every trait has an in-memory `mock` so services and handlers test without Postgres.

pub mod errors;
pub mod validation;
pub mod pagination;
pub mod integrations;
pub mod background;
pub mod repository;
#[cfg(feature = "seaorm")]
pub mod repo;
pub mod services;
