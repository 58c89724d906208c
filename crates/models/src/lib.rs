//! SeaORM entities for the Fragma Society schema, with the small amount of
//! row-level validation applied before anything is written.

pub mod errors;
pub mod db;
pub mod status;
pub mod validation;
pub mod user;
pub mod wallet;
pub mod deal;
pub mod newsletter_subscriber;
pub mod early_access_submission;
pub mod transfer;
pub mod payment_method;
pub mod user_document;
pub mod user_investment;

#[cfg(test)]
mod tests;
