pub mod health;
pub mod newsletter;
pub mod early_access;
pub mod kyc;
pub mod admin;
pub mod deals;
