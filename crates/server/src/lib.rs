//! HTTP surface of the Fragma Society backend (axum).

pub mod admin_auth;
pub mod errors;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::run;
