pub mod auth;
pub mod common;
pub mod coupons;
pub mod health;
pub mod membership;
pub mod payments;
pub mod pricing;
pub mod quotes;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;
