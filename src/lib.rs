//! confreg-api
//!
//! Conference-registration backend: ticket and package pricing with the
//! GST rule, coupon validation and redemption, unified discount quotes,
//! mock IEEE membership verification, attendee accounts, and payment
//! intent preparation for Razorpay and Stripe.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;

/// Shared application state: configuration plus the service layer. All
/// members are cheap to clone (Arcs over immutable data or lock-free
/// maps).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::AppConfig>,
    pub services: services::AppServices,
}

impl AppState {
    pub fn new(config: config::AppConfig, catalog: catalog::Catalog) -> Self {
        let services = services::AppServices::new(&config, catalog);
        Self {
            config: Arc::new(config),
            services,
        }
    }
}

/// The versioned API surface, mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/pricing", handlers::pricing::routes())
        .nest("/coupons", handlers::coupons::routes())
        .nest("/quote", handlers::quotes::routes())
        .nest("/membership", handlers::membership::routes())
        .nest("/auth", handlers::auth::routes())
        .nest("/payments", handlers::payments::routes())
}
