pub mod coupons;
pub mod membership;
pub mod payments;
pub mod pricing;
pub mod quotes;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use crate::{auth::AuthService, catalog::Catalog, config::AppConfig};

/// Business-logic layer handed to the HTTP handlers. Every service shares
/// the same immutable catalog.
#[derive(Clone)]
pub struct AppServices {
    pub pricing: Arc<pricing::PricingService>,
    pub coupons: Arc<coupons::CouponService>,
    pub quotes: Arc<quotes::QuoteService>,
    pub membership: Arc<membership::MembershipService>,
    pub users: Arc<users::UserStore>,
    pub payments: Arc<payments::PaymentService>,
    pub auth: Arc<AuthService>,
}

impl AppServices {
    pub fn new(config: &AppConfig, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let pricing = Arc::new(pricing::PricingService::new(catalog.clone()));
        let coupons = Arc::new(coupons::CouponService::new(catalog.clone()));
        let membership = Arc::new(membership::MembershipService::new(
            catalog.clone(),
            Duration::from_millis(config.membership_lookup_delay_ms),
        ));
        let quotes = Arc::new(quotes::QuoteService::new(
            pricing.clone(),
            coupons.clone(),
            membership.clone(),
            config.discount_stacking,
        ));
        let users = Arc::new(users::UserStore::new());
        let payments = Arc::new(payments::PaymentService::new(
            config.razorpay_key_secret.clone(),
        ));
        let auth = Arc::new(AuthService::new(
            config.jwt_secret.clone(),
            Duration::from_secs(config.jwt_expiration_secs),
            users.clone(),
        ));

        Self {
            pricing,
            coupons,
            quotes,
            membership,
            users,
            payments,
            auth,
        }
    }
}
