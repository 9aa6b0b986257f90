//! Atomic quote composition.
//!
//! The registration front end historically subtracted the coupon discount
//! and the membership discount from the same base price in two separate
//! code paths, with nothing but UI sequencing preventing double-counting.
//! Here both sources feed one quote under an explicit, configured
//! stacking policy, and the result carries a single ledger of everything
//! that was applied.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    config::DiscountStacking,
    errors::ServiceError,
    models::{
        CouponValidationResult, Currency, Location, PricingResult, TicketType, UserProfile,
        UserType,
    },
    services::{
        coupons::CouponService,
        membership::{MembershipLookup, MembershipService, MembershipVerification},
        pricing::{round_units, PricingService},
    },
};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub ticket_type: TicketType,
    pub location: Location,
    pub user_type: UserType,
    #[serde(default)]
    pub coupon_code: Option<String>,
    #[serde(default)]
    pub membership: Option<MembershipLookup>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub ticket_type: TicketType,
    pub pricing: PricingResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponValidationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<MembershipVerification>,
    pub stacking: DiscountStacking,
    /// Discount ledger, in application order. GST stays in
    /// `pricing.applied_discounts`.
    pub applied_discounts: Vec<String>,
    pub total_discount: i64,
    pub total: i64,
    pub currency: Currency,
}

#[derive(Clone)]
pub struct QuoteService {
    pricing: Arc<PricingService>,
    coupons: Arc<CouponService>,
    membership: Arc<MembershipService>,
    stacking: DiscountStacking,
}

impl QuoteService {
    pub fn new(
        pricing: Arc<PricingService>,
        coupons: Arc<CouponService>,
        membership: Arc<MembershipService>,
        stacking: DiscountStacking,
    ) -> Self {
        Self {
            pricing,
            coupons,
            membership,
            stacking,
        }
    }

    pub async fn quote(&self, request: QuoteRequest) -> Result<Quote, ServiceError> {
        self.quote_at(request, Utc::now()).await
    }

    /// Clock-pinned form of [`quote`](Self::quote); coupon windows are
    /// evaluated at `now`.
    pub async fn quote_at(
        &self,
        request: QuoteRequest,
        now: DateTime<Utc>,
    ) -> Result<Quote, ServiceError> {
        let profile = UserProfile {
            location: request.location,
            user_type: request.user_type,
        };
        let pricing = self.pricing.calculate_pricing(request.ticket_type, profile)?;
        let base = pricing.final_price;
        let currency = pricing.currency;

        let coupon = request.coupon_code.as_deref().map(|code| {
            self.coupons.validate_coupon_at(
                code,
                request.ticket_type,
                request.user_type,
                request.location,
                base,
                currency,
                now,
            )
        });
        let membership = match request.membership {
            Some(lookup) => Some(self.membership.verify(lookup).await),
            None => None,
        };

        let coupon_amount = coupon
            .as_ref()
            .filter(|c| c.is_valid)
            .and_then(|c| c.discount_amount)
            .unwrap_or(0);
        let member_percent = membership
            .as_ref()
            .filter(|m| m.is_member && m.discount_eligible.unwrap_or(false))
            .and_then(|m| m.discount_percentage)
            .unwrap_or(0);

        let mut applied_discounts = Vec::new();
        let coupon_label = |amount: i64| {
            format!(
                "Coupon {}: -{} {}",
                request.coupon_code.as_deref().unwrap_or("").to_ascii_uppercase(),
                amount,
                currency.code()
            )
        };
        let member_label = |amount: i64| {
            format!(
                "IEEE member discount ({member_percent}%): -{amount} {}",
                currency.code()
            )
        };

        let total_discount = match self.stacking {
            DiscountStacking::Additive => {
                let member_amount = percent_of(base, member_percent);
                if coupon_amount > 0 {
                    applied_discounts.push(coupon_label(coupon_amount));
                }
                if member_amount > 0 {
                    applied_discounts.push(member_label(member_amount));
                }
                coupon_amount + member_amount
            }
            DiscountStacking::Sequential => {
                let after_coupon = (base - coupon_amount).max(0);
                let member_amount = percent_of(after_coupon, member_percent);
                if coupon_amount > 0 {
                    applied_discounts.push(coupon_label(coupon_amount));
                }
                if member_amount > 0 {
                    applied_discounts.push(member_label(member_amount));
                }
                coupon_amount + member_amount
            }
            DiscountStacking::BestOnly => {
                let member_amount = percent_of(base, member_percent);
                // Ties go to the coupon: it was explicitly entered.
                if coupon_amount >= member_amount && coupon_amount > 0 {
                    applied_discounts.push(coupon_label(coupon_amount));
                    coupon_amount
                } else if member_amount > 0 {
                    applied_discounts.push(member_label(member_amount));
                    member_amount
                } else {
                    0
                }
            }
        };

        let total = (base - total_discount).max(0);
        info!(
            ticket = %request.ticket_type,
            base,
            total_discount,
            total,
            stacking = ?self.stacking,
            "quote composed"
        );

        Ok(Quote {
            ticket_type: request.ticket_type,
            pricing,
            coupon,
            membership,
            stacking: self.stacking,
            applied_discounts,
            total_discount,
            total,
            currency,
        })
    }
}

fn percent_of(base: i64, percent: i64) -> i64 {
    if base <= 0 || percent <= 0 {
        return 0;
    }
    round_units(Decimal::from(base) * Decimal::from(percent) / Decimal::from(100))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use chrono::TimeZone;
    use std::time::Duration;

    fn service(stacking: DiscountStacking) -> QuoteService {
        let catalog = Arc::new(Catalog::default());
        QuoteService::new(
            Arc::new(PricingService::new(catalog.clone())),
            Arc::new(CouponService::new(catalog.clone())),
            Arc::new(MembershipService::new(catalog, Duration::from_millis(0))),
            stacking,
        )
    }

    fn june() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn request_with_both() -> QuoteRequest {
        QuoteRequest {
            ticket_type: TicketType::ConferenceFull,
            location: Location::India,
            user_type: UserType::Regular,
            coupon_code: Some("EARLYBIRD2024".to_string()),
            membership: Some(MembershipLookup {
                email: Some("a.lovelace@ieee.org".to_string()),
                membership_id: None,
            }),
        }
    }

    // Base for ConferenceFull india: 12000 + 2160 GST = 14160.
    // EARLYBIRD2024: 15% of 14160 = 2124, above the 2000 cap -> 2000.
    // Membership: 10% of 14160 = 1416.

    #[tokio::test]
    async fn best_only_takes_the_larger_discount() {
        let quote = service(DiscountStacking::BestOnly)
            .quote_at(request_with_both(), june())
            .await
            .unwrap();
        assert_eq!(quote.pricing.final_price, 14160);
        assert_eq!(quote.total_discount, 2000);
        assert_eq!(quote.total, 12160);
        assert_eq!(quote.applied_discounts.len(), 1);
        assert!(quote.applied_discounts[0].starts_with("Coupon EARLYBIRD2024"));
    }

    #[tokio::test]
    async fn additive_sums_both_on_the_resolved_price() {
        let quote = service(DiscountStacking::Additive)
            .quote_at(request_with_both(), june())
            .await
            .unwrap();
        assert_eq!(quote.total_discount, 2000 + 1416);
        assert_eq!(quote.total, 14160 - 3416);
        assert_eq!(quote.applied_discounts.len(), 2);
    }

    #[tokio::test]
    async fn sequential_applies_membership_to_the_remainder() {
        let quote = service(DiscountStacking::Sequential)
            .quote_at(request_with_both(), june())
            .await
            .unwrap();
        // 14160 - 2000 = 12160; 10% of that is 1216.
        assert_eq!(quote.total_discount, 2000 + 1216);
        assert_eq!(quote.total, 14160 - 3216);
    }

    #[tokio::test]
    async fn invalid_coupon_still_quotes_with_membership_only() {
        let mut request = request_with_both();
        request.coupon_code = Some("SUMMER2023".to_string());
        let quote = service(DiscountStacking::BestOnly)
            .quote_at(request, june())
            .await
            .unwrap();
        let coupon = quote.coupon.unwrap();
        assert!(!coupon.is_valid);
        assert_eq!(coupon.error.as_deref(), Some("Coupon has expired"));
        assert_eq!(quote.total_discount, 1416);
        assert_eq!(quote.total, 14160 - 1416);
    }

    #[tokio::test]
    async fn plain_quote_has_no_discounts() {
        let request = QuoteRequest {
            ticket_type: TicketType::ConferenceDay1,
            location: Location::International,
            user_type: UserType::Author,
            coupon_code: None,
            membership: None,
        };
        let quote = service(DiscountStacking::Additive)
            .quote_at(request, june())
            .await
            .unwrap();
        assert_eq!(quote.total, 75);
        assert_eq!(quote.total_discount, 0);
        assert!(quote.applied_discounts.is_empty());
        assert!(quote.coupon.is_none());
        assert!(quote.membership.is_none());
    }

    #[tokio::test]
    async fn quote_total_never_goes_negative() {
        // Fixed SAVE500 against the cheapest india ticket after a large
        // membership discount still floors at zero rather than refunding.
        let catalog = Arc::new(Catalog::default());
        let svc = QuoteService::new(
            Arc::new(PricingService::new(catalog.clone())),
            Arc::new(CouponService::new(catalog.clone())),
            Arc::new(MembershipService::new(catalog, Duration::from_millis(0))),
            DiscountStacking::Additive,
        );
        let request = QuoteRequest {
            ticket_type: TicketType::TutorialDay1,
            location: Location::India,
            user_type: UserType::Student,
            coupon_code: Some("STUDENT20".to_string()),
            membership: Some(MembershipLookup {
                email: Some("s.ramanujan@university.edu".to_string()),
                membership_id: None,
            }),
        };
        let quote = svc.quote_at(request, june()).await.unwrap();
        assert!(quote.total >= 0);
        assert!(quote.total <= quote.pricing.final_price);
    }
}
