//! Coupon validation and redemption.
//!
//! Validation walks a fixed-order gate chain over a single catalog lookup;
//! the first failing gate short-circuits with a user-facing reason. Gate
//! failures are results, never errors. Redemption counts are live state
//! tracked here (seeded from the catalog), so the usage-limit gate reads
//! real numbers and `redeem` can enforce the cap atomically.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    catalog::Catalog,
    currency::format_amount,
    errors::ServiceError,
    models::{
        CouponCode, CouponValidationResult, Currency, DiscountType, Location, TicketType, UserType,
    },
    services::pricing::round_units,
};

#[derive(Clone)]
pub struct CouponService {
    catalog: Arc<Catalog>,
    /// Live redemption counts keyed by upper-cased code.
    redemptions: Arc<DashMap<String, u32>>,
}

impl CouponService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let redemptions = Arc::new(DashMap::new());
        for coupon in &catalog.coupons {
            redemptions.insert(coupon.code.to_ascii_uppercase(), coupon.used_count);
        }
        Self {
            catalog,
            redemptions,
        }
    }

    fn current_usage(&self, coupon: &CouponCode) -> u32 {
        self.redemptions
            .get(&coupon.code.to_ascii_uppercase())
            .map(|c| *c)
            .unwrap_or(coupon.used_count)
    }

    /// Validate a code against a purchase context, at the current instant.
    pub fn validate_coupon(
        &self,
        code: &str,
        ticket: TicketType,
        user_type: UserType,
        location: Location,
        base_amount: i64,
        currency: Currency,
    ) -> CouponValidationResult {
        self.validate_coupon_at(code, ticket, user_type, location, base_amount, currency, Utc::now())
    }

    /// Clock-pinned form of [`validate_coupon`](Self::validate_coupon).
    #[allow(clippy::too_many_arguments)]
    pub fn validate_coupon_at(
        &self,
        code: &str,
        ticket: TicketType,
        user_type: UserType,
        location: Location,
        base_amount: i64,
        currency: Currency,
        now: DateTime<Utc>,
    ) -> CouponValidationResult {
        let Some(coupon) = self.catalog.find_active_coupon(code) else {
            return CouponValidationResult::rejected("Invalid coupon code");
        };

        if now < coupon.valid_from {
            return CouponValidationResult::rejected("Coupon is not yet valid");
        }
        if now > coupon.valid_until {
            return CouponValidationResult::rejected("Coupon has expired");
        }

        if let Some(limit) = coupon.usage_limit {
            if self.current_usage(coupon) >= limit {
                return CouponValidationResult::rejected("Coupon usage limit reached");
            }
        }

        if let Some(minimum) = coupon.minimum_amount {
            if base_amount < minimum {
                return CouponValidationResult::rejected(format!(
                    "Minimum purchase of {} required for this coupon",
                    format_amount(minimum, currency)
                ));
            }
        }

        if let Some(tickets) = &coupon.applicable_ticket_types {
            if !tickets.contains(&ticket) {
                return CouponValidationResult::rejected(
                    "Coupon not applicable for this ticket type",
                );
            }
        }

        if let Some(user_types) = &coupon.applicable_user_types {
            if !user_types.contains(&user_type) {
                return CouponValidationResult::rejected("Coupon not applicable for your user type");
            }
        }

        if let Some(locations) = &coupon.applicable_locations {
            if !locations.contains(&location) {
                return CouponValidationResult::rejected("Coupon not applicable for your location");
            }
        }

        let (amount, percentage) = compute_discount(coupon, base_amount);
        debug!(code = %coupon.code, amount, "coupon accepted");
        CouponValidationResult::accepted(coupon.clone(), amount, percentage)
    }

    /// Coupons a purchaser might be eligible for, before an amount is
    /// known. Advisory only: the minimum-amount gate still runs at
    /// validation time and can reject a code listed here.
    pub fn get_applicable_coupons(
        &self,
        ticket: TicketType,
        user_type: UserType,
        location: Location,
    ) -> Vec<CouponCode> {
        self.get_applicable_coupons_at(ticket, user_type, location, Utc::now())
    }

    pub fn get_applicable_coupons_at(
        &self,
        ticket: TicketType,
        user_type: UserType,
        location: Location,
        now: DateTime<Utc>,
    ) -> Vec<CouponCode> {
        self.catalog
            .coupons
            .iter()
            .filter(|c| c.is_active)
            .filter(|c| now >= c.valid_from && now <= c.valid_until)
            .filter(|c| {
                c.usage_limit
                    .map_or(true, |limit| self.current_usage(c) < limit)
            })
            .filter(|c| {
                c.applicable_ticket_types
                    .as_ref()
                    .map_or(true, |ts| ts.contains(&ticket))
            })
            .filter(|c| {
                c.applicable_user_types
                    .as_ref()
                    .map_or(true, |uts| uts.contains(&user_type))
            })
            .filter(|c| {
                c.applicable_locations
                    .as_ref()
                    .map_or(true, |ls| ls.contains(&location))
            })
            .cloned()
            .collect()
    }

    /// Subtract a validated discount, flooring at zero. An invalid result
    /// leaves the amount untouched.
    pub fn apply_coupon_discount(&self, base_amount: i64, result: &CouponValidationResult) -> i64 {
        if result.is_valid {
            let discount = result.discount_amount.unwrap_or(0);
            (base_amount - discount).max(0)
        } else {
            base_amount
        }
    }

    /// Record one redemption, atomically guarded by the usage limit.
    /// Callers re-validate the full context first; this only enforces the
    /// count invariant (`used_count <= usage_limit`).
    pub fn redeem(&self, code: &str) -> Result<u32, ServiceError> {
        let coupon = self
            .catalog
            .find_active_coupon(code)
            .ok_or_else(|| ServiceError::NotFound(format!("coupon {code}")))?;

        let key = coupon.code.to_ascii_uppercase();
        let mut count = self
            .redemptions
            .entry(key)
            .or_insert(coupon.used_count);
        if let Some(limit) = coupon.usage_limit {
            if *count >= limit {
                return Err(ServiceError::CouponExhausted);
            }
        }
        *count += 1;
        Ok(*count)
    }
}

/// Gate 8: discount arithmetic. For percentage coupons the amount is
/// clamped to `maximum_discount` and the percentage re-derived from the
/// clamped amount, so the reported percentage always matches the money
/// actually taken off. Fixed discounts are not clamped to the base; the
/// downstream floor at zero is the only over-discount protection.
fn compute_discount(coupon: &CouponCode, base_amount: i64) -> (i64, i64) {
    match coupon.discount_type {
        DiscountType::Percentage => {
            let raw = round_units(
                Decimal::from(base_amount) * Decimal::from(coupon.discount_value)
                    / Decimal::from(100),
            );
            match coupon.maximum_discount {
                Some(max) if raw > max => (max, percentage_of(max, base_amount)),
                _ => (raw, coupon.discount_value),
            }
        }
        DiscountType::Fixed => {
            let amount = coupon.discount_value;
            (amount, percentage_of(amount, base_amount))
        }
    }
}

fn percentage_of(amount: i64, base_amount: i64) -> i64 {
    if base_amount <= 0 {
        return 0;
    }
    round_units(Decimal::from(amount) * Decimal::from(100) / Decimal::from(base_amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> CouponService {
        CouponService::new(Arc::new(Catalog::default()))
    }

    /// Mid-2024, inside every regular coupon window.
    fn june() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn validate(
        svc: &CouponService,
        code: &str,
        ticket: TicketType,
        user_type: UserType,
        location: Location,
        base: i64,
    ) -> CouponValidationResult {
        let currency = location.currency();
        svc.validate_coupon_at(code, ticket, user_type, location, base, currency, june())
    }

    #[test]
    fn early_bird_applies_fifteen_percent() {
        let svc = service();
        let result = validate(
            &svc,
            "EARLYBIRD2024",
            TicketType::ConferenceDay1,
            UserType::Student,
            Location::India,
            12000,
        );
        assert!(result.is_valid);
        assert_eq!(result.discount_amount, Some(1800));
        assert_eq!(result.discount_percentage, Some(15));
    }

    #[test]
    fn percentage_clamp_recomputes_percentage() {
        let svc = service();
        // 15% of 20000 is 3000, above the 2000 cap.
        let result = validate(
            &svc,
            "EARLYBIRD2024",
            TicketType::ConferenceFull,
            UserType::Regular,
            Location::India,
            20000,
        );
        assert!(result.is_valid);
        assert_eq!(result.discount_amount, Some(2000));
        assert_eq!(result.discount_percentage, Some(10));
    }

    #[test]
    fn save500_is_india_only() {
        let svc = service();
        let result = validate(
            &svc,
            "SAVE500",
            TicketType::ConferenceFull,
            UserType::Regular,
            Location::International,
            10000,
        );
        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Coupon not applicable for your location")
        );
    }

    #[test]
    fn save500_enforces_minimum_with_symbol() {
        let svc = service();
        let result = validate(
            &svc,
            "SAVE500",
            TicketType::TutorialDay1,
            UserType::Regular,
            Location::India,
            3540,
        );
        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Minimum purchase of ₹5,000 required for this coupon")
        );
    }

    #[test]
    fn unknown_and_inactive_codes_are_invalid() {
        let svc = service();
        for code in ["DOESNOTEXIST", "VIPFREE"] {
            let result = validate(
                &svc,
                code,
                TicketType::ConferenceDay1,
                UserType::Regular,
                Location::India,
                10000,
            );
            assert!(!result.is_valid);
            assert_eq!(result.error.as_deref(), Some("Invalid coupon code"));
        }
    }

    #[test]
    fn expired_coupon_is_rejected_regardless_of_context() {
        let svc = service();
        let result = validate(
            &svc,
            "SUMMER2023",
            TicketType::MainConferenceTutorials,
            UserType::Student,
            Location::India,
            50000,
        );
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Coupon has expired"));
    }

    #[test]
    fn future_coupon_is_not_yet_valid() {
        let svc = service();
        let result = validate(
            &svc,
            "ONSITE2024",
            TicketType::ConferenceDay1,
            UserType::Regular,
            Location::India,
            10000,
        );
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Coupon is not yet valid"));
    }

    #[test]
    fn codes_match_case_insensitively() {
        let svc = service();
        let result = validate(
            &svc,
            "earlybird2024",
            TicketType::ConferenceDay1,
            UserType::Regular,
            Location::India,
            10000,
        );
        assert!(result.is_valid);
    }

    #[test]
    fn student_coupon_rejects_other_user_types() {
        let svc = service();
        let result = validate(
            &svc,
            "STUDENT20",
            TicketType::ConferenceFull,
            UserType::Regular,
            Location::India,
            14160,
        );
        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Coupon not applicable for your user type")
        );
    }

    #[test]
    fn ticket_restricted_coupon_rejects_day_passes() {
        let svc = service();
        let result = validate(
            &svc,
            "IEEE25",
            TicketType::TutorialDay1,
            UserType::Regular,
            Location::India,
            3540,
        );
        assert!(!result.is_valid);
        assert_eq!(
            result.error.as_deref(),
            Some("Coupon not applicable for this ticket type")
        );
    }

    #[test]
    fn fixed_discount_may_exceed_base_but_floor_holds() {
        let svc = service();
        let result = validate(
            &svc,
            "SAVE500",
            TicketType::TutorialDay1,
            UserType::Regular,
            Location::India,
            5000,
        );
        assert!(result.is_valid);
        assert_eq!(result.discount_amount, Some(500));
        // Percentage is informational for fixed discounts.
        assert_eq!(result.discount_percentage, Some(10));
        assert_eq!(svc.apply_coupon_discount(5000, &result), 4500);
        assert_eq!(svc.apply_coupon_discount(300, &result), 0);
    }

    #[test]
    fn invalid_result_leaves_amount_untouched() {
        let svc = service();
        let rejected = CouponValidationResult::rejected("Invalid coupon code");
        assert_eq!(svc.apply_coupon_discount(1234, &rejected), 1234);
    }

    #[test]
    fn applicable_coupons_skip_amount_gate() {
        let svc = service();
        let applicable = svc.get_applicable_coupons_at(
            TicketType::TutorialDay1,
            UserType::Student,
            Location::India,
            june(),
        );
        let codes: Vec<&str> = applicable.iter().map(|c| c.code.as_str()).collect();
        // SAVE500 appears even though a tutorial day pass can never meet
        // its minimum; the listing is a hint, not a guarantee.
        assert!(codes.contains(&"SAVE500"));
        assert!(codes.contains(&"EARLYBIRD2024"));
        assert!(codes.contains(&"STUDENT20"));
        // Ticket-restricted, future, expired, and inactive codes are out.
        assert!(!codes.contains(&"IEEE25"));
        assert!(!codes.contains(&"ONSITE2024"));
        assert!(!codes.contains(&"SUMMER2023"));
        assert!(!codes.contains(&"VIPFREE"));
    }

    #[test]
    fn applicable_coupons_filter_user_type() {
        let svc = service();
        let applicable = svc.get_applicable_coupons_at(
            TicketType::ConferenceFull,
            UserType::Regular,
            Location::International,
            june(),
        );
        let codes: Vec<&str> = applicable.iter().map(|c| c.code.as_str()).collect();
        assert!(!codes.contains(&"STUDENT20"));
        assert!(!codes.contains(&"SAVE500")); // india only
        assert!(codes.contains(&"IEEE25"));
    }

    #[test]
    fn redeem_increments_until_the_limit() {
        let catalog = Catalog {
            coupons: vec![CouponCode {
                code: "ALMOSTGONE".to_string(),
                description: "two uses left".to_string(),
                discount_type: DiscountType::Fixed,
                discount_value: 100,
                minimum_amount: None,
                maximum_discount: None,
                valid_from: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
                valid_until: Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap(),
                usage_limit: Some(5),
                used_count: 3,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            }],
            ..Catalog::default()
        };
        let svc = CouponService::new(Arc::new(catalog));

        assert_eq!(svc.redeem("almostgone").unwrap(), 4);
        assert_eq!(svc.redeem("ALMOSTGONE").unwrap(), 5);
        assert!(matches!(
            svc.redeem("ALMOSTGONE"),
            Err(ServiceError::CouponExhausted)
        ));

        // The usage-limit gate now rejects validation too.
        let result = svc.validate_coupon_at(
            "ALMOSTGONE",
            TicketType::ConferenceDay1,
            UserType::Regular,
            Location::India,
            10000,
            Currency::Inr,
            june(),
        );
        assert!(!result.is_valid);
        assert_eq!(result.error.as_deref(), Some("Coupon usage limit reached"));
    }

    #[test]
    fn redeem_unknown_code_is_not_found() {
        let svc = service();
        assert!(matches!(
            svc.redeem("NOPE"),
            Err(ServiceError::NotFound(_))
        ));
    }
}
