use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ticket::{Location, TicketType, UserType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

/// A named, time-boxed, eligibility-gated discount rule. Catalog entries
/// are immutable; the live redemption count is tracked separately by the
/// coupon service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponCode {
    /// Unique, matched case-insensitively.
    pub code: String,
    pub description: String,
    pub discount_type: DiscountType,
    /// Percent for `Percentage`, whole currency units for `Fixed`.
    pub discount_value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_discount: Option<i64>,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_limit: Option<u32>,
    pub used_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_ticket_types: Option<Vec<TicketType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_user_types: Option<Vec<UserType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicable_locations: Option<Vec<Location>>,
    pub is_active: bool,
}

/// Outcome of walking the validation gate chain for one code. Gate
/// failures are results, not errors: they carry `is_valid = false` and a
/// user-facing reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidationResult {
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon: Option<CouponCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i64>,
}

impl CouponValidationResult {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(reason.into()),
            coupon: None,
            discount_amount: None,
            discount_percentage: None,
        }
    }

    pub fn accepted(coupon: CouponCode, discount_amount: i64, discount_percentage: i64) -> Self {
        Self {
            is_valid: true,
            error: None,
            coupon: Some(coupon),
            discount_amount: Some(discount_amount),
            discount_percentage: Some(discount_percentage),
        }
    }
}
