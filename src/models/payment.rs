use serde::{Deserialize, Serialize};

use super::ticket::Currency;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentProvider {
    Razorpay,
    Stripe,
}

impl std::fmt::Display for PaymentProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Razorpay => f.write_str("razorpay"),
            Self::Stripe => f.write_str("stripe"),
        }
    }
}

/// A gateway-shaped payment request, ready to hand to the provider SDK.
/// Amounts are in minor units (paise/cents); this service prepares the
/// payload but never talks to the gateway itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub provider: PaymentProvider,
    /// `order_…` for Razorpay, `pi_…` for Stripe.
    pub intent_id: String,
    pub amount_minor: i64,
    pub currency: Currency,
    /// Stripe-style client secret; absent for Razorpay orders.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    /// Razorpay-style receipt reference; absent for Stripe intents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    pub metadata: serde_json::Value,
}
