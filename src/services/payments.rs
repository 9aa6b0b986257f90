//! Payment-intent preparation for the two supported gateways.
//!
//! This service shapes requests the way the provider SDKs expect (amounts
//! in minor units, provider-style identifiers) and verifies Razorpay's
//! callback signature. It never calls a gateway: identifiers are generated
//! locally, matching the mock checkout the registration flow runs against.

use hmac::{Hmac, Mac};
use rand::{distributions::Alphanumeric, Rng};
use sha2::Sha256;
use tracing::warn;
use uuid::Uuid;

use crate::{
    errors::ServiceError,
    models::{Currency, PaymentIntent, PaymentProvider},
};

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct PaymentService {
    razorpay_key_secret: String,
}

impl PaymentService {
    pub fn new(razorpay_key_secret: String) -> Self {
        Self { razorpay_key_secret }
    }

    /// Build a gateway-shaped intent for a quoted amount in whole currency
    /// units. Both INR and USD convert to minor units at x100.
    pub fn create_intent(
        &self,
        provider: PaymentProvider,
        amount: i64,
        currency: Currency,
        metadata: serde_json::Value,
    ) -> Result<PaymentIntent, ServiceError> {
        if amount <= 0 {
            return Err(ServiceError::PaymentFailed(format!(
                "amount must be positive, got {amount}"
            )));
        }
        let amount_minor = amount * 100;

        let intent = match provider {
            PaymentProvider::Razorpay => PaymentIntent {
                provider,
                intent_id: format!("order_{}", random_token(14)),
                amount_minor,
                currency,
                client_secret: None,
                receipt: Some(format!("rcpt_{}", Uuid::new_v4().simple())),
                metadata,
            },
            PaymentProvider::Stripe => {
                let id = format!("pi_{}", random_token(24));
                let client_secret = format!("{}_secret_{}", id, random_token(24));
                PaymentIntent {
                    provider,
                    intent_id: id,
                    amount_minor,
                    currency,
                    client_secret: Some(client_secret),
                    receipt: None,
                    metadata,
                }
            }
        };
        Ok(intent)
    }

    /// Razorpay signs its checkout callback with HMAC-SHA256 over
    /// `"{order_id}|{payment_id}"` using the shared key secret.
    pub fn verify_razorpay_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, ServiceError> {
        let mut mac = HmacSha256::new_from_slice(self.razorpay_key_secret.as_bytes())
            .map_err(|e| ServiceError::InternalError(format!("hmac init: {e}")))?;
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());
        let ok = constant_time_eq(&expected, signature);
        if !ok {
            warn!(order_id, payment_id, "razorpay signature mismatch");
        }
        Ok(ok)
    }
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut res = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        res |= x ^ y;
    }
    res == 0
}
