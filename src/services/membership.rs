//! Mock IEEE membership verification.
//!
//! Looks the requester up in the catalog's static member directory after a
//! fixed artificial delay, standing in for the real verification API. The
//! discount it reports is fed into quote composition; it is not a coupon
//! and never passes through the coupon gate chain.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipLookup {
    pub email: Option<String>,
    pub membership_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipVerification {
    pub is_member: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_eligible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<i64>,
}

impl MembershipVerification {
    fn non_member() -> Self {
        Self {
            is_member: false,
            membership_level: None,
            discount_eligible: None,
            discount_percentage: None,
        }
    }
}

#[derive(Clone)]
pub struct MembershipService {
    catalog: Arc<Catalog>,
    delay: Duration,
}

impl MembershipService {
    pub fn new(catalog: Arc<Catalog>, delay: Duration) -> Self {
        Self { catalog, delay }
    }

    pub async fn verify(&self, lookup: MembershipLookup) -> MembershipVerification {
        // Simulated upstream latency.
        tokio::time::sleep(self.delay).await;

        let record = self.catalog.members.iter().find(|m| {
            lookup
                .email
                .as_deref()
                .is_some_and(|e| m.email.eq_ignore_ascii_case(e))
                || lookup
                    .membership_id
                    .as_deref()
                    .is_some_and(|id| m.membership_id == id)
        });

        match record {
            Some(member) => {
                debug!(email = %member.email, "membership verified");
                MembershipVerification {
                    is_member: true,
                    membership_level: Some(member.membership_level.clone()),
                    discount_eligible: Some(true),
                    discount_percentage: Some(member.discount_percentage),
                }
            }
            None => MembershipVerification::non_member(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> MembershipService {
        MembershipService::new(Arc::new(Catalog::default()), Duration::from_millis(0))
    }

    #[tokio::test]
    async fn known_email_verifies() {
        let result = service()
            .verify(MembershipLookup {
                email: Some("A.Lovelace@ieee.org".to_string()),
                membership_id: None,
            })
            .await;
        assert!(result.is_member);
        assert_eq!(result.membership_level.as_deref(), Some("Member"));
        assert_eq!(result.discount_percentage, Some(10));
    }

    #[tokio::test]
    async fn known_membership_id_verifies() {
        let result = service()
            .verify(MembershipLookup {
                email: None,
                membership_id: Some("90012345".to_string()),
            })
            .await;
        assert!(result.is_member);
        assert_eq!(result.membership_level.as_deref(), Some("Student Member"));
        assert_eq!(result.discount_percentage, Some(15));
    }

    #[tokio::test]
    async fn unknown_requester_is_not_a_member() {
        let result = service()
            .verify(MembershipLookup {
                email: Some("nobody@example.com".to_string()),
                membership_id: None,
            })
            .await;
        assert!(!result.is_member);
        assert!(result.membership_level.is_none());
        assert!(result.discount_percentage.is_none());
    }

    #[tokio::test]
    async fn empty_lookup_is_not_a_member() {
        let result = service().verify(MembershipLookup::default()).await;
        assert!(!result.is_member);
    }
}
