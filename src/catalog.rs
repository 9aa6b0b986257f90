//! Static registration data: the price table, bulk packages, event dates,
//! the GST rule, the coupon catalog, and the mock membership directory.
//!
//! Everything here is immutable after construction. Services receive a
//! shared [`Catalog`] at build time instead of reading module-level
//! globals, so tests can run against alternate datasets.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    CouponCode, DiscountType, EventDates, Location, PackageType, TicketType, UserType,
};

/// Per-user-type prices for one (ticket, location) cell. The three tiers
/// currently carry the same number for every ticket; the dimension exists
/// so a future differentiated price drop does not change the lookup shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierPrices {
    pub student: i64,
    pub author: i64,
    pub regular: i64,
}

impl TierPrices {
    pub const fn flat(amount: i64) -> Self {
        Self {
            student: amount,
            author: amount,
            regular: amount,
        }
    }

    pub fn for_user_type(&self, user_type: UserType) -> i64 {
        match user_type {
            UserType::Student => self.student,
            UserType::Author => self.author,
            UserType::Regular => self.regular,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPrices {
    pub india: TierPrices,
    pub international: TierPrices,
}

impl TicketPrices {
    pub fn for_location(&self, location: Location) -> &TierPrices {
        match location {
            Location::India => &self.india,
            Location::International => &self.international,
        }
    }
}

/// A corporate/university bulk registration bundle. Packages are sold to
/// Indian institutions only, so GST always applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDef {
    pub label: String,
    pub seats: u32,
    /// Whole rupees, before GST.
    pub price_inr: i64,
}

/// One entry in the mock IEEE membership directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    pub email: String,
    pub membership_id: String,
    pub membership_level: String,
    pub discount_percentage: i64,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub gst_rate: Decimal,
    pub prices: HashMap<TicketType, TicketPrices>,
    pub packages: HashMap<PackageType, PackageDef>,
    pub event_dates: HashMap<TicketType, EventDates>,
    pub coupons: Vec<CouponCode>,
    pub members: Vec<MemberRecord>,
}

impl Catalog {
    pub fn ticket_prices(&self, ticket: TicketType) -> Option<&TicketPrices> {
        self.prices.get(&ticket)
    }

    pub fn package(&self, package: PackageType) -> Option<&PackageDef> {
        self.packages.get(&package)
    }

    pub fn event_dates(&self, ticket: TicketType) -> Option<&EventDates> {
        self.event_dates.get(&ticket)
    }

    /// Case-insensitive coupon lookup, active entries only.
    pub fn find_active_coupon(&self, code: &str) -> Option<&CouponCode> {
        self.coupons
            .iter()
            .find(|c| c.is_active && c.code.eq_ignore_ascii_case(code))
    }
}

fn utc_midnight(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    // Catalog boundaries are UTC midnights; validation compares instants.
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .expect("valid calendar date")
}

fn naive(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

fn dates(start: NaiveDate, end: NaiveDate, formatted: &str) -> EventDates {
    EventDates {
        start_date: start,
        end_date: end,
        formatted_dates: formatted.to_string(),
    }
}

impl Default for Catalog {
    fn default() -> Self {
        let prices = HashMap::from([
            (
                TicketType::ConferenceDay1,
                TicketPrices {
                    india: TierPrices::flat(6000),
                    international: TierPrices::flat(75),
                },
            ),
            (
                TicketType::ConferenceDay2,
                TicketPrices {
                    india: TierPrices::flat(6000),
                    international: TierPrices::flat(75),
                },
            ),
            (
                TicketType::ConferenceFull,
                TicketPrices {
                    india: TierPrices::flat(12000),
                    international: TierPrices::flat(150),
                },
            ),
            (
                TicketType::TutorialDay1,
                TicketPrices {
                    india: TierPrices::flat(3000),
                    international: TierPrices::flat(40),
                },
            ),
            (
                TicketType::TutorialDay2,
                TicketPrices {
                    india: TierPrices::flat(3000),
                    international: TierPrices::flat(40),
                },
            ),
            (
                TicketType::TutorialsBoth,
                TicketPrices {
                    india: TierPrices::flat(4800),
                    international: TierPrices::flat(60),
                },
            ),
            (
                TicketType::MainConferenceTutorials,
                TicketPrices {
                    india: TierPrices::flat(14400),
                    international: TierPrices::flat(180),
                },
            ),
        ]);

        let packages = HashMap::from([
            (
                PackageType::Corporate5,
                PackageDef {
                    label: "Corporate package (5 delegates)".to_string(),
                    seats: 5,
                    price_inr: 54000,
                },
            ),
            (
                PackageType::Corporate10,
                PackageDef {
                    label: "Corporate package (10 delegates)".to_string(),
                    seats: 10,
                    price_inr: 100000,
                },
            ),
            (
                PackageType::University10,
                PackageDef {
                    label: "University package (10 students)".to_string(),
                    seats: 10,
                    price_inr: 40000,
                },
            ),
            (
                PackageType::University25,
                PackageDef {
                    label: "University package (25 students)".to_string(),
                    seats: 25,
                    price_inr: 90000,
                },
            ),
        ]);

        let event_dates = HashMap::from([
            (
                TicketType::TutorialDay1,
                dates(naive(2024, 12, 5), naive(2024, 12, 5), "Dec 5, 2024"),
            ),
            (
                TicketType::TutorialDay2,
                dates(naive(2024, 12, 6), naive(2024, 12, 6), "Dec 6, 2024"),
            ),
            (
                TicketType::TutorialsBoth,
                dates(naive(2024, 12, 5), naive(2024, 12, 6), "Dec 5-6, 2024"),
            ),
            (
                TicketType::ConferenceDay1,
                dates(naive(2024, 12, 7), naive(2024, 12, 7), "Dec 7, 2024"),
            ),
            (
                TicketType::ConferenceDay2,
                dates(naive(2024, 12, 8), naive(2024, 12, 8), "Dec 8, 2024"),
            ),
            (
                TicketType::ConferenceFull,
                dates(naive(2024, 12, 7), naive(2024, 12, 8), "Dec 7-8, 2024"),
            ),
            (
                TicketType::MainConferenceTutorials,
                dates(naive(2024, 12, 5), naive(2024, 12, 8), "Dec 5-8, 2024"),
            ),
        ]);

        let coupons = vec![
            CouponCode {
                code: "EARLYBIRD2024".to_string(),
                description: "Early bird discount, 15% off up to ₹2,000".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 15,
                minimum_amount: None,
                maximum_discount: Some(2000),
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 9, 30),
                usage_limit: Some(500),
                used_count: 132,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "SAVE500".to_string(),
                description: "Flat ₹500 off on purchases above ₹5,000".to_string(),
                discount_type: DiscountType::Fixed,
                discount_value: 500,
                minimum_amount: Some(5000),
                maximum_discount: None,
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 12, 31),
                usage_limit: None,
                used_count: 0,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: Some(vec![Location::India]),
                is_active: true,
            },
            CouponCode {
                code: "STUDENT20".to_string(),
                description: "Student discount, 20% off up to ₹3,000".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 20,
                minimum_amount: None,
                maximum_discount: Some(3000),
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 12, 31),
                usage_limit: None,
                used_count: 0,
                applicable_ticket_types: None,
                applicable_user_types: Some(vec![UserType::Student]),
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "IEEE25".to_string(),
                description: "25% off full-conference passes, up to ₹5,000".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 25,
                minimum_amount: None,
                maximum_discount: Some(5000),
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 12, 31),
                usage_limit: Some(200),
                used_count: 41,
                applicable_ticket_types: Some(vec![
                    TicketType::ConferenceFull,
                    TicketType::MainConferenceTutorials,
                ]),
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "WELCOME10".to_string(),
                description: "10% off for first-time attendees, up to ₹1,000".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 10,
                minimum_amount: None,
                maximum_discount: Some(1000),
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 12, 31),
                usage_limit: Some(1000),
                used_count: 215,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "ONSITE2024".to_string(),
                description: "Flat ₹300 off for on-site registration".to_string(),
                discount_type: DiscountType::Fixed,
                discount_value: 300,
                minimum_amount: None,
                maximum_discount: None,
                valid_from: utc_midnight(2024, 12, 5),
                valid_until: utc_midnight(2024, 12, 8),
                usage_limit: None,
                used_count: 0,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "SUMMER2023".to_string(),
                description: "10% off, summer 2023 campaign".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 10,
                minimum_amount: None,
                maximum_discount: None,
                valid_from: utc_midnight(2023, 6, 1),
                valid_until: utc_midnight(2023, 8, 31),
                usage_limit: None,
                used_count: 0,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: true,
            },
            CouponCode {
                code: "VIPFREE".to_string(),
                description: "Retired VIP pass, kept for audit history".to_string(),
                discount_type: DiscountType::Percentage,
                discount_value: 100,
                minimum_amount: None,
                maximum_discount: None,
                valid_from: utc_midnight(2024, 1, 1),
                valid_until: utc_midnight(2024, 12, 31),
                usage_limit: Some(10),
                used_count: 10,
                applicable_ticket_types: None,
                applicable_user_types: None,
                applicable_locations: None,
                is_active: false,
            },
        ];

        let members = vec![
            MemberRecord {
                email: "a.lovelace@ieee.org".to_string(),
                membership_id: "91234567".to_string(),
                membership_level: "Member".to_string(),
                discount_percentage: 10,
            },
            MemberRecord {
                email: "g.hopper@ieee.org".to_string(),
                membership_id: "95550123".to_string(),
                membership_level: "Senior Member".to_string(),
                discount_percentage: 10,
            },
            MemberRecord {
                email: "s.ramanujan@university.edu".to_string(),
                membership_id: "90012345".to_string(),
                membership_level: "Student Member".to_string(),
                discount_percentage: 15,
            },
        ];

        Self {
            gst_rate: dec!(0.18),
            prices,
            packages,
            event_dates,
            coupons,
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_ticket_type_has_prices_and_dates() {
        let catalog = Catalog::default();
        for ticket in TicketType::iter() {
            assert!(catalog.ticket_prices(ticket).is_some(), "{ticket}");
            assert!(catalog.event_dates(ticket).is_some(), "{ticket}");
        }
    }

    #[test]
    fn every_package_has_a_definition() {
        let catalog = Catalog::default();
        for package in PackageType::iter() {
            assert!(catalog.package(package).is_some(), "{package}");
        }
    }

    #[test]
    fn user_type_tiers_are_currently_flat() {
        // The three-way key exists for future differentiation; today every
        // tier resolves to the same number. A deliberate price change will
        // trip this and should update the assertion, not the table shape.
        let catalog = Catalog::default();
        for ticket in TicketType::iter() {
            let prices = catalog.ticket_prices(ticket).unwrap();
            for tier in [&prices.india, &prices.international] {
                assert_eq!(tier.student, tier.author);
                assert_eq!(tier.author, tier.regular);
            }
        }
    }

    #[test]
    fn coupon_lookup_is_case_insensitive_and_skips_inactive() {
        let catalog = Catalog::default();
        assert!(catalog.find_active_coupon("earlybird2024").is_some());
        assert!(catalog.find_active_coupon("EarlyBird2024").is_some());
        assert!(catalog.find_active_coupon("VIPFREE").is_none());
        assert!(catalog.find_active_coupon("NOPE").is_none());
    }
}
