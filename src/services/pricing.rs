//! Price resolution: price-table lookup plus the GST surcharge rule.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use strum::IntoEnumIterator;

use crate::{
    catalog::Catalog,
    errors::ServiceError,
    models::{Location, PackageType, PricingResult, TicketType, UserProfile},
};

/// Round to whole currency units, half away from zero. All quoted amounts
/// in this system are integers; this mirrors the rounding the registration
/// front end has always shown.
pub(crate) fn round_units(value: Decimal) -> i64 {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}

#[derive(Clone)]
pub struct PricingService {
    catalog: Arc<Catalog>,
}

impl PricingService {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    fn gst_amount(&self, base: i64) -> i64 {
        round_units(Decimal::from(base) * self.catalog.gst_rate)
    }

    fn gst_percent_label(&self) -> String {
        (self.catalog.gst_rate * Decimal::from(100)).normalize().to_string()
    }

    /// Resolve a quote for one ticket. Pure: same inputs always produce
    /// the same result. A missing table entry is a programmer error and
    /// fails fast rather than quoting nothing.
    pub fn calculate_pricing(
        &self,
        ticket: TicketType,
        profile: UserProfile,
    ) -> Result<PricingResult, ServiceError> {
        let prices = self
            .catalog
            .ticket_prices(ticket)
            .ok_or_else(|| ServiceError::MissingPrice(format!("ticket type {ticket}")))?;
        let base = prices
            .for_location(profile.location)
            .for_user_type(profile.user_type);
        let currency = profile.location.currency();

        let mut applied_discounts = Vec::new();
        let final_price = match profile.location {
            Location::India => {
                let gst = self.gst_amount(base);
                applied_discounts.push(format!(
                    "GST ({}%): +{} {}",
                    self.gst_percent_label(),
                    gst,
                    currency.code()
                ));
                base + gst
            }
            Location::International => base,
        };

        Ok(PricingResult {
            original_price: base,
            currency,
            applied_discounts,
            final_price,
            event_dates: self.catalog.event_dates(ticket).cloned(),
        })
    }

    /// Bulk packages are sold to Indian institutions only, so the quote is
    /// always INR with GST, regardless of who asks.
    pub fn calculate_package_pricing(
        &self,
        package: PackageType,
    ) -> Result<PricingResult, ServiceError> {
        let def = self
            .catalog
            .package(package)
            .ok_or_else(|| ServiceError::MissingPrice(format!("package {package}")))?;
        let base = def.price_inr;
        let currency = Location::India.currency();
        let gst = self.gst_amount(base);

        Ok(PricingResult {
            original_price: base,
            currency,
            applied_discounts: vec![format!(
                "GST ({}%): +{} {}",
                self.gst_percent_label(),
                gst,
                currency.code()
            )],
            final_price: base + gst,
            event_dates: None,
        })
    }

    /// Quote every ticket type for one profile.
    pub fn get_all_pricing(
        &self,
        profile: UserProfile,
    ) -> Result<HashMap<TicketType, PricingResult>, ServiceError> {
        let mut all = HashMap::new();
        for ticket in TicketType::iter() {
            all.insert(ticket, self.calculate_pricing(ticket, profile)?);
        }
        Ok(all)
    }
}
