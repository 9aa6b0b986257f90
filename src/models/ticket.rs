use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// The seven registration passes on sale. Wire names are fixed: trailing
/// digits keep their own hyphen (`conference-day-1`), which a blanket
/// kebab-case rename would not produce, so each variant is named
/// explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum TicketType {
    #[serde(rename = "conference-day-1")]
    ConferenceDay1,
    #[serde(rename = "conference-day-2")]
    ConferenceDay2,
    #[serde(rename = "conference-full")]
    ConferenceFull,
    #[serde(rename = "tutorial-day-1")]
    TutorialDay1,
    #[serde(rename = "tutorial-day-2")]
    TutorialDay2,
    #[serde(rename = "tutorials-both")]
    TutorialsBoth,
    #[serde(rename = "main-conference-tutorials")]
    MainConferenceTutorials,
}

impl TicketType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConferenceDay1 => "conference-day-1",
            Self::ConferenceDay2 => "conference-day-2",
            Self::ConferenceFull => "conference-full",
            Self::TutorialDay1 => "tutorial-day-1",
            Self::TutorialDay2 => "tutorial-day-2",
            Self::TutorialsBoth => "tutorials-both",
            Self::MainConferenceTutorials => "main-conference-tutorials",
        }
    }
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bulk registration bundles for institutions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum PackageType {
    #[serde(rename = "corporate-5")]
    Corporate5,
    #[serde(rename = "corporate-10")]
    Corporate10,
    #[serde(rename = "university-10")]
    University10,
    #[serde(rename = "university-25")]
    University25,
}

impl PackageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corporate5 => "corporate-5",
            Self::Corporate10 => "corporate-10",
            Self::University10 => "university-10",
            Self::University25 => "university-25",
        }
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attendee location drives both the price column and the currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    India,
    International,
}

impl Location {
    pub fn currency(&self) -> Currency {
        match self {
            Self::India => Currency::Inr,
            Self::International => Currency::Usd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Student,
    Author,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Inr,
    Usd,
}

impl Currency {
    /// ISO 4217 code, as rendered in discount ledger entries.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
        }
    }
}

/// The two pricing inputs that describe who is buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub location: Location,
    pub user_type: UserType,
}

/// When a pass is valid on site, with the label the front end displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub formatted_dates: String,
}

/// One resolved price quote. `applied_discounts` is a human-readable
/// ledger; surcharges (GST) appear there too, with a `+` sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub original_price: i64,
    pub currency: Currency,
    pub applied_discounts: Vec<String>,
    pub final_price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_dates: Option<EventDates>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_wire_names_keep_their_digit_hyphens() {
        assert_eq!(
            serde_json::to_value(TicketType::ConferenceDay1).unwrap(),
            "conference-day-1"
        );
        assert_eq!(
            serde_json::to_value(TicketType::MainConferenceTutorials).unwrap(),
            "main-conference-tutorials"
        );
        let parsed: TicketType = serde_json::from_str("\"tutorials-both\"").unwrap();
        assert_eq!(parsed, TicketType::TutorialsBoth);
    }

    #[test]
    fn display_matches_the_wire_name() {
        assert_eq!(TicketType::TutorialDay2.to_string(), "tutorial-day-2");
        assert_eq!(PackageType::University25.to_string(), "university-25");
    }

    #[test]
    fn location_determines_currency() {
        assert_eq!(Location::India.currency(), Currency::Inr);
        assert_eq!(Location::International.currency(), Currency::Usd);
        assert_eq!(Currency::Inr.code(), "INR");
        assert_eq!(Currency::Usd.symbol(), "$");
    }
}
