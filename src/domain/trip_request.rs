//! Validated itinerary request vocabulary.
//!
//! A [`TripRequest`] is the normalized form of a generation request after
//! endpoint-level validation: a destination, a whole-day duration, and one
//! of two request modes. The legacy mode carries only a budget tier; the
//! interest-led mode carries free-text interests plus style modifiers that
//! shape the prompt sent to the model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when a request option string is not a known value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown option: {0}")]
pub struct UnknownOption(pub String);

/// Budget tier for legacy budget-led requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BudgetTier {
    /// Low-cost picks, street food, free attractions.
    Economy,
    /// Mid-range picks.
    Standard,
    /// Premium hotels, fine dining, private tours.
    Luxury,
}

impl BudgetTier {
    /// Canonical spelling used in prompts and stored rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "Economy",
            Self::Standard => "Standard",
            Self::Luxury => "Luxury",
        }
    }
}

impl fmt::Display for BudgetTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BudgetTier {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Economy" => Ok(Self::Economy),
            "Standard" => Ok(Self::Standard),
            "Luxury" => Ok(Self::Luxury),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// Who is travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TravelStyle {
    /// One traveller.
    Solo,
    /// Two travellers.
    Couple,
    /// Travelling with children.
    Family,
    /// A group of friends.
    Friends,
}

impl TravelStyle {
    /// Canonical spelling used in prompts and stored rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "Solo",
            Self::Couple => "Couple",
            Self::Family => "Family",
            Self::Friends => "Friends",
        }
    }
}

impl fmt::Display for TravelStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelStyle {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Solo" => Ok(Self::Solo),
            "Couple" => Ok(Self::Couple),
            "Family" => Ok(Self::Family),
            "Friends" => Ok(Self::Friends),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// How densely each day should be packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Pace {
    /// Around two activities per day.
    Relaxed,
    /// Three to four activities per day.
    Balanced,
    /// Five or more activities per day.
    Intense,
}

impl Pace {
    /// Canonical spelling used in prompts and stored rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Relaxed => "Relaxed",
            Self::Balanced => "Balanced",
            Self::Intense => "Intense",
        }
    }

    /// Activities-per-day guideline injected into the generation prompt.
    #[must_use]
    pub const fn activities_per_day(&self) -> &'static str {
        match self {
            Self::Relaxed => "2",
            Self::Balanced => "3-4",
            Self::Intense => "5+",
        }
    }
}

impl fmt::Display for Pace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pace {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Relaxed" => Ok(Self::Relaxed),
            "Balanced" => Ok(Self::Balanced),
            "Intense" => Ok(Self::Intense),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// How the traveller gets around the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum TransportMode {
    /// Everything within walking distance.
    Walking,
    /// Metro, bus, and tram connections.
    #[serde(rename = "Public Transport")]
    PublicTransport,
    /// A rental car, allowing day trips.
    #[serde(rename = "Rental Car")]
    RentalCar,
}

impl TransportMode {
    /// Canonical spelling used in prompts and stored rows.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "Walking",
            Self::PublicTransport => "Public Transport",
            Self::RentalCar => "Rental Car",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Walking" => Ok(Self::Walking),
            "Public Transport" => Ok(Self::PublicTransport),
            "Rental Car" => Ok(Self::RentalCar),
            other => Err(UnknownOption(other.to_string())),
        }
    }
}

/// Style modifiers carried by an interest-led request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestProfile {
    /// Free-text interests, e.g. "street food, jazz clubs, art museums".
    pub interests: String,
    /// Who is travelling.
    pub travel_style: TravelStyle,
    /// Daily activity density.
    pub pace: Pace,
    /// Assumed mode of transport between activities.
    pub transport: TransportMode,
    /// Optional dietary restrictions to respect in food picks.
    pub dietary_restrictions: Option<String>,
}

/// The two supported request modes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    /// Legacy budget-led request: destination, duration, and a tier.
    Budget(BudgetTier),
    /// Interest-led request with style modifiers.
    Interests(InterestProfile),
}

/// A validated itinerary generation request.
///
/// Produced by endpoint-level validation; by the time a value of this type
/// exists, the destination is non-empty and the duration is a whole number
/// of days, at least one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Where the trip takes place.
    pub destination: String,
    /// Trip length in days, at least 1.
    pub duration: u32,
    /// Budget-led or interest-led request contents.
    pub mode: GenerationMode,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_spellings() {
        assert_eq!(BudgetTier::from_str("Luxury"), Ok(BudgetTier::Luxury));
        assert_eq!(TravelStyle::from_str("Friends"), Ok(TravelStyle::Friends));
        assert_eq!(Pace::from_str("Intense"), Ok(Pace::Intense));
        assert_eq!(
            TransportMode::from_str("Public Transport"),
            Ok(TransportMode::PublicTransport)
        );
    }

    #[test]
    fn rejects_unknown_spellings() {
        assert!(BudgetTier::from_str("luxury").is_err());
        assert!(TravelStyle::from_str("Group").is_err());
        assert!(Pace::from_str("Chill").is_err());
        assert!(TransportMode::from_str("Bicycle").is_err());
    }

    #[test]
    fn pace_guidelines_scale_with_intensity() {
        assert_eq!(Pace::Relaxed.activities_per_day(), "2");
        assert_eq!(Pace::Balanced.activities_per_day(), "3-4");
        assert_eq!(Pace::Intense.activities_per_day(), "5+");
    }

    #[test]
    fn transport_serde_uses_spaced_names() {
        let json = serde_json::to_string(&TransportMode::RentalCar).ok();
        assert_eq!(json.as_deref(), Some("\"Rental Car\""));
        let parsed: Option<TransportMode> = serde_json::from_str("\"Public Transport\"").ok();
        assert_eq!(parsed, Some(TransportMode::PublicTransport));
    }
}
