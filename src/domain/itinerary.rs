//! Itinerary document model and model-output validation.
//!
//! The model is asked for a strict JSON document; this module owns the
//! typed shape of that document and the two validating constructors that
//! turn raw completion text into an [`Itinerary`]. Generation and
//! refinement share the document shape but classify defects differently:
//! a refinement response may carry an explicit "unclear request" marker
//! where a generation response may not.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Sentinel value the refinement prompt instructs the model to return
/// when the edit request cannot be understood.
pub const UNCLEAR_REQUEST_SENTINEL: &str = "unclear_request";

/// A single scheduled activity within a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Start time or time window, e.g. "09:00" or "Evening".
    pub time: String,
    /// What the traveller does.
    pub description: String,
    /// Where it happens, including street or neighborhood.
    pub location: String,
    /// Short cost estimate, e.g. "$18", "Free", "$45-60".
    pub estimated_cost: String,
}

/// One day of the itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryDay {
    /// 1-based day number.
    pub day: u32,
    /// Theme line for the day, e.g. "Old town and river walk".
    pub theme: String,
    /// Scheduled activities in display order.
    pub activities: Vec<Activity>,
}

/// A complete generated itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Itinerary {
    /// Display title for the trip.
    pub trip_name: String,
    /// Day plans in trip order.
    pub days: Vec<ItineraryDay>,
}

/// Why a model completion was rejected as an itinerary.
#[derive(Debug, thiserror::Error)]
pub enum ItineraryParseError {
    /// The completion text was not valid JSON at all.
    #[error("model output is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),
    /// The completion parsed as JSON but does not form a usable itinerary.
    #[error("model output does not match the itinerary shape: {0}")]
    IncompleteShape(String),
    /// The model explicitly reported that the edit request was unclear.
    #[error("model reported the request as unclear")]
    UnclearRequest,
}

impl Itinerary {
    /// Validates raw generation output into an [`Itinerary`].
    ///
    /// # Errors
    ///
    /// Returns [`ItineraryParseError::MalformedJson`] when the text is not
    /// JSON, and [`ItineraryParseError::IncompleteShape`] when it parses
    /// but lacks a trip name, has no days, or a day fails to match the
    /// expected fields.
    pub fn from_model_output(raw: &str) -> Result<Self, ItineraryParseError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(ItineraryParseError::MalformedJson)?;
        check_document_shape(&value)?;
        serde_json::from_value(value).map_err(|e| ItineraryParseError::IncompleteShape(e.to_string()))
    }

    /// Validates raw refinement output into an [`Itinerary`].
    ///
    /// # Errors
    ///
    /// Returns [`ItineraryParseError::UnclearRequest`] when the model
    /// answered with the unclear-request marker or omitted the trip
    /// name/days entirely, [`ItineraryParseError::MalformedJson`] when the
    /// text is not JSON, and [`ItineraryParseError::IncompleteShape`] when
    /// a present day fails to match the expected fields.
    pub fn from_refinement_output(raw: &str) -> Result<Self, ItineraryParseError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(ItineraryParseError::MalformedJson)?;
        if value.get("error").and_then(serde_json::Value::as_str) == Some(UNCLEAR_REQUEST_SENTINEL)
        {
            return Err(ItineraryParseError::UnclearRequest);
        }
        if check_document_shape(&value).is_err() {
            return Err(ItineraryParseError::UnclearRequest);
        }
        serde_json::from_value(value).map_err(|e| ItineraryParseError::IncompleteShape(e.to_string()))
    }
}

/// Checks the top-level document: a non-empty `tripName` string and a
/// non-empty `days` array. Day contents are validated by the typed parse.
fn check_document_shape(value: &serde_json::Value) -> Result<(), ItineraryParseError> {
    let trip_name = value.get("tripName").and_then(serde_json::Value::as_str);
    match trip_name {
        Some(name) if !name.is_empty() => {}
        _ => {
            return Err(ItineraryParseError::IncompleteShape(
                "missing or empty tripName".to_string(),
            ));
        }
    }
    match value.get("days").and_then(serde_json::Value::as_array) {
        Some(days) if !days.is_empty() => Ok(()),
        Some(_) => Err(ItineraryParseError::IncompleteShape(
            "days is empty".to_string(),
        )),
        None => Err(ItineraryParseError::IncompleteShape(
            "days missing or not a list".to_string(),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn three_day_document() -> String {
        let days: Vec<serde_json::Value> = (1..=3)
            .map(|day| {
                serde_json::json!({
                    "day": day,
                    "theme": format!("Day {day} theme"),
                    "activities": [{
                        "time": "09:00",
                        "description": "Walking tour",
                        "location": "Le Marais, Paris",
                        "estimatedCost": "Free",
                    }],
                })
            })
            .collect();
        serde_json::json!({ "tripName": "Paris in 3 Days", "days": days }).to_string()
    }

    #[test]
    fn accepts_well_formed_generation_output() {
        let Ok(itinerary) = Itinerary::from_model_output(&three_day_document()) else {
            panic!("expected valid itinerary");
        };
        assert_eq!(itinerary.trip_name, "Paris in 3 Days");
        assert_eq!(itinerary.days.len(), 3);
        let day_numbers: Vec<u32> = itinerary.days.iter().map(|d| d.day).collect();
        assert_eq!(day_numbers, vec![1, 2, 3]);
    }

    #[test]
    fn ignores_unknown_extra_fields() {
        let raw = r#"{
            "tripName": "Lisbon Weekend",
            "vibe": "sunny",
            "days": [{
                "day": 1,
                "theme": "Alfama",
                "mood": "chill",
                "activities": [{
                    "time": "10:00",
                    "description": "Tram 28 ride",
                    "location": "Martim Moniz",
                    "estimatedCost": "$4",
                    "rating": 5
                }]
            }]
        }"#;
        assert!(Itinerary::from_model_output(raw).is_ok());
    }

    #[test]
    fn rejects_non_json_output() {
        let result = Itinerary::from_model_output("Here is your itinerary: Day 1...");
        assert!(matches!(result, Err(ItineraryParseError::MalformedJson(_))));
    }

    #[test]
    fn rejects_missing_trip_name() {
        let raw = r#"{"days": [{"day": 1, "theme": "t", "activities": []}]}"#;
        let result = Itinerary::from_model_output(raw);
        assert!(matches!(result, Err(ItineraryParseError::IncompleteShape(_))));
    }

    #[test]
    fn rejects_empty_trip_name() {
        let raw = r#"{"tripName": "", "days": [{"day": 1, "theme": "t", "activities": []}]}"#;
        let result = Itinerary::from_model_output(raw);
        assert!(matches!(result, Err(ItineraryParseError::IncompleteShape(_))));
    }

    #[test]
    fn rejects_empty_or_missing_days() {
        for raw in [
            r#"{"tripName": "Rome"}"#,
            r#"{"tripName": "Rome", "days": []}"#,
            r#"{"tripName": "Rome", "days": "none"}"#,
        ] {
            let result = Itinerary::from_model_output(raw);
            assert!(
                matches!(result, Err(ItineraryParseError::IncompleteShape(_))),
                "accepted: {raw}"
            );
        }
    }

    #[test]
    fn rejects_day_missing_required_fields() {
        let raw = r#"{"tripName": "Rome", "days": [{"day": 1, "activities": []}]}"#;
        let result = Itinerary::from_model_output(raw);
        assert!(matches!(result, Err(ItineraryParseError::IncompleteShape(_))));
    }

    #[test]
    fn refinement_detects_unclear_sentinel() {
        let result = Itinerary::from_refinement_output(r#"{"error": "unclear_request"}"#);
        assert!(matches!(result, Err(ItineraryParseError::UnclearRequest)));
    }

    #[test]
    fn refinement_treats_missing_document_as_unclear() {
        let result = Itinerary::from_refinement_output(r#"{"note": "cannot comply"}"#);
        assert!(matches!(result, Err(ItineraryParseError::UnclearRequest)));
    }

    #[test]
    fn refinement_rejects_non_json() {
        let result = Itinerary::from_refinement_output("sure, here you go");
        assert!(matches!(result, Err(ItineraryParseError::MalformedJson(_))));
    }

    #[test]
    fn refinement_rejects_broken_day_shape() {
        let raw = r#"{"tripName": "Rome", "days": [{"day": "one", "theme": "t", "activities": []}]}"#;
        let result = Itinerary::from_refinement_output(raw);
        assert!(matches!(result, Err(ItineraryParseError::IncompleteShape(_))));
    }

    #[test]
    fn refinement_accepts_day_count_change() {
        let raw = r#"{
            "tripName": "Shorter Paris",
            "days": [{
                "day": 1,
                "theme": "Everything at once",
                "activities": [{
                    "time": "08:00",
                    "description": "Louvre sprint",
                    "location": "Rue de Rivoli",
                    "estimatedCost": "$22"
                }]
            }]
        }"#;
        let Ok(itinerary) = Itinerary::from_refinement_output(raw) else {
            panic!("expected valid itinerary");
        };
        assert_eq!(itinerary.days.len(), 1);
    }

    #[test]
    fn wire_format_uses_camel_case_cost_key() {
        let activity = Activity {
            time: "12:00".to_string(),
            description: "Lunch".to_string(),
            location: "Trastevere".to_string(),
            estimated_cost: "$25".to_string(),
        };
        let Ok(json) = serde_json::to_string(&activity) else {
            panic!("serialization failed");
        };
        assert!(json.contains("\"estimatedCost\""));
        assert!(!json.contains("estimated_cost"));
    }
}
