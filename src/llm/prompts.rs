//! Prompt rendering for itinerary generation and refinement.
//!
//! Prompts are plain string templates; the model carries all the
//! knowledge. Two rules matter for output handling elsewhere: the system
//! prompts demand a bare JSON object (no prose, no markdown fences), and
//! the refinement prompt tells the model to answer with an
//! `"error": "unclear_request"` object when it cannot act on the request.

use crate::domain::itinerary::UNCLEAR_REQUEST_SENTINEL;
use crate::domain::{GenerationMode, TripRequest};

const GENERATION_SYSTEM_PROMPT: &str = "You are a professional travel planner. Return ONLY a JSON object. No prose, no markdown blocks.";

/// Standing rule for interest-led generation: the model has no live data,
/// so steer it away from venues that may no longer exist.
const VENUE_SAFETY_RULE: &str = r#"Since you do not have real-time internet access, avoid recommending specific new or trendy venues that might have closed. Prefer historic, legendary places that have existed for 50+ years, or recommend a general area (e.g., "Dining in the Lipscani District"), or phrase the pick as "A highly-rated restaurant such as [Name]". Always include the street these locations are on."#;

const ITINERARY_SCHEMA: &str = r#"{
  "tripName": "string",
  "days": [
    {
      "day": 1,
      "theme": "string",
      "activities": [
        { "time": "string", "description": "string", "location": "string", "estimatedCost": "string" }
      ]
    }
  ]
}"#;

/// Renders the system prompt for itinerary generation.
///
/// Interest-led requests append the venue-safety rule; the legacy budget
/// mode keeps the short planner prompt.
#[must_use]
pub fn render_generation_system_prompt(mode: &GenerationMode) -> String {
    match mode {
        GenerationMode::Budget(_) => GENERATION_SYSTEM_PROMPT.to_string(),
        GenerationMode::Interests(_) => {
            format!("{GENERATION_SYSTEM_PROMPT}\n{VENUE_SAFETY_RULE}")
        }
    }
}

/// Renders the user prompt for itinerary generation.
#[must_use]
pub fn render_generation_user_prompt(request: &TripRequest) -> String {
    match &request.mode {
        GenerationMode::Budget(tier) => format!(
            r#"Destination: {destination}
Duration: {duration} days
Budget: {tier}

Return a JSON object that strictly matches this schema:
{ITINERARY_SCHEMA}

Rules:
- Generate exactly {duration} day objects.
- Include 3-5 activities per day.
- Use concise, premium-sounding activity descriptions.
- Keep estimatedCost as a short string (ex: "$18", "Free", "$45-60")."#,
            destination = request.destination,
            duration = request.duration,
        ),
        GenerationMode::Interests(profile) => {
            let mut details = format!(
                "Destination: {}\nDuration: {} days\nInterests: {}\nTravel Style: {}\nPace: {}\nTransport: {}\n",
                request.destination,
                request.duration,
                profile.interests,
                profile.travel_style,
                profile.pace,
                profile.transport,
            );
            if let Some(diet) = &profile.dietary_restrictions {
                details.push_str(&format!("Dietary Restrictions: {diet}\n"));
            }

            let mut rules = format!(
                "- Generate exactly {} day objects.\n- Include {} activities per day.\n- Tailor activities to the listed interests and travel style.\n- Plan travel between activities assuming {}.\n",
                request.duration,
                profile.pace.activities_per_day(),
                profile.transport,
            );
            if profile.dietary_restrictions.is_some() {
                rules.push_str("- Respect the dietary restrictions in every food recommendation.\n");
            }
            rules.push_str(
                "- Keep estimatedCost as a short string (ex: \"$18\", \"Free\", \"$45-60\").\n- Include the street or neighborhood in every location.",
            );

            format!(
                "{details}\nReturn a JSON object that strictly matches this schema:\n{ITINERARY_SCHEMA}\n\nRules:\n{rules}"
            )
        }
    }
}

/// Renders the system prompt for conversational refinement.
#[must_use]
pub fn render_refinement_system_prompt() -> String {
    r#"You are a travel assistant helping to refine an existing itinerary.
CRITICAL RULE: Since you do not have real-time internet access, avoid recommending specific new or trendy restaurants that might have closed.
Instead, recommend:
1. Historic, legendary places (that have existed for 50+ years).
2. General areas (e.g., "Dining in the Lipscani District").
3. Or clearly state "A highly-rated restaurant such as [Name]".
4. Do still say the street these locations are on.
5. Just try to avoid recommending specific new or trendy locations that might have closed.

When the user says a location is closed, replace it with an alternative that fits the same theme/area.
Always prioritize generic activity descriptions over risky specific locations.
Return ONLY JSON in the same schema as the original itinerary."#
        .to_string()
}

/// Renders the user prompt for conversational refinement.
///
/// `itinerary_json` is the caller's current itinerary, pretty-printed;
/// `message` is the user's free-text edit request.
#[must_use]
pub fn render_refinement_user_prompt(itinerary_json: &str, message: &str) -> String {
    format!(
        r#"Current Itinerary (JSON):
{itinerary_json}

User Request: {message}

Update the itinerary according to the user's request. Maintain the same JSON structure.
If the user mentions a location is closed, replace it with a similar alternative in the same area.
Keep the same number of days and maintain the overall structure.
If the user's request is unclear or doesn't make sense, return a JSON with "error": "{UNCLEAR_REQUEST_SENTINEL}" instead of the itinerary.
Return the COMPLETE updated itinerary as JSON."#
    )
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::{BudgetTier, InterestProfile, Pace, TransportMode, TravelStyle};

    fn budget_request() -> TripRequest {
        TripRequest {
            destination: "Lisbon".to_string(),
            duration: 4,
            mode: GenerationMode::Budget(BudgetTier::Luxury),
        }
    }

    fn interest_request(dietary: Option<&str>) -> TripRequest {
        TripRequest {
            destination: "Tokyo".to_string(),
            duration: 5,
            mode: GenerationMode::Interests(InterestProfile {
                interests: "ramen, arcades, temples".to_string(),
                travel_style: TravelStyle::Friends,
                pace: Pace::Relaxed,
                transport: TransportMode::PublicTransport,
                dietary_restrictions: dietary.map(str::to_string),
            }),
        }
    }

    #[test]
    fn budget_prompt_carries_request_and_schema() {
        let prompt = render_generation_user_prompt(&budget_request());
        assert!(prompt.contains("Destination: Lisbon"));
        assert!(prompt.contains("Duration: 4 days"));
        assert!(prompt.contains("Budget: Luxury"));
        assert!(prompt.contains("Generate exactly 4 day objects."));
        assert!(prompt.contains("Include 3-5 activities per day."));
        assert!(prompt.contains("\"tripName\": \"string\""));
        assert!(prompt.contains("estimatedCost"));
    }

    #[test]
    fn interest_prompt_scales_activities_with_pace() {
        let prompt = render_generation_user_prompt(&interest_request(None));
        assert!(prompt.contains("Interests: ramen, arcades, temples"));
        assert!(prompt.contains("Travel Style: Friends"));
        assert!(prompt.contains("Transport: Public Transport"));
        assert!(prompt.contains("Include 2 activities per day."));
        assert!(prompt.contains("street or neighborhood in every location"));
    }

    #[test]
    fn dietary_restrictions_appear_only_when_present() {
        let with = render_generation_user_prompt(&interest_request(Some("vegetarian")));
        assert!(with.contains("Dietary Restrictions: vegetarian"));
        assert!(with.contains("Respect the dietary restrictions"));

        let without = render_generation_user_prompt(&interest_request(None));
        assert!(!without.contains("Dietary Restrictions"));
        assert!(!without.contains("Respect the dietary restrictions"));
    }

    #[test]
    fn system_prompt_adds_venue_rule_for_interest_mode() {
        let legacy = render_generation_system_prompt(&budget_request().mode);
        assert_eq!(legacy, GENERATION_SYSTEM_PROMPT);

        let interest = render_generation_system_prompt(&interest_request(None).mode);
        assert!(interest.starts_with(GENERATION_SYSTEM_PROMPT));
        assert!(interest.contains("50+ years"));
        assert!(interest.contains("A highly-rated restaurant such as [Name]"));
    }

    #[test]
    fn refinement_system_prompt_keeps_anti_hallucination_rules() {
        let prompt = render_refinement_system_prompt();
        assert!(prompt.contains("CRITICAL RULE"));
        assert!(prompt.contains("50+ years"));
        assert!(prompt.contains("Dining in the Lipscani District"));
        assert!(prompt.contains("Return ONLY JSON"));
    }

    #[test]
    fn refinement_user_prompt_embeds_document_and_request() {
        let prompt = render_refinement_user_prompt(
            r#"{"tripName": "Rome in 2 Days"}"#,
            "make day 2 cheaper",
        );
        assert!(prompt.contains("Rome in 2 Days"));
        assert!(prompt.contains("User Request: make day 2 cheaper"));
        assert!(prompt.contains(r#""error": "unclear_request""#));
        assert!(prompt.contains("COMPLETE updated itinerary"));
    }
}
