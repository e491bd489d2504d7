//! Trip service: generation and refinement orchestration.
//!
//! [`TripService`] drives both model-backed flows end to end: render
//! prompts, call the configured [`ChatModel`], validate the completion
//! into an [`Itinerary`], then persist through the [`TripStore`]. A
//! persistence failure after a successful model call does not fail the
//! request; the outcome carries the itinerary plus a save-error notice
//! instead, and nothing is rolled back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Itinerary, ItineraryParseError, TripId, TripRequest};
use crate::error::ApiError;
use crate::llm::{ChatModel, ChatRequest, SAMPLING_TEMPERATURE, prompts};
use crate::persistence::{StoreError, TripStore};

/// Result of a generation call: the itinerary plus save metadata.
///
/// `trip_id` and `created_at` are `None` exactly when the save failed
/// and `save_error` explains why. `updated_at` is only set when an
/// existing trip was regenerated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateOutcome {
    /// The generated itinerary.
    pub itinerary: Itinerary,
    /// Id of the saved trip row, absent when the save failed.
    pub trip_id: Option<TripId>,
    /// Creation timestamp of the trip row, absent when the save failed.
    pub created_at: Option<DateTime<Utc>>,
    /// Update timestamp, set only when an existing trip was regenerated.
    pub updated_at: Option<DateTime<Utc>>,
    /// Human-readable notice set when the itinerary could not be saved.
    pub save_error: Option<String>,
}

/// Result of a refinement call.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineOutcome {
    /// The refined itinerary.
    pub itinerary: Itinerary,
    /// Id of the refined trip.
    pub trip_id: TripId,
    /// Update timestamp of the trip row, absent when the save failed.
    pub updated_at: Option<DateTime<Utc>>,
    /// Human-readable notice set when the refinement could not be saved.
    pub save_error: Option<String>,
}

/// Orchestrates itinerary generation and refinement.
///
/// The model client and trip store sit behind trait objects so tests can
/// substitute scripted fakes for both external systems. Generation and
/// refinement may use different models; both are configured at startup.
#[derive(Clone)]
pub struct TripService {
    model: Arc<dyn ChatModel>,
    store: Arc<dyn TripStore>,
    generation_model: String,
    refinement_model: String,
}

impl std::fmt::Debug for TripService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TripService")
            .field("generation_model", &self.generation_model)
            .field("refinement_model", &self.refinement_model)
            .finish_non_exhaustive()
    }
}

impl TripService {
    /// Creates a new trip service.
    #[must_use]
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn TripStore>,
        generation_model: String,
        refinement_model: String,
    ) -> Self {
        Self {
            model,
            store,
            generation_model,
            refinement_model,
        }
    }

    /// Generates an itinerary for `request` and saves it as a trip owned
    /// by `user_id`. When `existing_trip` is given the matching trip is
    /// regenerated in place: its itinerary is overwritten, the previous
    /// version is appended to the trip's history, and the request columns
    /// are refreshed.
    ///
    /// A failed save does not fail the call; the outcome then carries the
    /// itinerary with `save_error` set and no ids or timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFoundOrForbidden`] when `existing_trip`
    /// does not match a trip owned by `user_id`, the mapped [`ApiError`]
    /// when the model call fails, and
    /// [`ApiError::MalformedUpstreamResponse`] when the completion is not
    /// a usable itinerary document.
    pub async fn generate(
        &self,
        user_id: Uuid,
        request: &TripRequest,
        existing_trip: Option<TripId>,
    ) -> Result<GenerateOutcome, ApiError> {
        let chat = ChatRequest {
            model: self.generation_model.clone(),
            system_prompt: prompts::render_generation_system_prompt(&request.mode),
            user_prompt: prompts::render_generation_user_prompt(request),
            temperature: SAMPLING_TEMPERATURE,
            json_response: true,
        };
        let raw = self.model.complete(chat).await.map_err(|err| {
            tracing::warn!(error = %err, destination = %request.destination, "generation call failed");
            ApiError::from(err)
        })?;
        let itinerary = Itinerary::from_model_output(&raw).map_err(|err| {
            tracing::warn!(error = %err, "generation output rejected");
            ApiError::MalformedUpstreamResponse
        })?;

        match existing_trip {
            None => match self.store.create_trip(user_id, request, &itinerary).await {
                Ok(saved) => {
                    tracing::info!(
                        trip_id = %saved.id,
                        user_id = %user_id,
                        destination = %request.destination,
                        "trip created"
                    );
                    Ok(GenerateOutcome {
                        itinerary,
                        trip_id: Some(saved.id),
                        created_at: Some(saved.created_at),
                        updated_at: None,
                        save_error: None,
                    })
                }
                Err(err) => {
                    tracing::warn!(error = %err, user_id = %user_id, "trip save failed");
                    Ok(GenerateOutcome {
                        itinerary,
                        trip_id: None,
                        created_at: None,
                        updated_at: None,
                        save_error: Some(save_failure_notice("generated", Some(&err))),
                    })
                }
            },
            Some(trip_id) => match self
                .store
                .update_trip(trip_id, user_id, &itinerary, Some(request))
                .await
            {
                Ok(Some(saved)) => {
                    tracing::info!(trip_id = %saved.id, user_id = %user_id, "trip regenerated");
                    Ok(GenerateOutcome {
                        itinerary,
                        trip_id: Some(saved.id),
                        created_at: Some(saved.created_at),
                        updated_at: Some(saved.updated_at),
                        save_error: None,
                    })
                }
                Ok(None) => Err(ApiError::NotFoundOrForbidden),
                Err(err) => {
                    tracing::warn!(error = %err, trip_id = %trip_id, "trip update failed");
                    Ok(GenerateOutcome {
                        itinerary,
                        trip_id: None,
                        created_at: None,
                        updated_at: None,
                        save_error: Some(save_failure_notice("generated", Some(&err))),
                    })
                }
            },
        }
    }

    /// Applies a free-text edit to the trip's current itinerary.
    ///
    /// The caller's itinerary snapshot is what gets edited; the stored
    /// row is only consulted to enforce ownership. The snapshot is taken
    /// as raw JSON so trips saved under an older document shape stay
    /// refinable; only the model's answer is held to the current schema.
    /// Obvious non-requests are rejected by a heuristic pre-filter before
    /// any model call. On a successful edit the previous itinerary is
    /// appended to the trip's history; if that save fails, the refined
    /// itinerary is still returned with `save_error` set.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFoundOrForbidden`] when the trip does not
    /// exist or is owned by someone else,
    /// [`ApiError::UnclearInput`] when the message fails the pre-filter
    /// or the model reports it could not understand the request, the
    /// mapped [`ApiError`] when the model call fails, and
    /// [`ApiError::MalformedUpstreamResponse`] when the completion is not
    /// a usable itinerary document.
    pub async fn refine(
        &self,
        user_id: Uuid,
        trip_id: TripId,
        message: &str,
        current_itinerary: &serde_json::Value,
    ) -> Result<RefineOutcome, ApiError> {
        let owned = match self.store.fetch_trip(trip_id, user_id).await {
            Ok(found) => found.is_some(),
            Err(err) => {
                tracing::warn!(error = %err, trip_id = %trip_id, "trip lookup failed");
                false
            }
        };
        if !owned {
            return Err(ApiError::NotFoundOrForbidden);
        }

        if is_unclear_request(message) {
            return Err(ApiError::UnclearInput(
                "I didn't understand your request. Please provide a clear instruction.".to_string(),
            ));
        }

        let itinerary_json = serde_json::to_string_pretty(current_itinerary)
            .map_err(|err| ApiError::Internal(err.to_string()))?;
        let chat = ChatRequest {
            model: self.refinement_model.clone(),
            system_prompt: prompts::render_refinement_system_prompt(),
            user_prompt: prompts::render_refinement_user_prompt(&itinerary_json, message),
            temperature: SAMPLING_TEMPERATURE,
            json_response: true,
        };
        let raw = self.model.complete(chat).await.map_err(|err| {
            tracing::warn!(error = %err, trip_id = %trip_id, "refinement call failed");
            ApiError::from(err)
        })?;
        let refined = match Itinerary::from_refinement_output(&raw) {
            Ok(refined) => refined,
            Err(ItineraryParseError::UnclearRequest) => {
                return Err(ApiError::UnclearInput(
                    "I didn't understand your request. Please try rephrasing it more clearly."
                        .to_string(),
                ));
            }
            Err(err) => {
                tracing::warn!(error = %err, trip_id = %trip_id, "refinement output rejected");
                return Err(ApiError::MalformedUpstreamResponse);
            }
        };

        match self.store.update_trip(trip_id, user_id, &refined, None).await {
            Ok(Some(saved)) => {
                tracing::info!(trip_id = %trip_id, user_id = %user_id, "trip refined");
                Ok(RefineOutcome {
                    itinerary: refined,
                    trip_id,
                    updated_at: Some(saved.updated_at),
                    save_error: None,
                })
            }
            // The row vanished between the ownership check and the update.
            // The refined itinerary is still the authoritative result.
            Ok(None) => Ok(RefineOutcome {
                itinerary: refined,
                trip_id,
                updated_at: None,
                save_error: Some(save_failure_notice("refined", None)),
            }),
            Err(err) => {
                tracing::warn!(error = %err, trip_id = %trip_id, "trip update failed");
                Ok(RefineOutcome {
                    itinerary: refined,
                    trip_id,
                    updated_at: None,
                    save_error: Some(save_failure_notice("refined", Some(&err))),
                })
            }
        }
    }
}

/// Heuristic check for messages that cannot possibly be acted on:
/// no letters at all, one character repeated ten or more times, or
/// fewer than two words. Catching these locally saves a model call.
fn is_unclear_request(message: &str) -> bool {
    let trimmed = message.trim();
    if !trimmed.chars().any(char::is_alphabetic) {
        return true;
    }
    let char_count = trimmed.chars().count();
    let mut chars = trimmed.chars();
    if let Some(first) = chars.next()
        && char_count >= 10
        && chars.all(|c| c == first)
    {
        return true;
    }
    trimmed.split_whitespace().count() < 2
}

/// User-facing notice for a degraded save. The missing-table case gets
/// its own wording so a half-deployed database reads as a setup problem
/// rather than a transient failure.
fn save_failure_notice(action: &str, err: Option<&StoreError>) -> String {
    match err {
        Some(err) if err.is_missing_table() => format!(
            "Itinerary {action} successfully, but couldn't be saved: the trips table has not been set up yet."
        ),
        _ => format!("Itinerary {action} successfully, but couldn't be saved."),
    }
}
