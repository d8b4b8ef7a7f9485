//! Shift API Routes
//!
//! - POST /shift - blend the submitted moods and draw a content bundle
//! - GET /cosmic-today - day/night reading for the current local time

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::mood::{compute_shift, cosmic_today, Clock, CosmicReading, ShiftResponse};
use crate::store::CheckIn;

const DEFAULT_USER: &str = "guest";

#[derive(Debug, Default, Deserialize)]
pub struct ShiftRequest {
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
}

/// POST /shift
/// Missing or unknown moods resolve to the fallback mood, never an error
pub async fn post_shift(
    State(state): State<AppState>,
    payload: Result<Json<ShiftRequest>, JsonRejection>,
) -> Result<Json<ShiftResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let user = req
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(DEFAULT_USER);
    let raw_mood = req.mood.as_deref().unwrap_or_default();

    let mut rng = state.rng();
    let shift = compute_shift(
        &state.table,
        &state.music_link,
        raw_mood,
        user,
        state.clock.now(),
        &mut rng,
    )?;

    let mut moods = shift.current_mood.split(',').map(str::to_string);
    let entry = CheckIn {
        user: shift.user.clone(),
        mood: moods.next().unwrap_or_default(),
        combo_moods: moods.collect(),
        timestamp: state.clock.utc_now(),
    };
    if let Err(e) = state.store.record_check_in(&entry) {
        warn!(user = %entry.user, err = %e, "failed to record mood check-in");
    }

    Ok(Json(shift))
}

/// GET /cosmic-today
pub async fn get_cosmic_today(State(state): State<AppState>) -> Json<CosmicReading> {
    Json(cosmic_today(&state.clock.now()))
}
