//! Catalog API Routes
//!
//! Plain filtered reads from the sled catalog plus the static breathwork
//! guide. No blending weights or randomness here.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::store::{Article, CheckIn};

const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 100;

#[derive(Debug, Serialize)]
pub struct BreathworkExercise {
    pub name: &'static str,
    pub description: &'static str,
}

const BREATHWORK_EXERCISES: [BreathworkExercise; 3] = [
    BreathworkExercise {
        name: "4-7-8 Breathing",
        description: "Inhale for 4 seconds, hold for 7, exhale for 8.",
    },
    BreathworkExercise {
        name: "Box Breathing",
        description: "Inhale 4s, hold 4s, exhale 4s, hold 4s.",
    },
    BreathworkExercise {
        name: "Energizing Breath",
        description: "Quick inhales and exhales for 30 seconds.",
    },
];

#[derive(Debug, Default, Deserialize)]
pub struct RecommendationsQuery {
    pub mood: Option<String>,
    pub combo: Option<String>,
}

impl RecommendationsQuery {
    /// `mood` first, then each `combo` segment; lowercased, trimmed, empties dropped
    fn moods(&self) -> Vec<String> {
        self.mood
            .iter()
            .map(String::as_str)
            .chain(self.combo.iter().flat_map(|c| c.split(',')))
            .map(|m| m.trim().to_lowercase())
            .filter(|m| !m.is_empty())
            .collect()
    }
}

/// GET /api/recommendations?mood=anxious&combo=stressed,calm
pub async fn get_recommendations(
    State(state): State<AppState>,
    Query(q): Query<RecommendationsQuery>,
) -> Result<Json<Value>, ApiError> {
    let moods = q.moods();
    let body = match state.store.recommendations_for(&moods)? {
        Some(recommendations) => json!({ "moods": moods, "recommendations": recommendations }),
        None => json!({ "message": "No recommendations found for these moods." }),
    };
    Ok(Json(body))
}

#[derive(Debug, Default, Deserialize)]
pub struct ArticlesQuery {
    pub category: Option<String>,
}

/// GET /api/articles?category=science
pub async fn get_articles(
    State(state): State<AppState>,
    Query(q): Query<ArticlesQuery>,
) -> Result<Json<Vec<Article>>, ApiError> {
    let category = q.category.as_deref().filter(|c| !c.trim().is_empty());
    Ok(Json(state.store.articles(category)?))
}

/// GET /api/breathwork
pub async fn get_breathwork() -> Json<Value> {
    Json(json!({ "breathWorkExercises": BREATHWORK_EXERCISES }))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub user: Option<String>,
    pub limit: Option<usize>,
}

/// GET /api/moods?user=sam&limit=10
pub async fn get_mood_history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<CheckIn>>, ApiError> {
    let user = q
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::BadRequest("`user` query parameter is required".into()))?;
    let limit = q
        .limit
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .min(MAX_HISTORY_LIMIT);
    Ok(Json(state.store.check_ins_for(user, limit)?))
}

/// GET /api/moods/known
pub async fn get_known_moods(State(state): State<AppState>) -> Json<Value> {
    let moods: Vec<&str> = state.table.keys().collect();
    Json(json!({ "moods": moods, "fallback": state.table.fallback() }))
}
