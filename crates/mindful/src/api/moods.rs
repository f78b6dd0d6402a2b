use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use mindful_core::{MoodDraft, MoodRecord};

use super::{bad_request, internal_error, json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateMoodRequest {
    pub mood: String,
}

pub async fn list_mood_records(
    State(state): State<AppState>,
) -> Result<Json<Vec<MoodRecord>>, ApiError> {
    let records = state.storage.mood_records().map_err(internal_error)?;
    Ok(Json(records))
}

pub async fn create_mood_record(
    State(state): State<AppState>,
    body: Result<Json<CreateMoodRequest>, JsonRejection>,
) -> Result<Json<MoodRecord>, ApiError> {
    let body = json_body(body)?;
    let draft = MoodDraft::new(&body.mood).map_err(bad_request)?;
    let record = state
        .storage
        .create_mood_record(&draft)
        .map_err(internal_error)?;
    Ok(Json(record))
}
