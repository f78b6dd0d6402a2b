use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use mindful_core::{MeditationSession, SessionDraft};
use mindful_logging::LogEvent;

use super::{bad_request, internal_error, json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub mood: String,
    pub duration: i64,
    #[serde(default)]
    pub script: String,
    pub environment: String,
}

pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<MeditationSession>>, ApiError> {
    let sessions = state.storage.sessions().map_err(internal_error)?;
    Ok(Json(sessions))
}

pub async fn create_session(
    State(state): State<AppState>,
    body: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> Result<Json<MeditationSession>, ApiError> {
    let body = json_body(body)?;
    let draft = SessionDraft::new(&body.mood, body.duration, body.script, &body.environment)
        .map_err(bad_request)?;

    let write = state.storage.record_session(&draft).map_err(internal_error)?;

    state.logger.log(&LogEvent::SessionCompleted {
        mood: write.session.mood.to_string(),
        duration_minutes: write.session.duration,
        current_streak: write.stats.current_streak,
        total_sessions: write.stats.total_sessions,
    });
    if let Some(level) = write.level_reached() {
        state.logger.log(&LogEvent::LevelReached {
            level: level.to_string(),
        });
    }

    Ok(Json(write.session))
}
