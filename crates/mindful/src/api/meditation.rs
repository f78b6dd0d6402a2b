use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use mindful_core::{validate_duration, Mood};
use mindful_logging::LogEvent;
use mindful_script::{generate_or_fallback, GeneratedScript, ScriptRequest};

use super::{bad_request, json_body, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub mood: String,
    pub duration: i64,
}

/// Generate a guided script. Generator failures never fail the request.
pub async fn generate_script(
    State(state): State<AppState>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GeneratedScript>, ApiError> {
    let body = json_body(body)?;
    let mood: Mood = body.mood.parse().map_err(bad_request)?;
    let duration = validate_duration(body.duration).map_err(bad_request)?;

    let request = ScriptRequest::new(mood, duration);
    let script = generate_or_fallback(state.generator.as_ref(), &request).await;

    if script.fallback {
        state.logger.log(&LogEvent::ScriptFallback {
            mood: mood.to_string(),
            generator: state.generator.name().to_string(),
        });
    }

    Ok(Json(script))
}
