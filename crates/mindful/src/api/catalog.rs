use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use mindful_core::{zen_spark, EnvironmentInfo, ZenSpark, ENVIRONMENTS, ZEN_SPARKS};

use super::{internal_error, ApiError, AppState, ErrorBody};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub storage: &'static str,
}

pub async fn list_environments() -> Json<&'static [EnvironmentInfo]> {
    Json(&ENVIRONMENTS[..])
}

pub async fn list_zen_sparks() -> Json<&'static [ZenSpark]> {
    Json(&ZEN_SPARKS[..])
}

pub async fn get_zen_spark(Path(id): Path<String>) -> Result<Json<&'static ZenSpark>, ApiError> {
    zen_spark(&id).map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: format!("Zen Spark not found: {}", id),
            }),
        )
    })
}

/// Liveness plus a storage round-trip.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.storage.stats().map_err(|e| {
        let (_, body) = internal_error(e);
        (StatusCode::SERVICE_UNAVAILABLE, body)
    })?;

    Ok(Json(HealthResponse {
        status: "ok",
        storage: state.storage.backend_name(),
    }))
}
