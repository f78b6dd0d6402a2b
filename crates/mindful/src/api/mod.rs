mod catalog;
mod meditation;
mod moods;
mod sessions;
mod stats;

use std::fmt::Display;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::error;

use mindful_core::Clock;
use mindful_db::Storage;
use mindful_logging::Logger;
use mindful_script::ScriptGenerator;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub generator: Arc<dyn ScriptGenerator>,
    pub clock: Arc<dyn Clock>,
    pub logger: Logger,
}

/// JSON body for every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn bad_request(err: impl Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

/// Unwrap a JSON request body. Malformed or mistyped bodies become a 400
/// with the usual `error` field instead of axum's plain-text rejection.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| bad_request(rejection.body_text()))
}

pub fn internal_error(err: impl Display) -> ApiError {
    error!(error = %err, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: err.to_string(),
        }),
    )
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/meditation/generate", post(meditation::generate_script))
        .route(
            "/api/sessions",
            get(sessions::list_sessions).post(sessions::create_session),
        )
        .route(
            "/api/mood",
            get(moods::list_mood_records).post(moods::create_mood_record),
        )
        .route("/api/stats", get(stats::get_stats))
        .route("/api/stats/progress", get(stats::get_progress))
        .route("/api/stats/daily", get(stats::get_daily_activity))
        .route("/api/environments", get(catalog::list_environments))
        .route("/api/zen-sparks", get(catalog::list_zen_sparks))
        .route("/api/zen-sparks/{id}", get(catalog::get_zen_spark))
        .route("/api/health", get(catalog::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}


#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use mindful_core::ZEN_SPARKS;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        json: Option<&str>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match json {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_router_serves_catalogs_and_health() {
        let router = create_router(test_support::state());

        let (status, environments) = send(&router, Method::GET, "/api/environments", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(environments.as_array().unwrap().len(), 4);

        let uri = format!("/api/zen-sparks/{}", ZEN_SPARKS[0].id);
        let (status, spark) = send(&router, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(spark["title"], ZEN_SPARKS[0].title);

        let (status, body) = send(&router, Method::GET, "/api/zen-sparks/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].is_string());

        let (status, health) = send(&router, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(health["storage"], "memory");
    }

    #[tokio::test]
    async fn test_router_session_updates_stats() {
        let router = create_router(test_support::state());

        let (status, session) = send(
            &router,
            Method::POST,
            "/api/sessions",
            Some(r#"{"mood":"tired","duration":5,"environment":"ocean"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(session["mood"], "tired");
        assert!(session["completedAt"].is_string());

        let (status, stats) = send(&router, Method::GET, "/api/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["totalSessions"], 1);
        assert_eq!(stats["totalMinutes"], 5);
    }

    #[tokio::test]
    async fn test_malformed_bodies_get_json_bad_request() {
        let state = test_support::state();
        let router = create_router(state.clone());

        let cases = [
            (
                "/api/sessions",
                r#"{"mood":"tired","duration":2.5,"environment":"ocean"}"#,
            ),
            (
                "/api/sessions",
                r#"{"mood":"tired","duration":"ten","environment":"ocean"}"#,
            ),
            ("/api/sessions", r#"{"mood":"tired","duration":5}"#),
            ("/api/sessions", r#"{"mood":"tired","#),
            ("/api/mood", r#"{}"#),
            ("/api/mood", r#"{"mood":7}"#),
            ("/api/meditation/generate", r#"{"mood":"tired","duration":2.5}"#),
            ("/api/meditation/generate", r#"[]"#),
        ];

        for (uri, json) in cases {
            let (status, body) = send(&router, Method::POST, uri, Some(json)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{} {}", uri, json);
            let error = body["error"].as_str().unwrap();
            assert!(!error.is_empty(), "{} {}", uri, json);
        }

        assert!(state.storage.sessions().unwrap().is_empty());
        assert!(state.storage.mood_records().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_content_type_is_bad_request() {
        let router = create_router(test_support::state());
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/mood")
            .body(Body::from(r#"{"mood":"tired"}"#))
            .unwrap();

        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].is_string());
    }
}
