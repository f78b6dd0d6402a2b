use axum::extract::State;
use axum::response::Json;

use mindful_core::{daily_activity, DayActivity, LevelProgress, UserStats};

use super::{internal_error, ApiError, AppState};

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<UserStats>, ApiError> {
    let stats = state.storage.stats().map_err(internal_error)?;
    Ok(Json(stats))
}

pub async fn get_progress(State(state): State<AppState>) -> Result<Json<LevelProgress>, ApiError> {
    let stats = state.storage.stats().map_err(internal_error)?;
    Ok(Json(LevelProgress::for_stats(&stats)))
}

/// Per-day totals, derived from the stored history on every call.
pub async fn get_daily_activity(
    State(state): State<AppState>,
) -> Result<Json<Vec<DayActivity>>, ApiError> {
    let sessions = state.storage.sessions().map_err(internal_error)?;
    Ok(Json(daily_activity(&sessions, state.clock.as_ref())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support;
    use chrono::Duration;
    use mindful_core::{MeditationLevel, SessionDraft};

    #[tokio::test]
    async fn test_empty_stats_and_progress() {
        let state = test_support::state();

        let Json(stats) = get_stats(State(state.clone())).await.unwrap();
        assert_eq!(stats, UserStats::default());

        let Json(progress) = get_progress(State(state.clone())).await.unwrap();
        assert_eq!(progress.current_level, MeditationLevel::Beginner);
        assert_eq!(progress.next_level, Some(MeditationLevel::Intermediate));
        assert_eq!(progress.progress_percent, 0.0);

        let Json(days) = get_daily_activity(State(state)).await.unwrap();
        assert!(days.is_empty());
    }

    #[tokio::test]
    async fn test_stats_follow_writes() {
        let clock = test_support::clock();
        let state = test_support::state_with(
            clock.clone(),
            std::sync::Arc::new(mindful_script::UnconfiguredGenerator),
        );
        let draft = SessionDraft::new("stressed", 10, "", "aurora").unwrap();

        state.storage.create_session(&draft).unwrap();
        clock.advance(Duration::days(1));
        state.storage.create_session(&draft).unwrap();
        state.storage.create_session(&draft).unwrap();

        let Json(stats) = get_stats(State(state.clone())).await.unwrap();
        assert_eq!(stats.total_sessions, 3);
        assert_eq!(stats.total_minutes, 30);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);

        let Json(days) = get_daily_activity(State(state.clone())).await.unwrap();
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, "2026-05-10");
        assert_eq!(days[0].sessions, 1);
        assert_eq!(days[1].date, "2026-05-11");
        assert_eq!(days[1].minutes, 20);

        let Json(progress) = get_progress(State(state)).await.unwrap();
        assert_eq!(progress.requirement, "10 sessions, 50 minutes, 3 day streak");
        assert!(progress.progress_percent > 0.0 && progress.progress_percent < 100.0);
    }
}
