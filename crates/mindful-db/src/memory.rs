use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use mindful_core::{
    recompute_stats, Clock, MeditationSession, MoodDraft, MoodRecord, SessionDraft, UserStats,
};
use tracing::info;
use uuid::Uuid;

use crate::{record_time, SessionWrite, Storage, StorageError};

#[derive(Default)]
struct MemState {
    // Insertion order.
    sessions: Vec<MeditationSession>,
    moods: Vec<MoodRecord>,
    stats: UserStats,
}

/// In-memory storage. Everything is lost when the process exits.
pub struct MemStorage {
    state: Mutex<MemState>,
    clock: Arc<dyn Clock>,
}

impl MemStorage {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(MemState::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemState>, StorageError> {
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl Storage for MemStorage {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn record_session(&self, draft: &SessionDraft) -> Result<SessionWrite, StorageError> {
        let session = draft
            .clone()
            .into_session(Uuid::new_v4().to_string(), record_time(self.clock.as_ref()));

        let mut state = self.lock()?;
        state.sessions.push(session.clone());
        let stats = recompute_stats(&state.sessions, self.clock.as_ref());
        let previous = std::mem::replace(&mut state.stats, stats.clone());

        info!(
            id = %session.id,
            mood = %session.mood,
            duration = session.duration,
            "Session stored"
        );

        Ok(SessionWrite {
            session,
            previous,
            stats,
        })
    }

    fn sessions(&self) -> Result<Vec<MeditationSession>, StorageError> {
        let state = self.lock()?;
        Ok(newest_first(&state.sessions, |s| s.completed_at))
    }

    fn create_mood_record(&self, draft: &MoodDraft) -> Result<MoodRecord, StorageError> {
        let record = draft.into_record(
            Uuid::new_v4().to_string(),
            record_time(self.clock.as_ref()),
        );

        let mut state = self.lock()?;
        state.moods.push(record.clone());

        info!(id = %record.id, mood = %record.mood, "Mood recorded");
        Ok(record)
    }

    fn mood_records(&self) -> Result<Vec<MoodRecord>, StorageError> {
        let state = self.lock()?;
        Ok(newest_first(&state.moods, |m| m.timestamp))
    }

    fn stats(&self) -> Result<UserStats, StorageError> {
        Ok(self.lock()?.stats.clone())
    }
}

/// Descending by timestamp; equal timestamps keep the latest insertion first.
fn newest_first<T: Clone>(items: &[T], key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.iter().rev().cloned().collect();
    sorted.sort_by(|a, b| key(b).cmp(&key(a)));
    sorted
}
