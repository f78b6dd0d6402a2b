use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use mindful_core::{
    recompute_stats, Clock, MeditationSession, MoodDraft, MoodRecord, SessionDraft, UserStats,
};
use rusqlite::Connection;
use tracing::info;
use uuid::Uuid;

use crate::moods::Moods;
use crate::sessions::Sessions;
use crate::stats::StatsRow;
use crate::{record_time, SessionWrite, Storage, StorageError};

/// SQLite-backed storage that owns its connection.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    clock: Arc<dyn Clock>,
}

impl SqliteStorage {
    /// Open or create a database at a specific path.
    pub fn open_at(path: &Path, clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Unavailable(format!("{}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    /// Open an in-memory database (useful for testing).
    pub fn open_in_memory(clock: Arc<dyn Clock>) -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            clock,
        })
    }

    /// Default database location, `~/.local/share/mindfulmotion/mindful.db` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mindfulmotion")
            .join("mindful.db")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meditation_sessions (
                id TEXT PRIMARY KEY,
                mood TEXT NOT NULL,
                duration INTEGER NOT NULL CHECK (duration > 0),
                script TEXT NOT NULL,
                environment TEXT NOT NULL,
                completed_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS mood_records (
                id TEXT PRIMARY KEY,
                mood TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS user_stats (
                id TEXT PRIMARY KEY,
                total_sessions INTEGER NOT NULL DEFAULT 0,
                total_minutes INTEGER NOT NULL DEFAULT 0,
                current_streak INTEGER NOT NULL DEFAULT 0,
                longest_streak INTEGER NOT NULL DEFAULT 0,
                meditation_level TEXT NOT NULL DEFAULT 'Beginner'
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON meditation_sessions(completed_at DESC);
            CREATE INDEX IF NOT EXISTS idx_moods_timestamp ON mood_records(timestamp DESC);
            "#,
        )
    }
}

impl Storage for SqliteStorage {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn record_session(&self, draft: &SessionDraft) -> Result<SessionWrite, StorageError> {
        let session = draft
            .clone()
            .into_session(Uuid::new_v4().to_string(), record_time(self.clock.as_ref()));

        let mut conn = self.lock()?;
        // Insert and stats update commit together or not at all.
        let tx = conn.transaction()?;

        Sessions::new(&tx).insert(&session)?;
        let history = Sessions::new(&tx).list()?;
        let stats = recompute_stats(&history, self.clock.as_ref());

        let stats_row = StatsRow::new(&tx);
        let (stats_id, previous) = stats_row.get_or_init()?;
        stats_row.update(&stats_id, &stats)?;

        tx.commit()?;

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
        let conn = self.lock()?;
        Ok(Sessions::new(&conn).list()?)
    }

    fn create_mood_record(&self, draft: &MoodDraft) -> Result<MoodRecord, StorageError> {
        let record = draft.into_record(
            Uuid::new_v4().to_string(),
            record_time(self.clock.as_ref()),
        );

        let conn = self.lock()?;
        Moods::new(&conn).insert(&record)?;

        info!(id = %record.id, mood = %record.mood, "Mood recorded");
        Ok(record)
    }

    fn mood_records(&self) -> Result<Vec<MoodRecord>, StorageError> {
        let conn = self.lock()?;
        Ok(Moods::new(&conn).list()?)
    }

    fn stats(&self) -> Result<UserStats, StorageError> {
        let conn = self.lock()?;
        let (_, stats) = StatsRow::new(&conn).get_or_init()?;
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mindful_core::{FixedClock, MeditationLevel, SystemClock};

    fn fixed_clock() -> Arc<FixedClock> {
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 4, 20, 10, 30, 0).unwrap(),
        ))
    }

    #[test]
    fn test_stats_row_created_lazily() {
        let db = SqliteStorage::open_in_memory(Arc::new(SystemClock)).unwrap();

        let count: i64 = db
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user_stats", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);

        let stats = db.stats().unwrap();
        assert_eq!(stats, UserStats::default());

        // Reading again does not create a second row.
        db.stats().unwrap();
        let count: i64 = db
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user_stats", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_save_and_list_session() {
        let clock = fixed_clock();
        let db = SqliteStorage::open_in_memory(clock.clone()).unwrap();
        let draft = SessionDraft::new("overwhelmed", 15, "Let it go.", "aurora").unwrap();

        let created = db.create_session(&draft).unwrap();
        let sessions = db.sessions().unwrap();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0], created);
        assert_eq!(sessions[0].completed_at, clock.now());
    }

    #[test]
    fn test_create_session_persists_stats() {
        let db = SqliteStorage::open_in_memory(fixed_clock()).unwrap();
        let draft = SessionDraft::new("restless", 25, "", "bamboo").unwrap();

        db.create_session(&draft).unwrap();
        db.create_session(&draft).unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_sessions, 2);
        assert_eq!(stats.total_minutes, 50);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);
        assert_eq!(stats.meditation_level, MeditationLevel::Beginner);
    }

    #[test]
    fn test_data_survives_reopen() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mindful.db");
        let clock = fixed_clock();

        {
            let db = SqliteStorage::open_at(&path, clock.clone()).unwrap();
            db.create_session(&SessionDraft::new("tired", 7, "", "ocean").unwrap())
                .unwrap();
            db.create_mood_record(&MoodDraft::new("tired").unwrap())
                .unwrap();
        }

        let db = SqliteStorage::open_at(&path, clock).unwrap();
        assert_eq!(db.sessions().unwrap().len(), 1);
        assert_eq!(db.mood_records().unwrap().len(), 1);
        assert_eq!(db.stats().unwrap().total_minutes, 7);
    }

    #[test]
    fn test_corrupt_mood_is_reported() {
        let db = SqliteStorage::open_in_memory(fixed_clock()).unwrap();
        db.lock()
            .unwrap()
            .execute(
                "INSERT INTO mood_records (id, mood, timestamp) VALUES ('x', 'grumpy', '2026-04-20T10:30:00.000000Z')",
                [],
            )
            .unwrap();

        assert!(matches!(
            db.mood_records(),
            Err(StorageError::Database(_))
        ));
    }
}
