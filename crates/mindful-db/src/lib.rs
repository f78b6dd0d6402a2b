//! Storage layer for mindfulmotion.
//!
//! One [`Storage`] interface with two backends:
//!
//! - [`MemStorage`] - process-lifetime storage, used when no database is configured
//! - [`SqliteStorage`] - SQLite file owned behind a mutex
//!
//! Both recompute [`UserStats`] from the full history on every session write,
//! using the shared engine in `mindful-core`. Writes are serialized by each
//! backend's mutex, so concurrent writers never lose a stats update.

mod memory;
mod moods;
mod sessions;
mod sqlite;
mod stats;

pub use memory::MemStorage;
pub use sqlite::SqliteStorage;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use mindful_core::{
    Clock, MeditationLevel, MeditationSession, MoodDraft, MoodRecord, SessionDraft, UserStats,
};
use thiserror::Error;
use tracing::info;

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The persistent backend cannot be used. Fatal at startup.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Session, mood and stats persistence.
///
/// There is no update or delete: records are append-only.
pub trait Storage: Send + Sync {
    /// Short name of the backend (e.g., "memory", "sqlite").
    fn backend_name(&self) -> &'static str;

    /// Store a session and recompute stats from the full history, all under
    /// one lock. The returned stats are the ones this write produced.
    fn record_session(&self, draft: &SessionDraft) -> Result<SessionWrite, StorageError>;

    /// Store a session, then recompute stats from the full history before returning.
    fn create_session(&self, draft: &SessionDraft) -> Result<MeditationSession, StorageError> {
        self.record_session(draft).map(|write| write.session)
    }

    /// All sessions, newest first.
    fn sessions(&self) -> Result<Vec<MeditationSession>, StorageError>;

    fn create_mood_record(&self, draft: &MoodDraft) -> Result<MoodRecord, StorageError>;

    /// All mood check-ins, newest first.
    fn mood_records(&self) -> Result<Vec<MoodRecord>, StorageError>;

    /// Stats as of the last session write. Zeroed/Beginner before any session.
    fn stats(&self) -> Result<UserStats, StorageError>;
}

/// Result of [`Storage::record_session`].
#[derive(Debug, Clone, PartialEq)]
pub struct SessionWrite {
    pub session: MeditationSession,
    /// Stats stored just before this session
    pub previous: UserStats,
    pub stats: UserStats,
}

impl SessionWrite {
    /// The level this write promoted the user to, if any.
    pub fn level_reached(&self) -> Option<MeditationLevel> {
        (self.stats.meditation_level > self.previous.meditation_level)
            .then_some(self.stats.meditation_level)
    }
}

/// Creation time for a new record, at the precision the SQLite columns keep.
pub(crate) fn record_time(clock: &dyn Clock) -> DateTime<Utc> {
    clock.now().trunc_subsecs(6)
}

/// Where sessions are persisted. `None` selects the in-memory backend.
#[derive(Debug, Default, Clone)]
pub struct StorageSettings {
    pub database: Option<String>,
}

impl StorageSettings {
    pub fn in_memory() -> Self {
        Self { database: None }
    }

    pub fn with_database(database: impl Into<String>) -> Self {
        Self {
            database: Some(database.into()),
        }
    }
}

/// Select and open the backend once, at process start.
pub fn open_storage(
    settings: &StorageSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn Storage>, StorageError> {
    let Some(target) = settings.database.as_deref() else {
        info!("No database configured, using in-memory storage");
        return Ok(Arc::new(MemStorage::new(clock)));
    };

    let storage = match DatabaseTarget::parse(target)? {
        DatabaseTarget::Memory => SqliteStorage::open_in_memory(clock),
        DatabaseTarget::File(path) => {
            info!(path = %path.display(), "Opening SQLite storage");
            SqliteStorage::open_at(&path, clock)
                .map_err(|e| StorageError::Unavailable(format!("{}: {}", path.display(), e)))
        }
    }?;

    Ok(Arc::new(storage))
}

#[derive(Debug, PartialEq, Eq)]
enum DatabaseTarget {
    Memory,
    File(PathBuf),
}

impl DatabaseTarget {
    fn parse(target: &str) -> Result<Self, StorageError> {
        let target = target.trim();
        let target = target
            .strip_prefix("sqlite://")
            .or_else(|| target.strip_prefix("sqlite:"))
            .unwrap_or(target);

        if target.is_empty() {
            return Err(StorageError::Unavailable(
                "database target is empty".to_string(),
            ));
        }

        if target == ":memory:" {
            return Ok(Self::Memory);
        }

        if let Some((scheme, _)) = target.split_once("://") {
            return Err(StorageError::Unavailable(format!(
                "unsupported database scheme '{}', expected a SQLite path",
                scheme
            )));
        }

        if let Some(rest) = target.strip_prefix("~/") {
            let home = dirs::home_dir().ok_or_else(|| {
                StorageError::Unavailable("could not determine home directory".to_string())
            })?;
            return Ok(Self::File(home.join(rest)));
        }

        Ok(Self::File(PathBuf::from(target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindful_core::SystemClock;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(SystemClock)
    }

    #[test]
    fn test_no_database_selects_memory() {
        let storage = open_storage(&StorageSettings::in_memory(), clock()).unwrap();
        assert_eq!(storage.backend_name(), "memory");
    }

    #[test]
    fn test_file_target_selects_sqlite() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("mindful.db");
        let settings = StorageSettings::with_database(path.to_string_lossy().to_string());

        let storage = open_storage(&settings, clock()).unwrap();
        assert_eq!(storage.backend_name(), "sqlite");
        assert!(path.exists());
    }

    #[test]
    fn test_empty_target_is_unavailable() {
        let result = open_storage(&StorageSettings::with_database("  "), clock());
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_foreign_scheme_is_unavailable() {
        let result = open_storage(
            &StorageSettings::with_database("postgres://user@host/db"),
            clock(),
        );
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn test_record_time_keeps_micros() {
        use chrono::{TimeZone, Timelike};
        use mindful_core::FixedClock;

        let now = Utc.with_ymd_and_hms(2026, 5, 10, 9, 0, 0).unwrap()
            + chrono::Duration::nanoseconds(123_456_789);
        let time = record_time(&FixedClock::new(now));
        assert_eq!(time.nanosecond(), 123_456_000);
    }

    #[test]
    fn test_level_reached_only_on_promotion() {
        let beginner = UserStats::default();
        let intermediate = UserStats {
            meditation_level: MeditationLevel::Intermediate,
            ..UserStats::default()
        };
        let session = SessionDraft::new("peaceful", 5, "", "ocean")
            .unwrap()
            .into_session("s1".to_string(), Utc::now());

        let write = SessionWrite {
            session: session.clone(),
            previous: beginner.clone(),
            stats: intermediate.clone(),
        };
        assert_eq!(write.level_reached(), Some(MeditationLevel::Intermediate));

        let write = SessionWrite {
            session,
            previous: intermediate.clone(),
            stats: intermediate,
        };
        assert_eq!(write.level_reached(), None);
    }

    #[test]
    fn test_parse_targets() {
        assert_eq!(
            DatabaseTarget::parse("sqlite://:memory:").unwrap(),
            DatabaseTarget::Memory
        );
        assert_eq!(
            DatabaseTarget::parse("sqlite:/tmp/m.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("/tmp/m.db"))
        );
        assert_eq!(
            DatabaseTarget::parse("data/m.db").unwrap(),
            DatabaseTarget::File(PathBuf::from("data/m.db"))
        );
    }
}
