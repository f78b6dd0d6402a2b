//! `user_stats` table: a single row, created lazily.

use mindful_core::{MeditationLevel, UserStats};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use crate::StorageError;

pub(crate) struct StatsRow<'c> {
    conn: &'c Connection,
}

impl<'c> StatsRow<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Load the row, inserting a zeroed Beginner row first if none exists.
    pub(crate) fn get_or_init(&self) -> Result<(String, UserStats), StorageError> {
        if let Some(row) = self.load()? {
            return Ok(row);
        }

        let id = Uuid::new_v4().to_string();
        let stats = UserStats::default();
        self.conn.execute(
            r#"
            INSERT INTO user_stats (id, total_sessions, total_minutes, current_streak, longest_streak, meditation_level)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                id,
                stats.total_sessions as i64,
                stats.total_minutes as i64,
                stats.current_streak,
                stats.longest_streak,
                stats.meditation_level.as_str(),
            ],
        )?;
        debug!(id = %id, "Initialized stats row");

        Ok((id, stats))
    }

    pub(crate) fn update(&self, id: &str, stats: &UserStats) -> Result<(), StorageError> {
        self.conn.execute(
            r#"
            UPDATE user_stats SET
                total_sessions = ?1,
                total_minutes = ?2,
                current_streak = ?3,
                longest_streak = ?4,
                meditation_level = ?5
            WHERE id = ?6
            "#,
            params![
                stats.total_sessions as i64,
                stats.total_minutes as i64,
                stats.current_streak,
                stats.longest_streak,
                stats.meditation_level.as_str(),
                id,
            ],
        )?;
        Ok(())
    }

    fn load(&self) -> Result<Option<(String, UserStats)>, StorageError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, total_sessions, total_minutes, current_streak, longest_streak, meditation_level
                FROM user_stats ORDER BY rowid LIMIT 1
                "#,
                [],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, i64>(2)?,
                        row.get::<_, u32>(3)?,
                        row.get::<_, u32>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, sessions, minutes, current, longest, level)) = row else {
            return Ok(None);
        };

        let meditation_level = level
            .parse::<MeditationLevel>()
            .map_err(StorageError::CorruptRecord)?;
        let total_sessions = u64::try_from(sessions)
            .map_err(|_| StorageError::CorruptRecord(format!("total_sessions = {}", sessions)))?;
        let total_minutes = u64::try_from(minutes)
            .map_err(|_| StorageError::CorruptRecord(format!("total_minutes = {}", minutes)))?;

        Ok(Some((
            id,
            UserStats {
                total_sessions,
                total_minutes,
                current_streak: current,
                longest_streak: longest,
                meditation_level,
            },
        )))
    }
}
