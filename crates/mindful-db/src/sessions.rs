//! `meditation_sessions` table.

use chrono::{DateTime, SecondsFormat, Utc};
use mindful_core::MeditationSession;
use rusqlite::types::Type;
use rusqlite::{params, Connection};

const COLUMNS: &str = "id, mood, duration, script, environment, completed_at";

/// Sessions table over a borrowed connection (or transaction).
pub(crate) struct Sessions<'c> {
    conn: &'c Connection,
}

impl<'c> Sessions<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn insert(&self, session: &MeditationSession) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            r#"
            INSERT INTO meditation_sessions (id, mood, duration, script, environment, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                session.id,
                session.mood.as_str(),
                i64::from(session.duration),
                session.script,
                session.environment.as_str(),
                format_timestamp(&session.completed_at),
            ],
        )?;

        Ok(())
    }

    /// All sessions, newest first; ties go to the later insert.
    pub(crate) fn list(&self) -> Result<Vec<MeditationSession>, rusqlite::Error> {
        let sql = format!(
            "SELECT {} FROM meditation_sessions ORDER BY completed_at DESC, rowid DESC",
            COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_session)?;

        let mut sessions = Vec::new();
        for row in rows {
            sessions.push(row?);
        }

        Ok(sessions)
    }

    fn row_to_session(row: &rusqlite::Row) -> Result<MeditationSession, rusqlite::Error> {
        let mood: String = row.get(1)?;
        let duration: i64 = row.get(2)?;
        let environment: String = row.get(4)?;
        let completed_at: String = row.get(5)?;

        Ok(MeditationSession {
            id: row.get(0)?,
            mood: mood.parse().map_err(|e| conversion_error(1, e))?,
            duration: u32::try_from(duration)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Integer, Box::new(e)))?,
            script: row.get(3)?,
            environment: environment.parse().map_err(|e| conversion_error(4, e))?,
            completed_at: parse_timestamp(5, &completed_at)?,
        })
    }
}

/// Fixed-width UTC so text ordering matches time ordering.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(idx: usize, value: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

pub(crate) fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}
