//! `mood_records` table.

use mindful_core::MoodRecord;
use rusqlite::{params, Connection};

use crate::sessions::{conversion_error, format_timestamp, parse_timestamp};

pub(crate) struct Moods<'c> {
    conn: &'c Connection,
}

impl<'c> Moods<'c> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub(crate) fn insert(&self, record: &MoodRecord) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT INTO mood_records (id, mood, timestamp) VALUES (?1, ?2, ?3)",
            params![
                record.id,
                record.mood.as_str(),
                format_timestamp(&record.timestamp)
            ],
        )?;
        Ok(())
    }

    pub(crate) fn list(&self) -> Result<Vec<MoodRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT id, mood, timestamp FROM mood_records ORDER BY timestamp DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            let mood: String = row.get(1)?;
            let timestamp: String = row.get(2)?;
            Ok(MoodRecord {
                id: row.get(0)?,
                mood: mood.parse().map_err(|e| conversion_error(1, e))?,
                timestamp: parse_timestamp(2, &timestamp)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }

        Ok(records)
    }
}
