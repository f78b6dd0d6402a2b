//! Aggregate statistics and streaks over a session history.
//!
//! Everything here is recomputed from the full history. Input order never
//! matters: sessions are sorted by completion time before the streak walk.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::Clock;
use crate::level::classify;
use crate::types::{MeditationSession, UserStats};

/// Counters derived from a session history, before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Session count and minutes for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    pub date: String,
    pub sessions: u64,
    pub minutes: u64,
}

/// Count, minutes and streaks for `sessions`, with days taken from `clock`.
pub fn compute_totals<C: Clock + ?Sized>(sessions: &[MeditationSession], clock: &C) -> SessionTotals {
    let total_sessions = sessions.len() as u64;
    let total_minutes = sessions.iter().map(|s| u64::from(s.duration)).sum();

    let mut completed: Vec<_> = sessions.iter().map(|s| s.completed_at).collect();
    completed.sort_by(|a, b| b.cmp(a));
    let days: Vec<NaiveDate> = completed.into_iter().map(|t| clock.day_of(t)).collect();

    let (current_streak, longest_streak) = walk_streaks(&days, clock.today());

    SessionTotals {
        total_sessions,
        total_minutes,
        current_streak,
        longest_streak,
    }
}

/// Full stats entity: totals plus the level they qualify for.
pub fn recompute_stats<C: Clock + ?Sized>(sessions: &[MeditationSession], clock: &C) -> UserStats {
    let totals = compute_totals(sessions, clock);
    let meditation_level = classify(
        totals.total_sessions,
        totals.total_minutes,
        totals.current_streak,
    );

    debug!(
        total_sessions = totals.total_sessions,
        total_minutes = totals.total_minutes,
        current_streak = totals.current_streak,
        longest_streak = totals.longest_streak,
        level = %meditation_level,
        "Recomputed stats"
    );

    UserStats {
        total_sessions: totals.total_sessions,
        total_minutes: totals.total_minutes,
        current_streak: totals.current_streak,
        longest_streak: totals.longest_streak,
        meditation_level,
    }
}

/// Per-day activity, oldest day first.
pub fn daily_activity<C: Clock + ?Sized>(sessions: &[MeditationSession], clock: &C) -> Vec<DayActivity> {
    let mut by_day: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for s in sessions {
        let entry = by_day.entry(clock.day_of(s.completed_at)).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += u64::from(s.duration);
    }
    by_day
        .into_iter()
        .map(|(date, (sessions, minutes))| DayActivity {
            date: date.format("%Y-%m-%d").to_string(),
            sessions,
            minutes,
        })
        .collect()
}

/// Walk days newest first. Returns `(current, longest)`.
///
/// The current streak only counts a chain that starts today. Once a gap ends
/// that chain its value is kept; older chains only feed the longest streak.
fn walk_streaks(days_desc: &[NaiveDate], today: NaiveDate) -> (u32, u32) {
    let mut last_day: Option<NaiveDate> = None;
    let mut temp_streak = 0u32;
    let mut current_streak = 0u32;
    let mut longest_streak = 0u32;
    let mut anchored = false;

    for &day in days_desc {
        match last_day {
            None => {
                temp_streak = 1;
                if day == today {
                    current_streak = 1;
                    anchored = true;
                }
            }
            Some(prev) => {
                let day_diff = (prev - day).num_days();
                if day_diff == 1 {
                    temp_streak += 1;
                    if anchored {
                        current_streak += 1;
                    }
                } else if day_diff > 1 {
                    longest_streak = longest_streak.max(temp_streak);
                    temp_streak = 1;
                    anchored = false;
                }
                // day_diff == 0: same calendar day, already counted
            }
        }
        last_day = Some(day);
    }

    longest_streak = longest_streak.max(temp_streak).max(current_streak);
    (current_streak, longest_streak)
}
