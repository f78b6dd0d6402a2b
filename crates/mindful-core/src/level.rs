//! Progression tiers and the thresholds that unlock them.

use serde::{Deserialize, Serialize};

use crate::types::UserStats;

/// Progression tier, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MeditationLevel {
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

impl MeditationLevel {
    pub const ALL: [MeditationLevel; 4] = [
        MeditationLevel::Beginner,
        MeditationLevel::Intermediate,
        MeditationLevel::Advanced,
        MeditationLevel::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeditationLevel::Beginner => "Beginner",
            MeditationLevel::Intermediate => "Intermediate",
            MeditationLevel::Advanced => "Advanced",
            MeditationLevel::Master => "Master",
        }
    }

    /// The tier above this one, `None` at Master.
    pub fn next(&self) -> Option<MeditationLevel> {
        match self {
            MeditationLevel::Beginner => Some(MeditationLevel::Intermediate),
            MeditationLevel::Intermediate => Some(MeditationLevel::Advanced),
            MeditationLevel::Advanced => Some(MeditationLevel::Master),
            MeditationLevel::Master => None,
        }
    }

    pub fn threshold(&self) -> LevelThreshold {
        match self {
            MeditationLevel::Beginner => LevelThreshold::new(0, 0, 0),
            MeditationLevel::Intermediate => LevelThreshold::new(10, 50, 3),
            MeditationLevel::Advanced => LevelThreshold::new(30, 200, 7),
            MeditationLevel::Master => LevelThreshold::new(100, 500, 14),
        }
    }
}

impl std::fmt::Display for MeditationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeditationLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Beginner" => Ok(MeditationLevel::Beginner),
            "Intermediate" => Ok(MeditationLevel::Intermediate),
            "Advanced" => Ok(MeditationLevel::Advanced),
            "Master" => Ok(MeditationLevel::Master),
            _ => Err(format!("Unknown meditation level: {}", s)),
        }
    }
}

/// Minimums that must all be met to reach a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThreshold {
    pub min_sessions: u64,
    pub min_minutes: u64,
    pub min_streak: u32,
}

impl LevelThreshold {
    pub const fn new(min_sessions: u64, min_minutes: u64, min_streak: u32) -> Self {
        Self {
            min_sessions,
            min_minutes,
            min_streak,
        }
    }

    /// All three criteria, inclusive.
    pub fn is_met(&self, total_sessions: u64, total_minutes: u64, current_streak: u32) -> bool {
        total_sessions >= self.min_sessions
            && total_minutes >= self.min_minutes
            && current_streak >= self.min_streak
    }
}

/// Highest level whose thresholds are all met, checked from Master down.
pub fn classify(total_sessions: u64, total_minutes: u64, current_streak: u32) -> MeditationLevel {
    MeditationLevel::ALL
        .iter()
        .rev()
        .copied()
        .find(|level| {
            level
                .threshold()
                .is_met(total_sessions, total_minutes, current_streak)
        })
        .unwrap_or(MeditationLevel::Beginner)
}

/// How far the user is from the next tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub current_level: MeditationLevel,
    pub next_level: Option<MeditationLevel>,
    /// 0–100, the mean of the session, minute and streak ratios.
    pub progress_percent: f64,
    pub requirement: String,
}

impl LevelProgress {
    pub fn for_stats(stats: &UserStats) -> Self {
        let current_level = stats.meditation_level;

        let Some(next_level) = current_level.next() else {
            return Self {
                current_level,
                next_level: None,
                progress_percent: 100.0,
                requirement: "Master Level Achieved!".to_string(),
            };
        };

        let threshold = next_level.threshold();
        let sessions = ratio(stats.total_sessions as f64, threshold.min_sessions as f64);
        let minutes = ratio(stats.total_minutes as f64, threshold.min_minutes as f64);
        let streak = ratio(
            f64::from(stats.current_streak),
            f64::from(threshold.min_streak),
        );
        let progress_percent = ((sessions + minutes + streak) / 3.0 * 100.0).min(100.0);

        Self {
            current_level,
            next_level: Some(next_level),
            progress_percent,
            requirement: format!(
                "{} sessions, {} minutes, {} day streak",
                threshold.min_sessions, threshold.min_minutes, threshold.min_streak
            ),
        }
    }
}

fn ratio(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        1.0
    } else {
        value / target
    }
}
