use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::level::MeditationLevel;

/// How the user reports feeling before a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Anxious,
    Stressed,
    Overwhelmed,
    Restless,
    Tired,
    Peaceful,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Anxious,
        Mood::Stressed,
        Mood::Overwhelmed,
        Mood::Restless,
        Mood::Tired,
        Mood::Peaceful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Anxious => "anxious",
            Mood::Stressed => "stressed",
            Mood::Overwhelmed => "overwhelmed",
            Mood::Restless => "restless",
            Mood::Tired => "tired",
            Mood::Peaceful => "peaceful",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anxious" => Ok(Mood::Anxious),
            "stressed" => Ok(Mood::Stressed),
            "overwhelmed" => Ok(Mood::Overwhelmed),
            "restless" => Ok(Mood::Restless),
            "tired" => Ok(Mood::Tired),
            "peaceful" => Ok(Mood::Peaceful),
            _ => Err(ValidationError::UnknownMood(s.to_string())),
        }
    }
}

/// The scene a session is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Bamboo,
    Ocean,
    Aurora,
    Temple,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Bamboo,
        Environment::Ocean,
        Environment::Aurora,
        Environment::Temple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Bamboo => "bamboo",
            Environment::Ocean => "ocean",
            Environment::Aurora => "aurora",
            Environment::Temple => "temple",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bamboo" => Ok(Environment::Bamboo),
            "ocean" => Ok(Environment::Ocean),
            "aurora" => Ok(Environment::Aurora),
            "temple" => Ok(Environment::Temple),
            _ => Err(ValidationError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// A completed meditation session. Never mutated once stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeditationSession {
    pub id: String,
    pub mood: Mood,
    /// Minutes.
    pub duration: u32,
    pub script: String,
    pub environment: Environment,
    pub completed_at: DateTime<Utc>,
}

/// A mood check-in, recorded independently of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub id: String,
    pub mood: Mood,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate statistics for the (single) user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_sessions: u64,
    pub total_minutes: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub meditation_level: MeditationLevel,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            total_minutes: 0,
            current_streak: 0,
            longest_streak: 0,
            meditation_level: MeditationLevel::Beginner,
        }
    }
}

/// Validated input for a new session. Id and completion time are assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionDraft {
    mood: Mood,
    duration: u32,
    script: String,
    environment: Environment,
}

impl SessionDraft {
    /// Validate raw input. Nothing invalid ever reaches storage.
    pub fn new(
        mood: &str,
        duration_minutes: i64,
        script: impl Into<String>,
        environment: &str,
    ) -> Result<Self, ValidationError> {
        let mood = mood.parse::<Mood>()?;
        let environment = environment.parse::<Environment>()?;
        let duration = validate_duration(duration_minutes)?;

        Ok(Self {
            mood,
            duration,
            script: script.into(),
            environment,
        })
    }

    /// Build from already-typed values; only the duration can still be wrong.
    pub fn from_parts(
        mood: Mood,
        duration_minutes: u32,
        script: impl Into<String>,
        environment: Environment,
    ) -> Result<Self, ValidationError> {
        let duration = validate_duration(i64::from(duration_minutes))?;
        Ok(Self {
            mood,
            duration,
            script: script.into(),
            environment,
        })
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn duration(&self) -> u32 {
        self.duration
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Turn the draft into a stored session.
    pub fn into_session(self, id: String, completed_at: DateTime<Utc>) -> MeditationSession {
        MeditationSession {
            id,
            mood: self.mood,
            duration: self.duration,
            script: self.script,
            environment: self.environment,
            completed_at,
        }
    }
}

/// Validated input for a mood check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoodDraft {
    mood: Mood,
}

impl MoodDraft {
    pub fn new(mood: &str) -> Result<Self, ValidationError> {
        Ok(Self { mood: mood.parse()? })
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }

    pub fn into_record(self, id: String, timestamp: DateTime<Utc>) -> MoodRecord {
        MoodRecord {
            id,
            mood: self.mood,
            timestamp,
        }
    }
}

impl From<Mood> for MoodDraft {
    fn from(mood: Mood) -> Self {
        Self { mood }
    }
}

/// Positive minutes that fit in a `u32`.
pub fn validate_duration(duration_minutes: i64) -> Result<u32, ValidationError> {
    if duration_minutes <= 0 {
        return Err(ValidationError::NonPositiveDuration(duration_minutes));
    }
    u32::try_from(duration_minutes).map_err(|_| ValidationError::DurationTooLarge(duration_minutes))
}
