//! # mindful-core
//!
//! Domain model for mindfulmotion: sessions, mood check-ins, the stats
//! engine and level classification.
//!
//! ## Key Types
//!
//! - [`MeditationSession`] / [`MoodRecord`] - stored records
//! - [`SessionDraft`] / [`MoodDraft`] - validated input
//! - [`UserStats`] - aggregate counters plus [`MeditationLevel`]
//! - [`Clock`] - time source used for day normalization

pub mod catalog;
pub mod clock;
mod error;
pub mod level;
pub mod stats;
mod types;

pub use catalog::{
    environment_info, zen_spark, EnvironmentInfo, ZenSpark, ENVIRONMENTS, ZEN_SPARKS,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ValidationError;
pub use level::{classify, LevelProgress, LevelThreshold, MeditationLevel};
pub use stats::{compute_totals, daily_activity, recompute_stats, DayActivity, SessionTotals};
pub use types::{
    validate_duration, Environment, MeditationSession, Mood, MoodDraft, MoodRecord, SessionDraft,
    UserStats,
};
