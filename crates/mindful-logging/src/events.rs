use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// Lifecycle events shown on the service console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LogEvent {
    ServerStarted {
        address: String,
        storage: String,
        generator: String,
    },
    SessionCompleted {
        mood: String,
        duration_minutes: u32,
        current_streak: u32,
        total_sessions: u64,
    },
    LevelReached {
        level: String,
    },
    ScriptFallback {
        mood: String,
        generator: String,
    },
    ServerStopped {
        uptime_secs: f64,
    },
}

impl LogEvent {
    fn with_timestamp(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        if let Some(obj) = value.as_object_mut() {
            obj.insert(
                "timestamp".to_string(),
                serde_json::Value::String(chrono::Utc::now().to_rfc3339()),
            );
        }
        value
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format with colors
    #[default]
    Pretty,
    /// JSON lines format for machine consumption
    Json,
    /// Compact single-line format
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Renders lifecycle events to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    format: LogFormat,
}

impl Logger {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn log(&self, event: &LogEvent) {
        let _ = writeln!(std::io::stderr(), "{}", self.render(event));
    }

    /// Text for `event` in this logger's format.
    pub fn render(&self, event: &LogEvent) -> String {
        match self.format {
            LogFormat::Json => event.with_timestamp().to_string(),
            LogFormat::Pretty => Self::render_pretty(event),
            LogFormat::Compact => Self::render_compact(event),
        }
    }

    fn render_pretty(event: &LogEvent) -> String {
        match event {
            LogEvent::ServerStarted {
                address,
                storage,
                generator,
            } => format!(
                "\n{}  {}\n  {} {}\n  {} {}\n  {} {}\n",
                "◯".bright_cyan(),
                "mindfulmotion".bold().bright_white(),
                "Listening:".dimmed(),
                format!("http://{}", address).bright_cyan(),
                "Storage:".dimmed(),
                storage,
                "Scripts:".dimmed(),
                generator
            ),
            LogEvent::SessionCompleted {
                mood,
                duration_minutes,
                current_streak,
                total_sessions,
            } => format!(
                "  {} {} min ({}) · streak {} · {} total",
                "✓".bright_green(),
                duration_minutes,
                mood,
                current_streak.to_string().bright_yellow(),
                total_sessions
            ),
            LogEvent::LevelReached { level } => format!(
                "  {} Level reached: {}",
                "★".bright_yellow(),
                level.bright_yellow().bold()
            ),
            LogEvent::ScriptFallback { mood, generator } => format!(
                "  {} Fallback script for {} ({} failed)",
                "⚠".bright_yellow(),
                mood,
                generator.dimmed()
            ),
            LogEvent::ServerStopped { uptime_secs } => format!(
                "\n{} Stopped after {:.1}s",
                "◯".bright_cyan(),
                uptime_secs
            ),
        }
    }

    fn render_compact(event: &LogEvent) -> String {
        let timestamp = chrono::Utc::now().format("%H:%M:%S");
        match event {
            LogEvent::ServerStarted {
                address, storage, ..
            } => format!("[{}] server:start {} storage={}", timestamp, address, storage),
            LogEvent::SessionCompleted {
                mood,
                duration_minutes,
                current_streak,
                ..
            } => format!(
                "[{}] session:{} {}m streak={}",
                timestamp, mood, duration_minutes, current_streak
            ),
            LogEvent::LevelReached { level } => format!("[{}] level:{}", timestamp, level),
            LogEvent::ScriptFallback { mood, .. } => {
                format!("[{}] script:fallback:{}", timestamp, mood)
            }
            LogEvent::ServerStopped { uptime_secs } => {
                format!("[{}] server:stop {:.1}s", timestamp, uptime_secs)
            }
        }
    }
}
