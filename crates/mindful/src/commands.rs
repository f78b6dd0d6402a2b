use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;

use mindful_core::{
    environment_info, Clock, LevelProgress, MeditationSession, UserStats, ZenSpark, ZEN_SPARKS,
};
use mindful_db::{open_storage, Storage};

use crate::config::AppConfig;

fn open(config: &AppConfig, persist: bool, clock: Arc<dyn Clock>) -> Result<Arc<dyn Storage>> {
    let settings = config.storage_settings(persist);
    if settings.database.is_none() {
        eprintln!(
            "{}",
            "No database configured; history is not persisted. Set DATABASE_URL or use --persist."
                .dimmed()
        );
    }
    open_storage(&settings, clock).context("Failed to open storage")
}

pub fn handle_stats_command(
    config: &AppConfig,
    persist: bool,
    clock: Arc<dyn Clock>,
    json: bool,
) -> Result<()> {
    let storage = open(config, persist, clock)?;
    let stats = storage.stats()?;
    let progress = LevelProgress::for_stats(&stats);

    if json {
        let value = serde_json::json!({ "stats": stats, "progress": progress });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_stats(&stats, &progress));
    }
    Ok(())
}

pub fn handle_sessions_command(
    config: &AppConfig,
    persist: bool,
    clock: Arc<dyn Clock>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let storage = open(config, persist, clock)?;
    let mut sessions = storage.sessions()?;
    sessions.truncate(limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
    } else if sessions.is_empty() {
        println!("{}", "No sessions found.".dimmed());
    } else {
        print!("{}", format_sessions(&sessions));
    }
    Ok(())
}

pub fn handle_sparks_command(json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ZEN_SPARKS[..])?);
    } else {
        print!("{}", format_sparks(&ZEN_SPARKS));
    }
    Ok(())
}

fn format_stats(stats: &UserStats, progress: &LevelProgress) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {}\n\n",
        "Level".bold(),
        stats.meditation_level.to_string().bright_cyan().bold()
    ));
    out.push_str(&format!("  Sessions:        {}\n", stats.total_sessions));
    out.push_str(&format!("  Minutes:         {}\n", stats.total_minutes));
    out.push_str(&format!(
        "  Current streak:  {} {}\n",
        stats.current_streak,
        plural(u64::from(stats.current_streak), "day", "days")
    ));
    out.push_str(&format!(
        "  Longest streak:  {} {}\n",
        stats.longest_streak,
        plural(u64::from(stats.longest_streak), "day", "days")
    ));
    out.push('\n');

    match progress.next_level {
        Some(next) => {
            out.push_str(&format!(
                "  {} {} {:.0}%\n",
                "Next:".dimmed(),
                next,
                progress.progress_percent
            ));
            out.push_str(&format!(
                "  {} {}\n",
                "Needs:".dimmed(),
                progress.requirement
            ));
        }
        None => out.push_str(&format!("  {}\n", progress.requirement.bright_green())),
    }
    out
}

fn format_sessions(sessions: &[MeditationSession]) -> String {
    let mut out = format!(
        "{:<20} {:<12} {:>5}  {}\n",
        "COMPLETED".bold(),
        "MOOD".bold(),
        "MIN".bold(),
        "ENVIRONMENT".bold()
    );
    for s in sessions {
        out.push_str(&format!(
            "{:<20} {:<12} {:>5}  {}\n",
            s.completed_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            s.mood,
            s.duration,
            environment_info(s.environment).name
        ));
    }
    out
}

fn format_sparks(sparks: &[ZenSpark]) -> String {
    sparks
        .iter()
        .map(|spark| {
            format!(
                "{} {} {}\n    {}\n",
                spark.title.bold(),
                format!("({} min)", spark.duration).dimmed(),
                format!("for {}", spark.mood).bright_cyan(),
                spark.description
            )
        })
        .collect()
}

fn plural(n: u64, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}
