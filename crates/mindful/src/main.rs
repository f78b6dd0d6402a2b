mod api;
mod commands;
mod config;
mod server;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use mindful_core::{Clock, SystemClock};
use mindful_logging::{init_tracing, LogFormat, Logger};

use crate::config::{AppConfig, CONFIG_FILE_NAME};

#[derive(Parser, Debug)]
#[command(
    name = "mindful",
    about = "Meditation companion: session tracking, streaks and guided scripts",
    version,
    author
)]
struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    /// Log output format (overrides the config file)
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormatChoice>,

    /// Persist to the default database file when none is configured
    #[arg(long, global = true)]
    persist: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show stats and level progress
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent sessions, newest first
    Sessions {
        /// Maximum number of sessions to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List Zen Spark quick sessions
    Sparks {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatChoice {
    Pretty,
    Json,
    Compact,
}

impl From<LogFormatChoice> for LogFormat {
    fn from(choice: LogFormatChoice) -> Self {
        match choice {
            LogFormatChoice::Pretty => LogFormat::Pretty,
            LogFormatChoice::Json => LogFormat::Json,
            LogFormatChoice::Compact => LogFormat::Compact,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?.unwrap_or_default();
    config.apply_env(|key| std::env::var(key).ok())?;

    if let Commands::Serve { host, port } = &cli.command {
        if let Some(host) = host {
            config.server.host = Some(host.clone());
        }
        if let Some(port) = port {
            config.server.port = Some(*port);
        }
    }

    let log_format = match cli.log_format {
        Some(choice) => choice.into(),
        None => config.log_format()?.unwrap_or_default(),
    };
    let _log_guard = init_tracing(config.log_level(), log_format, config.logging.dir.as_deref());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    match cli.command {
        Commands::Serve { .. } => {
            server::handle_serve_command(&config, cli.persist, Logger::new(log_format), clock).await
        }
        Commands::Stats { json } => commands::handle_stats_command(&config, cli.persist, clock, json),
        Commands::Sessions { limit, json } => {
            commands::handle_sessions_command(&config, cli.persist, clock, limit, json)
        }
        Commands::Sparks { json } => commands::handle_sparks_command(json),
    }
}
