//! Configuration file support for mindful.
//!
//! Loads configuration from `mindful.toml` (or the path given with
//! `--config`), then applies environment overrides.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use mindful_db::{SqliteStorage, StorageSettings};
use mindful_logging::LogFormat;
use mindful_script::GeneratorConfig;

/// The config file name
pub const CONFIG_FILE_NAME: &str = "mindful.toml";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Top-level configuration loaded from `mindful.toml`
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub script: ScriptConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// SQLite path or `sqlite://` URL. Absent selects in-memory storage.
    pub database: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    /// Only ever read from the environment.
    #[serde(skip)]
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    /// Directory for daily rolling JSON log files
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from `path`.
    ///
    /// Returns:
    /// - `Ok(Some(config))` if file exists and parses successfully
    /// - `Ok(None)` if file does not exist
    /// - `Err(...)` if file exists but fails to parse (hard error)
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(Some(config))
    }

    /// Apply environment overrides. `lookup` is `std::env::var` outside tests.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("DATABASE_URL") {
            self.storage.database = Some(url);
        }
        if let Some(key) =
            lookup("AI_INTEGRATIONS_OPENAI_API_KEY").or_else(|| lookup("OPENAI_API_KEY"))
        {
            self.script.api_key = Some(key);
        }
        if let Some(base_url) = lookup("AI_INTEGRATIONS_OPENAI_BASE_URL") {
            self.script.base_url = Some(base_url);
        }
        if let Some(port) = lookup("PORT") {
            let port = port
                .trim()
                .parse::<u16>()
                .with_context(|| format!("Invalid PORT value: {}", port))?;
            self.server.port = Some(port);
        }
        Ok(())
    }

    pub fn host(&self) -> &str {
        self.server.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.server.port.unwrap_or(DEFAULT_PORT)
    }

    /// Storage selection. With `persist`, an unset database falls back to the default file.
    pub fn storage_settings(&self, persist: bool) -> StorageSettings {
        match &self.storage.database {
            Some(database) => StorageSettings::with_database(database.clone()),
            None if persist => {
                StorageSettings::with_database(SqliteStorage::default_path().display().to_string())
            }
            None => StorageSettings::in_memory(),
        }
    }

    pub fn generator_config(&self) -> GeneratorConfig {
        let script = &self.script;
        let mut config = GeneratorConfig::default();

        if let Some(key) = &script.api_key {
            config = config.with_api_key(key.clone());
        }
        if let Some(base_url) = &script.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(model) = &script.model {
            config = config.with_model(model.clone());
        }
        if let Some(timeout) = script.timeout {
            config = config.with_timeout(timeout);
        }
        if let Some(max_retries) = script.max_retries {
            config = config.with_max_retries(max_retries);
        }
        if let Some(temperature) = script.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = script.max_tokens {
            config.max_tokens = max_tokens;
        }
        config
    }

    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_format(&self) -> Result<Option<LogFormat>> {
        self.logging
            .format
            .as_deref()
            .map(|f| f.parse::<LogFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let result = AppConfig::load(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 8080

[storage]
database = "sqlite:///tmp/mindful.db"

[script]
model = "gpt-4o"
timeout = "45s"
max_retries = 0
temperature = 0.5
max_tokens = 600

[logging]
level = "debug"
format = "json"
dir = "/tmp/mindful-logs"
"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap().unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.port(), 8080);
        assert_eq!(
            config.storage_settings(false).database.as_deref(),
            Some("sqlite:///tmp/mindful.db")
        );
        assert_eq!(config.log_level(), "debug");
        assert_eq!(config.log_format().unwrap(), Some(LogFormat::Json));
        assert_eq!(
            config.logging.dir.as_deref(),
            Some(Path::new("/tmp/mindful-logs"))
        );

        let generator = config.generator_config();
        assert_eq!(generator.model, "gpt-4o");
        assert_eq!(generator.timeout, Duration::from_secs(45));
        assert_eq!(generator.max_retries, 0);
        assert_eq!(generator.max_tokens, 600);
        assert!(generator.api_key.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.host(), DEFAULT_HOST);
        assert_eq!(config.port(), DEFAULT_PORT);
        assert!(config.storage_settings(false).database.is_none());
        assert_eq!(config.log_format().unwrap(), None);

        let generator = config.generator_config();
        assert_eq!(generator.model, "gpt-4o-mini");
        assert!((generator.temperature - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_persist_uses_default_path() {
        let settings = AppConfig::default().storage_settings(true);
        let database = settings.database.unwrap();
        assert!(database.ends_with("mindful.db"));
    }

    #[test]
    fn test_unknown_field_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[server]\nhots = \"localhost\"\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_api_key_not_accepted_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[script]\napi_key = \"sk-leaked\"\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.storage.database = Some("from-file.db".into());

        config
            .apply_env(env(&[
                ("DATABASE_URL", "sqlite://env.db"),
                ("OPENAI_API_KEY", "sk-fallback"),
                ("AI_INTEGRATIONS_OPENAI_API_KEY", "sk-primary"),
                ("AI_INTEGRATIONS_OPENAI_BASE_URL", "http://localhost:1234/v1"),
                ("PORT", "7000"),
            ]))
            .unwrap();

        assert_eq!(config.storage.database.as_deref(), Some("sqlite://env.db"));
        assert_eq!(config.port(), 7000);
        let generator = config.generator_config();
        assert_eq!(generator.api_key.as_deref(), Some("sk-primary"));
        assert_eq!(
            generator.completions_url(),
            "http://localhost:1234/v1/chat/completions"
        );
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_env(env(&[("DATABASE_URL", "  "), ("OPENAI_API_KEY", "sk-x")]))
            .unwrap();
        assert!(config.storage.database.is_none());
        assert_eq!(config.script.api_key.as_deref(), Some("sk-x"));
    }

    #[test]
    fn test_invalid_port_env() {
        let mut config = AppConfig::default();
        assert!(config.apply_env(env(&[("PORT", "eighty")])).is_err());
    }
}
