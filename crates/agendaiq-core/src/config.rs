use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{DEFAULT_OCCURRENCES, MAX_OCCURRENCES, PREVIEW_CAP, PREVIEW_SHOWN};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub repeat: RepeatSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the bind address in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Knobs for the repeat-meeting preview.
#[derive(Debug, Clone, Deserialize)]
pub struct RepeatSettings {
    /// Hard cap on generated dates when the series has no occurrence count.
    pub preview_cap: u32,
    /// Number of dates listed before the preview switches to a count.
    pub preview_shown: usize,
    /// Occurrence count used when `endType = after` omits one.
    pub default_occurrences: u32,
    /// Upper bound on a requested occurrence count.
    pub max_occurrences: u32,
    /// IANA zone that offset-bearing timestamps are converted into.
    pub timezone: String,
}

impl Default for RepeatSettings {
    fn default() -> Self {
        Self {
            preview_cap: PREVIEW_CAP,
            preview_shown: PREVIEW_SHOWN,
            default_occurrences: DEFAULT_OCCURRENCES,
            max_occurrences: MAX_OCCURRENCES,
            timezone: "UTC".to_string(),
        }
    }
}

impl RepeatSettings {
    /// ## Summary
    /// Resolves the configured timezone name.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` if the name is not a known IANA zone.
    pub fn zone(&self) -> CoreResult<chrono_tz::Tz> {
        self.timezone.parse::<chrono_tz::Tz>().map_err(|err| {
            CoreError::ConfigError(format!("unknown timezone {:?}: {err}", self.timezone))
        })
    }

    /// ## Summary
    /// Checks that the repeat settings describe a usable engine.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` for an unknown timezone, a zero
    /// `preview_cap`, or a `default_occurrences` outside
    /// `1..=max_occurrences`.
    pub fn validate(&self) -> CoreResult<()> {
        self.zone()?;
        if self.preview_cap == 0 {
            return Err(CoreError::ConfigError(
                "repeat.preview_cap must be at least 1".to_string(),
            ));
        }
        if self.default_occurrences == 0 || self.default_occurrences > self.max_occurrences {
            return Err(CoreError::ConfigError(format!(
                "repeat.default_occurrences must be in 1..={}, got {}",
                self.max_occurrences, self.default_occurrences
            )));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Config builder pre-populated with every default value.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be registered.
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let repeat = RepeatSettings::default();
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8710)?
            .set_default("logging.level", "debug")?
            .set_default("repeat.preview_cap", repeat.preview_cap)?
            .set_default("repeat.preview_shown", u64::try_from(repeat.preview_shown)?)?
            .set_default("repeat.default_occurrences", repeat.default_occurrences)?
            .set_default("repeat.max_occurrences", repeat.max_occurrences)?
            .set_default("repeat.timezone", repeat.timezone)?)
    }

    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails,
    /// or if the configured timezone is unknown.
    pub fn load() -> Result<Self> {
        let settings = Self::defaults()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("AGENDAIQ")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.repeat.validate()?;

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    if let Err(err) = dotenvy::dotenv() {
        tracing::debug!(error = %err, "No .env file loaded");
    }

    Settings::load()
}
