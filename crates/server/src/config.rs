use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use shared_types::AppConfig;

use crate::stripe::client::StripeSettings;

/// Default location of the config file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Session cookie and token settings, read from the environment.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: String,
    pub ttl_hours: i64,
    pub cookie_secure: bool,
    pub cookie_domain: Option<String>,
}

impl SessionConfig {
    /// `SESSION_SECRET` is mandatory; everything else has a default.
    pub fn from_env() -> Result<Self, String> {
        let secret = std::env::var("SESSION_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "SESSION_SECRET must be set".to_string())?;
        if secret.len() < 32 {
            tracing::warn!("SESSION_SECRET is shorter than 32 bytes");
        }

        Ok(Self {
            secret,
            ttl_hours: env_parse("SESSION_TTL_HOURS").unwrap_or(168),
            cookie_secure: env_parse("COOKIE_SECURE").unwrap_or(false),
            cookie_domain: std::env::var("COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()),
        })
    }
}

/// Everything the handlers need to know about the deployment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app: AppConfig,
    pub timezone: Tz,
    pub slot_starts: Vec<NaiveTime>,
    pub session: SessionConfig,
    pub stripe: StripeSettings,
}

impl Settings {
    /// Validate `app` and resolve the derived fields.
    pub fn new(app: AppConfig, session: SessionConfig, stripe: StripeSettings) -> Result<Self, String> {
        let timezone: Tz = app
            .club
            .timezone
            .parse()
            .map_err(|_| format!("Unknown club timezone '{}'", app.club.timezone))?;
        let slot_starts = app.club.parsed_slot_starts()?;
        if slot_starts.is_empty() {
            return Err("club.slot_starts must not be empty".to_string());
        }

        Ok(Self {
            app,
            timezone,
            slot_starts,
            session,
            stripe,
        })
    }

    /// Load `config.toml` (or `CONFIG_PATH`) plus secrets from the environment.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let app = load_app_config(&path);
        Self::new(app, SessionConfig::from_env()?, StripeSettings::from_env())
    }

    /// Wall-clock time in the club's timezone.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.timezone).naive_local()
    }

    pub fn local_today(&self) -> NaiveDate {
        self.local_now().date()
    }
}

/// Read and parse the config file. A missing or broken file falls back to
/// defaults, which leave every optional integration disabled.
pub fn load_app_config(path: &str) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => {
                tracing::info!(path, features = ?config.features, "Loaded config");
                config
            }
            Err(e) => {
                tracing::error!(path, error = %e, "Failed to parse config, using defaults");
                AppConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(path, error = %e, "Config file not found, using defaults");
            AppConfig::default()
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
