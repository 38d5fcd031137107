use std::env;
use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::Locale;

use crate::error::AppError;
use crate::state::DEFAULT_EVENT_BUFFER_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.to_ascii_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("expected compact or json, got {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub event_buffer_size: NonZeroUsize,
    pub ingest_delay: Duration,
    pub notice_ttl: Duration,
    pub seed_demo_data: bool,
    pub ingest_seed: Option<u64>,
    pub display_locale: Locale,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_format: parse_or_default("LOG_FORMAT", LogFormat::Compact)?,
            event_buffer_size: parse_or_default("EVENT_BUFFER_SIZE", DEFAULT_EVENT_BUFFER_SIZE)?,
            ingest_delay: Duration::from_millis(parse_or_default("INGEST_DELAY_MS", 1000)?),
            notice_ttl: Duration::from_millis(parse_or_default("NOTICE_TTL_MS", 3000)?),
            seed_demo_data: parse_or_default("SEED_DEMO_DATA", true)?,
            ingest_seed: parse_optional("INGEST_SEED")?,
            display_locale: parse_locale(
                &env::var("DISPLAY_LOCALE").unwrap_or_else(|_| "en_US".to_string()),
            )?,
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "static".to_string()),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_optional(key)?.unwrap_or(default))
}

fn parse_optional<T>(key: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_value(key, &raw).map(Some),
        Err(_) => Ok(None),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| AppError::Internal(format!("invalid {key}: {err}")))
}

pub fn parse_locale(raw: &str) -> Result<Locale, AppError> {
    Locale::try_from(raw.trim())
        .map_err(|_| AppError::Internal(format!("invalid DISPLAY_LOCALE: unknown locale {raw}")))
}
