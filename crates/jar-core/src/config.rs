//! Environment configuration.
//!
//! All settings come from environment variables, read once at startup into
//! an owned [`Settings`] value that is passed explicitly to the pipeline.
//! Missing or malformed required settings are fatal.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: bot token from @BotFather
//! - `TELEGRAM_USER_ID`: recipient's numeric Telegram user id
//!
//! Required in generative mode only:
//! - `ANTHROPIC_API_KEY`: key for the text-generation API
//!
//! Optional:
//! - `JAR_MODEL`: generation model (default: `claude-3-5-haiku-20241022`)
//! - `USE_PREGENERATED`: use pre-generated messages, no API (default: true)
//! - `PREGENERATED_FILE`: path to the pregenerated JSON (default:
//!   `milestones_pregenerated.json`)
//! - `MILESTONE_FILE`: path to the milestone markdown (default:
//!   `milestones.md`)
//! - `SCHEDULE_TIMES`: comma-separated `HH:MM` daily delivery times
//!   (default: `08:00,12:00,16:00,20:00`)
//! - `UTC_OFFSET`: local timezone as a fixed offset (default: `+08:00`)
//! - `JAR_DEBUG`: enable debug logging (default: false)
//! - `PORT`: HTTP trigger port (default: 8080)

use std::env;
use std::fmt;
use std::path::PathBuf;

use chrono::FixedOffset;
use thiserror::Error;

/// Default generation model.
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-20241022";

/// Default milestone markdown path.
pub const DEFAULT_MILESTONE_FILE: &str = "milestones.md";

/// Default pregenerated JSON path.
pub const DEFAULT_PREGENERATED_FILE: &str = "milestones_pregenerated.json";

/// Default daily delivery times.
pub const DEFAULT_SCHEDULE_TIMES: &str = "08:00,12:00,16:00,20:00";

/// Default local UTC offset.
pub const DEFAULT_UTC_OFFSET: &str = "+08:00";

/// Default HTTP trigger port.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("{0} not set. Set it in the environment or a .env file.")]
    MissingVar(&'static str),

    /// A variable is set but its value cannot be used.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// The offending value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// A daily delivery time in local wall-clock terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleTime {
    /// Hour of day (0-23).
    pub hour: u32,
    /// Minute (0-59).
    pub minute: u32,
}

impl fmt::Display for ScheduleTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Application settings, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Telegram bot token.
    pub telegram_bot_token: String,

    /// Recipient's Telegram user id.
    pub telegram_user_id: i64,

    /// Text-generation API key; present when generative mode is usable.
    pub anthropic_api_key: Option<String>,

    /// Generation model identifier.
    pub model: String,

    /// Use pre-generated messages instead of calling the API.
    pub use_pregenerated: bool,

    /// Path to the pregenerated JSON file.
    pub pregenerated_file: PathBuf,

    /// Path to the milestone markdown file.
    pub milestone_file: PathBuf,

    /// Daily delivery times, local wall clock.
    pub schedule_times: Vec<ScheduleTime>,

    /// Local timezone as a fixed UTC offset.
    pub utc_offset: FixedOffset,

    /// Enable debug logging.
    pub debug: bool,

    /// HTTP trigger port.
    pub port: u16,
}

impl Settings {
    /// Loads settings from the environment, validating as it goes.
    ///
    /// The text-generation API key is only required when pre-generated
    /// mode is off.
    pub fn from_env() -> Result<Self, ConfigError> {
        let telegram_bot_token =
            required_var("TELEGRAM_BOT_TOKEN")?;

        let user_id_raw = required_var("TELEGRAM_USER_ID")?;
        let telegram_user_id = user_id_raw.trim().parse::<i64>().map_err(|e| {
            ConfigError::Invalid {
                var: "TELEGRAM_USER_ID",
                value: user_id_raw.clone(),
                reason: e.to_string(),
            }
        })?;

        let use_pregenerated = env_bool("USE_PREGENERATED", true)?;

        let anthropic_api_key = env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|v| !v.trim().is_empty());
        if !use_pregenerated && anthropic_api_key.is_none() {
            return Err(ConfigError::MissingVar("ANTHROPIC_API_KEY"));
        }

        let model = env_or("JAR_MODEL", DEFAULT_MODEL);
        let milestone_file = PathBuf::from(env_or("MILESTONE_FILE", DEFAULT_MILESTONE_FILE));
        let pregenerated_file =
            PathBuf::from(env_or("PREGENERATED_FILE", DEFAULT_PREGENERATED_FILE));

        let schedule_raw = env_or("SCHEDULE_TIMES", DEFAULT_SCHEDULE_TIMES);
        let schedule_times = parse_schedule_times(&schedule_raw)?;

        let offset_raw = env_or("UTC_OFFSET", DEFAULT_UTC_OFFSET);
        let utc_offset = parse_utc_offset(&offset_raw)?;

        let debug = env_bool("JAR_DEBUG", false)?;

        let port_raw = env_or("PORT", "");
        let port = if port_raw.trim().is_empty() {
            DEFAULT_PORT
        } else {
            port_raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "PORT",
                value: port_raw.clone(),
                reason: e.to_string(),
            })?
        };

        Ok(Self {
            telegram_bot_token,
            telegram_user_id,
            anthropic_api_key,
            model,
            use_pregenerated,
            pregenerated_file,
            milestone_file,
            schedule_times,
            utc_offset,
            debug,
            port,
        })
    }
}

/// Parses a comma-separated `HH:MM` list.
pub fn parse_schedule_times(raw: &str) -> Result<Vec<ScheduleTime>, ConfigError> {
    let invalid = |value: &str, reason: &str| ConfigError::Invalid {
        var: "SCHEDULE_TIMES",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let mut times = Vec::new();
    for part in raw.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let Some((h, m)) = part.split_once(':') else {
            return Err(invalid(part, "expected HH:MM"));
        };
        let hour: u32 = h
            .trim()
            .parse()
            .map_err(|_| invalid(part, "hour is not a number"))?;
        let minute: u32 = m
            .trim()
            .parse()
            .map_err(|_| invalid(part, "minute is not a number"))?;
        if hour > 23 || minute > 59 {
            return Err(invalid(part, "hour must be 0-23 and minute 0-59"));
        }
        times.push(ScheduleTime { hour, minute });
    }

    if times.is_empty() {
        return Err(invalid(raw, "no delivery times given"));
    }
    Ok(times)
}

/// Parses a `+HH:MM` / `-HH:MM` UTC offset.
pub fn parse_utc_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        var: "UTC_OFFSET",
        value: raw.to_string(),
        reason: reason.to_string(),
    };

    let s = raw.trim();
    let (sign, rest) = match s.chars().next() {
        Some('+') => (1i32, &s[1..]),
        Some('-') => (-1i32, &s[1..]),
        _ => return Err(invalid("expected leading + or -")),
    };
    let Some((h, m)) = rest.split_once(':') else {
        return Err(invalid("expected +HH:MM"));
    };
    let hours: i32 = h.parse().map_err(|_| invalid("hours are not a number"))?;
    let minutes: i32 = m.parse().map_err(|_| invalid("minutes are not a number"))?;
    if hours > 14 || minutes > 59 {
        return Err(invalid("offset out of range"));
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .ok_or_else(|| invalid("offset out of range"))
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Ok(raw) = env::var(name) else {
        return Ok(default);
    };
    if raw.trim().is_empty() {
        return Ok(default);
    }
    let normalized = raw.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var: name,
            value: raw.clone(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
