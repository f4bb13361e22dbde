//! Error types for the Telegram bot.

use thiserror::Error;

/// Errors that can occur in the bot.
#[derive(Debug, Error)]
pub enum BotError {
    /// Configuration error (fatal at startup).
    #[error("configuration error: {0}")]
    Config(#[from] jar_core::ConfigError),

    /// Jar file error (fatal at startup).
    #[error("milestone file error: {0}")]
    Parse(#[from] jar_core::ParseError),

    /// Selection failed (empty jar or unknown category); the delivery is
    /// skipped, nothing external is called.
    #[error("selection failed: {0}")]
    Select(#[from] jar_models::SelectError),

    /// The messaging API rejected the send.
    #[error("failed to send message: {0}")]
    Delivery(String),

    /// Other bot API failure (identity lookup, command registration).
    #[error("bot API error: {0}")]
    Api(#[from] teloxide::RequestError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for bot operations.
pub type Result<T> = std::result::Result<T, BotError>;
