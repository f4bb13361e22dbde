//! Telegram bot interface for Jar of Awesome.
//!
//! This crate wires the milestone pipeline to its two front ends: a long
//! polling Telegram bot with an in-process daily timer, and an HTTP
//! trigger endpoint for an external cron service. Both run the exact same
//! [`pipeline::DeliveryPipeline`].
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_BOT_TOKEN`: bot token from @BotFather
//! - `TELEGRAM_USER_ID`: the recipient's numeric user id
//!
//! Optional (see `jar-core::config` for the full list):
//! - `USE_PREGENERATED`: pre-generated messages, no API (default: true)
//! - `ANTHROPIC_API_KEY`: required when `USE_PREGENERATED=false`
//! - `SCHEDULE_TIMES`: daily delivery times (default: `08:00,12:00,16:00,20:00`)
//! - `UTC_OFFSET`: local timezone offset (default: `+08:00`)
//!
//! # Commands
//!
//! - `/start` - welcome message and keyboard
//! - `/milestone` - get a milestone right now
//! - `/test` - preview how deliveries read across the day
//! - `/stats` - jar statistics
//! - `/help` - show available commands

pub mod bot;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod pipeline;
pub mod scheduler;
pub mod server;
pub mod state;

pub use bot::MilestoneBot;
pub use dispatch::{Messenger, TelegramMessenger};
pub use error::{BotError, Result};
pub use pipeline::{DeliveryPipeline, DeliveryReport};
pub use state::{create_shared_state, BotState};
