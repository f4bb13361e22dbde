//! Shared state across handlers and trigger sources.

use std::sync::Arc;

use jar_core::config::{ScheduleTime, Settings};

use crate::pipeline::DeliveryPipeline;

/// State shared by the command handlers, the scheduler, and the HTTP
/// trigger. Read-only after startup.
pub struct BotState {
    /// The shared delivery pipeline.
    pub pipeline: DeliveryPipeline,
    /// Daily delivery times, local wall clock.
    pub schedule: Vec<ScheduleTime>,
    /// The one chat the bot serves.
    pub recipient: i64,
    /// Whether the generative renderer is active (changes `/test` output).
    pub generative: bool,
}

impl BotState {
    /// Builds state from the pipeline and settings.
    pub fn new(pipeline: DeliveryPipeline, settings: &Settings) -> Self {
        Self {
            pipeline,
            schedule: settings.schedule_times.clone(),
            recipient: settings.telegram_user_id,
            generative: !settings.use_pregenerated,
        }
    }

    /// The schedule as a comma-separated `HH:MM` list, for display.
    pub fn schedule_display(&self) -> String {
        self.schedule
            .iter()
            .map(ScheduleTime::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Creates the shared state handle.
pub fn create_shared_state(pipeline: DeliveryPipeline, settings: &Settings) -> Arc<BotState> {
    Arc::new(BotState::new(pipeline, settings))
}
