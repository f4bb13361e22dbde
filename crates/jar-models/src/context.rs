//! Per-delivery context.

use serde::{Deserialize, Serialize};

use crate::milestone::Milestone;
use crate::slot::TimeSlot;

/// Everything a renderer needs for one delivery.
///
/// Built per trigger and discarded after the message is rendered; nothing
/// here is shared across delivery events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryContext {
    /// The delivery window this message lands in.
    pub slot: TimeSlot,

    /// The selected milestone.
    pub milestone: Milestone,

    /// Local hour of day (0-23).
    pub hour: u32,

    /// Local minute (0-59).
    pub minute: u32,

    /// Optional free-form note to weave into the prompt.
    pub note: Option<String>,
}

impl DeliveryContext {
    /// Creates a context for the given local wall-clock time, deriving the
    /// slot from the hour.
    pub fn at(hour: u32, minute: u32, milestone: Milestone) -> Self {
        Self {
            slot: TimeSlot::from_hour(hour),
            milestone,
            hour,
            minute,
            note: None,
        }
    }

    /// Attaches a free-form note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// The wall-clock time as `HH:MM`.
    pub fn display_time(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_derives_slot() {
        let m = Milestone::new("Did X", "Test", 1);
        let ctx = DeliveryContext::at(8, 30, m);
        assert_eq!(ctx.slot, TimeSlot::Morning);
        assert_eq!(ctx.display_time(), "08:30");
        assert!(ctx.note.is_none());
    }

    #[test]
    fn test_with_note() {
        let m = Milestone::new("Did X", "Test", 1);
        let ctx = DeliveryContext::at(20, 0, m).with_note("big day tomorrow");
        assert_eq!(ctx.slot, TimeSlot::Evening);
        assert_eq!(ctx.note.as_deref(), Some("big day tomorrow"));
    }
}
