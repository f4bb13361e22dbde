//! Time slots and their delivery tones.
//!
//! The day is split into four canonical delivery windows. Each slot carries
//! a tone directive for the generative prompt and a greeting prefix for
//! template rendering. The mappings are static lookup data.

use serde::{Deserialize, Serialize};

/// One of the four canonical delivery windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    /// 06:00–10:59 — start of the day.
    Morning,
    /// 11:00–13:59 — midday.
    Noon,
    /// 14:00–17:59 — the afternoon dip.
    Afternoon,
    /// 18:00 onwards, and the small hours.
    Evening,
}

impl TimeSlot {
    /// All slots in day order.
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Noon,
        TimeSlot::Afternoon,
        TimeSlot::Evening,
    ];

    /// Maps an hour of day (0-23) to its slot.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=10 => TimeSlot::Morning,
            11..=13 => TimeSlot::Noon,
            14..=17 => TimeSlot::Afternoon,
            _ => TimeSlot::Evening,
        }
    }

    /// Tone directive for this slot.
    pub fn tone(self) -> &'static str {
        match self {
            TimeSlot::Morning => "energize",
            TimeSlot::Noon => "refocus",
            TimeSlot::Afternoon => "reassure",
            TimeSlot::Evening => "wind down",
        }
    }

    /// Display label for this slot.
    pub fn label(self) -> &'static str {
        match self {
            TimeSlot::Morning => "morning",
            TimeSlot::Noon => "noon",
            TimeSlot::Afternoon => "afternoon",
            TimeSlot::Evening => "evening",
        }
    }

    /// Greeting line used by template rendering.
    pub fn greeting(self) -> &'static str {
        match self {
            TimeSlot::Morning => "Good morning! ☀️",
            TimeSlot::Noon => "Midday boost! 💫",
            TimeSlot::Afternoon => "Good afternoon! 🌟",
            TimeSlot::Evening => "Good evening! 🌙",
        }
    }

    /// A representative hour for this slot, used by delivery previews.
    pub fn canonical_hour(self) -> u32 {
        match self {
            TimeSlot::Morning => 8,
            TimeSlot::Noon => 12,
            TimeSlot::Afternoon => 16,
            TimeSlot::Evening => 20,
        }
    }
}
