//! Core data models for Jar of Awesome.
//!
//! This crate provides the fundamental data types used throughout the
//! system: milestones parsed from the markdown jar file, their
//! pre-generated counterparts, time slots, and the per-delivery context.

pub mod context;
pub mod milestone;
pub mod pregenerated;
pub mod slot;

// Re-export main types
pub use context::DeliveryContext;
pub use milestone::{Milestone, MilestoneSet, SelectError};
pub use pregenerated::{PregeneratedMilestone, PregeneratedSet};
pub use slot::TimeSlot;
