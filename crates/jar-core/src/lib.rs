//! Core business logic for Jar of Awesome.
//!
//! This crate holds everything between the raw jar files and the bot
//! front ends: environment configuration, the markdown milestone parser,
//! the pregenerated-message loader, prompt templates, and the rendering
//! strategies (template, pregenerated lookup, and generative with
//! fallback).

pub mod config;
pub mod parser;
pub mod pregenerated;
pub mod prompts;
pub mod render;

pub use config::{ConfigError, ScheduleTime, Settings};
pub use parser::{load_milestones, ParseError};
pub use pregenerated::load_pregenerated;
pub use render::{GenerativeRenderer, PregeneratedRenderer, Renderer, TemplateRenderer};
