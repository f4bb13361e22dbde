//! Delivery rendering strategies.
//!
//! A [`Renderer`] turns a [`DeliveryContext`] into the final message text.
//! Rendering never fails: the generative strategy degrades to the
//! deterministic template on any API failure, so delivery is never
//! blocked by the external call.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use jar_models::{DeliveryContext, PregeneratedSet, TimeSlot};

use crate::prompts::{build_prompt, SYSTEM_PROMPT};

/// Default text-generation endpoint.
pub const API_URL: &str = "https://api.anthropic.com/v1/messages";

/// API version header value.
const API_VERSION: &str = "2023-06-01";

/// Response length cap for generated messages.
const MAX_TOKENS: u32 = 300;

/// Bounded timeout for the single generation attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Emoji a message may already open with, in which case the greeting
/// prefix is skipped to avoid doubling up.
const GREETING_EMOJI: [&str; 7] = ["☀️", "💫", "🌟", "🌙", "💪", "🚀", "💝"];

/// Errors from a single generation attempt. Internal to the generative
/// strategy; callers of [`Renderer::render`] never see them.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The API request failed (transport, timeout, or non-success status).
    #[error("generation request failed: {0}")]
    RequestFailed(String),

    /// The API responded but the body was not in the expected shape.
    #[error("failed to parse generation response: {0}")]
    ParseError(String),
}

/// Turns a delivery context into final message text.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Renders the message. Never fails; strategies degrade internally.
    async fn render(&self, ctx: &DeliveryContext) -> String;

    /// Strategy name, for logs.
    fn name(&self) -> &'static str;
}

/// Prefixes the slot greeting, unless the text already opens with one of
/// the known greeting emoji.
pub fn with_greeting(slot: TimeSlot, text: &str) -> String {
    let trimmed = text.trim();
    if GREETING_EMOJI.iter().any(|e| trimmed.starts_with(e)) {
        trimmed.to_string()
    } else {
        format!("{}\n{}", slot.greeting(), trimmed)
    }
}

/// Deterministic template rendering: slot greeting plus the milestone
/// text, no network involved.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateRenderer;

impl TemplateRenderer {
    /// The template output for a context. Same inputs, same output.
    pub fn compose(ctx: &DeliveryContext) -> String {
        with_greeting(ctx.slot, &ctx.milestone.text)
    }
}

#[async_trait]
impl Renderer for TemplateRenderer {
    async fn render(&self, ctx: &DeliveryContext) -> String {
        Self::compose(ctx)
    }

    fn name(&self) -> &'static str {
        "template"
    }
}

/// Serves pre-generated messages, looked up by the milestone's original
/// text. Entries missing from the mapping fall back to the template.
pub struct PregeneratedRenderer {
    messages: HashMap<String, String>,
}

impl PregeneratedRenderer {
    /// Builds the lookup from a loaded pregenerated set.
    pub fn new(set: &PregeneratedSet) -> Self {
        let messages = set
            .iter()
            .map(|m| (m.original.clone(), m.message.clone()))
            .collect();
        Self { messages }
    }

    /// Number of entries in the lookup.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the lookup is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[async_trait]
impl Renderer for PregeneratedRenderer {
    async fn render(&self, ctx: &DeliveryContext) -> String {
        match self.messages.get(&ctx.milestone.text) {
            Some(message) => with_greeting(ctx.slot, message),
            None => {
                debug!(
                    category = %ctx.milestone.category,
                    "no pregenerated message for milestone, using template"
                );
                TemplateRenderer::compose(ctx)
            }
        }
    }

    fn name(&self) -> &'static str {
        "pregenerated"
    }
}

/// Calls the hosted text-generation API with the slot's prompt; any
/// failure logs a warning and returns the template output instead.
///
/// One attempt per delivery, with a bounded timeout. No retries or
/// backoff: the fallback is always available, and at four deliveries a
/// day there is nothing to smooth over.
pub struct GenerativeRenderer {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_url: String,
}

impl GenerativeRenderer {
    /// Creates a renderer for the given credentials and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            api_url: API_URL.to_string(),
        }
    }

    /// Overrides the endpoint URL (used by tests to force failures).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    async fn generate(&self, ctx: &DeliveryContext) -> Result<String, RenderError> {
        let prompt = build_prompt(ctx);

        let request_body = serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": 1.0,
            "system": SYSTEM_PROMPT,
            "messages": [
                {"role": "user", "content": prompt}
            ]
        });

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .timeout(REQUEST_TIMEOUT)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| RenderError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::RequestFailed(format!(
                "API returned {status}"
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RenderError::ParseError(e.to_string()))?;

        json["content"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| RenderError::ParseError("no text in response".to_string()))
    }
}

#[async_trait]
impl Renderer for GenerativeRenderer {
    async fn render(&self, ctx: &DeliveryContext) -> String {
        match self.generate(ctx).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, model = %self.model, "generation failed, using template");
                TemplateRenderer::compose(ctx)
            }
        }
    }

    fn name(&self) -> &'static str {
        "generative"
    }
}
