//! The shared delivery pipeline.
//!
//! Every trigger source — the daily timer, the HTTP endpoint, and the
//! `/milestone` command — runs the same pick → compose → render → send
//! sequence through one [`DeliveryPipeline`] value. The milestone set is
//! read-only after load and the renderer is a pure function of its
//! context, so concurrent triggers at worst duplicate a message.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;
use tracing::info;

use jar_core::render::Renderer;
use jar_models::{DeliveryContext, Milestone, MilestoneSet, TimeSlot};

use crate::dispatch::Messenger;
use crate::error::Result;

/// What a completed delivery looked like.
#[derive(Debug, Clone, Serialize)]
pub struct DeliveryReport {
    /// Category of the delivered milestone.
    pub category: String,
    /// Delivery window the message landed in.
    pub slot: TimeSlot,
}

/// The pick → compose → render → send pipeline.
pub struct DeliveryPipeline {
    milestones: Arc<MilestoneSet>,
    renderer: Arc<dyn Renderer>,
    messenger: Arc<dyn Messenger>,
    recipient: i64,
    utc_offset: FixedOffset,
}

impl DeliveryPipeline {
    /// Assembles a pipeline from its parts.
    pub fn new(
        milestones: Arc<MilestoneSet>,
        renderer: Arc<dyn Renderer>,
        messenger: Arc<dyn Messenger>,
        recipient: i64,
        utc_offset: FixedOffset,
    ) -> Self {
        Self {
            milestones,
            renderer,
            messenger,
            recipient,
            utc_offset,
        }
    }

    /// The loaded milestone set.
    pub fn milestones(&self) -> &MilestoneSet {
        &self.milestones
    }

    /// Name of the active rendering strategy.
    pub fn renderer_name(&self) -> &'static str {
        self.renderer.name()
    }

    /// Current wall-clock time in the configured offset.
    pub fn local_now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.utc_offset)
    }

    /// Runs one delivery to the configured recipient.
    pub async fn deliver(&self) -> Result<DeliveryReport> {
        self.deliver_to(self.recipient).await
    }

    /// Runs one delivery to an explicit chat (used by bot commands, which
    /// reply into the chat that asked).
    pub async fn deliver_to(&self, chat_id: i64) -> Result<DeliveryReport> {
        let milestone = self.milestones.pick()?.clone();
        let now = self.local_now();
        let ctx = DeliveryContext::at(now.hour(), now.minute(), milestone);
        let slot = ctx.slot;
        let category = ctx.milestone.category.clone();

        let text = self.renderer.render(&ctx).await;
        self.messenger.send_text(chat_id, &text).await?;

        info!(
            category = %category,
            slot = ?slot,
            renderer = self.renderer.name(),
            "milestone delivered"
        );
        Ok(DeliveryReport { category, slot })
    }

    /// Renders a given milestone as it would read at an explicit time,
    /// without sending anything.
    pub async fn render_at(&self, milestone: &Milestone, hour: u32, minute: u32) -> String {
        let ctx = DeliveryContext::at(hour, minute, milestone.clone());
        self.renderer.render(&ctx).await
    }

    /// Picks and renders one milestone at the current time, without
    /// sending anything.
    pub async fn render_sample(&self) -> Result<(Milestone, String)> {
        let milestone = self.milestones.pick()?.clone();
        let now = self.local_now();
        let text = self
            .render_at(&milestone, now.hour(), now.minute())
            .await;
        Ok((milestone, text))
    }

    /// Best-effort notice to the configured recipient (used by the
    /// scheduler when a delivery fails).
    pub async fn notify(&self, text: &str) -> Result<()> {
        self.messenger.send_text(self.recipient, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::test_support::{FailingMessenger, RecordingMessenger};
    use crate::error::BotError;
    use jar_core::render::TemplateRenderer;
    use jar_models::SelectError;

    fn single_entry_set() -> Arc<MilestoneSet> {
        Arc::new(
            vec![Milestone::new("Did X", "Test", 1)]
                .into_iter()
                .collect(),
        )
    }

    fn pipeline_with(
        milestones: Arc<MilestoneSet>,
        messenger: Arc<dyn Messenger>,
    ) -> DeliveryPipeline {
        DeliveryPipeline::new(
            milestones,
            Arc::new(TemplateRenderer),
            messenger,
            42,
            FixedOffset::east_opt(8 * 3600).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_deliver_sends_rendered_milestone() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pipeline = pipeline_with(single_entry_set(), messenger.clone());

        let report = pipeline.deliver().await.unwrap();
        assert_eq!(report.category, "Test");

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.contains("Did X"));
    }

    #[tokio::test]
    async fn test_deliver_twice_sends_twice() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pipeline = pipeline_with(single_entry_set(), messenger.clone());

        pipeline.deliver().await.unwrap();
        pipeline.deliver().await.unwrap();

        assert_eq!(messenger.sent.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_jar_skips_delivery() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pipeline = pipeline_with(Arc::new(MilestoneSet::new()), messenger.clone());

        let err = pipeline.deliver().await.unwrap_err();
        assert!(matches!(err, BotError::Select(SelectError::Empty)));
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_messenger_rejection_surfaces() {
        let pipeline = pipeline_with(single_entry_set(), Arc::new(FailingMessenger));

        let err = pipeline.deliver().await.unwrap_err();
        assert!(matches!(err, BotError::Delivery(_)));
    }

    #[tokio::test]
    async fn test_render_at_is_slot_specific() {
        let messenger = Arc::new(RecordingMessenger::default());
        let pipeline = pipeline_with(single_entry_set(), messenger);
        let milestone = Milestone::new("Did X", "Test", 1);

        let morning = pipeline.render_at(&milestone, 8, 0).await;
        let evening = pipeline.render_at(&milestone, 20, 0).await;
        assert_ne!(morning, evening);
        assert!(morning.contains("Did X"));
    }
}
