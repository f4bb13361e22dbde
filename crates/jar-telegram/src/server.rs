//! HTTP trigger endpoint for external schedulers.
//!
//! An alternative front end to polling: a managed cron service calls
//! `/cron/send-milestone` at the delivery times and the handler runs the
//! same pipeline the timer and the bot commands use. Authentication is a
//! deployment-layer concern; the endpoint itself is unauthenticated.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::error::BotError;
use crate::state::BotState;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shared bot state.
    pub bot_state: Arc<BotState>,
}

/// Error responses for the trigger endpoint.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Nothing to deliver; the jar is empty.
    #[error("nothing to deliver: {0}")]
    EmptyJar(String),

    /// The messaging API rejected the send.
    #[error("delivery failed: {0}")]
    Delivery(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyJar(_) => StatusCode::CONFLICT,
            ApiError::Delivery(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "success": false,
            "error": self.to_string()
        }));
        (status, body).into_response()
    }
}

impl From<BotError> for ApiError {
    fn from(err: BotError) -> Self {
        match err {
            BotError::Select(e) => ApiError::EmptyJar(e.to_string()),
            BotError::Delivery(e) => ApiError::Delivery(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

/// Creates the router with all routes configured.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health))
        .route("/cron/send-milestone", post(trigger_delivery).get(trigger_delivery))
        .layer(cors)
        .with_state(state)
}

/// Starts the server.
pub async fn serve(port: u16, state: AppState) -> Result<(), std::io::Error> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("trigger endpoint listening on {}", addr);
    axum::serve(listener, create_router(state)).await
}

/// Liveness check.
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "jar-of-awesome",
        "renderer": state.bot_state.pipeline.renderer_name(),
        "milestones": state.bot_state.pipeline.milestones().len(),
    }))
}

/// Runs one delivery, invoked by the external scheduler.
async fn trigger_delivery(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    info!("received trigger from external scheduler");

    match state.bot_state.pipeline.deliver().await {
        Ok(report) => Ok(Json(json!({
            "success": true,
            "category": report.category,
            "slot": report.slot.label(),
            "message": "Milestone sent successfully"
        }))),
        Err(e) => {
            warn!(error = %e, "triggered delivery failed");
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use chrono::FixedOffset;

    use jar_core::render::TemplateRenderer;
    use jar_models::{Milestone, MilestoneSet};

    use crate::dispatch::test_support::{FailingMessenger, RecordingMessenger};
    use crate::dispatch::Messenger;
    use crate::pipeline::DeliveryPipeline;

    fn make_state(set: MilestoneSet, messenger: Arc<dyn Messenger>) -> AppState {
        let pipeline = DeliveryPipeline::new(
            Arc::new(set),
            Arc::new(TemplateRenderer),
            messenger,
            42,
            FixedOffset::east_opt(8 * 3600).unwrap(),
        );
        AppState {
            bot_state: Arc::new(BotState {
                pipeline,
                schedule: Vec::new(),
                recipient: 42,
                generative: false,
            }),
        }
    }

    fn single_entry_set() -> MilestoneSet {
        vec![Milestone::new("Did X", "Test", 1)].into_iter().collect()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let state = make_state(single_entry_set(), Arc::new(RecordingMessenger::default()));
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "jar-of-awesome");
        assert_eq!(body["milestones"], 1);
    }

    #[tokio::test]
    async fn test_trigger_delivers_and_reports() {
        let messenger = Arc::new(RecordingMessenger::default());
        let state = make_state(single_entry_set(), messenger.clone());
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.post("/cron/send-milestone").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], true);
        assert_eq!(body["category"], "Test");

        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 42);
        assert!(sent[0].1.contains("Did X"));
    }

    #[tokio::test]
    async fn test_trigger_works_over_get() {
        let messenger = Arc::new(RecordingMessenger::default());
        let state = make_state(single_entry_set(), messenger.clone());
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/cron/send-milestone").await;
        response.assert_status_ok();
        assert_eq!(messenger.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_trigger_empty_jar() {
        let messenger = Arc::new(RecordingMessenger::default());
        let state = make_state(MilestoneSet::new(), messenger.clone());
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.post("/cron/send-milestone").await;
        response.assert_status(StatusCode::CONFLICT);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        // Nothing external was called.
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_trigger_messaging_rejection() {
        let state = make_state(single_entry_set(), Arc::new(FailingMessenger));
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.post("/cron/send-milestone").await;
        response.assert_status(StatusCode::BAD_GATEWAY);

        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("delivery failed"));
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let state = make_state(single_entry_set(), Arc::new(RecordingMessenger::default()));
        let server = TestServer::new(create_router(state)).unwrap();

        let response = server.get("/").await;
        assert!(response.headers().contains_key("access-control-allow-origin"));
    }
}
