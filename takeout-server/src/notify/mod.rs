//! Operator-console notification sink
//!
//! Keeps the registry of connected merchant consoles and broadcasts order
//! events to all of them. Dispatch is fire-and-forget: a session that fails
//! to take a message is logged and skipped, never retried, and never fails
//! the business transition that triggered the broadcast.
//!
//! Connect/disconnect race freely with broadcasts; the registry is a
//! concurrent map owned by the sink, not by the lifecycle.

use async_trait::async_trait;
use dashmap::DashMap;
use shared::message::ConsoleEvent;
use std::sync::Arc;
use thiserror::Error;

/// Session send failure (connection gone, backpressure, ...)
#[derive(Debug, Error)]
#[error("console session send failed: {0}")]
pub struct SessionError(pub String);

/// One connected operator console.
#[async_trait]
pub trait ConsoleSession: Send + Sync {
    async fn send_text(&self, payload: &str) -> Result<(), SessionError>;
}

/// Broadcast sink over all connected consoles.
#[derive(Clone, Default)]
pub struct NotificationSink {
    sessions: Arc<DashMap<String, Arc<dyn ConsoleSession>>>,
}

impl NotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a console connection under its session id.
    pub fn connect(&self, session_id: impl Into<String>, session: Arc<dyn ConsoleSession>) {
        let session_id = session_id.into();
        tracing::debug!(session_id = %session_id, "Console connected");
        self.sessions.insert(session_id, session);
    }

    /// Drop a console connection.
    pub fn disconnect(&self, session_id: &str) {
        if self.sessions.remove(session_id).is_some() {
            tracing::debug!(session_id = %session_id, "Console disconnected");
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Serialize `event` once and hand it to every connected console.
    /// Returns the number of sessions that took the message.
    pub async fn broadcast(&self, event: &ConsoleEvent) -> usize {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize console event");
                return 0;
            }
        };

        // Snapshot the registry first so no shard lock is held across await
        let targets: Vec<(String, Arc<dyn ConsoleSession>)> = self
            .sessions
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();

        let mut delivered = 0;
        for (session_id, session) in targets {
            match session.send_text(&payload).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        session_id = %session_id,
                        error = %e,
                        "Dropping console notification"
                    );
                }
            }
        }
        tracing::debug!(kind = %event.kind, order_id = %event.order_id, delivered, "Console event dispatched");
        delivered
    }
}
