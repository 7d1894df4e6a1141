//! The action sink seam.

use async_trait::async_trait;
use thiserror::Error;

/// Error returned by a failed [`ActionSink`] dispatch.
///
/// The scheduler never inspects the cause; a failed fire is logged and
/// consumed, not retried.
#[derive(Debug, Error)]
#[error("dispatch failed: {0}")]
pub struct SinkError(String);

impl SinkError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Downstream capability a firing schedule dispatches to.
///
/// Injected into the service at construction; implementations decide what
/// "enqueue" means (the shipped one queues a download).
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// Enqueue the action for `url`, optionally targeting `folder`.
    async fn enqueue(&self, url: &str, folder: Option<&str>) -> Result<(), SinkError>;
}
