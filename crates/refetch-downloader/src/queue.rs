//! Bounded download queue.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::debug;

use refetch_scheduler::{ActionSink, SinkError};

/// A download waiting to be performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    /// Source URL.
    pub url: String,
    /// Destination folder relative to the worker's base directory.
    pub folder: Option<String>,
}

/// Sender half of the download pipeline.
///
/// Implements [`ActionSink`] so the scheduler can enqueue work without
/// knowing how downloads are performed.
#[derive(Clone)]
pub struct DownloadQueue {
    tx: mpsc::Sender<DownloadRequest>,
}

impl DownloadQueue {
    /// Create a queue bounded at `capacity`, returning the receiver half
    /// for a [`DownloadWorker`](crate::worker::DownloadWorker).
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<DownloadRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

#[async_trait]
impl ActionSink for DownloadQueue {
    async fn enqueue(&self, url: &str, folder: Option<&str>) -> Result<(), SinkError> {
        let request = DownloadRequest {
            url: url.to_string(),
            folder: folder.map(str::to_string),
        };
        debug!(url = %request.url, folder = ?request.folder, "queueing download");
        self.tx
            .send(request)
            .await
            .map_err(|_| SinkError::new("download queue is closed"))
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
