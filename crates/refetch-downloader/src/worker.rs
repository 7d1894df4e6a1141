//! Download worker.

use std::path::PathBuf;

use futures::StreamExt;
use reqwest::Client;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::DownloadError;
use crate::queue::DownloadRequest;

/// Performs queued downloads into a base directory.
pub struct DownloadWorker {
    client: Client,
    base_dir: PathBuf,
}

impl DownloadWorker {
    /// Create a worker writing under `base_dir`.
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        let client = Client::builder()
            .user_agent("refetch/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_dir: base_dir.into(),
        }
    }

    /// Drain the queue until it closes or `token` is cancelled.
    ///
    /// Individual download failures are logged and do not stop the worker.
    pub async fn run(self, mut rx: mpsc::Receiver<DownloadRequest>, token: CancellationToken) {
        info!(base_dir = %self.base_dir.display(), "download worker started");

        loop {
            let request = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                request = rx.recv() => match request {
                    Some(r) => r,
                    None => break,
                },
            };

            match self.download(&request).await {
                Ok(path) => {
                    info!(url = %request.url, path = %path.display(), "download complete");
                }
                Err(e) => error!(url = %request.url, "download failed: {e}"),
            }
        }

        info!("download worker stopped");
    }

    /// Fetch one URL and stream its body to disk.
    ///
    /// Returns the path the payload was written to.
    pub async fn download(&self, request: &DownloadRequest) -> Result<PathBuf, DownloadError> {
        let parsed = url::Url::parse(&request.url).map_err(|e| DownloadError::InvalidUrl {
            url: request.url.clone(),
            reason: e.to_string(),
        })?;

        let target_dir = match &request.folder {
            Some(folder) => self.base_dir.join(sanitize_component(folder)),
            None => self.base_dir.clone(),
        };
        fs::create_dir_all(&target_dir).await?;
        let target = target_dir.join(filename_for(&parsed));

        let response = self.client.get(parsed).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::UnexpectedStatus {
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }

        let mut file = fs::File::create(&target).await?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        debug!(path = %target.display(), "payload written");
        Ok(target)
    }
}

/// Derive a file name from the URL's final path segment.
fn filename_for(url: &url::Url) -> String {
    let candidate = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    let sanitized = sanitize_component(candidate);
    if sanitized.is_empty() {
        "download.bin".to_string()
    } else {
        sanitized
    }
}

/// Restrict a path component to alphanumerics plus `-`, `_` and `.`;
/// leading and trailing dots are stripped so `.` / `..` cannot escape.
fn sanitize_component(component: &str) -> String {
    component
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
