//! # refetch-downloader
//!
//! The download pipeline behind the scheduler's action sink: a bounded
//! queue implementing [`ActionSink`](refetch_scheduler::ActionSink) plus a
//! worker that fetches each queued URL into a base directory.

pub mod error;
pub mod queue;
pub mod worker;

pub use error::DownloadError;
pub use queue::{DownloadQueue, DownloadRequest};
pub use worker::DownloadWorker;
