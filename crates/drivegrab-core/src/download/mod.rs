//! Batch downloads: one independent task per selected item.
//!
//! There is no concurrency cap, no queue and no retry. A failed item is logged
//! and reported; it never stops its siblings. Each task can be cancelled on its
//! own; there is no batch-wide cancel.

mod fetch;
pub mod filename;

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::HttpConfig;

/// What to fetch. `title` is only a filename hint for servers that send no
/// `Content-Disposition`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    pub url: String,
    pub title: Option<String>,
}

impl DownloadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct DownloadOptions {
    pub dir: PathBuf,
    pub http: HttpConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("curl: {0}")]
    Curl(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    /// Temp file creation, write or final rename failed.
    #[error("storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("download cancelled")]
    Aborted,
    #[error("download task failed: {0}")]
    Join(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
    /// Lowercase hex SHA-256 of the saved content.
    pub sha256: String,
}

#[derive(Debug)]
pub struct DownloadReport {
    pub id: usize,
    pub url: String,
    pub result: Result<DownloadedFile, DownloadError>,
}

/// A running download. Dropping it does not stop the transfer; use [`DownloadTask::cancel`].
pub struct DownloadTask {
    id: usize,
    url: String,
    abort: Arc<AtomicBool>,
    handle: JoinHandle<Result<DownloadedFile, DownloadError>>,
}

impl DownloadTask {
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Asks this transfer (and only this one) to stop; it ends with [`DownloadError::Aborted`].
    pub fn cancel(&self) {
        tracing::debug!(id = self.id, "cancel requested");
        self.abort.store(true, Ordering::Relaxed);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub async fn wait(self) -> DownloadReport {
        let result = match self.handle.await {
            Ok(r) => r,
            Err(e) => Err(DownloadError::Join(e.to_string())),
        };
        match &result {
            Ok(file) => tracing::info!(
                id = self.id,
                url = %self.url,
                path = %file.path.display(),
                bytes = file.bytes,
                "download finished"
            ),
            Err(e) => tracing::warn!(id = self.id, url = %self.url, "download error: {}", e),
        }
        DownloadReport {
            id: self.id,
            url: self.url,
            result,
        }
    }
}

pub struct DownloadBatch {
    tasks: Vec<DownloadTask>,
}

impl DownloadBatch {
    pub fn tasks(&self) -> &[DownloadTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Waits for every task. Reports come back in request order; completion order is unspecified.
    pub async fn join_all(self) -> Vec<DownloadReport> {
        let mut reports = Vec::with_capacity(self.tasks.len());
        for task in self.tasks {
            reports.push(task.wait().await);
        }
        let failed = reports.iter().filter(|r| r.result.is_err()).count();
        tracing::info!(
            total = reports.len(),
            failed,
            "download batch finished"
        );
        reports
    }
}

/// Starts one blocking download task per request. Must be called inside a tokio runtime.
pub fn spawn_batch(requests: Vec<DownloadRequest>, opts: &DownloadOptions) -> DownloadBatch {
    let tasks = requests
        .into_iter()
        .enumerate()
        .map(|(id, req)| {
            let abort = Arc::new(AtomicBool::new(false));
            let url = req.url.clone();
            let dir = opts.dir.clone();
            let http = opts.http.clone();
            let token = Arc::clone(&abort);
            tracing::debug!(id, url = %url, "starting download");
            let handle = tokio::task::spawn_blocking(move || {
                fetch::fetch_to_dir(&req, &dir, &http, &token)
            });
            DownloadTask {
                id,
                url,
                abort,
                handle,
            }
        })
        .collect();
    DownloadBatch { tasks }
}
