use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::sync::Mutex;

use crate::submission::Submission;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed submissions file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Submissions kept as one pretty-printed JSON array in a local file.
///
/// Every append reads, extends and rewrites the whole file. The mutex
/// serialises appends within this process; separate processes writing the
/// same file can still lose updates.
pub struct SubmissionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl SubmissionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// All stored submissions; a missing file is an empty list.
    pub async fn load(&self) -> Result<Vec<Submission>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    pub async fn append(&self, submission: &Submission) -> Result<usize, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut all = self.load().await?;
        all.push(submission.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let json = serde_json::to_string_pretty(&all).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::info!(id = %submission.id, total = all.len(), "Submission stored");
        Ok(all.len())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
