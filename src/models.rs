use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A local file picked for transfer in the current job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub source_path: PathBuf,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TransferOutcome {
    Uploaded,
    Failed { reason: String },
}

impl TransferOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, TransferOutcome::Uploaded)
    }
}

/// Per-file result: what happened on the remote side and whether the local
/// copy was removed afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    #[serde(flatten)]
    pub file: CandidateFile,
    pub remote_path: String,
    pub outcome: TransferOutcome,
    pub removed: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub cleanup_error: Option<String>,
}

impl FileReport {
    pub fn new(file: CandidateFile, remote_path: String, outcome: TransferOutcome) -> Self {
        Self {
            file,
            remote_path,
            outcome,
            removed: false,
            cleanup_error: None,
        }
    }
}

/// Summary of one trigger invocation. Nothing in here outlives the request.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct JobReport {
    pub job_id: String,
    pub started_at: String,
    pub finished_at: String,
    /// Whether a remote session was opened at all
    pub connected: bool,
    pub files: Vec<FileReport>,
}

impl JobReport {
    pub fn start() -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            started_at: Utc::now().to_rfc3339(),
            finished_at: String::new(),
            connected: false,
            files: Vec::new(),
        }
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now().to_rfc3339();
        self
    }

    pub fn uploaded_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_uploaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.uploaded_count()
    }

    pub fn removed_count(&self) -> usize {
        self.files.iter().filter(|f| f.removed).count()
    }
}
