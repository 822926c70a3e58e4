use std::fs;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::constants::{CANCELLED_REASON, ERROR_FAILED_TO_READ_FILE};
use crate::error::RelayError;
use crate::models::{CandidateFile, FileReport, TransferOutcome};
use crate::transfer::connector::RemoteSession;
use crate::utils::paths::join_remote;

/// Cooperative cancellation, checked between files.
#[derive(Clone, Debug, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Uploads candidates one at a time over an open session.
pub struct TransferExecutor<'a> {
    destination_dir: &'a str,
    cancel: Option<&'a CancellationFlag>,
}

impl<'a> TransferExecutor<'a> {
    pub fn new(destination_dir: &'a str) -> Self {
        Self {
            destination_dir,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, cancel: Option<&'a CancellationFlag>) -> Self {
        self.cancel = cancel;
        self
    }

    /// Attempt every candidate in order and report each outcome.
    ///
    /// A failed file never stops the loop. Nothing is deleted here.
    pub fn execute(
        &self,
        session: &mut dyn RemoteSession,
        candidates: &[CandidateFile],
    ) -> Vec<FileReport> {
        let mut reports = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let remote_path = join_remote(self.destination_dir, &candidate.name);

            if self.cancel.map_or(false, |c| c.is_cancelled()) {
                debug!("Cancellation requested, skipping {}", candidate.name);
                reports.push(FileReport::new(
                    candidate.clone(),
                    remote_path,
                    TransferOutcome::Failed {
                        reason: CANCELLED_REASON.to_string(),
                    },
                ));
                continue;
            }

            let outcome = match upload_one(session, candidate, &remote_path) {
                Ok(()) => TransferOutcome::Uploaded,
                Err(e) => {
                    warn!("{}", e);
                    TransferOutcome::Failed {
                        reason: e.to_string(),
                    }
                }
            };
            reports.push(FileReport::new(candidate.clone(), remote_path, outcome));
        }

        let uploaded = reports.iter().filter(|r| r.outcome.is_uploaded()).count();
        info!(
            "Transferred {}/{} file(s) to {}",
            uploaded,
            reports.len(),
            self.destination_dir
        );
        reports
    }
}

fn upload_one(
    session: &mut dyn RemoteSession,
    candidate: &CandidateFile,
    remote_path: &str,
) -> Result<(), RelayError> {
    let transfer_error = |reason: String| RelayError::Transfer {
        file: candidate.name.clone(),
        reason,
    };

    let contents = fs::read(&candidate.source_path).map_err(|e| {
        transfer_error(format!(
            "{} {}: {}",
            ERROR_FAILED_TO_READ_FILE,
            candidate.source_path.display(),
            e
        ))
    })?;

    let start_time = Instant::now();
    session
        .write_file(remote_path, &contents)
        .map_err(|e| transfer_error(format!("{:#}", e)))?;

    debug!(
        "Uploaded {} ({} bytes) to {} in {:?}",
        candidate.source_path.display(),
        contents.len(),
        remote_path,
        start_time.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Records writes and fails the paths it is told to fail.
    #[derive(Default)]
    struct RecordingSession {
        written: HashMap<String, Vec<u8>>,
        attempts: Vec<String>,
        fail_paths: Vec<String>,
        cancel_after_first: Option<CancellationFlag>,
    }

    impl RemoteSession for RecordingSession {
        fn write_file(&mut self, remote_path: &str, contents: &[u8]) -> Result<()> {
            self.attempts.push(remote_path.to_string());
            if let Some(flag) = &self.cancel_after_first {
                flag.cancel();
            }
            if self.fail_paths.iter().any(|p| p == remote_path) {
                return Err(anyhow!("no such file or directory"));
            }
            self.written.insert(remote_path.to_string(), contents.to_vec());
            Ok(())
        }
    }

    fn candidate(dir: &TempDir, name: &str, contents: &str) -> CandidateFile {
        let source_path = dir.path().join(name);
        fs::write(&source_path, contents).unwrap();
        CandidateFile {
            name: name.to_string(),
            source_path,
        }
    }

    #[test]
    fn test_uploads_to_joined_remote_path() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = vec![candidate(&temp_dir, "foo.txt", "hello")];
        let mut session = RecordingSession::default();

        let reports = TransferExecutor::new("/remote/in/").execute(&mut session, &candidates);

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].outcome, TransferOutcome::Uploaded);
        assert_eq!(reports[0].remote_path, "/remote/in/foo.txt");
        assert_eq!(session.written["/remote/in/foo.txt"], b"hello");
        // The executor never deletes
        assert!(candidates[0].source_path.exists());
    }

    #[test]
    fn test_failure_does_not_stop_later_files() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = vec![
            candidate(&temp_dir, "a.txt", "a"),
            candidate(&temp_dir, "b.txt", "b"),
        ];
        let mut session = RecordingSession {
            fail_paths: vec!["/in/a.txt".to_string()],
            ..Default::default()
        };

        let reports = TransferExecutor::new("/in").execute(&mut session, &candidates);

        assert_eq!(session.attempts, vec!["/in/a.txt", "/in/b.txt"]);
        match &reports[0].outcome {
            TransferOutcome::Failed { reason } => {
                assert!(reason.contains("a.txt"));
                assert!(reason.contains("no such file"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(reports[1].outcome, TransferOutcome::Uploaded);
    }

    #[test]
    fn test_unreadable_local_file_is_failed() {
        let candidates = vec![CandidateFile {
            name: "gone.txt".to_string(),
            source_path: PathBuf::from("/definitely/not/here/gone.txt"),
        }];
        let mut session = RecordingSession::default();

        let reports = TransferExecutor::new("/in").execute(&mut session, &candidates);

        assert!(matches!(reports[0].outcome, TransferOutcome::Failed { .. }));
        assert!(session.attempts.is_empty());
    }

    #[test]
    fn test_cancellation_checked_between_files() {
        let temp_dir = TempDir::new().unwrap();
        let candidates = vec![
            candidate(&temp_dir, "a.txt", "a"),
            candidate(&temp_dir, "b.txt", "b"),
        ];
        let flag = CancellationFlag::new();
        let mut session = RecordingSession {
            cancel_after_first: Some(flag.clone()),
            ..Default::default()
        };

        let reports = TransferExecutor::new("/in")
            .with_cancellation(Some(&flag))
            .execute(&mut session, &candidates);

        // The in-flight file completes; the next one is skipped
        assert_eq!(reports[0].outcome, TransferOutcome::Uploaded);
        assert_eq!(
            reports[1].outcome,
            TransferOutcome::Failed {
                reason: CANCELLED_REASON.to_string()
            }
        );
        assert_eq!(session.attempts.len(), 1);
    }
}
