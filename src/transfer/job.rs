use std::sync::PoisonError;

use log::{debug, info};

use crate::config::{ServiceConfig, TransferConfig};
use crate::error::RelayError;
use crate::models::JobReport;
use crate::transfer::auth::auth_methods;
use crate::transfer::cleanup::remove_uploaded;
use crate::transfer::connector::Connector;
use crate::transfer::executor::{CancellationFlag, TransferExecutor};
use crate::transfer::locks::JobLocks;
use crate::transfer::selector::select_candidates;

/// Run one relay job end to end.
///
/// Holds the lock for the (source, destination) pair for the whole run. When
/// nothing matches the suffix the job finishes without dialing the remote.
/// Per-file failures are reported in the returned [`JobReport`]; only a
/// directory or connection failure turns into an `Err`.
pub fn run_job(
    config: &TransferConfig,
    settings: &ServiceConfig,
    connector: &dyn Connector,
    locks: &JobLocks,
    cancel: Option<&CancellationFlag>,
) -> Result<JobReport, RelayError> {
    let lock = locks.handle(&config.source_dir, &config.destination_dir);
    let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

    let mut report = JobReport::start();
    info!(
        "Job {} started: {} -> {}:{}",
        report.job_id,
        config.source_dir.display(),
        config.endpoint(),
        config.destination_dir
    );

    let candidates = select_candidates(&config.source_dir, &settings.file_suffix)?;
    if candidates.is_empty() {
        info!("Job {}: no files to relay, skipping connection", report.job_id);
        return Ok(report.finish());
    }

    let methods = auth_methods(&config.password);
    debug!("Offering auth methods {:?}", methods);

    // The session lives only inside this block so it is closed before any
    // local file is deleted, on success and failure alike.
    report.files = {
        let mut session = connector.connect(config, &methods)?;
        report.connected = true;
        TransferExecutor::new(&config.destination_dir)
            .with_cancellation(cancel)
            .execute(session.as_mut(), &candidates)
    };

    remove_uploaded(&mut report.files);

    let report = report.finish();
    info!(
        "Job {} finished: {} uploaded, {} failed, {} removed",
        report.job_id,
        report.uploaded_count(),
        report.failed_count(),
        report.removed_count()
    );
    Ok(report)
}
