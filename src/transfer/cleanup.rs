use std::fs;

use log::{debug, info, warn};

use crate::error::RelayError;
use crate::models::FileReport;
use crate::security::scrub_credentials;

/// Delete the local copy of every file whose upload succeeded.
///
/// Failed uploads are left in place for the next run. A delete that fails is
/// recorded on its report and logged; the remaining files are still
/// processed. Returns the number of files removed.
pub fn remove_uploaded(reports: &mut [FileReport]) -> usize {
    let mut removed = 0;

    for report in reports.iter_mut().filter(|r| r.outcome.is_uploaded()) {
        match fs::remove_file(&report.file.source_path) {
            Ok(()) => {
                debug!("Removed {}", report.file.source_path.display());
                report.removed = true;
                removed += 1;
            }
            Err(e) => {
                let err = RelayError::Cleanup {
                    path: report.file.source_path.clone(),
                    reason: e.to_string(),
                };
                warn!("{}", scrub_credentials(&err.to_string()));
                report.cleanup_error = Some(err.to_string());
            }
        }
    }

    if removed > 0 {
        info!("Removed {} uploaded file(s) from local storage", removed);
    }
    removed
}
