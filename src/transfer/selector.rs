use std::fs;
use std::path::Path;

use log::{debug, warn};
use walkdir::WalkDir;

use crate::error::RelayError;
use crate::models::CandidateFile;
use crate::utils::paths::join_local;

/// List the regular files directly inside `source_dir` whose name ends with
/// `suffix`, sorted by name.
///
/// Subdirectories are neither entered nor selected. Entries that do not match
/// are left out entirely, so they are never uploaded and never deleted.
pub fn select_candidates(source_dir: &Path, suffix: &str) -> Result<Vec<CandidateFile>, RelayError> {
    let fs_error = |reason: String| RelayError::Filesystem {
        path: source_dir.to_path_buf(),
        reason,
    };

    let metadata = fs::metadata(source_dir).map_err(|e| fs_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(fs_error("not a directory".to_string()));
    }

    let mut candidates = Vec::new();
    let walker = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| fs_error(e.to_string()))?;

        let Some(name) = entry.file_name().to_str() else {
            warn!("Skipping entry with non UTF-8 name: {}", entry.path().display());
            continue;
        };

        if !name.ends_with(suffix) {
            continue;
        }

        // Symlinks count when they point at a regular file
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file {
            debug!("Skipping non-file entry {}", entry.path().display());
            continue;
        }

        candidates.push(CandidateFile {
            name: name.to_string(),
            source_path: join_local(source_dir, name),
        });
    }

    debug!(
        "Selected {} candidate(s) matching '{}' in {}",
        candidates.len(),
        suffix,
        source_dir.display()
    );
    Ok(candidates)
}
