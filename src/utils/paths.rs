use std::path::{Path, PathBuf};

use crate::constants::REMOTE_PATH_SEPARATOR;

/// Join a remote directory and a file name with the SFTP separator.
///
/// Trailing separators on `dir` are collapsed so that `"/in/"` and `"/in"`
/// produce the same result. An empty `dir` yields the bare name, which the
/// server resolves against the login directory.
pub fn join_remote(dir: &str, name: &str) -> String {
    let name = name.trim_start_matches(REMOTE_PATH_SEPARATOR);
    if dir.is_empty() {
        return name.to_string();
    }

    let trimmed = dir.trim_end_matches(REMOTE_PATH_SEPARATOR);
    if trimmed.is_empty() {
        // dir was one or more bare separators, i.e. the remote root
        format!("{}{}", REMOTE_PATH_SEPARATOR, name)
    } else {
        format!("{}{}{}", trimmed, REMOTE_PATH_SEPARATOR, name)
    }
}

/// Join a local directory and a file name with the platform separator.
pub fn join_local(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
