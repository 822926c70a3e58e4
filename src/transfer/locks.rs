use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

type LockKey = (PathBuf, String);

/// Per (source directory, destination directory) mutual exclusion.
///
/// Jobs that share both paths run one after another; jobs on different
/// pairs do not block each other.
#[derive(Clone, Debug, Default)]
pub struct JobLocks {
    inner: Arc<Mutex<HashMap<LockKey, Arc<Mutex<()>>>>>,
}

impl JobLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock handle for the pair. Lock it for the duration of the job.
    pub fn handle(&self, source_dir: &Path, destination_dir: &str) -> Arc<Mutex<()>> {
        let key = lock_key(source_dir, destination_dir);
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

        // Drop entries no job holds anymore
        map.retain(|_, lock| Arc::strong_count(lock) > 1);

        Arc::clone(map.entry(key).or_default())
    }

    /// Number of pairs currently held or awaited
    #[cfg(test)]
    fn active_keys(&self) -> usize {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.values().filter(|lock| Arc::strong_count(lock) > 1).count()
    }
}

fn lock_key(source_dir: &Path, destination_dir: &str) -> LockKey {
    let source = fs::canonicalize(source_dir).unwrap_or_else(|_| source_dir.to_path_buf());
    let destination = match destination_dir.trim_end_matches('/') {
        "" if destination_dir.starts_with('/') => "/".to_string(),
        trimmed => trimmed.to_string(),
    };
    (source, destination)
}
