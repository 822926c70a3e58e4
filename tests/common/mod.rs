//! Shared helpers for integration tests.
//!
//! `InMemoryConnector` stands in for an SFTP server: it records every
//! connection, every method list offered, and every file written.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use sftp_relay::config::TransferConfig;
use sftp_relay::transfer::{AuthMethod, Connector, RemoteSession};
use sftp_relay::RelayError;

#[derive(Default)]
pub struct RemoteState {
    pub files: HashMap<String, Vec<u8>>,
    pub connects: usize,
    pub open_sessions: usize,
    pub offered: Vec<Vec<&'static str>>,
    pub fail_paths: HashSet<String>,
    pub reject_auth: bool,
}

#[derive(Clone, Default)]
pub struct InMemoryConnector {
    pub state: Arc<Mutex<RemoteState>>,
}

impl InMemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_auth() -> Self {
        let connector = Self::default();
        connector.state.lock().unwrap().reject_auth = true;
        connector
    }

    pub fn failing_on(paths: &[&str]) -> Self {
        let connector = Self::default();
        connector
            .state
            .lock()
            .unwrap()
            .fail_paths
            .extend(paths.iter().map(|p| p.to_string()));
        connector
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn open_sessions(&self) -> usize {
        self.state.lock().unwrap().open_sessions
    }

    pub fn remote_file(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().unwrap().files.get(path).cloned()
    }

    pub fn remote_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.state.lock().unwrap().files.keys().cloned().collect();
        paths.sort();
        paths
    }
}

impl Connector for InMemoryConnector {
    fn connect(
        &self,
        config: &TransferConfig,
        methods: &[AuthMethod],
    ) -> Result<Box<dyn RemoteSession>, RelayError> {
        let mut state = self.state.lock().unwrap();
        state.connects += 1;
        state.offered.push(methods.iter().map(|m| m.name()).collect());

        if state.reject_auth {
            return Err(RelayError::Connection {
                endpoint: config.endpoint(),
                reason: "Authentication failed".to_string(),
            });
        }

        state.open_sessions += 1;
        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
        }))
    }
}

struct InMemorySession {
    state: Arc<Mutex<RemoteState>>,
}

impl RemoteSession for InMemorySession {
    fn write_file(&mut self, remote_path: &str, contents: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_paths.contains(remote_path) {
            return Err(anyhow!("Failed to create remote file: {}: no such file", remote_path));
        }
        state.files.insert(remote_path.to_string(), contents.to_vec());
        Ok(())
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.state.lock().unwrap().open_sessions -= 1;
    }
}

pub fn write_files(dir: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(dir.join(name), content).unwrap();
    }
}

pub fn local_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

pub fn trigger_fields(source: &Path, port: &str, folder: &str) -> HashMap<String, String> {
    [
        ("Source", source.to_str().unwrap()),
        ("Username", "relay"),
        ("Password", "hunter2"),
        ("Host", "sftp.example.com"),
        ("Port", port),
        ("Folder", folder),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
