use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use log::debug;

use crate::constants::{
    FIELD_FOLDER, FIELD_HOST, FIELD_PASSWORD, FIELD_PORT, FIELD_SOURCE, FIELD_USERNAME,
};
use crate::error::RelayError;

/// Everything one relay job needs to know, resolved from trigger input.
#[derive(Clone, PartialEq, Eq)]
pub struct TransferConfig {
    pub source_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub destination_dir: String,
}

impl TransferConfig {
    /// Build a config from raw key-value trigger fields.
    ///
    /// All fields except `Password` must be present and non-blank, and `Port`
    /// must be an integer in `1..=65535`. Values are kept verbatim; only `Port`
    /// has surrounding whitespace stripped. Nothing is touched on disk or on
    /// the network here.
    pub fn resolve(raw: &HashMap<String, String>) -> Result<Self, RelayError> {
        let source_dir = required(raw, FIELD_SOURCE)?;
        let username = required(raw, FIELD_USERNAME)?;
        let host = required(raw, FIELD_HOST)?;
        let port = parse_port(required(raw, FIELD_PORT)?.trim())?;
        let destination_dir = required(raw, FIELD_FOLDER)?;
        let password = raw.get(FIELD_PASSWORD).cloned().unwrap_or_default();

        debug!("Resolved transfer config for {}@{}:{}", username, host, port);

        Ok(Self {
            source_dir: PathBuf::from(source_dir),
            host,
            port,
            username,
            password,
            destination_dir,
        })
    }

    /// `host:port` form used for dialing and in log lines
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Keep the secret out of logs and panic messages
impl fmt::Debug for TransferConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferConfig")
            .field("source_dir", &self.source_dir)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("destination_dir", &self.destination_dir)
            .finish()
    }
}

fn required(raw: &HashMap<String, String>, field: &str) -> Result<String, RelayError> {
    match raw.get(field) {
        Some(value) if !value.trim().is_empty() => Ok(value.clone()),
        _ => Err(RelayError::Validation(format!("missing required field '{}'", field))),
    }
}

fn parse_port(value: &str) -> Result<u16, RelayError> {
    match value.parse::<u16>() {
        Ok(0) => Err(RelayError::Validation("port must be a positive integer".to_string())),
        Ok(port) => Ok(port),
        Err(_) => Err(RelayError::Validation(format!(
            "port '{}' is not a valid integer in 1..=65535",
            value
        ))),
    }
}
