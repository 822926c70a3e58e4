//! # sftp-relay
//!
//! A triggered file relay: on request it connects to a remote SFTP server,
//! pushes the locally queued files that match a suffix filter, and deletes
//! from the local queue only the files that actually arrived.
//!
//! ## Overview
//!
//! Each trigger runs one independent job:
//!
//! 1. Resolve and validate the trigger fields into a [`config::TransferConfig`]
//! 2. List the source directory (no recursion) and keep `*.txt` files
//! 3. If nothing matched, stop; no connection is made
//! 4. Connect over SSH, offering keyboard-interactive then password auth
//! 5. Upload each file; one failure does not stop the others
//! 6. Close the session, then remove the files that were uploaded
//!
//! Jobs against the same source and destination directories are serialized.
//!
//! ## Usage
//!
//! ### Trigger Server
//!
//! ```no_run
//! use std::sync::Arc;
//! use sftp_relay::config::ServiceConfig;
//! use sftp_relay::server::{serve, RelayState};
//! use sftp_relay::transfer::SshConnector;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = ServiceConfig::default();
//! let connector = Arc::new(SshConnector::from_service_config(&settings));
//! let addr = settings.listen_addr.clone();
//! serve(RelayState::new(settings, connector), &addr).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Per-job and service configuration
//! - [`constants`]: Application-wide constants
//! - [`error`]: Error taxonomy for relay jobs
//! - [`models`]: Candidate files, outcomes and job reports
//! - [`security`]: Credential scrubbing for logs and responses
//! - [`server`]: HTTP trigger surface
//! - [`transfer`]: The relay workflow stages
//! - [`utils`]: Path joining helpers

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Configuration management
pub mod config;

/// Application constants and configuration values
pub mod constants;

/// Error taxonomy
pub mod error;

/// Core data models and structures used throughout the application
pub mod models;

/// Security utilities for credential protection
pub mod security;

/// HTTP trigger listener
pub mod server;

/// Selection, upload and cleanup workflow
pub mod transfer;

/// Utility functions for path handling
pub mod utils;

pub use error::RelayError;
