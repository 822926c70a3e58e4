//! The relay workflow.
//!
//! A job moves through these stages, each consuming the previous one's
//! output:
//!
//! ```text
//! TransferConfig ─▶ selector ─▶ auth ─▶ connector ─▶ executor ─▶ cleanup
//!                      │
//!                      └─ nothing matched: done, no connection
//! ```
//!
//! [`job::run_job`] wires them together under a per-path lock.
//!
//! ## Usage Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use sftp_relay::config::{ServiceConfig, TransferConfig};
//! use sftp_relay::transfer::{run_job, JobLocks, SshConnector};
//!
//! # fn example() -> anyhow::Result<()> {
//! let fields: HashMap<String, String> = [
//!     ("Source", "/var/spool/outbox"),
//!     ("Username", "relay"),
//!     ("Password", "secret"),
//!     ("Host", "sftp.example.com"),
//!     ("Port", "22"),
//!     ("Folder", "/incoming"),
//! ]
//! .iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let config = TransferConfig::resolve(&fields)?;
//! let settings = ServiceConfig::default();
//! let connector = SshConnector::from_service_config(&settings);
//!
//! let report = run_job(&config, &settings, &connector, &JobLocks::new(), None)?;
//! println!("{} uploaded, {} failed", report.uploaded_count(), report.failed_count());
//! # Ok(())
//! # }
//! ```

/// Authentication method list and keyboard-interactive responder
pub mod auth;

/// Removal of successfully uploaded local files
pub mod cleanup;

/// SSH/SFTP session establishment
pub mod connector;

/// Per-file upload loop
pub mod executor;

/// End-to-end job runner
pub mod job;

/// Per (source, destination) serialization
pub mod locks;

/// Local candidate enumeration
pub mod selector;

pub use auth::{auth_methods, AuthMethod};
pub use connector::{Connector, RemoteSession, SshConnector};
pub use executor::{CancellationFlag, TransferExecutor};
pub use job::run_job;
pub use locks::JobLocks;
pub use selector::select_candidates;
