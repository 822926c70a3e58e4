//! Global constants for the sftp-relay application.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Trigger surface
/// Default address the trigger listener binds to
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8084";

/// Form field carrying the local source directory
pub const FIELD_SOURCE: &str = "Source";

/// Form field carrying the SSH username
pub const FIELD_USERNAME: &str = "Username";

/// Form field carrying the SSH password
pub const FIELD_PASSWORD: &str = "Password";

/// Form field carrying the remote host
pub const FIELD_HOST: &str = "Host";

/// Form field carrying the remote port
pub const FIELD_PORT: &str = "Port";

/// Form field carrying the remote destination directory
pub const FIELD_FOLDER: &str = "Folder";

// Selection
/// Only files whose name ends with this suffix are relayed
pub const DEFAULT_FILE_SUFFIX: &str = ".txt";

// Remote protocol
/// Separator used by SFTP paths regardless of the local platform
pub const REMOTE_PATH_SEPARATOR: char = '/';

// Timeout constants
/// Default connect/handshake/authentication timeout in seconds
pub const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;

/// Default timeout for a single blocking SFTP operation in seconds
pub const DEFAULT_IO_TIMEOUT_SECS: u64 = 60;

// Error messages
pub const ERROR_FAILED_TO_CONNECT: &str = "Failed to open TCP connection";
pub const ERROR_FAILED_TO_CREATE_SESSION: &str = "Failed to create SSH session";
pub const ERROR_FAILED_TO_HANDSHAKE: &str = "Failed to perform SSH handshake";
pub const ERROR_FAILED_TO_CREATE_SFTP: &str = "Failed to create SFTP subsystem";
pub const ERROR_AUTHENTICATION_FAILED: &str = "Authentication failed";
pub const ERROR_FAILED_TO_READ_FILE: &str = "Failed to read file";
pub const ERROR_FAILED_TO_CREATE_REMOTE: &str = "Failed to create remote file";
pub const ERROR_FAILED_TO_WRITE_FILE: &str = "Failed to write file";
pub const ERROR_FAILED_TO_CLOSE_REMOTE: &str = "Failed to close remote file";

/// Reason recorded for candidates skipped after a cancellation request
pub const CANCELLED_REASON: &str = "cancelled before transfer";
