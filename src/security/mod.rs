//! Security utilities.
//!
//! - Credential scrubbing to keep trigger secrets out of logs and responses

pub mod credential_scrubber;

pub use credential_scrubber::{scrub_credentials, scrub_secret};
