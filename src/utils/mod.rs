//! Utility functions shared by the relay stages.
//!
//! ## Components
//!
//! - **Paths**: joining directory and file names under either the remote
//!   (SFTP, always `/`) or the local platform convention
//!
//! ## Common Use Cases
//!
//! ### Building a Remote Destination Path
//!
//! ```
//! use sftp_relay::utils::paths::join_remote;
//!
//! assert_eq!(join_remote("/remote/in", "foo.txt"), "/remote/in/foo.txt");
//! assert_eq!(join_remote("/remote/in/", "foo.txt"), "/remote/in/foo.txt");
//! ```

/// Path joining for local and remote conventions
pub mod paths;
