//! Credential scrubbing utilities for preventing sensitive data exposure.
//!
//! Trigger requests carry a plaintext password, and libssh2 error strings
//! sometimes echo what they were given. Anything bound for a log line or an
//! HTTP response body goes through here first.

use lazy_static::lazy_static;
use regex::Regex;

const REDACTED: &str = "<REDACTED>";

lazy_static! {
    /// Regex patterns for detecting credentials embedded in free text
    static ref CREDENTIAL_PATTERNS: Vec<(Regex, &'static str)> = vec![
        // Generic passwords, including the trigger's form field
        (Regex::new(r"(?i)(password|passwd|pwd|secret)\s*[:=]\s*([^\s&]+)").unwrap(),
         "$1=<REDACTED_PASSWORD>"),

        // Credentials embedded in sftp/ssh URLs
        (Regex::new(r"(?i)(sftp|ssh|scp)://([^:/@\s]+):([^@\s]+)@").unwrap(),
         "$1://$2:<REDACTED_PASS>@"),
    ];
}

/// Scrub credential-looking substrings from a string.
///
/// # Example
///
/// ```
/// use sftp_relay::security::scrub_credentials;
///
/// let input = "login failed with Password=hunter2";
/// assert_eq!(scrub_credentials(input), "login failed with Password=<REDACTED_PASSWORD>");
/// ```
pub fn scrub_credentials(input: &str) -> String {
    let mut result = input.to_string();

    for (pattern, replacement) in CREDENTIAL_PATTERNS.iter() {
        result = pattern.replace_all(&result, *replacement).to_string();
    }

    result
}

/// Replace every occurrence of a known secret, then apply the generic patterns.
pub fn scrub_secret(input: &str, secret: &str) -> String {
    if secret.is_empty() {
        return scrub_credentials(input);
    }
    scrub_credentials(&input.replace(secret, REDACTED))
}
