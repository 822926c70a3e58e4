mod service_config;
mod transfer_config;

// Re-export the per-job transfer configuration
pub use transfer_config::TransferConfig;

// Re-export the long-lived service configuration
pub use service_config::{ServiceConfig, load_or_default};
