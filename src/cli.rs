use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::constants::{
    FIELD_FOLDER, FIELD_HOST, FIELD_PASSWORD, FIELD_PORT, FIELD_SOURCE, FIELD_USERNAME,
};

/// Command-line arguments for the sftp-relay service.
///
/// `serve` runs the HTTP trigger listener; `run` performs a single job from
/// flags, which is handy for schedulers and manual operation.
#[derive(Parser, Debug)]
#[clap(name = "sftp-relay", about = "Triggered SFTP file relay")]
pub struct Args {
    /// Verbose logging
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Subcommands
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Listen for HTTP triggers and run a relay job for each one
    Serve {
        /// Path to service configuration YAML file
        #[clap(short = 'c', long)]
        config: Option<PathBuf>,

        /// Override the listen address from the configuration
        #[clap(short, long)]
        listen: Option<String>,
    },

    /// Run a single relay job and exit
    Run(RunOpts),

    /// Write a default service configuration file
    InitConfig {
        /// Path to write configuration file
        #[clap(default_value = "sftp-relay.yaml")]
        path: PathBuf,
    },
}

/// Options for a one-shot relay job.
///
/// Port is kept as text so it goes through the same validation as a trigger.
#[derive(ClapArgs, Debug)]
pub struct RunOpts {
    /// Local directory holding the files to relay
    #[clap(long)]
    pub source: String,

    /// Remote SFTP host
    #[clap(long)]
    pub host: String,

    /// Remote SFTP port
    #[clap(long, default_value = "22")]
    pub port: String,

    /// SSH username
    #[clap(short, long)]
    pub username: String,

    /// SSH password; falls back to the SFTP_RELAY_PASSWORD environment variable
    #[clap(long, env = "SFTP_RELAY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Remote destination directory
    #[clap(long)]
    pub folder: String,

    /// Path to service configuration YAML file
    #[clap(short = 'c', long)]
    pub config: Option<PathBuf>,
}

impl RunOpts {
    /// Express the flags as the same key-value fields a trigger would send
    pub fn to_fields(&self) -> HashMap<String, String> {
        let mut fields = HashMap::new();
        fields.insert(FIELD_SOURCE.to_string(), self.source.clone());
        fields.insert(FIELD_HOST.to_string(), self.host.clone());
        fields.insert(FIELD_PORT.to_string(), self.port.clone());
        fields.insert(FIELD_USERNAME.to_string(), self.username.clone());
        fields.insert(FIELD_FOLDER.to_string(), self.folder.clone());
        if let Some(password) = &self.password {
            fields.insert(FIELD_PASSWORD.to_string(), password.clone());
        }
        fields
    }
}
