use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};
use tokio::runtime::Runtime;

use sftp_relay::cli::{Args, Commands, RunOpts};
use sftp_relay::config::{load_or_default, ServiceConfig, TransferConfig};
use sftp_relay::security::scrub_secret;
use sftp_relay::server::{self, RelayState};
use sftp_relay::transfer::{run_job, CancellationFlag, JobLocks, SshConnector};

fn main() -> Result<()> {
    // Parse arguments
    let args = Args::parse();

    // Initialize logging
    initialize_logging(args.verbose)?;

    match &args.command {
        Commands::Serve { config, listen } => handle_serve(config.as_deref(), listen.as_deref()),
        Commands::Run(opts) => handle_run(opts),
        Commands::InitConfig { path } => {
            info!("Creating default service configuration at {}", path.display());
            ServiceConfig::default().save_to_yaml_file(path)
        }
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ).context("Failed to initialize logger")?;
    Ok(())
}

/// Run the trigger listener until the process is stopped
fn handle_serve(config_path: Option<&std::path::Path>, listen: Option<&str>) -> Result<()> {
    let settings = load_or_default(config_path)?;
    let addr = listen.map(str::to_string).unwrap_or_else(|| settings.listen_addr.clone());

    let connector = Arc::new(SshConnector::from_service_config(&settings));
    let state = RelayState::new(settings, connector);

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    runtime.block_on(async {
        tokio::select! {
            result = server::serve(state, &addr) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested, stopping trigger listener");
                Ok(())
            }
        }
    })
}

/// Run one job from command-line flags; Ctrl-C stops it between files
fn handle_run(opts: &RunOpts) -> Result<()> {
    let settings = load_or_default(opts.config.as_deref())?;
    let config = TransferConfig::resolve(&opts.to_fields())?;
    let secret = config.password.clone();

    let cancel = CancellationFlag::new();
    let job_cancel = cancel.clone();

    let runtime = Runtime::new().context("Failed to create Tokio runtime")?;
    let result = runtime.block_on(async move {
        let job = tokio::task::spawn_blocking(move || {
            let connector = SshConnector::from_service_config(&settings);
            run_job(&config, &settings, &connector, &JobLocks::new(), Some(&job_cancel))
        });
        tokio::pin!(job);

        tokio::select! {
            joined = &mut job => joined,
            _ = tokio::signal::ctrl_c() => {
                warn!("Cancellation requested, finishing the file in flight");
                cancel.cancel();
                job.await
            }
        }
    });

    let report = result
        .context("Relay job did not complete")?
        .map_err(|e| anyhow!(scrub_secret(&e.to_string(), &secret)))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failed_count() > 0 {
        warn!("{} file(s) were not transferred and remain in place", report.failed_count());
    }
    Ok(())
}
