use anyhow::Context;
use clap::Parser;
use modsync::config::needs_config_file;
use modsync::{load_config, sync_directory, SyncOptions};
use modsync::utils::DEFAULT_CONFIG_FILE;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// modsync - Mirror a local directory against a server's file list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the JSON config file ({"ModsDir": ..., "Server": ...})
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Directory to sync, overrides ModsDir from the config file
    #[arg(long, env = "MODSYNC_MODS_DIR")]
    mods_dir: Option<String>,

    /// Server as host:port, overrides Server from the config file
    #[arg(long, env = "MODSYNC_SERVER")]
    server: Option<String>,

    /// Show what would change without touching the directory
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let context = config_context(&args);
    let config = load_config(&args.config, args.mods_dir, args.server)
        .await
        .context(context)?;

    let options = SyncOptions {
        dry_run: args.dry_run,
    };

    let report = sync_directory(&config, options)
        .await
        .map_err(|e| {
            let phase = e.phase();
            anyhow::Error::new(e).context(format!("Sync failed during {} phase", phase))
        })?;

    debug!(
        removed = report.removed.len(),
        downloaded = report.downloaded.len(),
        bytes = report.bytes_downloaded,
        "Sync finished"
    );
    Ok(())
}

/// Only blame the config file when it was actually read
fn config_context(args: &Args) -> String {
    if needs_config_file(args.mods_dir.as_deref(), args.server.as_deref()) {
        format!("Failed to load config from {}", args.config.display())
    } else {
        "Invalid --mods-dir/--server configuration".to_string()
    }
}
