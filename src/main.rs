//! CLI entry point for hfetch.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use hfetch_core::{ClientSettings, HttpClient, RequestConfig, RequestOptions, perform};
use tracing::{debug, info, warn};

mod app_config;
mod cli;

use app_config::FileConfig;
use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    init_tracing(args.verbose, args.quiet);
    debug!(?args, "CLI arguments parsed");

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

/// Installs the stderr log subscriber.
///
/// Priority: `RUST_LOG` env var > quiet flag > verbose count > default (warn)
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(args: &Args) -> Result<()> {
    let file_config = if args.no_config {
        debug!("config file loading disabled");
        None
    } else {
        app_config::load_default_file_config()?
    };
    if file_config.is_some() {
        debug!(?file_config, "loaded config file");
    }

    let settings = client_settings(args, file_config.as_ref());
    let options = request_options(args, file_config.as_ref());

    let config = RequestConfig::resolve(options).context("invalid request")?;
    let client = HttpClient::new(&settings)?;

    let summary = perform(&config, &client).await?;

    if summary.limit_reached {
        warn!(
            bytes = summary.bytes_written,
            "response truncated by --max-filesize"
        );
    }
    info!(
        status = %summary.status,
        bytes = summary.bytes_written,
        truncated = summary.limit_reached,
        destination = %summary.destination,
        "transfer complete"
    );

    Ok(())
}

/// Merges client settings: CLI flag, then config file, then built-in default.
fn client_settings(args: &Args, file_config: Option<&FileConfig>) -> ClientSettings {
    let defaults = ClientSettings::default();

    let connect_timeout = args
        .connect_timeout
        .or_else(|| file_config.and_then(|cfg| cfg.connect_timeout_secs))
        .map_or(defaults.connect_timeout, Duration::from_secs);
    let max_time = args
        .max_time
        .or_else(|| file_config.and_then(|cfg| cfg.max_time_secs))
        .map(Duration::from_secs);
    let user_agent = args
        .user_agent
        .clone()
        .or_else(|| file_config.and_then(|cfg| cfg.user_agent.clone()))
        .unwrap_or(defaults.user_agent);

    ClientSettings {
        connect_timeout,
        max_time,
        user_agent,
    }
}

/// Builds request options from the CLI, filling size caps from the config file.
fn request_options(args: &Args, file_config: Option<&FileConfig>) -> RequestOptions {
    let mut options = args.request_options();
    if let Some(cfg) = file_config {
        options.limit_rate = options.limit_rate.or(cfg.limit_rate);
        options.max_filesize = options.max_filesize.or(cfg.max_filesize);
    }
    options
}
