//! Deployment Console - Entry Point
//!
//! Follows the live log of an Applikatoni deployment from the terminal and
//! keeps its status badge, kill control and title icon in step with it.

use std::env;
use std::process::ExitCode;

use deploy_console::app::context::PageContext;
use deploy_console::app::options::{AppOptions, SectionOptions};
use deploy_console::app::run::run;
use deploy_console::filesys::file::File;
use deploy_console::logs::{init_logging, LogOptions};
use deploy_console::storage::settings::Settings;
use deploy_console::stream::session::SessionEnd;
use deploy_console::utils::{parse_cli_args, version_info};

use tracing::{error, info};

const DEFAULT_SETTINGS_FILE: &str = "deploy-console.json";

#[tokio::main]
async fn main() -> ExitCode {
    let cli_args = parse_cli_args(env::args().skip(1));

    // Print version and exit
    let version = version_info();
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", version.version),
        }
        return ExitCode::SUCCESS;
    }

    // Retrieve the settings file; only an explicitly named file has to exist
    let settings = match cli_args.get("settings") {
        Some(path) => File::new(path).read_json::<Settings>().await,
        None => File::new(DEFAULT_SETTINGS_FILE).read_json_or_default::<Settings>().await,
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        log_dir: settings.log_dir.clone(),
        json_format: settings.log_json,
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    // Page context from a file or from flags
    let context = match cli_args.get("context") {
        Some(path) => File::new(path).read_json::<PageContext>().await,
        None => PageContext::from_args(&cli_args),
    };
    let context = match context {
        Ok(context) => context,
        Err(e) => {
            error!("Invalid deployment context: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut options = AppOptions::from(&settings);
    options.sections = SectionOptions::from_args(&cli_args);
    if let Some(base_url) = cli_args.get("base-url") {
        options.dashboard_base_url = base_url.clone();
    }

    info!("Running deployment console {} with context: {:?}", version.version, context);
    match run(options, context, await_shutdown_signal()).await {
        Ok(SessionEnd::TransportError(_)) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to run the console: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn await_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    error!("Failed to install signal handlers");
                    return std::future::pending().await;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => {
                info!("SIGTERM received, shutting down...");
            }
            _ = sigint.recv() => {
                info!("SIGINT received, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        if tokio::signal::ctrl_c().await.is_err() {
            error!("Failed to listen for Ctrl+C");
            return std::future::pending().await;
        }
        info!("Ctrl+C received, shutting down...");
    }
}
