//! Interview Assistant - screenshot-driven AI helper overlay
//!
//! An always-on-top window that queues screenshots, tracks interview session
//! folders and keeps the model and response appearance settings.

mod app;
mod backend;
mod capture;
mod config;
mod dashboard;
mod hotkey;
mod ipc;
mod overlay;
mod shared;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::config::AppConfig;
use crate::ipc::IpcRouter;
use crate::storage::AppPaths;

/// Interview Assistant - screenshot-driven AI helper overlay
#[derive(Parser, Debug)]
#[command(name = "interview-assistant")]
#[command(about = "Always-on-top assistant that queues screenshots and tracks interview sessions")]
struct Args {
    /// Path to config.toml (defaults to the per-user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the session folders and the current session, then exit
    #[arg(long)]
    list_sessions: bool,

    /// Run one IPC route, print its JSON response, then exit
    #[arg(long, value_name = "ROUTE")]
    invoke: Option<String>,

    /// JSON arguments for --invoke
    #[arg(long, value_name = "JSON", requires = "invoke")]
    args: Option<String>,

    /// Start with the window hidden
    #[arg(long)]
    start_hidden: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = load_or_create_config(args.config.as_deref());
    let paths = AppPaths::resolve(&config, args.config.clone())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    if args.list_sessions {
        let router = IpcRouter::new(&paths.sessions_root, &paths.temp_dir);
        return runtime.block_on(list_sessions(&router));
    }

    if let Some(route) = &args.invoke {
        let router = IpcRouter::new(&paths.sessions_root, &paths.temp_dir);
        return runtime.block_on(invoke_route(&router, route, args.args.as_deref()));
    }

    info!("Interview Assistant starting...");

    let context = AppContext::new(config, paths, runtime.handle().clone());
    if args.start_hidden {
        context.hide_on_launch();
    }

    // Run the dashboard (blocking)
    if let Err(e) = dashboard::run_dashboard(context) {
        tracing::error!("Dashboard error: {}", e);
    }

    info!("Interview Assistant shutdown complete");

    Ok(())
}

/// Load configuration from file or create default
fn load_or_create_config(path: Option<&Path>) -> AppConfig {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match storage::get_config_dir() {
            Ok(dir) => dir.join("config.toml"),
            Err(e) => {
                warn!("No config directory: {:#}", e);
                return AppConfig::default();
            }
        },
    };

    if config_path.exists() {
        match config::load_config(&config_path) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                return config;
            }
            Err(e) => warn!("Ignoring unreadable configuration: {:#}", e),
        }
    }

    info!("Using default configuration");
    let config = AppConfig::default();
    if !config_path.exists() {
        let written = config_path
            .parent()
            .map_or(Ok(()), std::fs::create_dir_all)
            .map_err(anyhow::Error::from)
            .and_then(|_| config::save_config(&config, &config_path));
        match written {
            Ok(()) => info!("Wrote default configuration to {:?}", config_path),
            Err(e) => warn!("Failed to write default configuration: {:#}", e),
        }
    }
    config
}

async fn list_sessions(router: &IpcRouter) -> Result<()> {
    let sessions = router.sessions().list_sessions().await?;
    let current = router.sessions().current_session_path().await?;

    if sessions.is_empty() {
        println!("No sessions under {}", router.sessions().root().display());
    } else {
        println!("Sessions under {}:", router.sessions().root().display());
        for name in &sessions {
            println!("  {}", name);
        }
    }
    if let Some(current) = current {
        println!("Current session: {}", current.display());
    }

    Ok(())
}

async fn invoke_route(router: &IpcRouter, route: &str, args: Option<&str>) -> Result<()> {
    let args = match args {
        Some(json) => serde_json::from_str(json).context("--args is not valid JSON")?,
        None => serde_json::Value::Null,
    };

    let response = router.invoke(route, args).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
