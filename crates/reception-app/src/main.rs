//! Reception binary: composition root.
//!
//! 1. Parse CLI flags and read the TOML configuration
//! 2. Initialize tracing, then report how the configuration loaded
//! 3. Apply flag and environment overrides
//! 4. Serve the HTTP API, or run a terminal conversation with `--repl`

mod cli;
mod repl;

use std::path::Path;

use clap::Parser;

use reception_api::AppState;
use reception_chat::{ChatError, ReceptionOrchestrator};
use reception_core::config::GeneralConfig;
use reception_core::{ReceptionConfig, ReceptionError};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    let config_file = args.resolve_config_path();
    let loaded = load_config(&config_file, args.config_path_is_explicit());

    // RUST_LOG > --log-level > configured level
    let configured_level = match &loaded {
        Ok(Some(config)) => config.general.log_level.clone(),
        _ => GeneralConfig::default().log_level,
    };
    let log_level = args.resolve_log_level(&configured_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting reception v{}", env!("CARGO_PKG_VERSION"));
    let mut config = match loaded {
        Ok(Some(config)) => {
            tracing::info!(path = %config_file.display(), "Configuration loaded");
            config
        }
        Ok(None) => {
            tracing::info!(path = %config_file.display(), "No configuration file, using defaults");
            ReceptionConfig::default()
        }
        Err(e) => {
            tracing::error!(path = %config_file.display(), error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    config.general.port = args.resolve_port(config.general.port);
    config.general.log_level = log_level;
    config.llm.api_key = args.resolve_api_key(config.llm.api_key.take());

    if config.demo_mode() {
        tracing::warn!("No OpenAI API key set; replies come from the canned keyword table");
    }

    if args.repl {
        let orchestrator = ReceptionOrchestrator::from_config(&config)
            .map_err(|e| ReceptionError::from(ChatError::from(e)))?;
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        repl::run(&orchestrator, stdin, tokio::io::stdout()).await?;
        return Ok(());
    }

    let state = AppState::from_config(config)?;
    reception_api::start_server(state).await?;
    Ok(())
}

/// Read the configuration file. A missing file means defaults unless the
/// path was given explicitly; a file that fails to parse is always an error.
fn load_config(path: &Path, explicit: bool) -> Result<Option<ReceptionConfig>, ReceptionError> {
    match ReceptionConfig::load_if_present(path)? {
        None if explicit => Err(ReceptionError::Config(format!(
            "config file not found: {}",
            path.display()
        ))),
        loaded => Ok(loaded),
    }
}
