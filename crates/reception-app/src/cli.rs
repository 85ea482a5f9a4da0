//! Command-line arguments.
//!
//! Priority for every setting: CLI flag > environment variable > config
//! file > built-in default.

use clap::Parser;
use std::path::PathBuf;

/// LEAP AI, the virtual receptionist for the Leapmotor showroom.
#[derive(Parser, Debug)]
#[command(name = "reception", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// OpenAI API key. Without one the assistant runs in demo mode.
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Talk to the assistant in the terminal instead of serving HTTP.
    #[arg(long = "repl")]
    pub repl: bool,
}

impl CliArgs {
    /// --config > RECEPTION_CONFIG > ~/.reception/config.toml
    pub fn resolve_config_path(&self) -> PathBuf {
        resolve_config_path(self.config.as_ref(), std::env::var("RECEPTION_CONFIG").ok())
    }

    /// True when the config path came from --config or RECEPTION_CONFIG,
    /// in which case a missing file is an error.
    pub fn config_path_is_explicit(&self) -> bool {
        config_path_is_explicit(self.config.as_ref(), std::env::var("RECEPTION_CONFIG").ok())
    }

    /// --port > RECEPTION_PORT > config value
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        resolve_port(self.port, std::env::var("RECEPTION_PORT").ok(), config_port)
    }

    /// --api-key > OPENAI_API_KEY > config value
    pub fn resolve_api_key(&self, config_key: Option<String>) -> Option<String> {
        resolve_api_key(
            self.api_key.clone(),
            std::env::var("OPENAI_API_KEY").ok(),
            config_key,
        )
    }

    /// --log-level > config value
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }
}

fn resolve_config_path(flag: Option<&PathBuf>, env: Option<String>) -> PathBuf {
    if let Some(p) = flag {
        return p.clone();
    }
    if let Some(p) = env.filter(|p| !p.is_empty()) {
        return PathBuf::from(p);
    }
    default_config_path()
}

fn config_path_is_explicit(flag: Option<&PathBuf>, env: Option<String>) -> bool {
    flag.is_some() || env.is_some_and(|p| !p.is_empty())
}

fn resolve_port(flag: Option<u16>, env: Option<String>, config_port: u16) -> u16 {
    if let Some(p) = flag {
        return p;
    }
    if let Some(p) = env.and_then(|v| v.parse::<u16>().ok()) {
        return p;
    }
    config_port
}

fn resolve_api_key(
    flag: Option<String>,
    env: Option<String>,
    config_key: Option<String>,
) -> Option<String> {
    [flag, env, config_key]
        .into_iter()
        .flatten()
        .find(|k| !k.trim().is_empty())
}

fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");
    match home {
        Ok(home) => PathBuf::from(home).join(".reception").join("config.toml"),
        Err(_) => PathBuf::from("config.toml"),
    }
}
