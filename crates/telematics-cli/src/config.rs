//! Configuration file handling for telematics-cli

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use telematics_client::{ClientConfig, Region};

/// Default service URL when none is configured
const DEFAULT_SERVER: &str = "http://localhost:8080";

/// Configuration for the CLI tool
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Service base URL
    pub server: Option<String>,
    /// Account email
    pub email: Option<String>,
    /// Account password
    pub password: Option<String>,
    /// Account region (MNAO, MME, MJO)
    pub region: Option<String>,
    /// Default output format
    pub output: Option<String>,
    /// Disable colored output
    pub no_color: Option<bool>,
}

/// Values given on the command line or through the environment
#[derive(Debug, Default)]
pub struct ArgOverrides<'a> {
    pub server: Option<&'a str>,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub region: Option<&'a str>,
    pub no_color: bool,
}

impl Config {
    /// Load configuration from the default config file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("telematics-cli");

        Ok(config_dir.join("config.toml"))
    }

    /// Merge CLI arguments over config file values
    pub fn merge_with_args(&self, args: &ArgOverrides<'_>) -> Result<MergedConfig> {
        let region = match args.region.map(String::from).or_else(|| self.region.clone()) {
            Some(code) => code.parse::<Region>()?,
            None => Region::default(),
        };

        let email = args
            .email
            .map(String::from)
            .or_else(|| self.email.clone())
            .unwrap_or_default();
        let password = args
            .password
            .map(String::from)
            .or_else(|| self.password.clone())
            .unwrap_or_default();

        Ok(MergedConfig {
            server: args
                .server
                .map(String::from)
                .or_else(|| self.server.clone())
                .unwrap_or_else(|| DEFAULT_SERVER.to_string()),
            client: ClientConfig::new(email, password, region),
            no_color: args.no_color || self.no_color.unwrap_or(false),
        })
    }
}

/// Fully resolved configuration after merging CLI args
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub server: String,
    pub client: ClientConfig,
    pub no_color: bool,
}
