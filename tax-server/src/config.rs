//! Service configuration.
//!
//! Values are layered, lowest precedence first: built-in defaults, the
//! TOML config file, `TAX_CALCULATOR_*` environment variables, then
//! command-line flags. Environment variables and flags are both handled
//! by [`Cli`]; clap lets a flag win over its environment variable.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde::Deserialize;
use tax_core::{SourceConfig, SupportedYears};

/// Config file used when neither `--config` nor `TAX_CALCULATOR_CONFIG_PATH` is set.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/tax-calculator/conf.d/config.toml";

/// Progressive income tax calculator service.
#[derive(Debug, Default, Parser)]
#[command(name = "tax-calculator", version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long, env = "TAX_CALCULATOR_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Port to listen on.
    #[arg(short, long, env = "TAX_CALCULATOR_APP_PORT")]
    pub port: Option<u16>,

    /// Enable debug logging.
    #[arg(
        long,
        env = "TAX_CALCULATOR_APP_DEBUG",
        num_args = 0..=1,
        default_missing_value = "true",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    pub debug: Option<bool>,

    /// Directory for `app.log`; logs go to stdout only when unset.
    #[arg(long, env = "TAX_CALCULATOR_APP_LOG_PATH")]
    pub log_path: Option<PathBuf>,

    /// Bracket source backend (`http` or `csv`).
    #[arg(long, env = "TAX_CALCULATOR_SOURCE_BACKEND")]
    pub backend: Option<String>,

    /// Schedule API base URL or schedule CSV path, depending on the backend.
    #[arg(long = "source", env = "TAX_CALCULATOR_SOURCE_LOCATION")]
    pub source_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub app: AppConfig,
    pub source: SourceSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub port: u16,
    pub debug: bool,
    pub log_path: Option<PathBuf>,
    pub supported_years: SupportedYears,
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            debug: false,
            log_path: None,
            supported_years: SupportedYears::default(),
            request_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub backend: String,
    pub location: String,
    pub timeout_secs: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        let defaults = SourceConfig::default();
        Self {
            backend: defaults.backend,
            location: defaults.location,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

impl Config {
    /// Resolve the full configuration for `cli`.
    ///
    /// A missing file at [`DEFAULT_CONFIG_PATH`] falls back to defaults; a
    /// missing file that was asked for explicitly is an error.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::from_file_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the service unable to answer.
    pub fn validate(&self) -> Result<()> {
        if self.app.request_timeout_secs == 0 {
            bail!("app.request_timeout_secs must be greater than zero");
        }
        if self.source.timeout_secs == 0 {
            bail!("source.timeout_secs must be greater than zero");
        }
        if self.app.supported_years.is_empty() {
            bail!("app.supported_years must name at least one year");
        }
        Ok(())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    fn from_file_or_default(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)
                .with_context(|| format!("Failed to parse config file '{}'", path.display())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to read config file '{}'", path.display())),
        }
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Environment variables and flags win over file values.
    pub fn apply_overrides(
        &mut self,
        cli: &Cli,
    ) {
        if let Some(port) = cli.port {
            self.app.port = port;
        }
        if let Some(debug) = cli.debug {
            self.app.debug = debug;
        }
        if let Some(log_path) = &cli.log_path {
            self.app.log_path = Some(log_path.clone());
        }
        if let Some(backend) = &cli.backend {
            self.source.backend = backend.clone();
        }
        if let Some(location) = &cli.source_location {
            self.source.location = location.clone();
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            backend: self.source.backend.clone(),
            location: self.source.location.clone(),
            timeout: Duration::from_secs(self.source.timeout_secs),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.app.request_timeout_secs)
    }
}
