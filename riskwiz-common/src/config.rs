//! Configuration resolution for riskwiz services
//!
//! Multi-tier resolution with Environment → TOML → compiled-default
//! priority. Command-line overrides sit above all three and are applied by
//! the binary after resolution. The orchestration core only reads the
//! resolved values; it never loads configuration itself.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{info, warn};

/// Acquisition strategy selected once per process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Simulated sub-generators, no network
    Mock,
    /// Single remote service call per dispatch
    Real,
}

impl AcquisitionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcquisitionMode::Mock => "mock",
            AcquisitionMode::Real => "real",
        }
    }
}

impl FromStr for AcquisitionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(AcquisitionMode::Mock),
            "real" => Ok(AcquisitionMode::Real),
            other => Err(Error::Config(format!(
                "Unknown acquisition mode '{other}' (expected 'mock' or 'real')"
            ))),
        }
    }
}

/// How much of the log stream gets rendered
///
/// The log events themselves are always emitted; verbosity only gates
/// their rendering via the subscriber's default directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogVerbosity {
    Silent,
    Normal,
    Verbose,
}

impl LogVerbosity {
    /// Default directive handed to the tracing subscriber's env filter
    pub fn default_directive(&self) -> &'static str {
        match self {
            LogVerbosity::Silent => "error",
            LogVerbosity::Normal => "info",
            LogVerbosity::Verbose => "debug",
        }
    }
}

impl FromStr for LogVerbosity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "silent" => Ok(LogVerbosity::Silent),
            "normal" => Ok(LogVerbosity::Normal),
            "verbose" => Ok(LogVerbosity::Verbose),
            other => Err(Error::Config(format!(
                "Unknown log verbosity '{other}' (expected 'silent', 'normal' or 'verbose')"
            ))),
        }
    }
}

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Acquisition strategy for the dispatcher
    pub mode: AcquisitionMode,
    /// Base endpoint of the remote dashboard service (real mode)
    pub remote_base: String,
    /// Hard deadline for the remote call, milliseconds
    pub request_timeout_ms: u64,
    /// Port the local HTTP surface listens on
    pub listen_port: u16,
    /// Log rendering verbosity
    pub verbosity: LogVerbosity,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mode: AcquisitionMode::Mock,
            remote_base: "http://127.0.0.1:5740".to_string(),
            request_timeout_ms: 10_000,
            listen_port: 5731,
            verbosity: LogVerbosity::Normal,
        }
    }
}

/// TOML file shape; every key optional
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub mode: Option<String>,
    pub remote_base: Option<String>,
    pub request_timeout_ms: Option<u64>,
    pub listen_port: Option<u16>,
    pub verbosity: Option<String>,
}

impl ServiceConfig {
    /// Resolve configuration from all tiers
    ///
    /// Priority order:
    /// 1. Environment variables (`RISKWIZ_MODE`, `RISKWIZ_REMOTE_BASE`,
    ///    `RISKWIZ_TIMEOUT_MS`, `RISKWIZ_PORT`, `RISKWIZ_VERBOSITY`)
    /// 2. TOML config file (`~/.config/riskwiz/config.toml`, or the path
    ///    passed explicitly)
    /// 3. Compiled defaults
    ///
    /// An unparseable value in any tier is a hard error, not a silent
    /// fallback: a deployment that asks for a mode and gets the default
    /// instead is worse than one that fails to start.
    pub fn resolve(config_file: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        // Tier 3 upward: TOML file first, environment on top
        let file_path = config_file
            .map(PathBuf::from)
            .or_else(default_config_file);

        if let Some(path) = file_path {
            if path.exists() {
                let toml_config = load_toml(&path)?;
                config.apply_toml(&toml_config)?;
                info!("Configuration loaded from TOML file: {}", path.display());
            }
        }

        config.apply_env()?;

        if config.mode == AcquisitionMode::Real && config.remote_base.trim().is_empty() {
            return Err(Error::Config(
                "Real acquisition mode requires a remote base endpoint".to_string(),
            ));
        }

        Ok(config)
    }

    fn apply_toml(&mut self, toml_config: &TomlConfig) -> Result<()> {
        if let Some(mode) = &toml_config.mode {
            self.mode = mode.parse()?;
        }
        if let Some(base) = &toml_config.remote_base {
            self.remote_base = base.clone();
        }
        if let Some(timeout) = toml_config.request_timeout_ms {
            self.request_timeout_ms = timeout;
        }
        if let Some(port) = toml_config.listen_port {
            self.listen_port = port;
        }
        if let Some(verbosity) = &toml_config.verbosity {
            self.verbosity = verbosity.parse()?;
        }
        Ok(())
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(mode) = std::env::var("RISKWIZ_MODE") {
            self.mode = mode.parse()?;
            info!("Acquisition mode loaded from environment: {}", self.mode.as_str());
        }
        if let Ok(base) = std::env::var("RISKWIZ_REMOTE_BASE") {
            if base.trim().is_empty() {
                warn!("RISKWIZ_REMOTE_BASE is set but empty; keeping previous value");
            } else {
                self.remote_base = base;
            }
        }
        if let Ok(timeout) = std::env::var("RISKWIZ_TIMEOUT_MS") {
            self.request_timeout_ms = timeout
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RISKWIZ_TIMEOUT_MS: '{timeout}'")))?;
        }
        if let Ok(port) = std::env::var("RISKWIZ_PORT") {
            self.listen_port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid RISKWIZ_PORT: '{port}'")))?;
        }
        if let Ok(verbosity) = std::env::var("RISKWIZ_VERBOSITY") {
            self.verbosity = verbosity.parse()?;
        }
        Ok(())
    }
}

/// Default configuration file path for the platform
fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("riskwiz").join("config.toml"))
}

fn load_toml(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))
}
