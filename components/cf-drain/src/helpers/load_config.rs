// External crates
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// `cf-drain` configuration. Every section and key is optional.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub cf: CfConfig,
    pub forwarder: ForwarderConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct CfConfig {
    /// `cf` executable, looked up on `PATH` when not absolute
    pub binary: PathBuf,
    /// Directory holding the `.cf` session directory, defaults to `CF_HOME` then `HOME`
    pub home: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Directory the `syslog_forwarder` binary is served from
    pub asset_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `CF_DRAIN_LOG` is unset
    pub level: String,
    pub directory: PathBuf,
}

impl Default for CfConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("cf"),
            home: None,
        }
    }
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            asset_dir: home_dir().join(".cf-drain").join("assets"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: home_dir().join(".local").join("state").join("cf-drain"),
        }
    }
}

impl CfConfig {
    /// Directory whose `.cf/config.json` holds the CLI session.
    pub fn cf_home(&self) -> PathBuf {
        self.home
            .clone()
            .or_else(|| std::env::var_os("CF_HOME").map(PathBuf::from))
            .unwrap_or_else(home_dir)
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Config {
    /// `$HOME/.config/cf-drain/config.toml`
    pub fn default_path() -> PathBuf {
        home_dir().join(".config").join("cf-drain").join("config.toml")
    }

    /// Load an explicitly requested file, or the default file when it exists.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_optional(&Self::default_path()),
        }
    }

    /// Load `path` if present, built-in defaults otherwise.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::trace!(configuration_file_path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Load and parse the configuration file
    #[instrument(
        name = "config_loader",
        target = "helpers::load_config",
        level = "trace",
        skip_all
    )]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();

        tracing::trace!(
            configuration_file_path = %path_ref.display(),
            "Loading cf-drain configuration file"
        );

        let config_str = match fs::read_to_string(path_ref) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read configuration file");
                return Err(e)
                    .with_context(|| format!("Failed to read config file at {:?}", path_ref));
            }
        };
        let config: Config = match toml::from_str(&config_str) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "Failed to parse TOML configuration");
                return Err(e)
                    .with_context(|| format!("Failed to parse TOML from {:?}", path_ref));
            }
        };

        tracing::trace!(configuration_file_path = %path_ref.display(), "cf-drain configuration file loaded successfully");
        Ok(config)
    }
}
