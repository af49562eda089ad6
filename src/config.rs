//! Configuration loading from environment variables and an optional TOML file.
//!
//! Values come from `SIMPLEVC_*` environment variables, falling back to the
//! file named by `SIMPLEVC_CONFIG`, then to defaults. Invalid values fall
//! back without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `SIMPLEVC_CONFIG` | unset | Path of a TOML config file |
//! | `SIMPLEVC_DEFAULT_VERSION` | today | Default version (yyyymmdd) of new modules |
//! | `SIMPLEVC_LOG_LEVEL` | warn | Log filter directive |
//! | `SIMPLEVC_LOG_FORMAT` | pretty | `json` or `pretty` |
//! | `SIMPLEVC_LOG_FILE` | unset | Write logs to this file instead of stderr |

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::telemetry::{LogConfig, LogFormat};
use crate::version::{set_default_version, VersionKey};

const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Invalid config file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Contents of a TOML config file. All keys optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub default_version: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

/// Effective configuration.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// Override for the process-wide default version.
    pub default_version: Option<VersionKey>,
    pub log: LogConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            default_version: None,
            log: LogConfig {
                format: LogFormat::Pretty,
                level: DEFAULT_LOG_LEVEL.to_string(),
                output_path: None,
            },
        }
    }
}

impl EnvConfig {
    /// Push the default version override into the process-wide default.
    /// Affects modules created afterwards.
    pub fn apply(&self) {
        if let Some(version) = self.default_version {
            set_default_version(version);
        }
    }
}

/// Parse a TOML config file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn parse_format(raw: &str) -> Option<LogFormat> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "json" => Some(LogFormat::Json),
        "pretty" => Some(LogFormat::Pretty),
        _ => None,
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Load configuration. A broken config file is reported and ignored.
pub fn load() -> EnvConfig {
    let file = match env_var("SIMPLEVC_CONFIG") {
        Some(path) => load_file(Path::new(&path)).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring config file");
            FileConfig::default()
        }),
        None => FileConfig::default(),
    };
    resolve(file)
}

fn resolve(file: FileConfig) -> EnvConfig {
    let defaults = EnvConfig::default();

    let default_version = env_var("SIMPLEVC_DEFAULT_VERSION")
        .or(file.default_version)
        .and_then(|raw| VersionKey::parse(raw.trim()).ok());
    let level = env_var("SIMPLEVC_LOG_LEVEL")
        .or(file.log_level)
        .unwrap_or(defaults.log.level);
    let format = env_var("SIMPLEVC_LOG_FORMAT")
        .or(file.log_format)
        .and_then(|raw| parse_format(&raw))
        .unwrap_or(defaults.log.format);
    let output_path = env_var("SIMPLEVC_LOG_FILE")
        .map(PathBuf::from)
        .or(file.log_file);

    EnvConfig {
        default_version,
        log: LogConfig {
            format,
            level,
            output_path,
        },
    }
}
