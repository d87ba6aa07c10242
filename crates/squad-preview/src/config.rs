// Configuration loading and parsing (config/preview.toml).

use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schedule::gameweek::DEFAULT_WINDOW_SIZE;

pub const CONFIG_FILE: &str = "preview.toml";
pub const DEFAULT_LOG_FILTER: &str = "squad_preview=info,warn";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// preview.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub preview: PreviewConfig,
    pub data: DataPaths,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Number of upcoming rounds to preview.
    #[serde(default = "default_window_size")]
    pub window_size: usize,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        PreviewConfig {
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

fn default_window_size() -> usize {
    DEFAULT_WINDOW_SIZE
}

/// Locations of the downloaded API payloads, relative to the working
/// directory unless absolute.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub bootstrap: String,
    pub fixtures: String,
    pub picks: String,
    /// Manager summary payload. Optional: the preview works without it.
    #[serde(default)]
    pub manager: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/preview.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()` for application startup.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path)
        .map_err(|_| ConfigError::FileNotFound { path: path.clone() })?;
    let config: Config =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError { path, source: e })?;

    validate(&config)?;
    Ok(config)
}

/// Copy any config files missing from `config/` out of `defaults/`.
/// Existing files are never overwritten. Returns the copied paths.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    let mut copied = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        let target = config_dir.join(file_name);

        // create_new fails on an existing file, so user edits are never clobbered.
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                dest.write_all(&content)
                    .map_err(|e| ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.preview.window_size == 0 {
        return Err(ConfigError::ValidationError {
            field: "preview.window_size".into(),
            message: "must be greater than 0".into(),
        });
    }

    let data = &config.data;
    let path_fields: &[(&str, &str)] = &[
        ("data.bootstrap", data.bootstrap.as_str()),
        ("data.fixtures", data.fixtures.as_str()),
        ("data.picks", data.picks.as_str()),
    ];
    for (name, val) in path_fields {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }
    if data.manager.as_deref().is_some_and(|m| m.trim().is_empty()) {
        return Err(ConfigError::ValidationError {
            field: "data.manager".into(),
            message: "must not be empty when set".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
