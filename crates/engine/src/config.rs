use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::app::LoopConfig;

pub const CONFIG_ENV_VAR: &str = "GRID_ENGINE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path} at {field}: {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Reads a JSON `LoopConfig`; absent fields keep their defaults.
pub fn load_loop_config(path: &Path) -> Result<LoopConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_loop_config(&raw, path)?;
    validate_loop_config(&config)?;
    info!(path = %path.display(), "config_loaded");
    Ok(config)
}

/// Loads the file named by `GRID_ENGINE_CONFIG`, or defaults when unset.
pub fn resolve_loop_config() -> Result<LoopConfig, ConfigError> {
    config_from_env_value(env::var(CONFIG_ENV_VAR))
}

fn config_from_env_value(value: Result<String, env::VarError>) -> Result<LoopConfig, ConfigError> {
    match value {
        Ok(raw) => load_loop_config(Path::new(raw.trim())),
        Err(env::VarError::NotPresent) => {
            info!(env_var = CONFIG_ENV_VAR, "config_defaults_used");
            Ok(LoopConfig::default())
        }
        Err(source) => Err(ConfigError::EnvVar {
            var: CONFIG_ENV_VAR,
            source,
        }),
    }
}

fn parse_loop_config(raw: &str, path: &Path) -> Result<LoopConfig, ConfigError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    serde_path_to_error::deserialize::<_, LoopConfig>(&mut deserializer).map_err(|error| {
        let field = error.path().to_string();
        ConfigError::Parse {
            path: path.to_path_buf(),
            field,
            source: error.into_inner(),
        }
    })
}

pub fn validate_loop_config(config: &LoopConfig) -> Result<(), ConfigError> {
    let grid = &config.grid;
    if grid.cell_width == 0 {
        return Err(invalid("grid.cell_width", "must be greater than zero"));
    }
    if grid.cell_height == 0 {
        return Err(invalid("grid.cell_height", "must be greater than zero"));
    }
    if grid.cols == 0 {
        return Err(invalid("grid.cols", "must be greater than zero"));
    }
    if grid.rows == 0 {
        return Err(invalid("grid.rows", "must be greater than zero"));
    }
    if !grid.origin_px.x.is_finite() || !grid.origin_px.y.is_finite() {
        return Err(invalid("grid.origin_px", "must be finite"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
