//! Configuration file loading for the CLI.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Deserialize;

use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, SwimflowError};
use crate::layout::{LayoutConfig, LayoutOverrides};

/// Local config file picked up when no explicit path is given.
pub const LOCAL_CONFIG: &str = "swimflow.toml";

/// Contents of a `swimflow.toml` file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub layout: LayoutOverrides,
}

impl AppConfig {
    /// Layout configuration with this file's `[layout]` table applied over
    /// the defaults.
    pub fn layout_config(&self, diagnostics: &mut Diagnostics) -> LayoutConfig {
        LayoutConfig::default().with_overrides(&self.layout, diagnostics)
    }
}

/// Find and load configuration.
///
/// An explicit path must exist. Without one, `swimflow.toml` in the working
/// directory is used when present, otherwise the defaults.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SwimflowError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        info!(path = local.display().to_string(); "Loading configuration from local path");
        return load_config_file(&local);
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: &Path) -> Result<AppConfig, SwimflowError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }
    let content = fs::read_to_string(path)?;
    let config: AppConfig = toml::from_str(&content).map_err(ConfigError::from)?;
    Ok(config)
}
