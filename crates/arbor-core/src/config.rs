use crate::error::ArborError;
use crate::model::ReviewType;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project settings stored in `.arbor/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArborConfig {
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    #[serde(default = "default_reviewer")]
    pub reviewer: String,
    #[serde(default)]
    pub review_type: ReviewType,
    #[serde(default = "default_true")]
    pub save_on_quit: bool,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            reviewer: default_reviewer(),
            review_type: ReviewType::default(),
            save_on_quit: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Width of the tree pane as a percentage of the terminal.
    #[serde(default = "default_split_percent")]
    pub split_percent: u16,
    #[serde(default = "default_true")]
    pub show_detail: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            split_percent: default_split_percent(),
            show_detail: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

const fn default_split_percent() -> u16 {
    45
}

fn default_reviewer() -> String {
    std::env::var("USER")
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "reviewer".to_string())
}

/// Location of the project config below `project_root`.
#[must_use]
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".arbor/config.toml")
}

/// Load the project config, falling back to defaults when absent.
///
/// # Errors
///
/// Returns [`ArborError::Io`] if the file exists but cannot be read, and
/// [`ArborError::Config`] if it is not valid TOML for this schema.
pub fn load_project_config(project_root: &Path) -> Result<ArborConfig, ArborError> {
    load_from(&project_config_path(project_root))
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Same as [`load_project_config`].
pub fn load_user_config() -> Result<ArborConfig, ArborError> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ArborConfig::default());
    };
    load_from(&config_dir.join("arbor/config.toml"))
}

/// Project config if present, otherwise user config, otherwise defaults.
///
/// # Errors
///
/// Propagates read and parse failures from whichever file is chosen.
pub fn load_config(project_root: &Path) -> Result<ArborConfig, ArborError> {
    if project_config_path(project_root).exists() {
        load_project_config(project_root)
    } else {
        load_user_config()
    }
}

fn load_from(path: &Path) -> Result<ArborConfig, ArborError> {
    if !path.exists() {
        return Ok(ArborConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ArborError::io(path, e))?;
    let config = toml::from_str::<ArborConfig>(&content).map_err(|e| ArborError::Config {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
