//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pathtree/pathtree.toml`
//! 3. Local config: a file named by the caller (`--config`)
//! 4. Environment variables: `PATHTREE_*` prefix
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;
use crate::domain::{
    CyclePolicy, FieldNames, SiblingOrder, DEFAULT_MIN_PATTERN_LEN, DEFAULT_SEPARATOR,
};

/// Unified configuration for pathtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Separator between path label segments (default: " > ")
    pub separator: String,
    /// Search patterns shorter than this match everything (default: 3)
    pub search_min_len: usize,
    /// Sibling order of the built forest
    pub sibling_order: SiblingOrder,
    /// Handling of parent links that would close a cycle
    pub cycle_policy: CyclePolicy,
    /// JSON field names for id, parent reference and title
    pub fields: FieldNames,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.into(),
            search_min_len: DEFAULT_MIN_PATTERN_LEN,
            sibling_order: SiblingOrder::default(),
            cycle_policy: CyclePolicy::default(),
            fields: FieldNames::default(),
        }
    }
}

/// Raw field names for intermediate parsing (`None` → inherit from base).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawFieldNames {
    pub id: Option<String>,
    pub parent: Option<String>,
    pub title: Option<String>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub fields: RawFieldNames,
    pub separator: Option<String>,
    pub search_min_len: Option<usize>,
    pub sibling_order: Option<SiblingOrder>,
    pub cycle_policy: Option<CyclePolicy>,
}

/// Get the XDG config directory for pathtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pathtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pathtree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            fields: FieldNames {
                id: overlay
                    .fields
                    .id
                    .clone()
                    .unwrap_or_else(|| self.fields.id.clone()),
                parent: overlay
                    .fields
                    .parent
                    .clone()
                    .unwrap_or_else(|| self.fields.parent.clone()),
                title: overlay
                    .fields
                    .title
                    .clone()
                    .unwrap_or_else(|| self.fields.title.clone()),
            },
            separator: overlay
                .separator
                .clone()
                .unwrap_or_else(|| self.separator.clone()),
            search_min_len: overlay.search_min_len.unwrap_or(self.search_min_len),
            sibling_order: overlay.sibling_order.unwrap_or(self.sibling_order),
            cycle_policy: overlay.cycle_policy.unwrap_or(self.cycle_policy),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_config` - Optional config file given explicitly by the caller;
    ///   it is an error if it does not exist
    pub fn load(local_config: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_layers(global_config_path().as_deref(), local_config)
    }

    /// Load settings from explicit layer files.
    ///
    /// A missing global file is skipped; a missing local file is an error.
    pub fn load_layers(
        global_config: Option<&Path>,
        local_config: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(local_path) = local_config {
            if !local_path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", local_path.display()),
                });
            }
            debug!("local config: {}", local_path.display());
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        Self::apply_env_overrides(current)
    }

    /// Apply PATHTREE_* environment variables as explicit overrides.
    ///
    /// Nested keys use `__`, e.g. `PATHTREE_FIELDS__PARENT=parentId`.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PATHTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("fields.id") {
            settings.fields.id = val;
        }
        if let Ok(val) = config.get_string("fields.parent") {
            settings.fields.parent = val;
        }
        if let Ok(val) = config.get_string("fields.title") {
            settings.fields.title = val;
        }
        if let Ok(val) = config.get_string("separator") {
            settings.separator = val;
        }
        if let Ok(val) = config.get_string("search_min_len") {
            settings.search_min_len = val.parse().map_err(|_| ApplicationError::Config {
                message: format!("PATHTREE_SEARCH_MIN_LEN: not a number: {}", val),
            })?;
        }
        if let Ok(val) = config.get_string("sibling_order") {
            settings.sibling_order = match val.as_str() {
                "input" => SiblingOrder::Input,
                "title" => SiblingOrder::Title,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("PATHTREE_SIBLING_ORDER: expected input|title, got {}", other),
                    })
                }
            };
        }
        if let Ok(val) = config.get_string("cycle_policy") {
            settings.cycle_policy = match val.as_str() {
                "demote" => CyclePolicy::Demote,
                "reject" => CyclePolicy::Reject,
                other => {
                    return Err(ApplicationError::Config {
                        message: format!("PATHTREE_CYCLE_POLICY: expected demote|reject, got {}", other),
                    })
                }
            };
        }

        Ok(settings)
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
