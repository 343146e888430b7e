//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/cpctree/cpctree.toml`
//! 3. Local config: `./.cpctree.toml`
//! 4. Environment variables: `CPCTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, PipelineResult};

pub const LOCAL_CONFIG_FILE: &str = ".cpctree.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory scanned for title list files
    pub data_dir: PathBuf,
    /// Directory receiving both export artifacts
    pub output_dir: PathBuf,
    /// Filename prefix of title list files
    pub file_prefix: String,
    /// Filename suffix of title list files
    pub file_suffix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/cpc_title_lists"),
            output_dir: PathBuf::from("outputs"),
            file_prefix: "cpc-section-".to_string(),
            file_suffix: ".txt".to_string(),
        }
    }
}

/// Raw settings for intermediate parsing (fields are Option to distinguish
/// "not specified" from an explicit value during layer merging).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub file_prefix: Option<String>,
    pub file_suffix: Option<String>,
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> PipelineResult<RawSettings> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| PipelineError::Config(format!("read {}: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| PipelineError::Config(format!("parse {}: {}", path.display(), e)))
}

impl Settings {
    /// Load settings with layered precedence.
    pub fn load() -> PipelineResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        let local_path = local_config_path();
        if local_path.exists() {
            current = current.merge_with(&load_raw_settings(&local_path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Merge overlay config onto self (base): overlay wins if Some.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_dir: overlay
                .data_dir
                .clone()
                .unwrap_or_else(|| self.data_dir.clone()),
            output_dir: overlay
                .output_dir
                .clone()
                .unwrap_or_else(|| self.output_dir.clone()),
            file_prefix: overlay
                .file_prefix
                .clone()
                .unwrap_or_else(|| self.file_prefix.clone()),
            file_suffix: overlay
                .file_suffix
                .clone()
                .unwrap_or_else(|| self.file_suffix.clone()),
        }
    }

    /// Apply CPCTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> PipelineResult<Self> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("CPCTREE"))
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        if let Ok(val) = config.get_string("data_dir") {
            settings.data_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("output_dir") {
            settings.output_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("file_prefix") {
            settings.file_prefix = val;
        }
        if let Ok(val) = config.get_string("file_suffix") {
            settings.file_suffix = val;
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR`, and `${VAR}` in path-like fields.
    fn expand_paths(&mut self) {
        self.data_dir = expand_path(&self.data_dir);
        self.output_dir = expand_path(&self.output_dir);
    }

    /// Render the TOML template written by `config init`.
    pub fn to_template(&self) -> PipelineResult<String> {
        let body = toml::to_string_pretty(self)?;
        Ok(format!("# cpctree configuration\n{}", body))
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

/// Global config file path, e.g. `~/.config/cpctree/cpctree.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "cpctree").map(|dirs| dirs.config_dir().join("cpctree.toml"))
}

/// Local config file path in the current directory.
pub fn local_config_path() -> PathBuf {
    PathBuf::from(LOCAL_CONFIG_FILE)
}
