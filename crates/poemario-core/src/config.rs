//! Project configuration for poemario
//!
//! Configuration is optional and lives in `poemario.toml` at the
//! project root. Defaults match the conventional repo layout: document
//! files under `textos/`, the archive at `archivo.json` in the root
//! when present, else `data/archivo.json`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PoemarioError, Result};
use crate::generator::DEFAULT_MODEL;

/// Name of the optional config file at the project root
pub const CONFIG_FILE: &str = "poemario.toml";

/// Default archive file name
pub const ARCHIVE_FILE: &str = "archivo.json";

/// Default directory holding document files
pub const TEXTS_DIR: &str = "textos";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive file path relative to the project root. When unset, the
    /// root `archivo.json` is used if it exists, else `data/archivo.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<String>,
    /// Directory holding the document files
    pub texts_dir: String,
    /// Model requested from the keyword generator
    pub model: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            archive: None,
            texts_dir: TEXTS_DIR.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Config {
    /// Load the config at a project root, falling back to defaults
    /// when no config file exists
    pub fn discover(root: &Path) -> Result<Config> {
        let path = root.join(CONFIG_FILE);
        if path.is_file() {
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PoemarioError::Other(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the archive file path for a project root
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        if let Some(archive) = &self.archive {
            return root.join(archive);
        }
        let primary = root.join(ARCHIVE_FILE);
        if primary.exists() {
            primary
        } else {
            root.join("data").join(ARCHIVE_FILE)
        }
    }
}
