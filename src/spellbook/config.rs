use crate::error::{Result, SpellbookError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATABASE: &str = "spellbook.sqlite3";

pub const KEY_DATABASE: &str = "database";
pub const KEY_EXPORT_DIR: &str = "export-dir";
pub const KEYS: &[&str] = &[KEY_DATABASE, KEY_EXPORT_DIR];

/// Configuration for spellbook, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpellbookConfig {
    /// Database file; relative paths are resolved against the data directory
    #[serde(default = "default_database")]
    pub database: String,

    /// Where `export` writes when no directory is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<String>,
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

impl Default for SpellbookConfig {
    fn default() -> Self {
        Self {
            database: default_database(),
            export_dir: None,
        }
    }
}

impl SpellbookConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: SpellbookConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Value of a key as shown to the user. `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            KEY_DATABASE => Some(self.database.clone()),
            KEY_EXPORT_DIR => Some(self.export_dir.clone().unwrap_or_default()),
            _ => None,
        }
    }

    /// An empty value resets the key to its default.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            KEY_DATABASE if value.is_empty() => self.database = default_database(),
            KEY_DATABASE => self.database = value.to_string(),
            KEY_EXPORT_DIR if value.is_empty() => self.export_dir = None,
            KEY_EXPORT_DIR => self.export_dir = Some(value.to_string()),
            other => {
                return Err(SpellbookError::Api(format!(
                    "Unknown config key: {} (known keys: {})",
                    other,
                    KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }

    pub fn database_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.database)
    }

    pub fn export_path(&self, data_dir: &Path) -> Option<PathBuf> {
        self.export_dir.as_ref().map(|dir| data_dir.join(dir))
    }
}
