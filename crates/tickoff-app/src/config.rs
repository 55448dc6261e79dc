//! `config.toml` loading and the storage location it describes.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;

use crate::persistence::{DEFAULT_SLOT, FileSlots, SlotPersistence};
use crate::task_store::TaskStore;

const APP_DIR: &str = "tickoff";
const CONFIG_FILE: &str = "config.toml";

/// Store backed by a JSON file slot, as used by the CLI.
pub type FileTaskStore = TaskStore<SlotPersistence<FileSlots>>;

/// Top-level configuration loaded from `config.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Storage location settings.
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from `path`, or from the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; an explicitly
    /// requested file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_path(path),
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_path(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load configuration from a specific file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(contents)?;
        config.storage.slot = config.storage.slot.trim().to_owned();
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.storage.ensure_valid_slot()
    }
}

/// Where the task list is stored.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding slot files; defaults to the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Slot key, which is also the file stem.
    pub slot: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            slot: DEFAULT_SLOT.to_owned(),
        }
    }
}

impl StorageConfig {
    /// Directory the slot file lives in.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| anyhow!("no data directory available; set storage.data_dir"))
    }

    /// Open the task store described by this configuration.
    ///
    /// Fails when the slot is not a plain file stem. Surrounding whitespace is ignored.
    pub fn open_store(&self) -> Result<FileTaskStore> {
        self.ensure_valid_slot()?;
        let dir = self.resolve_data_dir()?;
        let persistence = SlotPersistence::with_key(FileSlots::new(dir), self.slot.trim());
        Ok(TaskStore::open(persistence))
    }

    fn ensure_valid_slot(&self) -> Result<()> {
        let slot = self.slot.trim();
        if slot.is_empty() {
            bail!("storage.slot must not be empty");
        }
        if slot.contains(['/', '\\']) || slot == "." || slot == ".." {
            bail!("storage.slot '{slot}' must be a plain name");
        }
        Ok(())
    }
}

/// Default configuration file location (`<config dir>/tickoff/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}
