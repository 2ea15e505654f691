use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tally_log::DEFAULT_STORAGE_KEY;
use tally_store::FileStore;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Application settings, read from a TOML file.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TallyConfig {
    /// Key the calculation log is persisted under.
    pub storage_key: String,
    /// Directory the file store keeps its keys in.
    pub data_dir: PathBuf,
    /// Colorize terminal output when the terminal supports it. `false`
    /// disables color unconditionally.
    pub color: bool,
}

impl Default for TallyConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(".tally"),
            color: true,
        }
    }
}

impl TallyConfig {
    /// Read and parse a config file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| AppError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&text).map_err(|source| AppError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Read `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> AppResult<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Open the file store under [`data_dir`](Self::data_dir).
    pub fn open_store(&self) -> AppResult<FileStore> {
        Ok(FileStore::open(&self.data_dir)?)
    }
}
