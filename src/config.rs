use crate::error::{EditorError, Result};
use crate::statics;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(rename = "LastFolder", default)]
    pub last_folder: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Settings", default)]
    settings: EditorConfig,
}

impl EditorConfig {
    /// `editor_config.toml` next to the executable, or in the working directory as a fallback.
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_default()
            .join(statics::CONFIG_FILE_NAME)
    }

    /// Never fails: a missing or broken file yields the defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!("could not read settings {path:?}: {e}");
                return Self::default();
            }
        };
        match toml::from_str::<ConfigFile>(&text) {
            Ok(file) => file.settings,
            Err(e) => {
                tracing::warn!("ignoring malformed settings {path:?}: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = ConfigFile {
            settings: self.clone(),
        };
        let text = toml::to_string(&file).map_err(|e| EditorError::Config(e.to_string()))?;
        fs::write(path, text).map_err(|source| EditorError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The remembered folder, if it still exists.
    pub fn last_folder_dir(&self) -> Option<PathBuf> {
        let folder = PathBuf::from(self.last_folder.trim());
        (!self.last_folder.trim().is_empty() && folder.is_dir()).then_some(folder)
    }
}
