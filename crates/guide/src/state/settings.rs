//! User preferences that outlive a guide session

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use shared::Language;

/// Preferences kept across `reset_app` and, in the console runner, across runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub language: Language,
    #[serde(default)]
    pub voice_mode: bool,
}

impl Preferences {
    /// Location of the preferences file in the platform config dir
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "sarmobi", "assembly-guide")
            .map(|dirs| dirs.config_dir().join("preferences.json"))
    }

    /// Load preferences from the platform config dir, or return defaults if not found
    pub fn load() -> Self {
        Self::default_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!("Ignoring unreadable preferences at {}: {e}", path.display());
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save preferences to the platform config dir
    pub fn save(&self) {
        if let Some(path) = Self::default_path() {
            if let Err(e) = self.save_to(&path) {
                tracing::warn!("Failed to save preferences to {}: {e}", path.display());
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }
}
