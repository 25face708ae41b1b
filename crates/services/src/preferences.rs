//! The one piece of state that survives restarts: the selected language.
//!
//! Stored as `preferences.json` in the platform config directory. A missing
//! or unreadable file means the default language.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shared::language::LanguageCode;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const FILE_NAME: &str = "preferences.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct Preferences {
    #[serde(default)]
    language: LanguageCode,
}

#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: Option<PathBuf>,
}

impl PreferenceStore {
    /// Store under the platform config dir (e.g. `~/.config/ecoloop`).
    pub fn open_default() -> Self {
        let path = directories::ProjectDirs::from("org", "Ecoloop", "Ecoloop")
            .map(|proj| proj.config_dir().join(FILE_NAME));
        Self { path }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load_language(&self) -> LanguageCode {
        let Some(path) = &self.path else {
            return LanguageCode::default();
        };
        match fs::read(path) {
            Ok(bytes) => match serde_json::from_slice::<Preferences>(&bytes) {
                Ok(prefs) => prefs.language,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "ignoring unreadable preferences");
                    LanguageCode::default()
                }
            },
            Err(_) => LanguageCode::default(),
        }
    }

    pub fn save_language(&self, language: LanguageCode) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let bytes = serde_json::to_vec_pretty(&Preferences { language })?;
        fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
        debug!(%language, "language preference saved");
        Ok(())
    }
}
