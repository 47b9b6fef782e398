use crate::domain::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

/// The one piece of state that survives a restart: the display theme.
pub struct PreferencesService {
    path: PathBuf,
    current: Mutex<Preferences>,
}

impl PreferencesService {
    /// Loads preferences from `path`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn new(path: PathBuf) -> Self {
        let current = match load_preferences_from_path(&path) {
            Ok(preferences) => preferences,
            Err(err) => {
                warn!(
                    error = %err,
                    path = %path.display(),
                    "Failed to load preferences, using defaults"
                );
                Preferences::default()
            }
        };
        Self {
            path,
            current: Mutex::new(current),
        }
    }

    pub fn get(&self) -> Preferences {
        self.current
            .lock()
            .map(|current| current.clone())
            .unwrap_or_default()
    }

    pub fn dark_mode(&self) -> bool {
        self.get().dark_mode
    }

    /// Flips the theme and persists it. Returns the new value.
    pub fn toggle_dark_mode(&self) -> Result<bool> {
        let updated = {
            let mut current = self
                .current
                .lock()
                .map_err(|_| AppError::Internal("Preferences lock poisoned".to_string()))?;
            current.dark_mode = !current.dark_mode;
            current.clone()
        };
        save_preferences(&self.path, &updated)?;
        info!(dark_mode = updated.dark_mode, "Theme preference saved");
        Ok(updated.dark_mode)
    }
}

pub fn load_preferences_from_path(path: &Path) -> Result<Preferences> {
    if !path.exists() {
        return Ok(Preferences::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::IoError(format!("Failed to read preferences: {}", err)))?;
    serde_json::from_str(&raw)
        .map_err(|err| AppError::ParseError(format!("Failed to parse preferences: {}", err)))
}

pub fn save_preferences(path: &Path, preferences: &Preferences) -> Result<()> {
    let serialized = serde_json::to_string_pretty(preferences)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serialized)
        .map_err(|err| AppError::IoError(format!("Failed to save preferences: {}", err)))
}
