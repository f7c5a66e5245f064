//! Player settings and preferences
//!
//! Persisted as JSON: a file next to the native binary, LocalStorage on the web.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_LEVEL;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Level entered on startup
    pub start_level: usize,
    /// Open the tutorial modal when entering a level that has one
    pub show_tutorials: bool,
    /// Re-frame the view after every move
    pub auto_fit: bool,
    /// Freeze decorative animation (coin spin)
    pub reduced_motion: bool,
    /// Level catalog to use instead of the built-in one (native only)
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            start_level: DEFAULT_LEVEL,
            show_tutorials: true,
            auto_fit: true,
            reduced_motion: false,
            catalog_path: None,
        }
    }
}

impl Settings {
    /// Settings file name (native) and LocalStorage key (web)
    pub const STORAGE_KEY: &'static str = "vector_verse_settings";

    /// Parse settings, falling back to defaults for anything malformed
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Default settings file in the working directory
    #[cfg(not(target_arch = "wasm32"))]
    pub fn default_path() -> PathBuf {
        PathBuf::from(format!("{}.json", Self::STORAGE_KEY))
    }

    /// Load settings from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.display());
                Self::from_json(&json)
            }
            Err(_) => {
                log::info!("No settings at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::load_from(&Self::default_path())
    }

    /// Save settings to a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        if let Err(e) = self.save_to(&Self::default_path()) {
            log::warn!("Could not save settings: {}", e);
        }
    }
}
