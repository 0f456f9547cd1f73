//! Game settings and preferences
//!
//! Persisted separately from the run log: a JSON file natively, LocalStorage
//! on web.

use serde::{Deserialize, Serialize};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence all cues
    pub muted: bool,

    // === Driving ===
    /// Start runs with the demo driver steering
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            autopilot: false,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "speed_rays_settings";

    /// Clamp volumes into range; NaN falls back to the default
    pub fn sanitized(mut self) -> Self {
        let d = Self::default();
        self.master_volume = clamp_unit(self.master_volume, d.master_volume);
        self.sfx_volume = clamp_unit(self.sfx_volume, d.sfx_volume);
        self
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    ///
    /// A missing file is not an error: defaults are used.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: &std::path::Path) -> crate::Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let settings = Self::from_json(&json)?;
                log::info!("Loaded settings from {}", path.display());
                Ok(settings)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self, path: &std::path::Path) -> crate::Result<()> {
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved");
        Ok(())
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = crate::platform::local_storage();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        if let Some(storage) = crate::platform::local_storage() {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }
}

fn clamp_unit(v: f32, fallback: f32) -> f32 {
    if v.is_nan() { fallback } else { v.clamp(0.0, 1.0) }
}
