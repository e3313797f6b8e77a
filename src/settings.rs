//! Player settings and preferences
//!
//! Persisted separately from tuning and high scores as a small JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::persistence;

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute all hit sounds
    pub muted: bool,

    // === Session ===
    /// Let the demo player launch balls when no input arrives
    pub idle_mode: bool,
    /// Fixed run seed; a fresh one is picked per run when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            idle_mode: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Effective sound volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match persistence::read_json(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e @ ConfigError::Io { .. }) => {
                log::info!("Using default settings ({})", e);
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings as JSON
    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        persistence::write_json(path.as_ref(), self)?;
        log::info!("Settings saved");
        Ok(())
    }
}
