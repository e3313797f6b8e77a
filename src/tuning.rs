//! Data-driven game balance
//!
//! [`Tuning`] mirrors every gameplay constant in [`crate::consts`]. A JSON file
//! can override any subset of fields; missing keys fall back to the
//! compile-time defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};
use crate::persistence;
use crate::sim::stage::Bounds;

/// Runtime-tunable gameplay and stage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Playfield
    pub field_width: f32,
    pub field_height: f32,
    pub edge_loop_extension: f32,
    pub gravity: f32,

    // Launcher / ball
    pub launcher_top_inset: f32,
    pub launch_speed: f32,
    pub ball_radius: f32,
    pub ball_restitution: f32,

    // Bouncers
    pub bouncer_radius: f32,
    pub bouncer_restitution: f32,
    pub bouncer_bounce_count: u32,
    pub bouncer_spawn_range: f32,

    // Round flow
    pub offscreen_margin: f32,
    pub advance_rise: f32,
    pub advance_duration: f32,
    pub sound_count: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            edge_loop_extension: EDGE_LOOP_EXTENSION,
            gravity: GRAVITY,

            launcher_top_inset: LAUNCHER_TOP_INSET,
            launch_speed: LAUNCH_SPEED,
            ball_radius: BALL_RADIUS,
            ball_restitution: BALL_RESTITUTION,

            bouncer_radius: BOUNCER_RADIUS,
            bouncer_restitution: BOUNCER_RESTITUTION,
            bouncer_bounce_count: BOUNCER_BOUNCE_COUNT,
            bouncer_spawn_range: BOUNCER_SPAWN_RANGE,

            offscreen_margin: OFFSCREEN_MARGIN,
            advance_rise: ADVANCE_RISE,
            advance_duration: ADVANCE_DURATION,
            sound_count: SOUND_COUNT,
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file and validate it
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let tuning: Tuning = persistence::read_json(path.as_ref())?;
        tuning.validate()?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Load tuning, falling back to defaults (with a warning) on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning: {}", e);
                Self::default()
            }
        }
    }

    /// Reject values the round controller or stage cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        positive("field_width", self.field_width)?;
        positive("field_height", self.field_height)?;
        non_negative("edge_loop_extension", self.edge_loop_extension)?;
        positive("launch_speed", self.launch_speed)?;
        positive("ball_radius", self.ball_radius)?;
        positive("bouncer_radius", self.bouncer_radius)?;
        unit("ball_restitution", self.ball_restitution)?;
        unit("bouncer_restitution", self.bouncer_restitution)?;
        non_negative("bouncer_spawn_range", self.bouncer_spawn_range)?;
        non_negative("offscreen_margin", self.offscreen_margin)?;
        positive("advance_duration", self.advance_duration)?;
        if self.bouncer_bounce_count == 0 {
            return Err(ConfigError::UnsafeValue {
                name: "bouncer_bounce_count",
                value: 0.0,
                safe_range: "[1, ∞)",
            });
        }
        // Sound indices address a fixed pool of SOUND_COUNT clips
        if self.sound_count == 0 || self.sound_count > SOUND_COUNT {
            return Err(ConfigError::UnsafeValue {
                name: "sound_count",
                value: self.sound_count as f32,
                safe_range: "[1, 22]",
            });
        }
        Ok(())
    }

    /// Playfield rectangle, centered on the origin
    pub fn field_bounds(&self) -> Bounds {
        let half = Vec2::new(self.field_width, self.field_height) / 2.0;
        Bounds::new(-half, half)
    }
}

fn positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::UnsafeValue {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

fn non_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::UnsafeValue {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    }
}

fn unit(name: &'static str, value: f32) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::UnsafeValue {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}
