//! Infinite Bounce - launch a ball into a rising field of bouncers
//!
//! Core modules:
//! - `sim`: Round controller, stage capability trait, headless stage
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `highscores`: Session leaderboard
//! - `persistence`: JSON file load/save
//! - `error`: Configuration errors

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{ConfigError, ConfigResult};
pub use highscores::HighScores;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// These are the defaults behind [`Tuning`]; runtime code reads the tuning.
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions, centered on the origin
    pub const FIELD_WIDTH: f32 = 750.0;
    pub const FIELD_HEIGHT: f32 = 1334.0;
    /// The edge loop extends this far above and below the playfield
    pub const EDGE_LOOP_EXTENSION: f32 = 200.0;
    /// World gravity (units/s²)
    pub const GRAVITY: f32 = -980.0;

    /// Launcher sits this far below the top edge
    pub const LAUNCHER_TOP_INSET: f32 = 100.0;
    /// Launch speed (units/s), independent of direction
    pub const LAUNCH_SPEED: f32 = 1000.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 16.0;
    pub const BALL_RESTITUTION: f32 = 0.2;

    /// Bouncer defaults
    pub const BOUNCER_RADIUS: f32 = 32.0;
    pub const BOUNCER_RESTITUTION: f32 = 0.75;
    pub const BOUNCER_BOUNCE_COUNT: u32 = 1;
    /// Horizontal spawn offset is uniform in [-range, range]
    pub const BOUNCER_SPAWN_RANGE: f32 = 200.0;

    /// Entities below `min_y - OFFSCREEN_MARGIN` are removed
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Wave advance: bouncers rise this far over `ADVANCE_DURATION` seconds
    pub const ADVANCE_RISE: f32 = 100.0;
    pub const ADVANCE_DURATION: f32 = 0.5;

    /// Size of the hit sound pool; also the per-ball score cap
    pub const SOUND_COUNT: u32 = 22;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Velocity of fixed `speed` pointing from `from` toward `towards`
///
/// The direction is `atan2(Δy, Δx)`, so a target equal to the origin point
/// fires along +x.
#[inline]
pub fn launch_velocity(from: Vec2, towards: Vec2, speed: f32) -> Vec2 {
    let delta = towards - from;
    polar_to_cartesian(speed, delta.y.atan2(delta.x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_velocity_along_x() {
        let vel = launch_velocity(Vec2::ZERO, Vec2::new(1.0, 0.0), 1000.0);
        assert!((vel.x - 1000.0).abs() < 0.001);
        assert!(vel.y.abs() < 0.001);
    }

    #[test]
    fn test_launch_velocity_straight_down() {
        let vel = launch_velocity(Vec2::new(0.0, 567.0), Vec2::new(0.0, -100.0), 1000.0);
        assert!(vel.x.abs() < 0.01);
        assert!((vel.y + 1000.0).abs() < 0.01);
    }
}
