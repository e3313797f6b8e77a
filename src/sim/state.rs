//! Round state and core entity types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::stage::BodyHandle;

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundState {
    /// Launcher visible, waiting for a launch input
    Waiting,
    /// A ball is in play
    Bouncing,
    /// Bouncers are rising; the launcher returns shortly
    Advancing,
    /// Declared for hosts that want it; the controller never enters it
    GameOver,
}

/// A launched projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub handle: BodyHandle,
    /// Velocity at launch
    pub launch_vel: Vec2,
    pub alive: bool,
}

impl Ball {
    pub fn new(handle: BodyHandle, launch_vel: Vec2) -> Self {
        Self {
            handle,
            launch_vel,
            alive: true,
        }
    }
}

/// A static obstacle that scores when hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bouncer {
    pub handle: BodyHandle,
    /// Remaining hits before the bouncer is spent
    pub bounce_count: u32,
    pub spawn_pos: Vec2,
}

impl Bouncer {
    pub fn new(handle: BodyHandle, bounce_count: u32, spawn_pos: Vec2) -> Self {
        Self {
            handle,
            bounce_count,
            spawn_pos,
        }
    }

    /// Register a hit. Returns true once the bouncer is spent.
    pub fn hit(&mut self) -> bool {
        self.bounce_count = self.bounce_count.saturating_sub(1);
        self.bounce_count == 0
    }
}

/// Session score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Hits across the whole session, never decreases
    pub total: u64,
    /// Hits by the ball currently in play, saturating at the sound pool size
    pub from_current_ball: u32,
}

impl Score {
    /// Start counting for a freshly launched ball
    pub fn reset_ball(&mut self) {
        self.from_current_ball = 0;
    }

    /// Count one hit and return the sound index to play (`0..cap`)
    pub fn record_hit(&mut self, cap: u32) -> usize {
        self.total += 1;
        if self.from_current_ball < cap {
            self.from_current_ball += 1;
        }
        self.from_current_ball.saturating_sub(1) as usize
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}
