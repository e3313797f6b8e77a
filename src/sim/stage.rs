//! Engine capability set the round controller drives
//!
//! The controller never simulates physics, renders or plays audio itself.
//! Everything it needs from the host engine goes through [`Stage`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn mid_x(&self) -> f32 {
        (self.min.x + self.max.x) / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    /// Same rectangle grown by `dx` horizontally and `dy` vertically on each side
    pub fn expanded(&self, dx: f32, dy: f32) -> Self {
        let grow = Vec2::new(dx, dy);
        Self::new(self.min - grow, self.max + grow)
    }
}

/// Opaque id of a body living in the stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Tag carried by every body, used to classify contact participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Ball,
    Bouncer,
    Other,
}

/// Everything the stage needs to create a body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyDesc {
    pub kind: EntityKind,
    pub position: Vec2,
    /// Circle collider radius; `None` for purely visual entities
    pub radius: Option<f32>,
    pub velocity: Vec2,
    pub restitution: f32,
    /// Dynamic bodies are moved by the physics step; static ones only by actions
    pub dynamic: bool,
}

impl BodyDesc {
    /// A visual-only entity with no collider
    pub fn marker(position: Vec2) -> Self {
        Self {
            kind: EntityKind::Other,
            position,
            radius: None,
            velocity: Vec2::ZERO,
            restitution: 0.0,
            dynamic: false,
        }
    }
}

/// Timing curve for animated movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimingCurve {
    #[default]
    Linear,
    EaseInEaseOut,
}

impl TimingCurve {
    /// Map linear progress `t` in [0, 1] to eased progress in [0, 1]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            TimingCurve::Linear => t,
            TimingCurve::EaseInEaseOut => t * t * (3.0 - 2.0 * t),
        }
    }
}

/// Actions the controller defers through the stage's timer facility
///
/// The stage hands fired actions back to the host, which routes them to
/// [`crate::sim::RoundController::run_deferred`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Show the launcher and accept the next launch
    ResetLauncher,
}

/// Host engine capabilities used by the round controller
pub trait Stage {
    /// Playfield rectangle
    fn bounds(&self) -> Bounds;

    /// Current position of a body, `None` once it is gone
    fn position(&self, handle: BodyHandle) -> Option<Vec2>;

    fn spawn(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Remove a body; unknown handles are ignored
    fn despawn(&mut self, handle: BodyHandle);

    /// Show or hide a body (hidden bodies keep their place but are inert)
    fn set_visible(&mut self, handle: BodyHandle, visible: bool);

    /// Move a body by `offset` over `duration` seconds
    fn move_by(&mut self, handle: BodyHandle, offset: Vec2, duration: f32, curve: TimingCurve);

    /// Fire `action` once after `delay` seconds
    fn schedule(&mut self, delay: f32, action: Deferred);

    /// Fire-and-forget sound effect from the hit pool
    fn play_sound(&mut self, index: usize);
}
