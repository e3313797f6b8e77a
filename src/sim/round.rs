//! Round controller
//!
//! Owns the round state machine, the score and the live balls/bouncers. It is
//! driven entirely by host callbacks (input, per-frame update, fired deferred
//! actions, contacts) and talks back to the host only through [`Stage`].
//!
//! ```text
//! start ──► Advancing ──(0.5s)──► Waiting ──launch──► Bouncing
//!               ▲                                        │
//!               └──────────── last ball gone ────────────┘
//! ```

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::stage::{BodyDesc, BodyHandle, Deferred, EntityKind, Stage, TimingCurve};
use super::state::{Ball, Bouncer, RngState, RoundState, Score};
use crate::launch_velocity;
use crate::tuning::Tuning;

/// Serializable summary of a round controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub seed: u64,
    pub state: RoundState,
    pub score: Score,
    pub wave: u32,
    pub balls_launched: u32,
    pub live_balls: usize,
    pub live_bouncers: usize,
}

/// Game state controller for one scene
#[derive(Debug, Clone)]
pub struct RoundController {
    tuning: Tuning,
    rng_state: RngState,
    rng: Pcg32,
    state: RoundState,
    score: Score,
    launcher: Option<BodyHandle>,
    /// Live balls (launch order)
    balls: Vec<Ball>,
    /// Live bouncers (spawn order)
    bouncers: Vec<Bouncer>,
    /// Number of `advance()` calls so far
    wave: u32,
    balls_launched: u32,
}

impl RoundController {
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            tuning,
            rng: rng_state.to_rng(),
            rng_state,
            state: RoundState::Waiting,
            score: Score::default(),
            launcher: None,
            balls: Vec::new(),
            bouncers: Vec::new(),
            wave: 0,
            balls_launched: 0,
        }
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn balls_launched(&self) -> u32 {
        self.balls_launched
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn bouncers(&self) -> &[Bouncer] {
        &self.bouncers
    }

    pub fn launcher(&self) -> Option<BodyHandle> {
        self.launcher
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            seed: self.rng_state.seed,
            state: self.state,
            score: self.score,
            wave: self.wave,
            balls_launched: self.balls_launched,
            live_balls: self.balls.len(),
            live_bouncers: self.bouncers.len(),
        }
    }

    /// Classify a stage body by the controller's own bookkeeping
    pub fn kind_of(&self, handle: BodyHandle) -> EntityKind {
        if self.balls.iter().any(|b| b.handle == handle) {
            EntityKind::Ball
        } else if self.bouncers.iter().any(|b| b.handle == handle) {
            EntityKind::Bouncer
        } else {
            EntityKind::Other
        }
    }

    /// Scene setup: place the launcher and bring in the first wave
    pub fn start<S: Stage>(&mut self, stage: &mut S) {
        if self.launcher.is_some() {
            return;
        }
        let bounds = stage.bounds();
        let pos = Vec2::new(bounds.mid_x(), bounds.max.y - self.tuning.launcher_top_inset);
        self.launcher = Some(stage.spawn(BodyDesc::marker(pos)));
        log::debug!("Launcher placed at ({:.1}, {:.1})", pos.x, pos.y);

        self.advance(stage);
    }

    /// Spawn a bouncer, raise the field and schedule the launcher's return
    pub fn advance<S: Stage>(&mut self, stage: &mut S) {
        self.state = RoundState::Advancing;
        self.wave += 1;
        self.spawn_bouncer(stage);

        let rise = Vec2::new(0.0, self.tuning.advance_rise);
        let duration = self.tuning.advance_duration;
        for bouncer in &self.bouncers {
            stage.move_by(bouncer.handle, rise, duration, TimingCurve::EaseInEaseOut);
        }

        stage.schedule(duration, Deferred::ResetLauncher);
        log::info!(
            "Wave {} advancing with {} bouncers (score {})",
            self.wave,
            self.bouncers.len(),
            self.score.total
        );
    }

    fn spawn_bouncer<S: Stage>(&mut self, stage: &mut S) {
        let bounds = stage.bounds();
        let range = self.tuning.bouncer_spawn_range;
        let x = bounds.mid_x() + self.rng.random_range(-range..=range);
        let pos = Vec2::new(x, bounds.min.y - self.tuning.offscreen_margin);

        let handle = stage.spawn(BodyDesc {
            kind: EntityKind::Bouncer,
            position: pos,
            radius: Some(self.tuning.bouncer_radius),
            velocity: Vec2::ZERO,
            restitution: self.tuning.bouncer_restitution,
            dynamic: false,
        });
        self.bouncers
            .push(Bouncer::new(handle, self.tuning.bouncer_bounce_count, pos));
    }

    /// Fire a ball from the launcher toward `towards`
    ///
    /// Only accepted while waiting; returns whether a ball was launched.
    pub fn launch_ball<S: Stage>(&mut self, stage: &mut S, towards: Vec2) -> bool {
        if self.state != RoundState::Waiting {
            return false;
        }
        let Some(launcher) = self.launcher else {
            return false;
        };
        let Some(from) = stage.position(launcher) else {
            return false;
        };

        self.score.reset_ball();

        let vel = launch_velocity(from, towards, self.tuning.launch_speed);
        let handle = stage.spawn(BodyDesc {
            kind: EntityKind::Ball,
            position: from,
            radius: Some(self.tuning.ball_radius),
            velocity: vel,
            restitution: self.tuning.ball_restitution,
            dynamic: true,
        });
        self.balls.push(Ball::new(handle, vel));
        self.balls_launched += 1;

        stage.set_visible(launcher, false);
        self.state = RoundState::Bouncing;
        log::debug!(
            "Ball {} launched toward ({:.1}, {:.1}) at ({:.1}, {:.1})",
            handle.0,
            towards.x,
            towards.y,
            vel.x,
            vel.y
        );
        true
    }

    /// Press input in scene coordinates; a press without a location is ignored
    pub fn on_press<S: Stage>(&mut self, stage: &mut S, location: Option<Vec2>) -> bool {
        match location {
            Some(target) => self.launch_ball(stage, target),
            None => false,
        }
    }

    /// A new contact began between two bodies, in either order
    pub fn on_contact<S: Stage>(&mut self, stage: &mut S, a: BodyHandle, b: BodyHandle) {
        match (self.kind_of(a), self.kind_of(b)) {
            (EntityKind::Ball, _) => self.collision(stage, a, b),
            (_, EntityKind::Ball) => self.collision(stage, b, a),
            _ => {}
        }
    }

    /// Score a ball's contact with `other`; anything but a live bouncer is ignored
    pub fn collision<S: Stage>(&mut self, stage: &mut S, ball: BodyHandle, other: BodyHandle) {
        let Some(idx) = self.bouncers.iter().position(|b| b.handle == other) else {
            return;
        };

        if self.bouncers[idx].hit() {
            let spent = self.bouncers.remove(idx);
            stage.despawn(spent.handle);
        }

        let sound = self.score.record_hit(self.tuning.sound_count);
        stage.play_sound(sound);
        log::debug!(
            "Ball {} hit bouncer {} (ball score {}, total {})",
            ball.0,
            other.0,
            self.score.from_current_ball,
            self.score.total
        );
    }

    /// Per-frame check while bouncing: drop off-screen bodies, advance when no ball is left
    pub fn update<S: Stage>(&mut self, stage: &mut S) {
        if self.state != RoundState::Bouncing {
            return;
        }

        let floor = stage.bounds().min.y - self.tuning.offscreen_margin;

        for ball in &mut self.balls {
            if stage.position(ball.handle).is_none_or(|p| p.y < floor) {
                stage.despawn(ball.handle);
                ball.alive = false;
            }
        }
        self.balls.retain(|b| b.alive);

        self.bouncers.retain(|b| match stage.position(b.handle) {
            Some(p) if p.y >= floor => true,
            _ => {
                stage.despawn(b.handle);
                false
            }
        });

        if self.balls.is_empty() {
            self.advance(stage);
        }
    }

    /// Run an action the stage's timer facility fired
    pub fn run_deferred<S: Stage>(&mut self, stage: &mut S, action: Deferred) {
        match action {
            Deferred::ResetLauncher => {
                if let Some(launcher) = self.launcher {
                    stage.set_visible(launcher, true);
                }
                self.state = RoundState::Waiting;
                log::debug!("Launcher reset, waiting for launch");
            }
        }
    }
}
