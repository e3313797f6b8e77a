//! Fixed timestep frame driver
//!
//! Wires input, the round controller and the headless world together in host
//! frame order: input events, per-frame update, timed actions, physics
//! contacts.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::round::{RoundController, RoundSnapshot};
use super::stage::Stage;
use super::state::RoundState;
use super::world::{SoundCue, World};
use crate::tuning::Tuning;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Press location in scene coordinates
    pub press: Option<Vec2>,
    /// Idle/demo mode - launches at a random point whenever the round waits
    pub idle_mode: bool,
}

/// A controller and the world it plays in
#[derive(Debug, Clone)]
pub struct Session {
    pub round: RoundController,
    pub world: World,
    /// Demo player RNG, separate from the controller's spawn RNG
    idle_rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl Session {
    /// Create a session and run scene setup (first wave starts advancing)
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let mut world = World::new(&tuning);
        let mut round = RoundController::new(tuning, seed);
        round.start(&mut world);
        log::info!("Session started with seed {}", seed);

        Self {
            round,
            world,
            idle_rng: Pcg32::seed_from_u64(seed.wrapping_add(0x9E37_79B9_7F4A_7C15)),
            time_ticks: 0,
        }
    }

    pub fn state(&self) -> RoundState {
        self.round.state()
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        self.round.snapshot()
    }

    /// Random target across the bottom edge of the playfield
    fn idle_target(&mut self) -> Vec2 {
        let bounds = self.world.bounds();
        let x = self.idle_rng.random_range(bounds.min.x..=bounds.max.x);
        Vec2::new(x, bounds.min.y)
    }
}

/// Advance the session by one fixed timestep; returns the sounds to play
pub fn tick(session: &mut Session, input: &TickInput, dt: f32) -> Vec<SoundCue> {
    session.time_ticks += 1;

    let mut press = input.press;
    if press.is_none() && input.idle_mode && session.round.state() == RoundState::Waiting {
        press = Some(session.idle_target());
    }
    if press.is_some() {
        session.round.on_press(&mut session.world, press);
    }

    session.round.update(&mut session.world);

    for action in session.world.run_actions(dt) {
        session.round.run_deferred(&mut session.world, action);
    }

    for contact in session.world.simulate(dt) {
        session
            .round
            .on_contact(&mut session.world, contact.a, contact.b);
    }

    session.world.drain_sounds()
}
