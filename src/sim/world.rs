//! Headless stage
//!
//! A small [`Stage`] implementation: circle bodies, one edge loop, gravity,
//! movement tweens, deferred actions and begin-contact detection. Enough to
//! run the round controller without a graphical engine.
//!
//! All iteration is in handle order, so a run is reproducible from its seed.

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_velocity, circle_circle_collision, circle_edge_loop_collision};
use super::stage::{BodyDesc, BodyHandle, Bounds, Deferred, EntityKind, Stage, TimingCurve};
use crate::tuning::Tuning;

/// Timers closer than this to zero count as expired
const TIMER_EPSILON: f32 = 1e-4;

/// A body living in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub handle: BodyHandle,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: Option<f32>,
    pub restitution: f32,
    pub dynamic: bool,
    pub visible: bool,
}

impl Body {
    /// Hidden bodies and bodies without a collider never collide
    fn collides(&self) -> bool {
        self.visible && self.radius.is_some()
    }
}

/// A relative move in progress
#[derive(Debug, Clone)]
struct Tween {
    handle: BodyHandle,
    offset: Vec2,
    duration: f32,
    elapsed: f32,
    curve: TimingCurve,
    /// Eased progress already applied to the body
    applied: f32,
}

#[derive(Debug, Clone)]
struct Timer {
    remaining: f32,
    action: Deferred,
}

/// A contact that began during a physics step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyHandle,
    pub b: BodyHandle,
}

/// A sound the world was asked to play
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub index: usize,
    pub volume: f32,
}

/// Headless physics stage
#[derive(Debug, Clone)]
pub struct World {
    bounds: Bounds,
    /// Edge loop the dynamic bodies bounce inside
    edges: Bounds,
    gravity: Vec2,
    /// Sorted by handle
    bodies: Vec<Body>,
    tweens: Vec<Tween>,
    /// Schedule order
    timers: Vec<Timer>,
    /// Pairs overlapping at the end of the last step, (lower, higher) handle
    touching: BTreeSet<(BodyHandle, BodyHandle)>,
    sounds: Vec<SoundCue>,
    volume: f32,
    next_id: u32,
}

impl World {
    pub fn new(tuning: &Tuning) -> Self {
        let bounds = tuning.field_bounds();
        Self {
            bounds,
            edges: bounds.expanded(0.0, tuning.edge_loop_extension),
            gravity: Vec2::new(0.0, tuning.gravity),
            bodies: Vec::new(),
            tweens: Vec::new(),
            timers: Vec::new(),
            touching: BTreeSet::new(),
            sounds: Vec::new(),
            volume: 1.0,
            next_id: 1,
        }
    }

    /// Volume attached to subsequent sound cues; 0 silences them entirely
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).map(|i| &self.bodies[i])
    }

    /// Teleport a body (host-side correction or scripted scenarios)
    pub fn set_position(&mut self, handle: BodyHandle, pos: Vec2) {
        if let Some(i) = self.index_of(handle) {
            self.bodies[i].pos = pos;
        }
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, vel: Vec2) {
        if let Some(i) = self.index_of(handle) {
            self.bodies[i].vel = vel;
        }
    }

    /// Deferred actions not yet fired
    pub fn pending_actions(&self) -> usize {
        self.timers.len()
    }

    /// Take every sound cue recorded since the last drain
    pub fn drain_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    fn index_of(&self, handle: BodyHandle) -> Option<usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.handle).ok()
    }

    /// Advance tweens and timers by `dt`; returns the actions that fired, in schedule order
    pub fn run_actions(&mut self, dt: f32) -> Vec<Deferred> {
        let mut tweens = std::mem::take(&mut self.tweens);
        tweens.retain_mut(|tween| {
            let Some(i) = self.index_of(tween.handle) else {
                return false;
            };
            tween.elapsed += dt;
            let progress = tween.curve.apply(tween.elapsed / tween.duration);
            self.bodies[i].pos += tween.offset * (progress - tween.applied);
            tween.applied = progress;
            progress < 1.0
        });
        self.tweens = tweens;

        let mut fired = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= TIMER_EPSILON {
                fired.push(timer.action);
                false
            } else {
                true
            }
        });
        fired
    }

    /// Integrate dynamic bodies by `dt` and resolve their contacts
    ///
    /// Returns the contacts that began this step; a pair that stays in
    /// contact is reported once.
    pub fn simulate(&mut self, dt: f32) -> Vec<Contact> {
        let statics: Vec<(BodyHandle, Vec2, f32, f32)> = self
            .bodies
            .iter()
            .filter(|b| !b.dynamic && b.collides())
            .filter_map(|b| b.radius.map(|r| (b.handle, b.pos, r, b.restitution)))
            .collect();

        let mut now_touching = BTreeSet::new();
        for body in self.bodies.iter_mut().filter(|b| b.dynamic && b.collides()) {
            let Some(radius) = body.radius else {
                continue;
            };

            body.vel += self.gravity * dt;
            body.pos += body.vel * dt;

            let wall = circle_edge_loop_collision(body.pos, radius, &self.edges);
            if wall.hit {
                body.pos += wall.normal * wall.penetration;
                body.vel = bounce_velocity(body.vel, wall.normal, body.restitution);
            }

            for &(other, other_pos, other_radius, other_restitution) in &statics {
                let hit = circle_circle_collision(body.pos, radius, other_pos, other_radius);
                if !hit.hit {
                    continue;
                }
                body.pos += hit.normal * hit.penetration;
                let restitution = body.restitution.max(other_restitution);
                body.vel = bounce_velocity(body.vel, hit.normal, restitution);
                now_touching.insert(ordered_pair(body.handle, other));
            }
        }

        let began = now_touching
            .difference(&self.touching)
            .map(|&(a, b)| Contact { a, b })
            .collect();
        self.touching = now_touching;
        began
    }
}

fn ordered_pair(a: BodyHandle, b: BodyHandle) -> (BodyHandle, BodyHandle) {
    if a <= b { (a, b) } else { (b, a) }
}

impl Stage for World {
    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn position(&self, handle: BodyHandle) -> Option<Vec2> {
        self.body(handle).map(|b| b.pos)
    }

    fn spawn(&mut self, desc: BodyDesc) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        // Handles only grow, so pushing keeps the list sorted
        self.bodies.push(Body {
            handle,
            kind: desc.kind,
            pos: desc.position,
            vel: desc.velocity,
            radius: desc.radius,
            restitution: desc.restitution,
            dynamic: desc.dynamic,
            visible: true,
        });
        handle
    }

    fn despawn(&mut self, handle: BodyHandle) {
        if let Some(i) = self.index_of(handle) {
            self.bodies.remove(i);
        }
        self.tweens.retain(|t| t.handle != handle);
        self.touching.retain(|&(a, b)| a != handle && b != handle);
    }

    fn set_visible(&mut self, handle: BodyHandle, visible: bool) {
        if let Some(i) = self.index_of(handle) {
            self.bodies[i].visible = visible;
        }
    }

    fn move_by(&mut self, handle: BodyHandle, offset: Vec2, duration: f32, curve: TimingCurve) {
        if duration <= 0.0 {
            if let Some(i) = self.index_of(handle) {
                self.bodies[i].pos += offset;
            }
            return;
        }
        self.tweens.push(Tween {
            handle,
            offset,
            duration,
            elapsed: 0.0,
            curve,
            applied: 0.0,
        });
    }

    fn schedule(&mut self, delay: f32, action: Deferred) {
        self.timers.push(Timer {
            remaining: delay,
            action,
        });
    }

    fn play_sound(&mut self, index: usize) {
        if self.volume <= 0.0 {
            return;
        }
        self.sounds.push(SoundCue {
            index,
            volume: self.volume,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn bouncer_desc(position: Vec2) -> BodyDesc {
        BodyDesc {
            kind: EntityKind::Bouncer,
            position,
            radius: Some(32.0),
            velocity: Vec2::ZERO,
            restitution: 0.75,
            dynamic: false,
        }
    }

    fn ball_desc(position: Vec2, velocity: Vec2) -> BodyDesc {
        BodyDesc {
            kind: EntityKind::Ball,
            position,
            radius: Some(16.0),
            velocity,
            restitution: 0.2,
            dynamic: true,
        }
    }

    #[test]
    fn test_world_bounds_from_tuning() {
        let world = World::new(&Tuning::default());
        assert_eq!(world.bounds().min, Vec2::new(-375.0, -667.0));
        assert_eq!(world.edges.min.y, -867.0);
        assert_eq!(world.edges.max.y, 867.0);
    }

    #[test]
    fn test_ball_falls_under_gravity() {
        let mut world = World::new(&Tuning::default());
        let ball = world.spawn(ball_desc(Vec2::ZERO, Vec2::ZERO));
        for _ in 0..60 {
            world.simulate(SIM_DT);
        }
        let pos = world.position(ball).unwrap();
        assert!(pos.y < -100.0);
        assert_eq!(pos.x, 0.0);
    }

    #[test]
    fn test_static_bodies_do_not_fall() {
        let mut world = World::new(&Tuning::default());
        let bouncer = world.spawn(bouncer_desc(Vec2::new(10.0, 20.0)));
        for _ in 0..60 {
            world.simulate(SIM_DT);
        }
        assert_eq!(world.position(bouncer), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn test_contact_reported_once() {
        let mut world = World::new(&Tuning::default());
        let bouncer = world.spawn(bouncer_desc(Vec2::new(0.0, -100.0)));
        let ball = world.spawn(ball_desc(Vec2::new(0.0, -40.0), Vec2::new(0.0, -300.0)));

        let mut contacts = Vec::new();
        for _ in 0..30 {
            contacts.extend(world.simulate(SIM_DT));
        }
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0], Contact { a: bouncer, b: ball });
        // Bounced back up, clear of the bouncer
        assert!(world.position(ball).unwrap().y > -52.0);
    }

    #[test]
    fn test_hidden_bodies_do_not_collide() {
        let mut world = World::new(&Tuning::default());
        let bouncer = world.spawn(bouncer_desc(Vec2::new(0.0, -100.0)));
        world.set_visible(bouncer, false);
        world.spawn(ball_desc(Vec2::new(0.0, -40.0), Vec2::new(0.0, -300.0)));

        let mut contacts = Vec::new();
        for _ in 0..30 {
            contacts.extend(world.simulate(SIM_DT));
        }
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_side_wall_reflects() {
        let mut world = World::new(&Tuning::default());
        let ball = world.spawn(ball_desc(Vec2::new(360.0, 0.0), Vec2::new(1000.0, 0.0)));
        world.simulate(SIM_DT);
        let body = world.body(ball).unwrap();
        assert!(body.vel.x < 0.0);
        assert!(body.pos.x <= 375.0 - 16.0 + 0.001);
    }

    #[test]
    fn test_move_by_eases_to_offset() {
        let mut world = World::new(&Tuning::default());
        let bouncer = world.spawn(bouncer_desc(Vec2::new(0.0, -717.0)));
        world.move_by(bouncer, Vec2::new(0.0, 100.0), 0.5, TimingCurve::EaseInEaseOut);

        world.run_actions(0.25);
        let halfway = world.position(bouncer).unwrap().y;
        assert!((halfway - (-667.0)).abs() < 0.01);

        for _ in 0..60 {
            world.run_actions(SIM_DT);
        }
        let end = world.position(bouncer).unwrap().y;
        assert!((end - (-617.0)).abs() < 0.01);
        assert!(world.tweens.is_empty());
    }

    #[test]
    fn test_deferred_fires_once_after_delay() {
        let mut world = World::new(&Tuning::default());
        world.schedule(0.5, Deferred::ResetLauncher);

        let mut fired = Vec::new();
        for step in 1..=120 {
            let now = world.run_actions(SIM_DT);
            if !now.is_empty() {
                fired.push((step, now));
            }
        }
        assert_eq!(fired, vec![(60, vec![Deferred::ResetLauncher])]);
        assert_eq!(world.pending_actions(), 0);
    }

    #[test]
    fn test_despawn_drops_tweens() {
        let mut world = World::new(&Tuning::default());
        let bouncer = world.spawn(bouncer_desc(Vec2::ZERO));
        world.move_by(bouncer, Vec2::new(0.0, 100.0), 0.5, TimingCurve::Linear);
        world.despawn(bouncer);
        assert!(world.tweens.is_empty());
        assert_eq!(world.position(bouncer), None);
        // Unknown handles are ignored
        world.despawn(bouncer);
    }

    #[test]
    fn test_muted_world_records_no_sounds() {
        let mut world = World::new(&Tuning::default());
        world.play_sound(3);
        world.set_volume(0.0);
        world.play_sound(4);
        assert_eq!(
            world.drain_sounds(),
            vec![SoundCue {
                index: 3,
                volume: 1.0
            }]
        );
        assert!(world.drain_sounds().is_empty());
    }
}
