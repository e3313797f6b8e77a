//! Round simulation module
//!
//! Gameplay lives in the round controller, which only talks to the host
//! engine through the [`Stage`] trait. The headless [`World`] implements that
//! trait so rounds can be run without a graphical engine:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body handle)

pub mod collision;
pub mod round;
pub mod session;
pub mod stage;
pub mod state;
pub mod world;

pub use collision::{CollisionResult, bounce_velocity, circle_circle_collision, circle_edge_loop_collision};
pub use round::{RoundController, RoundSnapshot};
pub use session::{Session, TickInput, tick};
pub use stage::{BodyDesc, BodyHandle, Bounds, Deferred, EntityKind, Stage, TimingCurve};
pub use state::{Ball, Bouncer, RngState, RoundState, Score};
pub use world::{Body, Contact, SoundCue, World};
