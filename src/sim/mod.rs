//! Deterministic game logic
//!
//! All gameplay decisions live here. This module must stay pure and deterministic:
//! - Fixed timestep only; delays are counted in ticks
//! - One logical thread; engine callbacks are delivered through `tick`
//! - No rendering or platform dependencies beyond the `SceneEngine` seam

pub mod outcome;
pub mod placement;
pub mod schedule;
pub mod session;
pub mod shot;
pub mod state;
pub mod tick;

pub use placement::{CatchPlane, RACK_LAYOUT, TargetBox, place_rack, restore_rack};
pub use schedule::{Deferred, Scheduler};
pub use session::{GamePhase, GameSession, Outcome, ShotOutcome};
pub use shot::{Launch, Projectile, launch_from_camera};
pub use state::{GameEvent, GameState};
pub use tick::{FixedStep, TickInput, tick};
