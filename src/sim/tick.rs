//! Fixed timestep game tick
//!
//! One call per `SIM_DT` step, not per rendered frame: every delay is counted
//! in 60 Hz ticks. Hosts feed their frame time through `FixedStep` and run as
//! many ticks as it hands back. Surface probes, taps, contacts and timers are
//! all handled here, in that order, so every mutation happens on one thread.

use super::outcome::{dismiss_alert, on_contact, run_deferred};
use super::placement::{confirm_placement, restore_rack};
use super::session::GamePhase;
use super::shot::{expire_projectiles, fire};
use super::state::{GameEvent, GameState};
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::engine::{BodyKind, BodySpec, SceneEngine};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Screen tap: places the rack while tracking, fires while playing
    pub tap: bool,
    /// "Ok" on the loss alert
    pub dismiss: bool,
}

/// Frame-time accumulator for hosts whose frames are not 60 Hz
#[derive(Debug, Clone, Default)]
pub struct FixedStep {
    accumulator: f32,
}

impl FixedStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one rendered frame's duration; returns how many ticks to run now
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Drop leftover time (after a pause or a lost AR session)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

/// Advance the game by one fixed timestep
pub fn tick(state: &mut GameState, engine: &mut dyn SceneEngine, input: &TickInput) {
    state.time_ticks += 1;

    if state.session.phase.is_tracking() {
        probe_surface(state, engine);
    } else if state.session.phase == GamePhase::Playing {
        restore_rack(state, engine);
    }

    if input.tap {
        handle_tap(state, engine);
    }
    if input.dismiss {
        dismiss_alert(state, engine);
    }

    // Contacts before timers: a hit landing on the same frame the grace delay
    // runs out still counts
    for contact in engine.take_contacts() {
        on_contact(state, engine, contact);
    }

    for (round, action) in state.scheduler.take_due(state.time_ticks) {
        run_deferred(state, engine, round, action);
    }

    expire_projectiles(state, engine);
}

/// Two-mode input: placement while tracking, shooting once the rack is up
fn handle_tap(state: &mut GameState, engine: &mut dyn SceneEngine) {
    match state.session.phase {
        GamePhase::AwaitingSurface => log::debug!("tap ignored: still looking for a surface"),
        GamePhase::Placing => {
            confirm_placement(state, engine);
        }
        GamePhase::Playing => {
            fire(state, engine);
        }
        GamePhase::Won | GamePhase::Lost => log::debug!("tap ignored: round over"),
    }
}

/// Move (or first show) the tracking indicator where the probe hits.
///
/// A failed probe or a refused indicator just waits for the next frame.
fn probe_surface(state: &mut GameState, engine: &mut dyn SceneEngine) {
    let Some(pose) = engine.detect_surface() else {
        return;
    };

    if let Some(tracker) = state.tracker {
        engine.set_body_position(tracker, pose.position);
        state.anchor = Some(pose);
        return;
    }

    let indicator =
        BodySpec::fixed(BodyKind::TrackingIndicator, pose.position).rotated(pose.orientation);
    match engine.spawn_body(indicator) {
        Ok(tracker) => {
            state.tracker = Some(tracker);
            state.anchor = Some(pose);
            if state.session.surface_found() {
                log::info!("surface found at {:?}", pose.position);
                state.push_event(GameEvent::SurfaceFound {
                    position: pose.position,
                });
            }
        }
        Err(e) => log::warn!("tracking indicator not shown: {:#}", e),
    }
}
