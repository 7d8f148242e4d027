//! Firing balls from the camera

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::schedule::Deferred;
use super::session::ShotOutcome;
use super::state::{GameEvent, GameState};
use crate::engine::{BodyId, BodyKind, BodySpec, SceneEngine};
use crate::settings::Rules;

/// A ball in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub body: BodyId,
    pub spawned_tick: u64,
}

/// Spawn point and initial velocity of a ball
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub position: Vec3,
    pub velocity: Vec3,
}

/// Launch from the camera: a per-axis scaled unit-mass impulse along the
/// negated camera z axis (the direction the camera looks), on top of the
/// base velocity.
///
/// The base velocity is applied as-is, not rotated by the camera; only the
/// impulse follows where the camera points.
pub fn launch_from_camera(camera: &Mat4, rules: &Rules) -> Launch {
    let position = camera.w_axis.truncate();
    let forward = -camera.z_axis.truncate();
    let velocity = rules.shot_local_velocity + forward * rules.shot_impulse_scale;
    Launch { position, velocity }
}

/// Handle a firing tap in the Playing phase.
///
/// Does nothing (and spends nothing) when the session cannot fire or the
/// engine has no camera frame yet.
pub fn fire(state: &mut GameState, engine: &mut dyn SceneEngine) -> ShotOutcome {
    if !state.session.can_fire() {
        log::debug!(
            "tap ignored: phase {:?}, last shot pending {}",
            state.session.phase,
            state.session.last_shot_pending()
        );
        return ShotOutcome::Rejected;
    }

    let Some(camera) = engine.camera_transform() else {
        log::debug!("tap ignored: no camera frame");
        return ShotOutcome::Rejected;
    };

    let launch = launch_from_camera(&camera, &state.rules);
    let spec = BodySpec::launched(
        BodyKind::Projectile,
        launch.position,
        launch.velocity,
        state.rules.projectile_lifetime,
    );
    match engine.spawn_body(spec) {
        Ok(body) => {
            let id = state.next_entity_id();
            state.projectiles.push(Projectile {
                id,
                body,
                spawned_tick: state.time_ticks,
            });
        }
        Err(e) => log::warn!("ball not spawned: {:#}", e),
    }

    let outcome = state.session.fire();
    if outcome == ShotOutcome::Deferred {
        state.scheduler.schedule(
            state.time_ticks,
            state.rules.grace_ticks,
            state.session.round,
            Deferred::FinalizeLastShot,
        );
    }

    // Known quirk: the catch plane only survives until the first shot, so
    // later misses fall through to the projectile timeout.
    if !state.rules.persistent_catch_plane {
        state.catch_plane_dropped = true;
        if let Some(plane) = state.catch_plane.take() {
            engine.remove_body(plane.body);
        }
    }

    state.sync_hud();
    log::debug!(
        "shot fired ({:?}), {} left",
        outcome,
        state.session.available_shots
    );
    state.push_event(GameEvent::ShotFired {
        available_shots: state.session.available_shots,
        deferred: outcome == ShotOutcome::Deferred,
    });
    outcome
}

/// Drop records of balls the engine has timed out.
///
/// The engine owns the lifetime; a record stays until the engine says the
/// body is gone, so a late hit is never lost to a clock mismatch.
pub fn expire_projectiles(state: &mut GameState, engine: &mut dyn SceneEngine) {
    for body in engine.take_expired() {
        if state.forget_projectile(body) {
            log::debug!("ball {:?} timed out", body);
        }
    }
}
