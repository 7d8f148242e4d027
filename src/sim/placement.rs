//! Rack placement
//!
//! Six boxes in a small pyramid (three on the bottom row, two above, one on
//! top) plus a catch plane underneath, all relative to the surface anchor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::session::GamePhase;
use super::state::{GameEvent, GameState};
use crate::engine::{BodyId, BodyKind, BodySpec, Pose, SceneEngine};

/// Box offsets from the anchor, bottom row first
pub const RACK_LAYOUT: [Vec3; 6] = [
    Vec3::new(0.0, -0.138, -0.3),
    Vec3::new(0.12, -0.138, -0.3),
    Vec3::new(0.24, -0.138, -0.3),
    Vec3::new(0.06, -0.038, -0.3),
    Vec3::new(0.18, -0.038, -0.3),
    Vec3::new(0.12, 0.062, -0.3),
];

/// Catch plane offset from the anchor (below and slightly in front of the rack)
pub const CATCH_PLANE_OFFSET: Vec3 = Vec3::new(0.125, -0.2, -0.28);

/// A box in the rack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetBox {
    pub index: u8,
    /// World-space position
    pub position: Vec3,
    /// None if the engine refused the body
    pub body: Option<BodyId>,
    pub destroyed: bool,
}

impl TargetBox {
    pub fn is_standing(&self) -> bool {
        !self.destroyed && self.body.is_some()
    }
}

/// Static slab that swallows missed balls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchPlane {
    pub body: BodyId,
    pub position: Vec3,
}

/// World position of a rack offset, turned with the surface
fn rack_point(anchor: &Pose, offset: Vec3) -> Vec3 {
    anchor.position + anchor.orientation * offset
}

fn spawn_rack_body(
    engine: &mut dyn SceneEngine,
    anchor: &Pose,
    kind: BodyKind,
    position: Vec3,
) -> anyhow::Result<BodyId> {
    engine.spawn_body(BodySpec::fixed(kind, position).rotated(anchor.orientation))
}

/// Insert `count` boxes and the catch plane around `anchor`.
///
/// Engine failures are logged and left for `restore_rack` to retry.
pub fn place_rack(
    engine: &mut dyn SceneEngine,
    anchor: &Pose,
    count: u32,
) -> (Vec<TargetBox>, Option<CatchPlane>) {
    let targets = RACK_LAYOUT
        .iter()
        .take(count as usize)
        .enumerate()
        .map(|(i, offset)| {
            let index = i as u8;
            let position = rack_point(anchor, *offset);
            let body = spawn_rack_body(engine, anchor, BodyKind::Target(index), position)
                .inspect_err(|e| log::warn!("box {} not placed: {:#}", index, e))
                .ok();
            TargetBox {
                index,
                position,
                body,
                destroyed: false,
            }
        })
        .collect();

    let catch_plane = spawn_catch_plane(engine, anchor)
        .inspect_err(|e| log::warn!("catch plane not placed: {:#}", e))
        .ok();

    (targets, catch_plane)
}

fn spawn_catch_plane(engine: &mut dyn SceneEngine, anchor: &Pose) -> anyhow::Result<CatchPlane> {
    let position = rack_point(anchor, CATCH_PLANE_OFFSET);
    let body = spawn_rack_body(engine, anchor, BodyKind::CatchPlane, position)?;
    Ok(CatchPlane { body, position })
}

/// Retry rack bodies the engine refused earlier in the round.
///
/// Knocked-out boxes stay down. The catch plane is only put back while it
/// would still be in the scene, i.e. before the first shot drops it.
pub fn restore_rack(state: &mut GameState, engine: &mut dyn SceneEngine) {
    let Some(anchor) = state.anchor else {
        return;
    };

    for target in state
        .targets
        .iter_mut()
        .filter(|t| t.body.is_none() && !t.destroyed)
    {
        match spawn_rack_body(engine, &anchor, BodyKind::Target(target.index), target.position) {
            Ok(body) => {
                log::info!("box {} placed on retry", target.index);
                target.body = Some(body);
            }
            Err(e) => log::debug!("box {} still not placed: {:#}", target.index, e),
        }
    }

    if state.catch_plane.is_none() && !state.catch_plane_dropped {
        match spawn_catch_plane(engine, &anchor) {
            Ok(plane) => {
                log::info!("catch plane placed on retry");
                state.catch_plane = Some(plane);
            }
            Err(e) => log::debug!("catch plane still not placed: {:#}", e),
        }
    }
}

/// The placing tap: swap the tracking indicator for the rack.
///
/// Returns false unless a surface has been found and the rack is not placed yet.
pub fn confirm_placement(state: &mut GameState, engine: &mut dyn SceneEngine) -> bool {
    if state.session.phase != GamePhase::Placing || state.anchor.is_none() {
        log::debug!("tap ignored: no surface yet");
        return false;
    }
    if let Some(tracker) = state.tracker.take() {
        engine.remove_body(tracker);
    }
    begin_round(state, engine);
    true
}

/// Place a fresh rack at the anchor and restore the counters.
///
/// Expects the scene to be clear of the previous round's bodies.
pub fn begin_round(state: &mut GameState, engine: &mut dyn SceneEngine) {
    let Some(anchor) = state.anchor else {
        log::warn!("round not started: no surface anchor");
        return;
    };

    let (targets, catch_plane) = place_rack(engine, &anchor, state.rules.targets);
    state.targets = targets;
    state.catch_plane = catch_plane;
    state.catch_plane_dropped = false;
    state.projectiles.clear();

    state.session.start_round(&state.rules);
    state.hud.show(&state.session);
    log::info!(
        "round {} started: {} shots, {} boxes",
        state.session.round,
        state.session.available_shots,
        state.session.remaining_targets
    );
    state.push_event(GameEvent::RoundStarted {
        round: state.session.round,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::HeadlessEngine;
    use glam::Quat;

    #[test]
    fn test_rack_is_pyramid() {
        // Three on the bottom row, two in the middle, one on top
        let rows = RACK_LAYOUT.iter().fold([0; 3], |mut rows, p| {
            let row = ((p.y + 0.138) / 0.1).round() as usize;
            rows[row] += 1;
            rows
        });
        assert_eq!(rows, [3, 2, 1]);

        // Every box sits above the catch plane
        assert!(RACK_LAYOUT.iter().all(|p| p.y > CATCH_PLANE_OFFSET.y));
    }

    #[test]
    fn test_rack_boxes_do_not_overlap() {
        let edge = BodyKind::Target(0).extents().x;
        for (i, a) in RACK_LAYOUT.iter().enumerate() {
            for b in &RACK_LAYOUT[i + 1..] {
                let gap = (*a - *b).abs();
                assert!(gap.x >= edge - 1e-4 || gap.y >= edge - 1e-4, "{a} overlaps {b}");
            }
        }

        // The catch plane spans the whole bottom row
        let half = BodyKind::CatchPlane.extents().x / 2.0;
        assert!(RACK_LAYOUT.iter().all(|p| (p.x - CATCH_PLANE_OFFSET.x).abs() <= half));
    }

    #[test]
    fn test_place_rack_relative_to_anchor() {
        let mut engine = HeadlessEngine::new();
        let anchor = Vec3::new(1.0, 0.5, -2.0);
        let (targets, plane) = place_rack(&mut engine, &Pose::at(anchor), 6);

        assert_eq!(targets.len(), 6);
        assert!(targets.iter().all(TargetBox::is_standing));
        for (target, offset) in targets.iter().zip(RACK_LAYOUT) {
            let body = engine.body(target.body.unwrap()).unwrap();
            assert_eq!(body.kind, BodyKind::Target(target.index));
            assert_eq!(body.position, anchor + offset);
        }

        let plane = plane.unwrap();
        assert_eq!(plane.position, anchor + CATCH_PLANE_OFFSET);
        assert_eq!(engine.count(|k| k == BodyKind::CatchPlane), 1);
    }

    #[test]
    fn test_place_rack_partial_count() {
        let mut engine = HeadlessEngine::new();
        let (targets, _) = place_rack(&mut engine, &Pose::at(Vec3::ZERO), 3);
        assert_eq!(targets.len(), 3);
        assert_eq!(engine.count(|k| matches!(k, BodyKind::Target(_))), 3);
    }

    #[test]
    fn test_place_rack_engine_failure_is_silent() {
        let mut engine = HeadlessEngine::new();
        engine.reject_spawns = true;
        let (targets, plane) = place_rack(&mut engine, &Pose::at(Vec3::ZERO), 6);
        assert_eq!(targets.len(), 6);
        assert!(targets.iter().all(|t| t.body.is_none()));
        assert!(plane.is_none());
    }

    #[test]
    fn test_rack_turns_with_surface() {
        let mut engine = HeadlessEngine::new();
        let anchor = Pose {
            position: Vec3::new(0.0, -0.5, -1.0),
            orientation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        };
        let (targets, plane) = place_rack(&mut engine, &anchor, 1);

        // Quarter turn left: the rack's -z offset now points down -x
        let first = engine.body(targets[0].body.unwrap()).unwrap();
        assert!((first.position - Vec3::new(-0.3, -0.638, -1.0)).length() < 1e-5);
        assert_eq!(first.rotation, anchor.orientation);
        assert_eq!(first.extents, Vec3::splat(0.1));

        let plane = engine.body(plane.unwrap().body).unwrap();
        assert_eq!(plane.rotation, anchor.orientation);
    }

    fn refused_round(engine: &mut HeadlessEngine) -> GameState {
        let mut state = GameState::default();
        state.anchor = Some(Pose::at(Vec3::new(0.0, -0.5, -1.0)));
        state.session.surface_found();
        engine.reject_spawns = true;
        begin_round(&mut state, engine);
        engine.reject_spawns = false;
        state
    }

    #[test]
    fn test_restore_rack_fills_refused_bodies() {
        let mut engine = HeadlessEngine::new();
        let mut state = refused_round(&mut engine);
        assert_eq!(state.standing_targets().count(), 0);
        assert!(state.catch_plane.is_none());

        restore_rack(&mut state, &mut engine);
        assert_eq!(state.standing_targets().count(), 6);
        assert_eq!(engine.count(|k| matches!(k, BodyKind::Target(_))), 6);
        let plane = state.catch_plane.unwrap();
        assert_eq!(plane.position, Vec3::new(0.0, -0.5, -1.0) + CATCH_PLANE_OFFSET);

        // Nothing left to retry
        restore_rack(&mut state, &mut engine);
        assert_eq!(engine.body_count(), 7);
    }

    #[test]
    fn test_restore_rack_keeps_dropped_plane_and_fallen_boxes() {
        let mut engine = HeadlessEngine::new();
        let mut state = refused_round(&mut engine);
        state.targets[0].destroyed = true;
        state.catch_plane_dropped = true;

        restore_rack(&mut state, &mut engine);
        assert!(state.targets[0].body.is_none());
        assert_eq!(state.standing_targets().count(), 5);
        assert!(state.catch_plane.is_none());
        assert_eq!(engine.count(|k| k == BodyKind::CatchPlane), 0);
    }

    #[test]
    fn test_confirm_needs_surface() {
        let mut engine = HeadlessEngine::new();
        let mut state = GameState::default();
        assert!(!confirm_placement(&mut state, &mut engine));
        assert_eq!(engine.body_count(), 0);
        assert_eq!(state.session.phase, GamePhase::AwaitingSurface);
    }

    #[test]
    fn test_confirm_replaces_tracker_with_rack() {
        let mut engine = HeadlessEngine::new();
        let mut state = GameState::default();
        let anchor = Vec3::new(0.0, -0.5, -1.0);
        state.anchor = Some(Pose::at(anchor));
        state.tracker = Some(
            engine
                .spawn_body(BodySpec::fixed(BodyKind::TrackingIndicator, anchor))
                .unwrap(),
        );
        state.session.surface_found();

        assert!(confirm_placement(&mut state, &mut engine));
        assert!(state.tracker.is_none());
        assert_eq!(engine.count(|k| k == BodyKind::TrackingIndicator), 0);
        assert_eq!(engine.count(|k| matches!(k, BodyKind::Target(_))), 6);
        assert_eq!(state.session.phase, GamePhase::Playing);
        assert_eq!(state.session.round, 1);
        assert!(state.hud.visible);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::RoundStarted { round: 1 }]
        );
    }
}
