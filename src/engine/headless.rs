//! In-memory scene engine
//!
//! No rendering and no collision detection: callers script the surface probe,
//! the camera and the contact stream. Dynamic bodies drift along their
//! velocity and timed bodies expire on `advance`, which is enough to drive the
//! game loop in tests and the autoplay demo.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use glam::{Mat4, Quat, Vec3};

use super::{BodyId, BodyKind, BodySpec, Contact, EffectKind, Pose, SceneEngine};

/// A body as tracked by the headless engine
#[derive(Debug, Clone)]
pub struct HeadlessBody {
    pub kind: BodyKind,
    pub position: Vec3,
    pub rotation: Quat,
    pub extents: Vec3,
    pub velocity: Vec3,
    /// Seconds left before automatic removal
    pub remaining: Option<f32>,
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    /// Result returned by `detect_surface` (None = still searching)
    pub surface: Option<Pose>,
    /// Result returned by `camera_transform`
    pub camera: Option<Mat4>,
    /// Reject every spawn request (simulates a missing asset)
    pub reject_spawns: bool,
    /// Effects requested so far (cleared by `remove_all_bodies`)
    pub effects: Vec<(EffectKind, Vec3)>,
    /// Last value passed to `set_statistics_visible`
    pub statistics_visible: bool,
    bodies: BTreeMap<BodyId, HeadlessBody>,
    contacts: Vec<Contact>,
    expired: Vec<BodyId>,
    next_id: u32,
}

impl HeadlessEngine {
    /// Engine with an identity camera and no surface found yet
    pub fn new() -> Self {
        Self {
            camera: Some(Mat4::IDENTITY),
            next_id: 1,
            ..Default::default()
        }
    }

    /// Queue a contact-end event for the next `take_contacts`
    pub fn push_contact(&mut self, a: BodyId, b: BodyId) {
        self.contacts.push(Contact::new(a, b));
    }

    /// Contacts queued but not yet taken
    pub fn pending_contacts(&self) -> usize {
        self.contacts.len()
    }

    /// Step dynamic bodies and expire timed ones. Returns the expired ids,
    /// which are also queued for `take_expired`.
    pub fn advance(&mut self, dt: f32) -> Vec<BodyId> {
        let mut expired = Vec::new();
        for (id, body) in self.bodies.iter_mut() {
            if body.kind.is_dynamic() {
                body.position += body.velocity * dt;
            }
            if let Some(remaining) = body.remaining.as_mut() {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    expired.push(*id);
                }
            }
        }
        for id in &expired {
            self.bodies.remove(id);
        }
        self.expired.extend_from_slice(&expired);
        expired
    }

    pub fn body(&self, id: BodyId) -> Option<&HeadlessBody> {
        self.bodies.get(&id)
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.bodies.contains_key(&id)
    }

    pub fn count(&self, pred: impl Fn(BodyKind) -> bool) -> usize {
        self.bodies.values().filter(|b| pred(b.kind)).count()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

impl SceneEngine for HeadlessEngine {
    fn detect_surface(&mut self) -> Option<Pose> {
        self.surface
    }

    fn spawn_body(&mut self, spec: BodySpec) -> Result<BodyId> {
        if self.reject_spawns {
            bail!("scene rejected {:?} body", spec.kind);
        }
        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(
            id,
            HeadlessBody {
                kind: spec.kind,
                position: spec.position,
                rotation: spec.rotation,
                extents: spec.extents,
                velocity: spec.velocity,
                remaining: spec.timeout,
            },
        );
        Ok(id)
    }

    fn set_body_position(&mut self, id: BodyId, position: Vec3) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
        }
    }

    fn remove_body(&mut self, id: BodyId) {
        self.bodies.remove(&id);
    }

    fn remove_all_bodies(&mut self) {
        self.bodies.clear();
        self.effects.clear();
    }

    fn camera_transform(&self) -> Option<Mat4> {
        self.camera
    }

    fn spawn_effect(&mut self, kind: EffectKind, position: Vec3) {
        self.effects.push((kind, position));
    }

    fn take_contacts(&mut self) -> Vec<Contact> {
        std::mem::take(&mut self.contacts)
    }

    fn take_expired(&mut self) -> Vec<BodyId> {
        std::mem::take(&mut self.expired)
    }

    fn set_statistics_visible(&mut self, visible: bool) {
        self.statistics_visible = visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timed_bodies_expire() {
        let mut engine = HeadlessEngine::new();
        let ball = engine
            .spawn_body(BodySpec::launched(
                BodyKind::Projectile,
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
            ))
            .unwrap();
        let plane = engine
            .spawn_body(BodySpec::fixed(BodyKind::CatchPlane, Vec3::Y))
            .unwrap();

        assert!(engine.advance(0.25).is_empty());
        assert!((engine.body(ball).unwrap().position.z + 0.25).abs() < 1e-6);

        let expired = engine.advance(0.25);
        assert_eq!(expired, vec![ball]);
        assert!(!engine.contains(ball));
        assert_eq!(engine.take_expired(), vec![ball]);
        assert!(engine.take_expired().is_empty());
        // Static body neither moves nor expires
        assert_eq!(engine.body(plane).unwrap().position, Vec3::Y);
    }

    #[test]
    fn test_spawn_keeps_shape_and_rotation() {
        let mut engine = HeadlessEngine::new();
        let turn = Quat::from_rotation_y(0.5);
        let id = engine
            .spawn_body(BodySpec::fixed(BodyKind::CatchPlane, Vec3::ZERO).rotated(turn))
            .unwrap();
        let body = engine.body(id).unwrap();
        assert_eq!(body.extents, BodyKind::CatchPlane.extents());
        assert_eq!(body.rotation, turn);
    }

    #[test]
    fn test_rejected_spawn() {
        let mut engine = HeadlessEngine::new();
        engine.reject_spawns = true;
        assert!(
            engine
                .spawn_body(BodySpec::fixed(BodyKind::Target(0), Vec3::ZERO))
                .is_err()
        );
        assert_eq!(engine.body_count(), 0);
    }

    #[test]
    fn test_contacts_drain_once() {
        let mut engine = HeadlessEngine::new();
        engine.push_contact(BodyId(1), BodyId(2));
        assert_eq!(engine.take_contacts().len(), 1);
        assert!(engine.take_contacts().is_empty());
    }
}
