//! Scene/physics engine seam
//!
//! Plane detection, camera tracking, rigid-body simulation and particles all
//! live on the other side of this trait. The game only asks for bodies to be
//! inserted or removed and listens for contact events.

pub mod headless;

pub use headless::HeadlessEngine;

use anyhow::Result;
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::consts::{CATCH_PLANE_SIZE, PROJECTILE_RADIUS, TARGET_EDGE, TRACKER_SIZE};

/// Handle to a body inserted into the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// What a body is, from the game's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    /// Dynamic ball fired from the camera
    Projectile,
    /// Static box in the rack (index 0..targets)
    Target(u8),
    /// Static slab under the rack that absorbs misses
    CatchPlane,
    /// Flat marker that follows the surface probe while tracking
    TrackingIndicator,
}

impl BodyKind {
    /// Dynamic bodies are driven by the physics step; everything else is static
    pub fn is_dynamic(&self) -> bool {
        matches!(self, BodyKind::Projectile)
    }

    /// Bounding box size the engine should give this body's shape
    pub fn extents(&self) -> Vec3 {
        match self {
            BodyKind::Projectile => Vec3::splat(PROJECTILE_RADIUS * 2.0),
            BodyKind::Target(_) => Vec3::splat(TARGET_EDGE),
            BodyKind::CatchPlane => CATCH_PLANE_SIZE,
            BodyKind::TrackingIndicator => Vec3::new(TRACKER_SIZE, 0.0, TRACKER_SIZE),
        }
    }
}

/// Insertion request for a body
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub kind: BodyKind,
    /// World-space position
    pub position: Vec3,
    /// World-space orientation
    pub rotation: Quat,
    /// Shape size (see `BodyKind::extents`)
    pub extents: Vec3,
    /// Initial linear velocity (ignored for static bodies)
    pub velocity: Vec3,
    /// Remove automatically after this many seconds
    pub timeout: Option<f32>,
}

impl BodySpec {
    /// A static, unrotated body that lives until removed
    pub fn fixed(kind: BodyKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            rotation: Quat::IDENTITY,
            extents: kind.extents(),
            velocity: Vec3::ZERO,
            timeout: None,
        }
    }

    /// A dynamic body launched with `velocity`, removed after `timeout` seconds
    pub fn launched(kind: BodyKind, position: Vec3, velocity: Vec3, timeout: f32) -> Self {
        Self {
            velocity,
            timeout: Some(timeout),
            ..Self::fixed(kind, position)
        }
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// A located real-world surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }
}

/// One-shot visual effects the engine renders on request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Burst where a box was knocked out
    Explosion,
    /// Confetti shown with the congratulations banner
    Celebration,
}

/// A contact-end event between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyId,
    pub b: BodyId,
}

impl Contact {
    pub fn new(a: BodyId, b: BodyId) -> Self {
        Self { a, b }
    }
}

/// Everything the game needs from the scene/physics engine.
///
/// Calls are synchronous and made from the game's single logical thread.
pub trait SceneEngine {
    /// Probe the screen centre for a horizontal surface
    fn detect_surface(&mut self) -> Option<Pose>;

    /// Insert a body into the scene
    fn spawn_body(&mut self, spec: BodySpec) -> Result<BodyId>;

    /// Move an existing body; unknown ids are ignored
    fn set_body_position(&mut self, id: BodyId, position: Vec3);

    /// Remove a body; unknown ids are ignored
    fn remove_body(&mut self, id: BodyId);

    /// Remove every body and effect from the scene
    fn remove_all_bodies(&mut self);

    /// Current camera-to-world transform, if a frame is available
    fn camera_transform(&self) -> Option<Mat4>;

    /// Fire-and-forget visual effect
    fn spawn_effect(&mut self, kind: EffectKind, position: Vec3);

    /// Drain contact-end events reported since the last call
    fn take_contacts(&mut self) -> Vec<Contact>;

    /// Drain ids of bodies the engine removed on its own (timeouts) since the last call
    fn take_expired(&mut self) -> Vec<BodyId>;

    /// Toggle the engine's statistics overlay (fps, draw calls)
    fn set_statistics_visible(&mut self, visible: bool);
}
