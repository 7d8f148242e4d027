//! AR Box Shooter - knock a rack of boxes off a real table
//!
//! Core modules:
//! - `sim`: Deterministic game logic (session counters, placement, shots, outcomes)
//! - `engine`: Seam to the scene/physics engine (surface probes, bodies, contacts)
//! - `ui`: HUD labels and outcome overlays
//! - `settings`: Data-driven game rules
//! - `demo`: Headless autoplay driver

pub mod demo;
pub mod engine;
pub mod settings;
pub mod sim;
pub mod ui;

pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Fixed simulation timestep (60 Hz). All tick counts assume this rate,
    /// whatever the display refresh is.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum simulation steps per rendered frame
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame time fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Shots granted per round
    pub const DEFAULT_SHOTS: u32 = 6;
    /// Boxes in the rack
    pub const DEFAULT_TARGETS: u32 = 6;

    /// Pause before the last shot is counted, in seconds
    pub const LAST_SHOT_GRACE_SECS: f32 = 1.0;
    /// Congratulations banner duration before the auto-reset, in seconds
    pub const WIN_DISPLAY_SECS: f32 = 2.0;
    /// Projectiles that touch nothing are removed after this long
    pub const PROJECTILE_LIFETIME_SECS: f32 = 10.0;

    /// Ball radius (metres)
    pub const PROJECTILE_RADIUS: f32 = 0.06;
    /// Box edge length (metres)
    pub const TARGET_EDGE: f32 = 0.1;
    /// Catch plane extents (width, height, length)
    pub const CATCH_PLANE_SIZE: Vec3 = Vec3::new(0.4, 0.015, 0.3);
    /// Tracking indicator quad size
    pub const TRACKER_SIZE: f32 = 0.15;

    /// Launch velocity in the camera's local space
    pub const SHOT_LOCAL_VELOCITY: Vec3 = Vec3::new(0.0, 0.0, -0.15);
    /// Per-axis scale of the impulse along the negated camera forward axis
    pub const SHOT_IMPULSE_SCALE: Vec3 = Vec3::new(5.0, 10.0, 5.0);
}

/// Convert a duration in seconds to whole simulation ticks (rounded, at least one)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    ((secs / consts::SIM_DT).round() as u32).max(1)
}
