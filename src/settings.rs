//! Game settings and rules
//!
//! Loaded from an optional JSON file; every field falls back to its default.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::engine::SceneEngine;
use crate::secs_to_ticks;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round ===
    /// Shots granted per round
    pub shots: u32,
    /// Boxes placed per round (1 to the rack layout size)
    pub targets: u32,

    // === Timing (seconds) ===
    /// Pause before the last shot counts against the player
    pub last_shot_grace: f32,
    /// How long the congratulations banner stays up before the auto-reset
    pub win_display: f32,
    /// Untouched projectiles are removed after this long
    pub projectile_lifetime: f32,

    // === Shot tuning ===
    /// Launch velocity in camera space
    pub shot_local_velocity: Vec3,
    /// Per-axis impulse scale along the negated camera forward axis
    pub shot_impulse_scale: Vec3,

    // === Quirks ===
    /// Keep the catch plane for the whole round instead of dropping it on the first shot
    pub persistent_catch_plane: bool,

    // === HUD ===
    /// Ask the host to show engine statistics (fps, draw calls)
    pub show_statistics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            targets: DEFAULT_TARGETS,

            last_shot_grace: LAST_SHOT_GRACE_SECS,
            win_display: WIN_DISPLAY_SECS,
            projectile_lifetime: PROJECTILE_LIFETIME_SECS,

            shot_local_velocity: SHOT_LOCAL_VELOCITY,
            shot_impulse_scale: SHOT_IMPULSE_SCALE,

            persistent_catch_plane: false,

            show_statistics: true,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&json)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing settings to {}", path.display()))?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Push the host-facing toggles to the engine
    pub fn apply_to(&self, engine: &mut dyn SceneEngine) {
        engine.set_statistics_visible(self.show_statistics);
    }

    /// Tick-based rules for the simulation
    pub fn rules(&self) -> Rules {
        Rules {
            shots: self.shots.max(1),
            targets: self.targets.clamp(1, crate::sim::placement::RACK_LAYOUT.len() as u32),
            grace_ticks: secs_to_ticks(self.last_shot_grace),
            win_display_ticks: secs_to_ticks(self.win_display),
            projectile_lifetime: self.projectile_lifetime,
            shot_local_velocity: self.shot_local_velocity,
            shot_impulse_scale: self.shot_impulse_scale,
            persistent_catch_plane: self.persistent_catch_plane,
        }
    }
}

/// Settings resolved for the fixed-step simulation
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    pub shots: u32,
    pub targets: u32,
    pub grace_ticks: u32,
    pub win_display_ticks: u32,
    /// Seconds, handed to the engine as the projectile removal timeout
    pub projectile_lifetime: f32,
    pub shot_local_velocity: Vec3,
    pub shot_impulse_scale: Vec3,
    pub persistent_catch_plane: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Settings::default().rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let rules = Rules::default();
        assert_eq!(rules.shots, 6);
        assert_eq!(rules.targets, 6);
        assert_eq!(rules.grace_ticks, 60);
        assert_eq!(rules.win_display_ticks, 120);
        assert_eq!(rules.projectile_lifetime, 10.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "shots": 3 }"#).unwrap();
        assert_eq!(settings.shots, 3);
        assert_eq!(settings.targets, DEFAULT_TARGETS);
        assert!(!settings.persistent_catch_plane);
    }

    #[test]
    fn test_counts_clamped() {
        let settings = Settings {
            shots: 0,
            targets: 40,
            ..Default::default()
        };
        let rules = settings.rules();
        assert_eq!(rules.shots, 1);
        assert_eq!(rules.targets, 6);
    }

    #[test]
    fn test_statistics_flag_reaches_engine() {
        let mut engine = crate::engine::HeadlessEngine::new();
        Settings::default().apply_to(&mut engine);
        assert!(engine.statistics_visible);

        let quiet = Settings {
            show_statistics: false,
            ..Default::default()
        };
        quiet.apply_to(&mut engine);
        assert!(!engine.statistics_visible);
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let settings = Settings::load("/nonexistent/ar-box-shooter.json").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join("ar-box-shooter-settings-test.json");
        let settings = Settings {
            shots: 9,
            persistent_catch_plane: true,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        let loaded = Settings::load(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_malformed_json_is_error() {
        let path = std::env::temp_dir().join("ar-box-shooter-settings-bad.json");
        fs::write(&path, "{ shots: ").unwrap();
        let result = Settings::load(&path);
        let _ = fs::remove_file(&path);
        assert!(result.is_err());
    }
}
