//! Shot and target bookkeeping
//!
//! `GameSession` is the single owner of the round counters. Controllers call
//! its transitions; none of them keep a copy of the counts.

use serde::{Deserialize, Serialize};

use crate::settings::Rules;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No surface located yet, probing every frame
    AwaitingSurface,
    /// Surface found and tracking indicator shown, waiting for the placing tap
    Placing,
    /// Rack placed, taps fire
    Playing,
    /// Every box knocked out
    Won,
    /// Out of shots with boxes still standing
    Lost,
}

impl GamePhase {
    /// Won and Lost only leave through a reset
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }

    /// Still looking for / confirming the surface
    pub fn is_tracking(&self) -> bool {
        matches!(self, GamePhase::AwaitingSurface | GamePhase::Placing)
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// What `fire` did with the shot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    /// Counter decremented immediately
    Counted,
    /// Last shot: counted after the grace delay via `finalize_last_shot`
    Deferred,
    /// Not a shooting phase, or the last shot is already in flight
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub available_shots: u32,
    pub remaining_targets: u32,
    pub phase: GamePhase,
    /// Bumped on every round start; tags deferred actions
    pub round: u32,
    /// The last shot has been fired and is waiting out the grace delay
    last_shot_pending: bool,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            available_shots: 0,
            remaining_targets: 0,
            phase: GamePhase::AwaitingSurface,
            round: 0,
            last_shot_pending: false,
        }
    }

    pub fn last_shot_pending(&self) -> bool {
        self.last_shot_pending
    }

    /// First successful surface probe. Returns true on the transition.
    pub fn surface_found(&mut self) -> bool {
        if self.phase != GamePhase::AwaitingSurface {
            return false;
        }
        self.phase = GamePhase::Placing;
        true
    }

    /// Restore the counters and enter Playing.
    ///
    /// Used for both the placing tap and every reset. Any deferred action
    /// tagged with an older round becomes stale.
    pub fn start_round(&mut self, rules: &Rules) {
        self.available_shots = rules.shots;
        self.remaining_targets = rules.targets;
        self.round = self.round.wrapping_add(1);
        self.last_shot_pending = false;
        self.phase = GamePhase::Playing;
    }

    /// Whether a tap right now would spend a shot
    pub fn can_fire(&self) -> bool {
        self.phase == GamePhase::Playing && !self.last_shot_pending && self.available_shots > 0
    }

    /// A projectile left the camera
    pub fn fire(&mut self) -> ShotOutcome {
        if !self.can_fire() {
            return ShotOutcome::Rejected;
        }

        if self.available_shots == 1 {
            self.last_shot_pending = true;
            return ShotOutcome::Deferred;
        }

        self.available_shots -= 1;
        ShotOutcome::Counted
    }

    /// Grace delay for the last shot elapsed.
    ///
    /// `round` is the token captured when the shot was fired; a stale token,
    /// a finished round or a missing pending shot makes this a no-op.
    pub fn finalize_last_shot(&mut self, round: u32) -> Option<Outcome> {
        if round != self.round || self.phase != GamePhase::Playing || !self.last_shot_pending {
            return None;
        }
        self.last_shot_pending = false;
        self.available_shots = self.available_shots.saturating_sub(1);
        self.check_loss()
    }

    /// A box was knocked out
    pub fn target_destroyed(&mut self) -> Option<Outcome> {
        if self.phase != GamePhase::Playing || self.remaining_targets == 0 {
            return None;
        }
        self.remaining_targets -= 1;
        if self.remaining_targets == 0 {
            self.phase = GamePhase::Won;
            return Some(Outcome::Won);
        }
        self.check_loss()
    }

    fn check_loss(&mut self) -> Option<Outcome> {
        if self.available_shots == 0 && self.remaining_targets > 0 {
            self.phase = GamePhase::Lost;
            return Some(Outcome::Lost);
        }
        None
    }
}
