//! HUD and outcome overlays
//!
//! Pure view-model: the host reads these and draws whatever widgets it has.

use crate::sim::GameSession;

/// Title of the loss alert
pub const LOSS_TITLE: &str = "Oops!!!";
/// Body of the loss alert
pub const LOSS_MESSAGE: &str = "You lose the game.";
/// Label on the loss alert's only button
pub const LOSS_ACTION: &str = "Ok";

/// Shot and box counters shown over the camera feed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hud {
    pub visible: bool,
    pub available_shots: u32,
    pub remaining_targets: u32,
}

impl Hud {
    /// Copy counters from the session
    pub fn sync(&mut self, session: &GameSession) {
        self.available_shots = session.available_shots;
        self.remaining_targets = session.remaining_targets;
    }

    pub fn show(&mut self, session: &GameSession) {
        self.sync(session);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn available_label(&self) -> String {
        if self.visible {
            format!("Available Shots: {}", self.available_shots)
        } else {
            String::new()
        }
    }

    pub fn remaining_label(&self) -> String {
        if self.visible {
            format!("Remaining Boxes: {}", self.remaining_targets)
        } else {
            String::new()
        }
    }
}

/// Modal content drawn on top of the scene
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    None,
    /// Win banner; goes away on its own when the round resets
    Congratulations,
    /// Loss alert; stays until the player dismisses it
    Alert {
        title: &'static str,
        message: &'static str,
        /// Button that dismisses the alert
        action: &'static str,
    },
}

impl Overlay {
    pub fn loss() -> Self {
        Overlay::Alert {
            title: LOSS_TITLE,
            message: LOSS_MESSAGE,
            action: LOSS_ACTION,
        }
    }

    /// Whether input must go to the overlay instead of the scene
    pub fn is_modal(&self) -> bool {
        matches!(self, Overlay::Alert { .. })
    }
}
