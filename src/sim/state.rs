//! Game state and world bookkeeping
//!
//! Everything the controllers read or mutate lives in `GameState`. Counters
//! belong to `GameSession`; this struct adds the bodies placed in the scene,
//! pending timers and the HUD view-model.

use glam::Vec3;

use super::placement::{CatchPlane, TargetBox};
use super::schedule::Scheduler;
use super::session::GameSession;
use super::shot::Projectile;
use crate::engine::{BodyId, Pose};
use crate::settings::Rules;
use crate::ui::{Hud, Overlay};

/// Notable things that happened during a tick, for hosts and logs
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Tracking indicator shown for the first time
    SurfaceFound { position: Vec3 },
    /// Rack placed and counters restored
    RoundStarted { round: u32 },
    /// A ball left the camera; `available_shots` is the count after this shot
    ShotFired { available_shots: u32, deferred: bool },
    /// A box was knocked out
    TargetDestroyed { index: u8, remaining: u32 },
    /// A ball hit the catch plane
    Missed,
    Won,
    Lost,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rules: Rules,
    pub session: GameSession,
    /// Where the rack was anchored; reused by every reset
    pub anchor: Option<Pose>,
    /// Tracking indicator body while looking for a surface
    pub tracker: Option<BodyId>,
    /// Boxes of the current round, by index
    pub targets: Vec<TargetBox>,
    /// Balls in flight (sorted by id)
    pub projectiles: Vec<Projectile>,
    pub catch_plane: Option<CatchPlane>,
    /// The first shot of the round took the catch plane away
    pub catch_plane_dropped: bool,
    pub scheduler: Scheduler,
    pub hud: Hud,
    pub overlay: Overlay,
    /// Simulation tick counter
    pub time_ticks: u64,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            session: GameSession::new(),
            anchor: None,
            tracker: None,
            targets: Vec::new(),
            projectiles: Vec::new(),
            catch_plane: None,
            catch_plane_dropped: false,
            scheduler: Scheduler::new(),
            hud: Hud::default(),
            overlay: Overlay::None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events emitted since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Standing box for a scene body
    pub fn target_mut(&mut self, body: BodyId) -> Option<&mut TargetBox> {
        self.targets
            .iter_mut()
            .find(|t| !t.destroyed && t.body == Some(body))
    }

    pub fn is_projectile(&self, body: BodyId) -> bool {
        self.projectiles.iter().any(|p| p.body == body)
    }

    pub fn is_catch_plane(&self, body: BodyId) -> bool {
        self.catch_plane.is_some_and(|c| c.body == body)
    }

    /// Forget a projectile record; returns whether it was known
    pub fn forget_projectile(&mut self, body: BodyId) -> bool {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| p.body != body);
        self.projectiles.len() != before
    }

    pub fn standing_targets(&self) -> impl Iterator<Item = &TargetBox> {
        self.targets.iter().filter(|t| t.is_standing())
    }

    /// Keep the HUD counters in step with the session
    pub fn sync_hud(&mut self) {
        self.hud.sync(&self.session);
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}
