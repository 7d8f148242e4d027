//! Contact resolution and round outcomes
//!
//! Contacts knock out boxes and swallow missed balls. A win shows the
//! congratulations banner and resets on its own; a loss shows an alert and
//! waits for the player to dismiss it. Both end in the same full reset.

use super::placement::begin_round;
use super::schedule::Deferred;
use super::session::{GamePhase, Outcome};
use super::state::{GameEvent, GameState};
use crate::engine::{BodyId, Contact, EffectKind, SceneEngine};
use crate::ui::Overlay;

/// Resolve one contact-end event from the engine
pub fn on_contact(state: &mut GameState, engine: &mut dyn SceneEngine, contact: Contact) {
    let (ball, other) = if state.is_projectile(contact.a) {
        (contact.a, contact.b)
    } else if state.is_projectile(contact.b) {
        (contact.b, contact.a)
    } else {
        log::debug!("contact {:?} without a ball ignored", contact);
        return;
    };

    if let Some(target) = state.target_mut(other) {
        target.destroyed = true;
        let (index, position) = (target.index, target.position);

        engine.remove_body(ball);
        engine.remove_body(other);
        state.forget_projectile(ball);
        engine.spawn_effect(EffectKind::Explosion, position);

        let outcome = state.session.target_destroyed();
        state.sync_hud();
        log::debug!(
            "box {} down, {} left",
            index,
            state.session.remaining_targets
        );
        state.push_event(GameEvent::TargetDestroyed {
            index,
            remaining: state.session.remaining_targets,
        });
        if let Some(outcome) = outcome {
            present(state, engine, outcome);
        }
        return;
    }

    catch_ball(state, engine, ball, other);
}

/// A ball touched something other than a box: only the ball goes
fn catch_ball(state: &mut GameState, engine: &mut dyn SceneEngine, ball: BodyId, other: BodyId) {
    engine.remove_body(ball);
    state.forget_projectile(ball);
    if state.is_catch_plane(other) {
        log::debug!("miss caught by plane");
        state.push_event(GameEvent::Missed);
    }
}

/// Show the result of a finished round
pub fn present(state: &mut GameState, engine: &mut dyn SceneEngine, outcome: Outcome) {
    state.hud.hide();
    match outcome {
        Outcome::Won => {
            log::info!("round {} won", state.session.round);
            state.overlay = Overlay::Congratulations;
            if let Some(anchor) = state.anchor {
                engine.spawn_effect(EffectKind::Celebration, anchor.position);
            }
            state.scheduler.schedule(
                state.time_ticks,
                state.rules.win_display_ticks,
                state.session.round,
                Deferred::CelebrationReset,
            );
            state.push_event(GameEvent::Won);
        }
        Outcome::Lost => {
            log::info!("round {} lost", state.session.round);
            state.overlay = Overlay::loss();
            state.push_event(GameEvent::Lost);
        }
    }
}

/// Run a timer that came due. Stale rounds are dropped.
pub fn run_deferred(
    state: &mut GameState,
    engine: &mut dyn SceneEngine,
    round: u32,
    action: Deferred,
) {
    if round != state.session.round {
        log::debug!("{:?} from round {} dropped (now {})", action, round, state.session.round);
        return;
    }

    match action {
        Deferred::FinalizeLastShot => {
            let outcome = state.session.finalize_last_shot(round);
            state.sync_hud();
            if let Some(outcome) = outcome {
                present(state, engine, outcome);
            }
        }
        Deferred::CelebrationReset => {
            if state.session.phase == GamePhase::Won {
                reset_round(state, engine);
            }
        }
    }
}

/// The "Ok" button on the loss alert. Returns whether a reset happened.
pub fn dismiss_alert(state: &mut GameState, engine: &mut dyn SceneEngine) -> bool {
    if !state.overlay.is_modal() || state.session.phase != GamePhase::Lost {
        return false;
    }
    reset_round(state, engine);
    true
}

/// Clear the scene, restore the counters and put up a fresh rack
pub fn reset_round(state: &mut GameState, engine: &mut dyn SceneEngine) {
    engine.remove_all_bodies();
    state.tracker = None;
    state.catch_plane = None;
    state.targets.clear();
    state.projectiles.clear();
    state.overlay = Overlay::None;
    begin_round(state, engine);
}
