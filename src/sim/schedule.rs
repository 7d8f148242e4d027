//! Delayed actions
//!
//! Fire-and-forget timers counted in simulation ticks. There is no
//! cancellation: each entry carries the round it was scheduled in and the
//! caller drops it if the round has moved on by the time it comes due.

use serde::{Deserialize, Serialize};

/// Work to run after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Deferred {
    /// Count the last shot and check for a loss
    FinalizeLastShot,
    /// Take down the congratulations banner and start a new round
    CelebrationReset,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Pending {
    due_tick: u64,
    round: u32,
    action: Deferred,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    /// Kept in scheduling order; due entries are taken in that order
    pending: Vec<Pending>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` once `delay_ticks` have passed after `now`
    pub fn schedule(&mut self, now: u64, delay_ticks: u32, round: u32, action: Deferred) {
        log::debug!("scheduling {:?} for round {} in {} ticks", action, round, delay_ticks);
        self.pending.push(Pending {
            due_tick: now + delay_ticks as u64,
            round,
            action,
        });
    }

    /// Remove and return every entry due at or before `now`, as (round, action)
    pub fn take_due(&mut self, now: u64) -> Vec<(u32, Deferred)> {
        let mut due = Vec::new();
        self.pending.retain(|p| {
            if p.due_tick <= now {
                due.push((p.round, p.action));
                false
            } else {
                true
            }
        });
        due
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
