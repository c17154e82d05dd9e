use super::events::GameEvent;
use super::session::{GameSession, LIGHT_STEP};
use std::time::{Duration, Instant};

// A stall longer than this (suspended terminal, debugger pause) resyncs the
// cadence instead of replaying every missed tick.
const RESYNC_AFTER: Duration = Duration::from_secs(1);

/// Cooperative repeating tick driving the light cycle. Owned by the gameplay
/// screen and polled from the app loop; starting a new game replaces it
/// wholesale, which is what cancels the old timeline.
#[derive(Debug)]
pub struct LightCycle {
    next_due: Instant,
}

impl LightCycle {
    /// Arms the first tick one period after `now`.
    pub fn start(now: Instant) -> Self {
        LightCycle {
            next_due: now + LIGHT_STEP,
        }
    }

    /// Instant the next tick is due; the app loop sleeps no longer than this.
    pub fn next_due(&self) -> Instant {
        self.next_due
    }

    /// Fires every tick that has come due, each advancing the light one
    /// position and stamping the activation with the tick's due instant.
    /// Does nothing once the session has gone inactive.
    pub fn poll(&mut self, session: &mut GameSession, now: Instant, events: &mut Vec<GameEvent>) {
        if !session.active() {
            return;
        }
        if now.duration_since(self.next_due) > RESYNC_AFTER {
            self.next_due = now;
        }
        while now >= self.next_due {
            session.advance_light(self.next_due, events);
            self.next_due += LIGHT_STEP;
        }
    }
}
