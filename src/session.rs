//! Tick scheduler context
//!
//! A `Session` owns the match and everything that arrives between frames:
//! held keys and admin directives are buffered and handed to the next tick.
//! After `teardown` it refuses to advance, so a late animation frame cannot
//! touch a match that has been left.

use std::collections::VecDeque;

use crate::config::MatchConfig;
use crate::sim::directive::{self, Directive};
use crate::sim::physics::Controls;
use crate::sim::snapshot::Snapshot;
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{MAX_HUMANS, TickInput, tick};

/// One running match plus its pending input
pub struct Session {
    state: GameState,
    pending: VecDeque<Directive>,
    controls: [Controls; MAX_HUMANS],
    active: bool,
}

impl Session {
    pub fn new(config: MatchConfig, seed: u64, now_ms: f64) -> Self {
        log::info!(
            "Session starting: {} humans, {} bots, test mode {}, seed {seed}",
            config.human_count.get(),
            config.human_count.bots(),
            config.is_test_mode
        );
        Self {
            state: GameState::new(seed, config, now_ms),
            pending: VecDeque::new(),
            controls: [Controls::default(); MAX_HUMANS],
            active: true,
        }
    }

    /// Queue free text from the admin box or speech input
    ///
    /// Returns false (and queues nothing) if the text isn't a directive.
    pub fn submit_text(&mut self, text: &str) -> bool {
        match directive::parse(text) {
            Some(d) => {
                self.submit(d);
                true
            }
            None => {
                log::debug!("Ignoring unrecognized directive {text:?}");
                false
            }
        }
    }

    pub fn submit(&mut self, directive: Directive) {
        if self.active {
            self.pending.push_back(directive);
        }
    }

    /// Replace the held keys for a human slot (0-based); unknown slots are ignored
    pub fn set_controls(&mut self, slot: usize, controls: Controls) {
        if let Some(held) = self.controls.get_mut(slot) {
            *held = controls;
        }
    }

    /// Let go of every held key (focus lost, no keyup will arrive)
    pub fn release_all_keys(&mut self) {
        self.controls = [Controls::default(); MAX_HUMANS];
    }

    pub fn controls(&self, slot: usize) -> Controls {
        self.controls.get(slot).copied().unwrap_or_default()
    }

    /// Run one tick and return what to draw, or None once torn down
    pub fn frame(&mut self, now_ms: f64) -> Option<Snapshot<'_>> {
        if !self.active {
            return None;
        }
        let input = TickInput {
            now_ms,
            controls: self.controls,
            directives: self.pending.drain(..).collect(),
        };
        tick(&mut self.state, &input);
        Some(Snapshot::new(&self.state))
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    /// Stop the session for good; later frames are no-ops
    pub fn teardown(&mut self) {
        if self.active {
            log::info!("Session torn down in round {}", self.state.round);
        }
        self.active = false;
        self.pending.clear();
        self.release_all_keys();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::MatchPhase;

    #[test]
    fn test_directives_wait_for_next_frame() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        assert!(session.submit_text("giant 3"));
        assert_eq!(session.state().characters[2].scale, 1.0);

        session.frame(16.0);
        assert_eq!(session.state().characters[2].scale, 2.0);
    }

    #[test]
    fn test_directives_apply_in_order() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        session.submit_text("freeze 4");
        session.submit_text("unfreeze 4");
        session.frame(16.0);
        assert!(!session.state().characters[3].frozen);
    }

    #[test]
    fn test_unrecognized_text_is_noop() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        assert!(!session.submit_text("make it rain"));
        assert!(session.frame(16.0).is_some());
    }

    #[test]
    fn test_controls_slots() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        let right = Controls {
            right: true,
            ..Default::default()
        };
        session.set_controls(1, right);
        session.set_controls(7, right);
        assert_eq!(session.controls(1), right);
        assert_eq!(session.controls(0), Controls::default());
        assert_eq!(session.controls(7), Controls::default());
    }

    #[test]
    fn test_release_all_keys_stops_runners() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        let running = Controls {
            left: true,
            up: true,
            ..Default::default()
        };
        session.set_controls(0, running);
        session.set_controls(1, running);
        session.frame(16.0);
        let vx_held = session.state().characters[0].vel.x;
        assert!(vx_held < 0.0);

        // Focus lost mid-run: no keyup ever arrives
        session.release_all_keys();
        for slot in 0..MAX_HUMANS {
            assert_eq!(session.controls(slot), Controls::default());
        }
        session.frame(32.0);
        let vx_after = session.state().characters[0].vel.x;
        assert!(vx_after.abs() < vx_held.abs(), "{vx_after} vs {vx_held}");
    }

    #[test]
    fn test_teardown_stops_frames() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        session.frame(16.0);
        session.submit_text("giant 1");
        session.teardown();
        assert!(!session.is_active());

        let round = session.state().round;
        let pos = session.state().characters[0].pos;
        assert!(session.frame(30_000.0).is_none());
        assert_eq!(session.state().round, round);
        assert_eq!(session.state().characters[0].pos, pos);
        assert_eq!(session.state().characters[0].scale, 1.0);

        // Submissions after teardown are dropped too
        session.submit_text("giant 1");
        assert!(session.frame(40_000.0).is_none());
    }

    #[test]
    fn test_snapshot_reflects_tick() {
        let mut session = Session::new(MatchConfig::default(), 8, 1_000.0);
        let snapshot = session.frame(4_000.0).unwrap();
        assert!((snapshot.time_left - 10.0).abs() < 1e-4);
        assert_eq!(snapshot.phase, &MatchPhase::Playing);
        assert_eq!(snapshot.characters.len(), 5);
    }

    #[test]
    fn test_events_drain_once() {
        let mut session = Session::new(MatchConfig::default(), 8, 0.0);
        let events = session.drain_events();
        assert!(matches!(events[0], GameEvent::RoundStarted { round: 1, .. }));
        assert!(session.drain_events().is_empty());
    }
}
