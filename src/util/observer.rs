use crate::core::{game_session::GameSession, turn::TurnOutcome};

/// Notified once per settled roll, after the next player has been chosen and
/// before the engine accepts another roll.
pub trait TurnObserver {
    fn on_turn_resolved(&mut self, session: &GameSession, outcome: &TurnOutcome);
}

pub struct NoopObserver;

impl TurnObserver for NoopObserver {
    fn on_turn_resolved(&mut self, _session: &GameSession, _outcome: &TurnOutcome) {}
}

#[derive(Default)]
pub struct RecordingObserver {
    pub outcomes: Vec<TurnOutcome>,
    pub idle_when_notified: Vec<bool>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TurnObserver for RecordingObserver {
    fn on_turn_resolved(&mut self, session: &GameSession, outcome: &TurnOutcome) {
        self.outcomes.push(outcome.clone());
        self.idle_when_notified.push(session.is_idle());
    }
}
