//! Reveal lifecycle
//!
//! A flat state machine over the phases a reveal passes through. Events with
//! no transition from the current phase are ignored, which is how late
//! timeline or observer notifications after cleanup become harmless.
//!
//! ```text
//! Idle ──Observe──▶ Observing ──Enter──▶ Revealing ──Complete──▶ Revealed
//!  │                 │   ▲                   │                      │
//!  │                 │   └───────Leave───────┴──────────────────────┘
//!  │                 └──Fail──▶ Static
//!  ├──ReduceMotion──▶ Settled
//!  └──Fail──▶ Static
//!
//! any ──Dispose──▶ Disposed
//! ```

use std::fmt;

/// Lifecycle phase of a reveal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealPhase {
    /// Created, not mounted yet
    Idle,
    /// Hidden and waiting for the element to enter the viewport
    Observing,
    /// Reveal tween running
    Revealing,
    /// Reveal tween finished
    Revealed,
    /// Reduced motion: final state without animating
    Settled,
    /// Setup failed; the element keeps whatever styles it has
    Static,
    Disposed,
}

impl RevealPhase {
    /// No further transitions except disposal
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RevealPhase::Settled | RevealPhase::Static | RevealPhase::Disposed
        )
    }
}

impl fmt::Display for RevealPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RevealPhase::Idle => "idle",
            RevealPhase::Observing => "observing",
            RevealPhase::Revealing => "revealing",
            RevealPhase::Revealed => "revealed",
            RevealPhase::Settled => "settled",
            RevealPhase::Static => "static",
            RevealPhase::Disposed => "disposed",
        };
        f.write_str(name)
    }
}

/// Inputs driving the lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealEvent {
    /// Mount claimed the reveal and is attaching the observer
    Observe,
    ReduceMotion,
    /// Element entered the viewport
    Enter,
    /// Reveal tween completed
    Complete,
    /// Element left the viewport of a repeatable reveal
    Leave,
    /// Animator or observer setup failed
    Fail,
    Dispose,
}

use self::RevealEvent as E;
use self::RevealPhase as P;

const TRANSITIONS: &[(RevealPhase, RevealEvent, RevealPhase)] = &[
    (P::Idle, E::Observe, P::Observing),
    (P::Idle, E::ReduceMotion, P::Settled),
    (P::Idle, E::Fail, P::Static),
    (P::Observing, E::Enter, P::Revealing),
    // Observer creation failed after mount claimed the reveal
    (P::Observing, E::Fail, P::Static),
    (P::Revealing, E::Complete, P::Revealed),
    (P::Revealing, E::Leave, P::Observing),
    (P::Revealed, E::Leave, P::Observing),
];

/// Lifecycle state machine with a transition history
#[derive(Clone, Debug)]
pub struct PhaseMachine {
    current: RevealPhase,
    /// History of transitions (for debugging)
    history: Vec<(RevealPhase, RevealEvent, RevealPhase)>,
}

impl Default for PhaseMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseMachine {
    pub fn new() -> Self {
        Self {
            current: RevealPhase::Idle,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> RevealPhase {
        self.current
    }

    pub fn is_in(&self, phase: RevealPhase) -> bool {
        self.current == phase
    }

    pub fn history(&self) -> &[(RevealPhase, RevealEvent, RevealPhase)] {
        &self.history
    }

    fn target(&self, event: RevealEvent) -> Option<RevealPhase> {
        if event == RevealEvent::Dispose {
            return (self.current != RevealPhase::Disposed).then_some(RevealPhase::Disposed);
        }
        TRANSITIONS
            .iter()
            .find(|(from, on, _)| *from == self.current && *on == event)
            .map(|(_, _, to)| *to)
    }

    /// Whether `event` triggers a transition from the current phase
    pub fn can_send(&self, event: RevealEvent) -> bool {
        self.target(event).is_some()
    }

    /// Send an event; returns the phase afterwards
    pub fn send(&mut self, event: RevealEvent) -> RevealPhase {
        match self.target(event) {
            Some(next) => {
                tracing::trace!(from = %self.current, ?event, to = %next, "reveal transition");
                self.history.push((self.current, event, next));
                self.current = next;
            }
            None => {
                tracing::trace!(phase = %self.current, ?event, "reveal event ignored");
            }
        }
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_once_lifecycle() {
        let mut machine = PhaseMachine::new();
        assert_eq!(machine.send(RevealEvent::Observe), RevealPhase::Observing);
        assert_eq!(machine.send(RevealEvent::Enter), RevealPhase::Revealing);
        assert_eq!(machine.send(RevealEvent::Complete), RevealPhase::Revealed);
        assert_eq!(machine.history().len(), 3);
    }

    #[test]
    fn test_repeatable_reset() {
        let mut machine = PhaseMachine::new();
        machine.send(RevealEvent::Observe);
        machine.send(RevealEvent::Enter);
        assert_eq!(machine.send(RevealEvent::Leave), RevealPhase::Observing);
        assert_eq!(machine.send(RevealEvent::Enter), RevealPhase::Revealing);
    }

    #[test]
    fn test_failed_attach_is_static() {
        let mut machine = PhaseMachine::new();
        machine.send(RevealEvent::Observe);
        assert_eq!(machine.send(RevealEvent::Fail), RevealPhase::Static);
        assert!(!machine.can_send(RevealEvent::Observe));
    }

    #[test]
    fn test_unknown_events_are_ignored() {
        let mut machine = PhaseMachine::new();
        assert!(!machine.can_send(RevealEvent::Complete));
        assert_eq!(machine.send(RevealEvent::Complete), RevealPhase::Idle);
        assert!(machine.history().is_empty());
    }

    #[test]
    fn test_dispose_from_any_phase_once() {
        let mut machine = PhaseMachine::new();
        machine.send(RevealEvent::ReduceMotion);
        assert!(machine.is_in(RevealPhase::Settled));
        assert_eq!(machine.send(RevealEvent::Dispose), RevealPhase::Disposed);
        assert!(!machine.can_send(RevealEvent::Dispose));
        assert_eq!(machine.send(RevealEvent::Enter), RevealPhase::Disposed);
        assert!(machine.current().is_terminal());
    }
}
