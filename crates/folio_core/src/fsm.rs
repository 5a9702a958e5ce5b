//! Interaction state machines
//!
//! Flat statecharts for widget interaction states. States and events are
//! plain `u32` IDs so widgets can mix the shared [`event_types`] constants
//! with their own custom events.
//!
//! An event that has no transition from the current state is ignored: the
//! machine stays put and `send` returns false. Rejected input is expected,
//! not exceptional, so there is nothing to report.
//!
//! [`event_types`]: crate::events::event_types

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// State identifier
pub type StateId = u32;

/// Event identifier (shares the [`crate::events::EventType`] space)
pub type EventId = u32;

/// A single transition edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: EventId,
    pub to: StateId,
}

/// A flat state machine
///
/// Built once via [`StateMachine::builder`], then driven with [`send`].
///
/// [`send`]: StateMachine::send
#[derive(Clone, Debug)]
pub struct StateMachine {
    initial: StateId,
    current: StateId,
    /// Outgoing edges per state; most states have only a few
    edges: FxHashMap<StateId, SmallVec<[(EventId, StateId); 4]>>,
}

impl StateMachine {
    /// Start building a machine with the given initial state
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: Vec::new(),
        }
    }

    /// The current state
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// Send an event to the machine
    ///
    /// Returns true if the event caused a transition.
    pub fn send(&mut self, event: EventId) -> bool {
        let next = self
            .edges
            .get(&self.current)
            .and_then(|edges| edges.iter().find(|(e, _)| *e == event))
            .map(|(_, to)| *to);

        match next {
            Some(to) if to != self.current => {
                tracing::trace!(from = self.current, event, to, "fsm transition");
                self.current = to;
                true
            }
            _ => false,
        }
    }

    /// Reset the machine to its initial state
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: Vec<Transition>,
}

impl StateMachineBuilder {
    /// Add a transition: in `from`, event `event` moves to `to`
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    /// Finish building
    pub fn build(self) -> StateMachine {
        let mut edges: FxHashMap<StateId, SmallVec<[(EventId, StateId); 4]>> =
            FxHashMap::default();
        for t in self.transitions {
            edges.entry(t.from).or_default().push((t.event, t.to));
        }
        StateMachine {
            initial: self.initial,
            current: self.initial,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::event_types;

    const IDLE: StateId = 0;
    const HOVERED: StateId = 1;
    const PRESSED: StateId = 2;

    fn button_fsm() -> StateMachine {
        StateMachine::builder(IDLE)
            .on(IDLE, event_types::POINTER_ENTER, HOVERED)
            .on(HOVERED, event_types::POINTER_LEAVE, IDLE)
            .on(HOVERED, event_types::POINTER_DOWN, PRESSED)
            .on(PRESSED, event_types::POINTER_UP, HOVERED)
            .build()
    }

    #[test]
    fn test_transitions() {
        let mut fsm = button_fsm();
        assert_eq!(fsm.current_state(), IDLE);

        assert!(fsm.send(event_types::POINTER_ENTER));
        assert_eq!(fsm.current_state(), HOVERED);

        assert!(fsm.send(event_types::POINTER_DOWN));
        assert_eq!(fsm.current_state(), PRESSED);
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let mut fsm = button_fsm();

        // POINTER_UP has no edge from IDLE
        assert!(!fsm.send(event_types::POINTER_UP));
        assert_eq!(fsm.current_state(), IDLE);
    }

    #[test]
    fn test_reset() {
        let mut fsm = button_fsm();
        fsm.send(event_types::POINTER_ENTER);
        fsm.send(event_types::POINTER_DOWN);
        assert_eq!(fsm.current_state(), PRESSED);

        fsm.reset();
        assert_eq!(fsm.current_state(), IDLE);
    }
}
