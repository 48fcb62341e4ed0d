//! Attempt state derivation.
//!
//! The lifecycle state of an attempt is never stored. It is recomputed by
//! folding the attempt's events through the transition table on every read.

use crate::domain::models::{AttemptState, DerivedAttemptState, EventType, ProgressEvent};

/// Derive the current state of an attempt from its events.
///
/// Events are ordered by timestamp, then by store sequence, so the result
/// does not depend on the order they are passed in. The fold stops at the
/// first event the table cannot explain and reports `INVALID` with no
/// allowed actions.
pub fn derive_attempt_state(events: &[ProgressEvent]) -> DerivedAttemptState {
    let mut ordered: Vec<&ProgressEvent> = events.iter().collect();
    ordered.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.sequence.cmp(&b.sequence))
    });

    let mut state = AttemptState::NotStarted;
    for event in &ordered {
        let next = event.kind().and_then(|kind| state.transition(kind));
        match next {
            Some(next) => state = next,
            None => {
                return DerivedAttemptState {
                    derived_state: AttemptState::Invalid,
                    reasoning: format!("Invalid transition: {state} -> {}", event.event_type),
                    allowed_actions: Vec::new(),
                };
            }
        }
    }

    let reasoning = if ordered.is_empty() {
        format!("No events yet. Awaiting {}.", EventType::AttemptStarted)
    } else {
        format!("Derived from {} event(s).", ordered.len())
    };

    DerivedAttemptState {
        derived_state: state,
        reasoning,
        allowed_actions: state.allowed_actions(),
    }
}
