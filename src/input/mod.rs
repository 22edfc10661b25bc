//! Pointer lifecycle: the up/down machine that decides what a pointer
//! sample means for the mark store.

mod capture;

pub use capture::InputHandler;

use serde::{Deserialize, Serialize};

use crate::stroke::{Point, PointerKind};

/// A raw pointer sample as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    #[serde(rename = "type")]
    pub kind: PointerKind,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, pressure: f64, kind: PointerKind) -> Self {
        Self {
            x,
            y,
            pressure,
            kind,
        }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y, self.pressure)
    }
}

/// Pointer lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Downed(PointerSample),
    Moved(PointerSample),
    Lifted(PointerSample),
}

/// What the mark store should do in response to a pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerAction {
    BeginMark(PointerSample),
    AddPoint(PointerSample),
    CommitMark,
    /// The event is not valid in the current state.
    Ignore,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PointerState {
    #[default]
    Up,
    Down,
}

impl PointerState {
    /// Apply `event`, moving to the next state and returning the action to run.
    pub fn transition(&mut self, event: PointerEvent) -> PointerAction {
        let (next, action) = match (*self, event) {
            (PointerState::Up, PointerEvent::Downed(sample)) => {
                (PointerState::Down, PointerAction::BeginMark(sample))
            }
            (PointerState::Down, PointerEvent::Moved(sample)) => {
                (PointerState::Down, PointerAction::AddPoint(sample))
            }
            (PointerState::Down, PointerEvent::Lifted(_)) => {
                (PointerState::Up, PointerAction::CommitMark)
            }
            (state, _) => (state, PointerAction::Ignore),
        };

        if next != *self {
            log::debug!("Pointer {:?} -> {:?}", self, next);
        }
        *self = next;
        action
    }

    pub fn is_down(&self) -> bool {
        matches!(self, PointerState::Down)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PointerSample {
        PointerSample::new(1.0, 2.0, 0.5, PointerKind::Mouse)
    }

    #[test]
    fn test_full_lifecycle() {
        let mut state = PointerState::default();
        assert_eq!(
            state.transition(PointerEvent::Downed(sample())),
            PointerAction::BeginMark(sample())
        );
        assert!(state.is_down());
        assert_eq!(
            state.transition(PointerEvent::Moved(sample())),
            PointerAction::AddPoint(sample())
        );
        assert_eq!(
            state.transition(PointerEvent::Lifted(sample())),
            PointerAction::CommitMark
        );
        assert_eq!(state, PointerState::Up);
    }

    #[test]
    fn test_invalid_events_are_ignored() {
        let mut state = PointerState::Up;
        assert_eq!(state.transition(PointerEvent::Moved(sample())), PointerAction::Ignore);
        assert_eq!(state.transition(PointerEvent::Lifted(sample())), PointerAction::Ignore);
        assert_eq!(state, PointerState::Up);

        let mut state = PointerState::Down;
        assert_eq!(state.transition(PointerEvent::Downed(sample())), PointerAction::Ignore);
        assert_eq!(state, PointerState::Down);
    }
}
