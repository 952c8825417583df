//=========================================================================
// Input Buffer
//
// Per-pump store of converted input events.
//
// Responsibilities:
// - Keep discrete events (key and button presses) in arrival order
// - Drop an immediately repeated discrete event (key auto-repeat)
// - Coalesce continuous events so only the latest cursor position stays
//
// The buffer is drained once per pump, at `about_to_wait`.
//=========================================================================

//=== Standard Library Imports ============================================

use std::collections::HashSet;

//=== Internal Modules ====================================================

use crate::input::InputEvent;

//=== InputBuffer =========================================================

pub(crate) struct InputBuffer {
    discrete: Vec<InputEvent>,
    continuous: HashSet<InputEvent>,
}

impl InputBuffer {
    pub(crate) fn new() -> Self {
        const DISCRETE_BASE: usize = 64;
        const CONTINUOUS_BASE: usize = 4;

        Self {
            discrete: Vec::with_capacity(DISCRETE_BASE),
            continuous: HashSet::with_capacity(CONTINUOUS_BASE),
        }
    }

    /// Replaces any buffered event of the same continuous kind.
    pub(crate) fn push_continuous(&mut self, event: InputEvent) {
        self.continuous.replace(event);
    }

    /// Appends a press or release unless it repeats the previous one.
    pub(crate) fn push_discrete(&mut self, event: InputEvent) {
        if self.discrete.last() != Some(&event) {
            self.discrete.push(event);
        }
    }

    /// Takes everything buffered, discrete events first.
    ///
    /// Returns `None` when nothing arrived so empty batches are never sent.
    pub(crate) fn drain(&mut self) -> Option<Vec<InputEvent>> {
        if self.is_empty() {
            return None;
        }
        let mut events: Vec<InputEvent> = self.discrete.drain(..).collect();
        events.extend(self.continuous.drain());
        Some(events)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.discrete.is_empty() && self.continuous.is_empty()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyCode;

    fn mouse_move(x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    #[test]
    fn repeated_press_is_recorded_once() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::ArrowDown));
        buffer.push_discrete(InputEvent::key_down(KeyCode::ArrowDown));
        buffer.push_discrete(InputEvent::key_down(KeyCode::Enter));

        assert_eq!(buffer.drain().unwrap().len(), 2);
    }

    #[test]
    fn latest_cursor_position_wins() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(mouse_move(10.0, 10.0));
        buffer.push_continuous(mouse_move(20.0, 30.0));

        let events = buffer.drain().unwrap();
        assert_eq!(events.len(), 1);
        match events[0] {
            InputEvent::MouseMoved { x, y } => assert_eq!((x, y), (20.0, 30.0)),
            ref other => panic!("expected MouseMoved, got {other:?}"),
        }
    }

    #[test]
    fn discrete_events_come_first() {
        let mut buffer = InputBuffer::new();
        buffer.push_continuous(mouse_move(1.0, 1.0));
        buffer.push_discrete(InputEvent::key_down(KeyCode::Escape));

        let events = buffer.drain().unwrap();
        assert_eq!(events[0], InputEvent::key_down(KeyCode::Escape));
        assert!(events[1].is_continuous());
    }

    #[test]
    fn drain_empties_and_then_yields_nothing() {
        let mut buffer = InputBuffer::new();
        buffer.push_discrete(InputEvent::key_down(KeyCode::KeyA));

        assert!(buffer.drain().is_some());
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_none());
    }
}
