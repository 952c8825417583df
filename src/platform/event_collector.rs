//=========================================================================
// Event Collector
//=========================================================================
//
// Drains the platform event queue once per service frame.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → PlatformFrame
//
// The drain is bounded so a flood of events cannot starve the mode loop.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::{PlatformEvent, PlatformFrame};

//=== EventCollector ======================================================

pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
}

impl EventCollector {
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self { receiver }
    }

    /// Collects queued events into one frame.
    ///
    /// A closed window or a disconnected sender marks the frame as
    /// `close_requested`; input gathered before that point is kept.
    pub(crate) fn collect_frame(&mut self) -> PlatformFrame {
        let mut frame = PlatformFrame::default();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs(batch)) => frame.inputs.extend(batch),
                Ok(PlatformEvent::WindowClosed) | Err(TryRecvError::Disconnected) => {
                    frame.close_requested = true;
                    return frame;
                }
                Err(TryRecvError::Empty) => return frame,
            }
            drained += 1;
        }

        warn!(target: "platform", "Event queue backlog: drained {} events this frame", drained);
        frame
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, KeyCode};
    use crossbeam_channel::unbounded;

    #[test]
    fn empty_queue_gives_empty_frame() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        let frame = collector.collect_frame();

        assert!(frame.inputs.is_empty());
        assert!(!frame.close_requested);
    }

    #[test]
    fn batches_are_concatenated_in_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        tx.send(PlatformEvent::Inputs(vec![InputEvent::key_down(KeyCode::ArrowDown)]))
            .unwrap();
        tx.send(PlatformEvent::Inputs(vec![InputEvent::key_down(KeyCode::Enter)]))
            .unwrap();

        let frame = collector.collect_frame();

        assert_eq!(
            frame.inputs,
            vec![
                InputEvent::key_down(KeyCode::ArrowDown),
                InputEvent::key_down(KeyCode::Enter)
            ]
        );
    }

    #[test]
    fn window_close_is_reported_with_prior_input() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        tx.send(PlatformEvent::Inputs(vec![InputEvent::key_down(KeyCode::Space)]))
            .unwrap();
        tx.send(PlatformEvent::WindowClosed).unwrap();

        let frame = collector.collect_frame();

        assert!(frame.close_requested);
        assert_eq!(frame.inputs.len(), 1);
    }

    #[test]
    fn disconnected_sender_requests_close() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);
        drop(tx);

        assert!(collector.collect_frame().close_requested);
    }

    #[test]
    fn drain_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);
        for _ in 0..(EventCollector::MAX_EVENTS_PER_FRAME + 5) {
            tx.send(PlatformEvent::Inputs(vec![InputEvent::key_down(KeyCode::KeyA)]))
                .unwrap();
        }

        let first = collector.collect_frame();
        let second = collector.collect_frame();

        assert_eq!(first.inputs.len(), EventCollector::MAX_EVENTS_PER_FRAME);
        assert_eq!(second.inputs.len(), 5);
    }
}
