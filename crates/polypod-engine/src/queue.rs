//! Event sources the render loop drains at the top of each block.

use crate::event::EngineEvent;

/// Anything the audio side can pull events from without blocking.
pub trait EventReceiver {
    /// Next pending event, `None` when drained.
    fn pop(&mut self) -> Option<EngineEvent>;
}

/// A source that never has anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEvents;

impl EventReceiver for NoEvents {
    fn pop(&mut self) -> Option<EngineEvent> {
        None
    }
}

#[cfg(feature = "std")]
impl EventReceiver for std::collections::VecDeque<EngineEvent> {
    fn pop(&mut self) -> Option<EngineEvent> {
        self.pop_front()
    }
}

#[cfg(feature = "rtrb")]
impl EventReceiver for rtrb::Consumer<EngineEvent> {
    fn pop(&mut self) -> Option<EngineEvent> {
        rtrb::Consumer::pop(self).ok()
    }
}

/// Producer half of a lock-free event queue.
///
/// `send` never blocks; when the queue is full the event is dropped.
#[cfg(feature = "rtrb")]
#[derive(Debug)]
pub struct EventSender {
    producer: rtrb::Producer<EngineEvent>,
}

#[cfg(feature = "rtrb")]
impl EventSender {
    /// Queue `event`. Returns `false` if it was dropped.
    pub fn send(&mut self, event: impl Into<EngineEvent>) -> bool {
        let event = event.into();
        match self.producer.push(event) {
            Ok(()) => true,
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(?event, "event queue full, dropping");
                false
            }
        }
    }

    /// Free slots.
    pub fn slots(&self) -> usize {
        self.producer.slots()
    }

    /// True once the consumer has been dropped.
    pub fn is_abandoned(&self) -> bool {
        self.producer.is_abandoned()
    }
}

/// Single-producer single-consumer queue holding `capacity` events.
///
/// ```rust
/// use polypod_engine::{EngineEvent, EventReceiver, MidiEvent, event_queue};
///
/// let (mut tx, mut rx) = event_queue(2);
/// assert!(tx.send(MidiEvent::NoteOn { note: 60 }));
/// assert!(tx.send(EngineEvent::AllNotesOff));
/// assert!(!tx.send(MidiEvent::NoteOff { note: 60 }));
/// assert_eq!(EventReceiver::pop(&mut rx), Some(EngineEvent::Midi(MidiEvent::NoteOn { note: 60 })));
/// ```
#[cfg(feature = "rtrb")]
pub fn event_queue(capacity: usize) -> (EventSender, rtrb::Consumer<EngineEvent>) {
    let (producer, consumer) = rtrb::RingBuffer::new(capacity);
    (EventSender { producer }, consumer)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::MidiEvent;
    use std::collections::VecDeque;

    #[test]
    fn vecdeque_pops_in_order() {
        let mut queue: VecDeque<EngineEvent> = VecDeque::new();
        queue.push_back(MidiEvent::NoteOn { note: 1 }.into());
        queue.push_back(EngineEvent::AllNotesOff);
        assert_eq!(
            EventReceiver::pop(&mut queue),
            Some(EngineEvent::Midi(MidiEvent::NoteOn { note: 1 }))
        );
        assert_eq!(EventReceiver::pop(&mut queue), Some(EngineEvent::AllNotesOff));
        assert_eq!(EventReceiver::pop(&mut queue), None);
    }

    #[test]
    fn no_events_is_empty() {
        assert_eq!(NoEvents.pop(), None);
    }
}
