use crate::frame::Frame;

/// A payload stamped with the frame it was raised in.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<T> {
    pub frame_index: u64,
    pub payload: T,
}

/// Ordered, pull-based notification queue.
///
/// Producers `emit`; consumers either inspect `events()` or take ownership via
/// `drain()`. Nothing is delivered through callbacks, so emitting never
/// re-enters the producer.
#[derive(Debug)]
pub struct EventBus<T> {
    events: Vec<Event<T>>,
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, frame: Frame, payload: T) {
        self.events.push(Event {
            frame_index: frame.index,
            payload,
        });
    }

    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Event<T>> {
        std::mem::take(&mut self.events)
    }
}
