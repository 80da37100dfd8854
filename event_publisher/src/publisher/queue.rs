//! Pending-event queue ordered by priority.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::events::Event;

/// A queued event plus the order it arrived in.
struct QueuedEvent {
    priority: i32,
    sequence: u64,
    event: Box<dyn Event>,
}

/// Greater means "processed sooner": lower priority values first, and among
/// equal priorities the most recently queued event first.
impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedEvent {}

/// Max-heap of pending events. The priority is read once, when the event is queued.
#[derive(Default)]
pub(crate) struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_sequence: u64,
}

impl EventQueue {
    pub(crate) fn push(&mut self, event: Box<dyn Event>) {
        let queued = QueuedEvent {
            priority: event.priority(),
            sequence: self.next_sequence,
            event,
        };
        self.next_sequence += 1;
        self.heap.push(queued);
    }

    /// Remove the next event to process.
    pub(crate) fn pop(&mut self) -> Option<Box<dyn Event>> {
        self.heap.pop().map(|queued| queued.event)
    }

    /// Priority of the next event to process.
    pub(crate) fn peek_priority(&self) -> Option<i32> {
        self.heap.peek().map(|queued| queued.priority)
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
