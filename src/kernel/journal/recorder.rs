use std::collections::VecDeque;

use super::event::JournalEvent;
use super::metrics::{compute_snapshot, JournalSnapshot};

const MAX_EVENTS: usize = 10_000;

#[derive(Debug)]
pub struct TransitionJournal {
    buffer: VecDeque<JournalEvent>,
}

impl Default for TransitionJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionJournal {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
        }
    }

    pub fn record(&mut self, event: JournalEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.buffer.push_back(event);
    }

    pub fn snapshot(&self) -> JournalSnapshot {
        compute_snapshot(&self.buffer)
    }

    pub fn events(&self) -> impl Iterator<Item = &JournalEvent> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_is_bounded() {
        let mut journal = TransitionJournal::new();
        for i in 0..(MAX_EVENTS as i64 + 5) {
            journal.record(JournalEvent::SensorsUnavailable { at_ms: i });
        }
        assert_eq!(journal.len(), MAX_EVENTS);
        assert_eq!(
            journal.events().next(),
            Some(&JournalEvent::SensorsUnavailable { at_ms: 5 })
        );
    }
}
