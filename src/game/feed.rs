use std::collections::VecDeque;

const FEED_CAPACITY: usize = 20;

/// Bounded, most-recent-first log of human-readable hand events.
#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    entries: VecDeque<String>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        tracing::debug!("feed: {}", entry);
        self.entries.push_front(entry);
        self.entries.truncate(FEED_CAPACITY);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
