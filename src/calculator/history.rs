//! Bounded history of completed calculations.

use std::collections::VecDeque;

/// Maximum number of entries kept before the oldest is evicted.
pub const HISTORY_LIMIT: usize = 50;

/// Ordered list of formatted expressions, oldest first.
#[derive(Clone, Debug)]
pub struct History {
    entries: VecDeque<String>,
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// An empty history.
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_LIMIT),
            limit: HISTORY_LIMIT,
        }
    }

    /// Append an entry, evicting the oldest one when over the limit.
    pub fn push(&mut self, entry: String) {
        self.entries.push_back(entry);
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    /// Iterate entries from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Whether `entry` is still in the history.
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| e == entry)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest() {
        let mut history = History::new();
        for i in 0..HISTORY_LIMIT + 5 {
            history.push(format!("entry {}", i));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.iter().next(), Some("entry 5"));
        assert_eq!(history.last(), Some("entry 54"));
        assert!(!history.contains("entry 4"));
    }

    #[test]
    fn test_clear() {
        let mut history = History::default();
        history.push("1 + 1 = 2".to_string());
        assert!(!history.is_empty());
        history.clear();
        assert!(history.is_empty());
    }
}
