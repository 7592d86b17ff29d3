use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Undo/redo stacks of document snapshots.
///
/// The history never holds the current document: callers pass it in on every
/// transition and receive the snapshot to display instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiagramHistory {
    past: Vec<String>,
    future: Vec<String>,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for DiagramHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl DiagramHistory {
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            past: Vec::new(),
            future: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Remember `previous` before the document changes. Identical consecutive
    /// snapshots are collapsed, and any redo branch is discarded.
    pub fn record(&mut self, previous: impl Into<String>) {
        let previous = previous.into();
        if self.past.last() == Some(&previous) {
            return;
        }
        self.past.push(previous);
        if self.past.len() > self.limit {
            let overflow = self.past.len() - self.limit;
            self.past.drain(..overflow);
        }
        self.future.clear();
    }

    pub fn undo(&mut self, current: impl Into<String>) -> Option<String> {
        let snapshot = self.past.pop()?;
        self.future.push(current.into());
        Some(snapshot)
    }

    pub fn redo(&mut self, current: impl Into<String>) -> Option<String> {
        let snapshot = self.future.pop()?;
        self.past.push(current.into());
        Some(snapshot)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::DiagramHistory;

    #[test]
    fn undo_then_redo_restores_edits() {
        let mut history = DiagramHistory::default();
        history.record("graph LR");
        history.record("graph LR\nA-->B");

        let current = "graph LR\nA-->B\nB-->C";
        let undone = history.undo(current).expect("undo available");
        assert_eq!(undone, "graph LR\nA-->B");
        assert!(history.can_redo());

        let redone = history.redo(undone).expect("redo available");
        assert_eq!(redone, current);
        assert!(!history.can_redo());
    }

    #[test]
    fn recording_discards_redo_branch() {
        let mut history = DiagramHistory::default();
        history.record("a");
        let _ = history.undo("b");
        assert!(history.can_redo());
        history.record("a");
        assert!(!history.can_redo());
    }

    #[test]
    fn identical_snapshots_collapse() {
        let mut history = DiagramHistory::default();
        history.record("pie");
        history.record("pie");
        assert_eq!(history.undo("pie title X"), Some("pie".to_string()));
        assert!(!history.can_undo());
    }

    #[test]
    fn limit_drops_oldest_snapshots() {
        let mut history = DiagramHistory::with_limit(2);
        history.record("1");
        history.record("2");
        history.record("3");
        assert_eq!(history.undo("4").as_deref(), Some("3"));
        assert_eq!(history.undo("3").as_deref(), Some("2"));
        assert_eq!(history.undo("2"), None);
    }

    #[test]
    fn empty_history_has_nothing_to_undo() {
        let mut history = DiagramHistory::default();
        assert!(!history.can_undo());
        assert_eq!(history.undo("x"), None);
        assert_eq!(history.redo("x"), None);
    }
}
