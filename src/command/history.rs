use serde::{Deserialize, Serialize};

use crate::stroke::Mark;

/// A batch of marks that undo/redo moves as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<bool>,
    pub marks: Vec<Mark>,
}

impl HistoryEntry {
    pub fn single(mark: Mark) -> Self {
        Self {
            clear: None,
            marks: vec![mark],
        }
    }
}

/// Undo/redo bookkeeping for the committed marks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    /// Entries that redo can put back, most recent last.
    redos: Vec<HistoryEntry>,
    /// Bulk restore points. Undo reads these once the canvas is empty;
    /// nothing pushes to them yet.
    restore: Vec<HistoryEntry>,
}

impl History {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Undo against `marks`.
    ///
    /// With marks present, the last one moves onto the redo stack. With no
    /// marks at all, the latest restore entry (if any) replaces the marks
    /// wholesale instead.
    pub fn undo(&mut self, marks: &mut Vec<Mark>) {
        match marks.pop() {
            Some(undone) => self.redos.push(HistoryEntry::single(undone)),
            None => {
                if let Some(restored) = self.restore.pop() {
                    log::debug!("Restoring {} marks", restored.marks.len());
                    *marks = restored.marks;
                }
            }
        }
    }

    /// Put the most recently undone entry back at the end of `marks`.
    pub fn redo(&mut self, marks: &mut Vec<Mark>) {
        if let Some(entry) = self.redos.pop() {
            marks.extend(entry.marks);
        }
    }

    pub fn clear_redos(&mut self) {
        self.redos.clear();
    }

    /// Push a bulk restore point for a later undo on an empty canvas.
    pub fn push_restore(&mut self, entry: HistoryEntry) {
        self.restore.push(entry);
    }

    pub fn redos(&self) -> &[HistoryEntry] {
        &self.redos
    }

    pub fn restore(&self) -> &[HistoryEntry] {
        &self.restore
    }

    /// Returns true if there is something to undo given the current marks
    pub fn can_undo(&self, marks: &[Mark]) -> bool {
        !marks.is_empty() || !self.restore.is_empty()
    }

    /// Returns true if there are entries that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use crate::stroke::{Point, PointerKind};

    fn mark_at(x: f64) -> Mark {
        Mark::begin(Point::new(x, 0.0, 0.5), PointerKind::Mouse, &Options::default())
    }

    #[test]
    fn test_undo_redo_moves_tail() {
        let mut history = History::new();
        let mut marks = vec![mark_at(1.0), mark_at(2.0), mark_at(3.0)];

        history.undo(&mut marks);
        history.undo(&mut marks);
        assert_eq!(marks, vec![mark_at(1.0)]);
        assert_eq!(history.redos()[0], HistoryEntry::single(mark_at(3.0)));

        history.redo(&mut marks);
        history.redo(&mut marks);
        history.redo(&mut marks);
        assert_eq!(marks, vec![mark_at(1.0), mark_at(2.0), mark_at(3.0)]);
        assert!(!history.can_redo());
    }

    #[test]
    fn test_restore_only_when_empty() {
        let mut history = History::new();
        history.push_restore(HistoryEntry {
            clear: Some(true),
            marks: vec![mark_at(5.0), mark_at(6.0)],
        });

        let mut marks = vec![mark_at(1.0)];
        history.undo(&mut marks);
        assert!(marks.is_empty());
        assert_eq!(history.restore().len(), 1);

        history.undo(&mut marks);
        assert_eq!(marks, vec![mark_at(5.0), mark_at(6.0)]);
        assert!(history.restore().is_empty());
        assert_eq!(history.redos().len(), 1);
    }
}
