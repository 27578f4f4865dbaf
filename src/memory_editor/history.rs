// WHY: Undo steps for the in-memory editor
// Consecutive typing merges into one step; attribute changes always get a step of their own

use std::collections::BTreeMap;

use crate::host::{BatchKind, Position, TextRange};

/// One undoable change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryStep {
    /// Characters inserted at `start`
    Insert { batch: BatchKind, start: Position, len: usize },
    /// Block split at `at`; the tail moved to a new block after it
    SplitBlock { at: Position },
    /// Attribute `key` written over `range`; `previous` holds the old value per character
    Attribute { range: TextRange, key: String, previous: Vec<Option<String>> },
}

/// Undo stack
#[derive(Debug, Default)]
pub struct History {
    steps: Vec<HistoryStep>,
}

impl History {
    pub fn depth(&self) -> usize {
        self.steps.len()
    }

    pub fn clear(&mut self) {
        self.steps.clear();
    }

    pub fn pop(&mut self) -> Option<HistoryStep> {
        self.steps.pop()
    }

    pub fn last(&self) -> Option<&HistoryStep> {
        self.steps.last()
    }

    /// Record an insertion, extending the previous step when typing continues it
    pub fn record_insert(&mut self, batch: BatchKind, start: Position, len: usize) {
        if batch.is_typing() {
            if let Some(HistoryStep::Insert { batch: BatchKind::Typing, start: prev_start, len: prev_len }) =
                self.steps.last_mut()
            {
                if prev_start.block == start.block && prev_start.offset + *prev_len == start.offset {
                    *prev_len += len;
                    return;
                }
            }
        }
        self.steps.push(HistoryStep::Insert { batch, start, len });
    }

    pub fn record_split(&mut self, at: Position) {
        self.steps.push(HistoryStep::SplitBlock { at });
    }

    pub fn record_attribute(&mut self, range: TextRange, key: &str, previous: Vec<Option<String>>) {
        self.steps.push(HistoryStep::Attribute { range, key: key.to_string(), previous });
    }
}

/// Restore one attribute on a run of character attribute maps
pub(super) fn restore_attribute<'a>(
    attributes: impl Iterator<Item = &'a mut BTreeMap<String, String>>,
    key: &str,
    previous: &[Option<String>],
) {
    for (attrs, old) in attributes.zip(previous) {
        match old {
            Some(value) => {
                attrs.insert(key.to_string(), value.clone());
            }
            None => {
                attrs.remove(key);
            }
        }
    }
}
