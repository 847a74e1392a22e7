//! Checkbox selection over record ids, independent of paging.

use std::collections::HashSet;

use crate::record::RecordId;

/// Header checkbox state derived from a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Unchecked,
    Indeterminate,
    Checked,
}

/// Set of selected record ids.
///
/// Ids of records that have since been filtered out stay in the set until
/// cleared; every query tolerates them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: HashSet<RecordId>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: RecordId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replace the selection with exactly `ids`.
    pub fn select_all(&mut self, ids: impl IntoIterator<Item = RecordId>) {
        self.selected = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Select every id in `current`, or clear if they are already exactly
    /// selected.
    pub fn toggle_all(&mut self, current: &[RecordId]) {
        if self.is_all_selected(current) {
            self.clear();
        } else {
            self.select_all(current.iter().cloned());
        }
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.selected.contains(id)
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// `current` is non-empty and the selection is exactly its ids.
    pub fn is_all_selected(&self, current: &[RecordId]) -> bool {
        !current.is_empty()
            && self.selected.len() == current.len()
            && current.iter().all(|id| self.selected.contains(id))
    }

    /// Something is selected, but not exactly `current`.
    pub fn is_indeterminate(&self, current: &[RecordId]) -> bool {
        !self.selected.is_empty() && !self.is_all_selected(current)
    }

    pub fn check_state(&self, current: &[RecordId]) -> CheckState {
        if self.is_all_selected(current) {
            CheckState::Checked
        } else if self.is_indeterminate(current) {
            CheckState::Indeterminate
        } else {
            CheckState::Unchecked
        }
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<RecordId> {
        let mut ids: Vec<RecordId> = self.selected.iter().cloned().collect();
        ids.sort();
        ids
    }
}
