//! Set of selected record ids.
//!
//! The selection survives page navigation: selecting everything on one page
//! never touches ids selected on another.

use std::collections::BTreeSet;

use cnd_core::RecordId;

/// Selected record ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<RecordId>,
}

impl Selection {
    /// Add `id` if absent, remove it if present.
    pub fn toggle(&mut self, id: &RecordId) {
        if !self.ids.remove(id) {
            self.ids.insert(id.clone());
        }
    }

    /// Whether every id in `page` is selected. False for an empty page.
    pub fn contains_all<'a, I>(&self, page: I) -> bool
    where
        I: IntoIterator<Item = &'a RecordId>,
    {
        let mut any = false;
        for id in page {
            if !self.ids.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }

    /// Header-checkbox toggle: deselect exactly the page ids when all are
    /// selected, otherwise select all of them.
    pub fn toggle_page(&mut self, page: &[RecordId]) {
        if self.contains_all(page) {
            for id in page {
                self.ids.remove(id);
            }
        } else {
            self.ids.extend(page.iter().cloned());
        }
    }

    /// Whether `id` is selected.
    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    /// Drop every id for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&RecordId) -> bool) {
        self.ids.retain(|id| keep(id));
    }

    /// Deselect the given ids.
    pub fn remove_all(&mut self, ids: &[RecordId]) {
        for id in ids {
            self.ids.remove(id);
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in ascending order.
    pub fn ids(&self) -> Vec<RecordId> {
        self.ids.iter().cloned().collect()
    }
}
