//! Selection set for bulk operations
//!
//! Keyed by record id so sorting and filtering never change what is selected,
//! only how much of it is visible.

use super::view::Record;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    ids: BTreeSet<String>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    /// Remove an id; unknown ids are ignored
    pub fn deselect(&mut self, id: &str) {
        self.ids.remove(id);
    }

    /// Flip membership, returning whether the id is now selected
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Add every currently visible id. Hidden selections are left as they are.
    pub fn select_all<'a, I>(&mut self, visible_ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.ids.extend(visible_ids.into_iter().map(str::to_string));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// How many of the visible ids are selected
    pub fn visible_count<'a, I>(&self, visible_ids: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        visible_ids
            .into_iter()
            .filter(|id| self.ids.contains(*id))
            .count()
    }

    /// Selected records that still exist in `records`, in base order.
    ///
    /// Ids with no matching record are skipped.
    pub fn resolve<'a, R: Record>(&self, records: &'a [R]) -> Vec<&'a R> {
        records
            .iter()
            .filter(|record| self.ids.contains(record.id()))
            .collect()
    }
}
