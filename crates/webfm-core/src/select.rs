//! The selection model: which entries the user has ticked.
//!
//! Selection only ever grows or shrinks through explicit user toggles,
//! with one exception: [`SelectionModel::reconcile`] drops names that
//! vanished from the listing after a navigation or action refresh. The
//! browser session calls it on every listing replacement so the selection
//! is always a subset of the live entries.

use std::collections::BTreeSet;

use crate::listing::model::DirectoryModel;

/// The set of currently selected entry names.
///
/// An empty selection means the directory itself is the implicit subject
/// of single-target actions; see [`DirectoryModel::entry`].
#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    selected: BTreeSet<String>,
}

impl SelectionModel {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggles a single name in or out of the selection.
    pub fn toggle(&mut self, name: &str) {
        if !self.selected.remove(name) {
            self.selected.insert(name.to_string());
        }
    }

    /// Clears the selection and selects exactly `name`.
    pub fn select_only(&mut self, name: &str) {
        self.selected.clear();
        self.selected.insert(name.to_string());
    }

    /// Selects every given name.
    pub fn select_all<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected.extend(names.into_iter().map(Into::into));
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Drops every selected name that is not in the live listing.
    ///
    /// Called whenever the directory model replaces its listing; this is
    /// the only place the selection shrinks without user action.
    pub fn reconcile(&mut self, dir: &DirectoryModel) {
        self.selected.retain(|name| dir.entries().contains_key(name));
    }

    /// Number of selected entries.
    pub fn count(&self) -> usize {
        self.selected.len()
    }

    /// `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// `true` when `name` is selected.
    pub fn contains(&self, name: &str) -> bool {
        self.selected.contains(name)
    }

    /// The single selected name, when exactly one entry is selected.
    pub fn sole(&self) -> Option<&str> {
        if self.selected.len() == 1 {
            self.selected.iter().next().map(String::as_str)
        } else {
            None
        }
    }

    /// Iterates the selected names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.selected.iter().map(String::as_str)
    }

    /// Total size in bytes of the selected entries, or of the whole
    /// listing when the selection is empty. Entries without a size
    /// contribute nothing.
    pub fn total_size(&self, dir: &DirectoryModel) -> u64 {
        if self.selected.is_empty() {
            dir.entries().values().filter_map(|e| e.size()).sum()
        } else {
            self.selected
                .iter()
                .filter_map(|name| dir.entry(Some(name)))
                .filter_map(|e| e.size())
                .sum()
        }
    }

    /// `true` iff every selected entry is under version control.
    ///
    /// Vacuously true for an empty selection; eligibility rules that care
    /// pair this with their own cardinality requirement.
    pub fn all_versioned(&self, dir: &DirectoryModel) -> bool {
        self.selected
            .iter()
            .all(|name| dir.entry(Some(name)).is_some_and(|e| e.is_versioned()))
    }
}
