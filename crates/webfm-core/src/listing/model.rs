//! The directory model: the client's view of the directory being browsed.
//!
//! One [`DirectoryModel`] instance is owned by the browser session and
//! replaced wholesale on every navigation — there is no ambient global
//! listing state. Callers resolve entries through [`DirectoryModel::entry`]
//! so the "zero selected means the directory itself is the subject" rule
//! lives in exactly one place.

use std::collections::BTreeMap;

use tracing::warn;

use crate::listing::decode::DirectoryListing;
use crate::listing::entry::{EntryDescriptor, VersionStatus};

/// The current directory: its path, its own descriptor, its entries and
/// the revision when browsing history.
#[derive(Debug, Clone)]
pub struct DirectoryModel {
    path: String,
    self_descriptor: EntryDescriptor,
    entries: BTreeMap<String, EntryDescriptor>,
    revision: Option<u64>,
}

impl Default for DirectoryModel {
    /// An empty, unversioned directory at the root path. Used before the
    /// first navigation settles so view computation is always defined.
    fn default() -> Self {
        Self {
            path: String::new(),
            self_descriptor: EntryDescriptor::directory(),
            entries: BTreeMap::new(),
            revision: None,
        }
    }
}

/// Strips any trailing separators; the model path never ends in `/`.
fn normalize_path(path: &str) -> String {
    path.trim_end_matches('/').to_string()
}

impl DirectoryModel {
    /// Builds a model from a decoded listing.
    ///
    /// A listing whose entries carry version statuses while `"."` does not
    /// is defective input (a directory cannot be partially versioned at
    /// the level it is browsed from); the entry statuses are stripped with
    /// a warning so the invariant holds for every downstream consumer.
    pub fn new(path: &str, listing: DirectoryListing) -> Self {
        let DirectoryListing {
            self_descriptor,
            mut entries,
            revision,
        } = listing;

        if self_descriptor.version_status().is_none()
            && entries.values().any(|e| e.version_status().is_some())
        {
            warn!(path, "listing is partially versioned; stripping entry statuses");
            for entry in entries.values_mut() {
                entry.clear_version_status();
            }
        }

        Self {
            path: normalize_path(path),
            self_descriptor,
            entries,
            revision,
        }
    }

    /// Atomically swaps in a new listing for a (possibly different) path.
    pub fn replace(&mut self, path: &str, listing: DirectoryListing) {
        *self = Self::new(path, listing);
    }

    /// The normalized path of this directory (no trailing separator).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The directory's own descriptor (the `"."` entry).
    pub fn self_descriptor(&self) -> &EntryDescriptor {
        &self.self_descriptor
    }

    /// The entries of this directory, keyed by name. Never contains `"."`.
    pub fn entries(&self) -> &BTreeMap<String, EntryDescriptor> {
        &self.entries
    }

    /// Resolves the subject of an action: a named entry, or the directory
    /// itself when `name` is `None` (empty selection).
    pub fn entry(&self, name: Option<&str>) -> Option<&EntryDescriptor> {
        match name {
            Some(name) => self.entries.get(name),
            None => Some(&self.self_descriptor),
        }
    }

    /// The revision identifier when this listing is a historical snapshot.
    pub fn revision(&self) -> Option<u64> {
        self.revision
    }

    /// Whether the listing reflects a historical revision rather than the
    /// live working copy.
    pub fn is_revision(&self) -> bool {
        self.revision.is_some()
            || self.self_descriptor.version_status() == Some(VersionStatus::Revision)
    }

    /// Whether the directory's `"."` descriptor carries any version
    /// status at all (including `unversioned`).
    pub fn has_version_status(&self) -> bool {
        self.self_descriptor.version_status().is_some()
    }

    /// Whether the directory itself is under version control.
    pub fn under_version_control(&self) -> bool {
        self.self_descriptor.is_versioned()
    }
}
