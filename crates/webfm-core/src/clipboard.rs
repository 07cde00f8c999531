//! The cut/copy/paste clipboard.
//!
//! The clipboard records *intent*, not file contents: a source directory
//! path, the names taken from it, and a [`TransferMode`]. Pasting turns
//! the record into a file-service request against the current directory.
//! The record survives the paste, so the same clipboard can be pasted
//! into several directories.
//!
//! Persistence is behind the [`ClipboardStore`] trait so a host can keep
//! the record in a cookie or session store; [`MemoryClipboardStore`] is
//! the in-process implementation.

use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::listing::model::DirectoryModel;
use crate::path_join;
use crate::select::SelectionModel;
use crate::service::ActionRequest;

/// How clipboard contents transfer on paste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransferMode {
    /// Plain filesystem copy.
    Copy,
    /// Plain filesystem move.
    Move,
    /// Copy preserving version history.
    VersionCopy,
    /// Move preserving version history.
    VersionMove,
}

impl TransferMode {
    /// Whether this mode goes through the version-control layer, which
    /// requires a versioned destination.
    pub fn is_versioned(self) -> bool {
        matches!(self, TransferMode::VersionCopy | TransferMode::VersionMove)
    }

    /// The file-service action a paste in this mode dispatches.
    pub fn action_name(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
            TransferMode::VersionCopy => "svncopy",
            TransferMode::VersionMove => "svncut",
        }
    }
}

/// A stored clipboard entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardRecord {
    /// Directory the names were cut or copied from.
    pub source_path: String,
    /// Entry names within the source directory, in display order.
    pub names: Vec<String>,
    pub mode: TransferMode,
}

/// Backing storage for the clipboard record.
pub trait ClipboardStore {
    /// The current record, if one was stored.
    fn load(&self) -> CoreResult<Option<ClipboardRecord>>;
    /// Replaces the current record.
    fn store(&self, record: ClipboardRecord) -> CoreResult<()>;
}

/// Keeps the clipboard record in process memory.
#[derive(Debug, Default)]
pub struct MemoryClipboardStore {
    inner: Mutex<Option<ClipboardRecord>>,
}

impl MemoryClipboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardStore for MemoryClipboardStore {
    fn load(&self) -> CoreResult<Option<ClipboardRecord>> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn store(&self, record: ClipboardRecord) -> CoreResult<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(record);
        Ok(())
    }
}

/// The clipboard itself: records selections and builds paste requests.
#[derive(Debug)]
pub struct Clipboard<S: ClipboardStore> {
    store: S,
}

impl<S: ClipboardStore> Clipboard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The current record, if any.
    pub fn record(&self) -> CoreResult<Option<ClipboardRecord>> {
        self.store.load()
    }

    /// Records the selection for a plain move.
    pub fn cut(&self, dir: &DirectoryModel, sel: &SelectionModel) -> CoreResult<()> {
        self.take(dir, sel, TransferMode::Move)
    }

    /// Records the selection for a plain copy.
    pub fn copy(&self, dir: &DirectoryModel, sel: &SelectionModel) -> CoreResult<()> {
        self.take(dir, sel, TransferMode::Copy)
    }

    /// Records the selection for a history-preserving move.
    pub fn version_cut(&self, dir: &DirectoryModel, sel: &SelectionModel) -> CoreResult<()> {
        self.take(dir, sel, TransferMode::VersionMove)
    }

    /// Records the selection for a history-preserving copy.
    pub fn version_copy(&self, dir: &DirectoryModel, sel: &SelectionModel) -> CoreResult<()> {
        self.take(dir, sel, TransferMode::VersionCopy)
    }

    fn take(
        &self,
        dir: &DirectoryModel,
        sel: &SelectionModel,
        mode: TransferMode,
    ) -> CoreResult<()> {
        if sel.is_empty() {
            return Err(CoreError::EmptyClipboard);
        }
        let record = ClipboardRecord {
            source_path: dir.path().to_string(),
            names: sel.names().map(str::to_string).collect(),
            mode,
        };
        debug!(
            source = %record.source_path,
            count = record.names.len(),
            mode = ?record.mode,
            "clipboard updated"
        );
        self.store.store(record)
    }

    /// Builds the paste request for the clipboard against `dir`.
    ///
    /// The record is left in place so it can be pasted again.
    ///
    /// # Errors
    ///
    /// - [`CoreError::EmptyClipboard`] when nothing was cut or copied.
    /// - [`CoreError::NotVersioned`] when a version-preserving record
    ///   targets a directory that is not under version control.
    pub fn paste(&self, dir: &DirectoryModel) -> CoreResult<ActionRequest> {
        let record = self.record()?.ok_or(CoreError::EmptyClipboard)?;
        if record.mode.is_versioned() && !dir.under_version_control() {
            return Err(CoreError::NotVersioned(dir.path().to_string()));
        }
        let mut request = ActionRequest::new(record.mode.action_name());
        for name in &record.names {
            request = request.param("path", path_join(&[&record.source_path, name]));
        }
        Ok(request.param("dst", dir.path()))
    }
}
