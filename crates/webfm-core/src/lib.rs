//! WebFM core library — UI-agnostic file-browser logic.
//!
//! `webfm-core` is the client-side engine of the WebFM web file manager:
//! it decodes file-service responses, owns the directory/selection/sort
//! state, decides which actions the user may trigger, and builds the
//! requests those actions send. It is intentionally decoupled from any
//! rendering layer and any HTTP client, so hosts plug in a [`Transport`]
//! and consume [`ViewModel`]s.
//!
//! # Modules
//!
//! - [`listing`] — Response decoding, [`EntryDescriptor`], and the [`DirectoryModel`].
//! - [`select`] — The selection model, reconciled against every listing change.
//! - [`sort`] — Multi-key sorting with directories always grouped first.
//! - [`actions`] — The action-eligibility engine and action metadata registry.
//! - [`clipboard`] — The persisted cut/copy record and paste-request builder.
//! - [`service`] — The [`Browser`] session: navigation, action dispatch, views.
//! - [`home`] — The composite home view spliced from subject enrollments.
//! - [`config`] — User-facing configuration (TOML-based settings).
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod actions;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod home;
pub mod listing;
pub mod select;
pub mod service;
pub mod sort;

pub use error::{CoreError, CoreResult};

pub use actions::{
    compute_actions, ActionCategory, ActionDescriptor, ActionId, ActionRegistry, ActionState,
};
pub use clipboard::{Clipboard, ClipboardRecord, ClipboardStore, MemoryClipboardStore, TransferMode};
pub use config::Config;
pub use home::{AreaStatus, Enrollment, HomeArea, HomeItem};
pub use listing::{
    decode_response, Decoded, DirectoryListing, DirectoryModel, EntryDescriptor, FileDescriptor,
    HandlerKind, ModifiedAt, Response, VersionStatus,
};
pub use select::SelectionModel;
pub use service::{
    ActionOutcome, ActionRequest, Browser, NavigationOutcome, Transport, ViewModel,
};
pub use sort::{SortField, SortSpec};

/// Normalises a string to NFC (composed) form.
///
/// macOS browsers submit filenames in NFD (decomposed), which makes
/// Korean Hangul appear as individual Jamo. Listing names are re-composed
/// on decode so lookups and selection keys agree.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}

/// Joins path segments with `/`, skipping empty segments and collapsing
/// redundant separators at the joins.
pub fn path_join(segments: &[&str]) -> String {
    let mut path = String::new();
    for segment in segments {
        let segment = segment.trim_matches('/');
        if segment.is_empty() {
            continue;
        }
        if !path.is_empty() {
            path.push('/');
        }
        path.push_str(segment);
    }
    path
}

/// Percent-encodes a path for use in an href, segment by segment, so the
/// separators stay intact while everything else is escaped.
pub fn urlencode_path(path: &str) -> String {
    use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
    const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'_')
        .remove(b'.')
        .remove(b'~');
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}
