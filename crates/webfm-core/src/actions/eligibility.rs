//! Action eligibility: the pure function from model + selection to the
//! enabled/disabled state of every user action.
//!
//! [`compute_actions`] is total — it is defined for every reachable pair
//! of [`DirectoryModel`] and [`SelectionModel`], including empty listings
//! and fully unversioned directories — and its output map is the sole
//! contract renderers may read to decide what the user can click. Rules
//! are independent of one another; no action's state depends on another
//! action's state.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::listing::entry::{EntryDescriptor, VersionStatus};
use crate::listing::model::DirectoryModel;
use crate::select::SelectionModel;
use crate::{path_join, urlencode_path};

/// Every user-triggerable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionId {
    Open,
    Serve,
    Run,
    Download,
    Publish,
    Unpublish,
    Share,
    Rename,
    Delete,
    Cut,
    Copy,
    Paste,
    NewFile,
    NewDirectory,
    Upload,
    VersionAdd,
    VersionRemove,
    VersionRevert,
    VersionCopy,
    VersionCut,
    VersionCommit,
    VersionDiff,
    VersionUpdate,
    VersionLog,
    VersionCleanup,
    VersionResolved,
    Submit,
}

impl ActionId {
    /// The file-service action name for mutating actions; `None` for
    /// actions that navigate via an href instead of POSTing.
    pub fn service_name(self) -> Option<&'static str> {
        match self {
            ActionId::Rename => Some("move"),
            ActionId::Delete => Some("remove"),
            ActionId::Cut => Some("cut"),
            ActionId::Copy => Some("copy"),
            ActionId::Paste => Some("paste"),
            ActionId::NewFile => Some("putfile"),
            ActionId::NewDirectory => Some("mkdir"),
            ActionId::Upload => Some("putfile"),
            ActionId::Publish => Some("publish"),
            ActionId::Unpublish => Some("unpublish"),
            ActionId::VersionAdd => Some("svnadd"),
            ActionId::VersionRemove => Some("svnremove"),
            ActionId::VersionRevert => Some("svnrevert"),
            ActionId::VersionCopy => Some("svncopy"),
            ActionId::VersionCut => Some("svncut"),
            ActionId::VersionCommit => Some("svncommit"),
            ActionId::VersionDiff => Some("svndiff"),
            ActionId::VersionUpdate => Some("svnupdate"),
            ActionId::VersionLog => Some("svnlog"),
            ActionId::VersionCleanup => Some("svncleanup"),
            ActionId::VersionResolved => Some("svnresolved"),
            ActionId::Submit => Some("submit"),
            ActionId::Open
            | ActionId::Serve
            | ActionId::Run
            | ActionId::Download
            | ActionId::Share => None,
        }
    }

    /// All action identifiers, in map order.
    pub fn all() -> [ActionId; 27] {
        [
            ActionId::Open,
            ActionId::Serve,
            ActionId::Run,
            ActionId::Download,
            ActionId::Publish,
            ActionId::Unpublish,
            ActionId::Share,
            ActionId::Rename,
            ActionId::Delete,
            ActionId::Cut,
            ActionId::Copy,
            ActionId::Paste,
            ActionId::NewFile,
            ActionId::NewDirectory,
            ActionId::Upload,
            ActionId::VersionAdd,
            ActionId::VersionRemove,
            ActionId::VersionRevert,
            ActionId::VersionCopy,
            ActionId::VersionCut,
            ActionId::VersionCommit,
            ActionId::VersionDiff,
            ActionId::VersionUpdate,
            ActionId::VersionLog,
            ActionId::VersionCleanup,
            ActionId::VersionResolved,
            ActionId::Submit,
        ]
    }
}

/// The derived state of a single action. Recomputed on every model or
/// selection change, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionState {
    pub enabled: bool,
    /// Target href or path parameter, when the action carries one.
    pub target: Option<String>,
    /// Confirmation prompt the renderer must show before dispatching.
    pub confirm: Option<String>,
}

impl ActionState {
    fn off() -> Self {
        Self {
            enabled: false,
            target: None,
            confirm: None,
        }
    }

    fn on() -> Self {
        Self {
            enabled: true,
            target: None,
            confirm: None,
        }
    }

    fn on_at(target: String) -> Self {
        Self {
            enabled: true,
            target: Some(target),
            confirm: None,
        }
    }

    fn when(enabled: bool) -> Self {
        if enabled {
            Self::on()
        } else {
            Self::off()
        }
    }
}

/// Characters kept verbatim when encoding a name into a batch target:
/// the RFC 3986 unreserved set. Everything else — comma and `/`
/// included — is escaped, so the comma separator is unambiguous.
const NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Encodes an ordered list of names into a single batch-target string.
/// Each name is percent-encoded independently and joined with commas.
pub fn encode_names<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| utf8_percent_encode(name, NAME_ENCODE_SET).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Decodes a batch-target string back into the original ordered names.
///
/// # Errors
///
/// [`CoreError::InvalidName`] if a component is not valid percent-encoded
/// UTF-8.
pub fn decode_names(encoded: &str) -> CoreResult<Vec<String>> {
    if encoded.is_empty() {
        return Ok(Vec::new());
    }
    encoded
        .split(',')
        .map(|part| {
            percent_decode_str(part)
                .decode_utf8()
                .map(|s| s.into_owned())
                .map_err(|_| CoreError::InvalidName(part.to_string()))
        })
        .collect()
}

/// Resolves the "single versioned path" precondition shared by the
/// inspection commands: exactly one selected entry whose status is
/// versioned, or an empty selection with a versioned directory. Pass
/// `allow_revision` for commands that also work on history.
fn single_versioned<'a>(
    dir: &'a DirectoryModel,
    sel: &'a SelectionModel,
    allow_revision: bool,
) -> Option<&'a EntryDescriptor> {
    let entry = match sel.count() {
        0 => dir.entry(None)?,
        1 => dir.entry(sel.sole())?,
        _ => return None,
    };
    let status = entry.version_status()?;
    if !status.is_versioned() {
        return None;
    }
    if status == VersionStatus::Revision && !allow_revision {
        return None;
    }
    Some(entry)
}

/// An href into an application, with the revision carried along when the
/// model reflects a historical snapshot.
fn app_href(app: &str, dir: &DirectoryModel, name: Option<&str>) -> String {
    let mut href = urlencode_path(&path_join(&[app, dir.path(), name.unwrap_or("")]));
    if let Some(rev) = dir.revision() {
        href.push_str(&format!("?r={rev}"));
    }
    href
}

/// Computes the state of every action for the given model and selection.
pub fn compute_actions(
    dir: &DirectoryModel,
    sel: &SelectionModel,
    config: &Config,
) -> BTreeMap<ActionId, ActionState> {
    let n = sel.count();
    let sole = sel.sole();
    let subject: Option<&EntryDescriptor> = match n {
        0 => dir.entry(None),
        1 => dir.entry(sole),
        _ => None,
    };
    let subject_name = if n == 1 { sole } else { None };
    let revision = dir.is_revision();
    let has_status = dir.has_version_status();
    let all_versioned = sel.all_versioned(dir);
    let svc = &config.service;

    let mut map = BTreeMap::new();

    // Open: any single entry, at the active revision.
    map.insert(
        ActionId::Open,
        match sole {
            Some(name) => ActionState::on_at(app_href(&svc.files_app, dir, Some(name))),
            None => ActionState::off(),
        },
    );

    // Serve and run: a single non-directory, never on a historical copy.
    let servable = subject.is_some_and(|s| {
        !s.is_dir() && s.version_status() != Some(VersionStatus::Revision)
    }) && !revision;
    map.insert(
        ActionId::Serve,
        if servable {
            ActionState::on_at(app_href(&svc.serve_app, dir, subject_name))
        } else {
            ActionState::off()
        },
    );
    let runnable = servable
        && subject
            .and_then(EntryDescriptor::mime_type)
            .is_some_and(|t| config.types.is_executable(t));
    map.insert(
        ActionId::Run,
        if runnable {
            ActionState::on_at(app_href(&svc.serve_app, dir, subject_name))
        } else {
            ActionState::off()
        },
    );

    // Download: blocked only for historical revisions. Multi-select
    // downloads a batch archive; a directory subject downloads as an
    // archive of the directory.
    map.insert(
        ActionId::Download,
        if revision {
            ActionState::off()
        } else if n > 1 {
            let base = urlencode_path(&path_join(&[&svc.download_app, dir.path()]));
            ActionState::on_at(format!("{base}?files={}", encode_names(sel.names())))
        } else {
            ActionState::on_at(app_href(&svc.download_app, dir, subject_name))
        },
    );

    // Publish/unpublish: a single directory subject; which of the two is
    // live toggles on the published flag.
    let dir_subject = n <= 1 && subject.is_some_and(EntryDescriptor::is_dir);
    let published = subject.and_then(EntryDescriptor::published) == Some(true);
    map.insert(
        ActionId::Publish,
        ActionState::when(dir_subject && !published),
    );
    map.insert(
        ActionId::Unpublish,
        ActionState::when(dir_subject && published),
    );

    // Share: a single file inside a published directory.
    let shareable = n == 1
        && subject.is_some_and(|s| !s.is_dir())
        && dir.self_descriptor().published() == Some(true);
    map.insert(
        ActionId::Share,
        if shareable {
            ActionState::on_at(app_href(&svc.serve_app, dir, subject_name))
        } else {
            ActionState::off()
        },
    );

    // Rename: exactly one entry.
    map.insert(
        ActionId::Rename,
        match sole {
            Some(name) => ActionState::on_at(name.to_string()),
            None => ActionState::off(),
        },
    );

    // Delete, cut, copy: any non-empty selection.
    map.insert(
        ActionId::Delete,
        if n >= 1 {
            ActionState {
                enabled: true,
                target: None,
                confirm: config.general.confirm_delete.then(|| {
                    if n == 1 {
                        "Are you sure you want to delete 1 file?".to_string()
                    } else {
                        format!("Are you sure you want to delete {n} files?")
                    }
                }),
            }
        } else {
            ActionState::off()
        },
    );
    map.insert(ActionId::Cut, ActionState::when(n >= 1));
    map.insert(ActionId::Copy, ActionState::when(n >= 1));

    // Paste, new file, new directory, upload: act on the directory
    // itself, independent of selection.
    let dir_writable = dir.self_descriptor().is_dir();
    map.insert(ActionId::Paste, ActionState::when(dir_writable));
    map.insert(ActionId::NewFile, ActionState::when(dir_writable));
    map.insert(ActionId::NewDirectory, ActionState::when(dir_writable));
    map.insert(ActionId::Upload, ActionState::when(dir_writable));

    // Version-control actions over the selection.
    map.insert(
        ActionId::VersionAdd,
        ActionState::when(n >= 1 && has_status),
    );
    for id in [
        ActionId::VersionRemove,
        ActionId::VersionRevert,
        ActionId::VersionCopy,
        ActionId::VersionCut,
    ] {
        map.insert(id, ActionState::when(n >= 1 && has_status && all_versioned));
    }
    map.insert(
        ActionId::VersionCommit,
        ActionState::when(has_status && (n == 0 || all_versioned)),
    );

    // Inspection commands over a single versioned path.
    let single = single_versioned(dir, sel, false);
    let single_hist = single_versioned(dir, sel, true);
    map.insert(
        ActionId::VersionDiff,
        ActionState::when(single.is_some()),
    );
    map.insert(
        ActionId::VersionUpdate,
        ActionState::when(single.is_some()),
    );
    // Log and cleanup also work on history.
    map.insert(
        ActionId::VersionLog,
        ActionState::when(single_hist.is_some()),
    );
    map.insert(
        ActionId::VersionCleanup,
        ActionState::when(single_hist.is_some()),
    );

    // Resolved: a single conflicted entry.
    let conflicted = n == 1
        && subject.is_some_and(|s| s.version_status() == Some(VersionStatus::Conflicted));
    map.insert(ActionId::VersionResolved, ActionState::when(conflicted));

    // Submit: the single versioned path must live under the submission
    // repository namespace.
    let submit = svc.submission_base.as_deref().and_then(|base| {
        single.and_then(|entry| {
            entry
                .version_url()
                .and_then(|url| url.strip_prefix(base))
                .map(|rest| rest.trim_start_matches('/').to_string())
        })
    });
    map.insert(
        ActionId::Submit,
        match submit {
            Some(rest) => ActionState::on_at(rest),
            None => ActionState::off(),
        },
    );

    map
}
