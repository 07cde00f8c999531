//! Entry descriptors as delivered by the file service.
//!
//! An [`EntryDescriptor`] is the client-side view of one file or directory
//! inside a listing. Every field the server may omit is an `Option` — the
//! absent/present distinction is part of the wire contract and several
//! eligibility rules depend on it, so it is never collapsed into a default.

use serde::Deserialize;

/// The version-control status of a single entry.
///
/// A directory listing either carries a status for every entry or for
/// none of them; an entry without a status is outside version control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Present on disk but not a versioned item in this working copy.
    Unversioned,
    /// Versioned and unmodified.
    Normal,
    /// Scheduled for addition.
    Added,
    /// Under version control but absent from the working copy.
    Missing,
    /// Scheduled for deletion.
    Deleted,
    /// Deleted and then re-added.
    Replaced,
    /// Text or properties modified locally.
    Modified,
    /// Local modifications merged with repository changes.
    Merged,
    /// Local modifications conflict with repository changes.
    Conflicted,
    /// Part of a historical revision snapshot, not the working copy.
    Revision,
    /// Marked as ignored.
    Ignored,
}

impl VersionStatus {
    /// Whether this status counts as "under version control" for the
    /// eligibility rules. `Unversioned` and `Ignored` do not.
    pub fn is_versioned(self) -> bool {
        !matches!(self, VersionStatus::Unversioned | VersionStatus::Ignored)
    }

    /// The wire spelling of this status.
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Unversioned => "unversioned",
            VersionStatus::Normal => "normal",
            VersionStatus::Added => "added",
            VersionStatus::Missing => "missing",
            VersionStatus::Deleted => "deleted",
            VersionStatus::Replaced => "replaced",
            VersionStatus::Modified => "modified",
            VersionStatus::Merged => "merged",
            VersionStatus::Conflicted => "conflicted",
            VersionStatus::Revision => "revision",
            VersionStatus::Ignored => "ignored",
        }
    }
}

/// A modification timestamp with its two server-rendered forms.
///
/// The three wire fields (`mtime`, `mtime_short`, `mtime_nice`) are present
/// together or not at all; a partial trio is rejected at decode time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifiedAt {
    /// Seconds since the Unix epoch.
    pub epoch: i64,
    /// Short rendering for the listing column.
    pub short: String,
    /// Detailed rendering for the side panel.
    pub detailed: String,
}

/// One file or directory within a listing.
///
/// The entry name is not part of the descriptor — names are the keys of
/// the containing listing map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WireEntry")]
pub struct EntryDescriptor {
    is_dir: bool,
    mime_type: Option<String>,
    size: Option<u64>,
    modified: Option<ModifiedAt>,
    version_status: Option<VersionStatus>,
    published: Option<bool>,
    version_url: Option<String>,
}

/// Raw wire shape, validated into an [`EntryDescriptor`].
#[derive(Debug, Deserialize)]
struct WireEntry {
    #[serde(rename = "isdir", default)]
    isdir: bool,
    #[serde(rename = "type", default)]
    mime_type: Option<String>,
    #[serde(default)]
    size: Option<u64>,
    #[serde(default)]
    mtime: Option<i64>,
    #[serde(default)]
    mtime_short: Option<String>,
    #[serde(default)]
    mtime_nice: Option<String>,
    #[serde(rename = "svnstatus", default)]
    svnstatus: Option<VersionStatus>,
    #[serde(default)]
    published: Option<bool>,
    #[serde(rename = "svnurl", default)]
    svnurl: Option<String>,
}

impl TryFrom<WireEntry> for EntryDescriptor {
    type Error = String;

    fn try_from(wire: WireEntry) -> Result<Self, Self::Error> {
        let modified = match (wire.mtime, wire.mtime_short, wire.mtime_nice) {
            (Some(epoch), Some(short), Some(detailed)) => Some(ModifiedAt {
                epoch,
                short,
                detailed,
            }),
            (None, None, None) => None,
            _ => {
                return Err("mtime, mtime_short and mtime_nice must be present together".into());
            }
        };
        Ok(EntryDescriptor {
            is_dir: wire.isdir,
            mime_type: wire.mime_type,
            size: wire.size,
            modified,
            version_status: wire.svnstatus,
            published: wire.published,
            version_url: wire.svnurl,
        })
    }
}

impl EntryDescriptor {
    /// A plain file descriptor with the given MIME type and size.
    pub fn file(mime_type: impl Into<String>, size: u64) -> Self {
        Self {
            is_dir: false,
            mime_type: Some(mime_type.into()),
            size: Some(size),
            modified: None,
            version_status: None,
            published: None,
            version_url: None,
        }
    }

    /// A plain directory descriptor.
    pub fn directory() -> Self {
        Self {
            is_dir: true,
            mime_type: None,
            size: None,
            modified: None,
            version_status: None,
            published: None,
            version_url: None,
        }
    }

    /// Returns a copy with the given version status.
    pub fn with_status(mut self, status: VersionStatus) -> Self {
        self.version_status = Some(status);
        self
    }

    /// Returns a copy with the published flag set (directories only).
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = Some(published);
        self
    }

    /// Returns a copy with the given repository URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.version_url = Some(url.into());
        self
    }

    /// Returns a copy with the given modification timestamp.
    pub fn with_modified(mut self, modified: ModifiedAt) -> Self {
        self.modified = Some(modified);
        self
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// The MIME type as reported by the server. Absent for directories.
    pub fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    /// The MIME type used for icons and sorting: directories get the
    /// synthesized `text/directory` pseudo-type, files without a reported
    /// type fall back to `text/plain`.
    pub fn display_mime_type(&self) -> &str {
        if self.is_dir {
            "text/directory"
        } else {
            self.mime_type.as_deref().unwrap_or("text/plain")
        }
    }

    /// Size in bytes. Directories may omit it.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Modification time, if the server reported one.
    pub fn modified(&self) -> Option<&ModifiedAt> {
        self.modified.as_ref()
    }

    /// The raw version status. `None` means the containing directory is
    /// not under version control.
    pub fn version_status(&self) -> Option<VersionStatus> {
        self.version_status
    }

    /// Whether this entry is under version control: status present and
    /// not `unversioned`/`ignored`. Entries without a status never
    /// satisfy versioned predicates.
    pub fn is_versioned(&self) -> bool {
        self.version_status.is_some_and(VersionStatus::is_versioned)
    }

    /// The published flag. Only meaningful for directories; `None` when
    /// the server did not report it.
    pub fn published(&self) -> Option<bool> {
        self.published
    }

    /// The entry's canonical location in the version-control repository.
    pub fn version_url(&self) -> Option<&str> {
        self.version_url.as_deref()
    }

    /// Drops the version status. Used to repair listings that violate the
    /// "no partially versioned directory" contract.
    pub(crate) fn clear_version_status(&mut self) {
        self.version_status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_descriptor_basics() {
        let entry = EntryDescriptor::file("text/plain", 42);
        assert!(!entry.is_dir());
        assert_eq!(entry.mime_type(), Some("text/plain"));
        assert_eq!(entry.size(), Some(42));
        assert_eq!(entry.version_status(), None);
        assert!(!entry.is_versioned());
    }

    #[test]
    fn directory_descriptor_basics() {
        let entry = EntryDescriptor::directory();
        assert!(entry.is_dir());
        assert_eq!(entry.mime_type(), None);
        assert_eq!(entry.size(), None);
        assert_eq!(entry.published(), None);
    }

    #[test]
    fn display_mime_type_synthesized_for_directories() {
        assert_eq!(
            EntryDescriptor::directory().display_mime_type(),
            "text/directory"
        );
    }

    #[test]
    fn display_mime_type_falls_back_for_untyped_files() {
        let entry = EntryDescriptor {
            mime_type: None,
            ..EntryDescriptor::file("x", 0)
        };
        assert_eq!(entry.display_mime_type(), "text/plain");
    }

    #[test]
    fn is_versioned_rejects_unversioned_and_ignored() {
        let file = EntryDescriptor::file("text/plain", 1);
        assert!(!file.clone().with_status(VersionStatus::Unversioned).is_versioned());
        assert!(!file.clone().with_status(VersionStatus::Ignored).is_versioned());
        assert!(file.clone().with_status(VersionStatus::Normal).is_versioned());
        assert!(file.clone().with_status(VersionStatus::Conflicted).is_versioned());
        assert!(file.with_status(VersionStatus::Revision).is_versioned());
    }

    #[test]
    fn deserialize_full_file_entry() {
        let json = r#"{
            "isdir": false,
            "type": "text/x-python",
            "size": 1234,
            "mtime": 1199145600,
            "mtime_short": "Jan 1",
            "mtime_nice": "Tue Jan  1 00:00:00 2008",
            "svnstatus": "modified",
            "svnurl": "svn://repo/users/alice/work/frog.py"
        }"#;
        let entry: EntryDescriptor = serde_json::from_str(json).unwrap();
        assert!(!entry.is_dir());
        assert_eq!(entry.mime_type(), Some("text/x-python"));
        assert_eq!(entry.size(), Some(1234));
        assert_eq!(entry.version_status(), Some(VersionStatus::Modified));
        assert_eq!(
            entry.version_url(),
            Some("svn://repo/users/alice/work/frog.py")
        );
        let modified = entry.modified().unwrap();
        assert_eq!(modified.epoch, 1199145600);
        assert_eq!(modified.short, "Jan 1");
    }

    #[test]
    fn deserialize_minimal_directory_entry() {
        let entry: EntryDescriptor = serde_json::from_str(r#"{"isdir": true}"#).unwrap();
        assert!(entry.is_dir());
        assert_eq!(entry.modified(), None);
        assert_eq!(entry.version_status(), None);
    }

    #[test]
    fn deserialize_published_directory() {
        let entry: EntryDescriptor =
            serde_json::from_str(r#"{"isdir": true, "published": true}"#).unwrap();
        assert_eq!(entry.published(), Some(true));
    }

    #[test]
    fn deserialize_rejects_partial_mtime_trio() {
        let json = r#"{"isdir": false, "mtime": 1199145600, "mtime_short": "Jan 1"}"#;
        let result: Result<EntryDescriptor, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn deserialize_unknown_status_is_an_error() {
        let json = r#"{"isdir": false, "svnstatus": "obstructed!"}"#;
        let result: Result<EntryDescriptor, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn status_wire_spelling_round_trips() {
        for status in [
            VersionStatus::Unversioned,
            VersionStatus::Normal,
            VersionStatus::Added,
            VersionStatus::Missing,
            VersionStatus::Deleted,
            VersionStatus::Replaced,
            VersionStatus::Modified,
            VersionStatus::Merged,
            VersionStatus::Conflicted,
            VersionStatus::Revision,
            VersionStatus::Ignored,
        ] {
            let json = format!("\"{}\"", status.as_str());
            let parsed: VersionStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn clear_version_status_drops_status() {
        let mut entry = EntryDescriptor::file("text/plain", 1).with_status(VersionStatus::Normal);
        entry.clear_version_status();
        assert_eq!(entry.version_status(), None);
    }
}
