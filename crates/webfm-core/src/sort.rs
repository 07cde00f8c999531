//! Multi-key sorting of directory listings.
//!
//! A [`SortSpec`] holds a prioritized list of fields — the most recently
//! chosen field is last in the list and has the highest priority — plus a
//! single ascending/descending flag for the whole spec. Directories are
//! never interleaved with files: they always sort first, whatever the
//! direction, which only reorders entries within each group.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::listing::entry::EntryDescriptor;

/// A field entries can be compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Lexicographic on the entry name.
    Filename,
    /// File size in bytes; entries without a size sort last.
    Size,
    /// Modification time; entries without one sort last.
    Modified,
    /// MIME type, with the directory pseudo-type for directories.
    MimeType,
}

impl SortField {
    /// Parses the identifier used in configuration files and column links.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "filename" => Some(SortField::Filename),
            "size" => Some(SortField::Size),
            "modified" => Some(SortField::Modified),
            "type" => Some(SortField::MimeType),
            _ => None,
        }
    }

    /// The identifier for this field.
    pub fn id(self) -> &'static str {
        match self {
            SortField::Filename => "filename",
            SortField::Size => "size",
            SortField::Modified => "modified",
            SortField::MimeType => "type",
        }
    }
}

/// The current sort order: key priorities and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    /// Sort keys; the list is consumed back-to-front, so the last element
    /// is the primary key.
    order: Vec<SortField>,
    /// Direction for the whole spec.
    ascending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            order: vec![SortField::Filename],
            ascending: true,
        }
    }
}

impl SortSpec {
    /// A spec with the single given primary key, ascending.
    pub fn by(field: SortField) -> Self {
        Self {
            order: vec![field],
            ascending: true,
        }
    }

    /// The current primary key.
    pub fn primary(&self) -> Option<SortField> {
        self.order.last().copied()
    }

    /// Whether the direction is ascending.
    pub fn ascending(&self) -> bool {
        self.ascending
    }

    /// Responds to the user picking a sort field.
    ///
    /// Picking the field that is already the primary key flips the
    /// direction and nothing else; picking any other field promotes it to
    /// primary (keeping the old keys as tie-breakers) and resets the
    /// direction to ascending.
    pub fn choose(&mut self, field: SortField) {
        if self.primary() == Some(field) {
            self.ascending = !self.ascending;
        } else {
            self.order.retain(|f| *f != field);
            self.order.push(field);
            self.ascending = true;
        }
    }
}

/// Orders a listing for display, returning entry names.
///
/// The sort is stable; entries that tie on every key keep their incoming
/// (lexicographic) order. Missing field values sort after present ones
/// regardless of direction, and the directory/file partition is likewise
/// unaffected by direction.
pub fn sort(entries: &BTreeMap<String, EntryDescriptor>, spec: &SortSpec) -> Vec<String> {
    let mut items: Vec<(&String, &EntryDescriptor)> = entries.iter().collect();
    items.sort_by(|a, b| {
        let dir_cmp = b.1.is_dir().cmp(&a.1.is_dir());
        if dir_cmp != Ordering::Equal {
            return dir_cmp;
        }
        for field in spec.order.iter().rev() {
            let ord = compare_on(a, b, *field, spec.ascending);
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    items.into_iter().map(|(name, _)| name.clone()).collect()
}

fn compare_on(
    a: &(&String, &EntryDescriptor),
    b: &(&String, &EntryDescriptor),
    field: SortField,
    ascending: bool,
) -> Ordering {
    match field {
        SortField::Filename => directed(a.0.cmp(b.0), ascending),
        SortField::Size => optional(a.1.size(), b.1.size(), ascending),
        SortField::Modified => optional(
            a.1.modified().map(|m| m.epoch),
            b.1.modified().map(|m| m.epoch),
            ascending,
        ),
        SortField::MimeType => optional(
            mime_key(a.1),
            mime_key(b.1),
            ascending,
        ),
    }
}

fn mime_key(entry: &EntryDescriptor) -> Option<&str> {
    if entry.is_dir() {
        Some(entry.display_mime_type())
    } else {
        entry.mime_type()
    }
}

fn directed(ord: Ordering, ascending: bool) -> Ordering {
    if ascending {
        ord
    } else {
        ord.reverse()
    }
}

/// Compares optional values: absent sorts after present independent of
/// direction; two present values compare normally.
fn optional<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => directed(a.cmp(&b), ascending),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listing::entry::ModifiedAt;

    fn file(size: u64) -> EntryDescriptor {
        EntryDescriptor::file("text/plain", size)
    }

    fn dated(size: u64, epoch: i64) -> EntryDescriptor {
        file(size).with_modified(ModifiedAt {
            epoch,
            short: "short".into(),
            detailed: "detailed".into(),
        })
    }

    fn listing(entries: &[(&str, EntryDescriptor)]) -> BTreeMap<String, EntryDescriptor> {
        entries
            .iter()
            .map(|(n, e)| (n.to_string(), e.clone()))
            .collect()
    }

    fn sample() -> BTreeMap<String, EntryDescriptor> {
        listing(&[
            ("banana.txt", file(5)),
            ("apple.rs", file(2)),
            ("cherry.md", file(10)),
            ("docs", EntryDescriptor::directory()),
            ("src", EntryDescriptor::directory()),
        ])
    }

    #[test]
    fn filename_ascending_with_dirs_first() {
        let names = sort(&sample(), &SortSpec::default());
        assert_eq!(names, vec!["docs", "src", "apple.rs", "banana.txt", "cherry.md"]);
    }

    #[test]
    fn descending_keeps_directories_first() {
        let mut spec = SortSpec::default();
        spec.choose(SortField::Filename); // flip to descending
        let names = sort(&sample(), &spec);
        assert_eq!(names, vec!["src", "docs", "cherry.md", "banana.txt", "apple.rs"]);
    }

    #[test]
    fn reversing_direction_reverses_within_groups_only() {
        let mut spec = SortSpec::default();
        let ascending = sort(&sample(), &spec);
        spec.choose(SortField::Filename);
        let descending = sort(&sample(), &spec);

        let (asc_dirs, asc_files) = ascending.split_at(2);
        let (desc_dirs, desc_files) = descending.split_at(2);
        assert_eq!(
            desc_dirs.iter().rev().collect::<Vec<_>>(),
            asc_dirs.iter().collect::<Vec<_>>()
        );
        assert_eq!(
            desc_files.iter().rev().collect::<Vec<_>>(),
            asc_files.iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn sort_by_size() {
        let spec = SortSpec::by(SortField::Size);
        let names = sort(&sample(), &spec);
        // Directories (no size) first as a group, then files smallest first.
        assert_eq!(names[2..], ["apple.rs", "banana.txt", "cherry.md"]);
    }

    #[test]
    fn missing_size_sorts_last_in_both_directions() {
        let entries = listing(&[
            ("a", file(1)),
            ("unsized", EntryDescriptor::file("text/plain", 0)),
            ("b", file(9)),
        ]);
        // Strip the size from "unsized" by building a fresh minimal file.
        let mut entries = entries;
        entries.insert(
            "unsized".into(),
            serde_json::from_str(r#"{"isdir": false, "type": "text/plain"}"#).unwrap(),
        );

        let mut spec = SortSpec::by(SortField::Size);
        let asc = sort(&entries, &spec);
        assert_eq!(asc, vec!["a", "b", "unsized"]);

        spec.choose(SortField::Size); // descending
        let desc = sort(&entries, &spec);
        assert_eq!(desc, vec!["b", "a", "unsized"]);
    }

    #[test]
    fn sort_by_modified_uses_epoch() {
        let entries = listing(&[
            ("old", dated(1, 100)),
            ("new", dated(1, 300)),
            ("mid", dated(1, 200)),
        ]);
        let names = sort(&entries, &SortSpec::by(SortField::Modified));
        assert_eq!(names, vec!["old", "mid", "new"]);
    }

    #[test]
    fn secondary_key_breaks_ties() {
        let entries = listing(&[
            ("b", dated(5, 100)),
            ("a", dated(5, 100)),
            ("c", dated(2, 100)),
        ]);
        // Sort by name first, then promote size: equal sizes fall back to name.
        let mut spec = SortSpec::default();
        spec.choose(SortField::Size);
        let names = sort(&entries, &spec);
        assert_eq!(names, vec!["c", "a", "b"]);
    }

    #[test]
    fn resorting_same_field_same_direction_is_idempotent() {
        let spec = SortSpec::default();
        let once = sort(&sample(), &spec);
        let entries: BTreeMap<String, EntryDescriptor> = sample();
        let twice = sort(&entries, &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn choose_same_field_flips_direction_only() {
        let mut spec = SortSpec::by(SortField::Size);
        assert!(spec.ascending());
        spec.choose(SortField::Size);
        assert!(!spec.ascending());
        assert_eq!(spec.primary(), Some(SortField::Size));
        spec.choose(SortField::Size);
        assert!(spec.ascending());
    }

    #[test]
    fn choose_new_field_promotes_and_resets_direction() {
        let mut spec = SortSpec::by(SortField::Size);
        spec.choose(SortField::Size); // descending
        spec.choose(SortField::Modified);
        assert_eq!(spec.primary(), Some(SortField::Modified));
        assert!(spec.ascending());
    }

    #[test]
    fn choose_existing_field_moves_it_to_top() {
        let mut spec = SortSpec::default(); // [Filename]
        spec.choose(SortField::Size); // [Filename, Size]
        spec.choose(SortField::Filename); // [Size, Filename]
        assert_eq!(spec.primary(), Some(SortField::Filename));
        // Filename appears only once: choosing it again flips direction.
        spec.choose(SortField::Filename);
        assert!(!spec.ascending());
    }

    #[test]
    fn field_ids_round_trip() {
        for field in [
            SortField::Filename,
            SortField::Size,
            SortField::Modified,
            SortField::MimeType,
        ] {
            assert_eq!(SortField::from_id(field.id()), Some(field));
        }
        assert_eq!(SortField::from_id("bogus"), None);
    }

    #[test]
    fn empty_listing_sorts_to_empty() {
        let entries = BTreeMap::new();
        assert!(sort(&entries, &SortSpec::default()).is_empty());
    }
}
