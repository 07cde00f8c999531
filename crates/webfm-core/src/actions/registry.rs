//! Action metadata and fuzzy search.
//!
//! [`ActionRegistry`] carries the display metadata (name, description,
//! category) for every [`ActionId`] and powers the command-palette style
//! action search in the browser chrome.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use crate::actions::eligibility::ActionId;

/// Broad category for grouping actions in menus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    File,
    Directory,
    Clipboard,
    Publishing,
    VersionControl,
    Submission,
}

impl ActionCategory {
    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Directory => "Directory",
            Self::Clipboard => "Clipboard",
            Self::Publishing => "Publishing",
            Self::VersionControl => "Version Control",
            Self::Submission => "Submission",
        }
    }
}

/// Metadata for a single action.
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    pub action: ActionId,
    /// Snake-case identifier used in links and keybinding tables.
    pub id: &'static str,
    /// Human-readable name shown in menus (e.g. `"Check In"`).
    pub name: &'static str,
    /// Short description for tooltips and the palette.
    pub description: &'static str,
    pub category: ActionCategory,
}

/// Registry of all available actions with fuzzy-search support.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    descriptors: Vec<ActionDescriptor>,
}

impl ActionRegistry {
    /// Builds the registry containing every known action.
    pub fn new() -> Self {
        let descriptors = vec![
            // File
            ActionDescriptor {
                action: ActionId::Open,
                id: "open",
                name: "Open",
                description: "Open the selected file or directory",
                category: ActionCategory::File,
            },
            ActionDescriptor {
                action: ActionId::Serve,
                id: "serve",
                name: "Serve",
                description: "View the file as served by the web app",
                category: ActionCategory::File,
            },
            ActionDescriptor {
                action: ActionId::Run,
                id: "run",
                name: "Run",
                description: "Execute the file on the server and view its output",
                category: ActionCategory::File,
            },
            ActionDescriptor {
                action: ActionId::Download,
                id: "download",
                name: "Download",
                description: "Download the selection, archiving if necessary",
                category: ActionCategory::File,
            },
            ActionDescriptor {
                action: ActionId::Rename,
                id: "rename",
                name: "Rename",
                description: "Rename the selected entry",
                category: ActionCategory::File,
            },
            ActionDescriptor {
                action: ActionId::Delete,
                id: "delete",
                name: "Delete",
                description: "Delete the selected entries",
                category: ActionCategory::File,
            },
            // Clipboard
            ActionDescriptor {
                action: ActionId::Cut,
                id: "cut",
                name: "Cut",
                description: "Move the selection to the clipboard",
                category: ActionCategory::Clipboard,
            },
            ActionDescriptor {
                action: ActionId::Copy,
                id: "copy",
                name: "Copy",
                description: "Copy the selection to the clipboard",
                category: ActionCategory::Clipboard,
            },
            ActionDescriptor {
                action: ActionId::Paste,
                id: "paste",
                name: "Paste",
                description: "Paste clipboard contents into this directory",
                category: ActionCategory::Clipboard,
            },
            // Directory
            ActionDescriptor {
                action: ActionId::NewFile,
                id: "new_file",
                name: "New File",
                description: "Create an empty file here",
                category: ActionCategory::Directory,
            },
            ActionDescriptor {
                action: ActionId::NewDirectory,
                id: "new_directory",
                name: "New Directory",
                description: "Create a subdirectory here",
                category: ActionCategory::Directory,
            },
            ActionDescriptor {
                action: ActionId::Upload,
                id: "upload",
                name: "Upload",
                description: "Upload a file into this directory",
                category: ActionCategory::Directory,
            },
            // Publishing
            ActionDescriptor {
                action: ActionId::Publish,
                id: "publish",
                name: "Publish",
                description: "Make this directory publicly viewable",
                category: ActionCategory::Publishing,
            },
            ActionDescriptor {
                action: ActionId::Unpublish,
                id: "unpublish",
                name: "Unpublish",
                description: "Stop publishing this directory",
                category: ActionCategory::Publishing,
            },
            ActionDescriptor {
                action: ActionId::Share,
                id: "share",
                name: "Share This File",
                description: "Get the public link for this file",
                category: ActionCategory::Publishing,
            },
            // Version control
            ActionDescriptor {
                action: ActionId::VersionAdd,
                id: "svn_add",
                name: "Add",
                description: "Schedule the selection for version control",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionRemove,
                id: "svn_remove",
                name: "Remove",
                description: "Schedule the selection for removal from version control",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionRevert,
                id: "svn_revert",
                name: "Revert",
                description: "Discard local changes to the selection",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionCopy,
                id: "svn_copy",
                name: "Versioned Copy",
                description: "Copy the selection preserving version history",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionCut,
                id: "svn_cut",
                name: "Versioned Cut",
                description: "Move the selection preserving version history",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionCommit,
                id: "svn_commit",
                name: "Check In",
                description: "Commit changes to the repository",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionDiff,
                id: "svn_diff",
                name: "Show Changes",
                description: "Diff local changes against the repository",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionUpdate,
                id: "svn_update",
                name: "Update",
                description: "Update to the latest repository revision",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionLog,
                id: "svn_log",
                name: "History",
                description: "Show the revision history",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionCleanup,
                id: "svn_cleanup",
                name: "Clean Up",
                description: "Clean up the working copy",
                category: ActionCategory::VersionControl,
            },
            ActionDescriptor {
                action: ActionId::VersionResolved,
                id: "svn_resolved",
                name: "Mark Resolved",
                description: "Mark a conflicted file as resolved",
                category: ActionCategory::VersionControl,
            },
            // Submission
            ActionDescriptor {
                action: ActionId::Submit,
                id: "submit",
                name: "Submit",
                description: "Submit the selected work for assessment",
                category: ActionCategory::Submission,
            },
        ];
        Self { descriptors }
    }

    /// Returns all descriptors.
    pub fn all(&self) -> &[ActionDescriptor] {
        &self.descriptors
    }

    /// Fuzzy-searches descriptors by matching against name, description, and id.
    /// Returns results sorted by match score (best first).
    pub fn fuzzy_search(&self, query: &str) -> Vec<&ActionDescriptor> {
        if query.is_empty() {
            return self.descriptors.iter().collect();
        }
        let matcher = SkimMatcherV2::default();
        let mut scored: Vec<(i64, &ActionDescriptor)> = self
            .descriptors
            .iter()
            .filter_map(|d| {
                let name_score = matcher.fuzzy_match(d.name, query).unwrap_or(0);
                let desc_score = matcher.fuzzy_match(d.description, query).unwrap_or(0);
                let id_score = matcher.fuzzy_match(d.id, query).unwrap_or(0);
                let best = name_score.max(desc_score).max(id_score);
                if best > 0 {
                    Some((best, d))
                } else {
                    None
                }
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.into_iter().map(|(_, d)| d).collect()
    }

    /// Finds an action by its string id.
    pub fn find_by_id(&self, id: &str) -> Option<ActionId> {
        self.descriptors
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.action)
    }

    /// Returns the descriptor for a given action.
    pub fn descriptor_for(&self, action: ActionId) -> Option<&ActionDescriptor> {
        self.descriptors.iter().find(|d| d.action == action)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_action() {
        let registry = ActionRegistry::new();
        for id in ActionId::all() {
            assert!(
                registry.descriptor_for(id).is_some(),
                "{id:?} has no descriptor"
            );
        }
        assert_eq!(registry.all().len(), ActionId::all().len());
    }

    #[test]
    fn descriptor_ids_are_unique() {
        let registry = ActionRegistry::new();
        let mut ids: Vec<&str> = registry.all().iter().map(|d| d.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), registry.all().len());
    }

    #[test]
    fn find_by_id_returns_correct_action() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.find_by_id("open"), Some(ActionId::Open));
        assert_eq!(registry.find_by_id("svn_commit"), Some(ActionId::VersionCommit));
        assert_eq!(registry.find_by_id("submit"), Some(ActionId::Submit));
    }

    #[test]
    fn find_by_id_unknown_returns_none() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.find_by_id("nonexistent"), None);
    }

    #[test]
    fn fuzzy_search_empty_query_returns_all() {
        let registry = ActionRegistry::new();
        let results = registry.fuzzy_search("");
        assert_eq!(results.len(), registry.all().len());
    }

    #[test]
    fn fuzzy_search_finds_matching_actions() {
        let registry = ActionRegistry::new();
        let results = registry.fuzzy_search("publish");
        assert!(!results.is_empty());
        let actions: Vec<ActionId> = results.iter().map(|d| d.action).collect();
        assert!(actions.contains(&ActionId::Publish));
        assert!(actions.contains(&ActionId::Unpublish));
    }

    #[test]
    fn fuzzy_search_no_match() {
        let registry = ActionRegistry::new();
        let results = registry.fuzzy_search("xyzxyzxyz");
        assert!(results.is_empty());
    }

    #[test]
    fn descriptor_for_returns_metadata() {
        let registry = ActionRegistry::new();
        let desc = registry.descriptor_for(ActionId::VersionCommit).unwrap();
        assert_eq!(desc.id, "svn_commit");
        assert_eq!(desc.name, "Check In");
        assert_eq!(desc.category, ActionCategory::VersionControl);
    }

    #[test]
    fn action_category_labels() {
        assert_eq!(ActionCategory::File.label(), "File");
        assert_eq!(ActionCategory::VersionControl.label(), "Version Control");
        assert_eq!(ActionCategory::Submission.label(), "Submission");
    }
}
