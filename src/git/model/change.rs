use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// How a path differs from the last commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Untracked,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Modified => "modified",
            ChangeKind::Deleted => "deleted",
            ChangeKind::Renamed => "renamed",
            ChangeKind::Untracked => "untracked",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path → change kind, keyed by repository-relative path
pub type ChangeSet = BTreeMap<String, ChangeKind>;

/// One path touched by a commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub path: String,
    pub kind: ChangeKind,
}

/// Fold changes into a [`ChangeSet`]; a path reported twice keeps its last kind.
pub fn to_change_set<'a, I>(changes: I) -> ChangeSet
where
    I: IntoIterator<Item = (&'a str, ChangeKind)>,
{
    let mut set = ChangeSet::new();
    for (path, kind) in changes {
        set.insert(path.to_string(), kind);
    }
    set
}
