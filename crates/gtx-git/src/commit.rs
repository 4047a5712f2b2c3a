// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit, tree and diff types produced by the extractor

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Commit author as reported by `%aN` / `%aE`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Author name
    pub name: String,
    /// Author email
    pub email: String,
}

/// A file at a commit: the blob id plus its path in the tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Object {
    /// Content hash (git blob id)
    pub hash: String,
    /// Path within the tree, verbatim from git
    pub path: String,
}

impl Object {
    /// Two-character fan-out directory for this object's content hash
    #[must_use]
    pub fn shard(&self) -> &str {
        &self.hash[..2.min(self.hash.len())]
    }

    /// File extension including the leading dot, or an empty string
    #[must_use]
    pub fn extension(&self) -> &str {
        extension_of(&self.path)
    }
}

/// Extension of the last path component, including the dot (`"src/a.rs"` -> `".rs"`).
///
/// Dotfiles without a further dot (`.gitignore`) have no extension.
#[must_use]
pub fn extension_of(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    match name.rfind('.') {
        Some(0) | None => "",
        Some(i) => &name[i..],
    }
}

/// Diff-stat summary between a commit and one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Overview {
    /// Trimmed `git diff --stat` output
    pub body: String,
    /// The commit the stat was computed for
    pub hash: String,
    /// The parent the stat was computed against
    pub parent: String,
}

/// Unified diff between a commit and one of its parents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diff {
    /// Raw `git diff -p` output
    pub body: String,
    /// The commit side of the diff
    pub hash: String,
    /// The parent side of the diff
    pub parent: String,
}

/// Represents a parsed git commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    /// The full commit hash (40 hex characters)
    pub hash: String,
    /// Abbreviated hash as chosen by git
    pub abbr: String,
    /// Parent commit hashes, in git order
    pub parents: Vec<String>,
    /// Commit author
    pub author: Author,
    /// Author date, keeping the author's UTC offset
    pub date: DateTime<FixedOffset>,
    /// First line of the message
    pub subject: String,
    /// Full commit message
    pub body: String,
    /// Every file in the commit's tree
    pub tree: Vec<Object>,
    /// One diff-stat per parent that could be computed
    pub history: Vec<Overview>,
}

impl Commit {
    /// Validate that a hash is a valid 40-character hex string
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        hash.len() == 40 && hash.chars().all(|c| c.is_ascii_hexdigit())
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// The diff-stat computed against `parent`, if any
    #[must_use]
    pub fn overview(&self, parent: &str) -> Option<&Overview> {
        self.history.iter().find(|o| o.parent == parent)
    }
}

/// One row of `git log --graph` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRow {
    /// Graph drawing characters for the row
    pub graph: String,
    /// Commit on this row, absent for connector-only rows
    pub hash: Option<String>,
}

/// A branch and its history, most recent commit first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branch {
    /// Bare branch name (no remote prefix)
    pub name: String,
    /// Commits in native git order
    pub commits: Vec<Commit>,
    /// History graph, empty when it could not be extracted
    pub graph: Vec<GraphRow>,
}

impl Branch {
    /// The tip commit, if the branch has any parsable commits
    #[must_use]
    pub fn latest(&self) -> Option<&Commit> {
        self.commits.first()
    }
}
