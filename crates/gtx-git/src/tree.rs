// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Per-commit tree listings and per-parent diffs
//!
//! Besides fetching trees and diffs, this module owns [`BinaryTypes`], the
//! shared record of which file extensions git reported as binary. It is filled
//! in as diff-stats are processed and read when objects are rendered, so it is
//! approximate: an object may be rendered before any diff touching its
//! extension has been seen, in which case it counts as text.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::commit::{Diff, Object, Overview, extension_of};
use crate::error::GitError;
use crate::gateway::Vcs;

/// Marker git prints in `--stat` output for binary files
const BINARY_MARKER: &str = "Bin";

/// Extension -> binary classification shared across tasks
#[derive(Debug, Clone, Default)]
pub struct BinaryTypes {
    inner: Arc<RwLock<HashMap<String, bool>>>,
}

impl BinaryTypes {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a classification for `extension`
    ///
    /// An extension seen as binary once stays binary, so the result does not
    /// depend on the order concurrent diff-stats are processed in.
    pub fn record(&self, extension: &str, binary: bool) {
        *self
            .inner
            .write()
            .entry(extension.to_string())
            .or_insert(false) |= binary;
    }

    /// Whether `extension` is known to be binary; unknown means text
    #[must_use]
    pub fn is_binary(&self, extension: &str) -> bool {
        self.inner.read().get(extension).copied().unwrap_or(false)
    }

    /// Classification for the extension of `path`
    #[must_use]
    pub fn is_binary_path(&self, path: &str) -> bool {
        self.is_binary(extension_of(path))
    }

    /// Number of extensions seen so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True if no extension has been classified yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Resolves trees and diffs for commits through a [`Vcs`]
#[derive(Clone)]
pub struct TreeResolver {
    vcs: Arc<dyn Vcs>,
    types: BinaryTypes,
}

impl TreeResolver {
    /// Create a resolver writing binary classifications into `types`
    #[must_use]
    pub fn new(vcs: Arc<dyn Vcs>, types: BinaryTypes) -> Self {
        Self { vcs, types }
    }

    /// The shared binary classification cache
    #[must_use]
    pub fn types(&self) -> &BinaryTypes {
        &self.types
    }

    /// Every file in the tree of `hash`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the listing fails or a line is malformed.
    pub async fn tree(&self, hash: &str) -> Result<Vec<Object>, GitError> {
        let listing = self.vcs.list_tree(hash).await?;
        parse_tree(&listing)
    }

    /// Diff-stat between `parent` and `hash`, updating the binary cache
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails.
    pub async fn diff_overview(&self, hash: &str, parent: &str) -> Result<Overview, GitError> {
        let stat = self.vcs.diff_stat(parent, hash).await?;
        Ok(Overview {
            body: process_stat(&stat, &self.types),
            hash: hash.to_string(),
            parent: parent.to_string(),
        })
    }

    /// Unified diff between `parent` and `hash`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails.
    pub async fn diff_body(&self, hash: &str, parent: &str) -> Result<Diff, GitError> {
        let body = self.vcs.diff_patch(parent, hash).await?;
        Ok(Diff {
            body,
            hash: hash.to_string(),
            parent: parent.to_string(),
        })
    }
}

/// Parse `<blob id> <path>` lines from `git ls-tree -r`
///
/// The path is everything after the first space, so paths containing spaces
/// survive.
///
/// # Errors
///
/// Returns `GitError::Malformed` for a non-empty line without a space.
pub fn parse_tree(listing: &str) -> Result<Vec<Object>, GitError> {
    listing
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            let (hash, path) = line.split_once(' ').ok_or_else(|| GitError::Malformed {
                message: format!("tree line without path: {line:?}"),
            })?;
            Ok(Object {
                hash: hash.to_string(),
                path: path.to_string(),
            })
        })
        .collect()
}

/// Trim `git diff --stat` output and record binary extensions in `types`
#[must_use]
pub fn process_stat(stat: &str, types: &BinaryTypes) -> String {
    let mut lines = Vec::new();

    for line in stat.trim_end_matches('\n').lines() {
        if let Some((path, change)) = line.split_once('|') {
            let target = stat_target(path.trim());
            types.record(
                extension_of(&target),
                change.trim_start().starts_with(BINARY_MARKER),
            );
        }
        lines.push(line.trim());
    }

    lines.join("\n")
}

/// The post-change path named by the path column of a diff-stat line
///
/// Renames are printed either as `old => new` or with a shared prefix and
/// suffix, `dir/{old => new}/file`; both resolve to the new path.
#[must_use]
pub fn stat_target(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}'))
        && open < close
        && let Some((_, new)) = path[open + 1..close].split_once(" => ")
    {
        let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
        return joined.replace("//", "/");
    }

    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}
