// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Page data passed to the template
//!
//! A [`Page`] is serialised into a flat key/value bag: the shared fields
//! `kind`, `project`, `base` and `title`, plus the keys of its [`PageData`]
//! variant (`branches`/`link`, `branch`/`commits`/`graph`, `commit`, `diff`
//! or `object`). Views are owned snapshots of the extracted history, shaped
//! for the template rather than for git.

use std::collections::HashMap;

use serde::Serialize;

use gtx_git::{BinaryTypes, Branch, Commit, Diff, Object};

use crate::annotate::{Annotator, href_path};

/// Separator between title parts
pub const TITLE_SEPARATOR: &str = ": ";

/// The closed set of pages the site is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    /// `index.html`
    Index,
    /// `branch/<name>/index.html`
    Branch,
    /// `commit/<hash>/index.html`
    Commit,
    /// `commit/<hash>/diff-to-<parent>.html`
    Diff,
    /// `object/<xx>/<hash>.html`
    Object,
}

/// A page ready to render
#[derive(Debug, Clone, Serialize)]
pub struct Page {
    /// Which page this is
    pub kind: PageKind,
    /// Project display name
    pub project: String,
    /// Relative path from the page's directory to the site root
    pub base: String,
    /// Title parts joined by [`TITLE_SEPARATOR`]
    pub title: String,
    /// Page specific data
    #[serde(flatten)]
    pub data: PageData,
}

/// Data keys for each page kind
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PageData {
    /// Repository home
    Index {
        /// Every branch with its latest commit
        branches: Vec<BranchSummary>,
        /// Public clone URL
        link: Option<String>,
    },
    /// One branch's history
    Branch {
        /// The branch
        branch: BranchSummary,
        /// Commits in git order
        commits: Vec<CommitSummary>,
        /// History graph rows, empty if unavailable
        graph: Vec<GraphRowView>,
    },
    /// One commit
    Commit {
        /// The commit
        commit: CommitView,
    },
    /// Full diff against one parent
    Diff {
        /// The diff
        diff: DiffView,
    },
    /// Line-numbered file content
    Object {
        /// The file
        object: ObjectView,
    },
}

/// A branch name with its tip commit
#[derive(Debug, Clone, Serialize)]
pub struct BranchSummary {
    /// Branch name
    pub name: String,
    /// Tip commit, absent for a branch without parsable commits
    pub latest: Option<CommitSummary>,
}

/// The fields of a commit shown in listings
#[derive(Debug, Clone, Serialize)]
pub struct CommitSummary {
    pub hash: String,
    pub abbr: String,
    pub subject: String,
    pub author: String,
    pub email: String,
    /// Human readable author date with offset
    pub date: String,
    /// RFC 3339 author date
    pub iso: String,
    pub merge: bool,
}

impl From<&Commit> for CommitSummary {
    fn from(commit: &Commit) -> Self {
        Self {
            hash: commit.hash.clone(),
            abbr: commit.abbr.clone(),
            subject: commit.subject.clone(),
            author: commit.author.name.clone(),
            email: commit.author.email.clone(),
            date: commit.date.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
            iso: commit.date.to_rfc3339(),
            merge: commit.is_merge(),
        }
    }
}

/// One row of the history graph
#[derive(Debug, Clone, Serialize)]
pub struct GraphRowView {
    pub graph: String,
    pub hash: Option<String>,
    pub abbr: Option<String>,
    pub subject: Option<String>,
}

/// A commit with its message, diff-stats and tree
#[derive(Debug, Clone, Serialize)]
pub struct CommitView {
    #[serde(flatten)]
    pub summary: CommitSummary,
    pub branch: String,
    pub body: String,
    pub parents: Vec<ParentView>,
    pub tree: Vec<TreeEntry>,
}

/// A parent link plus the annotated diff-stat against it
#[derive(Debug, Clone, Serialize)]
pub struct ParentView {
    pub hash: String,
    pub abbr: String,
    /// Annotated diff-stat, absent when it could not be computed
    pub stat: Option<String>,
}

/// A file in a commit's tree
#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub hash: String,
    /// Root-relative link to the file under the commit directory
    pub href: String,
    pub binary: bool,
}

/// An annotated diff against one parent
#[derive(Debug, Clone, Serialize)]
pub struct DiffView {
    pub hash: String,
    pub abbr: String,
    pub subject: String,
    pub branch: String,
    pub parent: String,
    pub parent_abbr: String,
    /// Annotated diff body
    pub html: String,
}

/// Text content split into numbered lines
#[derive(Debug, Clone, Serialize)]
pub struct ObjectView {
    pub hash: String,
    pub lines: Vec<Line>,
}

/// A numbered line of an object page
#[derive(Debug, Clone, Serialize)]
pub struct Line {
    /// 1-based line number, also the `L<n>` anchor
    pub number: usize,
    pub text: String,
}

/// Relative path from `dir` (root-relative, `/` separated) to the site root
///
/// ```
/// use gtx_render::page::base_path;
///
/// assert_eq!(base_path(""), "./");
/// assert_eq!(base_path("branch/main"), "../../");
/// assert_eq!(base_path("branch/feature/login"), "../../../");
/// ```
#[must_use]
pub fn base_path(dir: &str) -> String {
    let depth = dir.split('/').filter(|part| !part.is_empty()).count();
    if depth == 0 {
        "./".to_string()
    } else {
        "../".repeat(depth)
    }
}

/// Link from the site root to a tree entry's file under `commit/<hash>/`
#[must_use]
pub fn object_href(commit: &str, path: &str, binary: bool) -> String {
    let path = href_path(path);
    if binary {
        format!("commit/{commit}/{path}")
    } else {
        format!("commit/{commit}/{path}.html")
    }
}

fn title(parts: &[&str]) -> String {
    parts.join(TITLE_SEPARATOR)
}

fn short(hash: &str) -> &str {
    &hash[..7.min(hash.len())]
}

impl Page {
    /// Repository home listing `branches` in order
    #[must_use]
    pub fn index<'a>(
        project: &str,
        branches: impl IntoIterator<Item = &'a Branch>,
        link: Option<&str>,
    ) -> Self {
        let branches = branches
            .into_iter()
            .map(|branch| BranchSummary {
                name: branch.name.clone(),
                latest: branch.latest().map(CommitSummary::from),
            })
            .collect();

        Self {
            kind: PageKind::Index,
            project: project.to_string(),
            base: base_path(""),
            title: project.to_string(),
            data: PageData::Index {
                branches,
                link: link.map(str::to_string),
            },
        }
    }

    /// History of one branch
    #[must_use]
    pub fn branch(project: &str, branch: &Branch) -> Self {
        let subjects: HashMap<&str, &Commit> = branch
            .commits
            .iter()
            .map(|commit| (commit.hash.as_str(), commit))
            .collect();

        let graph = branch
            .graph
            .iter()
            .map(|row| {
                let commit = row.hash.as_deref().and_then(|h| subjects.get(h));
                GraphRowView {
                    graph: row.graph.clone(),
                    hash: row.hash.clone(),
                    abbr: row
                        .hash
                        .as_deref()
                        .map(|h| commit.map_or_else(|| short(h).to_string(), |c| c.abbr.clone())),
                    subject: commit.map(|c| c.subject.clone()),
                }
            })
            .collect();

        Self {
            kind: PageKind::Branch,
            project: project.to_string(),
            base: base_path(&format!("branch/{}", branch.name)),
            title: title(&[project, &branch.name]),
            data: PageData::Branch {
                branch: BranchSummary {
                    name: branch.name.clone(),
                    latest: branch.latest().map(CommitSummary::from),
                },
                commits: branch.commits.iter().map(CommitSummary::from).collect(),
                graph,
            },
        }
    }

    /// One commit as seen from `branch`
    #[must_use]
    pub fn commit(
        project: &str,
        branch: &str,
        commit: &Commit,
        types: &BinaryTypes,
        annotator: &Annotator,
    ) -> Self {
        let parents = commit
            .parents
            .iter()
            .map(|parent| ParentView {
                hash: parent.clone(),
                abbr: short(parent).to_string(),
                stat: commit
                    .overview(parent)
                    .map(|o| annotator.diff_stat(&o.body, &commit.hash, parent)),
            })
            .collect();

        let tree = commit
            .tree
            .iter()
            .map(|object| {
                let binary = types.is_binary_path(&object.path);
                TreeEntry {
                    path: object.path.clone(),
                    hash: object.hash.clone(),
                    href: object_href(&commit.hash, &object.path, binary),
                    binary,
                }
            })
            .collect();

        Self {
            kind: PageKind::Commit,
            project: project.to_string(),
            base: base_path(&format!("commit/{}", commit.hash)),
            title: title(&[project, branch, &commit.abbr]),
            data: PageData::Commit {
                commit: CommitView {
                    summary: CommitSummary::from(commit),
                    branch: branch.to_string(),
                    body: commit.body.clone(),
                    parents,
                    tree,
                },
            },
        }
    }

    /// Full diff of `commit` against `diff.parent`
    #[must_use]
    pub fn diff(
        project: &str,
        branch: &str,
        commit: &Commit,
        diff: &Diff,
        annotator: &Annotator,
    ) -> Self {
        Self {
            kind: PageKind::Diff,
            project: project.to_string(),
            base: base_path(&format!("commit/{}", commit.hash)),
            title: title(&[project, branch, &commit.abbr]),
            data: PageData::Diff {
                diff: DiffView {
                    hash: commit.hash.clone(),
                    abbr: commit.abbr.clone(),
                    subject: commit.subject.clone(),
                    branch: branch.to_string(),
                    parent: diff.parent.clone(),
                    parent_abbr: short(&diff.parent).to_string(),
                    html: annotator.diff_body(&diff.body, &diff.hash, &diff.parent),
                },
            },
        }
    }

    /// Line-numbered text content of `object`
    ///
    /// The page is stored once per content hash and linked from every commit
    /// containing it, so neither the path nor the commit appear in it.
    #[must_use]
    pub fn object(project: &str, object: &Object, content: &[u8]) -> Self {
        let text = String::from_utf8_lossy(content);
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| Line {
                number: i + 1,
                text: line.to_string(),
            })
            .collect();

        Self {
            kind: PageKind::Object,
            project: project.to_string(),
            base: base_path(&format!("object/{}", object.shard())),
            title: title(&[project, short(&object.hash)]),
            data: PageData::Object {
                object: ObjectView {
                    hash: object.hash.clone(),
                    lines,
                },
            },
        }
    }
}
