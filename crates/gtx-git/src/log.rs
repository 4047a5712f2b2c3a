// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Commit history extraction
//!
//! A branch's history is read with a single `git log` whose fields are joined
//! by a separator token. The token is a random UUID, so a commit subject or
//! author that contains that exact string would split into too many fields;
//! such a line is reported as malformed and dropped. This is a known
//! limitation of the format rather than something the parser defends against.
//!
//! Message bodies can span lines, so they are fetched per commit with a
//! separate command instead of being part of the log format.

use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use tokio::task::JoinSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::commit::{Author, Branch, Commit, GraphRow};
use crate::error::GitError;
use crate::gateway::Vcs;
use crate::tree::{BinaryTypes, TreeResolver};

/// Placeholders requested from `git log`, in field order
const FIELDS: [&str; 7] = ["%H", "%P", "%s", "%aN", "%aE", "%aD", "%h"];

/// The ref a branch's history is read from in the working copy
#[must_use]
pub fn remote_ref(branch: &str) -> String {
    format!("origin/{branch}")
}

/// Parse an author date as emitted by `%aD` (RFC 2822)
///
/// # Errors
///
/// Returns `GitError::InvalidDate` if the value does not parse.
pub fn parse_date(value: &str) -> Result<DateTime<FixedOffset>, GitError> {
    DateTime::parse_from_rfc2822(value.trim()).map_err(|source| GitError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

/// One line of formatted log output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Full commit hash
    pub hash: String,
    /// Parent hashes
    pub parents: Vec<String>,
    /// Subject line
    pub subject: String,
    /// Author
    pub author: Author,
    /// Author date
    pub date: DateTime<FixedOffset>,
    /// Abbreviated hash
    pub abbr: String,
}

/// The separator-joined `--format` used for history walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFormat {
    separator: String,
}

impl Default for LogFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl LogFormat {
    /// A format using a fresh random separator
    #[must_use]
    pub fn new() -> Self {
        Self::with_separator(Uuid::new_v4().to_string())
    }

    /// A format using a fixed separator
    #[must_use]
    pub fn with_separator(separator: impl Into<String>) -> Self {
        Self {
            separator: separator.into(),
        }
    }

    /// The field separator
    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Value for `git log --format=`
    #[must_use]
    pub fn format(&self) -> String {
        FIELDS.join(&self.separator)
    }

    /// Value for `git log --graph --format=`
    #[must_use]
    pub fn graph_format(&self) -> String {
        format!("{}%H", self.separator)
    }

    /// Split one log line into its fields
    ///
    /// # Errors
    ///
    /// Returns `GitError::Malformed` if the field count is wrong and
    /// `GitError::InvalidDate` if the author date does not parse.
    pub fn parse_line(&self, line: &str) -> Result<LogEntry, GitError> {
        let fields: Vec<&str> = line.trim().split(self.separator.as_str()).collect();
        let [hash, parents, subject, name, email, date, abbr] = fields[..] else {
            return Err(GitError::Malformed {
                message: format!(
                    "expected {} log fields, found {}",
                    FIELDS.len(),
                    fields.len()
                ),
            });
        };

        Ok(LogEntry {
            hash: hash.to_string(),
            parents: parents.split_whitespace().map(str::to_string).collect(),
            subject: subject.to_string(),
            author: Author {
                name: name.to_string(),
                email: email.to_string(),
            },
            date: parse_date(date)?,
            abbr: abbr.to_string(),
        })
    }

    /// Parse `git log --graph` output produced with [`LogFormat::graph_format`]
    #[must_use]
    pub fn parse_graph(&self, output: &str) -> Vec<GraphRow> {
        output
            .lines()
            .map(|line| match line.split_once(self.separator.as_str()) {
                Some((graph, hash)) => GraphRow {
                    graph: graph.trim_end().to_string(),
                    hash: Some(hash.trim().to_string()),
                },
                None => GraphRow {
                    graph: line.trim_end().to_string(),
                    hash: None,
                },
            })
            .collect()
    }
}

/// Walks branches and assembles fully resolved [`Commit`] records
#[derive(Clone)]
pub struct Extractor {
    vcs: Arc<dyn Vcs>,
    resolver: TreeResolver,
    format: Arc<LogFormat>,
}

impl Extractor {
    /// Create an extractor recording binary classifications into `types`
    #[must_use]
    pub fn new(vcs: Arc<dyn Vcs>, types: BinaryTypes) -> Self {
        Self {
            resolver: TreeResolver::new(Arc::clone(&vcs), types),
            vcs,
            format: Arc::new(LogFormat::new()),
        }
    }

    /// Use a specific log format
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = Arc::new(format);
        self
    }

    /// The tree and diff resolver used for each commit
    #[must_use]
    pub fn resolver(&self) -> &TreeResolver {
        &self.resolver
    }

    /// The log format in use
    #[must_use]
    pub fn format(&self) -> &LogFormat {
        &self.format
    }

    /// Extract a branch: its commits and, when available, its graph
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the branch's log cannot be read.
    pub async fn branch(&self, name: &str) -> Result<Branch, GitError> {
        let commits = self.extract(name).await?;
        let graph = match self.graph(name).await {
            Ok(graph) => graph,
            Err(e) => {
                warn!(branch = %name, error = %e, "Unable to read history graph");
                Vec::new()
            }
        };
        Ok(Branch {
            name: name.to_string(),
            commits,
            graph,
        })
    }

    /// Every parsable commit on `branch`, in native git order
    ///
    /// Commits whose date, message body or tree cannot be read are logged and
    /// left out; the rest of the branch is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the log command itself fails.
    pub async fn extract(&self, branch: &str) -> Result<Vec<Commit>, GitError> {
        let output = self
            .vcs
            .log(&self.format.format(), &remote_ref(branch))
            .await?;

        let mut tasks = JoinSet::new();
        let mut total = 0usize;

        for (index, line) in output.lines().filter(|l| !l.trim().is_empty()).enumerate() {
            total += 1;
            let entry = match self.format.parse_line(line) {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(branch = %branch, error = %e, "Dropping unparsable commit");
                    continue;
                }
            };
            let this = self.clone();
            tasks.spawn(async move {
                let abbr = entry.abbr.clone();
                (index, abbr, this.complete(entry).await)
            });
        }

        let mut resolved: Vec<(usize, Commit)> = Vec::with_capacity(total);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(commit))) => resolved.push((index, commit)),
                Ok((_, abbr, Err(e))) => {
                    warn!(branch = %branch, commit = %abbr, error = %e, "Dropping commit");
                }
                Err(e) => warn!(branch = %branch, error = %e, "Commit task failed"),
            }
        }
        resolved.sort_by_key(|(index, _)| *index);

        debug!(
            branch = %branch,
            parsed = resolved.len(),
            total,
            "Extracted commits"
        );

        Ok(resolved.into_iter().map(|(_, commit)| commit).collect())
    }

    /// The `git log --graph` rows for `branch`
    ///
    /// # Errors
    ///
    /// Returns `GitError` if git fails.
    pub async fn graph(&self, branch: &str) -> Result<Vec<GraphRow>, GitError> {
        let output = self
            .vcs
            .log_graph(&self.format.graph_format(), &remote_ref(branch))
            .await?;
        Ok(self.format.parse_graph(&output))
    }

    /// Fetch body, tree and per-parent diff-stats for a log entry
    async fn complete(&self, entry: LogEntry) -> Result<Commit, GitError> {
        let body = self.vcs.show_message(&entry.hash).await?;
        let tree = self.resolver.tree(&entry.hash).await?;

        let mut history = Vec::with_capacity(entry.parents.len());
        for parent in &entry.parents {
            match self.resolver.diff_overview(&entry.hash, parent).await {
                Ok(overview) => history.push(overview),
                Err(e) => {
                    warn!(
                        commit = %entry.abbr,
                        parent_hash = %parent,
                        error = %e,
                        "Unable to diff-stat against parent"
                    );
                }
            }
        }

        Ok(Commit {
            hash: entry.hash,
            abbr: entry.abbr,
            parents: entry.parents,
            author: entry.author,
            date: entry.date,
            subject: entry.subject,
            body: body.trim_end_matches('\n').to_string(),
            tree,
            history,
        })
    }
}
