// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Test fixtures for gtx integration tests
//!
//! [`ScriptedRepo`] installs canned git output into a [`MemoryVcs`] so that a
//! whole generation run can be driven without a real repository. Commits are
//! described by their files; diff-stats and patches are derived from the
//! parent's files.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use gtx::generate::Generator;
use gtx::layout::OutputLayout;
use gtx_git::LogFormat;
use gtx_git::memory::MemoryVcs;
use gtx_render::Renderer;

/// Fixed log separator so canned `git log` arguments are predictable
pub const SEP: &str = "6f6c1745-e902-474a-9e99-08d0084fb011";

/// Author date of scripted commits unless set with `ScriptedRepo::dated`
pub const DATE: &str = "Mon, 1 Jan 2024 10:00:00 +0000";

/// A 40 character hash made of `c`
pub fn hash(c: char) -> String {
    c.to_string().repeat(40)
}

/// Owned branch names
pub fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_string()).collect()
}

#[derive(Debug, Clone)]
struct ScriptedCommit {
    parents: Vec<String>,
    subject: String,
    date: String,
    files: Vec<(String, String)>,
}

/// A repository made of canned git responses
pub struct ScriptedRepo {
    vcs: Arc<MemoryVcs>,
    commits: HashMap<String, ScriptedCommit>,
    format: LogFormat,
}

impl Default for ScriptedRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedRepo {
    /// An empty repository
    pub fn new() -> Self {
        Self {
            vcs: Arc::new(MemoryVcs::new()),
            commits: HashMap::new(),
            format: LogFormat::with_separator(SEP),
        }
    }

    /// The underlying gateway double
    pub fn vcs(&self) -> Arc<MemoryVcs> {
        Arc::clone(&self.vcs)
    }

    /// Make `content` the blob `hash`
    pub fn blob(&mut self, hash: &str, content: impl Into<Vec<u8>>) -> &mut Self {
        self.vcs.respond(&["cat-file", "blob", hash], content);
        self
    }

    /// Add a commit whose tree is `files` as `(blob, path)` pairs
    ///
    /// Parents must already be scripted. Each parent gets a diff-stat and a
    /// patch covering the paths whose blob changed; `.png` files show up as
    /// binary in the diff-stat.
    pub fn commit(
        &mut self,
        hash: &str,
        parents: &[&str],
        subject: &str,
        files: &[(&str, &str)],
    ) -> &mut Self {
        let files: Vec<(String, String)> = files
            .iter()
            .map(|(blob, path)| ((*blob).to_string(), (*path).to_string()))
            .collect();

        self.vcs.respond(
            &["show", "--no-patch", "--no-notes", "--format=%B", hash],
            format!("{subject}\n\nBody of {subject}\n\n"),
        );
        let listing: String = files
            .iter()
            .map(|(blob, path)| format!("{blob} {path}\n"))
            .collect();
        self.vcs.respond(
            &["ls-tree", "-r", "--format=%(objectname) %(path)", hash],
            listing,
        );

        for parent in parents {
            let before = self
                .commits
                .get(*parent)
                .map(|c| c.files.clone())
                .unwrap_or_default();
            let changed: Vec<&(String, String)> =
                files.iter().filter(|f| !before.contains(f)).collect();

            let range = format!("{parent}..{hash}");
            self.vcs
                .respond(&["diff", "--stat", &range], stat(&changed));
            self.vcs.respond(&["diff", "-p", &range], patch(&changed));
        }

        self.commits.insert(
            hash.to_string(),
            ScriptedCommit {
                parents: parents.iter().map(|p| (*p).to_string()).collect(),
                subject: subject.to_string(),
                date: DATE.to_string(),
                files,
            },
        );
        self
    }

    /// Give the scripted commit `hash` an RFC 2822 author date
    ///
    /// Must be called before any branch containing the commit is scripted.
    pub fn dated(&mut self, hash: &str, date: &str) -> &mut Self {
        if let Some(commit) = self.commits.get_mut(hash) {
            commit.date = date.to_string();
        }
        self
    }

    /// Make `name` a branch whose log is `history`, newest first
    pub fn branch(&mut self, name: &str, history: &[&str]) -> &mut Self {
        let reference = format!("origin/{name}");
        self.vcs.respond(
            &[
                "fetch",
                "--force",
                "origin",
                &format!("+refs/heads/{name}:refs/remotes/origin/{name}"),
            ],
            "",
        );

        let log: String = history
            .iter()
            .map(|h| format!("{}\n", self.log_line(h)))
            .collect();
        self.vcs.respond(
            &["log", &format!("--format={}", self.format.format()), &reference],
            log,
        );

        let graph: String = history
            .iter()
            .map(|h| format!("* {SEP}{h}\n"))
            .collect();
        self.vcs.respond(
            &[
                "log",
                "--graph",
                &format!("--format={}", self.format.graph_format()),
                &reference,
            ],
            graph,
        );
        self
    }

    /// Answer the branch listing with `branches` as remote-tracking refs
    pub fn listing(&mut self, branches: &[&str]) -> &mut Self {
        let listing: String = branches
            .iter()
            .map(|b| format!("refs/remotes/origin/{b}\n"))
            .collect();
        self.vcs
            .respond(&["branch", "-a", "--format=%(refname)"], listing);
        self
    }

    /// A generator over this repository writing to `output`
    pub fn generator(&self, output: &Path) -> Generator {
        let layout = OutputLayout::new(output);
        layout.prepare(false).expect("Failed to prepare output");
        Generator::new(
            self.vcs(),
            Renderer::new().expect("Failed to load template"),
            layout,
            "Jimbo",
        )
        .with_format(self.format.clone())
    }

    fn log_line(&self, hash: &str) -> String {
        let commit = self
            .commits
            .get(hash)
            .expect("Commit must be scripted before its branch");
        [
            hash.to_string(),
            commit.parents.join(" "),
            commit.subject.clone(),
            "Test Author".to_string(),
            "test@example.com".to_string(),
            commit.date.clone(),
            hash[..7].to_string(),
        ]
        .join(SEP)
    }
}

fn stat(changed: &[&(String, String)]) -> String {
    let mut out = String::new();
    for (_, path) in changed {
        if path.ends_with(".png") {
            out.push_str(&format!(" {path} | Bin 0 -> 5 bytes\n"));
        } else {
            out.push_str(&format!(" {path} | 1 +\n"));
        }
    }
    out.push_str(&format!(
        " {} files changed, {} insertions(+)\n",
        changed.len(),
        changed.len()
    ));
    out
}

fn patch(changed: &[&(String, String)]) -> String {
    let mut out = String::new();
    for (_, path) in changed {
        out.push_str(&format!(
            "diff --git a/{path} b/{path}\n--- a/{path}\n+++ b/{path}\n@@ -1 +1 @@\n-old\n+new\n"
        ));
    }
    out
}
