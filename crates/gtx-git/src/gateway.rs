// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! The boundary to the `git` binary
//!
//! Everything gtx knows about a repository comes through [`Vcs`]. The trait has
//! a single required method, [`Vcs::run`], which executes git with the given
//! arguments against a working copy and returns its raw standard output. The
//! provided methods only build argument lists; parsing lives in the
//! [`branch`](crate::branch), [`log`](crate::log) and [`tree`](crate::tree)
//! modules. Tests substitute an in-memory implementation that returns canned
//! output.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::error::GitError;

/// Options passed ahead of every subcommand so output is stable to parse.
const GLOBAL_ARGS: [&str; 4] = ["-c", "core.quotepath=false", "-c", "color.ui=never"];

/// Read access to a git working copy
#[async_trait]
pub trait Vcs: Send + Sync {
    /// Run `git <args>` in the working copy and return its standard output
    ///
    /// # Errors
    ///
    /// Returns `GitError::Spawn` if git cannot be started and
    /// `GitError::Command` if it exits unsuccessfully.
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>, GitError>;

    /// Run git and decode its output as UTF-8, replacing invalid sequences
    async fn run_text(&self, args: Vec<String>) -> Result<String, GitError> {
        let out = self.run(args).await?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Update `refs/remotes/origin/<branch>` from the upstream branch tip
    async fn fetch_branch(&self, branch: &str) -> Result<(), GitError> {
        self.run(args([
            "fetch",
            "--force",
            "origin",
            &format!("+refs/heads/{branch}:refs/remotes/origin/{branch}"),
        ]))
        .await
        .map(|_| ())
    }

    /// Every local and remote-tracking ref, one full refname per line
    async fn list_branches(&self) -> Result<String, GitError> {
        self.run_text(args(["branch", "-a", "--format=%(refname)"]))
            .await
    }

    /// `git log` with a custom `--format` string
    async fn log(&self, format: &str, reference: &str) -> Result<String, GitError> {
        self.run_text(args(["log", &format!("--format={format}"), reference]))
            .await
    }

    /// `git log --graph` with a custom `--format` string
    async fn log_graph(&self, format: &str, reference: &str) -> Result<String, GitError> {
        self.run_text(args([
            "log",
            "--graph",
            &format!("--format={format}"),
            reference,
        ]))
        .await
    }

    /// Full, multi-line commit message
    async fn show_message(&self, hash: &str) -> Result<String, GitError> {
        self.run_text(args([
            "show",
            "--no-patch",
            "--no-notes",
            "--format=%B",
            hash,
        ]))
        .await
    }

    /// `git diff --stat parent..hash`
    async fn diff_stat(&self, parent: &str, hash: &str) -> Result<String, GitError> {
        self.run_text(args(["diff", "--stat", &format!("{parent}..{hash}")]))
            .await
    }

    /// `git diff -p parent..hash`
    async fn diff_patch(&self, parent: &str, hash: &str) -> Result<String, GitError> {
        self.run_text(args(["diff", "-p", &format!("{parent}..{hash}")]))
            .await
    }

    /// Recursive tree listing as `<blob id> <path>` lines
    async fn list_tree(&self, hash: &str) -> Result<String, GitError> {
        self.run_text(args([
            "ls-tree",
            "-r",
            "--format=%(objectname) %(path)",
            hash,
        ]))
        .await
    }

    /// Raw blob content
    async fn show_blob(&self, hash: &str) -> Result<Vec<u8>, GitError> {
        self.run(args(["cat-file", "blob", hash])).await
    }

    /// Detach HEAD at `reference`
    async fn checkout(&self, reference: &str) -> Result<(), GitError> {
        self.run(args(["checkout", "--detach", reference]))
            .await
            .map(|_| ())
    }
}

fn args<const N: usize>(parts: [&str; N]) -> Vec<String> {
    parts.iter().map(|p| (*p).to_string()).collect()
}

/// [`Vcs`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    workdir: PathBuf,
    permits: Arc<Semaphore>,
}

impl GitCli {
    /// Use an existing working copy
    ///
    /// `jobs` bounds how many git processes this handle runs at once.
    ///
    /// # Errors
    ///
    /// Returns `GitError::RepositoryNotFound` if `path` has no `.git` entry.
    pub fn open(path: impl AsRef<Path>, jobs: usize) -> Result<Self, GitError> {
        let path = path.as_ref();
        if !path.join(".git").exists() {
            return Err(GitError::RepositoryNotFound {
                path: path.display().to_string(),
            });
        }
        Ok(Self {
            workdir: path.to_path_buf(),
            permits: Arc::new(Semaphore::new(jobs.max(1))),
        })
    }

    /// Clone `source` into `dest` and open the result
    ///
    /// # Errors
    ///
    /// Returns `GitError` if the clone fails.
    pub async fn clone_from(source: &str, dest: &Path, jobs: usize) -> Result<Self, GitError> {
        let parent = dest.parent().unwrap_or(dest);
        exec(
            parent,
            args(["clone", "--quiet", source, &dest.display().to_string()]),
        )
        .await?;
        Self::open(dest, jobs)
    }

    /// The working copy directory
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

#[async_trait]
impl Vcs for GitCli {
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>, GitError> {
        // The semaphore is never closed, so a failed acquire cannot happen.
        let _permit = self.permits.acquire().await.ok();
        exec(&self.workdir, args).await
    }
}

async fn exec(dir: &Path, args: Vec<String>) -> Result<Vec<u8>, GitError> {
    let command = args.join(" ");
    debug!(dir = %dir.display(), %command, "Running git");

    let output = Command::new("git")
        .args(GLOBAL_ARGS)
        .args(&args)
        .current_dir(dir)
        .env("LC_ALL", "C")
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| GitError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(GitError::Command {
            command,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output.stdout)
}
