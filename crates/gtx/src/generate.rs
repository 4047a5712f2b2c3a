// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Generation of the site from resolved branches
//!
//! A run extracts every branch concurrently, then renders branch pages,
//! commit pages, diffs and file objects, and finally the home page once all
//! other work has finished. Failures are confined to the unit of work they
//! happen in; each unit reports an [`Outcome`] and the run returns the
//! collected [`RunReport`].

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use gtx_git::{BinaryTypes, Branch, Extractor, LogFormat, Object, Vcs};
use gtx_render::{Page, Renderer};

use crate::layout::{OutputLayout, write_atomic};
use crate::store::ObjectStore;

/// Result of one unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Written by this run
    Done,
    /// Nothing to do, the output already existed
    Skipped(String),
    /// Logged and left out of the site
    Failed(String),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// What a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Branches extracted and rendered
    pub branches: usize,
    /// Commits rendered, each under the first branch containing it
    pub commits: usize,
    /// Units of work completed
    pub done: usize,
    /// Units of work with nothing to do
    pub skipped: usize,
    /// Reasons for every failed unit of work
    pub failures: Vec<String>,
    /// Whether the home page was written
    pub index_written: bool,
}

impl RunReport {
    /// Count `outcome`
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Done => self.done += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Failed(reason) => self.failures.push(reason),
        }
    }

    /// Number of failed units of work
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// True if nothing failed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.index_written
    }
}

/// Renders the site for a set of branches
pub struct Generator {
    vcs: Arc<dyn Vcs>,
    extractor: Extractor,
    renderer: Arc<Renderer>,
    store: Arc<ObjectStore>,
    layout: OutputLayout,
    types: BinaryTypes,
    project: String,
    link: Option<String>,
}

impl Generator {
    /// Create a generator writing under `layout`
    #[must_use]
    pub fn new(vcs: Arc<dyn Vcs>, renderer: Renderer, layout: OutputLayout, project: &str) -> Self {
        let types = BinaryTypes::new();
        let renderer = Arc::new(renderer);
        Self {
            extractor: Extractor::new(Arc::clone(&vcs), types.clone()),
            store: Arc::new(ObjectStore::new(
                Arc::clone(&vcs),
                Arc::clone(&renderer),
                layout.clone(),
                types.clone(),
                project,
            )),
            vcs,
            renderer,
            layout,
            types,
            project: project.to_string(),
            link: None,
        }
    }

    /// Public clone URL shown on the home page
    #[must_use]
    pub fn with_link(mut self, link: Option<String>) -> Self {
        self.link = link;
        self
    }

    /// Use a specific log format for extraction
    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.extractor = self.extractor.with_format(format);
        self
    }

    /// The binary classification cache shared by extraction and storage
    #[must_use]
    pub fn types(&self) -> &BinaryTypes {
        &self.types
    }

    /// Generate the site for `branches`, in the given order
    pub async fn run(&self, branches: &[String]) -> RunReport {
        let mut report = RunReport::default();

        let extracted = self.extract(branches, &mut report).await;
        report.branches = extracted.len();

        let mut tasks = JoinSet::new();
        let mut owned: HashSet<String> = HashSet::new();

        for branch in &extracted {
            info!(branch = %branch.name, commits = branch.commits.len(), "Processing branch");
            report.record(self.write_branch(branch).await);

            let total = branch.commits.len();
            for (index, commit) in branch.commits.iter().enumerate() {
                if !owned.insert(commit.hash.clone()) {
                    continue;
                }
                report.commits += 1;
                debug!(
                    branch = %branch.name,
                    commit = %commit.abbr,
                    "Processing commit {}/{}",
                    index + 1,
                    total
                );
                report.record(self.write_commit(branch, index).await);
                self.spawn_commit_work(&mut tasks, branch, index);
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(e) => report.record(Outcome::Failed(format!("task failed: {e}"))),
            }
        }

        match self.write_index(&extracted).await {
            Outcome::Failed(reason) => {
                warn!(error = %reason, "Unable to write home page");
                report.failures.push(reason);
            }
            outcome => {
                report.index_written = true;
                report.record(outcome);
            }
        }

        info!(
            branches = report.branches,
            commits = report.commits,
            done = report.done,
            skipped = report.skipped,
            failed = report.failed(),
            "Generation finished"
        );
        report
    }

    /// Refresh and extract every branch concurrently, keeping input order
    async fn extract(&self, branches: &[String], report: &mut RunReport) -> Vec<Arc<Branch>> {
        let mut tasks = JoinSet::new();

        for (index, name) in branches.iter().enumerate() {
            let vcs = Arc::clone(&self.vcs);
            let extractor = self.extractor.clone();
            let name = name.clone();
            tasks.spawn(async move {
                info!(branch = %name, "Updating branch");
                if let Err(e) = vcs.fetch_branch(&name).await {
                    warn!(branch = %name, error = %e, "Unable to fetch branch");
                }
                let result = extractor.branch(&name).await;
                (index, name, result)
            });
        }

        let mut extracted: Vec<(usize, Arc<Branch>)> = Vec::with_capacity(branches.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, _, Ok(branch))) => extracted.push((index, Arc::new(branch))),
                Ok((_, name, Err(e))) => {
                    warn!(branch = %name, error = %e, "Skipping branch");
                    report.record(Outcome::Failed(format!("branch {name}: {e}")));
                }
                Err(e) => report.record(Outcome::Failed(format!("task failed: {e}"))),
            }
        }
        extracted.sort_by_key(|(index, _)| *index);
        extracted.into_iter().map(|(_, branch)| branch).collect()
    }

    fn spawn_commit_work(&self, tasks: &mut JoinSet<Outcome>, branch: &Arc<Branch>, index: usize) {
        let commit = &branch.commits[index];

        for parent in &commit.parents {
            let branch = Arc::clone(branch);
            let parent = parent.clone();
            let extractor = self.extractor.clone();
            let renderer = Arc::clone(&self.renderer);
            let layout = self.layout.clone();
            let project = self.project.clone();
            tasks.spawn(async move {
                let commit = &branch.commits[index];
                let diff = match extractor.resolver().diff_body(&commit.hash, &parent).await {
                    Ok(diff) => diff,
                    Err(e) => {
                        warn!(commit = %commit.abbr, parent_hash = %parent, error = %e, "Unable to diff against parent");
                        return Outcome::Failed(format!("diff {}..{}: {e}", parent, commit.abbr));
                    }
                };
                let page = Page::diff(&project, &branch.name, commit, &diff, renderer.annotator());
                write_page(&renderer, &page, &layout.diff_page(&commit.hash, &parent)).await
            });
        }

        for object in &commit.tree {
            let store = Arc::clone(&self.store);
            let object = object.clone();
            let hash = commit.hash.clone();
            let abbr = commit.abbr.clone();
            tasks.spawn(async move { store_object(&store, &object, &hash, &abbr).await });
        }
    }

    async fn write_branch(&self, branch: &Branch) -> Outcome {
        let page = Page::branch(&self.project, branch);
        write_page(&self.renderer, &page, &self.layout.branch_page(&branch.name)).await
    }

    async fn write_commit(&self, branch: &Branch, index: usize) -> Outcome {
        let commit = &branch.commits[index];
        let page = Page::commit(
            &self.project,
            &branch.name,
            commit,
            &self.types,
            self.renderer.annotator(),
        );
        write_page(&self.renderer, &page, &self.layout.commit_page(&commit.hash)).await
    }

    async fn write_index(&self, branches: &[Arc<Branch>]) -> Outcome {
        let page = Page::index(
            &self.project,
            branches.iter().map(AsRef::as_ref),
            self.link.as_deref(),
        );
        write_page(&self.renderer, &page, &self.layout.index_page()).await
    }
}

async fn write_page(renderer: &Renderer, page: &Page, path: &std::path::Path) -> Outcome {
    let html = match renderer.render(page) {
        Ok(html) => html,
        Err(e) => {
            warn!(page = %path.display(), error = %e, "Unable to render page");
            return Outcome::Failed(format!("{}: {e}", path.display()));
        }
    };
    match write_atomic(path, html.as_bytes()).await {
        Ok(()) => Outcome::Done,
        Err(e) => {
            warn!(page = %path.display(), error = %e, "Unable to write page");
            Outcome::Failed(format!("{}: {e}", path.display()))
        }
    }
}

async fn store_object(store: &ObjectStore, object: &Object, hash: &str, abbr: &str) -> Outcome {
    let artifact = match store.ensure_rendered(object).await {
        Ok(artifact) => artifact,
        Err(e) => {
            warn!(commit = %abbr, path = %object.path, error = %e, "Unable to store object");
            return Outcome::Failed(e.to_string());
        }
    };
    if let Err(e) = store.link(&artifact, hash, &object.path).await {
        warn!(commit = %abbr, path = %object.path, error = %e, "Unable to link object");
        return Outcome::Failed(e.to_string());
    }
    if artifact.fresh {
        Outcome::Done
    } else {
        Outcome::Skipped(format!("object {} exists", object.hash))
    }
}
