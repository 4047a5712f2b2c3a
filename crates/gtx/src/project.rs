// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! One end-to-end run: prepare the output, clone, resolve branches, generate

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use gtx_git::log::remote_ref;
use gtx_git::{GitCli, Vcs, branch};
use gtx_render::Renderer;

use crate::config::Options;
use crate::error::SetupError;
use crate::generate::{Generator, RunReport};
use crate::layout::OutputLayout;

/// A private clone of the source repository, removed when dropped
#[derive(Debug)]
pub struct WorkingCopy {
    path: PathBuf,
    git: GitCli,
}

impl WorkingCopy {
    /// Clone `source` into a fresh directory under the user cache directory
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Clone` if git cannot clone `source`.
    pub async fn clone_from(source: &str, jobs: usize) -> Result<Self, SetupError> {
        let path = scratch_dir();
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| SetupError::Layout {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        info!(repo = %source, dir = %path.display(), "Cloning repository");
        let git = GitCli::clone_from(source, &path, jobs)
            .await
            .map_err(|e| SetupError::Clone {
                source_repo: source.to_string(),
                source: e,
            })?;
        Ok(Self { path, git })
    }

    /// The git handle for this copy
    #[must_use]
    pub fn git(&self) -> &GitCli {
        &self.git
    }

    /// Where the copy lives
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            debug!(dir = %self.path.display(), error = %e, "Unable to remove working copy");
        }
    }
}

fn scratch_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("gtx")
        .join(format!("gtx-{}", Uuid::new_v4().simple()))
}

/// Generate the site described by `options`
///
/// Per-item failures are logged and reported in the returned [`RunReport`];
/// only problems that leave no usable site are errors.
///
/// # Errors
///
/// Returns `SetupError` if the output directory cannot be prepared, the
/// settings cannot be saved, the template cannot be loaded, the repository
/// cannot be cloned, its branches cannot be listed or the home page cannot be
/// written.
pub async fn run(options: &Options) -> Result<RunReport, SetupError> {
    let layout = OutputLayout::new(&options.output);
    layout.prepare(options.force)?;
    options.settings().save(layout.root())?;

    let renderer = match &options.template {
        Some(template) => Renderer::from_file(template)?,
        None => Renderer::new()?,
    };

    let copy = WorkingCopy::clone_from(&options.repo, options.jobs).await?;
    let vcs: Arc<dyn Vcs> = Arc::new(copy.git().clone());

    let branches = branch::resolve(vcs.as_ref(), &options.branches)
        .await
        .map_err(SetupError::Branches)?;
    info!(count = branches.len(), "Resolved branches");

    if let Some(first) = branches.first()
        && let Err(e) = vcs.checkout(&remote_ref(first)).await
    {
        warn!(branch = %first, error = %e, "Unable to check out branch");
    }

    let report = Generator::new(vcs, renderer, layout, &options.project)
        .with_link(options.url.clone())
        .run(&branches)
        .await;

    if !report.index_written {
        let reason = report
            .failures
            .last()
            .cloned()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(SetupError::Index(reason));
    }

    Ok(report)
}
