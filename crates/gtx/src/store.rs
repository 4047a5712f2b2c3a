// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Content-addressable object store
//!
//! File content is rendered once per content hash into `object/<xx>/` and
//! hard linked into every commit directory that contains it. Text becomes a
//! line-numbered page, binary content is stored as is.
//!
//! The form of an artifact follows the extension of the path it is requested
//! for, so one hash reachable as both `logo.png` and `logo.txt` is stored in
//! both forms. Within a run every (hash, form) pair owns a [`OnceCell`];
//! concurrent requests for it wait for the first one instead of rendering
//! again. Across runs an artifact already on disk in the requested form is
//! reused untouched.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::debug;

use gtx_git::{BinaryTypes, Object, Vcs};
use gtx_render::{Page, Renderer};

use crate::error::StoreError;
use crate::layout::{OutputLayout, write_atomic};

/// A stored rendering of one content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Location under `object/`
    pub path: PathBuf,
    /// Raw bytes rather than an HTML page
    pub binary: bool,
    /// Written by this run rather than found on disk
    pub fresh: bool,
}

/// Renders, stores and links file content by hash
pub struct ObjectStore {
    vcs: Arc<dyn Vcs>,
    renderer: Arc<Renderer>,
    layout: OutputLayout,
    types: BinaryTypes,
    project: String,
    cells: Mutex<HashMap<(String, bool), Arc<OnceCell<Artifact>>>>,
}

impl ObjectStore {
    /// Create a store writing under `layout`
    #[must_use]
    pub fn new(
        vcs: Arc<dyn Vcs>,
        renderer: Arc<Renderer>,
        layout: OutputLayout,
        types: BinaryTypes,
        project: &str,
    ) -> Self {
        Self {
            vcs,
            renderer,
            layout,
            types,
            project: project.to_string(),
            cells: Mutex::new(HashMap::new()),
        }
    }

    /// The artifact for `object`, rendering it if this is the first request
    ///
    /// Binary or text is decided by the extension of `object.path`, the same
    /// way commit pages decide how to link it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the content cannot be read, rendered or
    /// written. A failed hash may be retried by a later call.
    pub async fn ensure_rendered(&self, object: &Object) -> Result<Artifact, StoreError> {
        let binary = self.types.is_binary_path(&object.path);
        let cell = Arc::clone(
            self.cells
                .lock()
                .entry((object.hash.clone(), binary))
                .or_default(),
        );
        let artifact = cell
            .get_or_try_init(|| self.materialize(object, binary))
            .await?;
        Ok(artifact.clone())
    }

    /// Number of distinct artifacts requested so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.lock().len()
    }

    /// True if nothing has been requested yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.lock().is_empty()
    }

    async fn materialize(&self, object: &Object, binary: bool) -> Result<Artifact, StoreError> {
        let path = self.layout.object_artifact(&object.hash, binary);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!(object = %object.hash, binary, "Artifact exists");
            return Ok(Artifact {
                path,
                binary,
                fresh: false,
            });
        }

        let content = self
            .vcs
            .show_blob(&object.hash)
            .await
            .map_err(|source| StoreError::Show {
                hash: object.hash.clone(),
                source,
            })?;

        let bytes = if binary {
            content
        } else {
            let page = Page::object(&self.project, object, &content);
            self.renderer
                .render(&page)
                .map_err(|source| StoreError::Render {
                    hash: object.hash.clone(),
                    source,
                })?
                .into_bytes()
        };

        write_atomic(&path, &bytes)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        debug!(object = %object.hash, binary, "Stored artifact");

        Ok(Artifact {
            path,
            binary,
            fresh: true,
        })
    }

    /// Link `artifact` into commit `hash` as `path`
    ///
    /// Returns the link location. An existing link counts as success.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Link` if neither a hard link nor a copy can be
    /// made.
    pub async fn link(
        &self,
        artifact: &Artifact,
        hash: &str,
        path: &str,
    ) -> Result<PathBuf, StoreError> {
        let dest = self.layout.commit_file(hash, path, artifact.binary);
        link_or_copy(&artifact.path, &dest)
            .await
            .map_err(|source| StoreError::Link {
                from: artifact.path.clone(),
                to: dest.clone(),
                source,
            })?;
        Ok(dest)
    }
}

/// Hard link `src` at `dest`, falling back to a copy where links are not
/// available
///
/// # Errors
///
/// Returns the I/O error if the parent directory cannot be created or both
/// linking and copying fail.
pub async fn link_or_copy(src: &Path, dest: &Path) -> io::Result<()> {
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::hard_link(src, dest).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::Unsupported | io::ErrorKind::CrossesDevices
            ) =>
        {
            debug!(from = %src.display(), to = %dest.display(), error = %e, "Copying instead of linking");
            tokio::fs::copy(src, dest).await.map(|_| ())
        }
        Err(e) => Err(e),
    }
}
