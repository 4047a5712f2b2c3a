// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Paths of everything written under the output directory
//!
//! ```text
//! index.html
//! branch/<name>/index.html
//! commit/<hash>/index.html
//! commit/<hash>/diff-to-<parent>.html
//! commit/<hash>/<path>[.html]      links into object/
//! object/<xx>/<hash>[.html]
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::error::SetupError;

const BRANCH_DIR: &str = "branch";
const COMMIT_DIR: &str = "commit";
const OBJECT_DIR: &str = "object";
const INDEX_PAGE: &str = "index.html";

/// The output directory tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Lay out the site under `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the top-level directories
    ///
    /// With `force`, rendered commits and objects from earlier runs are
    /// removed first. Branch pages are always kept.
    ///
    /// # Errors
    ///
    /// Returns `SetupError::Layout` if a directory cannot be removed or
    /// created.
    pub fn prepare(&self, force: bool) -> Result<(), SetupError> {
        for dir in [BRANCH_DIR, COMMIT_DIR, OBJECT_DIR] {
            let path = self.root.join(dir);

            if force && dir != BRANCH_DIR {
                match std::fs::remove_dir_all(&path) {
                    Ok(()) => debug!(dir = %path.display(), "Cleared directory"),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                    Err(source) => return Err(SetupError::Layout { path, source }),
                }
            }

            std::fs::create_dir_all(&path).map_err(|source| SetupError::Layout {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// `index.html`
    #[must_use]
    pub fn index_page(&self) -> PathBuf {
        self.root.join(INDEX_PAGE)
    }

    /// `branch/<name>/index.html`
    #[must_use]
    pub fn branch_page(&self, name: &str) -> PathBuf {
        self.root.join(BRANCH_DIR).join(name).join(INDEX_PAGE)
    }

    /// `commit/<hash>/`
    #[must_use]
    pub fn commit_dir(&self, hash: &str) -> PathBuf {
        self.root.join(COMMIT_DIR).join(hash)
    }

    /// `commit/<hash>/index.html`
    #[must_use]
    pub fn commit_page(&self, hash: &str) -> PathBuf {
        self.commit_dir(hash).join(INDEX_PAGE)
    }

    /// `commit/<hash>/diff-to-<parent>.html`
    #[must_use]
    pub fn diff_page(&self, hash: &str, parent: &str) -> PathBuf {
        self.commit_dir(hash).join(format!("diff-to-{parent}.html"))
    }

    /// Where a file of commit `hash` is linked: `<path>.html`, or `<path>`
    /// for binary content
    #[must_use]
    pub fn commit_file(&self, hash: &str, path: &str, binary: bool) -> PathBuf {
        let file = if binary {
            path.to_string()
        } else {
            format!("{path}.html")
        };
        self.commit_dir(hash).join(file)
    }

    /// `object/<xx>/`
    #[must_use]
    pub fn object_dir(&self, hash: &str) -> PathBuf {
        self.root.join(OBJECT_DIR).join(&hash[..2.min(hash.len())])
    }

    /// The stored artifact for `hash`: `<hash>.html`, or `<hash>` raw
    #[must_use]
    pub fn object_artifact(&self, hash: &str, binary: bool) -> PathBuf {
        let file = if binary {
            hash.to_string()
        } else {
            format!("{hash}.html")
        };
        self.object_dir(hash).join(file)
    }
}

/// Write `contents` to `path` through a scratch file in the same directory
///
/// Parent directories are created as needed. Readers see either the previous
/// file or the complete new one.
///
/// # Errors
///
/// Returns the I/O error of whichever step failed.
pub async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    tokio::fs::create_dir_all(dir).await?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let scratch = dir.join(format!(".{name}.{}.tmp", Uuid::new_v4().simple()));

    tokio::fs::write(&scratch, contents).await?;
    if let Err(e) = tokio::fs::rename(&scratch, path).await {
        let _ = tokio::fs::remove_file(&scratch).await;
        return Err(e);
    }
    Ok(())
}
