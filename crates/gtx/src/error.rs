// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gtx

use std::path::PathBuf;

use gtx_git::GitError;
use gtx_render::RenderError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors from the content-addressable object store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The object's content could not be read from git
    #[error("Failed to read object {hash}: {source}")]
    Show {
        /// Content hash
        hash: String,
        /// The underlying git error
        source: GitError,
    },

    /// The object page failed to render
    #[error("Failed to render object {hash}: {source}")]
    Render {
        /// Content hash
        hash: String,
        /// The underlying render error
        source: RenderError,
    },

    /// The artifact could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination path
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The artifact could not be linked or copied into a commit directory
    #[error("Failed to link {from} to {to}: {source}")]
    Link {
        /// The artifact
        from: PathBuf,
        /// The link location
        to: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Errors that stop a run before or after generation
#[derive(Debug, Error)]
pub enum SetupError {
    /// Output directories could not be cleared or created
    #[error("Failed to prepare output directory {path}: {source}")]
    Layout {
        /// The directory
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The effective options could not be saved
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The page template could not be loaded
    #[error(transparent)]
    Template(#[from] RenderError),

    /// The working copy could not be created
    #[error("Failed to clone {source_repo}: {source}")]
    Clone {
        /// The repository being cloned
        source_repo: String,
        /// The underlying git error
        source: GitError,
    },

    /// Branches could not be listed
    #[error("Failed to list branches: {0}")]
    Branches(#[source] GitError),

    /// The home page could not be written
    #[error("Failed to write the home page: {0}")]
    Index(String),
}
