// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gtx-git: Git history extraction for gtx
//!
//! This library crate discovers branches, walks their history and resolves
//! trees and diffs by running the `git` binary against a working copy and
//! parsing its textual output into typed records.

#![warn(missing_docs)]

//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use gtx_git::{BinaryTypes, Extractor, GitCli};
//!
//! # async fn run() -> Result<(), gtx_git::GitError> {
//! let git = Arc::new(GitCli::open("/tmp/working-copy", 8)?);
//! let branches = gtx_git::branch::resolve(git.as_ref(), &[]).await?;
//! let extractor = Extractor::new(git, BinaryTypes::new());
//!
//! for name in &branches {
//!     let branch = extractor.branch(name).await?;
//!     println!("{}: {} commits", branch.name, branch.commits.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod branch;
pub mod commit;
pub mod error;
pub mod gateway;
pub mod log;
pub mod memory;
pub mod tree;

pub use commit::{Author, Branch, Commit, Diff, GraphRow, Object, Overview};
pub use error::GitError;
pub use gateway::{GitCli, Vcs};
pub use log::{Extractor, LogFormat};
pub use tree::{BinaryTypes, TreeResolver};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::{Branch, Commit, Object};
    pub use crate::error::GitError;
    pub use crate::gateway::{GitCli, Vcs};
    pub use crate::log::Extractor;
    pub use crate::tree::BinaryTypes;
}
