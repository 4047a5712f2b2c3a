// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gtx library
//!
//! Renders the history of a git repository as a static HTML site: a home
//! page listing branches, one page per branch, commit and diff pages, and
//! line-numbered file pages shared between commits through a
//! content-addressable object store.
//!
//! The binary is a thin wrapper around [`project::run`]; the pieces are
//! exported for integration tests.

pub mod config;
pub mod error;
pub mod generate;
pub mod layout;
pub mod project;
pub mod store;

pub use config::{Cli, ConfigError, Options, Settings};
pub use error::{SetupError, StoreError};
pub use generate::{Generator, Outcome, RunReport};
pub use layout::OutputLayout;
pub use store::{Artifact, ObjectStore};
