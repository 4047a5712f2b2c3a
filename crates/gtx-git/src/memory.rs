// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! An in-memory [`Vcs`] that replays canned git output
//!
//! Responses are keyed by the exact argument list (joined with single
//! spaces). Any invocation without a canned response fails the way git would,
//! which makes it easy to exercise the partial-failure paths.
//!
//! ```
//! use gtx_git::memory::MemoryVcs;
//! use gtx_git::Vcs;
//!
//! # tokio_test_block(async {
//! let vcs = MemoryVcs::new();
//! vcs.respond(&["cat-file", "blob", "abc"], "hello\n");
//! assert_eq!(vcs.show_blob("abc").await.unwrap(), b"hello\n");
//! assert!(vcs.show_blob("def").await.is_err());
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f)
//! # }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};

use crate::error::GitError;
use crate::gateway::Vcs;

/// Canned-response [`Vcs`] for tests
#[derive(Debug, Default)]
pub struct MemoryVcs {
    responses: RwLock<HashMap<String, Vec<u8>>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryVcs {
    /// Create a double with no responses
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `git <args>` with `output`
    pub fn respond(&self, args: &[&str], output: impl Into<Vec<u8>>) -> &Self {
        self.responses.write().insert(args.join(" "), output.into());
        self
    }

    /// Remove the response for `git <args>`, making it fail
    pub fn forget(&self, args: &[&str]) -> &Self {
        self.responses.write().remove(&args.join(" "));
        self
    }

    /// Every invocation so far, in call order
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Number of invocations whose arguments start with `prefix`
    #[must_use]
    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }
}

#[async_trait]
impl Vcs for MemoryVcs {
    async fn run(&self, args: Vec<String>) -> Result<Vec<u8>, GitError> {
        let command = args.join(" ");
        self.calls.lock().push(command.clone());

        match self.responses.read().get(&command) {
            Some(output) => Ok(output.clone()),
            None => Err(GitError::Command {
                command,
                status: "exit status: 128".to_string(),
                stderr: "fatal: no canned response".to_string(),
            }),
        }
    }
}
