// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gtx-git

use thiserror::Error;

/// Errors that can occur while talking to git or reading its output
#[derive(Debug, Error)]
pub enum GitError {
    /// The git process could not be started
    #[error("Failed to run git {command}: {source}")]
    Spawn {
        /// The git subcommand and arguments
        command: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// git ran but exited unsuccessfully
    #[error("git {command} failed ({status}): {stderr}")]
    Command {
        /// The git subcommand and arguments
        command: String,
        /// Exit status as reported by the OS
        status: String,
        /// Captured standard error, trimmed
        stderr: String,
    },

    /// Repository not found at the specified path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched for a repository
        path: String,
    },

    /// A line of git output did not have the expected shape
    #[error("Malformed git output: {message}")]
    Malformed {
        /// Description of what was wrong
        message: String,
    },

    /// A commit date could not be parsed
    #[error("Invalid commit date {value:?}: {source}")]
    InvalidDate {
        /// The raw date field
        value: String,
        /// The underlying parse error
        source: chrono::ParseError,
    },
}
