// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Error types for gtx-render

use thiserror::Error;

/// Errors that can occur while loading templates or rendering pages
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template source did not compile
    #[error("Invalid page template: {0}")]
    Template(#[from] handlebars::TemplateError),

    /// A page failed to render against the template
    #[error("Failed to render page: {0}")]
    Render(#[from] handlebars::RenderError),

    /// An annotation pattern did not compile
    #[error("Invalid annotation pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An external template file could not be read
    #[error("Failed to read template {path}: {source}")]
    Io {
        /// Path of the template file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },
}
