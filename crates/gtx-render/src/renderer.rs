// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Handlebars page rendering

use std::path::Path;

use handlebars::Handlebars;
use tracing::debug;

use crate::annotate::Annotator;
use crate::error::RenderError;
use crate::page::Page;

/// The template used when no external one is given
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/page.html.hbs");

const TEMPLATE_NAME: &str = "page";

/// Renders [`Page`]s through a single compiled template
///
/// The template receives the serialised page and branches on its `kind`.
pub struct Renderer {
    registry: Handlebars<'static>,
    annotator: Annotator,
}

impl Renderer {
    /// Use the embedded template
    ///
    /// # Errors
    ///
    /// Returns `RenderError` if the template fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        Self::from_template(DEFAULT_TEMPLATE)
    }

    /// Compile `source` as the page template
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Template` if `source` is not a valid template.
    pub fn from_template(source: &str) -> Result<Self, RenderError> {
        let mut registry = Handlebars::new();
        registry.register_template_string(TEMPLATE_NAME, source)?;
        Ok(Self {
            registry,
            annotator: Annotator::new()?,
        })
    }

    /// Load the page template from `path`
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Io` if the file cannot be read and
    /// `RenderError::Template` if it does not compile.
    pub fn from_file(path: &Path) -> Result<Self, RenderError> {
        let source = std::fs::read_to_string(path).map_err(|source| RenderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(template = %path.display(), "Loaded external template");
        Self::from_template(&source)
    }

    /// The diff annotator pages are built with
    #[must_use]
    pub fn annotator(&self) -> &Annotator {
        &self.annotator
    }

    /// Render `page` to HTML
    ///
    /// # Errors
    ///
    /// Returns `RenderError::Render` if the template fails on this page.
    pub fn render(&self, page: &Page) -> Result<String, RenderError> {
        Ok(self.registry.render(TEMPLATE_NAME, page)?)
    }
}
