// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! gtx-render: HTML pages for gtx
//!
//! Turns extracted history into pages: a [`Page`] is built from gtx-git
//! records, then rendered by a [`Renderer`] through a Handlebars template
//! (embedded by default, replaceable with an external file).
//!
//! # Example
//!
//! ```
//! use gtx_git::Branch;
//! use gtx_render::{Page, Renderer};
//!
//! # fn main() -> Result<(), gtx_render::RenderError> {
//! let branches: Vec<Branch> = Vec::new();
//! let renderer = Renderer::new()?;
//! let html = renderer.render(&Page::index("Jimbo", &branches, None))?;
//! assert!(html.contains("<title>Jimbo</title>"));
//! # Ok(())
//! # }
//! ```

pub mod annotate;
pub mod error;
pub mod page;
pub mod renderer;

pub use annotate::Annotator;
pub use error::RenderError;
pub use page::{Page, PageData, PageKind};
pub use renderer::{DEFAULT_TEMPLATE, Renderer};
