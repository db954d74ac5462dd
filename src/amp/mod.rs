//! AMP rendition of posts
//!
//! A request for `/<post-path>/amp/` runs two steps:
//! - [`ContentResolver`] maps the request path to a post and attaches it
//! - [`PageRenderer`] renders the attached post with the theme's AMP
//!   template, or with the fallback template shipped with the installation

pub mod path;
mod renderer;
mod resolver;

use std::path::{Path, PathBuf};

use crate::content::Post;

pub use renderer::{PageRenderer, Rendered, ViewRenderer, DATA_KEY};
pub use resolver::ContentResolver;

/// Fallback template, relative to the installation root
pub const FALLBACK_TEMPLATE: &str = "views/amp.html";

/// Per-request state carried through the pipeline
#[derive(Debug, Clone, Default)]
pub struct AmpRequest {
    /// Path as received, including any installation subdirectory
    pub original_path: String,
    /// Request-local rewrite of `original_path` without the subdirectory
    pub relative_path: Option<String>,
    /// Set by [`ContentResolver`]
    pub content: Option<Post>,
}

impl AmpRequest {
    pub fn new(original_path: impl Into<String>) -> Self {
        Self {
            original_path: original_path.into(),
            ..Self::default()
        }
    }

    pub fn with_relative_path(mut self, relative_path: impl Into<String>) -> Self {
        self.relative_path = Some(relative_path.into());
        self
    }
}

/// Templates available to [`PageRenderer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    pub theme_template: Option<PathBuf>,
    pub fallback_template: PathBuf,
}

impl RenderContext {
    pub fn new(theme_template: Option<PathBuf>, app_root: &Path) -> Self {
        Self {
            theme_template,
            fallback_template: fallback_template(app_root),
        }
    }

    /// The template a render with this context uses
    pub fn template(&self) -> &Path {
        self.theme_template
            .as_deref()
            .unwrap_or(&self.fallback_template)
    }
}

pub fn fallback_template(app_root: &Path) -> PathBuf {
    app_root.join(FALLBACK_TEMPLATE)
}
