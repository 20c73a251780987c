//! Rich-output rendering and sanitizing collaborators
//!
//! The compositor never interprets MIME bundles itself. It asks a
//! [`RichRenderer`] to turn a bundle into a DOM subtree and a [`Sanitizer`]
//! to clean raw template HTML.

mod markdown;
mod sanitize;

use futures_util::future::LocalBoxFuture;

use crate::dom::Node;
use crate::error::RenderError;
use crate::fragment::MimeBundle;

pub use markdown::MarkdownRenderer;
pub use sanitize::AllowListSanitizer;

/// Representation kinds a renderer can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MimeKind {
    Html,
    Markdown,
    Latex,
    Svg,
    Png,
    Jpeg,
    Plain,
}

impl MimeKind {
    /// Richest first
    pub const PREFERENCE: [MimeKind; 7] = [
        MimeKind::Html,
        MimeKind::Markdown,
        MimeKind::Latex,
        MimeKind::Svg,
        MimeKind::Png,
        MimeKind::Jpeg,
        MimeKind::Plain,
    ];

    pub fn mime_type(&self) -> &'static str {
        match self {
            MimeKind::Html => "text/html",
            MimeKind::Markdown => "text/markdown",
            MimeKind::Latex => "text/latex",
            MimeKind::Svg => "image/svg+xml",
            MimeKind::Png => "image/png",
            MimeKind::Jpeg => "image/jpeg",
            MimeKind::Plain => "text/plain",
        }
    }

    pub fn from_mime_type(mime: &str) -> Option<Self> {
        Self::PREFERENCE
            .into_iter()
            .find(|kind| kind.mime_type() == mime)
    }
}

/// Renders MIME bundles into DOM subtrees
pub trait RichRenderer {
    /// The representation that [`RichRenderer::render`] would use, if any
    fn preferred_format(&self, bundle: &MimeBundle) -> Option<MimeKind>;

    fn render<'a>(&'a self, bundle: &'a MimeBundle) -> LocalBoxFuture<'a, Result<Node, RenderError>>;
}

/// Cleans untrusted HTML
pub trait Sanitizer {
    fn sanitize(&self, html: &str) -> String;
}
