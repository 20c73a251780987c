//! Template compositor
//!
//! Composition turns a template (Markdown/LaTeX prose with placeholder
//! spans) and a [`FieldRegistry`](crate::fragment::FieldRegistry) into a
//! rendered subtree:
//!
//! 1. the template is sanitized and parsed into a scratch fragment;
//! 2. placeholders with the `latex` format spec are replaced by the plain
//!    text of their field, so math reaches the renderer in one piece;
//! 3. the fragment is serialized, entity-decoded and rendered as Markdown;
//! 4. the remaining placeholders are rendered concurrently into their spans.
//!
//! # Example
//!
//! ```rust
//! use exercise_widgets::compositor::Compositor;
//! use exercise_widgets::dom::Element;
//! use exercise_widgets::fragment::{FieldRegistry, MimeBundle};
//! use exercise_widgets::render::{AllowListSanitizer, MarkdownRenderer};
//!
//! let registry = FieldRegistry::rebuild(
//!     vec![("x".to_string(), MimeBundle::plain("42"))],
//!     Vec::new(),
//! );
//! let (sanitizer, renderer) = (AllowListSanitizer::new(), MarkdownRenderer::new());
//! let compositor = Compositor::new(&sanitizer, &renderer);
//! let mut host = Element::new("div");
//! pollster::block_on(compositor.render_template("Value: <<x>>", &registry, &mut host)).unwrap();
//! assert_eq!(host.text_content().trim(), "Value: 42");
//! ```

mod compose;
mod placeholder;
mod shorthand;

pub use placeholder::{FormatSpec, Placeholder};
pub use shorthand::{expand_shorthand, FieldRef, ShorthandToken};

use crate::config::CompositorConfig;
use crate::render::{RichRenderer, Sanitizer};

/// Fields handled by one composition, each list in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposeReport {
    /// Substituted as plain text in the LaTeX pass
    pub inlined: Vec<String>,
    /// Rendered into their placeholder span
    pub rendered: Vec<String>,
    /// Unresolved, or a control placed in a LaTeX context; left empty
    pub skipped: Vec<String>,
}

impl ComposeReport {
    /// Every field that received content
    pub fn placed(&self) -> impl Iterator<Item = &str> {
        self.inlined
            .iter()
            .chain(self.rendered.iter())
            .map(String::as_str)
    }
}

/// Composes templates with a sanitizer and a rich renderer
pub struct Compositor<'a> {
    config: CompositorConfig,
    sanitizer: &'a dyn Sanitizer,
    renderer: &'a dyn RichRenderer,
}

impl<'a> Compositor<'a> {
    pub fn new(sanitizer: &'a dyn Sanitizer, renderer: &'a dyn RichRenderer) -> Self {
        Self {
            config: CompositorConfig::default(),
            sanitizer,
            renderer,
        }
    }

    pub fn with_config(mut self, config: CompositorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CompositorConfig {
        &self.config
    }

    pub fn renderer(&self) -> &'a dyn RichRenderer {
        self.renderer
    }
}
