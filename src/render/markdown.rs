//! Markdown-backed rich renderer

use futures_util::future::{self, FutureExt, LocalBoxFuture};
use pulldown_cmark::{html, Options, Parser};

use super::{MimeKind, RichRenderer};
use crate::dom::{parse_fragment, Element, Node};
use crate::error::RenderError;
use crate::fragment::MimeBundle;

/// Renders bundles by preferring HTML, then Markdown (via `pulldown-cmark`),
/// then LaTeX, images and finally plain text.
///
/// Output is wrapped in a `div.rendered` carrying the chosen MIME type.
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES | Options::ENABLE_MATH,
        }
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Convert Markdown source to an HTML string
    pub fn markdown_to_html(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut out, Parser::new_ext(source, self.options));
        out
    }

    pub fn render_now(&self, bundle: &MimeBundle) -> Result<Node, RenderError> {
        let kind = self
            .preferred_format(bundle)
            .ok_or_else(|| RenderError::NoSupportedFormat {
                available: bundle.mime_types().map(str::to_string).collect(),
            })?;
        let mime = kind.mime_type();
        let content = bundle
            .get_str(mime)
            .ok_or_else(|| RenderError::InvalidPayload {
                mime: mime.to_string(),
                message: "content is not text".to_string(),
            })?;

        let children: Vec<Node> = match kind {
            MimeKind::Html | MimeKind::Svg => parse_fragment(&content),
            MimeKind::Markdown => parse_fragment(&self.markdown_to_html(&content)),
            MimeKind::Latex => vec![Element::new("span")
                .with_class("math")
                .with_text(content)
                .into()],
            MimeKind::Png | MimeKind::Jpeg => vec![Element::new("img")
                .with_attr("src", format!("data:{};base64,{}", mime, content.trim()))
                .into()],
            MimeKind::Plain => vec![Element::new("pre").with_text(content).into()],
        };

        let mut wrapper = Element::new("div")
            .with_class("rendered")
            .with_attr("data-mime-type", mime);
        wrapper.replace_children(children);
        Ok(wrapper.into())
    }
}

impl RichRenderer for MarkdownRenderer {
    fn preferred_format(&self, bundle: &MimeBundle) -> Option<MimeKind> {
        MimeKind::PREFERENCE
            .into_iter()
            .find(|kind| bundle.contains(kind.mime_type()))
    }

    fn render<'a>(&'a self, bundle: &'a MimeBundle) -> LocalBoxFuture<'a, Result<Node, RenderError>> {
        future::ready(self.render_now(bundle)).boxed_local()
    }
}
