//! Placeholder spans

use crate::config::CompositorConfig;
use crate::dom::Element;

/// How a placeholder's content is substituted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    /// Rendered as rich output in the second pass
    Rich,
    /// Replaced by plain text before Markdown rendering
    Latex,
}

impl FormatSpec {
    pub fn as_attr(&self) -> Option<&'static str> {
        match self {
            FormatSpec::Rich => None,
            FormatSpec::Latex => Some("latex"),
        }
    }
}

/// A marker span naming the field rendered in its place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub field: String,
    pub format: FormatSpec,
}

impl Placeholder {
    pub fn new(field: impl Into<String>, format: FormatSpec) -> Self {
        Self {
            field: field.into(),
            format,
        }
    }

    /// Read a placeholder from an element; `None` if it is not one.
    ///
    /// Format specs other than `latex` are treated as rich content.
    pub fn from_element(el: &Element, config: &CompositorConfig) -> Option<Self> {
        let field = el.attr(&config.field_name_attr)?;
        let format = match el.attr(&config.format_spec_attr) {
            Some("latex") => FormatSpec::Latex,
            _ => FormatSpec::Rich,
        };
        Some(Self::new(field, format))
    }

    pub fn to_element(&self, config: &CompositorConfig) -> Element {
        let mut span = Element::new("span").with_attr(&config.field_name_attr, self.field.clone());
        if let Some(spec) = self.format.as_attr() {
            span.set_attr(&config.format_spec_attr, spec);
        }
        span
    }
}
