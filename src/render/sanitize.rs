//! Allow-list HTML sanitizer

use super::Sanitizer;
use crate::dom::{parse_fragment, serialize, Element, Node};

const DROPPED_ELEMENTS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "frame", "frameset", "base", "meta", "link",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

/// Removes active content while keeping markup (including placeholder
/// spans and their `data-*` attributes) intact
#[derive(Debug, Clone, Default)]
pub struct AllowListSanitizer;

impl AllowListSanitizer {
    pub fn new() -> Self {
        Self
    }

    fn clean_nodes(&self, nodes: Vec<Node>) -> Vec<Node> {
        nodes
            .into_iter()
            .filter_map(|node| match node {
                Node::Element(el) => self.clean_element(el).map(Node::Element),
                text => Some(text),
            })
            .collect()
    }

    fn clean_element(&self, mut el: Element) -> Option<Element> {
        if DROPPED_ELEMENTS.contains(&el.tag.as_str()) {
            tracing::debug!(tag = %el.tag, "sanitizer dropped element");
            return None;
        }
        el.attrs.retain(|(name, value)| {
            let name = name.to_ascii_lowercase();
            if name.starts_with("on") {
                return false;
            }
            !(URL_ATTRIBUTES.contains(&name.as_str()) && is_script_url(value))
        });
        let children = std::mem::take(&mut el.children);
        el.children = self.clean_nodes(children);
        Some(el)
    }
}

fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    compact.starts_with("javascript:") || compact.starts_with("vbscript:")
}

impl Sanitizer for AllowListSanitizer {
    fn sanitize(&self, html: &str) -> String {
        serialize(&self.clean_nodes(parse_fragment(html)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(html: &str) -> String {
        AllowListSanitizer::new().sanitize(html)
    }

    #[test]
    fn test_placeholder_spans_survive() {
        let html = r#"Value: <span data-field-name="x" data-format-spec="latex"></span>"#;
        assert_eq!(sanitize(html), html);
    }

    #[test]
    fn test_scripts_are_removed() {
        insta::assert_snapshot!(
            sanitize("a<script>alert(1)</script><b onclick=\"x()\">b</b>"),
            @"a<b>b</b>"
        );
    }

    #[test]
    fn test_javascript_urls_are_removed() {
        insta::assert_snapshot!(
            sanitize(r#"<a href=" JavaScript:alert(1)">x</a><a href="https://example.org">y</a>"#),
            @r#"<a>x</a><a href="https://example.org">y</a>"#
        );
    }

    #[test]
    fn test_latex_text_is_kept() {
        assert_eq!(sanitize(r"$\frac{a}{b}$"), r"$\frac{a}{b}$");
    }
}
