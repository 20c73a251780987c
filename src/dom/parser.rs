//! Tree construction for HTML fragments

use super::entities::unescape_html;
use super::lexer::{lex, HtmlToken};
use super::node::{Element, Node};

/// Parse an HTML fragment into a list of root nodes.
///
/// The builder is forgiving in the way `innerHTML` is: unmatched end tags
/// are ignored, unclosed elements are closed at the end of input, void
/// elements never take children and comments are dropped. Character
/// references in text and attribute values are decoded.
pub fn parse_fragment(html: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();

    for (token, _span) in lex(html) {
        match token {
            HtmlToken::Text(raw) => builder.push_text(&unescape_html(&raw)),
            HtmlToken::Lt => builder.push_text("<"),
            HtmlToken::Comment(_) | HtmlToken::Declaration => {}
            HtmlToken::StartTag(tag) => {
                let el = Element {
                    tag: tag.name,
                    attrs: tag.attrs,
                    children: Vec::new(),
                };
                if tag.self_closing || el.is_void() {
                    builder.push_node(Node::Element(el));
                } else {
                    builder.open.push(el);
                }
            }
            HtmlToken::EndTag(name) => builder.close(&name),
        }
    }

    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    roots: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn children_mut(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = self.children_mut();
        if let Some(Node::Text(prev)) = children.last_mut() {
            prev.push_str(text);
        } else {
            children.push(Node::Text(text.to_string()));
        }
    }

    fn push_node(&mut self, node: Node) {
        self.children_mut().push(node);
    }

    fn close(&mut self, name: &str) {
        let Some(pos) = self.open.iter().rposition(|el| el.tag == name) else {
            return;
        };
        while self.open.len() > pos {
            if let Some(el) = self.open.pop() {
                self.push_node(Node::Element(el));
            }
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while let Some(el) = self.open.pop() {
            self.push_node(Node::Element(el));
        }
        self.roots
    }
}
