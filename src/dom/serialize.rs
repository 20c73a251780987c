//! Serialization of nodes back to HTML

use super::entities::{escape_attr, escape_text};
use super::node::{Element, Node};

/// Serialize a list of nodes the way `innerHTML` reads them back
pub fn serialize(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

/// Serialize one element including its own tag
pub fn serialize_element(el: &Element) -> String {
    let mut out = String::new();
    write_element(el, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_text(text)),
        Node::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push_str(&format!(r#" {}="{}""#, name, escape_attr(value)));
    }
    out.push('>');
    if el.is_void() {
        return;
    }
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str(&format!("</{}>", el.tag));
}
