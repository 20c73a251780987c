//! Minimal DOM for composing rendered exercise content
//!
//! Rendered content is a tree of [`Node`]s. HTML fragments are read with
//! [`parse_fragment`] and written back with [`serialize`], which together
//! behave like assigning and reading an element's `innerHTML`.

pub mod entities;
pub mod lexer;
pub mod node;
mod parser;
mod serialize;

pub use entities::{escape_attr, escape_text, unescape_html};
pub use node::{element_paths, node_at_path_mut, Element, Node, NodePath};
pub use parser::parse_fragment;
pub use serialize::{serialize, serialize_element};
