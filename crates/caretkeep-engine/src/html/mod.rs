//! # Markup codec
//!
//! Reads markup into a [`Tree`] and writes subtrees back out. Hosts replace
//! editable content in bulk through [`set_inner_html`], which is exactly the
//! kind of rewrite the normalizer repairs afterwards.

pub mod cursor;
pub mod parser;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::dom::{NodeId, NodeKind, Tree};
use crate::error::HtmlError;
use crate::schema::HostSchema;

pub use parser::parse_into;

/// Replaces the children of `node` with the parsed `markup`.
pub fn set_inner_html(
    tree: &mut Tree,
    node: NodeId,
    markup: &str,
    schema: &HostSchema,
) -> Result<(), HtmlError> {
    tree.clear_children(node);
    parse_into(tree, node, markup, schema)
}

/// Serializes the children of `node`.
pub fn inner_html(tree: &Tree, node: NodeId, schema: &HostSchema) -> String {
    let mut out = String::new();
    for &child in tree.children(node) {
        write_node(tree, child, schema, &mut out);
    }
    out
}

/// Serializes `node` itself, including its own tag.
pub fn outer_html(tree: &Tree, node: NodeId, schema: &HostSchema) -> String {
    let mut out = String::new();
    write_node(tree, node, schema, &mut out);
    out
}

fn write_node(tree: &Tree, node: NodeId, schema: &HostSchema, out: &mut String) {
    match tree.kind(node) {
        NodeKind::Text(text) => out.push_str(&encode_text(text)),
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.name);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&encode_double_quoted_attribute(value));
                out.push('"');
            }
            out.push('>');
            if schema.is_void(&element.name) && tree.children(node).is_empty() {
                return;
            }
            for &child in tree.children(node) {
                write_node(tree, child, schema, out);
            }
            out.push_str("</");
            out.push_str(&element.name);
            out.push('>');
        }
        NodeKind::Document | NodeKind::Fragment { .. } => {
            for &child in tree.children(node) {
                write_node(tree, child, schema, out);
            }
        }
    }
}
