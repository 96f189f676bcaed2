//! Host-supplied element classification.
//!
//! The editing core never decides by itself which elements are void, block
//! or paragraph-like, nor what a selection marker looks like: the host hands
//! that over as a [`HostSchema`]. Defaults follow HTML5.

use serde::{Deserialize, Serialize};

use crate::dom::{NodeId, Tree};

/// HTML5 void elements: they can never hold children.
pub const HTML5_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

pub const HTML5_BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "audio",
    "blockquote",
    "canvas",
    "dd",
    "div",
    "dl",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hgroup",
    "hr",
    "li",
    "main",
    "nav",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "tfoot",
    "ul",
    "video",
];

fn strings(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

/// The tag and class that identify a selection marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSpec {
    pub tag: String,
    pub class: String,
}

impl Default for MarkerSpec {
    fn default() -> Self {
        Self {
            tag: "em".to_string(),
            class: "caretkeep-marker".to_string(),
        }
    }
}

impl MarkerSpec {
    /// Creates a detached marker element.
    pub fn create(&self, tree: &mut Tree) -> NodeId {
        tree.create_element_with_class(&self.tag, &self.class)
    }

    pub fn matches(&self, tree: &Tree, node: NodeId) -> bool {
        tree.element(node).is_some_and(|element| {
            element.name.eq_ignore_ascii_case(&self.tag) && element.has_class(&self.class)
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSchema {
    /// Elements that can never contain children.
    pub void_elements: Vec<String>,
    /// Elements that always need their own caret host when empty.
    pub block_elements: Vec<String>,
    /// Elements treated as a line when asking whether the caret sits on an
    /// empty line.
    pub paragraph_elements: Vec<String>,
    /// Tag inserted into empty elements so they stay selectable.
    pub placeholder: String,
    pub marker: MarkerSpec,
}

impl Default for HostSchema {
    fn default() -> Self {
        Self {
            void_elements: strings(HTML5_VOID_ELEMENTS),
            block_elements: strings(HTML5_BLOCK_ELEMENTS),
            paragraph_elements: strings(&["p"]),
            placeholder: "br".to_string(),
            marker: MarkerSpec::default(),
        }
    }
}

fn listed(list: &[String], name: &str) -> bool {
    list.iter().any(|entry| entry.eq_ignore_ascii_case(name))
}

impl HostSchema {
    pub fn is_void(&self, name: &str) -> bool {
        listed(&self.void_elements, name)
    }

    pub fn is_block(&self, name: &str) -> bool {
        listed(&self.block_elements, name)
    }

    pub fn is_paragraph(&self, name: &str) -> bool {
        listed(&self.paragraph_elements, name)
    }

    pub fn is_void_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.tag_name(node).is_some_and(|name| self.is_void(name))
    }

    pub fn is_block_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.tag_name(node).is_some_and(|name| self.is_block(name))
    }

    pub fn is_paragraph_node(&self, tree: &Tree, node: NodeId) -> bool {
        tree.tag_name(node).is_some_and(|name| self.is_paragraph(name))
    }

    pub fn is_marker(&self, tree: &Tree, node: NodeId) -> bool {
        self.marker.matches(tree, node)
    }

    /// Creates a detached placeholder element.
    pub fn create_placeholder(&self, tree: &mut Tree) -> NodeId {
        tree.create_element(&self.placeholder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_classification() {
        let schema = HostSchema::default();
        assert!(schema.is_void("br"));
        assert!(schema.is_void("IMG"));
        assert!(!schema.is_void("p"));
        assert!(schema.is_block("blockquote"));
        assert!(!schema.is_block("b"));
        assert!(schema.is_paragraph("P"));
        assert!(!schema.is_paragraph("div"));
    }

    #[test]
    fn markers_need_tag_and_class() {
        let schema = HostSchema::default();
        let mut tree = Tree::new();
        let marker = schema.marker.create(&mut tree);
        let plain_em = tree.create_element("em");
        let wrong_tag = tree.create_element_with_class("span", &schema.marker.class);

        assert!(schema.is_marker(&tree, marker));
        assert!(!schema.is_marker(&tree, plain_em));
        assert!(!schema.is_marker(&tree, wrong_tag));
    }

    #[test]
    fn partial_schema_falls_back_to_defaults() {
        let schema: HostSchema = serde::Deserialize::deserialize(
            serde::de::value::MapDeserializer::<_, serde::de::value::Error>::new(
                [("placeholder", "wbr")].into_iter(),
            ),
        )
        .unwrap();
        assert_eq!(schema.placeholder, "wbr");
        assert_eq!(schema.marker, MarkerSpec::default());
        assert!(schema.is_void("br"));
    }
}
