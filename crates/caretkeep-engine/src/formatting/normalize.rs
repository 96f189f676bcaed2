//! Re-establishes "every element that can hold the caret has something to
//! hold it with" after a bulk content replacement.
//!
//! An element with no content collapses to zero height and the caret cannot
//! be placed in it. The normalizer appends a placeholder (normally `<br>`) to
//! such elements. Inline elements only get one when they are the sole
//! content of an otherwise empty parent, so `<p>a<b></b></p>` is left alone.

use crate::dom::{NodeId, Tree};
use crate::schema::HostSchema;

pub struct StructuralNormalizer<'s> {
    schema: &'s HostSchema,
}

impl<'s> StructuralNormalizer<'s> {
    pub fn new(schema: &'s HostSchema) -> Self {
        Self { schema }
    }

    /// Normalizes every element below `container` (not `container` itself).
    /// Returns the number of placeholders inserted.
    pub fn normalize(&self, tree: &mut Tree, container: NodeId) -> usize {
        let children: Vec<NodeId> = tree.element_children(container).collect();
        children
            .into_iter()
            .map(|child| self.visit(tree, child))
            .sum()
    }

    fn visit(&self, tree: &mut Tree, node: NodeId) -> usize {
        if self.schema.is_marker(tree, node) {
            return 0;
        }

        if self.needs_placeholder(tree, node) {
            let placeholder = self.schema.create_placeholder(tree);
            return match tree.append_child(node, placeholder) {
                Ok(()) => 1,
                Err(err) => {
                    log::warn!("could not insert placeholder into {node:?}: {err}");
                    0
                }
            };
        }

        self.normalize(tree, node)
    }

    fn needs_placeholder(&self, tree: &Tree, node: NodeId) -> bool {
        self.is_candidate(tree, node)
            && !self.schema.is_void_node(tree, node)
            && tree.text_content(node).trim().is_empty()
    }

    fn is_candidate(&self, tree: &Tree, node: NodeId) -> bool {
        let mut element_children = tree.element_children(node);
        let first = element_children.next();
        let only_child = first.filter(|_| element_children.next().is_none());
        let is_block = self.schema.is_block_node(tree, node);

        match (first, only_child) {
            (None, _) if is_block => true,
            (None, _) => tree
                .parent(node)
                .is_none_or(|parent| tree.text_content(parent).trim().is_empty()),
            (Some(_), Some(only)) => self.schema.is_marker(tree, only),
            (Some(_), None) => false,
        }
    }
}
