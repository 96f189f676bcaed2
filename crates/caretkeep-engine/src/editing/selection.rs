use crate::dom::{NodeId, Range, Tree, nav};
use crate::editing::{Editable, MarkerManager};

/// The selection as it stood when the snapshot was taken.
///
/// The range is always in document order, whichever way the user dragged.
/// A snapshot taken without an active selection carries no range, and every
/// query on it comes back empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionSnapshot {
    owner: NodeId,
    range: Option<Range>,
}

impl SelectionSnapshot {
    pub fn capture(tree: &Tree, editable: &Editable) -> Self {
        let owner = editable.selection_owner(tree);
        let range = tree.selection(owner).and_then(|selection| {
            let range = nav::selection_range(tree, selection);
            if range.is_none() {
                log::debug!("selection endpoints are in different trees, ignoring it");
            }
            range
        });
        Self { owner, range }
    }

    /// The document or fragment whose selection this is.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// Nearest node containing the whole range that satisfies `predicate`,
    /// searching from the range's common ancestor up to the editable root.
    pub fn get_containing(
        &self,
        tree: &Tree,
        editable: &Editable,
        predicate: impl Fn(&Tree, NodeId) -> bool,
    ) -> Option<NodeId> {
        let range = self.range?;
        let root = editable.root();
        let ancestor = nav::common_ancestor(tree, range.start.node, range.end.node)?;
        if !nav::contains(tree, root, ancestor) {
            return None;
        }
        if ancestor == root {
            return predicate(tree, root).then_some(root);
        }
        if predicate(tree, ancestor) {
            return Some(ancestor);
        }
        nav::get_ancestor(tree, ancestor, Some(root), predicate)
    }

    /// Whether the caret sits on a line with nothing on it: a paragraph whose
    /// content is empty or a single placeholder, possibly inside inline
    /// wrappers. Only elements are descended into, so whitespace text counts
    /// as content.
    pub fn is_caret_on_new_line(&self, tree: &Tree, editable: &Editable) -> bool {
        let schema = editable.schema();
        let Some(paragraph) =
            self.get_containing(tree, editable, |t, n| schema.is_paragraph_node(t, n))
        else {
            return false;
        };

        let mut current = paragraph;
        loop {
            let children: Vec<NodeId> = tree
                .children(current)
                .iter()
                .copied()
                .filter(|&child| !schema.is_marker(tree, child))
                .collect();
            let blank = tree.text_content(current).trim().is_empty();

            match children.as_slice() {
                [] => return blank,
                [only] if blank && tree.is_element(*only) => current = *only,
                _ => return false,
            }
        }
    }

    /// Embeds this selection into the tree as markers. No-op without a range.
    pub fn place_markers(&self, tree: &mut Tree, editable: &Editable) -> bool {
        match self.range {
            Some(range) => MarkerManager::new(tree, editable).place_markers(range),
            None => {
                log::debug!("no selection to place markers for");
                false
            }
        }
    }
}
