/*!
 * # Selection-preserving editing
 *
 * Rich-text commands rewrite the tree under the user's cursor. To keep the
 * cursor, a command records the selection as **marker** elements embedded in
 * the tree itself, rewrites freely (the markers travel with the content),
 * and finally turns the markers back into a selection.
 *
 * ## One command, in order
 *
 * ```rust
 * use caretkeep_engine::{Editable, HostSchema, NativeSelection, Position, Tree};
 * use caretkeep_engine::html::{inner_html, set_inner_html};
 *
 * let schema = HostSchema::default();
 * let mut tree = Tree::new();
 * let root = tree.create_element("div");
 * tree.append_child(tree.document(), root).unwrap();
 * set_inner_html(&mut tree, root, "<p>hello</p>", &schema).unwrap();
 * let editable = Editable::new(root, schema);
 *
 * // The user placed the caret after "he".
 * let text = tree.descendants(root).find(|&n| tree.is_text(n)).unwrap();
 * tree.set_selection(tree.document(), NativeSelection::caret(Position::new(text, 2)));
 *
 * // 1. Capture the selection and embed it as markers.
 * let snapshot = editable.snapshot(&tree);
 * snapshot.place_markers(&mut tree, &editable);
 *
 * // 2. Rewrite the content (here: wrap it in a blockquote).
 * let quote = tree.create_element("blockquote");
 * let p = tree.children(root)[0];
 * tree.append_child(root, quote).unwrap();
 * tree.append_child(quote, p).unwrap();
 *
 * // 3. Repair structure, then restore the selection from the markers.
 * editable.normalize(&mut tree);
 * editable.markers(&mut tree).select_markers(false);
 *
 * assert_eq!(
 *     inner_html(&tree, root, editable.schema()),
 *     "<blockquote><p>hello</p></blockquote>"
 * );
 * assert!(tree.selection(tree.document()).unwrap().is_collapsed());
 * ```
 *
 * Everything here borrows the [`Tree`] for the duration of a call; holding
 * `&mut Tree` is what makes a command's access exclusive.
 *
 * ## Failure policy
 *
 * Editing runs inside an interactive loop, so a request that cannot be
 * honoured (no selection, a selection outside this editor, a detached root)
 * is skipped rather than reported. Skips are logged at `debug` level.
 */

pub mod markers;
pub mod selection;

pub use markers::MarkerManager;
pub use selection::SelectionSnapshot;

use crate::dom::{NodeId, Tree, nav};
use crate::formatting::StructuralNormalizer;
use crate::schema::HostSchema;

/// An editable region: the root element a host hands over, plus the schema
/// that classifies its elements.
#[derive(Debug, Clone)]
pub struct Editable {
    root: NodeId,
    schema: HostSchema,
}

impl Editable {
    pub fn new(root: NodeId, schema: HostSchema) -> Self {
        Self { root, schema }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn schema(&self) -> &HostSchema {
        &self.schema
    }

    /// Whether the root is connected to a live rendering surface: the
    /// document, or a fragment that owns its own selection.
    ///
    /// Fragment-hosted editors count as attached, unlike a plain
    /// `document.contains` check, so they get markers too.
    pub fn is_attached(&self, tree: &Tree) -> bool {
        let top = nav::root_of(tree, self.root);
        top == tree.document() || nav::is_fragment(tree, top)
    }

    /// The node whose native selection belongs to this editor.
    ///
    /// The document, unless the root lives in a detached fragment with a
    /// selection of its own.
    pub fn selection_owner(&self, tree: &Tree) -> NodeId {
        if nav::contains(tree, tree.document(), self.root) {
            return tree.document();
        }
        nav::get_ancestor(tree, self.root, None, nav::is_fragment).unwrap_or(tree.document())
    }

    /// Captures the current selection.
    pub fn snapshot(&self, tree: &Tree) -> SelectionSnapshot {
        SelectionSnapshot::capture(tree, self)
    }

    pub fn markers<'t>(&'t self, tree: &'t mut Tree) -> MarkerManager<'t> {
        MarkerManager::new(tree, self)
    }

    /// Runs the structural normalizer over the whole editable region.
    /// Returns the number of placeholders inserted.
    pub fn normalize(&self, tree: &mut Tree) -> usize {
        StructuralNormalizer::new(&self.schema).normalize(tree, self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attached_when_connected_to_document() {
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        let editable = Editable::new(root, HostSchema::default());
        assert!(!editable.is_attached(&tree));

        tree.append_child(tree.document(), root).unwrap();
        assert!(editable.is_attached(&tree));
        assert_eq!(editable.selection_owner(&tree), tree.document());
    }

    #[test]
    fn selection_owned_by_enclosing_fragment() {
        let mut tree = Tree::new();
        let shadow = tree.create_fragment(true);
        let host = tree.create_element("section");
        let root = tree.create_element("div");
        tree.append_child(shadow, host).unwrap();
        tree.append_child(host, root).unwrap();
        let editable = Editable::new(root, HostSchema::default());

        assert!(editable.is_attached(&tree));
        assert_eq!(editable.selection_owner(&tree), shadow);
    }

    #[test]
    fn plain_fragment_falls_back_to_document() {
        let mut tree = Tree::new();
        let fragment = tree.create_fragment(false);
        let root = tree.create_element("div");
        tree.append_child(fragment, root).unwrap();
        let editable = Editable::new(root, HostSchema::default());

        assert!(!editable.is_attached(&tree));
        assert_eq!(editable.selection_owner(&tree), tree.document());
    }
}
