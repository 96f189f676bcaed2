//! Fixtures shared by the unit tests.

use crate::dom::{NodeId, Tree};
use crate::editing::Editable;
use crate::html::set_inner_html;
use crate::schema::HostSchema;

/// A `div` editor attached to the document, filled with `markup`.
pub fn editor(markup: &str) -> (Tree, Editable) {
    let schema = HostSchema::default();
    let mut tree = Tree::new();
    let root = tree.create_element("div");
    let doc = tree.document();
    tree.append_child(doc, root).unwrap();
    set_inner_html(&mut tree, root, markup, &schema).unwrap();
    (tree, Editable::new(root, schema))
}

/// The first text node under `root` holding exactly `content`.
pub fn text_node(tree: &Tree, root: NodeId, content: &str) -> NodeId {
    tree.descendants(root)
        .find(|&node| tree.text(node) == Some(content))
        .unwrap_or_else(|| panic!("no text node {content:?} under {root:?}"))
}

mod command_cycle {
    use super::*;
    use crate::dom::{NativeSelection, Position, invariants, nav};
    use crate::html::inner_html;
    use pretty_assertions::assert_eq;

    #[test]
    fn replace_content_normalize_then_restore() {
        let (mut tree, editable) = editor("<p>first</p><p>second</p>");
        let second = text_node(&tree, editable.root(), "second");
        let doc = tree.document();
        tree.set_selection(doc, NativeSelection::caret(Position::new(second, 0)));

        editable.snapshot(&tree).place_markers(&mut tree, &editable);
        invariants::check(&tree, editable.root(), editable.schema());

        // Empty the paragraph except for the marker, as a delete command would.
        let second_p = tree.children(editable.root())[1];
        let texts: Vec<NodeId> = tree
            .children(second_p)
            .iter()
            .copied()
            .filter(|&child| tree.is_text(child))
            .collect();
        for text in texts {
            tree.remove(text);
        }

        assert_eq!(editable.normalize(&mut tree), 1);
        assert!(editable.markers(&mut tree).select_markers(false));
        invariants::check(&tree, editable.root(), editable.schema());

        assert_eq!(
            inner_html(&tree, editable.root(), editable.schema()),
            "<p>first</p><p><br></p>"
        );
        let selection = tree.selection(doc).unwrap();
        assert_eq!(selection.anchor, Position::new(second_p, 0));
        assert!(editable.snapshot(&tree).is_caret_on_new_line(&tree, &editable));
    }

    #[test]
    fn selection_survives_rewrap() {
        let (mut tree, editable) = editor("<p>alpha beta</p>");
        let text = text_node(&tree, editable.root(), "alpha beta");
        let doc = tree.document();
        tree.set_selection(
            doc,
            NativeSelection::new(Position::new(text, 6), Position::new(text, 10)),
        );
        editable.snapshot(&tree).place_markers(&mut tree, &editable);

        // Turn the paragraph into a heading, moving its children across.
        let p = tree.children(editable.root())[0];
        let h1 = tree.create_element("h1");
        tree.insert_before(editable.root(), h1, Some(p)).unwrap();
        while let Some(child) = tree.first_child(p) {
            tree.append_child(h1, child).unwrap();
        }
        tree.remove(p);

        assert!(editable.markers(&mut tree).select_markers(false));
        let range = nav::selection_range(&tree, tree.selection(doc).unwrap()).unwrap();
        assert_eq!(nav::text_in_range(&tree, range), "beta");
        assert_eq!(
            inner_html(&tree, editable.root(), editable.schema()),
            "<h1>alpha beta</h1>"
        );
    }
}
