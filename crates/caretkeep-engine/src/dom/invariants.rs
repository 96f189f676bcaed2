use crate::dom::{NodeId, NodeKind, Tree};
use crate::schema::HostSchema;

/// Validates structural invariants of the subtree under `root`.
///
/// Asserts that:
/// - Every child points back at its parent
/// - Text nodes have no children
/// - Void elements have no children
/// - At most two selection markers are present
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check(tree: &Tree, root: NodeId, schema: &HostSchema) {
    let mut markers = 0;
    for node in std::iter::once(root).chain(tree.descendants(root)) {
        for &child in tree.children(node) {
            assert_eq!(
                tree.parent(child),
                Some(node),
                "child {child:?} of {node:?} has parent {:?}",
                tree.parent(child)
            );
        }
        if let NodeKind::Text(text) = tree.kind(node) {
            assert!(
                tree.children(node).is_empty(),
                "text node {node:?} ({text:?}) has children"
            );
        }
        if schema.is_void_node(tree, node) {
            assert!(
                tree.children(node).is_empty(),
                "void element {node:?} <{}> has children",
                tree.tag_name(node).unwrap_or_default()
            );
        }
        if schema.is_marker(tree, node) {
            markers += 1;
        }
    }
    assert!(markers <= 2, "found {markers} selection markers");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with_markers(count: usize) -> (Tree, NodeId, HostSchema) {
        let schema = HostSchema::default();
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        tree.append_child(tree.document(), root).unwrap();
        for _ in 0..count {
            let marker = schema.marker.create(&mut tree);
            tree.append_child(root, marker).unwrap();
        }
        (tree, root, schema)
    }

    #[test]
    fn accepts_well_formed_tree() {
        let (tree, root, schema) = tree_with_markers(2);
        check(&tree, root, &schema);
    }

    #[test]
    #[should_panic(expected = "found 3 selection markers")]
    fn rejects_stray_markers() {
        let (tree, root, schema) = tree_with_markers(3);
        check(&tree, root, &schema);
    }

    #[test]
    #[should_panic(expected = "void element")]
    fn rejects_children_in_void_elements() {
        let (mut tree, root, schema) = tree_with_markers(0);
        let img = tree.create_element("img");
        let text = tree.create_text("nope");
        tree.append_child(root, img).unwrap();
        tree.append_child(img, text).unwrap();
        check(&tree, root, &schema);
    }
}
