//! Read-only navigation over a [`Tree`]: ancestry, document order, and the
//! node classifications the marker protocol depends on.

use std::cmp::Ordering;

use super::{NodeId, NodeKind, NativeSelection, Position, Range, Tree};

/// Nearest strict ancestor of `node` satisfying `predicate`.
///
/// The walk stops without a result on reaching `stop_at` (which is never
/// tested) or the document node.
pub fn get_ancestor(
    tree: &Tree,
    node: NodeId,
    stop_at: Option<NodeId>,
    predicate: impl Fn(&Tree, NodeId) -> bool,
) -> Option<NodeId> {
    let mut current = tree.parent(node);
    while let Some(candidate) = current {
        if Some(candidate) == stop_at || candidate == tree.document() {
            return None;
        }
        if predicate(tree, candidate) {
            return Some(candidate);
        }
        current = tree.parent(candidate);
    }
    None
}

/// Whether `a` comes strictly before `b` in document order.
///
/// An ancestor comes before its descendants. Equal nodes, and nodes that
/// do not share a root, are not before one another.
pub fn is_before(tree: &Tree, a: NodeId, b: NodeId) -> bool {
    if a == b || root_of(tree, a) != root_of(tree, b) {
        return false;
    }
    index_path(tree, a) < index_path(tree, b)
}

/// A text node holding the empty string. Whitespace does not count as empty.
pub fn is_empty_text_node(tree: &Tree, node: NodeId) -> bool {
    tree.text(node).is_some_and(str::is_empty)
}

/// A detached fragment root with a selection of its own.
pub fn is_fragment(tree: &Tree, node: NodeId) -> bool {
    matches!(
        tree.kind(node),
        NodeKind::Fragment {
            owns_selection: true
        }
    ) && tree.parent(node).is_none()
}

/// Whether `node` is `ancestor` or one of its descendants.
pub fn contains(tree: &Tree, ancestor: NodeId, node: NodeId) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = tree.parent(id);
    }
    false
}

/// The topmost ancestor of `node` (the document when attached).
pub fn root_of(tree: &Tree, node: NodeId) -> NodeId {
    let mut current = node;
    while let Some(parent) = tree.parent(current) {
        current = parent;
    }
    current
}

fn index_path(tree: &Tree, node: NodeId) -> Vec<usize> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(index) = tree.index_of(current) {
        path.push(index);
        match tree.parent(current) {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Compares two boundary points in document order.
///
/// `None` when the points live in different trees.
pub fn compare_positions(tree: &Tree, a: Position, b: Position) -> Option<Ordering> {
    if root_of(tree, a.node) != root_of(tree, b.node) {
        return None;
    }
    if a.node == b.node {
        return Some(a.offset.cmp(&b.offset));
    }
    if is_before(tree, b.node, a.node) {
        return compare_positions(tree, b, a).map(Ordering::reverse);
    }
    if contains(tree, a.node, b.node) {
        let mut child = b.node;
        while let Some(parent) = tree.parent(child) {
            if parent == a.node {
                break;
            }
            child = parent;
        }
        if tree.index_of(child).is_some_and(|index| index < a.offset) {
            return Some(Ordering::Greater);
        }
    }
    Some(Ordering::Less)
}

/// Builds a range from two points given in either order.
pub fn ordered_range(tree: &Tree, a: Position, b: Position) -> Option<Range> {
    match compare_positions(tree, a, b)? {
        Ordering::Greater => Some(Range::new(b, a)),
        _ => Some(Range::new(a, b)),
    }
}

/// The selection's range in document order, whichever way it was dragged.
pub fn selection_range(tree: &Tree, selection: NativeSelection) -> Option<Range> {
    ordered_range(tree, selection.anchor, selection.focus)
}

/// Deepest node containing both `a` and `b` (inclusive).
pub fn common_ancestor(tree: &Tree, a: NodeId, b: NodeId) -> Option<NodeId> {
    let mut current = Some(b);
    while let Some(id) = current {
        if contains(tree, id, a) {
            return Some(id);
        }
        current = tree.parent(id);
    }
    None
}

/// The text a range covers, like `Range.toString()`.
pub fn text_in_range(tree: &Tree, range: Range) -> String {
    let Some(ancestor) = common_ancestor(tree, range.start.node, range.end.node) else {
        return String::new();
    };

    if let Some(text) = tree.text(ancestor) {
        return text
            .get(range.start.offset..range.end.offset)
            .unwrap_or_default()
            .to_string();
    }

    let mut out = String::new();
    for node in tree.descendants(ancestor) {
        let Some(text) = tree.text(node) else {
            continue;
        };
        let slice = if node == range.start.node {
            text.get(range.start.offset..)
        } else if node == range.end.node {
            text.get(..range.end.offset)
        } else {
            let starts_inside = compare_positions(tree, Position::new(node, 0), range.start)
                .is_some_and(|order| order != Ordering::Less);
            let ends_inside = compare_positions(tree, Position::new(node, text.len()), range.end)
                .is_some_and(|order| order != Ordering::Greater);
            (starts_inside && ends_inside).then_some(text)
        };
        out.push_str(slice.unwrap_or_default());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// document > div > [p > [b > "one", "two"], p > "three"]
    struct Sample {
        tree: Tree,
        div: NodeId,
        p1: NodeId,
        b: NodeId,
        one: NodeId,
        two: NodeId,
        p2: NodeId,
        three: NodeId,
    }

    fn sample() -> Sample {
        let mut tree = Tree::new();
        let div = tree.create_element("div");
        let p1 = tree.create_element("p");
        let b = tree.create_element("b");
        let one = tree.create_text("one");
        let two = tree.create_text("two");
        let p2 = tree.create_element("p");
        let three = tree.create_text("three");
        tree.append_child(tree.document(), div).unwrap();
        tree.append_child(div, p1).unwrap();
        tree.append_child(p1, b).unwrap();
        tree.append_child(b, one).unwrap();
        tree.append_child(p1, two).unwrap();
        tree.append_child(div, p2).unwrap();
        tree.append_child(p2, three).unwrap();
        Sample {
            tree,
            div,
            p1,
            b,
            one,
            two,
            p2,
            three,
        }
    }

    #[test]
    fn get_ancestor_excludes_self_and_stop() {
        let s = sample();
        let is_p = |t: &Tree, n: NodeId| t.tag_name(n) == Some("p");

        assert_eq!(get_ancestor(&s.tree, s.one, None, is_p), Some(s.p1));
        assert_eq!(get_ancestor(&s.tree, s.p1, None, is_p), None);
        assert_eq!(get_ancestor(&s.tree, s.one, Some(s.p1), is_p), None);
        assert_eq!(
            get_ancestor(&s.tree, s.one, Some(s.div), |t, n| t.tag_name(n) == Some("div")),
            None
        );
    }

    #[test]
    fn is_before_follows_document_order() {
        let s = sample();
        assert!(is_before(&s.tree, s.one, s.two));
        assert!(is_before(&s.tree, s.p1, s.one));
        assert!(is_before(&s.tree, s.two, s.three));
        assert!(!is_before(&s.tree, s.three, s.one));
        assert!(!is_before(&s.tree, s.b, s.b));
    }

    #[test]
    fn detached_nodes_are_never_before() {
        let mut s = sample();
        let loose = s.tree.create_text("x");
        assert!(!is_before(&s.tree, loose, s.one));
        assert!(!is_before(&s.tree, s.one, loose));
        assert_eq!(
            compare_positions(&s.tree, Position::new(loose, 0), Position::new(s.one, 0)),
            None
        );
    }

    #[test]
    fn empty_text_detection_does_not_trim() {
        let mut tree = Tree::new();
        let empty = tree.create_text("");
        let blank = tree.create_text("  ");
        let element = tree.create_element("p");
        assert!(is_empty_text_node(&tree, empty));
        assert!(!is_empty_text_node(&tree, blank));
        assert!(!is_empty_text_node(&tree, element));
    }

    #[test]
    fn fragment_detection() {
        let mut tree = Tree::new();
        let shadow = tree.create_fragment(true);
        let plain = tree.create_fragment(false);
        let element = tree.create_element("div");
        assert!(is_fragment(&tree, shadow));
        assert!(!is_fragment(&tree, plain));
        assert!(!is_fragment(&tree, element));
        assert!(!is_fragment(&tree, tree.document()));
    }

    #[test]
    fn compare_positions_handles_ancestry() {
        let s = sample();
        // (p1, 0) sits before b, which contains "one".
        assert_eq!(
            compare_positions(&s.tree, Position::new(s.p1, 0), Position::new(s.one, 1)),
            Some(Ordering::Less)
        );
        // (p1, 1) sits after b.
        assert_eq!(
            compare_positions(&s.tree, Position::new(s.p1, 1), Position::new(s.one, 1)),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare_positions(&s.tree, Position::new(s.one, 1), Position::new(s.p1, 1)),
            Some(Ordering::Less)
        );
        assert_eq!(
            compare_positions(&s.tree, Position::new(s.two, 2), Position::new(s.two, 2)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn ordered_range_ignores_drag_direction() {
        let s = sample();
        let a = Position::new(s.three, 2);
        let b = Position::new(s.one, 1);
        let range = ordered_range(&s.tree, a, b).unwrap();
        assert_eq!(range.start, b);
        assert_eq!(range.end, a);

        let same_node = ordered_range(&s.tree, Position::new(s.two, 3), Position::new(s.two, 1))
            .unwrap();
        assert_eq!(same_node.start.offset, 1);
        assert_eq!(same_node.end.offset, 3);
    }

    #[test]
    fn common_ancestor_of_cousins() {
        let s = sample();
        assert_eq!(common_ancestor(&s.tree, s.one, s.two), Some(s.p1));
        assert_eq!(common_ancestor(&s.tree, s.one, s.three), Some(s.div));
        assert_eq!(common_ancestor(&s.tree, s.two, s.two), Some(s.two));
        assert_eq!(common_ancestor(&s.tree, s.p2, s.three), Some(s.p2));
    }

    #[test]
    fn text_in_range_spans_nodes() {
        let s = sample();
        let range = Range::new(Position::new(s.one, 1), Position::new(s.three, 2));
        assert_eq!(text_in_range(&s.tree, range), "netwoth");

        let inner = Range::new(Position::new(s.two, 0), Position::new(s.two, 2));
        assert_eq!(text_in_range(&s.tree, inner), "tw");

        let by_children = Range::new(Position::new(s.p1, 1), Position::new(s.div, 2));
        assert_eq!(text_in_range(&s.tree, by_children), "twothree");
    }
}
