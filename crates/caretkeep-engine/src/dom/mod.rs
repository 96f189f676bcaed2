//! # Document Tree
//!
//! An arena-backed, mutable document tree with the handful of DOM mutation
//! primitives the editing core relies on.
//!
//! ## Model
//!
//! - Every node lives in one arena and is addressed by a [`NodeId`]. Removing
//!   a node detaches it; the handle stays valid and the node can be reinserted.
//! - Node 0 is the [`NodeKind::Document`], the live rendering surface.
//!   Anything not connected to it is detached, unless it hangs off a
//!   selection-owning [`NodeKind::Fragment`].
//! - The tree stores the host's [`NativeSelection`] for each selection owner
//!   and keeps it, along with every tracked range, valid across mutations
//!   (see [`live`]).
//!
//! ## Insertion side effects
//!
//! [`Tree::insert_at`] behaves like `Range.insertNode`: inserting inside a
//! text node splits it, even at offset 0 or at its end, which leaves an empty
//! text node beside the inserted node. Callers that care about offsets must
//! clean those up (see [`nav::is_empty_text_node`]).

pub mod invariants;
pub mod live;
pub mod nav;
pub mod position;

use std::collections::HashMap;

use crate::error::TreeError;
use live::{LiveRangeId, LiveRanges, Mutation};

pub use position::{NativeSelection, Position, Range};

/// Handle to a node in a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An element: lower-cased tag name plus attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let classes = match self.attribute("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_string(),
        };
        self.set_attribute("class", &classes);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The root of the live rendering surface. There is exactly one.
    Document,
    /// Root of a sub-tree that can live apart from the document, such as a
    /// shadow root. `owns_selection` fragments carry their own selection.
    Fragment { owns_selection: bool },
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A mutable document tree.
///
/// Handles from one tree must not be used with another; doing so panics or
/// addresses an unrelated node.
///
/// The arena is append-only: removed nodes keep their slot, so a tree that
/// lives across many commands grows with every split and marker.
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<NodeData>,
    document: NodeId,
    selections: HashMap<NodeId, NativeSelection>,
    live: LiveRanges,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            document: NodeId(0),
            selections: HashMap::new(),
            live: LiveRanges::default(),
        }
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    // Construction

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    /// Creates a detached element.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(name)))
    }

    /// Creates a detached element carrying `class`.
    pub fn create_element_with_class(&mut self, name: &str, class: &str) -> NodeId {
        let mut element = Element::new(name);
        element.add_class(class);
        self.alloc(NodeKind::Element(element))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self, owns_selection: bool) -> NodeId {
        self.alloc(NodeKind::Fragment { owns_selection })
    }

    // Read access

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.data(id).kind
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.data(id).kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.name.as_str())
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.data(id).kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Element(_))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.data(id).kind, NodeKind::Text(_))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.data(id).children
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.is_element(child))
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Index of `id` among its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_of(id)?;
        index
            .checked_sub(1)
            .and_then(|prev| self.children(parent).get(prev).copied())
    }

    /// Length in the unit positions use: bytes for text, children otherwise.
    pub fn node_len(&self, id: NodeId) -> usize {
        match &self.data(id).kind {
            NodeKind::Text(text) => text.len(),
            _ => self.children(id).len(),
        }
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(text) = self.text(id) {
            return text.to_string();
        }
        self.descendants(id)
            .filter_map(|node| self.text(node))
            .collect()
    }

    /// Pre-order walk over the descendants of `id`, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(id).to_vec();
        stack.reverse();
        Descendants { tree: self, stack }
    }

    // Mutation

    /// Appends `child` as the last child of `parent`, moving it if attached
    /// elsewhere.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        self.insert_before(parent, child, None)
    }

    /// Inserts `child` into `parent` before `reference` (or last when `None`).
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), TreeError> {
        self.check_insertion(parent, child)?;
        if let Some(reference) = reference
            && self.parent(reference) != Some(parent)
        {
            return Err(TreeError::HierarchyRequest { parent, child });
        }

        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };

        self.remove(child);

        let index = match reference {
            Some(reference) => self.index_of(reference).unwrap_or(self.children(parent).len()),
            None => self.children(parent).len(),
        };
        self.attach(parent, index, child);
        Ok(())
    }

    fn check_insertion(&self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        let parent_ok = !matches!(self.kind(parent), NodeKind::Text(_));
        let child_ok = !matches!(
            self.kind(child),
            NodeKind::Document | NodeKind::Fragment { .. }
        );
        if !parent_ok || !child_ok || nav::contains(self, child, parent) {
            return Err(TreeError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
        self.adjust_boundaries(Mutation::Inserted { parent, index });
    }

    /// Detaches `id` from its parent. Detached nodes are left alone.
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        let Some(index) = self.index_of(id) else {
            return;
        };
        self.nodes[parent.0].children.remove(index);
        self.nodes[id.0].parent = None;
        self.adjust_boundaries(Mutation::Removed {
            parent,
            index,
            node: id,
        });
    }

    /// Removes every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        while let Some(child) = self.children(id).last().copied() {
            self.remove(child);
        }
    }

    /// Appends `data` to the end of a text node in place.
    ///
    /// Boundaries inside the node keep their offsets, so no live range moves.
    pub fn append_text(&mut self, id: NodeId, data: &str) -> Result<(), TreeError> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Text(text) => {
                text.push_str(data);
                Ok(())
            }
            _ => Err(TreeError::NotText(id)),
        }
    }

    /// Splits a text node at byte `offset`, like `Text.splitText`.
    ///
    /// The node keeps the text before `offset`; a new text node holding the
    /// rest is inserted right after it and returned. Either half may be empty.
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, TreeError> {
        let text = self.text(id).ok_or(TreeError::NotText(id))?;
        if offset > text.len() {
            return Err(TreeError::OffsetOutOfBounds {
                node: id,
                offset,
                len: text.len(),
            });
        }
        if !text.is_char_boundary(offset) {
            return Err(TreeError::NotCharBoundary { node: id, offset });
        }

        let tail = text[offset..].to_string();
        let new_node = self.alloc(NodeKind::Text(tail));

        let parent = match (self.parent(id), self.index_of(id)) {
            (Some(parent), Some(index)) => {
                self.attach(parent, index + 1, new_node);
                Some((parent, index + 1))
            }
            _ => None,
        };
        self.adjust_boundaries(Mutation::Split {
            node: id,
            offset,
            new_node,
            parent,
        });

        if let NodeKind::Text(text) = &mut self.nodes[id.0].kind {
            text.truncate(offset);
        }
        Ok(new_node)
    }

    /// Inserts `node` at `position`, like `Range.insertNode`.
    ///
    /// A text container is always split first, so the inserted node may end
    /// up next to an empty text node.
    pub fn insert_at(&mut self, position: Position, node: NodeId) -> Result<(), TreeError> {
        let (parent, reference) = if self.is_text(position.node) {
            let parent = self
                .parent(position.node)
                .ok_or(TreeError::HierarchyRequest {
                    parent: position.node,
                    child: node,
                })?;
            let reference = self.split_text(position.node, position.offset)?;
            (parent, Some(reference))
        } else {
            let len = self.node_len(position.node);
            if position.offset > len {
                return Err(TreeError::OffsetOutOfBounds {
                    node: position.node,
                    offset: position.offset,
                    len,
                });
            }
            let reference = self.children(position.node).get(position.offset).copied();
            (position.node, reference)
        };
        self.insert_before(parent, node, reference)
    }

    fn adjust_boundaries(&mut self, mutation: Mutation) {
        let nodes = &self.nodes;
        let within = |node: NodeId, ancestor: NodeId| {
            let mut current = Some(node);
            while let Some(id) = current {
                if id == ancestor {
                    return true;
                }
                current = nodes[id.0].parent;
            }
            false
        };
        for selection in self.selections.values_mut() {
            mutation.adjust(&mut selection.anchor, &within);
            mutation.adjust(&mut selection.focus, &within);
        }
        for range in self.live.iter_mut() {
            mutation.adjust(&mut range.start, &within);
            mutation.adjust(&mut range.end, &within);
        }
    }

    // Native selection

    /// The selection held by `owner` (the document or a selection-owning
    /// fragment), if any.
    pub fn selection(&self, owner: NodeId) -> Option<NativeSelection> {
        self.selections.get(&owner).copied()
    }

    pub fn set_selection(&mut self, owner: NodeId, selection: NativeSelection) {
        self.selections.insert(owner, selection);
    }

    /// Drops the selection held by `owner`, like `removeAllRanges`.
    pub fn clear_selection(&mut self, owner: NodeId) {
        self.selections.remove(&owner);
    }

    /// Replaces the owner's selection with a forward selection over `range`.
    pub fn add_range(&mut self, owner: NodeId, range: Range) {
        self.set_selection(owner, NativeSelection::from_range(range));
    }

    // Live ranges

    /// Starts keeping `range` valid across mutations.
    pub fn track(&mut self, range: Range) -> LiveRangeId {
        self.live.track(range)
    }

    pub fn tracked(&self, id: LiveRangeId) -> Option<Range> {
        self.live.get(id)
    }

    /// Stops tracking and returns the range as it stands now.
    pub fn untrack(&mut self, id: LiveRangeId) -> Option<Range> {
        self.live.untrack(id)
    }
}

/// Iterator returned by [`Tree::descendants`].
pub struct Descendants<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let node = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(node).iter().rev().copied());
        Some(node)
    }
}
