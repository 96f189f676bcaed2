//! Live boundary bookkeeping.
//!
//! A DOM implementation keeps every live range valid while the tree mutates.
//! The tree applies the same rules to the native selections it stores and to
//! ranges explicitly tracked through [`super::Tree::track`], so a range
//! computed before a mutation still describes the same place afterwards.

use super::{NodeId, Position, Range};

/// Handle to a range kept up to date by the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiveRangeId(usize);

#[derive(Debug, Default)]
pub(crate) struct LiveRanges {
    slots: Vec<Option<Range>>,
}

impl LiveRanges {
    pub(crate) fn track(&mut self, range: Range) -> LiveRangeId {
        if let Some(free) = self.slots.iter().position(Option::is_none) {
            self.slots[free] = Some(range);
            LiveRangeId(free)
        } else {
            self.slots.push(Some(range));
            LiveRangeId(self.slots.len() - 1)
        }
    }

    pub(crate) fn get(&self, id: LiveRangeId) -> Option<Range> {
        self.slots.get(id.0).copied().flatten()
    }

    pub(crate) fn untrack(&mut self, id: LiveRangeId) -> Option<Range> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Range> {
        self.slots.iter_mut().flatten()
    }
}

/// A structural change, described in enough detail to move boundaries.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Mutation {
    /// A node was inserted into `parent` at child `index`.
    Inserted { parent: NodeId, index: usize },
    /// `node` was removed from `parent`, where it sat at child `index`.
    Removed {
        parent: NodeId,
        index: usize,
        node: NodeId,
    },
    /// Text past `offset` in `node` moved into `new_node`, which sits right
    /// after `node` at `new_index` in `parent` (if `node` had one).
    Split {
        node: NodeId,
        offset: usize,
        new_node: NodeId,
        parent: Option<(NodeId, usize)>,
    },
}

impl Mutation {
    /// Moves `pos` to where it must be after the mutation.
    ///
    /// `within(a, b)` answers "is `a` an inclusive descendant of `b`"; it is
    /// consulted for removals, after the node has been detached.
    pub(crate) fn adjust(&self, pos: &mut Position, within: &impl Fn(NodeId, NodeId) -> bool) {
        match *self {
            Mutation::Inserted { parent, index } => {
                if pos.node == parent && pos.offset > index {
                    pos.offset += 1;
                }
            }
            Mutation::Removed {
                parent,
                index,
                node,
            } => {
                if within(pos.node, node) {
                    *pos = Position::new(parent, index);
                } else if pos.node == parent && pos.offset > index {
                    pos.offset -= 1;
                }
            }
            Mutation::Split {
                node,
                offset,
                new_node,
                parent,
            } => {
                if pos.node == node && pos.offset > offset {
                    *pos = Position::new(new_node, pos.offset - offset);
                } else if let Some((parent, new_index)) = parent
                    && pos.node == parent
                    && pos.offset == new_index
                {
                    pos.offset += 1;
                }
            }
        }
    }
}
