use crate::dom::live::LiveRangeId;
use crate::dom::{NodeId, Position, Range, Tree, nav};
use crate::editing::Editable;
use crate::error::TreeError;

/// Places, finds and consumes the selection markers of one editable region.
///
/// A manager holds the tree mutably for as long as it lives, which is the
/// window of a single command.
pub struct MarkerManager<'t> {
    tree: &'t mut Tree,
    editable: &'t Editable,
}

impl<'t> MarkerManager<'t> {
    pub fn new(tree: &'t mut Tree, editable: &'t Editable) -> Self {
        Self { tree, editable }
    }

    /// Read access to the tree while the manager holds it.
    pub fn tree(&self) -> &Tree {
        self.tree
    }

    /// Embeds `range` into the tree: an end marker at its end and, unless the
    /// range is collapsed, a start marker at its start. The range, adjusted
    /// for the insertions, is then installed as the native selection.
    ///
    /// Returns `false` without touching anything when the editable root is
    /// not attached to a live surface, or when the range does not lie inside
    /// the root.
    pub fn place_markers(&mut self, range: Range) -> bool {
        let root = self.editable.root();
        if !self.editable.is_attached(self.tree) {
            log::debug!("editable root {root:?} is detached, not placing markers");
            return false;
        }
        if !nav::contains(self.tree, root, range.start.node)
            || !nav::contains(self.tree, root, range.end.node)
        {
            log::debug!("selection {range:?} is not inside editable root {root:?}");
            return false;
        }

        let owner = self.editable.selection_owner(self.tree);
        let live = self.tree.track(range);
        let mut placed = Vec::with_capacity(2);

        let result = self.insert_boundary_marker(live, false, &mut placed).and_then(|()| {
            if range.is_collapsed() {
                Ok(())
            } else {
                self.insert_boundary_marker(live, true, &mut placed)
            }
        });
        let adjusted = self.tree.untrack(live);

        if let Err(err) = result {
            log::warn!("could not place selection markers: {err}");
            for marker in placed {
                self.tree.remove(marker);
            }
            return false;
        }

        if let Some(adjusted) = adjusted {
            self.tree.add_range(owner, adjusted);
        }
        true
    }

    /// Inserts a marker at one boundary of the tracked range, then drops the
    /// empty text nodes the insertion left on either side of it.
    fn insert_boundary_marker(
        &mut self,
        live: LiveRangeId,
        at_start: bool,
        placed: &mut Vec<NodeId>,
    ) -> Result<(), TreeError> {
        let Some(range) = self.tree.tracked(live) else {
            return Ok(());
        };
        let position = if at_start { range.start } else { range.end };

        let marker = self.editable.schema().marker.create(self.tree);
        self.tree.insert_at(position, marker)?;
        placed.push(marker);

        if let Some(next) = self.tree.next_sibling(marker)
            && nav::is_empty_text_node(self.tree, next)
        {
            self.tree.remove(next);
        }
        if let Some(prev) = self.tree.previous_sibling(marker)
            && nav::is_empty_text_node(self.tree, prev)
        {
            self.tree.remove(prev);
        }
        Ok(())
    }

    /// Markers under the editable root, in document order.
    ///
    /// Normally zero, one or two, but stray markers are reported too.
    pub fn get_markers(&self) -> Vec<NodeId> {
        let schema = self.editable.schema();
        self.tree
            .descendants(self.editable.root())
            .filter(|&node| schema.is_marker(self.tree, node))
            .collect()
    }

    /// Removes every marker. Returns how many were removed.
    pub fn remove_markers(&mut self) -> usize {
        let markers = self.get_markers();
        for &marker in &markers {
            self.tree.remove(marker);
        }
        markers.len()
    }

    /// Turns the markers back into a native selection: from just before the
    /// first marker to just after the second (or the first, when alone).
    /// Markers past the second are ignored.
    ///
    /// Unless `keep_markers` is set the markers are removed once the range
    /// has been computed; the range stays valid across their removal.
    pub fn select_markers(&mut self, keep_markers: bool) -> bool {
        let markers = self.get_markers();
        let Some(&first) = markers.first() else {
            return false;
        };
        let last = markers.get(1).copied().unwrap_or(first);
        if markers.len() > 2 {
            log::debug!(
                "found {} selection markers, using the first two",
                markers.len()
            );
        }

        let (Some(start), Some(end)) = (self.position_before(first), self.position_after(last))
        else {
            return false;
        };

        let owner = self.editable.selection_owner(self.tree);
        let live = self.tree.track(Range::new(start, end));
        if !keep_markers {
            self.remove_markers();
        }
        match self.tree.untrack(live) {
            Some(range) => {
                self.tree.add_range(owner, range);
                true
            }
            None => false,
        }
    }

    fn position_before(&self, node: NodeId) -> Option<Position> {
        Some(Position::new(
            self.tree.parent(node)?,
            self.tree.index_of(node)?,
        ))
    }

    fn position_after(&self, node: NodeId) -> Option<Position> {
        Some(Position::new(
            self.tree.parent(node)?,
            self.tree.index_of(node)? + 1,
        ))
    }
}
