use super::NodeId;

/// A boundary point in the tree.
///
/// For a text node `offset` is a byte offset into its string; for any other
/// node it is an index into the child sequence (`offset == n` sits after the
/// n-th child).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub node: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}

/// An ordered pair of positions, `start <= end` in document order.
///
/// Constructing a `Range` does not check the order; use
/// [`crate::dom::nav::ordered_range`] when the two points come from a user
/// gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A caret at `at`.
    pub fn collapsed(at: Position) -> Self {
        Self { start: at, end: at }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Collapses onto one of the boundaries, like `Range.collapse(toStart)`.
    #[must_use]
    pub fn collapse(self, to_start: bool) -> Self {
        if to_start {
            Self::collapsed(self.start)
        } else {
            Self::collapsed(self.end)
        }
    }
}

/// The host's selection object: anchor is where the gesture began, focus is
/// where it currently ends. The two may be in either document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeSelection {
    pub anchor: Position,
    pub focus: Position,
}

impl NativeSelection {
    pub fn new(anchor: Position, focus: Position) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(at: Position) -> Self {
        Self {
            anchor: at,
            focus: at,
        }
    }

    /// A forward selection covering `range`.
    pub fn from_range(range: Range) -> Self {
        Self {
            anchor: range.start,
            focus: range.end,
        }
    }

    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }
}
