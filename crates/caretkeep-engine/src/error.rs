use thiserror::Error;

use crate::dom::NodeId;

/// Misuse of a tree mutation primitive.
///
/// Editing operations themselves never surface these: they degrade to a
/// logged no-op. Only direct callers of [`crate::dom::Tree`] see them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {child:?} cannot be inserted into {parent:?}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    #[error("offset {offset} is out of bounds for node {node:?} (length {len})")]
    OffsetOutOfBounds {
        node: NodeId,
        offset: usize,
        len: usize,
    },

    #[error("offset {offset} is not on a character boundary of text node {node:?}")]
    NotCharBoundary { node: NodeId, offset: usize },

    #[error("node {0:?} is not a text node")]
    NotText(NodeId),
}

/// Failure while reading markup into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HtmlError {
    #[error("unterminated tag starting at byte {offset}")]
    UnterminatedTag { offset: usize },

    #[error("unterminated comment starting at byte {offset}")]
    UnterminatedComment { offset: usize },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
