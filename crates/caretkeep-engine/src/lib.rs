pub mod dom;
pub mod editing;
pub mod error;
pub mod formatting;
pub mod html;
pub mod schema;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use dom::{Element, NativeSelection, NodeId, NodeKind, Position, Range, Tree};
pub use editing::{Editable, MarkerManager, SelectionSnapshot};
pub use error::{HtmlError, TreeError};
pub use formatting::{StructuralNormalizer, normalize_html};
pub use schema::{HostSchema, MarkerSpec};
