//! Structural repair passes and the markup formatters built on them.

pub mod normalize;

pub use normalize::StructuralNormalizer;

use crate::dom::Tree;
use crate::error::HtmlError;
use crate::html::{inner_html, parse_into};
use crate::schema::HostSchema;

/// Normalizes a markup fragment: every empty element that should be able to
/// hold the caret comes back with a placeholder in it.
///
/// ```
/// use caretkeep_engine::{HostSchema, normalize_html};
///
/// let html = normalize_html("<div></div><p></p>", &HostSchema::default()).unwrap();
/// assert_eq!(html, "<div><br></div><p><br></p>");
/// ```
pub fn normalize_html(markup: &str, schema: &HostSchema) -> Result<String, HtmlError> {
    let mut tree = Tree::new();
    let scratch = tree.create_element("div");
    parse_into(&mut tree, scratch, markup, schema)?;

    let inserted = StructuralNormalizer::new(schema).normalize(&mut tree, scratch);
    log::debug!("normalize_html inserted {inserted} placeholders");

    Ok(inner_html(&tree, scratch, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn markup_errors_propagate() {
        let err = normalize_html("<p", &HostSchema::default()).unwrap_err();
        assert_eq!(err, HtmlError::UnterminatedTag { offset: 0 });
    }

    #[test]
    fn text_only_markup_is_untouched() {
        assert_eq!(
            normalize_html("plain &amp; simple", &HostSchema::default()).unwrap(),
            "plain &amp; simple"
        );
    }

    #[test]
    fn custom_placeholder_tag() {
        let schema = HostSchema {
            placeholder: "wbr".to_string(),
            ..HostSchema::default()
        };
        insta::assert_snapshot!(
            normalize_html("<h1></h1><ul><li></li></ul>", &schema).unwrap(),
            @"<h1><wbr></h1><ul><li><wbr></li></ul>"
        );
    }
}
