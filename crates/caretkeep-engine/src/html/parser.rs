//! Lenient markup reader.
//!
//! This is not a full HTML5 tree builder. It understands what editing
//! content contains (elements, attributes, text, entities, comments) and
//! recovers from sloppy nesting the simple way: an end tag closes every open
//! element up to its match, and unmatched end tags are dropped.

use html_escape::decode_html_entities;

use super::cursor::Cursor;
use crate::dom::{Element, NodeId, NodeKind, Tree};
use crate::error::HtmlError;
use crate::schema::HostSchema;

fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_' || b == b':'
}

fn is_attr_name_byte(b: u8) -> bool {
    !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'"' | b'\'')
}

/// Parses `markup` and appends the resulting nodes to `parent`.
pub fn parse_into(
    tree: &mut Tree,
    parent: NodeId,
    markup: &str,
    schema: &HostSchema,
) -> Result<(), HtmlError> {
    let mut cur = Cursor::new(markup);
    let mut open: Vec<NodeId> = vec![parent];

    while !cur.eof() {
        let current = *open.last().unwrap_or(&parent);
        let start = cur.pos();

        if cur.starts_with(b"<!--") {
            cur.bump_n(4);
            cur.take_until("-->")
                .ok_or(HtmlError::UnterminatedComment { offset: start })?;
        } else if cur.starts_with(b"<!") || cur.starts_with(b"<?") {
            cur.take_until(">")
                .ok_or(HtmlError::UnterminatedTag { offset: start })?;
        } else if cur.starts_with(b"</") && cur.peek_at(2).is_some_and(|b| b.is_ascii_alphabetic())
        {
            cur.bump_n(2);
            let name = cur.take_while(is_name_byte).to_ascii_lowercase();
            cur.take_until(">")
                .ok_or(HtmlError::UnterminatedTag { offset: start })?;
            close_element(tree, &mut open, &name);
        } else if cur.peek() == Some(b'<') && cur.peek_at(1).is_some_and(|b| b.is_ascii_alphabetic())
        {
            cur.bump();
            let (element, self_closing) = read_start_tag(&mut cur, start)?;
            let is_void = schema.is_void(&element.name);
            let node = tree.create_element(&element.name);
            if let Some(slot) = tree.element_mut(node) {
                *slot = element;
            }
            tree.append_child(current, node)?;
            if !is_void && !self_closing {
                open.push(node);
            }
        } else {
            let text = read_text(&mut cur);
            append_text(tree, current, &decode_html_entities(text))?;
        }
    }
    Ok(())
}

/// Reads text up to the next tag-like construct. A `<` that cannot start a
/// tag is kept as text.
fn read_text<'a>(cur: &mut Cursor<'a>) -> &'a str {
    let start = cur.pos();
    let bytes = cur.s.as_bytes();
    let mut end = start + 1;
    while end < bytes.len() {
        if bytes[end] == b'<'
            && bytes
                .get(end + 1)
                .is_some_and(|&b| b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?'))
        {
            break;
        }
        end += 1;
    }
    cur.bump_n(end - start);
    &cur.s[start..end]
}

fn append_text(tree: &mut Tree, parent: NodeId, text: &str) -> Result<(), HtmlError> {
    if text.is_empty() {
        return Ok(());
    }
    if let Some(&last) = tree.children(parent).last()
        && tree.is_text(last)
    {
        tree.append_text(last, text)?;
        return Ok(());
    }
    let node = tree.create_text(text);
    tree.append_child(parent, node)?;
    Ok(())
}

/// Reads `name attr="v" ...>` after the opening `<`.
fn read_start_tag(cur: &mut Cursor<'_>, start: usize) -> Result<(Element, bool), HtmlError> {
    let mut element = Element::new(cur.take_while(is_name_byte));
    loop {
        cur.skip_whitespace();
        match cur.peek() {
            None => return Err(HtmlError::UnterminatedTag { offset: start }),
            Some(b'>') => {
                cur.bump();
                return Ok((element, false));
            }
            Some(b'/') if cur.peek_at(1) == Some(b'>') => {
                cur.bump_n(2);
                return Ok((element, true));
            }
            Some(b'/') => {
                cur.bump();
            }
            Some(_) => {
                let name = cur.take_while(is_attr_name_byte);
                if name.is_empty() {
                    // Stray quote or '=': skip it.
                    cur.bump();
                    continue;
                }
                cur.skip_whitespace();
                let value = if cur.peek() == Some(b'=') {
                    cur.bump();
                    cur.skip_whitespace();
                    read_attribute_value(cur, start)?
                } else {
                    String::new()
                };
                if element.attribute(name).is_none() {
                    element.set_attribute(name, &value);
                }
            }
        }
    }
}

fn read_attribute_value(cur: &mut Cursor<'_>, start: usize) -> Result<String, HtmlError> {
    let raw = match cur.peek() {
        Some(quote @ (b'"' | b'\'')) => {
            cur.bump();
            let closing = if quote == b'"' { "\"" } else { "'" };
            cur.take_until(closing)
                .ok_or(HtmlError::UnterminatedTag { offset: start })?
        }
        _ => cur.take_while(|b| !b.is_ascii_whitespace() && b != b'>'),
    };
    Ok(decode_html_entities(raw).into_owned())
}

fn close_element(tree: &Tree, open: &mut Vec<NodeId>, name: &str) {
    // open[0] is the container being filled and is never closed.
    let matched = open
        .iter()
        .skip(1)
        .rposition(|&node| matches!(tree.kind(node), NodeKind::Element(e) if e.name == name));
    match matched {
        Some(index) => open.truncate(index + 1),
        None => log::trace!("ignoring unmatched end tag </{name}>"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::inner_html;
    use pretty_assertions::assert_eq;

    fn round_trip(markup: &str) -> String {
        let schema = HostSchema::default();
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        parse_into(&mut tree, root, markup, &schema).unwrap();
        inner_html(&tree, root, &schema)
    }

    #[test]
    fn nested_elements() {
        assert_eq!(round_trip("<p>a<b>b</b>c</p>"), "<p>a<b>b</b>c</p>");
    }

    #[test]
    fn void_elements_do_not_nest() {
        assert_eq!(round_trip("<p><img src=x.png>after</p>"), "<p><img src=\"x.png\">after</p>");
        assert_eq!(round_trip("<p>1<br/>2</p>"), "<p>1<br>2</p>");
    }

    #[test]
    fn self_closing_non_void_is_empty() {
        assert_eq!(round_trip("<p/>x"), "<p></p>x");
    }

    #[test]
    fn attributes_in_all_forms() {
        assert_eq!(
            round_trip("<a href='/x?a=1&amp;b=2' title=\"t\" hidden>l</a>"),
            "<a href=\"/x?a=1&amp;b=2\" title=\"t\" hidden=\"\">l</a>"
        );
    }

    #[test]
    fn uppercase_tags_are_normalised() {
        assert_eq!(round_trip("<P>x</P>"), "<p>x</p>");
    }

    #[test]
    fn end_tag_closes_intervening_elements() {
        assert_eq!(round_trip("<p><b>bold</p>after"), "<p><b>bold</b></p>after");
    }

    #[test]
    fn unmatched_end_tags_are_dropped() {
        assert_eq!(round_trip("a</span>b"), "ab");
    }

    #[test]
    fn comments_and_doctype_are_skipped() {
        assert_eq!(round_trip("<!DOCTYPE html><!-- hi --><p>x</p>"), "<p>x</p>");
    }

    #[test]
    fn entities_and_stray_angle_brackets() {
        assert_eq!(round_trip("1 &lt; 2 < 3 &amp; é"), "1 &lt; 2 &lt; 3 &amp; é");
    }

    #[test]
    fn adjacent_text_merges_into_one_node() {
        let schema = HostSchema::default();
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        parse_into(&mut tree, root, "a<!-- c -->b &amp; c", &schema).unwrap();

        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.text(tree.children(root)[0]), Some("ab & c"));
        // Only the container and the single text node were allocated.
        assert_eq!(tree.create_text("next").index(), root.index() + 2);
    }

    #[test]
    fn unterminated_constructs_are_errors() {
        let schema = HostSchema::default();
        let mut tree = Tree::new();
        let root = tree.create_element("div");
        assert_eq!(
            parse_into(&mut tree, root, "ok<p class=\"x", &schema),
            Err(HtmlError::UnterminatedTag { offset: 2 })
        );
        assert_eq!(
            parse_into(&mut tree, root, "<!-- never closed", &schema),
            Err(HtmlError::UnterminatedComment { offset: 0 })
        );
    }
}
