//! Serialization syntax and derived width constants.
//!
//! This module owns the single markup syntax used to serialize a
//! [`Document`](crate::segment::Document): bold wrapper markers, the line
//! break marker, and the image placeholder element. Every logical-width
//! constant in the crate is derived from these marker strings, here, exactly
//! once — offset arithmetic elsewhere must never hardcode a marker length.
//!
//! Serialized snapshots are what the history manager stores; [`parse`] turns
//! one back into a document when a snapshot is restored.

use html_escape::{decode_html_entities, encode_double_quoted_attribute, encode_text};

use crate::segment::{Document, Segment};

/// Opening marker of a bold wrapper.
pub const BOLD_OPEN: &str = "<span class=\"bold\">";

/// Closing marker of a bold wrapper.
pub const BOLD_CLOSE: &str = "</span>";

/// Serialized form of a line break.
pub const LINE_BREAK: &str = "<br>";

/// Logical width contributed by a bold wrapper's opening marker.
///
/// The marker strings are ASCII, so `len()` equals the character count.
pub const BOLD_OPEN_WIDTH: usize = BOLD_OPEN.len();

/// Logical width contributed by a bold wrapper's closing marker.
pub const BOLD_CLOSE_WIDTH: usize = BOLD_CLOSE.len();

/// Combined logical width of an empty bold wrapper.
pub const BOLD_WRAPPER_WIDTH: usize = BOLD_OPEN_WIDTH + BOLD_CLOSE_WIDTH;

/// Logical width contributed by a line break.
///
/// A line break counts as a single character in the logical text, regardless
/// of its serialized marker length.
pub const LINE_BREAK_WIDTH: usize = 1;

/// Serialized form of an image placeholder. Attribute values are escaped for
/// a double-quoted attribute position.
pub fn image_markup(alt: &str, src: &str) -> String {
    format!(
        "<img class=\"emoji\" draggable=\"false\" src=\"{}\" alt=\"{}\">",
        encode_double_quoted_attribute(src),
        encode_double_quoted_attribute(alt),
    )
}

/// Logical width contributed by an image placeholder: the character length of
/// its serialized markup. Derived from [`image_markup`] so the two can never
/// disagree.
pub fn image_width(alt: &str, src: &str) -> usize {
    image_markup(alt, src).chars().count()
}

/// Serialize a document into markup.
pub fn serialize(doc: &Document) -> String {
    let mut out = String::new();
    serialize_segments(doc.segments(), &mut out);
    out
}

fn serialize_segments(segments: &[Segment], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::TextRun(text) => out.push_str(&encode_text(text)),
            Segment::LineBreak => out.push_str(LINE_BREAK),
            Segment::Image { alt, src } => out.push_str(&image_markup(alt, src)),
            Segment::Bold(children) => {
                out.push_str(BOLD_OPEN);
                serialize_segments(children, out);
                out.push_str(BOLD_CLOSE);
            }
        }
    }
}

/// Error raised while parsing serialized markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupError {
    /// The input ended inside an unterminated construct.
    UnexpectedEof,
    /// Markup at the given byte position is not part of the syntax.
    UnexpectedMarkup {
        /// Byte position of the offending `<`.
        position: usize,
    },
    /// An image element is missing a required attribute.
    MissingAttribute {
        /// The attribute that was not found.
        name: &'static str,
    },
}

impl std::fmt::Display for MarkupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarkupError::UnexpectedEof => {
                write!(f, "unexpected end of markup")
            }
            MarkupError::UnexpectedMarkup { position } => {
                write!(f, "unexpected markup at byte {}", position)
            }
            MarkupError::MissingAttribute { name } => {
                write!(f, "image element is missing the '{}' attribute", name)
            }
        }
    }
}

impl std::error::Error for MarkupError {}

/// Parse serialized markup back into a document.
///
/// Only the syntax produced by [`serialize`] is accepted; any other element
/// is an error. Round-trips with [`serialize`] for every document.
pub fn parse(input: &str) -> Result<Document, MarkupError> {
    let mut pos = 0;
    let segments = parse_segments(input, &mut pos, false)?;
    Ok(Document::from_segments(segments))
}

fn parse_segments(
    input: &str,
    pos: &mut usize,
    nested: bool,
) -> Result<Vec<Segment>, MarkupError> {
    let mut out: Vec<Segment> = Vec::new();
    let mut text = String::new();

    while *pos < input.len() {
        let rest = &input[*pos..];
        if rest.starts_with(BOLD_CLOSE) {
            if !nested {
                return Err(MarkupError::UnexpectedMarkup { position: *pos });
            }
            flush_text(&mut text, &mut out);
            *pos += BOLD_CLOSE.len();
            return Ok(out);
        } else if rest.starts_with(BOLD_OPEN) {
            flush_text(&mut text, &mut out);
            *pos += BOLD_OPEN.len();
            let children = parse_segments(input, pos, true)?;
            out.push(Segment::Bold(children));
        } else if rest.starts_with(LINE_BREAK) {
            flush_text(&mut text, &mut out);
            *pos += LINE_BREAK.len();
            out.push(Segment::LineBreak);
        } else if rest.starts_with("<img ") {
            flush_text(&mut text, &mut out);
            out.push(parse_image(input, pos)?);
        } else if rest.starts_with('<') {
            return Err(MarkupError::UnexpectedMarkup { position: *pos });
        } else {
            let next_tag = rest.find('<').map_or(input.len(), |i| *pos + i);
            text.push_str(&decode_html_entities(&input[*pos..next_tag]));
            *pos = next_tag;
        }
    }

    if nested {
        return Err(MarkupError::UnexpectedEof);
    }
    flush_text(&mut text, &mut out);
    Ok(out)
}

fn flush_text(text: &mut String, out: &mut Vec<Segment>) {
    if !text.is_empty() {
        out.push(Segment::TextRun(std::mem::take(text)));
    }
}

fn parse_image(input: &str, pos: &mut usize) -> Result<Segment, MarkupError> {
    let rest = &input[*pos..];
    let end = rest.find('>').ok_or(MarkupError::UnexpectedEof)?;
    let tag = &rest[..end];
    let src = attribute_value(tag, "src").ok_or(MarkupError::MissingAttribute { name: "src" })?;
    let alt = attribute_value(tag, "alt").ok_or(MarkupError::MissingAttribute { name: "alt" })?;
    let segment = Segment::Image {
        alt: decode_html_entities(alt).into_owned(),
        src: decode_html_entities(src).into_owned(),
    };
    *pos += end + 1;
    Ok(segment)
}

fn attribute_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!(" {name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let len = tag[start..].find('"')?;
    Some(&tag[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_constants_derive_from_markers() {
        assert_eq!(BOLD_OPEN_WIDTH, BOLD_OPEN.chars().count());
        assert_eq!(BOLD_CLOSE_WIDTH, BOLD_CLOSE.chars().count());
        assert_eq!(BOLD_WRAPPER_WIDTH, BOLD_OPEN_WIDTH + BOLD_CLOSE_WIDTH);
        assert_eq!(LINE_BREAK_WIDTH, 1);
    }

    #[test]
    fn test_image_width_matches_markup() {
        let alt = ":)";
        let src = "https://example.com/smile.png";
        assert_eq!(image_width(alt, src), image_markup(alt, src).chars().count());
    }

    #[test]
    fn test_serialize_escapes_text() {
        let doc = Document::from_segments(vec![Segment::TextRun("a < b & c".to_string())]);
        let markup = serialize(&doc);
        assert!(!markup.contains("< b"));
        assert_eq!(parse(&markup).unwrap(), doc);
    }

    #[test]
    fn test_parse_round_trip_with_all_segment_kinds() {
        let doc = Document::from_segments(vec![
            Segment::TextRun("hello ".to_string()),
            Segment::Image {
                alt: "🙂".to_string(),
                src: "https://cdn.example/1f642.png".to_string(),
            },
            Segment::LineBreak,
            Segment::Bold(vec![Segment::TextRun("strong".to_string())]),
            Segment::TextRun(" tail".to_string()),
        ]);
        let markup = serialize(&doc);
        assert_eq!(parse(&markup).unwrap(), doc);
    }

    #[test]
    fn test_parse_nested_bold() {
        let doc = Document::from_segments(vec![Segment::Bold(vec![
            Segment::TextRun("a".to_string()),
            Segment::Bold(vec![Segment::TextRun("b".to_string())]),
        ])]);
        let markup = serialize(&doc);
        assert_eq!(parse(&markup).unwrap(), doc);
    }

    #[test]
    fn test_parse_rejects_foreign_markup() {
        assert!(matches!(
            parse("<div>nope</div>"),
            Err(MarkupError::UnexpectedMarkup { position: 0 })
        ));
    }

    #[test]
    fn test_parse_rejects_unterminated_bold() {
        assert!(matches!(
            parse("<span class=\"bold\">oops"),
            Err(MarkupError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_parse_rejects_stray_close() {
        assert!(matches!(
            parse("text</span>"),
            Err(MarkupError::UnexpectedMarkup { .. })
        ));
    }

    #[test]
    fn test_image_attribute_escaping_round_trips() {
        let doc = Document::from_segments(vec![Segment::Image {
            alt: "a\"b".to_string(),
            src: "https://example.com/x?a=1&b=2".to_string(),
        }]);
        let markup = serialize(&doc);
        assert_eq!(parse(&markup).unwrap(), doc);
    }
}
