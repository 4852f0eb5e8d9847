//! Offset Mapper: absolute logical offsets ⇄ tree positions.
//!
//! A live view expresses caret positions as a node plus a local offset; the
//! engine works in absolute logical offsets. [`DomPoint`] is the neutral form
//! of the node/offset pair: a child-index path from the document root plus a
//! local offset. [`to_point`] and [`to_offset`] translate between the two
//! representations and are exact inverses over every valid caret offset.
//!
//! Offsets that fall strictly inside an atomic region — an image placeholder
//! or a bold wrapper marker — are not caret positions; they saturate to the
//! nearest boundary ([`snap`]). Unresolvable points saturate to the end of
//! the document.
//!
//! # Example
//!
//! ```rust
//! use richtextarea_core::offset::{to_offset, to_point};
//! use richtextarea_core::segment::{Document, Segment};
//!
//! let doc = Document::from_segments(vec![Segment::TextRun("hello".to_string())]);
//! let point = to_point(&doc, 3);
//! assert_eq!(point.path, vec![0]);
//! assert_eq!(point.offset, 3);
//! assert_eq!(to_offset(&doc, &point), 3);
//! ```

use crate::markup::{BOLD_OPEN_WIDTH, BOLD_WRAPPER_WIDTH};
use crate::segment::{Document, Segment, segments_width};

/// A position in the document tree: a child-index path plus a local offset.
///
/// - An empty path addresses the root; `offset` is then a child index, the
///   way a live selection reports an element-relative position.
/// - A path into a [`Segment::TextRun`] uses `offset` as a character index
///   within the run.
/// - A path to a line break, image, or bold wrapper uses `offset` `0` for the
///   position just before it and any non-zero value for just after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomPoint {
    /// Child indices from the root, descending through bold wrappers.
    pub path: Vec<usize>,
    /// Local offset, interpreted per the addressed node.
    pub offset: usize,
}

impl DomPoint {
    /// Convenience constructor.
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }
}

/// Map an absolute logical offset to a tree position.
///
/// Offsets beyond the document width saturate to the end. Offsets strictly
/// inside an image or a wrapper marker resolve to the nearest caret boundary:
/// inside an opening marker, the start of the wrapper's content; inside a
/// closing marker or an image, the position just after the segment.
pub fn to_point(doc: &Document, offset: usize) -> DomPoint {
    let clamped = offset.min(doc.total_width());
    point_in(doc.segments(), clamped)
}

fn point_in(segments: &[Segment], mut remaining: usize) -> DomPoint {
    for (index, segment) in segments.iter().enumerate() {
        let width = segment.width();
        if remaining <= width {
            match segment {
                Segment::TextRun(_) => return DomPoint::new(vec![index], remaining),
                Segment::LineBreak | Segment::Image { .. } => {
                    let local = if remaining == 0 { 0 } else { 1 };
                    return DomPoint::new(vec![index], local);
                }
                Segment::Bold(children) => {
                    if remaining == 0 {
                        return DomPoint::new(vec![index], 0);
                    }
                    if children.is_empty() {
                        // An empty wrapper cannot be entered.
                        return DomPoint::new(vec![index], 1);
                    }
                    let inner_width = width - BOLD_WRAPPER_WIDTH;
                    if remaining > BOLD_OPEN_WIDTH + inner_width {
                        return DomPoint::new(vec![index], 1);
                    }
                    let inner = remaining.saturating_sub(BOLD_OPEN_WIDTH);
                    let mut point = point_in(children, inner);
                    point.path.insert(0, index);
                    return point;
                }
            }
        }
        remaining -= width;
    }
    // Past every segment: the root element position after the last child.
    DomPoint::new(Vec::new(), segments.len())
}

/// Map a tree position back to an absolute logical offset.
///
/// The inverse of [`to_point`] for every point it produces. Paths that do not
/// address a segment saturate to the end of the document.
pub fn to_offset(doc: &Document, point: &DomPoint) -> usize {
    let total = doc.total_width();
    if point.path.is_empty() {
        let count = point.offset.min(doc.segments().len());
        return segments_width(&doc.segments()[..count]);
    }
    offset_in(doc.segments(), &point.path, point.offset).unwrap_or(total)
}

fn offset_in(segments: &[Segment], path: &[usize], local: usize) -> Option<usize> {
    let (&index, rest) = path.split_first()?;
    let segment = segments.get(index)?;
    let before = segments_width(&segments[..index]);

    if rest.is_empty() {
        let inside = match segment {
            Segment::TextRun(text) => local.min(text.chars().count()),
            _ if local == 0 => 0,
            segment => segment.width(),
        };
        return Some(before + inside);
    }

    match segment {
        Segment::Bold(children) => {
            Some(before + BOLD_OPEN_WIDTH + offset_in(children, rest, local)?)
        }
        _ => None,
    }
}

/// Clamp an arbitrary offset to the nearest valid caret boundary.
pub fn snap(doc: &Document, offset: usize) -> usize {
    to_offset(doc, &to_point(doc, offset))
}
