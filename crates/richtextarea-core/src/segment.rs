//! Segment document model.
//!
//! A document is an ordered list of [`Segment`]s: plain text runs, line
//! breaks, image placeholders, and bold wrappers. Bold wrappers nest
//! recursively; everything else is a leaf. Each segment contributes a
//! **logical width** to the flat offset space the rest of the crate operates
//! in — widths are defined once, per variant, from the serialization
//! constants in [`markup`](crate::markup).
//!
//! # Example
//!
//! ```rust
//! use richtextarea_core::segment::{Document, Segment};
//!
//! let doc = Document::from_segments(vec![
//!     Segment::TextRun("hi".to_string()),
//!     Segment::LineBreak,
//!     Segment::Bold(vec![Segment::TextRun("there".to_string())]),
//! ]);
//! assert_eq!(doc.pure_text(), "hi\n<b>there</b>");
//! ```

use crate::markup::{BOLD_CLOSE_WIDTH, BOLD_OPEN_WIDTH, LINE_BREAK_WIDTH, image_width};

/// One structural unit of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A run of plain text. Width: character count.
    TextRun(String),
    /// A line break. Width: [`LINE_BREAK_WIDTH`].
    LineBreak,
    /// An inline image placeholder. Width: the character length of its
    /// serialized markup.
    Image {
        /// Alternate text, normally the emoji sequence the image stands for.
        alt: String,
        /// Image source URL.
        src: String,
    },
    /// A bold wrapper around child segments. Width: opening marker plus
    /// children plus closing marker.
    Bold(Vec<Segment>),
}

impl Segment {
    /// The logical width this segment contributes to the document.
    pub fn width(&self) -> usize {
        match self {
            Segment::TextRun(text) => text.chars().count(),
            Segment::LineBreak => LINE_BREAK_WIDTH,
            Segment::Image { alt, src } => image_width(alt, src),
            Segment::Bold(children) => {
                BOLD_OPEN_WIDTH + segments_width(children) + BOLD_CLOSE_WIDTH
            }
        }
    }
}

/// Total logical width of a segment list.
pub fn segments_width(segments: &[Segment]) -> usize {
    segments.iter().map(Segment::width).sum()
}

/// Leaf segment kind, for [`LeafRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    /// A text run.
    Text,
    /// A line break.
    LineBreak,
    /// An image placeholder.
    Image,
}

/// Absolute logical range occupied by one leaf segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRange {
    /// Child-index path from the document root to the leaf.
    pub path: Vec<usize>,
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
    /// What kind of leaf this is.
    pub kind: LeafKind,
    /// Whether the leaf sits inside at least one bold wrapper.
    pub in_bold: bool,
}

/// An ordered sequence of segments with a flat logical offset space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    segments: Vec<Segment>,
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from segments, merging adjacent text runs and
    /// dropping empty ones.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        let mut doc = Self { segments };
        doc.normalize();
        doc
    }

    /// The segments composing the document.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Total logical width of the document.
    pub fn total_width(&self) -> usize {
        segments_width(&self.segments)
    }

    /// Returns `true` when the document has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Resolve a child-index path to a segment, descending through bold
    /// wrappers. Returns `None` for paths that do not address a segment.
    pub fn segment_at(&self, path: &[usize]) -> Option<&Segment> {
        let (&first, mut rest) = path.split_first()?;
        let mut segment = self.segments.get(first)?;
        while let Some((&index, tail)) = rest.split_first() {
            match segment {
                Segment::Bold(children) => segment = children.get(index)?,
                _ => return None,
            }
            rest = tail;
        }
        Some(segment)
    }

    /// The plain text a host application sees: image placeholders contribute
    /// their alt text, line breaks a newline, and bold content is wrapped in
    /// `<b>…</b>` markers.
    pub fn pure_text(&self) -> String {
        let mut out = String::new();
        pure_text_of(&self.segments, &mut out);
        out
    }

    /// Enumerate every leaf segment with its absolute logical range, in
    /// document order.
    pub fn leaf_ranges(&self) -> Vec<LeafRange> {
        let mut out = Vec::new();
        collect_leaves(&self.segments, 0, &mut Vec::new(), false, &mut out);
        out
    }

    /// Number of image placeholders in the document.
    pub fn image_count(&self) -> usize {
        self.leaf_ranges()
            .iter()
            .filter(|leaf| leaf.kind == LeafKind::Image)
            .count()
    }

    /// Merge adjacent text runs and drop empty ones, recursively.
    pub(crate) fn normalize(&mut self) {
        normalize_segments(&mut self.segments);
    }
}

fn normalize_segments(segments: &mut Vec<Segment>) {
    let mut normalized: Vec<Segment> = Vec::with_capacity(segments.len());
    for mut segment in segments.drain(..) {
        match &mut segment {
            Segment::TextRun(text) => {
                if text.is_empty() {
                    continue;
                }
                if let Some(Segment::TextRun(last)) = normalized.last_mut() {
                    last.push_str(text);
                    continue;
                }
            }
            Segment::Bold(children) => normalize_segments(children),
            _ => {}
        }
        normalized.push(segment);
    }
    *segments = normalized;
}

fn pure_text_of(segments: &[Segment], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::TextRun(text) => out.push_str(text),
            Segment::LineBreak => out.push('\n'),
            Segment::Image { alt, .. } => out.push_str(alt),
            Segment::Bold(children) => {
                out.push_str("<b>");
                pure_text_of(children, out);
                out.push_str("</b>");
            }
        }
    }
}

fn collect_leaves(
    segments: &[Segment],
    base: usize,
    path: &mut Vec<usize>,
    in_bold: bool,
    out: &mut Vec<LeafRange>,
) -> usize {
    let mut cursor = base;
    for (index, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Bold(children) => {
                path.push(index);
                let inner_end =
                    collect_leaves(children, cursor + BOLD_OPEN_WIDTH, path, true, out);
                path.pop();
                cursor = inner_end + BOLD_CLOSE_WIDTH;
            }
            leaf => {
                let kind = match leaf {
                    Segment::TextRun(_) => LeafKind::Text,
                    Segment::LineBreak => LeafKind::LineBreak,
                    _ => LeafKind::Image,
                };
                let width = leaf.width();
                path.push(index);
                out.push(LeafRange {
                    path: path.clone(),
                    start: cursor,
                    end: cursor + width,
                    kind,
                    in_bold,
                });
                path.pop();
                cursor += width;
            }
        }
    }
    cursor
}
