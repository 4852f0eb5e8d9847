//! Range-Edit Engine.
//!
//! Every mutation flows through here: the insert pipeline (remove the
//! selected range, sanitize, expand emoji, splice, collapse the caret), the
//! bold toggle with wrapper splitting and unwrapping, grapheme-aware
//! backspace and forward delete, and the empty-wrapper sweep that keeps the
//! selection consistent while spans disappear.
//!
//! Edits are atomic: each operation builds a new [`Document`] and returns it
//! together with the resulting caret or selection. The input document is
//! never touched, so a failed or no-op edit leaves the caller's state intact.
//!
//! # Example
//!
//! ```rust
//! use richtextarea_core::edit::insert;
//! use richtextarea_core::emoji::NoEmoji;
//! use richtextarea_core::sanitize::PlainTextSanitizer;
//! use richtextarea_core::segment::Document;
//! use richtextarea_core::selection::Selection;
//!
//! let outcome = insert(
//!     &Document::new(),
//!     Selection::caret(0),
//!     "hello",
//!     &PlainTextSanitizer,
//!     &NoEmoji,
//! );
//! assert_eq!(outcome.doc.pure_text(), "hello");
//! assert_eq!(outcome.caret, 5);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::emoji::{EmojiResolver, expand_text};
use crate::markup::{BOLD_OPEN_WIDTH, BOLD_WRAPPER_WIDTH};
use crate::offset::{snap, to_point};
use crate::sanitize::Sanitizer;
use crate::segment::{Document, LeafKind, Segment, segments_width};
use crate::selection::{Selection, bold_coverage, is_in_bold};

/// Result of an edit that collapses the selection to a caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The document after the edit.
    pub doc: Document,
    /// Collapsed caret offset in the new document.
    pub caret: usize,
}

/// Result of a bold toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoldOutcome {
    /// The document after the toggle.
    pub doc: Document,
    /// The toggled content, still selected.
    pub selection: Selection,
    /// Whether the resulting selection is bold.
    pub is_in_bold: bool,
}

/// Which half of an image placeholder a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickHalf {
    /// Left half: the caret goes before the image.
    Left,
    /// Right half: the caret goes after the image.
    Right,
}

fn char_to_byte(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Remove `start..end` from the document.
///
/// Returns the new document and the removed content, flattened: bold
/// wrappers covered by the range contribute their children, not themselves.
/// Offsets are snapped first, so an atomic segment is either fully covered
/// or untouched; a partially covered wrapper keeps its uncovered content and
/// may be left empty for [`sweep_empty_spans`].
pub fn remove_range(doc: &Document, start: usize, end: usize) -> (Document, Vec<Segment>) {
    let (lo, hi) = (start.min(end), start.max(end));
    let start = snap(doc, lo);
    let end = snap(doc, hi);
    if start >= end {
        return (doc.clone(), Vec::new());
    }
    let mut kept = Vec::new();
    let mut removed = Vec::new();
    remove_in(doc.segments(), 0, start, end, &mut kept, &mut removed);
    (Document::from_segments(kept), removed)
}

fn remove_in(
    segments: &[Segment],
    base: usize,
    start: usize,
    end: usize,
    kept: &mut Vec<Segment>,
    removed: &mut Vec<Segment>,
) {
    let mut cursor = base;
    for segment in segments {
        let width = segment.width();
        let seg_start = cursor;
        let seg_end = cursor + width;
        cursor = seg_end;

        if end <= seg_start || start >= seg_end {
            kept.push(segment.clone());
            continue;
        }
        match segment {
            Segment::TextRun(text) => {
                let chars = text.chars().count();
                let lo = start.saturating_sub(seg_start).min(chars);
                let hi = (end - seg_start).min(chars);
                let lo_byte = char_to_byte(text, lo);
                let hi_byte = char_to_byte(text, hi);
                if lo > 0 {
                    kept.push(Segment::TextRun(text[..lo_byte].to_string()));
                }
                if hi < chars {
                    kept.push(Segment::TextRun(text[hi_byte..].to_string()));
                }
                removed.push(Segment::TextRun(text[lo_byte..hi_byte].to_string()));
            }
            Segment::LineBreak | Segment::Image { .. } => {
                if start <= seg_start && end >= seg_end {
                    removed.push(segment.clone());
                } else {
                    kept.push(segment.clone());
                }
            }
            Segment::Bold(children) => {
                if start <= seg_start && end >= seg_end {
                    flatten_into(children, removed);
                } else {
                    let mut inner = Vec::new();
                    remove_in(
                        children,
                        seg_start + BOLD_OPEN_WIDTH,
                        start,
                        end,
                        &mut inner,
                        removed,
                    );
                    kept.push(Segment::Bold(inner));
                }
            }
        }
    }
}

fn flatten_into(segments: &[Segment], out: &mut Vec<Segment>) {
    for segment in segments {
        match segment {
            Segment::Bold(children) => flatten_into(children, out),
            other => out.push(other.clone()),
        }
    }
}

/// Insert a fragment at `offset`, returning the new document.
///
/// The offset is snapped first. An offset inside a wrapper's content region
/// splices into the wrapper; the position just past a wrapper splices after
/// it, matching the tree positions the offset mapper produces.
pub fn splice(doc: &Document, offset: usize, fragment: Vec<Segment>) -> Document {
    let mut segments = doc.segments().to_vec();
    splice_in(&mut segments, snap(doc, offset), fragment);
    Document::from_segments(segments)
}

fn splice_in(segments: &mut Vec<Segment>, mut remaining: usize, fragment: Vec<Segment>) {
    let mut index = 0;
    while index < segments.len() {
        if remaining == 0 {
            segments.splice(index..index, fragment);
            return;
        }
        let width = segments[index].width();
        match &mut segments[index] {
            Segment::TextRun(text) if remaining < width => {
                let byte = char_to_byte(text, remaining);
                let tail = Segment::TextRun(text.split_off(byte));
                segments.splice(
                    index + 1..index + 1,
                    fragment.into_iter().chain(std::iter::once(tail)),
                );
                return;
            }
            Segment::Bold(children) if remaining < width && !children.is_empty() => {
                let inner_width = width - BOLD_WRAPPER_WIDTH;
                let inner = remaining.saturating_sub(BOLD_OPEN_WIDTH).min(inner_width);
                splice_in(children, inner, fragment);
                return;
            }
            // Atomic segments and empty wrappers cannot be entered; an
            // interior offset lands just after them.
            _ => {}
        }
        remaining = remaining.saturating_sub(width);
        index += 1;
    }
    segments.extend(fragment);
}

/// Replace the selection with a prebuilt fragment and collapse the caret
/// after it.
pub fn insert_fragment(
    doc: &Document,
    selection: Selection,
    fragment: Vec<Segment>,
) -> EditOutcome {
    let start = snap(doc, selection.start.min(selection.end));
    let end = snap(doc, selection.start.max(selection.end));
    let (working, _removed) = remove_range(doc, start, end);
    let start = snap(&working, start);
    let width = segments_width(&fragment);
    let working = splice(&working, start, fragment);
    let (doc, swept) = sweep_empty_spans(&working, Selection::caret(start + width));
    let caret = snap(&doc, swept.start);
    EditOutcome { doc, caret }
}

/// The insert pipeline: sanitize, expand emoji and newlines, replace the
/// selection, collapse the caret after the inserted content.
pub fn insert(
    doc: &Document,
    selection: Selection,
    text: &str,
    sanitizer: &dyn Sanitizer,
    resolver: &dyn EmojiResolver,
) -> EditOutcome {
    let clean = sanitizer.sanitize(text);
    let fragment = expand_text(resolver, &clean);
    insert_fragment(doc, selection, fragment)
}

/// Toggle bold over the selection.
///
/// A range that is not entirely bold gets extracted and rewrapped in a
/// single wrapper; an entirely bold range gets extracted, the covering
/// wrapper split at the extraction point, and the content respliced outside
/// any wrapper. The returned selection still covers the toggled content, so
/// toggling twice restores the original emphasis. A collapsed selection is a
/// no-op.
pub fn toggle_bold(doc: &Document, selection: Selection) -> BoldOutcome {
    let start = snap(doc, selection.start.min(selection.end));
    let end = snap(doc, selection.start.max(selection.end));
    if start >= end {
        let caret = Selection::caret(start);
        return BoldOutcome {
            doc: doc.clone(),
            selection: caret,
            is_in_bold: is_in_bold(doc, caret),
        };
    }

    let make_bold = !bold_coverage(doc, start, end);
    let (working, removed) = remove_range(doc, start, end);
    let (mut working, swept) = sweep_empty_spans(&working, Selection::caret(start));
    let mut at = swept.start;
    if to_point(&working, at).path.len() > 1 {
        at = split_bold_at(&mut working, at);
    }

    let content_width = segments_width(&removed);
    let fragment = if make_bold {
        vec![Segment::Bold(removed)]
    } else {
        removed
    };
    let working = splice(&working, at, fragment);
    let selection = if make_bold {
        Selection::new(at + BOLD_OPEN_WIDTH, at + BOLD_OPEN_WIDTH + content_width)
    } else {
        Selection::new(at, at + content_width)
    };
    let (doc, selection) = sweep_empty_spans(&working, selection);
    let is_bold = bold_coverage(&doc, selection.start, selection.end);
    BoldOutcome {
        doc,
        selection,
        is_in_bold: is_bold,
    }
}

/// Split the top-level wrapper containing `offset` into two wrappers at that
/// point, returning the offset of the boundary between them. Empty halves
/// are dropped. Offsets not inside a wrapper are returned unchanged.
fn split_bold_at(doc: &mut Document, offset: usize) -> usize {
    let segments = doc.segments_mut();
    let mut cursor = 0;
    for index in 0..segments.len() {
        let width = segments[index].width();
        if offset > cursor && offset < cursor + width {
            let children = match &mut segments[index] {
                Segment::Bold(children) => std::mem::take(children),
                // Interior of a text run needs no split.
                _ => return offset,
            };
            segments.remove(index);
            let inner_width = segments_width(&children);
            let rel = (offset - cursor)
                .saturating_sub(BOLD_OPEN_WIDTH)
                .min(inner_width);
            let (left, right) = split_segments_at(children, rel);
            let mut boundary = cursor;
            let mut insert_at = index;
            if !left.is_empty() {
                let wrapper = Segment::Bold(left);
                boundary += wrapper.width();
                segments.insert(insert_at, wrapper);
                insert_at += 1;
            }
            if !right.is_empty() {
                segments.insert(insert_at, Segment::Bold(right));
            }
            return boundary;
        }
        cursor += width;
    }
    offset
}

/// Split a segment list at a relative logical width, splitting text runs and
/// nested wrappers as needed.
fn split_segments_at(segments: Vec<Segment>, at: usize) -> (Vec<Segment>, Vec<Segment>) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    let mut remaining = at;
    let mut splitting = true;
    for segment in segments {
        if !splitting {
            right.push(segment);
            continue;
        }
        let width = segment.width();
        if remaining >= width {
            remaining -= width;
            left.push(segment);
            continue;
        }
        splitting = false;
        if remaining == 0 {
            right.push(segment);
            continue;
        }
        match segment {
            Segment::TextRun(text) => {
                let byte = char_to_byte(&text, remaining);
                left.push(Segment::TextRun(text[..byte].to_string()));
                right.push(Segment::TextRun(text[byte..].to_string()));
            }
            Segment::Bold(children) => {
                let inner_width = segments_width(&children);
                let rel = remaining.saturating_sub(BOLD_OPEN_WIDTH).min(inner_width);
                let (inner_left, inner_right) = split_segments_at(children, rel);
                if !inner_left.is_empty() {
                    left.push(Segment::Bold(inner_left));
                }
                if !inner_right.is_empty() {
                    right.push(Segment::Bold(inner_right));
                }
            }
            // Atomic segments have no interior; they stay left of the cut.
            atomic => left.push(atomic),
        }
    }
    (left, right)
}

/// Remove empty bold wrappers, shrinking the selection past each removal.
///
/// Offsets beyond a removed wrapper shift left by the wrapper width; offsets
/// inside one clamp to its position. Runs to a fixpoint so wrappers that
/// become empty when their only child is swept disappear in the same call.
pub fn sweep_empty_spans(doc: &Document, selection: Selection) -> (Document, Selection) {
    let mut segments = doc.segments().to_vec();
    let mut start = selection.start;
    let mut end = selection.end;
    loop {
        let mut empties = Vec::new();
        collect_empty_wrappers(&segments, 0, &mut Vec::new(), &mut empties);
        if empties.is_empty() {
            break;
        }
        for (offset, path) in empties.iter().rev() {
            remove_at_path(&mut segments, path);
            if end > *offset {
                end = (*offset).max(end.saturating_sub(BOLD_WRAPPER_WIDTH));
            }
            if start > *offset {
                start = (*offset).max(start.saturating_sub(BOLD_WRAPPER_WIDTH));
            }
        }
    }
    let doc = Document::from_segments(segments);
    let total = doc.total_width();
    (doc, Selection::new(start.min(total), end.min(total)))
}

fn collect_empty_wrappers(
    segments: &[Segment],
    base: usize,
    path: &mut Vec<usize>,
    out: &mut Vec<(usize, Vec<usize>)>,
) {
    let mut cursor = base;
    for (index, segment) in segments.iter().enumerate() {
        if let Segment::Bold(children) = segment {
            path.push(index);
            if children.is_empty() {
                out.push((cursor, path.clone()));
            } else {
                collect_empty_wrappers(children, cursor + BOLD_OPEN_WIDTH, path, out);
            }
            path.pop();
        }
        cursor += segment.width();
    }
}

fn remove_at_path(segments: &mut Vec<Segment>, path: &[usize]) {
    let Some((&index, rest)) = path.split_first() else {
        return;
    };
    if rest.is_empty() {
        if index < segments.len() {
            segments.remove(index);
        }
    } else if let Some(Segment::Bold(children)) = segments.get_mut(index) {
        remove_at_path(children, rest);
    }
}

/// Delete one unit before the caret: the previous grapheme cluster in a text
/// run, or a whole line break or image. A non-collapsed selection deletes
/// its content instead.
pub fn delete_backward(doc: &Document, selection: Selection) -> EditOutcome {
    if selection.is_selected() {
        return insert_fragment(doc, selection, Vec::new());
    }
    let caret = snap(doc, selection.start);
    let leaves = doc.leaf_ranges();
    let Some(leaf) = leaves.iter().filter(|leaf| leaf.start < caret).next_back() else {
        return EditOutcome {
            doc: doc.clone(),
            caret,
        };
    };
    let at = caret.min(leaf.end);
    let (rm_start, rm_end) = match (leaf.kind, doc.segment_at(&leaf.path)) {
        (LeafKind::Text, Some(Segment::TextRun(text))) => {
            let local = at - leaf.start;
            if local == 0 {
                return EditOutcome {
                    doc: doc.clone(),
                    caret,
                };
            }
            let end_byte = char_to_byte(text, local);
            let start_byte = text[..end_byte]
                .grapheme_indices(true)
                .next_back()
                .map_or(0, |(byte, _)| byte);
            let grapheme_chars = text[start_byte..end_byte].chars().count();
            (at - grapheme_chars, at)
        }
        _ => (leaf.start, leaf.end),
    };
    let (working, _removed) = remove_range(doc, rm_start, rm_end);
    let (doc, swept) = sweep_empty_spans(&working, Selection::caret(rm_start));
    let caret = snap(&doc, swept.start);
    EditOutcome { doc, caret }
}

/// Delete one unit after the caret; mirror of [`delete_backward`].
pub fn delete_forward(doc: &Document, selection: Selection) -> EditOutcome {
    if selection.is_selected() {
        return insert_fragment(doc, selection, Vec::new());
    }
    let caret = snap(doc, selection.start);
    let leaves = doc.leaf_ranges();
    let Some(leaf) = leaves.iter().find(|leaf| leaf.end > caret) else {
        return EditOutcome {
            doc: doc.clone(),
            caret,
        };
    };
    let at = caret.max(leaf.start);
    let (rm_start, rm_end) = match (leaf.kind, doc.segment_at(&leaf.path)) {
        (LeafKind::Text, Some(Segment::TextRun(text))) => {
            let local = at - leaf.start;
            let start_byte = char_to_byte(text, local);
            let grapheme_chars = text[start_byte..]
                .graphemes(true)
                .next()
                .map_or(0, |g| g.chars().count());
            if grapheme_chars == 0 {
                return EditOutcome {
                    doc: doc.clone(),
                    caret,
                };
            }
            (at, at + grapheme_chars)
        }
        _ => (leaf.start, leaf.end),
    };
    let (working, _removed) = remove_range(doc, rm_start, rm_end);
    let (doc, swept) = sweep_empty_spans(&working, Selection::caret(caret.min(rm_start)));
    let caret = snap(&doc, swept.start);
    EditOutcome { doc, caret }
}

/// Caret offset for a pointer click on an image placeholder: the left half
/// puts the caret before the image, the right half after it. Returns `None`
/// when the path does not address an image.
pub fn caret_for_image_click(doc: &Document, path: &[usize], half: ClickHalf) -> Option<usize> {
    doc.leaf_ranges()
        .into_iter()
        .find(|leaf| leaf.kind == LeafKind::Image && leaf.path == path)
        .map(|leaf| match half {
            ClickHalf::Left => leaf.start,
            ClickHalf::Right => leaf.end,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emoji::{EmojiHit, NoEmoji};
    use crate::sanitize::PlainTextSanitizer;

    fn text(s: &str) -> Segment {
        Segment::TextRun(s.to_string())
    }

    fn image() -> Segment {
        Segment::Image {
            alt: ":)".to_string(),
            src: "https://cdn.example/smile.png".to_string(),
        }
    }

    struct Smiley;

    impl EmojiResolver for Smiley {
        fn first_hit(&self, source: &str) -> Option<EmojiHit> {
            let start = source.find(":)")?;
            Some(EmojiHit {
                start,
                end: start + 2,
                alt: ":)".to_string(),
                src: "https://cdn.example/smile.png".to_string(),
            })
        }
    }

    #[test]
    fn test_insert_into_plain_text() {
        let doc = Document::from_segments(vec![text("helo")]);
        let outcome = insert(&doc, Selection::caret(3), "l", &PlainTextSanitizer, &NoEmoji);
        assert_eq!(outcome.doc.pure_text(), "hello");
        assert_eq!(outcome.caret, 4);
    }

    #[test]
    fn test_insert_replaces_selection_atomically() {
        let doc = Document::from_segments(vec![text("abcdef")]);
        let outcome = insert(
            &doc,
            Selection::new(2, 4),
            "XY",
            &PlainTextSanitizer,
            &NoEmoji,
        );
        assert_eq!(outcome.doc.pure_text(), "abXYef");
        assert_eq!(outcome.caret, 4);
    }

    #[test]
    fn test_insert_expands_emoji() {
        let outcome = insert(
            &Document::new(),
            Selection::caret(0),
            "hi :) bye",
            &PlainTextSanitizer,
            &Smiley,
        );
        let image_w = image().width();
        assert_eq!(outcome.doc.total_width(), 3 + image_w + 4);
        assert_eq!(outcome.caret, 3 + image_w + 4);
        assert_eq!(outcome.doc.image_count(), 1);
        assert_eq!(outcome.doc.pure_text(), "hi :) bye");
    }

    #[test]
    fn test_insert_newline_becomes_line_break() {
        let outcome = insert(
            &Document::new(),
            Selection::caret(0),
            "a\nb",
            &PlainTextSanitizer,
            &NoEmoji,
        );
        assert_eq!(
            outcome.doc.segments(),
            &[text("a"), Segment::LineBreak, text("b")]
        );
        assert_eq!(outcome.caret, 3);
    }

    #[test]
    fn test_insert_inside_bold_stays_bold() {
        let doc = Document::from_segments(vec![Segment::Bold(vec![text("ad")])]);
        let at = BOLD_OPEN_WIDTH + 1;
        let outcome = insert(
            &doc,
            Selection::caret(at),
            "bc",
            &PlainTextSanitizer,
            &NoEmoji,
        );
        assert_eq!(
            outcome.doc.segments(),
            &[Segment::Bold(vec![text("abcd")])]
        );
        assert_eq!(outcome.caret, at + 2);
    }

    #[test]
    fn test_remove_range_is_exact_over_mixed_content() {
        let doc = Document::from_segments(vec![text("ab"), image(), text("cd")]);
        let image_w = image().width();

        // Fully covering the image removes it.
        let (removed_doc, removed) = remove_range(&doc, 2, 2 + image_w);
        assert_eq!(removed_doc.segments(), &[text("abcd")]);
        assert_eq!(removed, vec![image()]);

        // A range ending strictly inside the image snaps past it.
        let (snapped_doc, _) = remove_range(&doc, 1, 3);
        assert_eq!(snapped_doc.pure_text(), "acd");
    }

    #[test]
    fn test_remove_range_keeps_partially_covered_wrapper() {
        let doc = Document::from_segments(vec![Segment::Bold(vec![text("abcd")]), text("xy")]);
        let start = BOLD_OPEN_WIDTH + 2;
        let end = doc.total_width() - 1;
        let (new_doc, removed) = remove_range(&doc, start, end);
        assert_eq!(new_doc.segments(), &[Segment::Bold(vec![text("ab")]), text("y")]);
        assert_eq!(removed, vec![text("cd"), text("x")]);
    }

    #[test]
    fn test_toggle_bold_wraps_plain_range() {
        let doc = Document::from_segments(vec![text("ab cd ef")]);
        let outcome = toggle_bold(&doc, Selection::new(3, 5));
        assert_eq!(
            outcome.doc.segments(),
            &[text("ab "), Segment::Bold(vec![text("cd")]), text(" ef")]
        );
        assert!(outcome.is_in_bold);
        assert_eq!(
            outcome.selection,
            Selection::new(3 + BOLD_OPEN_WIDTH, 3 + BOLD_OPEN_WIDTH + 2)
        );
    }

    #[test]
    fn test_toggle_bold_twice_restores_document() {
        let doc = Document::from_segments(vec![text("ab cd ef")]);
        let once = toggle_bold(&doc, Selection::new(3, 5));
        let twice = toggle_bold(&once.doc, once.selection);
        assert_eq!(twice.doc, doc);
        assert!(!twice.is_in_bold);
        assert_eq!(twice.selection, Selection::new(3, 5));
    }

    #[test]
    fn test_toggle_bold_unwraps_middle_of_wrapper() {
        let doc = Document::from_segments(vec![Segment::Bold(vec![text("abcdef")])]);
        let start = BOLD_OPEN_WIDTH + 2;
        let outcome = toggle_bold(&doc, Selection::new(start, start + 2));
        assert_eq!(
            outcome.doc.segments(),
            &[
                Segment::Bold(vec![text("ab")]),
                text("cd"),
                Segment::Bold(vec![text("ef")]),
            ]
        );
        assert!(!outcome.is_in_bold);
        let at = BOLD_WRAPPER_WIDTH + 2;
        assert_eq!(outcome.selection, Selection::new(at, at + 2));
    }

    #[test]
    fn test_toggle_bold_unwraps_entire_wrapper() {
        let doc = Document::from_segments(vec![text("x"), Segment::Bold(vec![text("ab")])]);
        let start = 1 + BOLD_OPEN_WIDTH;
        let outcome = toggle_bold(&doc, Selection::new(start, start + 2));
        assert_eq!(outcome.doc.segments(), &[text("xab")]);
        assert_eq!(outcome.selection, Selection::new(1, 3));
        assert!(!outcome.is_in_bold);
    }

    #[test]
    fn test_toggle_bold_over_mixed_range_flattens_existing_bold() {
        let doc = Document::from_segments(vec![text("ab"), Segment::Bold(vec![text("cd")])]);
        let outcome = toggle_bold(&doc, Selection::new(0, doc.total_width()));
        assert_eq!(
            outcome.doc.segments(),
            &[Segment::Bold(vec![text("abcd")])]
        );
        assert!(outcome.is_in_bold);
    }

    #[test]
    fn test_toggle_bold_collapsed_selection_is_noop() {
        let doc = Document::from_segments(vec![text("abc")]);
        let outcome = toggle_bold(&doc, Selection::caret(1));
        assert_eq!(outcome.doc, doc);
        assert!(!outcome.is_in_bold);
    }

    #[test]
    fn test_sweep_clamps_selection_past_removed_wrappers() {
        let doc = Document::from_segments(vec![
            text("ab"),
            Segment::Bold(vec![]),
            text("cd"),
        ]);
        let after_wrapper = 2 + BOLD_WRAPPER_WIDTH;
        let (swept, selection) =
            sweep_empty_spans(&doc, Selection::new(after_wrapper + 1, after_wrapper + 2));
        assert_eq!(swept.segments(), &[text("abcd")]);
        assert_eq!(selection, Selection::new(3, 4));

        // A selection endpoint inside the removed span clamps to its position.
        let (_, clamped) = sweep_empty_spans(&doc, Selection::new(2 + 3, after_wrapper + 2));
        assert_eq!(clamped, Selection::new(2, 4));
    }

    #[test]
    fn test_delete_backward_removes_previous_grapheme() {
        let doc = Document::from_segments(vec![text("ae\u{301}")]);
        let outcome = delete_backward(&doc, Selection::caret(3));
        assert_eq!(outcome.doc.segments(), &[text("a")]);
        assert_eq!(outcome.caret, 1);
    }

    #[test]
    fn test_delete_backward_removes_whole_image() {
        let doc = Document::from_segments(vec![text("ab"), image(), text("cd")]);
        let image_w = image().width();
        let outcome = delete_backward(&doc, Selection::caret(2 + image_w));
        assert_eq!(outcome.doc.segments(), &[text("abcd")]);
        assert_eq!(outcome.caret, 2);
    }

    #[test]
    fn test_delete_backward_at_document_start_is_noop() {
        let doc = Document::from_segments(vec![text("ab")]);
        let outcome = delete_backward(&doc, Selection::caret(0));
        assert_eq!(outcome.doc, doc);
        assert_eq!(outcome.caret, 0);
    }

    #[test]
    fn test_delete_backward_after_bold_eats_into_wrapper() {
        let doc = Document::from_segments(vec![Segment::Bold(vec![text("ab")]), text("x")]);
        let after_wrapper = BOLD_WRAPPER_WIDTH + 2;
        let outcome = delete_backward(&doc, Selection::caret(after_wrapper));
        assert_eq!(outcome.doc.segments(), &[Segment::Bold(vec![text("a")]), text("x")]);
        assert_eq!(outcome.caret, BOLD_OPEN_WIDTH + 1);
    }

    #[test]
    fn test_delete_backward_sweeps_emptied_wrapper() {
        let doc = Document::from_segments(vec![text("x"), Segment::Bold(vec![text("a")])]);
        let caret = 1 + BOLD_OPEN_WIDTH + 1;
        let outcome = delete_backward(&doc, Selection::caret(caret));
        assert_eq!(outcome.doc.segments(), &[text("x")]);
        assert_eq!(outcome.caret, 1);
    }

    #[test]
    fn test_delete_forward_removes_line_break() {
        let doc = Document::from_segments(vec![text("a"), Segment::LineBreak, text("b")]);
        let outcome = delete_forward(&doc, Selection::caret(1));
        assert_eq!(outcome.doc.segments(), &[text("ab")]);
        assert_eq!(outcome.caret, 1);
    }

    #[test]
    fn test_delete_forward_removes_next_grapheme() {
        let doc = Document::from_segments(vec![text("ae\u{301}b")]);
        let outcome = delete_forward(&doc, Selection::caret(1));
        assert_eq!(outcome.doc.segments(), &[text("ab")]);
        assert_eq!(outcome.caret, 1);
    }

    #[test]
    fn test_delete_forward_at_document_end_is_noop() {
        let doc = Document::from_segments(vec![text("ab")]);
        let outcome = delete_forward(&doc, Selection::caret(2));
        assert_eq!(outcome.doc, doc);
        assert_eq!(outcome.caret, 2);
    }

    #[test]
    fn test_caret_for_image_click_halves() {
        let doc = Document::from_segments(vec![text("ab"), image(), text("cd")]);
        let image_w = image().width();
        assert_eq!(caret_for_image_click(&doc, &[1], ClickHalf::Left), Some(2));
        assert_eq!(
            caret_for_image_click(&doc, &[1], ClickHalf::Right),
            Some(2 + image_w)
        );
        assert_eq!(caret_for_image_click(&doc, &[0], ClickHalf::Left), None);
    }
}
