//! Selection Reconciler: reading and writing the live selection.
//!
//! The live view owns the real selection; this module reconciles it with the
//! engine's logical offsets. [`SelectionHost`] is the entire surface a view
//! binding implements: focus state, a fallible selection read, and a caret
//! write. [`query`] turns a host read into a normalized [`SelectionQuery`];
//! [`CaretApplier`] writes a caret back, verifying on subsequent frames and
//! giving up after a bounded number of attempts instead of retrying forever.
//!
//! # Example
//!
//! ```rust
//! use richtextarea_core::selection::Selection;
//!
//! let sel = Selection::new(7, 3);
//! assert_eq!((sel.start, sel.end), (3, 7));
//! assert!(sel.is_selected());
//! ```

use crate::offset::{DomPoint, snap, to_offset, to_point};
use crate::segment::Document;

/// A normalized selection over logical offsets: `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    /// Inclusive start offset.
    pub start: usize,
    /// Exclusive end offset.
    pub end: usize,
}

impl Selection {
    /// Create a selection, swapping the endpoints when given backwards.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// A collapsed caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Returns `true` when the selection covers at least one position.
    pub fn is_selected(&self) -> bool {
        self.start != self.end
    }

    /// Logical width of the selected span.
    pub fn width(&self) -> usize {
        self.end - self.start
    }
}

/// The outcome of reading the live selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionQuery {
    /// The normalized, snapped selection.
    pub selection: Selection,
    /// Whether the selected content (or, for a caret, the insertion point)
    /// sits entirely inside bold wrappers.
    pub is_in_bold: bool,
}

/// Error raised when the live selection cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReadError {
    /// No selection object is available right now.
    Unavailable,
    /// The selection lies outside the editor element.
    Foreign,
}

impl std::fmt::Display for SelectionReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionReadError::Unavailable => write!(f, "live selection is unavailable"),
            SelectionReadError::Foreign => {
                write!(f, "live selection lies outside the editor element")
            }
        }
    }
}

impl std::error::Error for SelectionReadError {}

/// The live view a selection binding must expose.
pub trait SelectionHost {
    /// Whether the editor element currently has focus.
    fn has_focus(&self) -> bool;

    /// Read the current selection as anchor and focus positions.
    fn selection(&self) -> Result<(DomPoint, DomPoint), SelectionReadError>;

    /// Move the caret to a collapsed position. Verification happens through
    /// a later [`SelectionHost::selection`] read, not here.
    fn set_caret(&mut self, point: &DomPoint);
}

/// Read and normalize the host selection.
///
/// A failed read degrades to a caret at offset `0` and a warning; it never
/// propagates. Endpoints are snapped to valid caret boundaries and swapped
/// into `start <= end` order.
pub fn query(doc: &Document, host: &dyn SelectionHost) -> SelectionQuery {
    let selection = match host.selection() {
        Ok((anchor, focus)) => {
            let a = snap(doc, to_offset(doc, &anchor));
            let b = snap(doc, to_offset(doc, &focus));
            Selection::new(a, b)
        }
        Err(err) => {
            log::warn!("selection read failed ({err}); treating as caret at 0");
            Selection::caret(0)
        }
    };
    SelectionQuery {
        selection,
        is_in_bold: is_in_bold(doc, selection),
    }
}

/// Whether a selection sits entirely in bold content.
///
/// A range is bold when every leaf it overlaps is inside a bold wrapper. A
/// collapsed caret is bold when its tree position descends into a wrapper.
pub fn is_in_bold(doc: &Document, selection: Selection) -> bool {
    if !selection.is_selected() {
        return to_point(doc, selection.start).path.len() > 1;
    }
    bold_coverage(doc, selection.start, selection.end)
}

/// Returns `true` when every leaf overlapping `start..end` is bold and the
/// range overlaps at least one leaf.
pub fn bold_coverage(doc: &Document, start: usize, end: usize) -> bool {
    let mut any = false;
    for leaf in doc.leaf_ranges() {
        if leaf.start < end && leaf.end > start {
            if !leaf.in_bold {
                return false;
            }
            any = true;
        }
    }
    any
}

/// Terminal and intermediate states of a caret write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// The host reports the caret at the requested position.
    Applied,
    /// The write has not been confirmed yet; call again next frame.
    Pending,
    /// The attempt budget ran out; the caret is wherever the host left it.
    GaveUp,
}

/// Attempts before a caret write is abandoned.
pub const DEFAULT_MAX_APPLY_ATTEMPTS: u32 = 8;

/// Frame-retried caret writer.
///
/// Views confirm selection changes asynchronously, so a single write cannot
/// be trusted. The applier writes the caret, then re-checks on each
/// subsequent [`tick`](CaretApplier::tick) until the host confirms the
/// position or the attempt budget runs out. Writes only happen while the
/// host has focus; unfocused frames still consume attempts so a blurred
/// editor cannot queue a write forever.
#[derive(Debug, Clone)]
pub struct CaretApplier {
    target: Option<usize>,
    attempts: u32,
    max_attempts: u32,
}

impl Default for CaretApplier {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_APPLY_ATTEMPTS)
    }
}

impl CaretApplier {
    /// Create an applier with a custom attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            target: None,
            attempts: 0,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Request the caret be moved to `offset` on upcoming ticks.
    pub fn set_target(&mut self, offset: usize) {
        self.target = Some(offset);
        self.attempts = 0;
    }

    /// The offset still waiting to be confirmed, if any.
    pub fn pending_target(&self) -> Option<usize> {
        self.target
    }

    /// Run one frame of the write-verify loop.
    ///
    /// Returns [`ApplyStatus::Applied`] once with the target cleared when the
    /// host confirms, [`ApplyStatus::Pending`] while retrying, and
    /// [`ApplyStatus::GaveUp`] once when the budget is exhausted. With no
    /// pending target this is a no-op reporting `Applied`.
    pub fn tick(&mut self, doc: &Document, host: &mut dyn SelectionHost) -> ApplyStatus {
        let Some(target) = self.target else {
            return ApplyStatus::Applied;
        };
        let target = snap(doc, target);

        if host.has_focus() {
            if let Ok((anchor, focus)) = host.selection() {
                let a = snap(doc, to_offset(doc, &anchor));
                let b = snap(doc, to_offset(doc, &focus));
                if a == target && b == target {
                    self.target = None;
                    self.attempts = 0;
                    return ApplyStatus::Applied;
                }
            }
            host.set_caret(&to_point(doc, target));
        }

        self.attempts += 1;
        if self.attempts >= self.max_attempts {
            log::warn!(
                "caret apply to offset {target} gave up after {} attempts",
                self.attempts
            );
            self.target = None;
            self.attempts = 0;
            return ApplyStatus::GaveUp;
        }
        ApplyStatus::Pending
    }
}
