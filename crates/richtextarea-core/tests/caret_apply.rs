//! Live-selection reconciliation: query, adopt, and the frame-retried
//! caret writer driven through the state manager.

use std::time::{Duration, Instant};

use richtextarea_core::{
    ApplyStatus, DomPoint, Selection, SelectionHost, SelectionReadError, TextAreaStateManager,
    offset,
};

fn clock() -> impl Fn(u64) -> Instant {
    let origin = Instant::now();
    move |seconds| origin + Duration::from_secs(seconds)
}

/// Scripted view stand-in. Holds a selection and honors caret writes after
/// an optional number of dropped frames.
struct FakeView {
    focus: bool,
    selection: Result<(DomPoint, DomPoint), SelectionReadError>,
    dropped_writes: u32,
}

impl FakeView {
    fn new() -> Self {
        Self {
            focus: true,
            selection: Ok((DomPoint::new(vec![], 0), DomPoint::new(vec![], 0))),
            dropped_writes: 0,
        }
    }
}

impl SelectionHost for FakeView {
    fn has_focus(&self) -> bool {
        self.focus
    }

    fn selection(&self) -> Result<(DomPoint, DomPoint), SelectionReadError> {
        self.selection.clone()
    }

    fn set_caret(&mut self, point: &DomPoint) {
        if self.dropped_writes > 0 {
            self.dropped_writes -= 1;
            return;
        }
        self.selection = Ok((point.clone(), point.clone()));
    }
}

#[test]
fn an_edit_queues_a_caret_write_that_settles() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    let t = clock();

    manager.insert_text("hello", t(2)).unwrap();
    assert_eq!(manager.selection(), Selection::caret(5));

    // First frame writes, second frame verifies.
    assert_eq!(manager.tick(&mut view), ApplyStatus::Pending);
    assert_eq!(manager.tick(&mut view), ApplyStatus::Applied);

    let (anchor, focus) = view.selection.clone().unwrap();
    let doc = manager.executor().doc();
    assert_eq!(offset::to_offset(doc, &anchor), 5);
    assert_eq!(offset::to_offset(doc, &focus), 5);
}

#[test]
fn ticks_with_nothing_pending_are_no_ops() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    assert_eq!(manager.tick(&mut view), ApplyStatus::Applied);
}

#[test]
fn a_dropped_write_retries_next_frame() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    view.dropped_writes = 2;
    let t = clock();

    manager.insert_text("ab", t(2)).unwrap();
    assert_eq!(manager.tick(&mut view), ApplyStatus::Pending);
    assert_eq!(manager.tick(&mut view), ApplyStatus::Pending);
    assert_eq!(manager.tick(&mut view), ApplyStatus::Pending);
    assert_eq!(manager.tick(&mut view), ApplyStatus::Applied);
}

#[test]
fn an_uncooperative_view_exhausts_the_attempt_budget() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    view.dropped_writes = u32::MAX;
    let t = clock();

    manager.insert_text("x", t(2)).unwrap();
    let mut last = ApplyStatus::Pending;
    let mut frames = 0;
    while last == ApplyStatus::Pending {
        last = manager.tick(&mut view);
        frames += 1;
        assert!(frames <= 64, "the applier must give up eventually");
    }
    assert_eq!(last, ApplyStatus::GaveUp);
    // The next frame has nothing left to do.
    assert_eq!(manager.tick(&mut view), ApplyStatus::Applied);
}

#[test]
fn query_live_adopts_the_view_selection() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    let t = clock();
    manager.insert_text("hello", t(2)).unwrap();

    view.selection = Ok((DomPoint::new(vec![0], 4), DomPoint::new(vec![0], 1)));
    let q = manager.query_live(&view);
    assert_eq!(q.selection, Selection::new(1, 4));
    assert_eq!(manager.selection(), Selection::new(1, 4));
}

#[test]
fn query_live_survives_a_failed_read() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    let t = clock();
    manager.insert_text("hello", t(2)).unwrap();

    view.selection = Err(SelectionReadError::Foreign);
    let q = manager.query_live(&view);
    assert_eq!(q.selection, Selection::caret(0));
    assert_eq!(manager.selection(), Selection::caret(0));
}

#[test]
fn blurred_frames_never_write_to_the_view() {
    let mut manager = TextAreaStateManager::new();
    let mut view = FakeView::new();
    view.focus = false;
    let t = clock();

    manager.insert_text("abc", t(2)).unwrap();
    manager.tick(&mut view);
    let (anchor, _) = view.selection.clone().unwrap();
    assert_eq!(anchor, DomPoint::new(vec![], 0));
}
