//! Event-driven undo/redo line store.
//!
//! The store observes the engine instead of reading its internals: it
//! accumulates the in-progress line from the same notifications any other
//! listener sees, commits it when the stroke stops, and records programmatic
//! lines from their own notification. Undo moves the newest visible line to
//! the redo stash; redo moves it back. Repainting is the caller's job: an
//! undo/redo addon clears and replays through the engine.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use log::debug;

use crate::event::{EventParam, Handler};
use crate::sketch::{NOTIFY_LINE_DRAWN, NOTIFY_PAINT, NOTIFY_START, NOTIFY_STOP, Sketch};
use crate::stroke::Stroke;

#[derive(Default)]
struct HistoryState {
    /// Strokes currently applied to the artwork, oldest first.
    visible: Vec<Stroke>,
    /// Undone strokes available for redo, oldest first.
    stashed: Vec<Stroke>,
    /// Mirror of the in-progress stroke, fed by start/paint notifications.
    current: Vec<Point>,
}

impl HistoryState {
    fn commit(&mut self, stroke: Stroke) {
        // A fresh commit forks the timeline: the redo branch is invalidated.
        self.stashed.clear();
        debug!("history: commit stroke {} ({} points)", stroke.id(), stroke.points().len());
        self.visible.push(stroke);
    }
}

/// Replayable line history fed by engine notifications.
///
/// Cloning shares the underlying history, so the store handed to an undo
/// addon and the one handed to a redo addon see the same lines.
#[derive(Clone, Default)]
pub struct HistoryStore {
    state: Rc<RefCell<HistoryState>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store subscribed to `sketch`'s lifecycle notifications.
    pub fn attach(sketch: &Sketch) -> Self {
        let store = Self::new();
        let events = sketch.event_manager();

        let state = store.state.clone();
        let on_point: Handler = Rc::new(move |event| {
            if let Some(point) = event.param(0).and_then(EventParam::as_point) {
                state.borrow_mut().current.push(point);
            }
        });
        events.subscribe(&format!("{NOTIFY_START} {NOTIFY_PAINT}"), on_point);

        let state = store.state.clone();
        let on_stop: Handler = Rc::new(move |event| {
            let mut state = state.borrow_mut();
            let points = std::mem::take(&mut state.current);

            let eraser = event.param(1).and_then(EventParam::as_bool).unwrap_or(false);
            if eraser {
                // Eraser strokes change pixels, not history.
                return;
            }

            let Some(style) = event.param(0).and_then(EventParam::as_style) else {
                return;
            };
            if points.is_empty() {
                return;
            }
            state.commit(Stroke::new(points, style.clone()));
        });
        events.subscribe(NOTIFY_STOP, on_stop);

        let state = store.state.clone();
        let on_line_drawn: Handler = Rc::new(move |event| {
            let points = event.param(0).and_then(EventParam::as_points);
            let style = event.param(1).and_then(EventParam::as_style);
            if let (Some(points), Some(style)) = (points, style) {
                if points.is_empty() {
                    return;
                }
                state
                    .borrow_mut()
                    .commit(Stroke::new(points.to_vec(), style.clone()));
            }
        });
        events.subscribe(NOTIFY_LINE_DRAWN, on_line_drawn);

        store
    }

    /// Append a committed stroke, invalidating any stashed (redoable)
    /// strokes: committing forks the history.
    pub fn push_line(&self, stroke: Stroke) {
        self.state.borrow_mut().commit(stroke);
    }

    /// The committed strokes currently visible, oldest first.
    pub fn visible_lines(&self) -> Vec<Stroke> {
        self.state.borrow().visible.clone()
    }

    /// Move the newest visible stroke to the redo stash. No-op when nothing
    /// is visible.
    pub fn undo(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(stroke) = state.visible.pop() {
            debug!("history: stash stroke {}", stroke.id());
            state.stashed.push(stroke);
        }
    }

    /// Move the newest stashed stroke back to the visible set and return it
    /// for replay. `None` when nothing is stashed.
    pub fn redo(&self) -> Option<Stroke> {
        let mut state = self.state.borrow_mut();
        let stroke = state.stashed.pop()?;
        debug!("history: restore stroke {}", stroke.id());
        state.visible.push(stroke.clone());
        Some(stroke)
    }

    /// Forget everything: visible, stashed and the in-progress mirror.
    pub fn reset(&self) {
        *self.state.borrow_mut() = HistoryState::default();
    }

    pub fn can_undo(&self) -> bool {
        !self.state.borrow().visible.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.state.borrow().stashed.is_empty()
    }

    pub fn visible_len(&self) -> usize {
        self.state.borrow().visible.len()
    }

    pub fn stashed_len(&self) -> usize {
        self.state.borrow().stashed.len()
    }
}
