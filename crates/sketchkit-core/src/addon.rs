//! Undo/redo addons.
//!
//! Addons are registered with [`Sketch::register_addon`]: the engine keeps
//! them alive and each addon holds a weak handle back. `execute` is driven
//! by the host (a toolbar button, a keyboard shortcut), never from inside an
//! event handler.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::warn;

use crate::history::HistoryStore;
use crate::sketch::{Sketch, SketchRef};
use crate::stroke::Stroke;

/// Capability contract for engine addons.
pub trait Addon {
    /// Store a handle to the engine the addon was registered with.
    fn attach_sketch(&mut self, sketch: &SketchRef);
}

/// Reverts the most recent stroke by replaying the remaining history.
pub struct UndoAddon {
    sketch: Weak<RefCell<Sketch>>,
    store: HistoryStore,
}

impl UndoAddon {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            sketch: Weak::new(),
            store,
        }
    }

    /// Clear the artwork, pop the newest visible stroke and repaint what is
    /// left, oldest first.
    ///
    /// History mutations are defined only between strokes; a call while a
    /// stroke is being captured is a precondition violation and is refused.
    pub fn execute(&self) {
        let Some(sketch) = self.sketch.upgrade() else {
            warn!("undo addon executed without an attached engine");
            return;
        };
        let mut sketch = sketch.borrow_mut();
        if sketch.is_drawing() {
            warn!("undo requested while a stroke is in progress; ignoring");
            return;
        }

        sketch.clear();
        self.store.undo();
        replay(&mut sketch, &self.store.visible_lines());
    }
}

impl Addon for UndoAddon {
    fn attach_sketch(&mut self, sketch: &SketchRef) {
        self.sketch = Rc::downgrade(sketch);
    }
}

/// Reapplies the most recently undone stroke.
pub struct RedoAddon {
    sketch: Weak<RefCell<Sketch>>,
    store: HistoryStore,
}

impl RedoAddon {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            sketch: Weak::new(),
            store,
        }
    }

    /// Move the newest stashed stroke back to the visible set and paint just
    /// that stroke; the rest of the artwork is already on the surface.
    pub fn execute(&self) {
        let Some(sketch) = self.sketch.upgrade() else {
            warn!("redo addon executed without an attached engine");
            return;
        };
        let mut sketch = sketch.borrow_mut();
        if sketch.is_drawing() {
            warn!("redo requested while a stroke is in progress; ignoring");
            return;
        }

        if let Some(stroke) = self.store.redo() {
            replay(&mut sketch, std::slice::from_ref(&stroke));
        }
    }
}

impl Addon for RedoAddon {
    fn attach_sketch(&mut self, sketch: &SketchRef) {
        self.sketch = Rc::downgrade(sketch);
    }
}

/// Repaint `lines` in order through suppressed `draw_line` calls.
///
/// The engine's style and eraser mode are saved around the replay and
/// restored after; a replay must composite normally even when the host left
/// the eraser on.
fn replay(sketch: &mut Sketch, lines: &[Stroke]) {
    let saved_style = sketch.drawing_options();
    let saved_eraser = sketch.eraser_active();
    sketch.enable_eraser(false);

    for line in lines {
        sketch.set_drawing_options(line.options().clone());
        sketch.draw_line(line.points(), true);
    }

    sketch.set_drawing_options(saved_style);
    sketch.enable_eraser(saved_eraser);
}
