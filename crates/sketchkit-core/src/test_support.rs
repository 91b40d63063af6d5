//! Shared test double for the surface contract: records every call so tests
//! can assert on the exact operation sequence. Cloning shares the recording,
//! letting a test keep a handle to a surface the engine owns.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;

use crate::stroke::Rgba;
use crate::surface::{CompositeMode, Surface};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Op {
    Save,
    Restore,
    StrokeColor(Rgba),
    LineWidth(f64),
    Alpha(f64),
    Composite(CompositeMode),
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    StrokePath,
    Clear,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingSurface {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far.
    pub fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.ops.borrow().len()
    }

    pub fn stroke_calls(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| **op == Op::StrokePath)
            .count()
    }

    pub fn clear_calls(&self) -> usize {
        self.ops
            .borrow()
            .iter()
            .filter(|op| **op == Op::Clear)
            .count()
    }

    /// True when every save has a matching restore.
    pub fn balanced(&self) -> bool {
        let ops = self.ops.borrow();
        let saves = ops.iter().filter(|op| **op == Op::Save).count();
        let restores = ops.iter().filter(|op| **op == Op::Restore).count();
        saves == restores
    }
}

impl Surface for RecordingSurface {
    fn save(&mut self) {
        self.ops.borrow_mut().push(Op::Save);
    }

    fn restore(&mut self) {
        self.ops.borrow_mut().push(Op::Restore);
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ops.borrow_mut().push(Op::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.borrow_mut().push(Op::LineWidth(width));
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.ops.borrow_mut().push(Op::Alpha(alpha));
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.ops.borrow_mut().push(Op::Composite(mode));
    }

    fn begin_path(&mut self) {
        self.ops.borrow_mut().push(Op::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.ops.borrow_mut().push(Op::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.ops.borrow_mut().push(Op::LineTo(point));
    }

    fn stroke_path(&mut self) {
        self.ops.borrow_mut().push(Op::StrokePath);
    }

    fn clear(&mut self) {
        self.ops.borrow_mut().push(Op::Clear);
    }
}
