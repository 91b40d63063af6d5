//! End-to-end history tests: engine, store and addons over the raster
//! surface.

use std::cell::RefCell;
use std::rc::Rc;

use sketchkit_core::{
    HistoryStore, Point, RedoAddon, Rgba, Sketch, SketchOptions, SketchRef, StrokeStyle, UndoAddon,
};
use sketchkit_raster::SharedSurface;

struct Rig {
    sketch: SketchRef,
    canvas: SharedSurface,
    store: HistoryStore,
    undo: Rc<RefCell<UndoAddon>>,
    redo: Rc<RefCell<RedoAddon>>,
}

fn rig(options: SketchOptions) -> Rig {
    let canvas = SharedSurface::new(64, 64);
    let overlay = SharedSurface::new(64, 64);
    let sketch = Sketch::new(
        Box::new(canvas.clone()),
        Some(Box::new(overlay.clone())),
        options,
    )
    .unwrap();
    let store = HistoryStore::attach(&sketch);
    let sketch: SketchRef = Rc::new(RefCell::new(sketch));

    let undo = Rc::new(RefCell::new(UndoAddon::new(store.clone())));
    let redo = Rc::new(RefCell::new(RedoAddon::new(store.clone())));
    Sketch::register_addon(&sketch, undo.clone());
    Sketch::register_addon(&sketch, redo.clone());

    Rig {
        sketch,
        canvas,
        store,
        undo,
        redo,
    }
}

fn draw(rig: &Rig, from: Point, to: Point) {
    let mut sketch = rig.sketch.borrow_mut();
    sketch.start_drawing(from);
    sketch.make_drawing(to);
    sketch.stop_drawing();
}

#[test]
fn test_captured_stroke_is_committed_with_its_style() {
    let rig = rig(SketchOptions {
        color: Rgba::from_hex("#ff0000").unwrap(),
        width: 5.0,
        ..SketchOptions::default()
    });

    draw(&rig, Point::new(0.0, 0.0), Point::new(10.0, 0.0));

    let lines = rig.store.visible_lines();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].points(), &[Point::new(0.0, 0.0), Point::new(10.0, 0.0)]);
    assert_eq!(
        lines[0].options(),
        &StrokeStyle {
            color: Rgba::from_hex("#ff0000").unwrap(),
            width: 5.0,
            alpha: 1.0,
        }
    );
}

#[test]
fn test_undo_then_redo_restores_the_exact_pixels() {
    let rig = rig(SketchOptions {
        color: Rgba::from_hex("#ff0000").unwrap(),
        double_buffering: true,
        ..SketchOptions::default()
    });

    draw(&rig, Point::new(10.0, 10.0), Point::new(30.0, 10.0));
    let drawn = rig.canvas.snapshot();
    assert!(!rig.canvas.is_blank());

    rig.undo.borrow().execute();
    assert_eq!(rig.store.visible_len(), 0);
    assert_eq!(rig.store.stashed_len(), 1);
    assert!(rig.canvas.is_blank());

    rig.redo.borrow().execute();
    assert_eq!(rig.store.visible_len(), 1);
    assert_eq!(rig.store.stashed_len(), 0);
    assert_eq!(rig.canvas.snapshot(), drawn);
}

#[test]
fn test_new_stroke_invalidates_the_redo_branch() {
    let rig = rig(SketchOptions::default());

    draw(&rig, Point::new(0.0, 10.0), Point::new(20.0, 10.0));
    rig.undo.borrow().execute();
    assert_eq!(rig.store.stashed_len(), 1);

    draw(&rig, Point::new(0.0, 30.0), Point::new(20.0, 30.0));
    assert_eq!(rig.store.stashed_len(), 0);

    let before = rig.canvas.snapshot();
    rig.redo.borrow().execute();
    assert_eq!(rig.canvas.snapshot(), before);
    assert_eq!(rig.store.visible_len(), 1);
}

#[test]
fn test_stroke_count_is_conserved_across_history_moves() {
    let rig = rig(SketchOptions::default());

    for i in 0..3 {
        let y = f64::from(i) * 10.0 + 5.0;
        draw(&rig, Point::new(0.0, y), Point::new(20.0, y));
    }
    assert_eq!(rig.store.visible_len() + rig.store.stashed_len(), 3);

    rig.undo.borrow().execute();
    rig.undo.borrow().execute();
    assert_eq!(rig.store.visible_len() + rig.store.stashed_len(), 3);

    rig.redo.borrow().execute();
    assert_eq!(rig.store.visible_len() + rig.store.stashed_len(), 3);
    assert_eq!(rig.store.visible_len(), 2);
}

#[test]
fn test_replay_reproduces_identical_pixels() {
    let rig = rig(SketchOptions {
        double_buffering: true,
        ..SketchOptions::default()
    });

    {
        let mut sketch = rig.sketch.borrow_mut();
        sketch.set_color(Rgba::from_hex("#ff0000").unwrap());
        sketch.set_alpha(0.6);
    }
    draw(&rig, Point::new(5.0, 10.0), Point::new(40.0, 10.0));
    {
        let mut sketch = rig.sketch.borrow_mut();
        sketch.set_color(Rgba::from_hex("#0000ff").unwrap());
        sketch.set_width(3.0);
    }
    draw(&rig, Point::new(20.0, 0.0), Point::new(20.0, 40.0));

    let drawn = rig.canvas.snapshot();
    let lines = rig.store.visible_lines();

    {
        let mut sketch = rig.sketch.borrow_mut();
        sketch.clear();
        assert!(rig.canvas.is_blank());

        for line in &lines {
            sketch.set_drawing_options(line.options().clone());
            sketch.draw_line(line.points(), true);
        }
    }

    assert_eq!(rig.canvas.snapshot(), drawn);
    // Suppressed replays never re-enter history.
    assert_eq!(rig.store.visible_len(), lines.len());
}

#[test]
fn test_erasing_is_not_recorded_and_not_undoable() {
    let rig = rig(SketchOptions {
        color: Rgba::from_hex("#ff0000").unwrap(),
        ..SketchOptions::default()
    });

    draw(&rig, Point::new(10.0, 10.0), Point::new(30.0, 10.0));
    assert_eq!(rig.store.visible_len(), 1);

    {
        let mut sketch = rig.sketch.borrow_mut();
        sketch.enable_eraser(true);
        sketch.start_drawing(Point::new(10.0, 10.0));
        sketch.make_drawing(Point::new(30.0, 10.0));
        sketch.stop_drawing();
        sketch.enable_eraser(false);
    }

    assert_eq!(rig.canvas.pixel(20, 10).a, 0);
    // The eraser pass is not a stroke: history still holds the red line.
    assert_eq!(rig.store.visible_len(), 1);
}

#[test]
fn test_programmatic_line_is_undoable() {
    let rig = rig(SketchOptions::default());

    rig.sketch
        .borrow_mut()
        .draw_line(&[Point::new(5.0, 5.0), Point::new(25.0, 5.0)], false);

    assert_eq!(rig.store.visible_len(), 1);
    assert!(!rig.canvas.is_blank());

    rig.undo.borrow().execute();
    assert_eq!(rig.store.visible_len(), 0);
    assert!(rig.canvas.is_blank());
}
