//! SketchKit Core
//!
//! An embeddable freehand drawing engine: pointer samples in, persisted
//! vector strokes and a replayable undo/redo history out.
//!
//! The engine is single-threaded and event driven. A [`Sketch`] turns
//! start/move/stop input into paints on a [`Surface`], previewing
//! in-progress strokes on an overlay when double buffering is enabled, and
//! publishes lifecycle notifications through its [`EventManager`]. A
//! [`HistoryStore`] built from those notifications feeds the [`UndoAddon`]
//! and [`RedoAddon`], which replay lines back through the engine.
//!
//! Surfaces and pointer resolution are collaborator contracts: see
//! [`Surface`] and [`pointer::ResolvePointer`]. The `sketchkit-raster` crate
//! provides a deterministic CPU surface.

pub mod addon;
pub mod error;
pub mod event;
pub mod history;
pub mod pointer;
pub mod renderer;
pub mod sketch;
pub mod stroke;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_support;

pub use addon::{Addon, RedoAddon, UndoAddon};
pub use error::SketchError;
pub use event::{Event, EventManager, EventParam, Handler};
pub use history::HistoryStore;
pub use pointer::{PlacementResolver, PointerSample, ResolvePointer, SurfacePlacement};
pub use sketch::{
    NOTIFY_LINE_DRAWN, NOTIFY_PAINT, NOTIFY_START, NOTIFY_STOP, Sketch, SketchOptions, SketchRef,
};
pub use stroke::{Rgba, Stroke, StrokeStyle};
pub use surface::{CompositeMode, Surface, SurfaceGuard};

pub use kurbo::Point;
