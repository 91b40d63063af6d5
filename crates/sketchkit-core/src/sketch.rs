//! The sketch engine: stroke capture state machine and double-buffering
//! compositor.
//!
//! A [`Sketch`] owns the permanent surface (the artwork), an optional
//! overlay surface (the in-progress preview), the current stroke style and
//! the capture state. Pointer input, already resolved to surface-local
//! coordinates, drives [`Sketch::start_drawing`] / [`Sketch::make_drawing`]
//! / [`Sketch::stop_drawing`]; lifecycle notifications go out through the
//! engine's [`EventManager`] so observers like
//! [`HistoryStore`](crate::history::HistoryStore) never reach into engine
//! internals.
//!
//! Why double buffering: painting each incremental segment straight onto the
//! permanent surface makes a translucent stroke blend with itself wherever
//! segments overlap, so `alpha < 1` comes out darker at the overlaps.
//! Rendering the whole accumulated stroke on the overlay every move and
//! committing it in a single paint on stop keeps the opacity uniform.

use std::cell::RefCell;
use std::rc::Rc;

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::addon::Addon;
use crate::error::SketchError;
use crate::event::{EventManager, EventParam};
use crate::renderer;
use crate::stroke::{Rgba, StrokeStyle};
use crate::surface::Surface;

/// Published on pointer-down, once per captured stroke. Payload: the
/// resolved start point.
pub const NOTIFY_START: &str = "notify.start";
/// Published on every captured pointer movement. Payload: the resolved
/// point.
pub const NOTIFY_PAINT: &str = "notify.paint";
/// Published when a captured stroke ends. Payload: the committing style and
/// the eraser flag.
pub const NOTIFY_STOP: &str = "notify.stop";
/// Published when a line lands on the permanent surface through
/// [`Sketch::draw_line`]. Payload: the points and the style they were drawn
/// with.
pub const NOTIFY_LINE_DRAWN: &str = "notify.line.drawn";

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchOptions {
    pub color: Rgba,
    /// Line width in surface pixels.
    pub width: f64,
    /// Stroke opacity in `[0, 1]`.
    pub alpha: f64,
    /// Preview in-progress strokes on the overlay surface and commit them to
    /// the permanent surface in one paint on stop. Fixed at construction.
    pub double_buffering: bool,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: 5.0,
            alpha: 1.0,
            double_buffering: false,
        }
    }
}

/// Shared handle to a [`Sketch`]; addons hold a weak form of this.
///
/// The engine is single-threaded and cooperatively scheduled, which is what
/// the `Rc<RefCell<_>>` spells out.
pub type SketchRef = Rc<RefCell<Sketch>>;

/// The drawing engine.
pub struct Sketch {
    id: Uuid,
    options: SketchOptions,
    drawing: bool,
    disabled: bool,
    eraser: bool,
    last_point: Point,
    /// Accumulated points of the in-progress stroke while double buffering.
    points: Vec<Point>,
    surface: Box<dyn Surface>,
    overlay: Option<Box<dyn Surface>>,
    events: EventManager,
    addons: Vec<Rc<RefCell<dyn Addon>>>,
}

impl Sketch {
    /// Create an engine over a permanent surface and an optional overlay.
    ///
    /// Fails fast with [`SketchError::MissingOverlay`] when the options ask
    /// for double buffering and no overlay is supplied; deferring the check
    /// would turn a configuration mistake into a paint-time failure.
    pub fn new(
        surface: Box<dyn Surface>,
        overlay: Option<Box<dyn Surface>>,
        options: SketchOptions,
    ) -> Result<Self, SketchError> {
        if options.double_buffering && overlay.is_none() {
            return Err(SketchError::MissingOverlay);
        }

        Ok(Self {
            id: Uuid::new_v4(),
            options,
            drawing: false,
            disabled: false,
            eraser: false,
            last_point: Point::ZERO,
            points: Vec::new(),
            surface,
            overlay,
            events: EventManager::new(),
            addons: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_manager(&self) -> &EventManager {
        &self.events
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn eraser_active(&self) -> bool {
        self.eraser
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// The anchor for the next incremental segment.
    pub fn last_point(&self) -> Point {
        self.last_point
    }

    pub fn double_buffering(&self) -> bool {
        self.options.double_buffering
    }

    /// The style channels relevant for creating a line.
    pub fn drawing_options(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.options.color,
            width: self.options.width,
            alpha: self.options.alpha,
        }
    }

    /// Replace all style channels in one call; replay uses this to impose a
    /// recorded stroke's style and to restore the host's afterwards.
    pub fn set_drawing_options(&mut self, style: StrokeStyle) {
        self.options.color = style.color;
        self.options.width = style.width;
        self.options.alpha = style.alpha.clamp(0.0, 1.0);
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.options.color = color;
    }

    pub fn set_width(&mut self, width: f64) {
        self.options.width = width;
    }

    /// Set stroke opacity, clamped to `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) {
        self.options.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Toggle the eraser.
    ///
    /// Erasing paints directly on the permanent surface with a
    /// destination-clearing composite mode; its effect cannot be previewed
    /// and discarded, so the overlay is bypassed even when double buffering.
    pub fn enable_eraser(&mut self, enabled: bool) {
        self.eraser = enabled;
    }

    /// Enable or disable input capture. While disabled, `start_drawing` and
    /// `make_drawing` are no-ops; `stop_drawing` still works so a host can
    /// always force-terminate an in-progress stroke.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.disabled = !enabled;
    }

    /// Whether the in-progress stroke goes through the overlay.
    fn buffering_stroke(&self) -> bool {
        self.options.double_buffering && !self.eraser
    }

    /// The surface targeted by in-progress paints: the overlay while double
    /// buffering a paint stroke, the permanent surface otherwise.
    fn active_surface(&mut self) -> &mut dyn Surface {
        if self.options.double_buffering && !self.eraser {
            if let Some(overlay) = self.overlay.as_deref_mut() {
                return overlay;
            }
        }
        self.surface.as_mut()
    }

    /// Begin capturing a stroke at `point`.
    ///
    /// Ignored while already drawing (the anchor set by the first start
    /// stands) and while disabled.
    pub fn start_drawing(&mut self, point: Point) {
        if self.drawing || self.disabled {
            return;
        }

        self.drawing = true;
        self.last_point = point;
        self.points.clear();

        // Open the style scope that stays live for the whole capture; the
        // matching restore happens in stop_drawing.
        let style = self.drawing_options();
        let surface = self.active_surface();
        surface.save();
        renderer::apply_style(surface, &style);

        if self.buffering_stroke() {
            self.points.push(point);
        }

        self.events
            .publish(NOTIFY_START, self.id, vec![EventParam::Point(point)]);
    }

    /// Extend the in-progress stroke to `point`.
    ///
    /// Paints the segment from the previous anchor on the active surface,
    /// then advances the anchor; the painted segment always uses the
    /// pre-update anchor. While double buffering a paint stroke, the whole
    /// accumulated line is re-rendered onto a cleared overlay so the preview
    /// is always one atomic paint of the full stroke.
    pub fn make_drawing(&mut self, point: Point) {
        if !self.drawing || self.disabled {
            return;
        }

        let segment = [self.last_point, point];
        let eraser = self.eraser;
        renderer::stroke_polyline(self.active_surface(), &segment, eraser);

        self.last_point = point;

        if self.buffering_stroke() {
            self.points.push(point);
            self.redraw_buffer();
        }

        self.events
            .publish(NOTIFY_PAINT, self.id, vec![EventParam::Point(point)]);
    }

    /// Re-render the accumulated stroke on a cleared overlay.
    fn redraw_buffer(&mut self) {
        let Some(overlay) = self.overlay.as_deref_mut() else {
            return;
        };
        overlay.clear();
        renderer::stroke_polyline(overlay, &self.points, false);
    }

    /// Finish the in-progress stroke.
    ///
    /// Idempotent: a second stop is a no-op. Not guarded by `disabled`, so
    /// disabling the engine mid-stroke still leaves a way out.
    pub fn stop_drawing(&mut self) {
        if !self.drawing {
            return;
        }

        self.drawing = false;

        // Close the style scope opened in start_drawing.
        self.active_surface().restore();

        if self.buffering_stroke() {
            // Promote the buffered stroke to the permanent surface as one
            // atomic paint, then retire the preview.
            let points = std::mem::take(&mut self.points);
            self.draw_line(&points, true);
            self.clear_overlay();
        }

        let style = self.drawing_options();
        let eraser = self.eraser;
        self.events.publish(
            NOTIFY_STOP,
            self.id,
            vec![EventParam::Style(style), EventParam::Bool(eraser)],
        );
    }

    /// Draw a complete line on the permanent surface, regardless of the
    /// capture state, inside its own style scope. Replay passes
    /// `suppress_notification` so replayed strokes are not re-committed to
    /// history.
    ///
    /// An empty `points` slice is rejected as a no-op: a path needs at least
    /// one anchor.
    pub fn draw_line(&mut self, points: &[Point], suppress_notification: bool) {
        if points.is_empty() {
            return;
        }

        let style = self.drawing_options();
        renderer::paint(self.surface.as_mut(), points, &style, self.eraser);

        if !suppress_notification {
            self.events.publish(
                NOTIFY_LINE_DRAWN,
                self.id,
                vec![EventParam::Points(points.to_vec()), EventParam::Style(style)],
            );
        }
    }

    /// Erase the permanent surface entirely. History is a separate concern
    /// and is untouched.
    pub fn clear(&mut self) {
        self.surface.clear();
    }

    /// Erase the overlay surface, if one is configured.
    pub fn clear_overlay(&mut self) {
        if let Some(overlay) = self.overlay.as_deref_mut() {
            overlay.clear();
        }
    }

    /// Register an addon: the engine keeps it alive and hands it a handle to
    /// itself. An associated function because the addon stores the shared
    /// handle, not a plain borrow.
    pub fn register_addon(this: &SketchRef, addon: Rc<RefCell<dyn Addon>>) {
        addon.borrow_mut().attach_sketch(this);
        this.borrow_mut().addons.push(addon);
    }

    /// Number of registered addons.
    pub fn addon_count(&self) -> usize {
        self.addons.len()
    }
}
