//! Drawing surface contract.
//!
//! The engine is agnostic of where pixels live: a browser canvas, a GPU
//! texture, or the CPU raster in `sketchkit-raster`. It only requires the
//! canvas-style contract below: scoped paint state, polyline path
//! construction, a switchable composite mode and a whole-surface clear.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::stroke::Rgba;

/// Pixel-compose rule applied by [`Surface::stroke_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CompositeMode {
    /// Normal painting: source blended over destination.
    #[default]
    SourceOver,
    /// Erasing: destination cleared where the source is drawn.
    DestinationOut,
}

/// A canvas-like drawing target.
///
/// `save`/`restore` manage a stack of paint state (color, width, alpha,
/// composite mode); `restore` with no matching `save` is a no-op. Path
/// construction accumulates a polyline which `stroke_path` renders with
/// round caps and round joins in one atomic operation: opacity is applied
/// once per `stroke_path` call, never per segment.
pub trait Surface {
    fn save(&mut self);
    fn restore(&mut self);

    fn set_stroke_color(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f64);
    fn set_alpha(&mut self, alpha: f64);
    fn set_composite_mode(&mut self, mode: CompositeMode);

    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    /// Render the accumulated path.
    fn stroke_path(&mut self);

    /// Erase the whole surface. Paint state and the state stack are
    /// unaffected.
    fn clear(&mut self);
}

/// RAII save/restore pairing.
///
/// Holds the surface for the lifetime of one paint operation; the `restore`
/// runs on drop, so no early return can leave scoped state behind.
pub struct SurfaceGuard<'a> {
    surface: &'a mut dyn Surface,
}

impl<'a> SurfaceGuard<'a> {
    /// Push a state scope on `surface`.
    pub fn save(surface: &'a mut dyn Surface) -> Self {
        surface.save();
        Self { surface }
    }

    /// The guarded surface.
    pub fn surface(&mut self) -> &mut (dyn Surface + 'a) {
        self.surface
    }
}

impl Drop for SurfaceGuard<'_> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}
