//! Pointer-input collaborator contract.
//!
//! The engine consumes surface-local points; translating a raw input event
//! (page coordinates over a surface that layout may have scaled) is the
//! host's job. [`ResolvePointer`] is that contract and
//! [`PlacementResolver`] the reference implementation: subtract the surface
//! offset, divide by the effective scale, round up to the next whole pixel.

use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::error::SketchError;

/// A raw pointer sample in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub page_x: f64,
    pub page_y: f64,
}

impl PointerSample {
    pub fn new(page_x: f64, page_y: f64) -> Self {
        Self { page_x, page_y }
    }
}

/// Where the drawing surface sits in the page and how it is scaled.
///
/// `scale_x`/`scale_y` are the effective factors between the surface's pixel
/// grid and its rendered size (rendered width divided by pixel width); a
/// surface displayed at half size has scale `0.5` and raw offsets must be
/// divided by it to land on the right pixel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfacePlacement {
    /// Page offset of the surface's left edge.
    pub left: f64,
    /// Page offset of the surface's top edge.
    pub top: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for SurfacePlacement {
    fn default() -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

/// Resolves raw input into surface-local coordinates.
pub trait ResolvePointer {
    fn resolve(&self, sample: PointerSample) -> Point;
}

/// Offset-and-scale resolver for a statically placed surface.
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver {
    placement: SurfacePlacement,
}

impl PlacementResolver {
    /// Build a resolver. Scale factors must be positive: a zero or negative
    /// scale would resolve every sample to infinity or a mirrored surface.
    pub fn new(placement: SurfacePlacement) -> Result<Self, SketchError> {
        if placement.scale_x <= 0.0 || placement.scale_y <= 0.0 {
            return Err(SketchError::NonPositiveScale(
                placement.scale_x.min(placement.scale_y),
            ));
        }
        Ok(Self { placement })
    }

    pub fn placement(&self) -> SurfacePlacement {
        self.placement
    }
}

impl ResolvePointer for PlacementResolver {
    fn resolve(&self, sample: PointerSample) -> Point {
        let placement = &self.placement;
        Point::new(
            ((sample.page_x - placement.left) / placement.scale_x).ceil(),
            ((sample.page_y - placement.top) / placement.scale_y).ceil(),
        )
    }
}
