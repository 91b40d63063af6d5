//! SketchKit Raster
//!
//! A deterministic CPU implementation of the engine's surface contract.
//! Serves as the reference backend and as the vehicle for pixel-exact tests
//! in hosts without a browser canvas or GPU.

mod raster;

pub use raster::{RasterSurface, SharedSurface};
