//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the sketch engine.
///
/// Invalid-state calls (starting while a stroke is captured, stopping while
/// idle, undoing an empty history) are deliberately *not* errors: hosts
/// produce them routinely from overlapping mouse/touch sequences, so they are
/// defined as silent no-ops. Only configuration mistakes reach this type.
#[derive(Debug, Error)]
pub enum SketchError {
    /// Double buffering was requested without an overlay surface.
    #[error("double buffering requires an overlay surface")]
    MissingOverlay,

    /// A color string could not be parsed.
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// A pointer resolver was configured with a degenerate scale factor.
    #[error("surface scale factors must be positive, got {0}")]
    NonPositiveScale(f64),
}
