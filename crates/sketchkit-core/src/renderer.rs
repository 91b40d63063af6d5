//! Stateless stroke painting.
//!
//! Everything here takes the target surface as a parameter; style and
//! compositing changes are scoped with [`SurfaceGuard`] so nothing leaks
//! past a call.

use kurbo::Point;

use crate::stroke::{Rgba, StrokeStyle};
use crate::surface::{CompositeMode, Surface, SurfaceGuard};

/// Apply `style` to the surface's current state scope.
pub(crate) fn apply_style(surface: &mut dyn Surface, style: &StrokeStyle) {
    surface.set_stroke_color(style.color);
    surface.set_line_width(style.width);
    surface.set_alpha(style.alpha);
}

/// Stroke a connected polyline through `points` using the surface's current
/// style scope.
///
/// When `eraser` is set, color and alpha are overridden to full-strength
/// opaque and the composite mode switches to
/// [`CompositeMode::DestinationOut`] inside a nested scope that is restored
/// before returning; the caller's style scope is never disturbed, so erasing
/// one stroke cannot corrupt the color or alpha of the next paint.
///
/// A single point degenerates to a round dot. An empty sequence is a no-op.
pub fn stroke_polyline(surface: &mut dyn Surface, points: &[Point], eraser: bool) {
    if points.is_empty() {
        return;
    }

    if eraser {
        let mut scope = SurfaceGuard::save(surface);
        let surface = scope.surface();
        surface.set_stroke_color(Rgba::BLACK);
        surface.set_alpha(1.0);
        surface.set_composite_mode(CompositeMode::DestinationOut);
        trace_polyline(surface, points);
    } else {
        trace_polyline(surface, points);
    }
}

/// Paint `points` as one line with `style`, inside its own save/restore
/// scope.
pub fn paint(surface: &mut dyn Surface, points: &[Point], style: &StrokeStyle, eraser: bool) {
    if points.is_empty() {
        return;
    }

    let mut scope = SurfaceGuard::save(surface);
    apply_style(scope.surface(), style);
    stroke_polyline(scope.surface(), points, eraser);
}

fn trace_polyline(surface: &mut dyn Surface, points: &[Point]) {
    surface.begin_path();
    surface.move_to(points[0]);
    if points.len() == 1 {
        // A dot: stroke a zero-length segment at the single anchor.
        surface.line_to(points[0]);
    }
    for point in &points[1..] {
        surface.line_to(*point);
    }
    surface.stroke_path();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Op, RecordingSurface};

    #[test]
    fn test_paint_scopes_style_application() {
        let mut surface = RecordingSurface::new();
        let style = StrokeStyle::default();
        paint(
            &mut surface,
            &[Point::new(0.0, 0.0), Point::new(4.0, 0.0)],
            &style,
            false,
        );

        let ops = surface.ops();
        assert_eq!(ops.first(), Some(&Op::Save));
        assert_eq!(ops.last(), Some(&Op::Restore));
        assert_eq!(surface.stroke_calls(), 1);
        assert!(surface.balanced());
    }

    #[test]
    fn test_eraser_uses_nested_scope() {
        let mut surface = RecordingSurface::new();
        let style = StrokeStyle {
            alpha: 0.3,
            ..StrokeStyle::default()
        };
        paint(
            &mut surface,
            &[Point::new(0.0, 0.0), Point::new(4.0, 0.0)],
            &style,
            true,
        );

        // Outer style scope, then the eraser scope with its overrides.
        let ops = surface.ops();
        let saves = ops.iter().filter(|op| **op == Op::Save).count();
        assert_eq!(saves, 2);
        assert!(ops.contains(&Op::Composite(CompositeMode::DestinationOut)));
        assert!(ops.contains(&Op::Alpha(1.0)));
        assert!(surface.balanced());
    }

    #[test]
    fn test_single_point_paints_dot() {
        let mut surface = RecordingSurface::new();
        let anchor = Point::new(7.0, 7.0);
        stroke_polyline(&mut surface, &[anchor], false);

        assert_eq!(
            surface.ops(),
            vec![
                Op::BeginPath,
                Op::MoveTo(anchor),
                Op::LineTo(anchor),
                Op::StrokePath,
            ]
        );
    }

    #[test]
    fn test_empty_points_is_noop() {
        let mut surface = RecordingSurface::new();
        stroke_polyline(&mut surface, &[], false);
        paint(&mut surface, &[], &StrokeStyle::default(), false);
        assert!(surface.ops().is_empty());
    }
}
