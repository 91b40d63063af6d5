//! Deterministic CPU raster surface.
//!
//! Implements the engine's [`Surface`] contract over an RGBA8 pixel buffer
//! with the canvas semantics the engine relies on: a paint-state stack under
//! `save`/`restore`, destination-out erasing, and per-`stroke_path` atomic
//! opacity, the part that makes double buffering worthwhile. The whole
//! accumulated path is rasterized into one coverage mask and composited
//! once, so a self-overlapping path never blends with itself, while two
//! separate `stroke_path` calls over the same pixels do.
//!
//! Coverage is binary (a pixel center is within half the line width of a
//! segment or it is not): no antialiasing, so identical operation sequences
//! produce identical buffers and tests can compare pixels exactly.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use kurbo::Point;
use sketchkit_core::{CompositeMode, Rgba, Surface};

/// Paint state, one frame per `save`.
#[derive(Debug, Clone)]
struct PaintState {
    color: Rgba,
    line_width: f64,
    alpha: f64,
    composite: CompositeMode,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            line_width: 1.0,
            alpha: 1.0,
            composite: CompositeMode::SourceOver,
        }
    }
}

/// A software RGBA8 surface.
#[derive(Debug)]
pub struct RasterSurface {
    width: u32,
    height: u32,
    /// Non-premultiplied RGBA, row-major.
    pixels: Vec<Rgba>,
    state: PaintState,
    stack: Vec<PaintState>,
    /// Current path as subpaths of connected points.
    path: Vec<Vec<Point>>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
            state: PaintState::default(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at `(x, y)`; transparent outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        if x >= self.width || y >= self.height {
            return Rgba::TRANSPARENT;
        }
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|pixel| pixel.a == 0)
    }

    /// A copy of the pixel buffer, for snapshot comparisons.
    pub fn snapshot(&self) -> Vec<Rgba> {
        self.pixels.clone()
    }

    /// Rasterize the current path into a coverage mask: one flag per pixel,
    /// set when the pixel center lies within half the line width of any
    /// segment. A zero-length segment covers a round dot.
    fn coverage(&self) -> Vec<bool> {
        let mut mask = vec![false; self.pixels.len()];
        let radius = self.state.line_width / 2.0;
        for subpath in &self.path {
            if subpath.len() < 2 {
                // A move with no line draws nothing.
                continue;
            }
            for pair in subpath.windows(2) {
                self.cover_segment(&mut mask, pair[0], pair[1], radius);
            }
        }
        mask
    }

    fn cover_segment(&self, mask: &mut [bool], a: Point, b: Point, radius: f64) {
        let min_x = (a.x.min(b.x) - radius).floor().max(0.0) as u32;
        let max_x = ((a.x.max(b.x) + radius).ceil().max(0.0) as u32).min(self.width);
        let min_y = (a.y.min(b.y) - radius).floor().max(0.0) as u32;
        let max_y = ((a.y.max(b.y) + radius).ceil().max(0.0) as u32).min(self.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let center = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                if distance_to_segment(center, a, b) <= radius {
                    mask[y as usize * self.width as usize + x as usize] = true;
                }
            }
        }
    }

    /// Composite the mask over the pixel buffer in one pass, applying the
    /// current alpha exactly once per covered pixel.
    fn composite_mask(&mut self, mask: &[bool]) {
        let source = self.state.color;
        let source_alpha = (self.state.alpha * f64::from(source.a) / 255.0).clamp(0.0, 1.0);

        match self.state.composite {
            CompositeMode::SourceOver => {
                for (pixel, covered) in self.pixels.iter_mut().zip(mask) {
                    if *covered {
                        *pixel = blend_source_over(*pixel, source, source_alpha);
                    }
                }
            }
            CompositeMode::DestinationOut => {
                for (pixel, covered) in self.pixels.iter_mut().zip(mask) {
                    if *covered {
                        *pixel = blend_destination_out(*pixel, source_alpha);
                    }
                }
            }
        }
    }
}

impl Surface for RasterSurface {
    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.state.color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width.max(0.0);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.state.composite = mode;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Point) {
        self.path.push(vec![point]);
    }

    fn line_to(&mut self, point: Point) {
        match self.path.last_mut() {
            Some(subpath) => subpath.push(point),
            // A line with no preceding move starts its own subpath.
            None => self.path.push(vec![point]),
        }
    }

    fn stroke_path(&mut self) {
        let mask = self.coverage();
        self.composite_mask(&mask);
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }
}

/// Distance from `point` to the closest point on segment `[start, end]`.
fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let length_sq = dx * dx + dy * dy;

    if length_sq < f64::EPSILON {
        let px = point.x - start.x;
        let py = point.y - start.y;
        return (px * px + py * py).sqrt();
    }

    let t = (((point.x - start.x) * dx + (point.y - start.y) * dy) / length_sq).clamp(0.0, 1.0);
    let projection = Point::new(start.x + t * dx, start.y + t * dy);
    ((point.x - projection.x).powi(2) + (point.y - projection.y).powi(2)).sqrt()
}

fn blend_source_over(dst: Rgba, src: Rgba, src_alpha: f64) -> Rgba {
    let dst_alpha = f64::from(dst.a) / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);
    if out_alpha <= 0.0 {
        return Rgba::TRANSPARENT;
    }

    let channel = |s: u8, d: u8| {
        let s = f64::from(s) / 255.0;
        let d = f64::from(d) / 255.0;
        let blended = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (blended * 255.0).round() as u8
    };

    Rgba::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_alpha * 255.0).round() as u8,
    )
}

fn blend_destination_out(dst: Rgba, src_alpha: f64) -> Rgba {
    let dst_alpha = f64::from(dst.a) / 255.0;
    let out_alpha = dst_alpha * (1.0 - src_alpha);
    Rgba::new(dst.r, dst.g, dst.b, (out_alpha * 255.0).round() as u8)
}

/// Cheaply cloneable handle sharing one [`RasterSurface`].
///
/// The engine takes ownership of its surfaces as boxed trait objects; hosts
/// and tests keep a second handle to inspect pixels afterwards.
#[derive(Debug, Clone)]
pub struct SharedSurface {
    inner: Rc<RefCell<RasterSurface>>,
}

impl SharedSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: Rc::new(RefCell::new(RasterSurface::new(width, height))),
        }
    }

    pub fn width(&self) -> u32 {
        self.inner.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.inner.borrow().height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.inner.borrow().pixel(x, y)
    }

    pub fn is_blank(&self) -> bool {
        self.inner.borrow().is_blank()
    }

    pub fn snapshot(&self) -> Vec<Rgba> {
        self.inner.borrow().snapshot()
    }

    /// Borrow the underlying surface directly.
    pub fn raster(&self) -> Ref<'_, RasterSurface> {
        self.inner.borrow()
    }
}

impl Surface for SharedSurface {
    fn save(&mut self) {
        self.inner.borrow_mut().save();
    }

    fn restore(&mut self) {
        self.inner.borrow_mut().restore();
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.inner.borrow_mut().set_stroke_color(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.inner.borrow_mut().set_line_width(width);
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.inner.borrow_mut().set_alpha(alpha);
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.inner.borrow_mut().set_composite_mode(mode);
    }

    fn begin_path(&mut self) {
        self.inner.borrow_mut().begin_path();
    }

    fn move_to(&mut self, point: Point) {
        self.inner.borrow_mut().move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        self.inner.borrow_mut().line_to(point);
    }

    fn stroke_path(&mut self) {
        self.inner.borrow_mut().stroke_path();
    }

    fn clear(&mut self) {
        self.inner.borrow_mut().clear();
    }
}
