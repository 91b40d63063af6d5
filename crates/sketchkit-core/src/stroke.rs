//! Stroke data model: colors, styles and committed lines.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SketchError;

/// An 8-bit RGBA color value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `#rgb`, `#rrggbb` or `#rrggbbaa` hex color.
    pub fn from_hex(hex: &str) -> Result<Self, SketchError> {
        let invalid = || SketchError::InvalidColor(hex.to_string());
        let digits = hex.strip_prefix('#').ok_or_else(invalid)?;

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, c) in channels.iter_mut().zip(digits.chars()) {
                    let digit = c.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = digit * 17;
                }
                Ok(Self::new(channels[0], channels[1], channels[2], 255))
            }
            6 | 8 => {
                let mut channels = [0u8; 4];
                channels[3] = 255;
                for (slot, pair) in channels.iter_mut().zip(digits.as_bytes().chunks(2)) {
                    let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
                    *slot = u8::from_str_radix(pair, 16).map_err(|_| invalid())?;
                }
                Ok(Self::new(channels[0], channels[1], channels[2], channels[3]))
            }
            _ => Err(invalid()),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

/// The style attached to a stroke: color, width and opacity.
///
/// A value type: it is copied onto a [`Stroke`] at commit time and copied
/// again for replay, never shared between lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Rgba,
    /// Line width in surface pixels.
    pub width: f64,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Rgba::BLACK,
            width: 5.0,
            alpha: 1.0,
        }
    }
}

/// A committed line: an ordered point sequence plus the style it was drawn
/// with.
///
/// Strokes are created at commit time with at least one point and never
/// mutated afterwards; the history store moves them between its visible and
/// stashed sequences, nothing else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    id: Uuid,
    points: Vec<Point>,
    options: StrokeStyle,
}

impl Stroke {
    pub fn new(points: Vec<Point>, options: StrokeStyle) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            options,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn options(&self) -> &StrokeStyle {
        &self.options
    }
}
