//! Cursor geometry: positions and the display rectangle.
//!
//! Cursor coordinates are floating point because relative motion from a
//! high-resolution mouse arrives in sub-pixel deltas.  The display rectangle is
//! integral, matching how outputs are described by a compositor.

use serde::{Deserialize, Serialize};

/// A 2-D point in display coordinates.
///
/// `Position` is an immutable value type: every operation returns a new value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this position moved by `(dx, dy)`.
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// `false` if either coordinate is NaN or infinite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Returns this position clamped component-wise into
    /// `[min_x, max_x] × [min_y, max_y]`.
    ///
    /// When a maximum is below its minimum (a zero-sized rectangle) the minimum
    /// wins, so the result is always a finite, well-defined point.
    pub fn clamp(self, min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(min_x.max(max_x.min(self.x)), min_y.max(max_y.min(self.y)))
    }
}

/// The axis-aligned rectangle cursors are confined to.
///
/// Containment uses half-open intervals: `[x, x + width)` × `[y, y + height)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    /// Output name, e.g. `"default"` or `"HDMI-A-1"`.
    pub name: String,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 1920,
            height: 1080,
            name: "default".to_string(),
        }
    }
}

impl DisplayBounds {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    /// Convenience constructor for a display anchored at the origin.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Returns `true` if `pos` lies inside the half-open rectangle.
    pub fn contains(&self, pos: Position) -> bool {
        let (min_x, min_y) = (f64::from(self.x), f64::from(self.y));
        let max_x = min_x + f64::from(self.width);
        let max_y = min_y + f64::from(self.height);
        pos.x >= min_x && pos.x < max_x && pos.y >= min_y && pos.y < max_y
    }

    /// Clamps `pos` to the last addressable pixel of the display.
    ///
    /// The upper limit is `x + width - 1` (resp. `y + height - 1`) so a cursor
    /// never reports a position on the exclusive edge.
    pub fn clamp(&self, pos: Position) -> Position {
        let (min_x, min_y) = (f64::from(self.x), f64::from(self.y));
        pos.clamp(
            min_x,
            min_y,
            min_x + f64::from(self.width) - 1.0,
            min_y + f64::from(self.height) - 1.0,
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
