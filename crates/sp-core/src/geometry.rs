//! Plan-space geometry: bounds, snapping, angles, resize handles.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in plan space (top-left origin, y grows down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Point-in-rect test (inclusive edges).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.right() && py >= self.y && py <= self.bottom()
    }

    /// True if `other` lies entirely inside `self`, edges included.
    pub fn contains_bounds(&self, other: &Bounds) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Overlap test with a strict interior (touching edges do not count).
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Smallest bounds covering both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Bounds {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Grow outward by `margin` on every side.
    pub fn inflate(&self, margin: f32) -> Bounds {
        Bounds {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + margin * 2.0,
            height: self.height + margin * 2.0,
        }
    }
}

/// Round `value` to the nearest multiple of `grid`.
/// A non-positive grid disables snapping.
pub fn snap(value: f32, grid: f32) -> f32 {
    if grid <= 0.0 {
        return value;
    }
    (value / grid).round() * grid
}

/// Wrap any angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f32) -> f32 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Snap an angle to the nearest multiple of `step`, then normalize.
pub fn snap_angle(deg: f32, step: f32) -> f32 {
    normalize_degrees(snap(deg, step))
}

/// Angle in degrees of the vector from `(cx, cy)` to `(px, py)`,
/// measured clockwise from +x in y-down screen space.
pub fn pointer_angle(cx: f32, cy: f32, px: f32, py: f32) -> f32 {
    (py - cy).atan2(px - cx).to_degrees()
}

/// Which edges a resize handle moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    /// Parse a handle name such as `"top-left"` or `"right"`.
    pub fn parse(name: &str) -> Option<Self> {
        let top = name.contains("top");
        let bottom = name.contains("bottom");
        let left = name.contains("left");
        let right = name.contains("right");
        match (top, bottom, left, right) {
            (true, false, false, false) => Some(Self::Top),
            (false, true, false, false) => Some(Self::Bottom),
            (false, false, true, false) => Some(Self::Left),
            (false, false, false, true) => Some(Self::Right),
            (true, false, true, false) => Some(Self::TopLeft),
            (true, false, false, true) => Some(Self::TopRight),
            (false, true, true, false) => Some(Self::BottomLeft),
            (false, true, false, true) => Some(Self::BottomRight),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
        }
    }

    pub fn moves_left(self) -> bool {
        matches!(self, Self::Left | Self::TopLeft | Self::BottomLeft)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Self::Right | Self::TopRight | Self::BottomRight)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Self::Top | Self::TopLeft | Self::TopRight)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Self::Bottom | Self::BottomLeft | Self::BottomRight)
    }

    /// Anchor point of this handle on `bounds`, in plan space.
    pub fn anchor(self, bounds: &Bounds) -> (f32, f32) {
        let (cx, cy) = bounds.center();
        let x = if self.moves_left() {
            bounds.x
        } else if self.moves_right() {
            bounds.right()
        } else {
            cx
        };
        let y = if self.moves_top() {
            bounds.y
        } else if self.moves_bottom() {
            bounds.bottom()
        } else {
            cy
        };
        (x, y)
    }
}
