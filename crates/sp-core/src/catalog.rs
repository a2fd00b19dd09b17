//! Per-type defaults used when a tool drops a new element on the plan.
//!
//! Sizes are plan units (1 unit = 1 cm) as `width × height × depth`, where
//! depth is the vertical extent. Display names are never stored here; see
//! [`crate::labels`].

use crate::model::{Color, ElementType};

/// Default footprint and vertical extent for a freshly placed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultSize {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

const fn size(width: f32, height: f32, depth: f32) -> DefaultSize {
    DefaultSize {
        width,
        height,
        depth,
    }
}

/// Default size when the tool places `ty`.
pub fn default_size(ty: ElementType) -> DefaultSize {
    match ty {
        ElementType::Wall => size(200.0, 10.0, 100.0),
        ElementType::Door => size(80.0, 10.0, 10.0),
        ElementType::Window => size(100.0, 10.0, 10.0),
        ElementType::Shelf | ElementType::Display => size(120.0, 40.0, 60.0),
        ElementType::Rack => size(80.0, 80.0, 40.0),
        ElementType::Table => size(100.0, 100.0, 30.0),
        ElementType::Fridge => size(80.0, 60.0, 80.0),
        ElementType::DairyFridge => size(150.0, 60.0, 100.0),
        ElementType::Planogram => size(150.0, 40.0, 80.0),
        ElementType::Gondola => size(200.0, 60.0, 100.0),
        ElementType::Line => size(100.0, 2.0, 2.0),
        ElementType::Rectangle => size(80.0, 60.0, 2.0),
        ElementType::Circle => size(60.0, 60.0, 2.0),
        ElementType::Chair => size(40.0, 40.0, 40.0),
        ElementType::Sofa => size(120.0, 60.0, 40.0),
        ElementType::Bed => size(140.0, 200.0, 40.0),
        ElementType::Plant => size(40.0, 40.0, 80.0),
        ElementType::Counter => size(150.0, 60.0, 40.0),
        ElementType::Cashier => size(100.0, 80.0, 60.0),
        ElementType::Mannequin => size(40.0, 40.0, 180.0),
        ElementType::Cube => size(120.0, 120.0, 120.0),
    }
}

/// Flat fill color used by the 2D plan and exports.
pub fn element_color(ty: ElementType) -> Color {
    let hex = match ty {
        ElementType::Wall => "#555555",
        ElementType::Door => "#8B4513",
        ElementType::Window => "#87CEEB",
        ElementType::Shelf => "#A0522D",
        ElementType::Rack => "#708090",
        ElementType::Display => "#4682B4",
        ElementType::Table => "#CD853F",
        ElementType::Fridge => "#B0C4DE",
        ElementType::DairyFridge => "#000000",
        ElementType::Line => "#333333",
        ElementType::Rectangle => "#5D8AA8",
        ElementType::Circle => "#6495ED",
        ElementType::Chair => "#8B8970",
        ElementType::Sofa => "#9370DB",
        ElementType::Bed => "#8B008B",
        ElementType::Plant => "#228B22",
        ElementType::Counter => "#D2691E",
        ElementType::Cashier => "#FF7F50",
        ElementType::Mannequin => "#E6E6FA",
        ElementType::Gondola => "#20B2AA",
        ElementType::Planogram | ElementType::Cube => "#CCCCCC",
    };
    Color::from_hex(hex).unwrap_or(Color::rgba(0.8, 0.8, 0.8, 1.0))
}

/// Default window inset from the wall top and bottom:
/// 20% of the wall's vertical extent, capped at 20 units.
pub fn default_window_inset(wall_depth: f32) -> f32 {
    (wall_depth * 0.2).min(20.0)
}
