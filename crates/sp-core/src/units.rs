//! Plan-space length conversions.
//!
//! Plan coordinates are pixel-equivalent: 100 px = 1 m, 1 px = 1 cm.
//! Everything here is pure and total over finite inputs.

use serde::{Deserialize, Serialize};

/// Plan pixels per meter.
pub const PIXELS_PER_METER: f32 = 100.0;
/// Plan pixels per centimeter.
pub const PIXELS_PER_CM: f32 = 1.0;

/// Display unit for dimension strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Meters,
    #[default]
    Centimeters,
}

impl UnitSystem {
    /// Short suffix appended to formatted values.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Meters => "m",
            Self::Centimeters => "cm",
        }
    }

    fn pixels_per_unit(self) -> f32 {
        match self {
            Self::Meters => PIXELS_PER_METER,
            Self::Centimeters => PIXELS_PER_CM,
        }
    }
}

/// Convert a plan-space length to the given unit.
pub fn pixels_to_unit(pixels: f32, unit: UnitSystem) -> f32 {
    pixels / unit.pixels_per_unit()
}

/// Convert a length in the given unit back to plan pixels.
pub fn unit_to_pixels(value: f32, unit: UnitSystem) -> f32 {
    value * unit.pixels_per_unit()
}

/// Render a single plan length, e.g. `"1.20m"` or `"120cm"`.
pub fn format_dimension(pixels: f32, unit: UnitSystem) -> String {
    let value = pixels_to_unit(pixels, unit);
    match unit {
        UnitSystem::Meters => format!("{value:.2}m"),
        UnitSystem::Centimeters => format!("{value:.0}cm"),
    }
}

/// Render a `width × height × depth` triple.
pub fn format_dimensions(width: f32, height: f32, depth: f32, unit: UnitSystem) -> String {
    format!(
        "{} × {} × {}",
        format_dimension(width, unit),
        format_dimension(height, unit),
        format_dimension(depth, unit)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meters_divide_by_hundred() {
        assert_eq!(pixels_to_unit(250.0, UnitSystem::Meters), 2.5);
        assert_eq!(unit_to_pixels(2.5, UnitSystem::Meters), 250.0);
    }

    #[test]
    fn centimeters_are_identity() {
        assert_eq!(pixels_to_unit(37.0, UnitSystem::Centimeters), 37.0);
    }

    #[test]
    fn format_uses_unit_precision() {
        assert_eq!(format_dimension(120.0, UnitSystem::Meters), "1.20m");
        assert_eq!(format_dimension(120.4, UnitSystem::Centimeters), "120cm");
    }

    #[test]
    fn format_triple() {
        assert_eq!(
            format_dimensions(200.0, 10.0, 100.0, UnitSystem::Centimeters),
            "200cm × 10cm × 100cm"
        );
    }
}
