//! Editor configuration.
//!
//! Every field has a default, so a partial JSON object (or `{}`) is a
//! valid configuration.

use crate::labels::Locale;
use crate::units::UnitSystem;
use serde::{Deserialize, Serialize};

/// Reading direction of the UI language. Right-to-left mirrors lateral
/// product offsets inside fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadingDirection {
    #[default]
    Ltr,
    Rtl,
}

impl ReadingDirection {
    /// Arabic is the only right-to-left language the UI ships.
    pub fn for_language(lang: &str) -> Self {
        if lang == "ar" || lang.starts_with("ar-") {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }

    pub fn is_rtl(self) -> bool {
        self == Self::Rtl
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Grid spacing in plan units.
    pub grid_size: f32,
    pub snap_to_grid: bool,
    /// Rotation snap increment in degrees.
    pub rotation_step: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
    pub unit: UnitSystem,
    pub locale: Locale,
    pub reading_direction: ReadingDirection,
    /// Door-to-wall edge gap tolerance.
    pub door_tolerance: f32,
    /// Resize floor for width and height.
    pub min_extent: f32,
    /// Margin around the plan bounding box in exports.
    pub export_margin: f32,
    /// Maximum legend rows in document exports.
    pub legend_limit: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            snap_to_grid: true,
            rotation_step: 15.0,
            min_zoom: 0.5,
            max_zoom: 3.0,
            zoom_step: 0.1,
            unit: UnitSystem::Centimeters,
            locale: Locale::Fr,
            reading_direction: ReadingDirection::Ltr,
            door_tolerance: 5.0,
            min_extent: 10.0,
            export_margin: 50.0,
            legend_limit: 15,
        }
    }
}

impl EditorConfig {
    /// Parse a (possibly partial) JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp a zoom factor into `[min_zoom, max_zoom]`.
    pub fn clamp_zoom(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn partial_override() {
        let cfg = EditorConfig::from_json(r#"{"gridSize": 50, "unit": "meters"}"#).unwrap();
        assert_eq!(cfg.grid_size, 50.0);
        assert_eq!(cfg.unit, UnitSystem::Meters);
        assert!(cfg.snap_to_grid);
    }

    #[test]
    fn arabic_is_rtl() {
        assert_eq!(ReadingDirection::for_language("ar"), ReadingDirection::Rtl);
        assert_eq!(ReadingDirection::for_language("fr"), ReadingDirection::Ltr);
    }

    #[test]
    fn zoom_is_clamped() {
        let cfg = EditorConfig::default();
        assert_eq!(cfg.clamp_zoom(5.0), 3.0);
        assert_eq!(cfg.clamp_zoom(0.1), 0.5);
    }
}
