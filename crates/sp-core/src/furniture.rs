//! Merchandising fixture records and their product assignments.
//!
//! These come from the planogram layer already resolved; the editor reads
//! them but never owns or mutates them. Dimensions are meters.

use crate::model::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnitureKind {
    ClothingRack,
    WallDisplay,
    AccessoryDisplay,
    ModularCube,
    Gondola,
    Table,
    Planogram,
    Refrigerator,
    RefrigeratedShowcase,
    ClothingDisplay,
    ClothingWall,
    ShelvesDisplay,
}

impl FurnitureKind {
    /// Fixtures whose products hang from rails rather than stand on shelves.
    pub fn hangs_products(self) -> bool {
        matches!(
            self,
            Self::ClothingRack | Self::WallDisplay | Self::ClothingWall | Self::ClothingDisplay
        )
    }

    pub fn is_refrigerated(self) -> bool {
        matches!(self, Self::Refrigerator | Self::RefrigeratedShowcase)
    }
}

/// Per-face column counts for four-sided fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShelvesConfig {
    pub left_right_columns: u32,
    pub front_back_columns: u32,
}

impl Default for ShelvesConfig {
    fn default() -> Self {
        Self {
            left_right_columns: 1,
            front_back_columns: 3,
        }
    }
}

/// A fixture as the planogram layer describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FurnitureRecord {
    pub kind: FurnitureKind,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    /// Shelf (vertical division) count.
    pub sections: u32,
    /// Lateral division count.
    pub slots: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub z: f32,
    #[serde(default)]
    pub rotation: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shelves_config: Option<ShelvesConfig>,
}

impl FurnitureRecord {
    /// Sections and slots clamped to at least one, so division is safe.
    pub fn grid(&self) -> (u32, u32) {
        (self.sections.max(1), self.slots.max(1))
    }

    pub fn section_height(&self) -> f32 {
        self.height / self.grid().0 as f32
    }

    pub fn slot_width(&self) -> f32 {
        self.width / self.grid().1 as f32
    }

    pub fn shelves_config(&self) -> ShelvesConfig {
        self.shelves_config.unwrap_or_default()
    }
}

/// Face of a four-sided fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Front,
    Back,
    Right,
}

/// A product assigned to a section/slot of a fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayItem {
    pub product_id: String,
    pub section: u32,
    pub position: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
}

impl DisplayItem {
    pub fn quantity(&self) -> u32 {
        self.quantity.unwrap_or(1).max(1)
    }
}

/// Resolved product data the sub-synthesizer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInfo {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Texture reference; `None` means render a flat primitive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Group display items by section, keeping per-section input order.
pub fn group_by_section(items: &[DisplayItem]) -> BTreeMap<u32, Vec<&DisplayItem>> {
    let mut grouped: BTreeMap<u32, Vec<&DisplayItem>> = BTreeMap::new();
    for item in items {
        grouped.entry(item.section).or_default().push(item);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(section: u32, position: u32) -> DisplayItem {
        DisplayItem {
            product_id: format!("p{section}{position}"),
            section,
            position,
            quantity: None,
            side: None,
        }
    }

    #[test]
    fn record_parses_kebab_kind_and_defaults() {
        let rec: FurnitureRecord = serde_json::from_str(
            r#"{"kind":"shelves-display","width":2,"height":1.8,"depth":1,"sections":4,"slots":8}"#,
        )
        .unwrap();
        assert_eq!(rec.kind, FurnitureKind::ShelvesDisplay);
        assert_eq!(rec.shelves_config(), ShelvesConfig::default());
        assert_eq!(rec.slot_width(), 0.25);
    }

    #[test]
    fn zero_grid_is_clamped() {
        let rec = FurnitureRecord {
            kind: FurnitureKind::Table,
            width: 1.0,
            height: 1.0,
            depth: 1.0,
            sections: 0,
            slots: 0,
            color: None,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: 0.0,
            shelves_config: None,
        };
        assert_eq!(rec.grid(), (1, 1));
        assert_eq!(rec.section_height(), 1.0);
    }

    #[test]
    fn grouping_keeps_order_within_section() {
        let items = vec![item(1, 3), item(0, 0), item(1, 1)];
        let grouped = group_by_section(&items);
        let positions: Vec<u32> = grouped[&1].iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![3, 1]);
        assert_eq!(grouped.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn quantity_defaults_to_one() {
        let mut it = item(0, 0);
        assert_eq!(it.quantity(), 1);
        it.quantity = Some(0);
        assert_eq!(it.quantity(), 1);
    }
}
