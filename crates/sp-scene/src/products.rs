//! Product display sub-synthesizer.
//!
//! Turns one resolved product assignment into parts hung or stood inside a
//! fixture slot. A product without a texture is drawn as a flat colored
//! primitive; that is the normal path for most catalogues.

use crate::part::{Part, PartTree};
use glam::Vec3;
use petgraph::graph::NodeIndex;
use serde::Serialize;
use sp_core::config::ReadingDirection;
use sp_core::furniture::{DisplayItem, FurnitureKind, ProductInfo};
use sp_core::model::Color;

/// How a product is presented, picked from its name and the fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStyle {
    Bottom,
    Accessory,
    Refrigerated,
    Boxed,
    Suit,
    Shirt,
    Folded,
    Hanging,
    Standing,
}

const BOTTOM_WORDS: &[&str] = &["pantalon", "jean", "short", "jupe"];
const ACCESSORY_WORDS: &[&str] = &["ceinture", "cravate", "écharpe"];
const FOOD_WORDS: &[&str] = &["food", "snack", "drink", "beverage"];
const BOX_WORDS: &[&str] = &["box", "package", "pack"];
const SUIT_WORDS: &[&str] = &["costume", "veste", "suit"];
const SHIRT_WORDS: &[&str] = &["chemise", "shirt"];

impl ProductStyle {
    /// First matching rule wins:
    ///
    /// | Style        | Name keywords / fixture                          |
    /// |--------------|--------------------------------------------------|
    /// | bottom       | pantalon, jean, short, jupe                      |
    /// | accessory    | ceinture, cravate, écharpe, accessory fixtures   |
    /// | refrigerated | food, snack, drink, beverage, refrigerated fixtures |
    /// | boxed        | box, package, pack                               |
    /// | suit         | costume, veste, suit                             |
    /// | shirt        | chemise, shirt                                   |
    /// | folded       | modular cubes                                    |
    /// | hanging      | racks and wall fixtures                          |
    /// | standing     | everything else                                  |
    pub fn classify(name: &str, kind: FurnitureKind) -> Self {
        let name = name.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| name.contains(w));

        if has(BOTTOM_WORDS) {
            Self::Bottom
        } else if has(ACCESSORY_WORDS) || kind == FurnitureKind::AccessoryDisplay {
            Self::Accessory
        } else if has(FOOD_WORDS) || kind.is_refrigerated() {
            Self::Refrigerated
        } else if has(BOX_WORDS) {
            Self::Boxed
        } else if has(SUIT_WORDS) {
            Self::Suit
        } else if has(SHIRT_WORDS) {
            Self::Shirt
        } else if kind == FurnitureKind::ModularCube {
            Self::Folded
        } else if kind.hangs_products() {
            Self::Hanging
        } else {
            Self::Standing
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Self::Bottom => "bottom",
            Self::Accessory => "accessory",
            Self::Refrigerated => "refrigerated",
            Self::Boxed => "boxed",
            Self::Suit => "suit",
            Self::Shirt => "shirt",
            Self::Folded => "folded",
            Self::Hanging => "hanging",
            Self::Standing => "standing",
        }
    }

    pub fn fallback_color(self) -> Color {
        match self {
            Self::Refrigerated => Color::from_rgb24(0xCCFFCC),
            Self::Bottom => Color::from_rgb24(0x000033),
            Self::Accessory => Color::from_rgb24(0x663300),
            Self::Folded => Color::from_rgb24(0x000066),
            Self::Shirt => Color::from_rgb24(0xFFFFFF),
            Self::Suit | Self::Boxed | Self::Hanging | Self::Standing => Color::from_rgb24(0x333333),
        }
    }

    /// The product's own color wins, except in refrigerated displays.
    pub fn surface_color(self, own: Option<Color>) -> Color {
        match (self, own) {
            (Self::Refrigerated, _) | (_, None) => self.fallback_color(),
            (_, Some(color)) => color,
        }
    }

    /// Front-to-back thickness of the flat primitive, relative to width.
    fn thickness(self, width: f32) -> f32 {
        match self {
            Self::Bottom | Self::Suit | Self::Shirt | Self::Hanging => 0.02,
            Self::Accessory => 0.05,
            Self::Folded => width * 0.8,
            Self::Refrigerated | Self::Boxed | Self::Standing => width * 0.6,
        }
    }
}

/// Where a product goes inside its fixture, in the fixture's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub offset: Vec3,
    /// Turn about +Y so the product faces out of its side of the fixture.
    pub yaw: f32,
    pub width: f32,
    pub height: f32,
}

impl Slot {
    pub fn new(x: f32, y: f32, z: f32, width: f32, height: f32) -> Self {
        Self {
            offset: Vec3::new(x, y, z),
            yaw: 0.0,
            width,
            height,
        }
    }

    #[must_use]
    pub fn facing(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }
}

/// Most copies one slot shows side by side; larger quantities are drawn
/// at this count.
pub const MAX_COPIES: u32 = 8;

/// Lateral offsets of `quantity` side-by-side copies and the width of each.
pub fn copy_layout(quantity: u32, width: f32) -> (Vec<f32>, f32) {
    let q = quantity.clamp(1, MAX_COPIES);
    if q == 1 {
        return (vec![0.0], width);
    }
    let mid = (q - 1) as f32 / 2.0;
    let offsets = (0..q).map(|i| (i as f32 - mid) * width * 0.8).collect();
    (offsets, width * 0.9)
}

/// The part for one copy of a product.
pub fn product_part(product: &ProductInfo, style: ProductStyle, width: f32, height: f32) -> Part {
    match &product.image {
        Some(image) => Part::plane(style.key(), width, height).textured(image.clone()),
        None => {
            log::trace!("{}: no texture, drawing a flat {}", product.id, style.key());
            Part::cuboid(style.key(), width, height, style.thickness(width))
                .color(style.surface_color(product.color))
        }
    }
}

/// Add one product assignment under `parent`: a group named after the
/// product at the slot, holding one part per copy. Right-to-left layouts
/// mirror every lateral offset.
pub fn place_product(
    tree: &mut PartTree,
    parent: NodeIndex,
    item: &DisplayItem,
    product: &ProductInfo,
    kind: FurnitureKind,
    slot: Slot,
    direction: ReadingDirection,
) -> NodeIndex {
    let style = ProductStyle::classify(&product.name, kind);
    let mirror = if direction.is_rtl() { -1.0 } else { 1.0 };
    let group = tree.add(
        parent,
        Part::group(product.id.clone())
            .rotated_y(slot.yaw)
            .at(mirror * slot.offset.x, slot.offset.y, slot.offset.z),
    );
    if item.quantity() > MAX_COPIES {
        log::debug!("{}: quantity {} drawn as {MAX_COPIES} copies", product.id, item.quantity());
    }
    let (offsets, width) = copy_layout(item.quantity(), slot.width);
    for dx in offsets {
        tree.add(
            group,
            product_part(product, style, width, slot.height).at(mirror * dx, 0.0, 0.0),
        );
    }
    group
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Shape;
    use pretty_assertions::assert_eq;

    fn product(name: &str, color: Option<Color>, image: Option<&str>) -> ProductInfo {
        ProductInfo {
            id: "p-1".to_string(),
            name: name.to_string(),
            color,
            image: image.map(str::to_string),
        }
    }

    fn item(quantity: Option<u32>) -> DisplayItem {
        DisplayItem {
            product_id: "p-1".to_string(),
            section: 0,
            position: 0,
            quantity,
            side: None,
        }
    }

    #[test]
    fn keywords_pick_the_style() {
        let rack = FurnitureKind::ClothingRack;
        assert_eq!(ProductStyle::classify("Jean slim bleu", rack), ProductStyle::Bottom);
        assert_eq!(ProductStyle::classify("Écharpe laine", rack), ProductStyle::Accessory);
        assert_eq!(ProductStyle::classify("Energy Drink", FurnitureKind::Gondola), ProductStyle::Refrigerated);
        assert_eq!(ProductStyle::classify("Gift box", FurnitureKind::Gondola), ProductStyle::Boxed);
        assert_eq!(ProductStyle::classify("Costume gris", rack), ProductStyle::Suit);
        assert_eq!(ProductStyle::classify("Chemise blanche", rack), ProductStyle::Shirt);
        assert_eq!(ProductStyle::classify("Pull", FurnitureKind::ModularCube), ProductStyle::Folded);
        assert_eq!(ProductStyle::classify("Pull", rack), ProductStyle::Hanging);
        assert_eq!(ProductStyle::classify("Pull", FurnitureKind::Table), ProductStyle::Standing);
    }

    #[test]
    fn fixture_overrides_plain_names() {
        assert_eq!(
            ProductStyle::classify("Lait", FurnitureKind::Refrigerator),
            ProductStyle::Refrigerated
        );
        assert_eq!(
            ProductStyle::classify("Bracelet", FurnitureKind::AccessoryDisplay),
            ProductStyle::Accessory
        );
    }

    #[test]
    fn refrigerated_ignores_product_color() {
        let red = Color::from_rgb24(0xFF0000);
        assert_eq!(ProductStyle::Refrigerated.surface_color(Some(red)), Color::from_rgb24(0xCCFFCC));
        assert_eq!(ProductStyle::Shirt.surface_color(Some(red)), red);
        assert_eq!(ProductStyle::Shirt.surface_color(None), Color::WHITE);
        assert_eq!(ProductStyle::Standing.surface_color(None), Color::from_rgb24(0x333333));
    }

    #[test]
    fn copies_spread_around_the_slot() {
        let (offsets, width) = copy_layout(3, 0.5);
        assert_eq!(offsets, vec![-0.4, 0.0, 0.4]);
        assert!((width - 0.45).abs() < 1e-6);
        assert_eq!(copy_layout(1, 0.5), (vec![0.0], 0.5));
    }

    #[test]
    fn untextured_product_is_a_colored_box() {
        let part = product_part(&product("Chemise", None, None), ProductStyle::Shirt, 0.4, 0.6);
        assert!(matches!(part.shape, Shape::Cuboid { .. }));
        assert_eq!(part.surface.map(|s| s.color), Some(Color::WHITE));
    }

    #[test]
    fn textured_product_is_a_plane() {
        let part = product_part(&product("Chemise", None, Some("img/chemise.png")), ProductStyle::Shirt, 0.4, 0.6);
        assert_eq!(part.shape, Shape::Plane { width: 0.4, height: 0.6 });
        assert_eq!(
            part.surface.and_then(|s| s.texture).as_deref(),
            Some("img/chemise.png")
        );
    }

    #[test]
    fn right_to_left_mirrors_offsets() {
        let slot = Slot::new(0.3, 1.0, 0.0, 0.5, 0.4);
        let p = product("Pull", None, None);
        let it = item(Some(2));

        let mut ltr = PartTree::new("f");
        let root = ltr.root();
        let group = place_product(&mut ltr, root, &it, &p, FurnitureKind::Table, slot, ReadingDirection::Ltr);
        let first_ltr = ltr.root_offset(ltr.children(group)[0]);

        let mut rtl = PartTree::new("f");
        let root = rtl.root();
        let group = place_product(&mut rtl, root, &it, &p, FurnitureKind::Table, slot, ReadingDirection::Rtl);
        let first_rtl = rtl.root_offset(rtl.children(group)[0]);

        assert!((first_ltr.x - 0.1).abs() < 1e-6, "{first_ltr:?}");
        assert!((first_rtl.x + 0.1).abs() < 1e-6, "{first_rtl:?}");
        assert_eq!(rtl.count("standing"), 2);
    }

    #[test]
    fn huge_quantities_are_capped() {
        let (offsets, _) = copy_layout(u32::MAX, 0.5);
        assert_eq!(offsets.len(), MAX_COPIES as usize);
        assert!((offsets[0] + offsets[offsets.len() - 1]).abs() < 1e-6);

        let mut tree = PartTree::new("f");
        let root = tree.root();
        let slot = Slot::new(0.0, 1.0, 0.0, 0.5, 0.4);
        let p = product("Pull", None, None);
        place_product(&mut tree, root, &item(Some(1_000_000)), &p, FurnitureKind::Table, slot, ReadingDirection::Ltr);
        assert_eq!(tree.count("standing"), MAX_COPIES as usize);
    }
}
