//! Refrigerated units.

use super::{SynthContext, dims, less};
use crate::part::{Part, PartTree};
use sp_core::model::{Color, SpatialElement};

const CASE: Color = Color::from_rgb24(0xCCCCCC);
const CABINET: Color = Color::from_rgb24(0x111111);
const TRAY: Color = Color::from_rgb24(0xAAAAAA);
const SHELF_EDGE: Color = Color::from_rgb24(0x888888);

const TRAYS: usize = 5;
const FOOD: [Color; TRAYS] = [
    Color::from_rgb24(0xFF7043),
    Color::from_rgb24(0x8BC34A),
    Color::from_rgb24(0xFFCA28),
    Color::from_rgb24(0xEF5350),
    Color::from_rgb24(0x26A69A),
];

fn glass(part: Part) -> Part {
    part.color(Color::WHITE).opacity(0.3)
}

/// Open-top chest fridge: a solid base with a glass case above it.
pub(super) fn fridge(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let base = d * 0.3;
    let case = d - base;
    let mut tree = PartTree::new("fridge");

    tree.push(Part::cuboid("base", w, base, h).at(0.0, base / 2.0, 0.0).color(CASE));
    tree.push(
        Part::cuboid("control_panel", w * 0.1, base * 0.6, h * 0.15)
            .at(w * 0.4, base * 0.7, h * 0.4)
            .color(CABINET),
    );

    tree.push(glass(Part::cuboid("glass_top", w, 2.0, h).at(0.0, less(d, 1.0), 0.0)));
    tree.push(glass(
        Part::cuboid("glass_front", w, case, 2.0).at(0.0, base + case / 2.0, h / 2.0),
    ));
    for side in [-1.0, 1.0] {
        tree.push(glass(
            Part::cuboid("glass_side", 2.0, case, h).at(side * w / 2.0, base + case / 2.0, 0.0),
        ));
    }

    let span = w * 0.9;
    let pitch = span / TRAYS as f32;
    let tray_depth = h * 0.8 / TRAYS as f32 * 0.9;
    for (i, food) in FOOD.iter().enumerate() {
        let x = -span / 2.0 + pitch / 2.0 + i as f32 * pitch;
        let tray = tree.push(
            Part::cuboid("tray", pitch * 0.9, 10.0, tray_depth)
                .at(x, base + 5.0, 0.0)
                .color(TRAY),
        );
        tree.add(
            tray,
            Part::cuboid("food", pitch * 0.7, 4.0, tray_depth * 0.7)
                .at(0.0, 7.0, 0.0)
                .color(*food),
        );
    }

    tree.push(Part::light("light", 0.5).at(0.0, less(d, 10.0), 0.0));
    tree
}

/// Upright dairy cabinet with a glass door and lit shelves.
pub(super) fn dairy_fridge(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    const SHELVES: usize = 5;

    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("dairy_fridge");
    tree.push(Part::cuboid("cabinet", w, d, h).at(0.0, d / 2.0, 0.0).color(CABINET));
    tree.push(glass(
        Part::cuboid("glass_front", w * 0.95, d * 0.8, 2.0).at(0.0, d * 0.55, h / 2.0 - 1.0),
    ));

    let shelf_w = w * 0.9;
    let shelf_d = h * 0.8;
    let pitch = d * 0.7 / SHELVES as f32;
    for i in 0..SHELVES {
        let y = d * 0.2 + i as f32 * pitch;
        let shelf = tree.push(Part::cuboid("shelf", shelf_w, 3.0, shelf_d).at(0.0, y, 0.0).color(TRAY));
        tree.add(
            shelf,
            Part::cuboid("edge", shelf_w, 5.0, 2.0)
                .at(0.0, 2.5, shelf_d / 2.0)
                .color(SHELF_EDGE),
        );
    }

    let bottom = d * 0.15;
    tree.push(
        Part::cuboid("bottom", w, bottom, h)
            .at(0.0, bottom / 2.0, 0.0)
            .color(CABINET),
    );
    tree.push(
        Part::cuboid("light_strip", w * 0.9, 2.0, 5.0)
            .at(0.0, d * 0.95, h / 2.0 - 5.0)
            .color(Color::WHITE),
    );
    tree.push(Part::light("light", 0.8).at(0.0, d * 0.7, 0.0));
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::part::Shape;
    use pretty_assertions::assert_eq;
    use sp_core::geometry::Bounds;
    use sp_core::model::ElementType;

    fn el(ty: ElementType, w: f32, h: f32, d: f32) -> SpatialElement {
        SpatialElement::new(ty, Bounds::new(0.0, 0.0, w, h), d)
    }

    #[test]
    fn fridge_base_is_thirty_percent_of_height() {
        let tree = fridge(&el(ElementType::Fridge, 100.0, 80.0, 100.0), &SynthContext::default());
        let base = tree.get(tree.find("base").unwrap()).unwrap();
        let Shape::Cuboid { size } = base.shape else {
            panic!("base should be a box: {:?}", base.shape);
        };
        assert!((size - glam::Vec3::new(100.0, 30.0, 80.0)).length() < 1e-4, "{size:?}");
        assert_eq!(tree.count("tray"), 5);
        assert_eq!(tree.count("glass_side"), 2);
        assert!(tree.find("light").is_some());
    }

    #[test]
    fn fridge_glass_is_translucent() {
        let tree = fridge(&el(ElementType::Fridge, 100.0, 80.0, 100.0), &SynthContext::default());
        let top = tree.get(tree.find("glass_top").unwrap()).unwrap();
        assert_eq!(top.surface.as_ref().map(|s| s.opacity), Some(0.3));
    }

    #[test]
    fn dairy_shelves_each_carry_an_edge() {
        let tree = dairy_fridge(&el(ElementType::DairyFridge, 120.0, 60.0, 200.0), &SynthContext::default());
        assert_eq!(tree.count("shelf"), 5);
        assert_eq!(tree.count("edge"), 5);
        let first = tree.find("shelf").unwrap();
        assert_eq!(tree.root_offset(first).y, 40.0);
        assert_eq!(tree.vertical_extent(), (0.0, 200.0));
    }
}
