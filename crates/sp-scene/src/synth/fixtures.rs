//! Store fixtures: shelves, racks, displays, tables, gondolas,
//! planograms, cube units, counters, cashiers.
//!
//! Sample merchandise on displays, gondolas, and planograms is laid out on
//! a fixed pattern so re-synthesis is repeatable.

use super::{SynthContext, dims, four_corners, less};
use crate::part::{Part, PartTree};
use sp_core::model::{Color, SpatialElement};
use std::f32::consts::PI;

const OAK: Color = Color::from_rgb24(0xA1887F);
const WALNUT: Color = Color::from_rgb24(0x8D6E63);
const DARK_WOOD: Color = Color::from_rgb24(0x5D4037);
const TABLE_TOP: Color = Color::from_rgb24(0xC19A6B);
const LAMINATE: Color = Color::from_rgb24(0xECEFF1);
const STEEL: Color = Color::from_rgb24(0x9E9E9E);
const CHARCOAL: Color = Color::from_rgb24(0x424242);
const PANEL: Color = Color::from_rgb24(0x616161);
const HANGER: Color = Color::from_rgb24(0xBDBDBD);
const REGISTER: Color = Color::from_rgb24(0x212121);
const SCREEN: Color = Color::from_rgb24(0x2196F3);
const CUBE_FRAME: Color = Color::from_rgb24(0x3E2723);

/// Sample merchandise colors, cycled.
const SAMPLES: [Color; 5] = [
    Color::from_rgb24(0xE91E63),
    Color::from_rgb24(0x2196F3),
    Color::from_rgb24(0xFFEB3B),
    Color::from_rgb24(0x4CAF50),
    Color::from_rgb24(0xFF9800),
];

fn sample(i: usize) -> Color {
    SAMPLES[i % SAMPLES.len()]
}

pub(super) fn shelf(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("shelf");
    tree.push(Part::cuboid("top", w, 5.0, h).at(0.0, less(d, 2.5), 0.0).color(OAK));
    for i in 1..3 {
        tree.push(
            Part::cuboid("board", w, 3.0, h)
                .at(0.0, d * i as f32 / 3.0, 0.0)
                .color(OAK),
        );
    }
    four_corners(
        &mut tree,
        w,
        h,
        1.5,
        d / 2.0,
        &Part::cuboid("pillar", 3.0, d, 3.0).color(WALNUT),
    );
    tree
}

pub(super) fn rack(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let rail = less(d, 10.0);
    let mut tree = PartTree::new("rack");
    tree.push(
        Part::cylinder("bar", 2.0, 2.0, w)
            .rotated_z(PI / 2.0)
            .at(0.0, rail, 0.0)
            .color(STEEL),
    );
    for side in [-1.0, 1.0] {
        tree.push(
            Part::cylinder("support", 2.0, 2.0, rail)
                .at(side * (w / 2.0 - 2.0), rail / 2.0, 0.0)
                .color(STEEL),
        );
    }
    tree.push(Part::cuboid("base", w, 5.0, h / 2.0).at(0.0, 2.5, 0.0).color(CHARCOAL));

    let hangers = (w / 15.0).floor() as usize;
    let span = less(w, 20.0);
    for i in 0..hangers {
        let x = if hangers > 1 {
            -span / 2.0 + i as f32 * span / (hangers - 1) as f32
        } else {
            0.0
        };
        let hook = less(d, 15.0);
        tree.push(
            Part::torus("hanger", 5.0, 0.5, PI)
                .rotated_x(PI / 2.0)
                .at(x, hook, 0.0)
                .color(HANGER),
        );
        // Every other hanger carries a garment.
        if i % 2 == 0 {
            let color = if (i / 2) % 2 == 0 { SCREEN } else { SAMPLES[0] };
            tree.push(
                Part::cuboid("garment", 25.0, 20.0, 15.0)
                    .at(x, less(hook, 12.5).max(10.0), 0.0)
                    .color(color),
            );
        }
    }
    tree
}

pub(super) fn display(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("display");
    tree.push(Part::cuboid("base", w, 5.0, h).at(0.0, 2.5, 0.0).color(DARK_WOOD));
    tree.push(
        Part::cuboid("surface", less(w, 10.0), 2.0, less(h, 10.0))
            .at(0.0, 6.0, 0.0)
            .color(LAMINATE),
    );
    // A 2 × 2 arrangement, boxes and cylinders alternating.
    let size = (d * 0.3).clamp(5.0, 20.0);
    for i in 0..4 {
        let (col, row) = ((i % 2) as f32, (i / 2) as f32);
        let x = (col - 0.5) * less(w, 30.0) / 2.0;
        let z = (row - 0.5) * less(h, 30.0) / 2.0;
        let product = if i % 2 == 0 {
            Part::cuboid("product", size, size, size)
        } else {
            Part::cylinder("product", size / 2.0, size / 2.0, size)
        };
        tree.push(product.at(x, 7.0 + size / 2.0, z).color(sample(i)));
    }
    tree
}

pub(super) fn table(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let leg = less(d, 5.0);
    let mut tree = PartTree::new("table");
    tree.push(Part::cuboid("top", w, 5.0, h).at(0.0, less(d, 2.5), 0.0).color(TABLE_TOP));
    four_corners(
        &mut tree,
        w,
        h,
        10.0,
        leg / 2.0,
        &Part::cylinder("leg", 3.0, 3.0, leg).color(WALNUT),
    );
    tree
}

pub(super) fn gondola(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("gondola");
    tree.push(Part::cuboid("base", w, 5.0, h).at(0.0, 2.5, 0.0).color(CHARCOAL));
    tree.push(Part::cuboid("back", w, d, 2.0).at(0.0, d / 2.0, 0.0).color(PANEL));

    let spacing = d / 5.0;
    let product_h = spacing * 0.6;
    let face_depth = less(h / 2.0, 1.0);
    for level in 1..=4 {
        let y = level as f32 * spacing;
        for (face, z) in [(0usize, h / 4.0 + 0.5), (1, -(h / 4.0 + 0.5))] {
            let board = tree.push(Part::cuboid("shelf", w, 2.0, face_depth).at(0.0, y, z).color(STEEL));
            for slot in 0..3 {
                let x = (slot as f32 - 1.0) * w / 3.0;
                tree.add(
                    board,
                    Part::cuboid("product", (w / 3.0 * 0.6).min(15.0), product_h, (face_depth * 0.5).min(10.0))
                        .at(x, 1.0 + product_h / 2.0, 0.0)
                        .color(sample(level + face + slot)),
                );
            }
        }
    }
    tree
}

pub(super) fn planogram(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    const SHELVES: usize = 5;
    const PER_ROW: usize = 6;
    const ROWS: usize = 2;
    const ROW_COLORS: [Color; ROWS] = [Color::from_rgb24(0x2196F3), Color::from_rgb24(0xFF9800)];

    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("planogram");
    tree.push(Part::cuboid("base", w, 5.0, h).at(0.0, 2.5, 0.0).color(CHARCOAL));
    tree.push(
        Part::cuboid("back", w, d, 2.0)
            .at(0.0, d / 2.0, -h / 2.0 + 1.0)
            .color(PANEL),
    );

    let spacing = d / (SHELVES + 1) as f32;
    let product_w = less(w, 20.0) / PER_ROW as f32;
    let product_h = spacing * 0.7;
    let product_d = less(h, 10.0) / ROWS as f32 / 2.0;
    for level in 0..SHELVES {
        let y = (level + 1) as f32 * spacing;
        let board = tree.push(Part::cuboid("shelf", w, 2.0, less(h, 4.0)).at(0.0, y, 0.0).color(STEEL));
        for row in 0..ROWS {
            for col in 0..PER_ROW {
                let x = (col as f32 - (PER_ROW - 1) as f32 / 2.0) * product_w;
                let z = (row as f32 - (ROWS - 1) as f32 / 2.0) * product_d;
                let product = tree.add(
                    board,
                    Part::cuboid("product", less(product_w, 2.0), product_h, less(product_d, 2.0))
                        .at(x, 1.0 + product_h / 2.0, z)
                        .color(ROW_COLORS[row]),
                );
                tree.add(
                    product,
                    Part::plane("label", less(product_w, 4.0), product_h.min(5.0))
                        .at(0.0, -product_h / 4.0, product_d / 2.0 + 0.1)
                        .color(Color::WHITE),
                );
            }
        }
    }
    tree
}

pub(super) fn cube(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    const SHELVES: usize = 4;
    const POST: f32 = 5.0;

    let (w, h, d) = dims(el);
    let glass = |part: Part| part.color(Color::WHITE).opacity(0.3);
    let mut tree = PartTree::new("cube");
    tree.push(glass(Part::cuboid("glass", w, d, 1.0).at(0.0, d / 2.0, -h / 2.0)));
    for side in [-1.0, 1.0] {
        tree.push(glass(Part::cuboid("glass", 1.0, d, h).at(side * w / 2.0, d / 2.0, 0.0)));
    }
    four_corners(
        &mut tree,
        w,
        h,
        POST / 2.0,
        d / 2.0,
        &Part::cuboid("post", POST, d, POST).color(CUBE_FRAME),
    );

    let spacing = d / SHELVES as f32;
    for i in 0..SHELVES {
        let y = i as f32 * spacing;
        tree.push(Part::cuboid("shelf", w, POST, h).at(0.0, y + POST / 2.0, 0.0).color(CUBE_FRAME));
        if i + 1 < SHELVES {
            for side in [-1.0, 1.0] {
                tree.push(
                    Part::cuboid("rail", less(w, 2.0 * POST), POST, POST)
                        .at(0.0, y + spacing / 2.0 + POST, side * (h / 2.0 - POST / 2.0))
                        .color(CUBE_FRAME),
                );
            }
        }
    }
    tree
}

pub(super) fn counter(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let body = less(d, 5.0);
    let mut tree = PartTree::new("counter");
    tree.push(Part::cuboid("base", w, body, h).at(0.0, body / 2.0, 0.0).color(DARK_WOOD));
    tree.push(
        Part::cuboid("top", w + 10.0, 5.0, h + 10.0)
            .at(0.0, less(d, 2.5), 0.0)
            .color(LAMINATE),
    );
    for i in 0..3 {
        tree.push(
            Part::cuboid("drawer_handle", 20.0, 2.0, 2.0)
                .at((i as f32 - 1.0) * w / 3.0, d / 2.0, h / 2.0 + 0.1)
                .color(STEEL),
        );
    }
    tree
}

pub(super) fn cashier(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let body = less(d, 10.0);
    let desk = less(d, 5.0);
    let mut tree = PartTree::new("cashier");
    tree.push(Part::cuboid("base", w, body, h).at(0.0, body / 2.0, 0.0).color(DARK_WOOD));
    tree.push(
        Part::cuboid("top", w + 10.0, 5.0, h + 10.0)
            .at(0.0, less(d, 7.5), 0.0)
            .color(LAMINATE),
    );
    tree.push(
        Part::cuboid("register", w / 3.0, 15.0, h / 3.0)
            .at(-w / 4.0, desk + 7.5, 0.0)
            .color(REGISTER),
    );
    tree.push(
        Part::cuboid("screen", w / 4.0, 10.0, 2.0)
            .rotated_x(-PI / 6.0)
            .at(-w / 4.0, desk + 20.0, -h / 6.0 - 1.0)
            .color(SCREEN),
    );
    tree.push(
        Part::cuboid("card_reader", 10.0, 5.0, 15.0)
            .at(w / 4.0, desk + 2.5, -h / 4.0)
            .color(CHARCOAL),
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::SynthFn;
    use pretty_assertions::assert_eq;
    use sp_core::geometry::Bounds;
    use sp_core::model::ElementType;

    fn el(ty: ElementType, w: f32, h: f32, d: f32) -> SpatialElement {
        SpatialElement::new(ty, Bounds::new(0.0, 0.0, w, h), d)
    }

    #[test]
    fn shelf_has_three_boards_and_four_pillars() {
        let tree = shelf(&el(ElementType::Shelf, 120.0, 40.0, 60.0), &SynthContext::default());
        assert_eq!(tree.count("top") + tree.count("board"), 3);
        assert_eq!(tree.count("pillar"), 4);
        assert_eq!(tree.vertical_extent(), (0.0, 60.0));
    }

    #[test]
    fn rack_hangers_scale_with_width() {
        let tree = rack(&el(ElementType::Rack, 90.0, 40.0, 150.0), &SynthContext::default());
        assert_eq!(tree.count("hanger"), 6);
        assert_eq!(tree.count("garment"), 3);
        let first = tree.find("hanger").unwrap();
        assert_eq!(tree.root_offset(first).x, -35.0);
    }

    #[test]
    fn table_legs_are_inset() {
        let tree = table(&el(ElementType::Table, 100.0, 60.0, 75.0), &SynthContext::default());
        let legs = tree.find_all("leg");
        assert_eq!(legs.len(), 4);
        let first = tree.root_offset(legs[0]);
        assert_eq!((first.x, first.z), (-40.0, -20.0));
    }

    #[test]
    fn planogram_grid_is_complete() {
        let tree = planogram(&el(ElementType::Planogram, 150.0, 40.0, 180.0), &SynthContext::default());
        assert_eq!(tree.count("shelf"), 5);
        assert_eq!(tree.count("product"), 60);
        assert_eq!(tree.count("label"), 60);
    }

    #[test]
    fn gondola_stocks_both_faces() {
        let tree = gondola(&el(ElementType::Gondola, 200.0, 60.0, 100.0), &SynthContext::default());
        let shelves = tree.find_all("shelf");
        assert_eq!(shelves.len(), 8);
        let front = shelves.iter().filter(|s| tree.root_offset(**s).z > 0.0).count();
        assert_eq!(front, 4);
        let (low, high) = tree.vertical_extent();
        assert_eq!(low, 0.0);
        assert!(high <= 100.0, "{high}");
    }

    #[test]
    fn counter_and_cashier_stand_on_the_floor() {
        let cases: [(ElementType, SynthFn); 4] = [
            (ElementType::Counter, counter),
            (ElementType::Cashier, cashier),
            (ElementType::Cube, cube),
            (ElementType::Display, display),
        ];
        for (ty, make) in cases {
            let tree = make(&el(ty, 120.0, 80.0, 100.0), &SynthContext::default());
            assert_eq!(tree.vertical_extent().0, 0.0, "{ty:?}");
        }
    }
}
