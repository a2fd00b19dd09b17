//! Furniture and decor: chairs, sofas, beds, plants, mannequins.

use super::{SynthContext, dims, four_corners};
use crate::part::{Part, PartTree};
use sp_core::model::{Color, SpatialElement};
use std::f32::consts::{PI, TAU};

const WOOD: Color = Color::from_rgb24(0x795548);
const DARK_WOOD: Color = Color::from_rgb24(0x5D4037);
const BED_FRAME: Color = Color::from_rgb24(0x8D6E63);
const FABRIC: Color = Color::from_rgb24(0x3F51B5);
const CUSHION: Color = Color::from_rgb24(0x303F9F);
const LINEN: Color = Color::from_rgb24(0xECEFF1);
const BLANKET: Color = Color::from_rgb24(0x1976D2);
const TERRACOTTA: Color = Color::from_rgb24(0xA0522D);
const SOIL: Color = Color::from_rgb24(0x3E2723);
const STEM: Color = Color::from_rgb24(0x33691E);
const LEAF: Color = Color::from_rgb24(0x4CAF50);
const SKIN: Color = Color::from_rgb24(0xF5DEB3);
const PLINTH: Color = Color::from_rgb24(0x424242);

pub(super) fn chair(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("chair");
    tree.push(Part::cuboid("seat", w, 5.0, h).at(0.0, d / 2.0, 0.0).color(WOOD));
    tree.push(
        Part::cuboid("backrest", w, d / 2.0, 5.0)
            .rotated_x(PI / 12.0)
            .at(0.0, d * 0.75, -h / 2.0 + 2.5)
            .color(WOOD),
    );
    four_corners(
        &mut tree,
        w,
        h,
        5.0,
        d / 4.0,
        &Part::cylinder("leg", 1.5, 1.5, d / 2.0).color(DARK_WOOD),
    );
    tree
}

pub(super) fn sofa(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let seat = d / 3.0;
    let back_y = seat + d / 4.0;
    let mut tree = PartTree::new("sofa");
    tree.push(Part::cuboid("base", w, seat, h).at(0.0, seat / 2.0, 0.0).color(FABRIC));
    tree.push(
        Part::cuboid("back", w, d / 2.0, 10.0)
            .at(0.0, back_y, -h / 2.0 + 5.0)
            .color(FABRIC),
    );
    for side in [-1.0, 1.0] {
        tree.push(
            Part::cuboid("arm", 10.0, d / 2.0, (h - 20.0).max(0.0))
                .at(side * (w / 2.0 - 5.0), back_y, 10.0)
                .color(FABRIC),
        );
    }
    for i in -1..=1 {
        tree.push(
            Part::cuboid("cushion", (w / 3.0 - 5.0).max(0.0), 10.0, (h - 20.0).max(0.0))
                .at(i as f32 * w / 3.0, seat + 5.0, 0.0)
                .color(CUSHION),
        );
    }
    four_corners(
        &mut tree,
        w,
        h,
        10.0,
        d / 12.0,
        &Part::cylinder("leg", 2.0, 2.0, d / 6.0).color(DARK_WOOD),
    );
    tree
}

pub(super) fn bed(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let layer = d / 4.0;
    let top = layer * 2.0;
    let mut tree = PartTree::new("bed");
    tree.push(Part::cuboid("base", w, layer, h).at(0.0, layer / 2.0, 0.0).color(BED_FRAME));
    tree.push(
        Part::cuboid("mattress", (w - 10.0).max(0.0), layer, (h - 10.0).max(0.0))
            .at(0.0, layer * 1.5, 0.0)
            .color(LINEN),
    );
    tree.push(
        Part::cuboid("pillow", w / 3.0, d / 8.0, h / 4.0)
            .at(0.0, top + d / 16.0, -h / 2.0 + h / 8.0)
            .color(Color::WHITE),
    );
    tree.push(
        Part::cuboid("blanket", (w - 20.0).max(0.0), 3.0, h / 2.0)
            .at(0.0, top + 1.5, h / 4.0)
            .color(BLANKET),
    );
    tree.push(
        Part::cuboid("headboard", w, d / 2.0, 10.0)
            .at(0.0, d / 2.0, -h / 2.0 - 5.0)
            .color(BED_FRAME),
    );
    four_corners(
        &mut tree,
        w,
        h,
        15.0,
        layer / 2.0,
        &Part::cylinder("leg", 3.0, 3.0, layer).color(DARK_WOOD),
    );
    tree
}

pub(super) fn plant(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    const LEAVES: usize = 8;

    let (w, _, d) = dims(el);
    let pot = d / 3.0;
    let mut tree = PartTree::new("plant");
    tree.push(
        Part::cylinder("pot", w / 2.0, w / 3.0, pot)
            .at(0.0, pot / 2.0, 0.0)
            .color(TERRACOTTA),
    );
    tree.push(
        Part::cylinder("soil", w / 2.0 - 2.0, w / 2.0 - 2.0, 2.0)
            .at(0.0, pot, 0.0)
            .color(SOIL),
    );
    tree.push(
        Part::cylinder("stem", 1.0, 2.0, d * 2.0 / 3.0)
            .at(0.0, pot + d / 3.0, 0.0)
            .color(STEM),
    );
    // Two alternating tiers so the crown has some depth.
    let leaf = w / 4.0;
    for i in 0..LEAVES {
        let angle = i as f32 * TAU / LEAVES as f32;
        let tier = if i % 2 == 0 { 0.6 } else { 0.8 };
        tree.push(
            Part::sphere("leaf", leaf)
                .at(angle.cos() * w / 3.0, (d * tier).min(d - leaf), angle.sin() * w / 3.0)
                .color(LEAF),
        );
    }
    tree
}

pub(super) fn mannequin(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    const PLINTH_H: f32 = 5.0;

    let (_, _, d) = dims(el);
    let legs = d * 0.45;
    let body = d * 0.3;
    let arms = d * 0.25;
    let hip = PLINTH_H + legs;
    let shoulder = hip + body;
    let head = ((d - shoulder) / 2.0).clamp(1.0, 12.0);

    let mut tree = PartTree::new("mannequin");
    tree.push(
        Part::cylinder("base", 15.0, 15.0, PLINTH_H)
            .at(0.0, PLINTH_H / 2.0, 0.0)
            .color(PLINTH),
    );
    for side in [-1.0, 1.0] {
        tree.push(
            Part::cylinder("leg", 3.0, 3.0, legs)
                .at(side * 6.0, PLINTH_H + legs / 2.0, 0.0)
                .color(SKIN),
        );
    }
    tree.push(
        Part::cylinder("body", 12.0, 10.0, body)
            .at(0.0, hip + body / 2.0, 0.0)
            .color(SKIN),
    );
    for side in [-1.0, 1.0] {
        tree.push(
            Part::cylinder("arm", 2.5, 2.5, arms)
                .rotated_z(-side * PI / 16.0)
                .at(side * 15.0, shoulder - arms / 2.0, 0.0)
                .color(SKIN),
        );
    }
    tree.push(
        Part::cuboid("shirt", 25.0, body * 0.5, 15.0)
            .at(0.0, hip + body * 0.75, 0.0)
            .color(BLANKET),
    );
    tree.push(Part::sphere("head", head).at(0.0, d - head, 0.0).color(SKIN));
    tree
}
