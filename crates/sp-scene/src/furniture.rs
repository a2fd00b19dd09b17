//! Furniture-record synthesis.
//!
//! Planogram fixtures arrive as [`FurnitureRecord`]s in meters together
//! with their product assignments. The fixture frame is built first
//! (base, panels, one shelf or rail per section), then every assignment
//! whose product resolves is handed to the product sub-synthesizer at the
//! slot its kind dictates.

use crate::part::{Part, PartTree};
use crate::products::{Slot, place_product};
use sp_core::config::ReadingDirection;
use sp_core::furniture::{
    DisplayItem, FurnitureKind, FurnitureRecord, ProductInfo, Side, group_by_section,
};
use sp_core::model::Color;
use std::collections::HashMap;
use std::f32::consts::PI;

const FRAME: Color = Color::from_rgb24(0x9E9E9E);
const PANEL: Color = Color::from_rgb24(0xF5F5F5);
const WOOD: Color = Color::from_rgb24(0x8D6E63);

/// Board and rail thickness, meters.
const BOARD: f32 = 0.02;
/// How far gondola faces sit in from the fixture's front and back.
const FACE_INSET: f32 = 0.15;

/// Build the full part tree for one fixture and its products.
pub fn synthesize_furniture(
    record: &FurnitureRecord,
    items: &[DisplayItem],
    products: &[ProductInfo],
    direction: ReadingDirection,
) -> PartTree {
    let mut tree = frame(record);
    let root = tree.root();
    let index: HashMap<&str, &ProductInfo> = products.iter().map(|p| (p.id.as_str(), p)).collect();

    for (section, section_items) in group_by_section(items) {
        for item in section_items {
            let Some(product) = index.get(item.product_id.as_str()) else {
                log::debug!("{}: product {} not resolved, skipping", kind_key(record.kind), item.product_id);
                continue;
            };
            let slot = slot_for(record, section, item);
            place_product(&mut tree, root, item, product, record.kind, slot, direction);
        }
    }
    tree
}

fn kind_key(kind: FurnitureKind) -> &'static str {
    match kind {
        FurnitureKind::ClothingRack => "clothing-rack",
        FurnitureKind::WallDisplay => "wall-display",
        FurnitureKind::AccessoryDisplay => "accessory-display",
        FurnitureKind::ModularCube => "modular-cube",
        FurnitureKind::Gondola => "gondola",
        FurnitureKind::Table => "table",
        FurnitureKind::Planogram => "planogram",
        FurnitureKind::Refrigerator => "refrigerator",
        FurnitureKind::RefrigeratedShowcase => "refrigerated-showcase",
        FurnitureKind::ClothingDisplay => "clothing-display",
        FurnitureKind::ClothingWall => "clothing-wall",
        FurnitureKind::ShelvesDisplay => "shelves-display",
    }
}

// ─── Slot placement ──────────────────────────────────────────────────────

/// Center of a shelved section.
fn section_y(record: &FurnitureRecord, section: u32) -> f32 {
    let sh = record.section_height();
    section as f32 * sh + sh / 2.0
}

/// Height of the rail above a section.
fn rail_y(record: &FurnitureRecord, section: u32) -> f32 {
    (section + 1) as f32 * record.section_height()
}

/// Lateral center of a slot.
fn slot_x(record: &FurnitureRecord, position: u32) -> f32 {
    let (_, slots) = record.grid();
    (position as f32 - slots as f32 / 2.0 + 0.5) * record.slot_width()
}

fn slot_for(record: &FurnitureRecord, section: u32, item: &DisplayItem) -> Slot {
    let (sections, slots) = record.grid();
    let (w, d) = (record.width, record.depth);
    let sh = record.section_height();
    let sw = record.slot_width();
    let pos = item.position;

    match record.kind {
        FurnitureKind::ClothingRack | FurnitureKind::ClothingDisplay => {
            Slot::new(slot_x(record, pos), rail_y(record, section) - 0.4, 0.0, sw * 0.8, 0.8)
        }
        FurnitureKind::WallDisplay | FurnitureKind::ClothingWall => Slot::new(
            slot_x(record, pos),
            rail_y(record, section) - 0.2 * sh,
            d / 4.0,
            sw * 0.8,
            sh * 0.8,
        ),
        FurnitureKind::AccessoryDisplay => {
            Slot::new(slot_x(record, pos), section_y(record, section), 0.05, sw * 0.6, 0.3)
        }
        FurnitureKind::Planogram => {
            let cell = w / slots as f32;
            Slot::new(-w / 2.0 + (pos as f32 + 0.5) * cell, section_y(record, section), 0.0, cell * 0.8, sh * 0.6)
        }
        FurnitureKind::ModularCube => {
            let cube = w.min(record.height) / sections as f32;
            let size = cube / slots as f32;
            let (row, col) = ((pos / slots) as f32, (pos % slots) as f32);
            let half = slots as f32 / 2.0;
            Slot::new(
                (col - half + 0.5) * size,
                section_y(record, section),
                (row - half + 0.5) * size,
                size * 0.8,
                sh * 0.3,
            )
        }
        FurnitureKind::Gondola => {
            let per_face = (slots / 2).max(1);
            let face_a = pos < per_face;
            let rel = (if face_a { pos } else { pos - per_face }) as f32;
            let x = (rel / per_face as f32 - 0.5) * w + w / per_face as f32 / 2.0;
            let z = d / 2.0 - FACE_INSET;
            let width = w / per_face as f32 * 0.8;
            if face_a {
                Slot::new(x, section_y(record, section), z, width, sh * 0.6)
            } else {
                Slot::new(x, section_y(record, section), -z, width, sh * 0.6).facing(PI)
            }
        }
        FurnitureKind::Table => {
            let height = (sh * 0.3).min(0.3);
            Slot::new(slot_x(record, pos), record.height + height / 2.0, 0.0, sw * 0.8, height)
        }
        FurnitureKind::ShelvesDisplay => shelves_display_slot(record, section, item),
        FurnitureKind::Refrigerator | FurnitureKind::RefrigeratedShowcase => {
            Slot::new(slot_x(record, pos), section_y(record, section), 0.0, sw * 0.8, sh * 0.6)
        }
    }
}

/// Four-sided column: left, front, back, and right faces. An explicit side
/// wins; otherwise the position's quarter of the slot range picks it.
fn shelves_display_slot(record: &FurnitureRecord, section: u32, item: &DisplayItem) -> Slot {
    let (_, slots) = record.grid();
    let (w, d) = (record.width, record.depth);
    let sh = record.section_height();
    let y = section_y(record, section);
    let quarter = (slots / 4).max(1);

    let (side, columns) = match item.side {
        Some(side) => {
            let config = record.shelves_config();
            let columns = match side {
                Side::Left | Side::Right => config.left_right_columns,
                Side::Front | Side::Back => config.front_back_columns,
            };
            (side, columns.max(1))
        }
        None => {
            let side = match item.position / quarter {
                0 => Side::Left,
                1 => Side::Front,
                2 => Side::Back,
                _ => Side::Right,
            };
            (side, quarter)
        }
    };
    let col = (item.position % columns) as f32 / columns as f32;

    match side {
        Side::Left => Slot::new(-w / 2.0 - 0.1, y, -d / 4.0 + col * d / 2.0, d / 2.0 / columns as f32 * 0.8, sh * 0.6)
            .facing(-PI / 2.0),
        Side::Right => Slot::new(w / 2.0 + 0.1, y, -d / 4.0 + col * d / 2.0, d / 2.0 / columns as f32 * 0.8, sh * 0.6)
            .facing(PI / 2.0),
        Side::Front => Slot::new(-w / 4.0 + col * w / 2.0, y, d / 2.0 - 0.05, w / 2.0 / columns as f32 * 0.8, sh * 0.6),
        Side::Back => Slot::new(-w / 4.0 + col * w / 2.0, y, -d / 2.0 + 0.05, w / 2.0 / columns as f32 * 0.8, sh * 0.6)
            .facing(PI),
    }
}

// ─── Frames ──────────────────────────────────────────────────────────────

fn frame(record: &FurnitureRecord) -> PartTree {
    let (w, ht, d) = (record.width, record.height, record.depth);
    let (sections, _) = record.grid();
    let color = record.color.unwrap_or(match record.kind {
        FurnitureKind::Table | FurnitureKind::ModularCube => WOOD,
        FurnitureKind::Refrigerator | FurnitureKind::RefrigeratedShowcase => PANEL,
        _ => FRAME,
    });
    let mut tree = PartTree::new(kind_key(record.kind));

    match record.kind {
        FurnitureKind::ClothingRack | FurnitureKind::ClothingDisplay => {
            tree.push(Part::cuboid("base", w, 0.05, d).at(0.0, 0.025, 0.0).color(color));
            for side in [-1.0, 1.0] {
                tree.push(
                    Part::cylinder("upright", BOARD, BOARD, ht)
                        .at(side * w / 2.0, ht / 2.0, 0.0)
                        .color(color),
                );
            }
            rails(&mut tree, record, 0.0, color);
        }
        FurnitureKind::WallDisplay | FurnitureKind::ClothingWall => {
            back_panel(&mut tree, w, ht, d, color);
            rails(&mut tree, record, d / 4.0, color);
        }
        FurnitureKind::AccessoryDisplay | FurnitureKind::Planogram => {
            back_panel(&mut tree, w, ht, d, color);
            shelves(&mut tree, record, w, d, color);
        }
        FurnitureKind::ModularCube => {
            for side in [-1.0, 1.0] {
                tree.push(
                    Part::cuboid("side", BOARD, ht, d)
                        .at(side * (w / 2.0 - BOARD / 2.0), ht / 2.0, 0.0)
                        .color(color),
                );
            }
            shelves(&mut tree, record, w, d, color);
            tree.push(Part::cuboid("top", w, BOARD, d).at(0.0, ht - BOARD / 2.0, 0.0).color(color));
        }
        FurnitureKind::Gondola => {
            tree.push(Part::cuboid("base", w, 0.1, d).at(0.0, 0.05, 0.0).color(color));
            tree.push(Part::cuboid("spine", w, ht, 0.05).at(0.0, ht / 2.0, 0.0).color(color));
            let face = d / 2.0 - 0.05;
            for s in 0..sections {
                let y = s as f32 * record.section_height() + BOARD / 2.0;
                for z in [d / 4.0, -d / 4.0] {
                    tree.push(Part::cuboid("shelf", w, BOARD, face).at(0.0, y, z).color(color));
                }
            }
        }
        FurnitureKind::Table => {
            tree.push(Part::cuboid("top", w, 0.04, d).at(0.0, ht - 0.02, 0.0).color(color));
            let inset = (w.min(d) * 0.1).min(0.1);
            for sx in [-1.0, 1.0] {
                for sz in [-1.0, 1.0] {
                    tree.push(
                        Part::cylinder("leg", 0.03, 0.03, ht - 0.04)
                            .at(sx * (w / 2.0 - inset), (ht - 0.04) / 2.0, sz * (d / 2.0 - inset))
                            .color(color),
                    );
                }
            }
        }
        FurnitureKind::Refrigerator | FurnitureKind::RefrigeratedShowcase => {
            back_panel(&mut tree, w, ht, d, color);
            for side in [-1.0, 1.0] {
                tree.push(
                    Part::cuboid("side", BOARD, ht, d)
                        .at(side * (w / 2.0 - BOARD / 2.0), ht / 2.0, 0.0)
                        .color(color),
                );
            }
            shelves(&mut tree, record, w, d, color);
            tree.push(Part::cuboid("top", w, BOARD, d).at(0.0, ht - BOARD / 2.0, 0.0).color(color));
            tree.push(
                Part::cuboid("glass", w, ht, BOARD)
                    .at(0.0, ht / 2.0, d / 2.0)
                    .color(Color::WHITE)
                    .opacity(0.3),
            );
            tree.push(Part::light("light", 0.6).at(0.0, ht - 0.1, 0.0));
        }
        FurnitureKind::ShelvesDisplay => {
            tree.push(Part::cuboid("core", w, ht, d).at(0.0, ht / 2.0, 0.0).color(color));
            for s in 0..sections {
                let y = s as f32 * record.section_height() + BOARD / 2.0;
                tree.push(
                    Part::cuboid("ledge", w + 0.2, BOARD, d + 0.2)
                        .at(0.0, y, 0.0)
                        .color(color),
                );
            }
        }
    }
    tree
}

fn back_panel(tree: &mut PartTree, w: f32, ht: f32, d: f32, color: Color) {
    tree.push(
        Part::cuboid("back", w, ht, BOARD)
            .at(0.0, ht / 2.0, -d / 2.0 + BOARD / 2.0)
            .color(color),
    );
}

/// One board at the bottom of every section.
fn shelves(tree: &mut PartTree, record: &FurnitureRecord, w: f32, d: f32, color: Color) {
    let (sections, _) = record.grid();
    for s in 0..sections {
        let y = s as f32 * record.section_height() + BOARD / 2.0;
        tree.push(Part::cuboid("shelf", w, BOARD, d).at(0.0, y, 0.0).color(color));
    }
}

/// One hanging rail at the top of every section.
fn rails(tree: &mut PartTree, record: &FurnitureRecord, z: f32, color: Color) {
    let (sections, _) = record.grid();
    for s in 0..sections {
        tree.push(
            Part::cylinder("rail", BOARD / 2.0, BOARD / 2.0, record.width)
                .rotated_z(PI / 2.0)
                .at(0.0, rail_y(record, s) - BOARD / 2.0, z)
                .color(color),
        );
    }
}
