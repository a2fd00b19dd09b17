//! Building structure and drawing primitives: walls, doors, windows,
//! lines, rectangles, circles.

use super::{SynthContext, dims};
use crate::part::{Part, PartTree};
use sp_core::catalog::element_color;
use sp_core::model::{Color, SpatialElement};
use std::f32::consts::PI;

const WALL: Color = Color::from_rgb24(0xCCCCCC);
const DOOR_FRAME: Color = Color::from_rgb24(0x5D4037);
const DOOR_PANEL: Color = Color::from_rgb24(0x8D6E63);
const METAL: Color = Color::from_rgb24(0xC0C0C0);
const GLASS: Color = Color::from_rgb24(0x7FDBFF);

/// Window frame thickness.
const FRAME: f32 = 4.0;

pub(super) fn wall(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("wall");
    tree.push(Part::cuboid("body", w, d, h).at(0.0, d / 2.0, 0.0).color(WALL));
    tree
}

pub(super) fn door(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new("door");
    tree.push(
        Part::cuboid("frame", w + 10.0, d, h + 10.0)
            .at(0.0, d / 2.0, 0.0)
            .color(DOOR_FRAME),
    );
    // Left ajar so the opening reads in 3D.
    tree.push(
        Part::cuboid("panel", (w - 10.0).max(0.0), d / 2.0, (h - 10.0).max(0.0))
            .at(5.0, d * 0.75, 5.0)
            .rotated_y(PI / 6.0)
            .color(DOOR_PANEL),
    );
    tree.push(Part::sphere("handle", 3.0).at(w / 2.0 - 15.0, d, h / 2.0).color(METAL));
    tree
}

/// Vertical extent and center height of a window's opening.
///
/// With a live parent wall and both insets set, the opening is the wall's
/// height minus the insets. Otherwise the window's own depth is used.
pub fn window_opening(el: &SpatialElement, parent_wall: Option<&SpatialElement>) -> (f32, f32) {
    if let Some(wall) = parent_wall
        && let (Some(top), Some(bottom)) = (el.window_top_distance, el.window_bottom_distance)
    {
        let extent = (wall.depth - top - bottom).max(0.0);
        return (extent, bottom + extent / 2.0);
    }
    (el.depth, el.depth / 2.0)
}

pub(super) fn window(el: &SpatialElement, ctx: &SynthContext<'_>) -> PartTree {
    let (w, h, _) = dims(el);
    let (extent, center) = window_opening(el, ctx.parent_wall);
    let mut tree = PartTree::new("window");
    tree.push(
        Part::cuboid("frame", w, extent, h)
            .at(0.0, center, 0.0)
            .color(Color::WHITE),
    );
    tree.push(
        Part::cuboid(
            "glass",
            (w - FRAME).max(0.0),
            (extent - FRAME).max(0.0),
            (h - FRAME / 2.0).max(0.0),
        )
        .at(0.0, center, 0.0)
        .color(GLASS)
        .opacity(0.6),
    );
    tree
}

pub(super) fn line(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    flat(el, "line")
}

pub(super) fn rectangle(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    flat(el, "rectangle")
}

pub(super) fn circle(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let radius = w.min(h) / 2.0;
    let mut tree = PartTree::new("circle");
    tree.push(
        Part::cylinder("disc", radius, radius, d)
            .at(0.0, d / 2.0, 0.0)
            .color(element_color(el.element_type)),
    );
    tree
}

fn flat(el: &SpatialElement, name: &str) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new(name);
    tree.push(
        Part::cuboid("body", w, d, h)
            .at(0.0, d / 2.0, 0.0)
            .color(element_color(el.element_type)),
    );
    tree
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sp_core::geometry::Bounds;
    use sp_core::model::ElementType;

    fn el(ty: ElementType, w: f32, h: f32, d: f32) -> SpatialElement {
        SpatialElement::new(ty, Bounds::new(0.0, 0.0, w, h), d)
    }

    #[test]
    fn wall_is_one_box_on_the_floor() {
        let tree = wall(&el(ElementType::Wall, 200.0, 10.0, 250.0), &SynthContext::default());
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.vertical_extent(), (0.0, 250.0));
    }

    #[test]
    fn window_uses_parent_wall_height() {
        let host = el(ElementType::Wall, 200.0, 10.0, 250.0);
        let mut win = el(ElementType::Window, 100.0, 10.0, 10.0);
        win.window_top_distance = Some(20.0);
        win.window_bottom_distance = Some(30.0);
        assert_eq!(window_opening(&win, Some(&host)), (200.0, 130.0));

        let ctx = SynthContext { parent_wall: Some(&host) };
        let tree = window(&win, &ctx);
        assert_eq!(tree.vertical_extent(), (30.0, 230.0));
    }

    #[test]
    fn orphaned_window_falls_back_to_own_depth() {
        let mut win = el(ElementType::Window, 100.0, 10.0, 40.0);
        win.window_top_distance = Some(20.0);
        win.window_bottom_distance = Some(20.0);
        assert_eq!(window_opening(&win, None), (40.0, 20.0));
    }

    #[test]
    fn door_frame_is_wider_than_opening() {
        let tree = door(&el(ElementType::Door, 80.0, 10.0, 200.0), &SynthContext::default());
        let frame = tree.get(tree.find("frame").unwrap()).unwrap();
        assert_eq!(
            frame.shape,
            crate::part::Shape::Cuboid {
                size: glam::Vec3::new(90.0, 200.0, 20.0)
            }
        );
        assert!(tree.find("handle").is_some());
    }
}
