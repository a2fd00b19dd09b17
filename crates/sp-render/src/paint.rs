//! Plan view → Vello drawing commands.
//!
//! Paints the grid, every box in paint order, the selection chrome of the
//! selected box, and the ghost preview. Box geometry stays in plan space;
//! `transform` carries zoom and pan so one affine covers the whole frame.

use crate::presentation::{BoxShape, GhostBox, HANDLE_SIZE, PlanBox, PlanView, SELECTION};
use kurbo::{Affine, Circle, Ellipse, Line, Point, Rect, Stroke};
use peniko::{Color, Fill};
use sp_core::geometry::Bounds;
use sp_core::model::Color as PlanColor;
use vello::Scene;

const GRID_LINE: PlanColor = PlanColor::rgba(0.87, 0.87, 0.87, 1.0);
const OUTLINE: PlanColor = PlanColor::rgba(0.2, 0.2, 0.2, 1.0);

/// Paint one frame of the plan.
///
/// `visible` is the plan-space rectangle the surface shows; grid lines are
/// only emitted inside it. Pass `grid <= 0` to skip the grid.
pub fn paint_view(scene: &mut Scene, view: &PlanView, transform: Affine, visible: Bounds, grid: f32) {
    if grid > 0.0 {
        paint_grid(scene, transform, visible, grid);
    }
    for plan_box in &view.boxes {
        paint_box(scene, plan_box, transform);
    }
    if let Some(selected) = view.selected() {
        paint_selection(scene, selected, transform);
    }
    if let Some(ghost) = &view.ghost {
        paint_ghost(scene, ghost, transform);
    }
}

// ─── Grid ────────────────────────────────────────────────────────────────────

fn paint_grid(scene: &mut Scene, transform: Affine, visible: Bounds, grid: f32) {
    let stroke = Stroke::new(0.5);
    let color = to_peniko(GRID_LINE);
    let mut x = (visible.x / grid).floor() * grid;
    while x <= visible.right() {
        let line = Line::new((x as f64, visible.y as f64), (x as f64, visible.bottom() as f64));
        scene.stroke(&stroke, transform, color, None, &line);
        x += grid;
    }
    let mut y = (visible.y / grid).floor() * grid;
    while y <= visible.bottom() {
        let line = Line::new((visible.x as f64, y as f64), (visible.right() as f64, y as f64));
        scene.stroke(&stroke, transform, color, None, &line);
        y += grid;
    }
}

// ─── Boxes ───────────────────────────────────────────────────────────────────

fn paint_box(scene: &mut Scene, plan_box: &PlanBox, transform: Affine) {
    let local = transform * plan_box.transform();
    let fill = to_peniko(plan_box.fill);
    let outline = to_peniko(OUTLINE);
    paint_shape(scene, plan_box.shape, &plan_box.bounds, local, fill, outline, 1.0);
    log::trace!("paint {} {:?}", plan_box.id.as_str(), plan_box.bounds);
}

fn paint_ghost(scene: &mut Scene, ghost: &GhostBox, transform: Affine) {
    let outline = PlanColor::from_hex(ghost.outline()).unwrap_or(OUTLINE);
    paint_shape(
        scene,
        ghost.shape,
        &ghost.bounds,
        transform,
        to_peniko(ghost.fill),
        to_peniko(outline),
        2.0,
    );
}

fn paint_shape(
    scene: &mut Scene,
    shape: BoxShape,
    bounds: &Bounds,
    transform: Affine,
    fill: Color,
    outline: Color,
    width: f64,
) {
    let rect = to_rect(bounds);
    let stroke = Stroke::new(width);
    match shape {
        BoxShape::Rect => {
            scene.fill(Fill::NonZero, transform, fill, None, &rect);
            scene.stroke(&stroke, transform, outline, None, &rect);
        }
        BoxShape::Ellipse => {
            let ellipse = Ellipse::from_rect(rect);
            scene.fill(Fill::NonZero, transform, fill, None, &ellipse);
            scene.stroke(&stroke, transform, outline, None, &ellipse);
        }
        BoxShape::Line => {
            let mid = rect.center().y;
            let line = Line::new((rect.x0, mid), (rect.x1, mid));
            scene.stroke(&Stroke::new(width.max(2.0)), transform, fill, None, &line);
        }
    }
}

// ─── Selection chrome ────────────────────────────────────────────────────────

fn paint_selection(scene: &mut Scene, selected: &PlanBox, transform: Affine) {
    let color = PlanColor::from_hex(SELECTION).map(to_peniko).unwrap_or(Color::from_rgb8(0, 0, 0));
    let local = transform * selected.transform();
    scene.stroke(&Stroke::new(2.0), local, color, None, &to_rect(&selected.bounds).inflate(2.0, 2.0));

    let half = (HANDLE_SIZE / 2.0) as f64;
    for (_, (hx, hy)) in selected.handles() {
        let square = Rect::new(hx as f64 - half, hy as f64 - half, hx as f64 + half, hy as f64 + half);
        scene.fill(Fill::NonZero, transform, Color::from_rgb8(255, 255, 255), None, &square);
        scene.stroke(&Stroke::new(1.0), transform, color, None, &square);
    }

    let (rx, ry) = selected.rotate_handle();
    let knob = Circle::new(Point::new(rx as f64, ry as f64), half);
    scene.fill(Fill::NonZero, transform, color, None, &knob);
    let (tx, ty) = selected.to_plan(selected.bounds.center().0, selected.bounds.y);
    let stem = Line::new((tx as f64, ty as f64), (rx as f64, ry as f64));
    scene.stroke(&Stroke::new(1.0), transform, color, None, &stem);
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn to_rect(bounds: &Bounds) -> Rect {
    Rect::new(
        bounds.x as f64,
        bounds.y as f64,
        bounds.right() as f64,
        bounds.bottom() as f64,
    )
}

pub(crate) fn to_peniko(color: PlanColor) -> Color {
    let [r, g, b, a] = color.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::build_view;
    use sp_core::labels::StaticLabels;
    use sp_core::model::{ElementType, GhostElement, SpatialElement};
    use sp_core::store::ElementStore;
    use sp_core::units::UnitSystem;

    #[test]
    fn paints_without_panicking_on_every_shape() {
        let mut store = ElementStore::new();
        for (i, ty) in [ElementType::Circle, ElementType::Line, ElementType::Shelf].into_iter().enumerate() {
            let id = store.add(SpatialElement::new(ty, Bounds::new(i as f32 * 60.0, 0.0, 50.0, 40.0), 20.0));
            store.select(id);
        }
        let ghost = GhostElement {
            element_type: ElementType::Window,
            x: 0.0,
            y: 100.0,
            width: 100.0,
            height: 10.0,
            depth: 10.0,
            rotation: 0.0,
            valid: false,
        };
        let view = build_view(&store, Some(&ghost), &StaticLabels::default(), UnitSystem::Centimeters);
        let mut scene = Scene::new();
        paint_view(&mut scene, &view, Affine::scale(2.0), Bounds::new(0.0, 0.0, 400.0, 300.0), 20.0);
    }

    #[test]
    fn empty_view_paints_grid_only() {
        let mut scene = Scene::new();
        paint_view(&mut scene, &PlanView::default(), Affine::IDENTITY, Bounds::new(-10.0, -10.0, 50.0, 50.0), 20.0);
        paint_view(&mut scene, &PlanView::default(), Affine::IDENTITY, Bounds::new(0.0, 0.0, 50.0, 50.0), 0.0);
    }
}
