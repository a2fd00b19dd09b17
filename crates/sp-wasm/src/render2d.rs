//! Canvas2D painter for the plan view.
//!
//! Draws a [`PlanView`] to an HTML `<canvas>` through
//! `CanvasRenderingContext2d`. The viewport's pan and zoom become one
//! transform around everything; boxes are drawn in plan units inside it.

use sp_core::geometry::Bounds;
use sp_editor::Viewport;
use sp_render::presentation::{BoxShape, GhostBox, HANDLE_SIZE, PlanBox, SELECTION};
use sp_render::PlanView;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

pub struct CanvasTheme {
    pub bg: &'static str,
    pub grid: &'static str,
    pub label: &'static str,
    pub dimensions: &'static str,
}

impl CanvasTheme {
    pub fn light() -> Self {
        Self {
            bg: "#F8F8F8",
            grid: "#DDDDDD",
            label: "#111111",
            dimensions: "#555555",
        }
    }
}

/// Paint one frame.
pub fn render_plan(
    ctx: &CanvasRenderingContext2d,
    view: &PlanView,
    viewport: &Viewport,
    grid_size: f32,
    theme: &CanvasTheme,
) -> Result<(), JsValue> {
    let (w, h) = (viewport.width as f64, viewport.height as f64);
    ctx.set_fill_style_str(theme.bg);
    ctx.fill_rect(0.0, 0.0, w, h);

    ctx.save();
    ctx.translate(viewport.offset_x as f64, viewport.offset_y as f64)?;
    ctx.scale(viewport.zoom as f64, viewport.zoom as f64)?;

    draw_grid(ctx, viewport.visible_plan(), grid_size, viewport.zoom, theme);
    for item in &view.boxes {
        draw_box(ctx, item, theme)?;
    }
    if let Some(selected) = view.selected() {
        draw_handles(ctx, selected, viewport.zoom)?;
    }
    if let Some(ghost) = &view.ghost {
        draw_ghost(ctx, ghost)?;
    }

    ctx.restore();
    Ok(())
}

fn draw_grid(ctx: &CanvasRenderingContext2d, visible: Bounds, step: f32, zoom: f32, theme: &CanvasTheme) {
    // Below ~4px per cell the grid is noise.
    if step <= 0.0 || step * zoom < 4.0 {
        return;
    }
    ctx.set_stroke_style_str(theme.grid);
    ctx.set_line_width(1.0 / zoom as f64);
    ctx.begin_path();
    let mut x = (visible.x / step).floor() * step;
    while x <= visible.right() {
        ctx.move_to(x as f64, visible.y as f64);
        ctx.line_to(x as f64, visible.bottom() as f64);
        x += step;
    }
    let mut y = (visible.y / step).floor() * step;
    while y <= visible.bottom() {
        ctx.move_to(visible.x as f64, y as f64);
        ctx.line_to(visible.right() as f64, y as f64);
        y += step;
    }
    ctx.stroke();
}

/// Enter the box's rotated frame, origin at its center.
fn enter_box(ctx: &CanvasRenderingContext2d, bounds: &Bounds, rotation: f32) -> Result<(), JsValue> {
    let (cx, cy) = bounds.center();
    ctx.save();
    ctx.translate(cx as f64, cy as f64)?;
    ctx.rotate((rotation as f64).to_radians())
}

fn shape_path(ctx: &CanvasRenderingContext2d, shape: BoxShape, w: f64, h: f64) -> Result<(), JsValue> {
    ctx.begin_path();
    match shape {
        BoxShape::Rect => ctx.rect(-w / 2.0, -h / 2.0, w, h),
        BoxShape::Ellipse => ctx.ellipse(0.0, 0.0, w / 2.0, h / 2.0, 0.0, 0.0, std::f64::consts::TAU)?,
        BoxShape::Line => {
            ctx.move_to(-w / 2.0, 0.0);
            ctx.line_to(w / 2.0, 0.0);
        }
    }
    Ok(())
}

fn draw_box(ctx: &CanvasRenderingContext2d, item: &PlanBox, theme: &CanvasTheme) -> Result<(), JsValue> {
    let (w, h) = (item.bounds.width as f64, item.bounds.height as f64);
    enter_box(ctx, &item.bounds, item.rotation)?;

    let fill = item.fill.to_hex();
    shape_path(ctx, item.shape, w, h)?;
    if item.shape == BoxShape::Line {
        ctx.set_stroke_style_str(&fill);
        ctx.set_line_width(h.max(1.0));
        ctx.stroke();
    } else {
        ctx.set_fill_style_str(&fill);
        ctx.fill();
    }
    if item.selected {
        shape_path(ctx, item.shape, w, h)?;
        ctx.set_stroke_style_str(SELECTION);
        ctx.set_line_width(2.0);
        ctx.stroke();
    }

    // Text only where it fits.
    if w >= 30.0 && h >= 14.0 {
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.set_fill_style_str(theme.label);
        ctx.set_font("12px sans-serif");
        let label_y = if h >= 30.0 { -7.0 } else { 0.0 };
        ctx.fill_text(&item.label, 0.0, label_y)?;
        if h >= 30.0 {
            ctx.set_fill_style_str(theme.dimensions);
            ctx.set_font("10px sans-serif");
            ctx.fill_text(&item.dimensions, 0.0, 8.0)?;
        }
    }

    ctx.restore();
    Ok(())
}

fn draw_handles(ctx: &CanvasRenderingContext2d, item: &PlanBox, zoom: f32) -> Result<(), JsValue> {
    let size = (HANDLE_SIZE / zoom) as f64;
    ctx.set_fill_style_str("#FFFFFF");
    ctx.set_stroke_style_str(SELECTION);
    ctx.set_line_width(1.5 / zoom as f64);
    for (_, (x, y)) in item.handles() {
        let (x, y) = (x as f64 - size / 2.0, y as f64 - size / 2.0);
        ctx.fill_rect(x, y, size, size);
        ctx.stroke_rect(x, y, size, size);
    }

    let (rx, ry) = item.rotate_handle();
    ctx.begin_path();
    ctx.arc(rx as f64, ry as f64, size / 2.0, 0.0, std::f64::consts::TAU)?;
    ctx.fill();
    ctx.stroke();
    Ok(())
}

fn draw_ghost(ctx: &CanvasRenderingContext2d, ghost: &GhostBox) -> Result<(), JsValue> {
    let (w, h) = (ghost.bounds.width as f64, ghost.bounds.height as f64);
    enter_box(ctx, &ghost.bounds, 0.0)?;
    shape_path(ctx, ghost.shape, w, h)?;
    ctx.set_global_alpha(0.5);
    ctx.set_fill_style_str(&ghost.fill.to_hex());
    ctx.fill();
    ctx.set_global_alpha(1.0);

    let dash = js_sys::Array::of2(&JsValue::from_f64(6.0), &JsValue::from_f64(4.0));
    ctx.set_line_dash(&dash)?;
    ctx.set_stroke_style_str(ghost.outline());
    ctx.set_line_width(2.0);
    ctx.stroke();
    ctx.restore();
    Ok(())
}
