//! Store → positioned boxes for the 2D plan.
//!
//! The plan view is a flat list of [`PlanBox`]es in paint order (selected
//! box last), plus an optional ghost preview. Box coordinates stay in plan
//! space; the host applies the viewport zoom and offset as one transform
//! around the whole surface.

use kurbo::{Affine, Point, Vec2};
use serde::Serialize;
use sp_core::catalog::element_color;
use sp_core::geometry::{Bounds, ResizeHandle};
use sp_core::id::ElementId;
use sp_core::labels::LabelProvider;
use sp_core::model::{Color, ElementType, GhostElement, SpatialElement};
use sp_core::store::ElementStore;
use sp_core::units::{UnitSystem, format_dimensions};

/// Side length of a square resize handle, in plan units.
pub const HANDLE_SIZE: f32 = 8.0;
/// Distance of the rotate handle above the element's top edge.
pub const ROTATE_HANDLE_OFFSET: f32 = 24.0;

/// Outline of a ghost that can be committed.
pub const GHOST_VALID: &str = "#22C55E";
/// Outline of a ghost that would be rejected.
pub const GHOST_INVALID: &str = "#EF4444";
/// Selection outline and handle color.
pub const SELECTION: &str = "#2563EB";

/// How a box is drawn inside its footprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxShape {
    Rect,
    Ellipse,
    /// Horizontal stroke through the vertical center.
    Line,
}

impl BoxShape {
    pub fn for_type(ty: ElementType) -> Self {
        match ty {
            ElementType::Circle | ElementType::Plant => Self::Ellipse,
            ElementType::Line => Self::Line,
            _ => Self::Rect,
        }
    }
}

/// One committed element as drawn on the plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanBox {
    pub id: ElementId,
    pub element_type: ElementType,
    pub bounds: Bounds,
    pub rotation: f32,
    pub fill: Color,
    pub shape: BoxShape,
    pub label: String,
    /// `"w × h × d"` in the display unit.
    pub dimensions: String,
    pub z_index: usize,
    pub selected: bool,
}

impl PlanBox {
    /// Plan-space transform that rotates the box about its center.
    pub fn transform(&self) -> Affine {
        let (cx, cy) = self.bounds.center();
        Affine::rotate_about(
            (self.rotation as f64).to_radians(),
            Point::new(cx as f64, cy as f64),
        )
    }

    /// Map a box-local, unrotated plan point through the rotation.
    pub fn to_plan(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.transform() * Point::new(x as f64, y as f64);
        (p.x as f32, p.y as f32)
    }

    /// Inverse of [`PlanBox::to_plan`].
    pub fn to_local(&self, x: f32, y: f32) -> (f32, f32) {
        let p = self.transform().inverse() * Point::new(x as f64, y as f64);
        (p.x as f32, p.y as f32)
    }

    /// Resize handle anchors in plan space (rotated with the box).
    pub fn handles(&self) -> Vec<(ResizeHandle, (f32, f32))> {
        ResizeHandle::ALL
            .into_iter()
            .map(|h| {
                let (x, y) = h.anchor(&self.bounds);
                (h, self.to_plan(x, y))
            })
            .collect()
    }

    /// Rotate handle position, above the top edge's midpoint.
    pub fn rotate_handle(&self) -> (f32, f32) {
        let (cx, _) = self.bounds.center();
        let t = self.transform();
        let p = t * (Point::new(cx as f64, self.bounds.y as f64)
            - Vec2::new(0.0, ROTATE_HANDLE_OFFSET as f64));
        (p.x as f32, p.y as f32)
    }
}

/// The non-committed placement preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostBox {
    pub element_type: ElementType,
    pub bounds: Bounds,
    pub fill: Color,
    pub shape: BoxShape,
    pub valid: bool,
}

impl GhostBox {
    pub fn outline(&self) -> &'static str {
        if self.valid { GHOST_VALID } else { GHOST_INVALID }
    }
}

/// Everything the 2D surface draws for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanView {
    pub boxes: Vec<PlanBox>,
    pub ghost: Option<GhostBox>,
}

impl PlanView {
    pub fn selected(&self) -> Option<&PlanBox> {
        self.boxes.iter().rev().find(|b| b.selected)
    }

    pub fn get(&self, id: ElementId) -> Option<&PlanBox> {
        self.boxes.iter().find(|b| b.id == id)
    }
}

/// Build a single box for an element.
pub fn plan_box(
    element: &SpatialElement,
    z_index: usize,
    selected: bool,
    labels: &dyn LabelProvider,
    unit: UnitSystem,
) -> PlanBox {
    PlanBox {
        id: element.id,
        element_type: element.element_type,
        bounds: element.bounds(),
        rotation: element.rotation,
        fill: element_color(element.element_type),
        shape: BoxShape::for_type(element.element_type),
        label: element
            .name
            .clone()
            .unwrap_or_else(|| labels.element_label(element.element_type)),
        dimensions: format_dimensions(element.width, element.height, element.depth, unit),
        z_index,
        selected,
    }
}

/// Build the plan view: boxes in paint order plus the ghost.
pub fn build_view(
    store: &ElementStore,
    ghost: Option<&GhostElement>,
    labels: &dyn LabelProvider,
    unit: UnitSystem,
) -> PlanView {
    let selected = store.selected();
    let boxes = store
        .render_order()
        .into_iter()
        .enumerate()
        .map(|(z, el)| plan_box(el, z, Some(el.id) == selected, labels, unit))
        .collect();

    let ghost = ghost.map(|g| GhostBox {
        element_type: g.element_type,
        bounds: g.bounds(),
        fill: element_color(g.element_type).with_alpha(0.5),
        shape: BoxShape::for_type(g.element_type),
        valid: g.valid,
    });

    PlanView { boxes, ghost }
}
