//! Hit testing: plan point → box, handle, or rotate knob.
//!
//! Reverse-walks the plan view (front-to-back) so the topmost box wins.
//! Points are mapped into each box's unrotated frame before the bounds
//! test, so rotated elements hit where they are drawn.

use crate::presentation::{HANDLE_SIZE, PlanBox, PlanView};
use sp_core::geometry::ResizeHandle;
use sp_core::id::ElementId;

/// What a pointer landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    /// Resize handle of the selected box.
    Handle(ElementId, ResizeHandle),
    /// Rotate knob of the selected box.
    Rotate(ElementId),
    /// Body of a box.
    Element(ElementId),
}

impl Hit {
    pub fn id(&self) -> ElementId {
        match *self {
            Self::Handle(id, _) | Self::Rotate(id) | Self::Element(id) => id,
        }
    }
}

/// Find the topmost box at (px, py) in plan space.
pub fn hit_test(view: &PlanView, px: f32, py: f32) -> Option<ElementId> {
    view.boxes
        .iter()
        .rev()
        .find(|b| box_contains(b, px, py))
        .map(|b| b.id)
}

/// Full hit test: the selected box's handles take priority over bodies.
/// `tolerance` widens handle targets (pass `HANDLE_SIZE / zoom` so
/// handles stay the same size on screen).
pub fn hit_test_with_handles(view: &PlanView, px: f32, py: f32, tolerance: f32) -> Option<Hit> {
    if let Some(selected) = view.selected() {
        let (rx, ry) = selected.rotate_handle();
        if near(rx, ry, px, py, tolerance) {
            return Some(Hit::Rotate(selected.id));
        }
        if let Some((handle, _)) = selected
            .handles()
            .into_iter()
            .find(|(_, (hx, hy))| near(*hx, *hy, px, py, tolerance))
        {
            return Some(Hit::Handle(selected.id, handle));
        }
    }
    hit_test(view, px, py).map(Hit::Element)
}

fn box_contains(b: &PlanBox, px: f32, py: f32) -> bool {
    let (lx, ly) = b.to_local(px, py);
    b.bounds.contains(lx, ly)
}

fn near(hx: f32, hy: f32, px: f32, py: f32, tolerance: f32) -> bool {
    let reach = HANDLE_SIZE / 2.0 + tolerance;
    (px - hx).abs() <= reach && (py - hy).abs() <= reach
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::build_view;
    use sp_core::geometry::Bounds;
    use sp_core::labels::StaticLabels;
    use sp_core::model::{ElementType, SpatialElement};
    use sp_core::store::ElementStore;
    use sp_core::units::UnitSystem;

    fn view_of(elements: Vec<SpatialElement>, selected: Option<&str>) -> PlanView {
        let mut store = ElementStore::from_elements(elements);
        if let Some(id) = selected {
            store.select(ElementId::intern(id));
        }
        build_view(&store, None, &StaticLabels::default(), UnitSystem::Centimeters)
    }

    fn el(id: &str, x: f32, y: f32, w: f32, h: f32, rotation: f32) -> SpatialElement {
        let mut e = SpatialElement::new(ElementType::Table, Bounds::new(x, y, w, h), 30.0);
        e.id = ElementId::intern(id);
        e.rotation = rotation;
        e
    }

    #[test]
    fn topmost_box_wins() {
        let view = view_of(
            vec![el("h-under", 0.0, 0.0, 100.0, 100.0, 0.0), el("h-over", 50.0, 50.0, 100.0, 100.0, 0.0)],
            None,
        );
        assert_eq!(hit_test(&view, 75.0, 75.0), Some(ElementId::intern("h-over")));
        assert_eq!(hit_test(&view, 10.0, 10.0), Some(ElementId::intern("h-under")));
        assert_eq!(hit_test(&view, 500.0, 500.0), None);
    }

    #[test]
    fn selection_raises_box_for_hits() {
        let view = view_of(
            vec![el("hs-under", 0.0, 0.0, 100.0, 100.0, 0.0), el("hs-over", 50.0, 50.0, 100.0, 100.0, 0.0)],
            Some("hs-under"),
        );
        assert_eq!(hit_test(&view, 75.0, 75.0), Some(ElementId::intern("hs-under")));
    }

    #[test]
    fn rotated_box_hits_where_drawn() {
        // 100 × 10 bar rotated 90° about (50, 5) spans x 45..55, y -45..55.
        let view = view_of(vec![el("h-rot", 0.0, 0.0, 100.0, 10.0, 90.0)], None);
        assert_eq!(hit_test(&view, 50.0, 40.0), Some(ElementId::intern("h-rot")));
        assert_eq!(hit_test(&view, 90.0, 5.0), None);
    }

    #[test]
    fn handles_beat_bodies_for_selected_box() {
        let view = view_of(vec![el("h-sel", 0.0, 0.0, 100.0, 50.0, 0.0)], Some("h-sel"));
        assert_eq!(
            hit_test_with_handles(&view, 100.0, 25.0, 0.0),
            Some(Hit::Handle(ElementId::intern("h-sel"), ResizeHandle::Right))
        );
        assert_eq!(
            hit_test_with_handles(&view, 50.0, -24.0, 0.0),
            Some(Hit::Rotate(ElementId::intern("h-sel")))
        );
        assert_eq!(
            hit_test_with_handles(&view, 50.0, 25.0, 0.0),
            Some(Hit::Element(ElementId::intern("h-sel")))
        );
    }
}
