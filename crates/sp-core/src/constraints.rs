//! Placement rules for openings.
//!
//! - **Door**: must sit against a wall. The gap between facing edges on one
//!   axis is below [`DOOR_TOLERANCE`] while the spans strictly overlap on
//!   the other axis. Overlapping rectangles have a negative gap and count
//!   as touching.
//! - **Window**: must lie fully inside a wall's rectangle (edges inclusive).
//!   The first containing wall becomes the window's parent.
//!
//! Every other element type always passes. The checks are pure and only
//! run at ghost-preview time and at commit; nothing re-validates placed
//! openings later.

use crate::error::PlacementError;
use crate::geometry::Bounds;
use crate::id::ElementId;
use crate::model::{ElementType, SpatialElement};

/// Maximum edge gap, in plan units, for a door to count as touching.
pub const DOOR_TOLERANCE: f32 = 5.0;

/// Outcome of a successful placement check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Containing wall, set only for windows.
    pub parent_wall: Option<ElementId>,
}

fn walls(existing: &[SpatialElement]) -> impl Iterator<Item = &SpatialElement> {
    existing
        .iter()
        .filter(|el| el.element_type == ElementType::Wall)
}

/// Signed gap between two intervals: negative when they overlap.
fn interval_gap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> f32 {
    (a_start - b_end).max(b_start - a_end)
}

/// Strict overlap of two intervals (shared endpoints do not count).
fn spans_overlap(a_start: f32, a_end: f32, b_start: f32, b_end: f32) -> bool {
    a_start < b_end && b_start < a_end
}

/// True if `door` touches `wall` within `tolerance`.
pub fn door_touches_wall(door: &Bounds, wall: &Bounds, tolerance: f32) -> bool {
    let gap_x = interval_gap(door.x, door.right(), wall.x, wall.right());
    let gap_y = interval_gap(door.y, door.bottom(), wall.y, wall.bottom());
    let touches_horizontally =
        gap_x < tolerance && spans_overlap(door.y, door.bottom(), wall.y, wall.bottom());
    let touches_vertically =
        gap_y < tolerance && spans_overlap(door.x, door.right(), wall.x, wall.right());
    touches_horizontally || touches_vertically
}

/// First wall whose rectangle fully contains `candidate`.
pub fn find_parent_wall(candidate: &Bounds, existing: &[SpatialElement]) -> Option<ElementId> {
    walls(existing)
        .find(|wall| wall.bounds().contains_bounds(candidate))
        .map(|wall| wall.id)
}

/// Predicate form: can an element of `ty` be placed at the given rectangle?
pub fn can_place(
    ty: ElementType,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    existing: &[SpatialElement],
) -> bool {
    check_placement(ty, &Bounds::new(x, y, width, height), existing).is_ok()
}

/// Commit-path check, returning the window's parent wall on success.
pub fn check_placement(
    ty: ElementType,
    candidate: &Bounds,
    existing: &[SpatialElement],
) -> Result<Placement, PlacementError> {
    check_placement_with(ty, candidate, existing, DOOR_TOLERANCE)
}

/// [`check_placement`] with an explicit door tolerance.
pub fn check_placement_with(
    ty: ElementType,
    candidate: &Bounds,
    existing: &[SpatialElement],
    door_tolerance: f32,
) -> Result<Placement, PlacementError> {
    match ty {
        ElementType::Door => {
            let touches = walls(existing)
                .any(|wall| door_touches_wall(candidate, &wall.bounds(), door_tolerance));
            if touches {
                Ok(Placement { parent_wall: None })
            } else {
                Err(PlacementError::DoorNeedsWall {
                    x: candidate.x,
                    y: candidate.y,
                })
            }
        }
        ElementType::Window => match find_parent_wall(candidate, existing) {
            Some(wall) => Ok(Placement {
                parent_wall: Some(wall),
            }),
            None => Err(PlacementError::WindowNeedsWall {
                x: candidate.x,
                y: candidate.y,
            }),
        },
        _ => Ok(Placement { parent_wall: None }),
    }
}
