//! Pointer interaction state machine.
//!
//! Exactly one [`Gesture`] is active at a time. Pointer events are
//! translated into [`EditorMutation`]s that the
//! [`EditorSession`](crate::session::EditorSession) applies to the store
//! and viewport; the machine itself never mutates the store.
//!
//! | State | Pointer down | Pointer move | Pointer up |
//! |-------|--------------|--------------|------------|
//! | `Idle` | select + drag, resize, rotate, or pan | - | - |
//! | `ToolArmed` | commit (constrained types only if valid) | move ghost | - |
//! | `Dragging` | - | move element | back to `Idle` |
//! | `Resizing` | - | move edges | back to `Idle` |
//! | `Rotating` | - | set angle | back to `Idle` |
//! | `PanningCanvas` | - | pan view | back to `Idle` |
//!
//! Drag and resize are computed from the gesture's start bounds and the
//! total pointer travel, so snapped gestures accumulate sub-grid motion
//! instead of stalling.

use crate::input::InputEvent;
use crate::viewport::Viewport;
use sp_core::catalog::{default_size, default_window_inset};
use sp_core::config::EditorConfig;
use sp_core::constraints::check_placement_with;
use sp_core::error::PlacementError;
use sp_core::geometry::{Bounds, ResizeHandle, normalize_degrees, pointer_angle, snap, snap_angle};
use sp_core::id::ElementId;
use sp_core::labels::LabelProvider;
use sp_core::model::{ElementPatch, ElementType, GhostElement, SpatialElement};
use sp_core::store::ElementStore;
use sp_render::Hit;

/// The single active interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    Idle,
    ToolArmed(ElementType),
    Dragging {
        id: ElementId,
        start_x: f32,
        start_y: f32,
        origin: Bounds,
    },
    Resizing {
        id: ElementId,
        handle: ResizeHandle,
        start_x: f32,
        start_y: f32,
        origin: Bounds,
    },
    Rotating {
        id: ElementId,
    },
    /// Pan anchor in client pixels.
    PanningCanvas {
        last_x: f32,
        last_y: f32,
    },
}

/// A change requested by the interaction layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorMutation {
    Add(Box<SpatialElement>),
    Update { id: ElementId, patch: ElementPatch },
    Remove(ElementId),
    Select(Option<ElementId>),
    /// View offset change in client pixels.
    Pan { dx: f32, dy: f32 },
    /// A commit failed the placement rules; nothing was added.
    Rejected(PlacementError),
    /// Swap the whole element list.
    Replace(Vec<SpatialElement>),
}

/// Read-only inputs for one event.
pub struct InteractionContext<'a> {
    pub store: &'a ElementStore,
    pub viewport: &'a Viewport,
    pub config: &'a EditorConfig,
    pub labels: &'a dyn LabelProvider,
    /// What lies under the pointer, for pointer-down events.
    pub hit: Option<Hit>,
}

impl InteractionContext<'_> {
    fn snapped(&self, x: f32, y: f32) -> (f32, f32) {
        if self.config.snap_to_grid {
            (snap(x, self.config.grid_size), snap(y, self.config.grid_size))
        } else {
            (x, y)
        }
    }

    fn grid(&self) -> Option<f32> {
        self.config.snap_to_grid.then_some(self.config.grid_size)
    }
}

pub struct Interaction {
    gesture: Gesture,
    ghost: Option<GhostElement>,
    /// Hand tool: every pointer-down pans.
    hand: bool,
}

impl Default for Interaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Interaction {
    #[must_use]
    pub fn new() -> Self {
        Self {
            gesture: Gesture::Idle,
            ghost: None,
            hand: false,
        }
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn ghost(&self) -> Option<&GhostElement> {
        self.ghost.as_ref()
    }

    pub fn armed_tool(&self) -> Option<ElementType> {
        match self.gesture {
            Gesture::ToolArmed(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn hand(&self) -> bool {
        self.hand
    }

    pub fn set_hand(&mut self, hand: bool) {
        self.hand = hand;
    }

    /// Arm a placement tool. Any running gesture is abandoned.
    pub fn arm(&mut self, ty: ElementType) {
        log::debug!("interaction: arm {}", ty.key());
        self.gesture = Gesture::ToolArmed(ty);
        self.ghost = None;
        self.hand = false;
    }

    /// Back to `Idle` with no ghost.
    pub fn cancel(&mut self) {
        self.gesture = Gesture::Idle;
        self.ghost = None;
    }

    /// Finish a drag, resize, rotate, or pan. An armed tool stays armed.
    pub fn end_gesture(&mut self) {
        if !matches!(self.gesture, Gesture::ToolArmed(_)) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Drop any gesture that targets `id` (the element is gone).
    pub fn forget(&mut self, id: ElementId) {
        let targets = match self.gesture {
            Gesture::Dragging { id: g, .. } | Gesture::Resizing { id: g, .. } | Gesture::Rotating { id: g } => g == id,
            _ => false,
        };
        if targets {
            self.gesture = Gesture::Idle;
        }
    }

    pub fn handle(&mut self, event: &InputEvent, ctx: &InteractionContext<'_>) -> Vec<EditorMutation> {
        match event {
            InputEvent::PointerDown { x, y, .. } => self.pointer_down(*x, *y, ctx),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(*x, *y, ctx),
            InputEvent::PointerUp { .. } => {
                self.end_gesture();
                vec![]
            }
            InputEvent::PointerLeave => {
                self.ghost = None;
                vec![]
            }
            InputEvent::Scroll { .. } | InputEvent::Key { .. } => vec![],
        }
    }

    // ─── Pointer down ────────────────────────────────────────────────────

    fn pointer_down(&mut self, cx: f32, cy: f32, ctx: &InteractionContext<'_>) -> Vec<EditorMutation> {
        let (px, py) = ctx.viewport.screen_to_plan(cx, cy);
        match self.gesture {
            Gesture::ToolArmed(ty) => {
                let (x, y) = ctx.snapped(px, py);
                match place(ty, x, y, ctx) {
                    Ok(element) => {
                        let id = element.id;
                        log::debug!("interaction: commit {} {id} at ({x}, {y})", ty.key());
                        self.cancel();
                        vec![EditorMutation::Add(Box::new(element)), EditorMutation::Select(Some(id))]
                    }
                    Err(err) => {
                        log::warn!("interaction: rejected {err}");
                        vec![EditorMutation::Rejected(err)]
                    }
                }
            }
            Gesture::Idle if self.hand => {
                self.gesture = Gesture::PanningCanvas { last_x: cx, last_y: cy };
                vec![]
            }
            Gesture::Idle => match ctx.hit {
                Some(Hit::Handle(id, handle)) => match ctx.store.get(id) {
                    Some(el) => {
                        self.gesture = Gesture::Resizing {
                            id,
                            handle,
                            start_x: px,
                            start_y: py,
                            origin: el.bounds(),
                        };
                        vec![]
                    }
                    None => vec![],
                },
                Some(Hit::Rotate(id)) => {
                    self.gesture = Gesture::Rotating { id };
                    vec![]
                }
                Some(Hit::Element(id)) => match ctx.store.get(id) {
                    Some(el) => {
                        self.gesture = Gesture::Dragging {
                            id,
                            start_x: px,
                            start_y: py,
                            origin: el.bounds(),
                        };
                        vec![EditorMutation::Select(Some(id))]
                    }
                    None => vec![],
                },
                None => {
                    self.gesture = Gesture::PanningCanvas { last_x: cx, last_y: cy };
                    if ctx.store.selected().is_some() {
                        vec![EditorMutation::Select(None)]
                    } else {
                        vec![]
                    }
                }
            },
            // Another gesture is in flight.
            _ => vec![],
        }
    }

    // ─── Pointer move ────────────────────────────────────────────────────

    fn pointer_move(&mut self, cx: f32, cy: f32, ctx: &InteractionContext<'_>) -> Vec<EditorMutation> {
        let (px, py) = ctx.viewport.screen_to_plan(cx, cy);
        match self.gesture {
            Gesture::Idle => vec![],
            Gesture::ToolArmed(ty) => {
                let (x, y) = ctx.snapped(px, py);
                self.ghost = Some(ghost_at(ty, x, y, ctx));
                vec![]
            }
            Gesture::Dragging {
                id,
                start_x,
                start_y,
                origin,
            } => {
                let (x, y) = ctx.snapped(origin.x + (px - start_x), origin.y + (py - start_y));
                log::trace!("drag {id} → ({x}, {y})");
                vec![EditorMutation::Update {
                    id,
                    patch: ElementPatch::position(x, y),
                }]
            }
            Gesture::Resizing {
                id,
                handle,
                start_x,
                start_y,
                origin,
            } => {
                let bounds = resize_bounds(
                    &origin,
                    handle,
                    px - start_x,
                    py - start_y,
                    ctx.grid(),
                    ctx.config.min_extent,
                );
                log::trace!("resize {id} {} → {bounds:?}", handle.as_str());
                vec![EditorMutation::Update {
                    id,
                    patch: ElementPatch::bounds(bounds),
                }]
            }
            Gesture::Rotating { id } => {
                let Some(el) = ctx.store.get(id) else {
                    return vec![];
                };
                let (ecx, ecy) = el.center();
                let rotation = rotation_for(pointer_angle(ecx, ecy, px, py), ctx.config);
                log::trace!("rotate {id} → {rotation}°");
                vec![EditorMutation::Update {
                    id,
                    patch: ElementPatch::rotation(rotation),
                }]
            }
            Gesture::PanningCanvas { last_x, last_y } => {
                self.gesture = Gesture::PanningCanvas { last_x: cx, last_y: cy };
                vec![EditorMutation::Pan {
                    dx: cx - last_x,
                    dy: cy - last_y,
                }]
            }
        }
    }
}

// ─── Placement ──────────────────────────────────────────────────────────────

/// Build the element a commit at `(x, y)` would add, or the rule it breaks.
///
/// New elements get a fresh id, the type's default size, and a numbered
/// default name. Windows are attached to their containing wall with the
/// default top and bottom insets.
pub fn place(
    ty: ElementType,
    x: f32,
    y: f32,
    ctx: &InteractionContext<'_>,
) -> Result<SpatialElement, PlacementError> {
    let size = default_size(ty);
    let bounds = Bounds::new(x, y, size.width, size.height);
    let placement = check_placement_with(ty, &bounds, ctx.store.elements(), ctx.config.door_tolerance)?;

    let mut element = SpatialElement::new(ty, bounds, size.depth);
    element.name = Some(ctx.store.next_name(ty, ctx.labels));
    if let Some(wall_id) = placement.parent_wall
        && let Some(wall) = ctx.store.get(wall_id)
    {
        let inset = default_window_inset(wall.depth);
        element.parent_wall_id = Some(wall_id);
        element.window_top_distance = Some(inset);
        element.window_bottom_distance = Some(inset);
    }
    Ok(element)
}

fn ghost_at(ty: ElementType, x: f32, y: f32, ctx: &InteractionContext<'_>) -> GhostElement {
    let size = default_size(ty);
    let bounds = Bounds::new(x, y, size.width, size.height);
    let valid = check_placement_with(ty, &bounds, ctx.store.elements(), ctx.config.door_tolerance).is_ok();
    GhostElement {
        element_type: ty,
        x,
        y,
        width: size.width,
        height: size.height,
        depth: size.depth,
        rotation: 0.0,
        valid,
    }
}

// ─── Geometry of gestures ───────────────────────────────────────────────────

/// Resize `origin` by a total pointer travel of `(dx, dy)`.
///
/// Right and bottom edges follow the pointer (extent snapped to the grid).
/// Left and top edges move with the pointer (position snapped) while the
/// opposite edge stays put, stopping `min_extent` short of it. Final
/// extents never drop below `min_extent`.
pub fn resize_bounds(
    origin: &Bounds,
    handle: ResizeHandle,
    dx: f32,
    dy: f32,
    grid: Option<f32>,
    min_extent: f32,
) -> Bounds {
    let (x, width) = resize_axis(
        origin.x,
        origin.width,
        dx,
        handle.moves_left(),
        handle.moves_right(),
        grid,
        min_extent,
    );
    let (y, height) = resize_axis(
        origin.y,
        origin.height,
        dy,
        handle.moves_top(),
        handle.moves_bottom(),
        grid,
        min_extent,
    );
    Bounds::new(x, y, width.max(min_extent), height.max(min_extent))
}

fn resize_axis(
    start: f32,
    extent: f32,
    delta: f32,
    moves_start: bool,
    moves_end: bool,
    grid: Option<f32>,
    min_extent: f32,
) -> (f32, f32) {
    if moves_end {
        let mut grown = extent + delta;
        if let Some(g) = grid {
            grown = snap(grown, g);
        }
        (start, grown)
    } else if moves_start {
        let end = start + extent;
        let mut moved = start + delta;
        if let Some(g) = grid {
            moved = snap(moved, g);
        }
        // The far edge is pinned; the moving edge stops `min_extent` short of it.
        moved = moved.min(end - min_extent);
        (moved, end - moved)
    } else {
        (start, extent)
    }
}

/// Pointer angle → stored rotation: snapped to the rotation step when grid
/// snapping is on, always in `[0, 360)`.
pub fn rotation_for(angle: f32, config: &EditorConfig) -> f32 {
    if config.snap_to_grid {
        snap_angle(angle, config.rotation_step)
    } else {
        normalize_degrees(angle)
    }
}
