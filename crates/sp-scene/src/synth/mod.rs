//! Element → part tree synthesis.
//!
//! One synthesizer per [`ElementType`], looked up through a
//! [`SynthRegistry`]. Every synthesizer builds around the footprint center
//! at floor level and never bakes the element's rotation into offsets;
//! that lives in the object transform.
//!
//! | Module          | Types                                                     |
//! |-----------------|-----------------------------------------------------------|
//! | `structure`     | wall, door, window, line, rectangle, circle               |
//! | `fixtures`      | shelf, rack, display, table, gondola, planogram, cube, counter, cashier |
//! | `cold`          | fridge, dairy_fridge                                      |
//! | `furnishings`   | chair, sofa, bed, plant, mannequin                        |

mod cold;
mod fixtures;
mod furnishings;
mod structure;

pub use structure::window_opening;

use crate::part::{Part, PartTree};
use sp_core::catalog::element_color;
use sp_core::model::{ElementType, SpatialElement};
use sp_core::store::ElementStore;
use std::collections::HashMap;

/// What a synthesizer may know beyond the element itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct SynthContext<'a> {
    /// The live wall a window is cut into, if any.
    pub parent_wall: Option<&'a SpatialElement>,
}

impl<'a> SynthContext<'a> {
    /// Resolve the element's references against the store.
    pub fn for_element(el: &SpatialElement, store: &'a ElementStore) -> Self {
        let parent_wall = match el.element_type {
            ElementType::Window => store.parent_wall(el.id),
            _ => None,
        };
        Self { parent_wall }
    }
}

pub type SynthFn = fn(&SpatialElement, &SynthContext<'_>) -> PartTree;

/// Per-type synthesizer table.
pub struct SynthRegistry {
    entries: HashMap<ElementType, SynthFn>,
}

impl SynthRegistry {
    /// An empty registry; every type falls back to a plain box.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Registry with the built-in synthesizer for every element type.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for ty in ElementType::ALL {
            registry.register(ty, default_synth(ty));
        }
        registry
    }

    /// Install (or replace) the synthesizer for `ty`.
    pub fn register(&mut self, ty: ElementType, synth: SynthFn) {
        self.entries.insert(ty, synth);
    }

    pub fn get(&self, ty: ElementType) -> Option<SynthFn> {
        self.entries.get(&ty).copied()
    }

    pub fn synthesize(&self, el: &SpatialElement, ctx: &SynthContext<'_>) -> PartTree {
        match self.get(el.element_type) {
            Some(synth) => synth(el, ctx),
            None => {
                log::warn!("no synthesizer for {}, using a plain box", el.element_type.key());
                plain_box(el, ctx)
            }
        }
    }
}

impl Default for SynthRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_synth(ty: ElementType) -> SynthFn {
    match ty {
        ElementType::Wall => structure::wall,
        ElementType::Door => structure::door,
        ElementType::Window => structure::window,
        ElementType::Line => structure::line,
        ElementType::Rectangle => structure::rectangle,
        ElementType::Circle => structure::circle,
        ElementType::Shelf => fixtures::shelf,
        ElementType::Rack => fixtures::rack,
        ElementType::Display => fixtures::display,
        ElementType::Table => fixtures::table,
        ElementType::Gondola => fixtures::gondola,
        ElementType::Planogram => fixtures::planogram,
        ElementType::Cube => fixtures::cube,
        ElementType::Counter => fixtures::counter,
        ElementType::Cashier => fixtures::cashier,
        ElementType::Fridge => cold::fridge,
        ElementType::DairyFridge => cold::dairy_fridge,
        ElementType::Chair => furnishings::chair,
        ElementType::Sofa => furnishings::sofa,
        ElementType::Bed => furnishings::bed,
        ElementType::Plant => furnishings::plant,
        ElementType::Mannequin => furnishings::mannequin,
    }
}

/// `w × d × h` box in the type's catalogue color.
pub fn plain_box(el: &SpatialElement, _: &SynthContext<'_>) -> PartTree {
    let (w, h, d) = dims(el);
    let mut tree = PartTree::new(el.element_type.key());
    tree.push(
        Part::cuboid("body", w, d, h)
            .at(0.0, d / 2.0, 0.0)
            .color(element_color(el.element_type)),
    );
    tree
}

// ─── Shared helpers ──────────────────────────────────────────────────────

/// `(width, height, depth)`: plan width, plan height (world Z extent),
/// vertical extent.
pub(crate) fn dims(el: &SpatialElement) -> (f32, f32, f32) {
    (el.width, el.height, el.depth)
}

/// `v - by`, floored at zero.
pub(crate) fn less(v: f32, by: f32) -> f32 {
    (v - by).max(0.0)
}

/// Push a copy of `part` at each footprint corner, pulled in by `inset`.
/// Order: back-left, front-left, back-right, front-right.
pub(crate) fn four_corners(tree: &mut PartTree, w: f32, h: f32, inset: f32, y: f32, part: &Part) {
    for sx in [-1.0, 1.0] {
        for sz in [-1.0, 1.0] {
            tree.push(
                part.clone()
                    .at(sx * (w / 2.0 - inset), y, sz * (h / 2.0 - inset)),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sp_core::catalog::default_size;
    use sp_core::geometry::Bounds;

    fn catalogue_element(ty: ElementType) -> SpatialElement {
        let size = default_size(ty);
        SpatialElement::new(ty, Bounds::new(40.0, 60.0, size.width, size.height), size.depth)
    }

    #[test]
    fn every_type_has_a_synthesizer() {
        let registry = SynthRegistry::with_defaults();
        for ty in ElementType::ALL {
            assert!(registry.get(ty).is_some(), "{ty:?}");
            let tree = registry.synthesize(&catalogue_element(ty), &SynthContext::default());
            assert!(tree.len() > 1, "{ty:?} produced an empty tree");
        }
    }

    #[test]
    fn synthesized_objects_stand_on_the_floor() {
        let registry = SynthRegistry::with_defaults();
        for ty in ElementType::ALL {
            let tree = registry.synthesize(&catalogue_element(ty), &SynthContext::default());
            let (low, _) = tree.vertical_extent();
            assert!(low >= -1e-3, "{ty:?} dips below the floor: {low}");
        }
    }

    #[test]
    fn resynthesis_is_identical() {
        let registry = SynthRegistry::with_defaults();
        for ty in ElementType::ALL {
            let el = catalogue_element(ty);
            let first = registry.synthesize(&el, &SynthContext::default()).to_node();
            let second = registry.synthesize(&el, &SynthContext::default()).to_node();
            assert_eq!(first, second, "{ty:?}");
        }
    }

    #[test]
    fn rotation_is_not_baked_into_parts() {
        let registry = SynthRegistry::with_defaults();
        let mut el = catalogue_element(ElementType::Shelf);
        let straight = registry.synthesize(&el, &SynthContext::default()).to_node();
        el.rotation = 90.0;
        let turned = registry.synthesize(&el, &SynthContext::default()).to_node();
        assert_eq!(straight, turned);
    }

    #[test]
    fn missing_entry_falls_back_to_a_box() {
        let registry = SynthRegistry::new();
        let tree = registry.synthesize(&catalogue_element(ElementType::Sofa), &SynthContext::default());
        assert_eq!(tree.name(), "sofa");
        assert_eq!(tree.count("body"), 1);
    }

    #[test]
    fn window_context_resolves_through_the_store() {
        let mut store = ElementStore::new();
        let wall = store.add(SpatialElement::new(ElementType::Wall, Bounds::new(0.0, 0.0, 200.0, 10.0), 250.0));
        let mut window = SpatialElement::new(ElementType::Window, Bounds::new(50.0, 0.0, 100.0, 10.0), 10.0);
        window.parent_wall_id = Some(wall);
        let window = store.add(window);

        let el = store.get(window).unwrap();
        let ctx = SynthContext::for_element(el, &store);
        assert_eq!(ctx.parent_wall.map(|w| w.id), Some(wall));

        store.remove(wall);
        let el = store.get(window).unwrap();
        assert!(SynthContext::for_element(el, &store).parent_wall.is_none());
    }
}
