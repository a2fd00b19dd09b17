//! The spatial element store: single source of truth for a plan.
//!
//! Elements live in a `Vec` in insertion order (that order is the z-order)
//! with an id → slot index kept beside it. Selection is a single optional
//! id. References between elements (a window's `parent_wall_id`) are
//! resolved through the index on demand, so a deleted wall simply resolves
//! to `None`.

use crate::catalog;
use crate::geometry::{Bounds, normalize_degrees};
use crate::id::ElementId;
use crate::labels::LabelProvider;
use crate::model::{ChangeSet, ElementPatch, ElementType, SpatialElement};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ElementStore {
    elements: Vec<SpatialElement>,
    index: HashMap<ElementId, usize>,
    selected: Option<ElementId>,
}

impl ElementStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an ordered element list (import, load).
    pub fn from_elements(elements: Vec<SpatialElement>) -> Self {
        let mut store = Self::new();
        store.replace_all(elements);
        store
    }

    // ─── Queries ─────────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// All elements in insertion order.
    pub fn elements(&self) -> &[SpatialElement] {
        &self.elements
    }

    pub fn get(&self, id: ElementId) -> Option<&SpatialElement> {
        self.index.get(&id).map(|&slot| &self.elements[slot])
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn selected(&self) -> Option<ElementId> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&SpatialElement> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Elements in paint order: insertion order, selected element last.
    pub fn render_order(&self) -> Vec<&SpatialElement> {
        let mut ordered: Vec<&SpatialElement> = self
            .elements
            .iter()
            .filter(|el| Some(el.id) != self.selected)
            .collect();
        if let Some(selected) = self.selected_element() {
            ordered.push(selected);
        }
        ordered
    }

    /// Resolve a window's wall. Stale or missing references give `None`.
    pub fn parent_wall(&self, window: ElementId) -> Option<&SpatialElement> {
        let wall_id = self.get(window)?.parent_wall_id?;
        self.get(wall_id)
            .filter(|el| el.element_type == ElementType::Wall)
    }

    pub fn count_of(&self, ty: ElementType) -> usize {
        self.elements
            .iter()
            .filter(|el| el.element_type == ty)
            .count()
    }

    /// Default display name for the next element of `ty`: `"<Label> <n>"`.
    pub fn next_name(&self, ty: ElementType, labels: &dyn LabelProvider) -> String {
        format!("{} {}", labels.element_label(ty), self.count_of(ty) + 1)
    }

    /// Axis-aligned bounds of every element, ignoring rotation.
    pub fn bounding_box(&self) -> Option<Bounds> {
        self.elements
            .iter()
            .map(SpatialElement::bounds)
            .reduce(|acc, b| acc.union(&b))
    }

    /// Midpoint of the plan's bounding box, `(0, 0)` for an empty plan.
    pub fn plan_center(&self) -> (f32, f32) {
        self.bounding_box()
            .map(|b| b.center())
            .unwrap_or((0.0, 0.0))
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Append an element. Returns its id. A duplicate id replaces nothing:
    /// the incoming element is re-keyed with a fresh id first.
    pub fn add(&mut self, mut element: SpatialElement) -> ElementId {
        if self.index.contains_key(&element.id) {
            let fresh = ElementId::generate();
            log::warn!("duplicate element id {}, re-keyed as {fresh}", element.id);
            element.id = fresh;
        }
        element.rotation = normalize_degrees(element.rotation);
        let id = element.id;
        self.index.insert(id, self.elements.len());
        self.elements.push(element);
        log::debug!("store: added {id} ({} total)", self.elements.len());
        id
    }

    /// Convenience for tools: a new element of `ty` at `bounds` with catalog
    /// depth and a default name.
    pub fn create(
        &mut self,
        ty: ElementType,
        bounds: Bounds,
        labels: &dyn LabelProvider,
    ) -> ElementId {
        let mut element = SpatialElement::new(ty, bounds, catalog::default_size(ty).depth);
        element.name = Some(self.next_name(ty, labels));
        self.add(element)
    }

    /// Patch an element in place. `None` when the id is unknown.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> Option<ChangeSet> {
        let slot = *self.index.get(&id)?;
        let changes = self.elements[slot].apply(patch);
        if !changes.is_empty() {
            log::trace!("store: updated {id} {changes:?}");
        }
        Some(changes)
    }

    /// Remove an element. Windows pointing at a removed wall keep their
    /// geometry and their now-dangling `parent_wall_id`.
    pub fn remove(&mut self, id: ElementId) -> Option<SpatialElement> {
        let slot = self.index.remove(&id)?;
        let removed = self.elements.remove(slot);
        for (i, el) in self.elements.iter().enumerate().skip(slot) {
            self.index.insert(el.id, i);
        }
        if self.selected == Some(id) {
            self.selected = None;
        }
        log::debug!("store: removed {id}");
        Some(removed)
    }

    /// Select an element; unknown ids clear the selection.
    pub fn select(&mut self, id: ElementId) -> bool {
        if self.contains(id) {
            self.selected = Some(id);
            true
        } else {
            self.selected = None;
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Swap the whole element list (import). Clears the selection.
    pub fn replace_all(&mut self, elements: Vec<SpatialElement>) {
        self.elements.clear();
        self.index.clear();
        self.selected = None;
        for element in elements {
            self.add(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labels::{Locale, StaticLabels};
    use crate::model::ElementField;
    use pretty_assertions::assert_eq;

    fn element(id: &str, ty: ElementType, x: f32, y: f32, w: f32, h: f32) -> SpatialElement {
        let mut el = SpatialElement::new(ty, Bounds::new(x, y, w, h), 50.0);
        el.id = ElementId::intern(id);
        el
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = ElementStore::new();
        store.add(element("a", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        store.add(element("b", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        let ids: Vec<&str> = store.elements().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn add_wraps_rotation() {
        let mut store = ElementStore::new();
        let mut turned = element("turned", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0);
        turned.rotation = -45.0;
        let id = store.add(turned);
        assert_eq!(store.get(id).unwrap().rotation, 315.0);
    }

    #[test]
    fn duplicate_ids_are_rekeyed() {
        let mut store = ElementStore::new();
        store.add(element("dup", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        let second = store.add(element("dup", ElementType::Rack, 0.0, 0.0, 10.0, 10.0));
        assert_ne!(second.as_str(), "dup");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn selected_renders_last() {
        let mut store = ElementStore::new();
        let a = store.add(element("ra", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        store.add(element("rb", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        store.add(element("rc", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        store.select(a);
        let order: Vec<&str> = store.render_order().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["rb", "rc", "ra"]);
    }

    #[test]
    fn remove_reindexes_and_clears_selection() {
        let mut store = ElementStore::new();
        let a = store.add(element("xa", ElementType::Shelf, 0.0, 0.0, 10.0, 10.0));
        let b = store.add(element("xb", ElementType::Shelf, 5.0, 0.0, 10.0, 10.0));
        store.select(a);
        assert!(store.remove(a).is_some());
        assert_eq!(store.selected(), None);
        assert_eq!(store.get(b).map(|e| e.x), Some(5.0));
        assert!(store.remove(a).is_none());
    }

    #[test]
    fn update_unknown_id_is_none() {
        let mut store = ElementStore::new();
        assert!(
            store
                .update(ElementId::intern("ghost"), &ElementPatch::position(1.0, 1.0))
                .is_none()
        );
    }

    #[test]
    fn update_reports_changes() {
        let mut store = ElementStore::new();
        let id = store.add(element("u1", ElementType::Table, 0.0, 0.0, 10.0, 10.0));
        let changes = store.update(id, &ElementPatch::position(20.0, 0.0)).unwrap();
        assert!(changes.contains(ElementField::Position));
        assert_eq!(store.get(id).unwrap().x, 20.0);
    }

    #[test]
    fn orphaned_window_resolves_to_no_parent() {
        let mut store = ElementStore::new();
        let wall = store.add(element("ow-wall", ElementType::Wall, 0.0, 0.0, 200.0, 10.0));
        let mut win = element("ow-win", ElementType::Window, 50.0, 0.0, 100.0, 10.0);
        win.parent_wall_id = Some(wall);
        let win = store.add(win);
        assert_eq!(store.parent_wall(win).map(|w| w.id), Some(wall));

        store.remove(wall);
        let window = store.get(win).unwrap();
        assert_eq!(window.x, 50.0);
        assert_eq!(window.parent_wall_id, Some(wall));
        assert!(store.parent_wall(win).is_none());
    }

    #[test]
    fn next_name_counts_per_type() {
        let labels = StaticLabels::for_locale(Locale::Fr);
        let mut store = ElementStore::new();
        store.create(ElementType::Wall, Bounds::new(0.0, 0.0, 200.0, 10.0), &labels);
        store.create(ElementType::Shelf, Bounds::new(0.0, 0.0, 120.0, 40.0), &labels);
        assert_eq!(store.next_name(ElementType::Wall, &labels), "Mur 2");
        assert_eq!(store.next_name(ElementType::Door, &labels), "Porte 1");
    }

    #[test]
    fn plan_center_of_empty_store_is_origin() {
        assert_eq!(ElementStore::new().plan_center(), (0.0, 0.0));
    }

    #[test]
    fn plan_center_is_bbox_midpoint() {
        let mut store = ElementStore::new();
        store.add(element("c1", ElementType::Shelf, 0.0, 0.0, 100.0, 100.0));
        store.add(element("c2", ElementType::Shelf, 300.0, 200.0, 100.0, 100.0));
        assert_eq!(store.plan_center(), (200.0, 150.0));
    }
}
