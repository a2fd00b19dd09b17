//! The live 3D scene.
//!
//! A [`SceneSession`] exists while the 3D view is mounted. It keeps exactly
//! one [`SceneObject`] per store element and follows the store through the
//! [`StoreChange`] stream: moves and turns touch only the transform, size
//! changes re-synthesize, imports rebuild everything.

use crate::part::{PartNode, PartTree};
use crate::synth::{SynthContext, SynthRegistry};
use crate::transform::{CameraPose, ObjectTransform};
use serde::Serialize;
use sp_core::change::StoreChange;
use sp_core::id::ElementId;
use sp_core::model::{ChangeSet, ElementField, ElementType, SpatialElement};
use sp_core::store::ElementStore;
use std::collections::HashMap;

/// One element's 3D counterpart.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub tree: PartTree,
    pub transform: ObjectTransform,
}

pub struct SceneSession {
    objects: HashMap<ElementId, SceneObject>,
    registry: SynthRegistry,
    camera: CameraPose,
}

impl SceneSession {
    /// Mount: synthesize every element and aim at the plan center.
    pub fn new(store: &ElementStore) -> Self {
        Self::with_registry(store, SynthRegistry::with_defaults())
    }

    pub fn with_registry(store: &ElementStore, registry: SynthRegistry) -> Self {
        let mut session = Self {
            objects: HashMap::new(),
            registry,
            camera: CameraPose::looking_at(store.plan_center()),
        };
        session.rebuild(store);
        session
    }

    pub fn get(&self, id: ElementId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    pub fn set_camera(&mut self, camera: CameraPose) {
        self.camera = camera;
    }

    // ─── Change dispatch ─────────────────────────────────────────────────

    /// Bring the scene in line with one store change. `store` is the state
    /// after the change.
    pub fn apply(&mut self, change: &StoreChange, store: &ElementStore) {
        match change {
            StoreChange::Added(id) => {
                if !self.contains(*id) {
                    self.insert(*id, store);
                }
            }
            StoreChange::Updated { id, changes } => self.update(*id, changes, store),
            StoreChange::Removed(id) => {
                if self.objects.remove(id).is_some() {
                    log::debug!("scene: dropped {id}");
                }
                // Windows cut into a removed wall fall back to their own depth.
                self.resynthesize_windows_of(*id, store);
            }
            StoreChange::Replaced => {
                self.teardown();
                self.rebuild(store);
                self.camera = CameraPose::framing(store.bounding_box(), store.plan_center());
            }
        }
    }

    fn update(&mut self, id: ElementId, changes: &ChangeSet, store: &ElementStore) {
        let Some(el) = store.get(id) else {
            log::warn!("scene: update for unknown element {id}");
            return;
        };
        if changes.needs_resynthesis() || !self.contains(id) {
            self.insert(id, store);
            if el.element_type == ElementType::Wall {
                self.resynthesize_windows_of(id, store);
            }
            return;
        }
        if let Some(object) = self.objects.get_mut(&id) {
            if changes.contains(ElementField::Position) {
                object.transform.recenter(el);
            }
            if changes.contains(ElementField::Rotation) {
                object.transform.yaw = crate::transform::plan_yaw(el.rotation);
            }
            log::trace!("scene: moved {id} to {:?}", object.transform);
        }
    }

    /// (Re)synthesize one element from the store, replacing any previous
    /// object.
    fn insert(&mut self, id: ElementId, store: &ElementStore) {
        let Some(el) = store.get(id) else {
            return;
        };
        let object = self.synthesize(el, store);
        log::debug!("scene: synthesized {id} ({} parts)", object.tree.len());
        self.objects.insert(id, object);
    }

    fn synthesize(&self, el: &SpatialElement, store: &ElementStore) -> SceneObject {
        let ctx = SynthContext::for_element(el, store);
        SceneObject {
            tree: self.registry.synthesize(el, &ctx),
            transform: ObjectTransform::for_element(el),
        }
    }

    fn resynthesize_windows_of(&mut self, wall: ElementId, store: &ElementStore) {
        let windows: Vec<ElementId> = store
            .elements()
            .iter()
            .filter(|el| el.element_type == ElementType::Window && el.parent_wall_id == Some(wall))
            .map(|el| el.id)
            .collect();
        for id in windows {
            self.insert(id, store);
        }
    }

    /// Drop every object.
    pub fn teardown(&mut self) {
        self.objects.clear();
    }

    /// Synthesize every store element that has no object yet.
    pub fn rebuild(&mut self, store: &ElementStore) {
        for el in store.elements() {
            if !self.contains(el.id) {
                let object = self.synthesize(el, store);
                self.objects.insert(el.id, object);
            }
        }
        log::debug!("scene: rebuilt {} objects", self.objects.len());
    }

    // ─── Hand-off ────────────────────────────────────────────────────────

    /// Serializable snapshot for the host renderer, in store order.
    pub fn describe(&self, store: &ElementStore) -> SceneDescription {
        let objects = store
            .elements()
            .iter()
            .filter_map(|el| {
                let object = self.objects.get(&el.id)?;
                Some(ObjectDescription {
                    id: el.id,
                    element_type: el.element_type,
                    transform: object.transform,
                    matrix: object.transform.matrix().to_cols_array(),
                    root: object.tree.to_node(),
                })
            })
            .collect();
        SceneDescription {
            camera: self.camera,
            objects,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescription {
    pub camera: CameraPose,
    pub objects: Vec<ObjectDescription>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDescription {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub transform: ObjectTransform,
    /// `transform` as a column-major 4×4 matrix.
    pub matrix: [f32; 16],
    pub root: PartNode,
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pretty_assertions::assert_eq;
    use sp_core::geometry::Bounds;
    use sp_core::model::ElementPatch;

    fn shelf_store() -> (ElementStore, ElementId) {
        let mut store = ElementStore::new();
        let id = store.add(SpatialElement::new(
            ElementType::Shelf,
            Bounds::new(0.0, 0.0, 120.0, 40.0),
            60.0,
        ));
        (store, id)
    }

    fn patch(store: &mut ElementStore, id: ElementId, patch: ElementPatch) -> StoreChange {
        let changes = store.update(id, &patch).unwrap();
        StoreChange::Updated { id, changes }
    }

    #[test]
    fn mount_synthesizes_everything() {
        let (store, id) = shelf_store();
        let scene = SceneSession::new(&store);
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.get(id).unwrap().transform.translation, Vec3::new(60.0, 0.0, 20.0));
        assert_eq!(scene.camera().target, Vec3::new(60.0, 0.0, 20.0));
        assert_eq!(scene.camera().position, Vec3::new(60.0, 200.0, 320.0));
    }

    #[test]
    fn move_translates_without_resynthesis() {
        let (mut store, id) = shelf_store();
        let mut scene = SceneSession::new(&store);
        scene.objects.get_mut(&id).unwrap().transform.translation.y = 7.0;
        let before = scene.get(id).unwrap().tree.to_node();

        let change = patch(&mut store, id, ElementPatch { x: Some(100.0), ..Default::default() });
        scene.apply(&change, &store);

        let object = scene.get(id).unwrap();
        assert_eq!(object.transform.translation, Vec3::new(160.0, 7.0, 20.0));
        assert_eq!(object.tree.to_node(), before);
    }

    #[test]
    fn rotation_sets_yaw_only() {
        let (mut store, id) = shelf_store();
        let mut scene = SceneSession::new(&store);
        let change = patch(&mut store, id, ElementPatch { rotation: Some(90.0), ..Default::default() });
        scene.apply(&change, &store);
        let object = scene.get(id).unwrap();
        assert!((object.transform.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(object.transform.translation, Vec3::new(60.0, 0.0, 20.0));
    }

    #[test]
    fn resize_rebuilds_the_tree() {
        let (mut store, id) = shelf_store();
        let mut scene = SceneSession::new(&store);
        let change = patch(&mut store, id, ElementPatch { depth: Some(90.0), ..Default::default() });
        scene.apply(&change, &store);
        assert_eq!(scene.get(id).unwrap().tree.vertical_extent(), (0.0, 90.0));
    }

    #[test]
    fn add_is_idempotent_and_remove_drops() {
        let (mut store, _) = shelf_store();
        let mut scene = SceneSession::new(&store);
        let table = store.add(SpatialElement::new(ElementType::Table, Bounds::new(200.0, 0.0, 100.0, 60.0), 75.0));
        scene.apply(&StoreChange::Added(table), &store);
        scene.apply(&StoreChange::Added(table), &store);
        assert_eq!(scene.len(), 2);

        store.remove(table);
        scene.apply(&StoreChange::Removed(table), &store);
        assert_eq!(scene.len(), 1);
        assert!(!scene.contains(table));
    }

    #[test]
    fn wall_changes_reach_its_windows() {
        let mut store = ElementStore::new();
        let wall = store.add(SpatialElement::new(ElementType::Wall, Bounds::new(0.0, 0.0, 200.0, 10.0), 250.0));
        let mut window = SpatialElement::new(ElementType::Window, Bounds::new(50.0, 0.0, 100.0, 10.0), 40.0);
        window.parent_wall_id = Some(wall);
        window.window_top_distance = Some(20.0);
        window.window_bottom_distance = Some(30.0);
        let window = store.add(window);

        let mut scene = SceneSession::new(&store);
        assert_eq!(scene.get(window).unwrap().tree.vertical_extent(), (30.0, 230.0));

        let change = patch(&mut store, wall, ElementPatch { depth: Some(300.0), ..Default::default() });
        scene.apply(&change, &store);
        assert_eq!(scene.get(window).unwrap().tree.vertical_extent(), (30.0, 280.0));

        store.remove(wall);
        scene.apply(&StoreChange::Removed(wall), &store);
        assert_eq!(scene.get(window).unwrap().tree.vertical_extent(), (0.0, 40.0));
    }

    #[test]
    fn replace_rebuilds_and_reframes() {
        let (mut store, old) = shelf_store();
        let mut scene = SceneSession::new(&store);
        store.replace_all(vec![SpatialElement::new(
            ElementType::Gondola,
            Bounds::new(0.0, 0.0, 600.0, 400.0),
            100.0,
        )]);
        scene.apply(&StoreChange::Replaced, &store);
        assert!(!scene.contains(old));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.camera().position, Vec3::new(300.0, 450.0, 1100.0));
    }

    #[test]
    fn describe_follows_store_order() {
        let (mut store, shelf) = shelf_store();
        let chair = store.add(SpatialElement::new(ElementType::Chair, Bounds::new(0.0, 100.0, 40.0, 40.0), 40.0));
        let scene = SceneSession::new(&store);
        let description = scene.describe(&store);
        let ids: Vec<ElementId> = description.objects.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![shelf, chair]);
        let json = serde_json::to_value(&description).unwrap();
        assert_eq!(json["objects"][1]["type"], "chair");
        assert_eq!(json["objects"][0]["root"]["name"], "shelf");
        // Translation sits in the last column.
        assert_eq!(description.objects[0].matrix[12..15], [60.0_f32, 0.0, 20.0]);
    }
}
