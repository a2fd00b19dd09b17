//! Integration tests: store changes → 3D scene, and furniture records →
//! part trees.

use pretty_assertions::assert_eq;
use serde::Deserialize;
use sp_core::document::import_elements;
use sp_core::furniture::{DisplayItem, FurnitureRecord, ProductInfo};
use sp_core::model::{ElementPatch, ElementType, SpatialElement};
use sp_core::{Bounds, ElementId, ElementStore, ReadingDirection, StoreChange};
use sp_scene::{SceneSession, Shape, synthesize_furniture};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn boutique() -> ElementStore {
    ElementStore::from_elements(import_elements(include_str!("fixtures/boutique.json")).unwrap())
}

#[test]
fn mounted_scene_mirrors_the_store() {
    init_logs();
    let store = boutique();
    let scene = SceneSession::new(&store);
    assert_eq!(scene.len(), store.len());

    let window = scene.get(ElementId::intern("window-north")).unwrap();
    assert_eq!(window.tree.vertical_extent(), (20.0, 230.0));

    let gondola = scene.get(ElementId::intern("gondola-1")).unwrap();
    assert!((gondola.transform.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
}

#[test]
fn deleting_a_wall_keeps_its_window() {
    init_logs();
    let mut store = boutique();
    let mut scene = SceneSession::new(&store);
    let wall = ElementId::intern("wall-north");
    let window = ElementId::intern("window-north");
    let before = store.get(window).unwrap().bounds();

    store.remove(wall);
    scene.apply(&StoreChange::Removed(wall), &store);

    assert!(!scene.contains(wall));
    assert_eq!(store.get(window).unwrap().bounds(), before);
    assert!(store.parent_wall(window).is_none());
    assert_eq!(scene.get(window).unwrap().tree.vertical_extent(), (0.0, 10.0));
}

#[test]
fn edits_flow_through_the_change_stream() {
    init_logs();
    let mut store = boutique();
    let mut scene = SceneSession::new(&store);
    let cashier = ElementId::intern("cashier-1");

    let changes = store.update(cashier, &ElementPatch::position(500.0, 300.0)).unwrap();
    scene.apply(&StoreChange::Updated { id: cashier, changes }, &store);
    assert_eq!(scene.get(cashier).unwrap().transform.translation.x, 550.0);

    let changes = store
        .update(cashier, &ElementPatch { width: Some(140.0), ..Default::default() })
        .unwrap();
    scene.apply(&StoreChange::Updated { id: cashier, changes }, &store);
    let object = scene.get(cashier).unwrap();
    assert_eq!(object.transform.translation.x, 570.0);
    let top = object.tree.get(object.tree.find("top").unwrap()).unwrap();
    assert!(matches!(top.shape, Shape::Cuboid { size } if size.x == 150.0));
}

#[test]
fn description_serializes_for_the_host() {
    let store = boutique();
    let scene = SceneSession::new(&store);
    let json = serde_json::to_value(scene.describe(&store)).unwrap();
    assert_eq!(json["objects"].as_array().map(Vec::len), Some(7));
    assert_eq!(json["objects"][0]["id"], "wall-north");
    assert_eq!(json["objects"][0]["root"]["children"][0]["shape"]["kind"], "cuboid");
    assert!(json["camera"]["position"].is_array());
    let fridge = json["objects"]
        .as_array()
        .unwrap()
        .iter()
        .find(|o| o["type"] == "dairy_fridge")
        .unwrap();
    assert_eq!(fridge["root"]["name"], "dairy_fridge");
}

#[derive(Deserialize)]
struct FixtureFile {
    record: FurnitureRecord,
    items: Vec<DisplayItem>,
    products: Vec<ProductInfo>,
}

fn menswear() -> FixtureFile {
    serde_json::from_str(include_str!("fixtures/menswear_wall.json")).unwrap()
}

#[test]
fn furniture_record_stocks_resolved_products() {
    init_logs();
    let f = menswear();
    let tree = synthesize_furniture(&f.record, &f.items, &f.products, ReadingDirection::Ltr);

    assert_eq!(tree.name(), "clothing-wall");
    assert_eq!(tree.count("rail"), 2);
    assert_eq!(tree.count("shirt"), 3);
    assert_eq!(tree.count("suit"), 1);
    assert_eq!(tree.count("bottom"), 2);
    assert_eq!(tree.count("hanging"), 1);
    assert!(tree.find("discontinued").is_none());

    let suit = tree.find("suit").unwrap();
    let part = tree.get(suit).unwrap();
    assert!(matches!(part.shape, Shape::Plane { .. }));
    assert_eq!(
        part.surface.as_ref().and_then(|s| s.texture.as_deref()),
        Some("products/costume-gris.png")
    );
}

#[test]
fn right_to_left_mirrors_the_layout() {
    let f = menswear();
    let ltr = synthesize_furniture(&f.record, &f.items, &f.products, ReadingDirection::Ltr);
    let rtl = synthesize_furniture(&f.record, &f.items, &f.products, ReadingDirection::Rtl);

    let x_of = |tree: &sp_scene::PartTree| tree.root_offset(tree.find("chemise-oxford").unwrap()).x;
    assert!((x_of(&ltr) + 0.9).abs() < 1e-5, "{}", x_of(&ltr));
    assert!((x_of(&rtl) - 0.9).abs() < 1e-5, "{}", x_of(&rtl));
}

#[test]
fn every_catalogue_type_survives_a_round_of_edits() {
    init_logs();
    let mut store = ElementStore::new();
    let mut scene = SceneSession::new(&store);
    for (i, ty) in ElementType::ALL.into_iter().enumerate() {
        let size = sp_core::catalog::default_size(ty);
        let id = store.add(SpatialElement::new(
            ty,
            Bounds::new(i as f32 * 50.0, 0.0, size.width, size.height),
            size.depth,
        ));
        scene.apply(&StoreChange::Added(id), &store);
        let changes = store
            .update(id, &ElementPatch { rotation: Some(45.0), ..Default::default() })
            .unwrap();
        scene.apply(&StoreChange::Updated { id, changes }, &store);
    }
    assert_eq!(scene.len(), ElementType::ALL.len());
}
