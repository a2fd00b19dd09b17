//! Integration tests: imported plan → view, hit testing, and exports.

use pretty_assertions::assert_eq;
use sp_core::document::import_elements;
use sp_core::labels::{Locale, StaticLabels};
use sp_core::{EditorConfig, ElementId, ElementStore, UnitSystem};
use sp_render::export::{ExportFrame, render_png};
use sp_render::svg::render_svg;
use sp_render::{Hit, build_view, hit_test_with_handles};

fn boutique() -> ElementStore {
    ElementStore::from_elements(import_elements(include_str!("fixtures/boutique.json")).unwrap())
}

#[test]
fn view_serializes_in_camel_case() {
    let mut store = boutique();
    store.select(ElementId::intern("cashier-1"));
    let view = build_view(&store, None, &StaticLabels::default(), UnitSystem::Meters);
    let json = serde_json::to_value(&view).unwrap();
    let last = &json["boxes"][6];
    assert_eq!(last["id"], "cashier-1");
    assert_eq!(last["elementType"], "cashier");
    assert_eq!(last["zIndex"], 6);
    assert_eq!(last["dimensions"], "1.00m × 0.80m × 0.60m");
    assert_eq!(json["ghost"], serde_json::Value::Null);
}

#[test]
fn rotated_gondola_is_hit_along_its_long_axis() {
    let store = boutique();
    let view = build_view(&store, None, &StaticLabels::default(), UnitSystem::Centimeters);
    // 200 × 60 gondola centered at (280, 190), turned upright by 90°.
    assert_eq!(
        hit_test_with_handles(&view, 280.0, 270.0, 0.0),
        Some(Hit::Element(ElementId::intern("gondola-1")))
    );
    assert_eq!(hit_test_with_handles(&view, 370.0, 190.0, 0.0), None);
}

#[test]
fn boutique_exports_to_png_and_svg() {
    let store = boutique();
    let labels = StaticLabels::for_locale(Locale::En);
    let frame = ExportFrame::build(&store, &labels, &EditorConfig::default());
    assert_eq!((frame.origin_x, frame.origin_y), (-50.0, -50.0));
    assert_eq!(frame.pixel_size(), (770, 500));

    let png = render_png(&frame).unwrap();
    assert!(png.len() > 8);

    let svg = render_svg(&frame);
    assert_eq!(svg.matches(">Wall</text>").count(), 2);
    assert!(svg.contains(">Dairy fridge</text>"));
}
