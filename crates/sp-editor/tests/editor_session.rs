//! Integration tests: editor session driven by pointer and key events.
//!
//! Loads the boutique fixture, then replays gestures through
//! `EditorSession::handle_event` and checks the store and the change feed.

use pretty_assertions::assert_eq;
use sp_core::labels::Locale;
use sp_core::{EditorConfig, ElementId, ElementType, StoreChange};
use sp_editor::{EditorSession, InputEvent, NoticeLevel};

fn boutique() -> EditorSession {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut session = EditorSession::new(EditorConfig {
        locale: Locale::En,
        ..EditorConfig::default()
    });
    session.import_json(include_str!("fixtures/boutique.json")).unwrap();
    session.drain_changes();
    session.drain_notices();
    session
}

fn position(session: &EditorSession, id: &str) -> (f32, f32, f32, f32) {
    let el = session.store().get(ElementId::intern(id)).unwrap();
    (el.x, el.y, el.width, el.height)
}

// ─── Gestures ───────────────────────────────────────────────────────────

#[test]
fn drag_snaps_each_axis_to_the_grid() {
    let mut s = boutique();
    s.handle_event(&InputEvent::pointer_down(500.0, 320.0));
    assert_eq!(s.store().selected(), Some(ElementId::intern("cashier-1")));

    s.handle_event(&InputEvent::pointer_move(530.0, 305.0));
    s.handle_event(&InputEvent::pointer_up(530.0, 305.0));
    // 480 + 30 = 510 → 520; 300 − 15 = 285 → 280.
    assert_eq!(position(&s, "cashier-1"), (520.0, 280.0, 100.0, 80.0));

    let changes = s.drain_changes();
    assert_eq!(changes.len(), 1);
    assert!(changes[0].moves_footprint());
}

#[test]
fn rotate_knob_snaps_to_fifteen_degrees() {
    let mut s = boutique();
    s.select(Some(ElementId::intern("cashier-1")));
    // Knob sits 24 above the top edge's midpoint (530, 300).
    s.handle_event(&InputEvent::pointer_down(530.0, 276.0));
    // 52° from the cashier's center (530, 340).
    s.handle_event(&InputEvent::pointer_move(591.57, 418.80));
    s.handle_event(&InputEvent::pointer_up(591.57, 418.80));

    let cashier = s.store().get(ElementId::intern("cashier-1")).unwrap();
    assert_eq!(cashier.rotation, 45.0);
    assert_eq!((cashier.x, cashier.y), (480.0, 300.0));
    assert!(!s.drain_changes()[0].moves_footprint());
}

#[test]
fn resize_never_shrinks_below_the_floor() {
    let mut s = boutique();
    s.select(Some(ElementId::intern("cashier-1")));
    s.handle_event(&InputEvent::pointer_down(580.0, 380.0));
    s.handle_event(&InputEvent::pointer_move(300.0, 100.0));
    s.handle_event(&InputEvent::pointer_up(300.0, 100.0));
    assert_eq!(position(&s, "cashier-1"), (480.0, 300.0, 10.0, 10.0));
}

#[test]
fn top_left_resize_pins_the_bottom_right_corner() {
    let mut s = boutique();
    s.select(Some(ElementId::intern("cashier-1")));
    s.handle_event(&InputEvent::pointer_down(480.0, 300.0));
    s.handle_event(&InputEvent::pointer_move(700.0, 500.0));
    s.handle_event(&InputEvent::pointer_up(700.0, 500.0));
    assert_eq!(position(&s, "cashier-1"), (570.0, 370.0, 10.0, 10.0));
}

#[test]
fn armed_tool_places_instead_of_dragging() {
    let mut s = boutique();
    s.arm_tool(ElementType::Table);
    s.handle_event(&InputEvent::pointer_move(400.0, 200.0));
    assert!(s.view().ghost.is_some());

    // Over the gondola: the tool wins, nothing is dragged.
    s.handle_event(&InputEvent::pointer_down(400.0, 200.0));
    assert_eq!(s.store().len(), 8);
    assert_eq!(position(&s, "gondola-1"), (180.0, 160.0, 200.0, 60.0));
    let table = s.store().selected_element().unwrap();
    assert_eq!(table.element_type, ElementType::Table);
    assert_eq!(table.name.as_deref(), Some("Table 1"));
    assert!(s.view().ghost.is_none());
}

// ─── Keyboard ───────────────────────────────────────────────────────────

#[test]
fn deleting_a_wall_orphans_its_window_gracefully() {
    let mut s = boutique();
    s.handle_event(&InputEvent::pointer_down(100.0, 5.0));
    s.handle_event(&InputEvent::pointer_up(100.0, 5.0));
    assert_eq!(s.store().selected(), Some(ElementId::intern("wall-north")));

    s.handle_event(&InputEvent::key("Delete"));
    assert_eq!(s.drain_changes().last(), Some(&StoreChange::Removed(ElementId::intern("wall-north"))));

    let window = ElementId::intern("window-north");
    assert_eq!(position(&s, "window-north"), (200.0, 0.0, 100.0, 10.0));
    assert!(s.store().parent_wall(window).is_none());
}

#[test]
fn escape_after_commit_leaves_nothing_armed() {
    let mut s = boutique();
    s.handle_event(&InputEvent::key("k"));
    assert_eq!(s.interaction().armed_tool(), Some(ElementType::Cashier));
    s.handle_event(&InputEvent::key("Escape"));
    assert_eq!(s.interaction().armed_tool(), None);
    s.handle_event(&InputEvent::pointer_down(700.0, 500.0));
    assert_eq!(s.store().len(), 7);
}

// ─── Failures ───────────────────────────────────────────────────────────

#[test]
fn door_in_open_floor_is_refused() {
    let mut s = boutique();
    s.arm_tool(ElementType::Door);
    s.handle_event(&InputEvent::pointer_down(300.0, 300.0));
    assert_eq!(s.store().len(), 7);
    assert_eq!(s.interaction().armed_tool(), Some(ElementType::Door));
    let notice = &s.drain_notices()[0];
    assert_eq!(notice.level, NoticeLevel::Blocking);
    assert_eq!(notice.key, "notice.door_needs_wall");
}

#[test]
fn plan_envelope_is_not_an_element_array() {
    let mut s = boutique();
    assert!(s.import_json(include_str!("fixtures/not_a_plan.json")).is_err());
    assert_eq!(s.store().len(), 7);
    assert!(s.drain_changes().is_empty());
    assert_eq!(s.drain_notices()[0].level, NoticeLevel::Blocking);
}
