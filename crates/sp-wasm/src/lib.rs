//! WASM bridge for the store plan editor.
//!
//! Compiled via `wasm-pack build --target web`. The host page owns the
//! `<canvas>`, the 3D renderer and the print pipeline; everything else
//! (store, gestures, part synthesis, exports) runs here.
//!
//! | Surface        | Call                                                  |
//! |----------------|-------------------------------------------------------|
//! | 2D plan        | `render`, `pointer_*`, `scroll`, `key`                |
//! | property panel | `selected_json`, `update_element`                     |
//! | documents      | `import_json`, `export_*`, `save_plan`, `load_plan`   |
//! | 3D view        | `mount_scene`, `scene_json`, `unmount_scene`          |

mod console_log;
mod render2d;
mod storage;

use chrono::Utc;
use render2d::CanvasTheme;
use serde::Deserialize;
use sp_core::furniture::{DisplayItem, FurnitureRecord, ProductInfo};
use sp_core::id::ElementId;
use sp_core::library::PlanLibrary;
use sp_core::model::{ElementPatch, ElementType};
use sp_core::units::UnitSystem;
use sp_core::{EditorConfig, ReadingDirection};
use sp_editor::{EditorSession, InputEvent, Modifiers, ShortcutAction};
use sp_render::export::{export_file_name, ExportView};
use sp_render::{DocumentExport, DocumentSink, ExportError, ExportImage, FrameCapture};
use sp_scene::SceneSession;
use storage::LocalStorage;
use wasm_bindgen::prelude::*;
use web_sys::CanvasRenderingContext2d;

/// The plan editor as seen from JavaScript.
///
/// One instance per editor page. After every call that can touch the store
/// the pending changes are forwarded to the 3D scene, when it is mounted.
#[wasm_bindgen]
pub struct PlanCanvas {
    session: EditorSession,
    scene: Option<SceneSession>,
    theme: CanvasTheme,
}

#[wasm_bindgen]
impl PlanCanvas {
    /// `config_json` may be empty for the defaults. `log_level` is one of
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32, config_json: &str, log_level: &str) -> Result<PlanCanvas, JsValue> {
        console_error_panic_hook_setup();
        console_log::init(console_log::parse_level(log_level));

        let config = if config_json.trim().is_empty() {
            EditorConfig::default()
        } else {
            EditorConfig::from_json(config_json).map_err(|e| JsValue::from_str(&format!("invalid config: {e}")))?
        };
        let mut session = EditorSession::new(config);
        session.viewport_mut().set_surface(0.0, 0.0, width, height);
        log::info!("plan canvas ready ({width}×{height})");

        Ok(Self {
            session,
            scene: None,
            theme: CanvasTheme::light(),
        })
    }

    pub fn set_log_level(&self, level: &str) {
        console_log::init(console_log::parse_level(level));
    }

    /// The canvas moved or was resized. `origin_*` is its client position.
    pub fn set_surface(&mut self, origin_x: f32, origin_y: f32, width: f32, height: f32) {
        self.session.viewport_mut().set_surface(origin_x, origin_y, width, height);
    }

    pub fn render(&self, ctx: &CanvasRenderingContext2d) {
        let view = self.session.view();
        let grid = self.session.config().grid_size;
        if let Err(err) = render2d::render_plan(ctx, &view, self.session.viewport(), grid, &self.theme) {
            log::error!("render failed: {err:?}");
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Returns true when the frame needs a repaint.
    pub fn pointer_down(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.dispatch(&InputEvent::PointerDown { x, y, modifiers })
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, shift: bool, ctrl: bool, alt: bool, meta: bool) -> bool {
        let modifiers = modifiers(shift, ctrl, alt, meta);
        self.dispatch(&InputEvent::PointerMove { x, y, modifiers })
    }

    pub fn pointer_up(&mut self, x: f32, y: f32) -> bool {
        self.dispatch(&InputEvent::pointer_up(x, y))
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.dispatch(&InputEvent::PointerLeave)
    }

    /// Wheel pan, or pinch zoom when `zoom != 1`.
    pub fn scroll(&mut self, dx: f32, dy: f32, zoom: f32) -> bool {
        self.dispatch(&InputEvent::Scroll { dx, dy, zoom })
    }

    /// Run a keyboard shortcut. Returns `"save"` or `"export"` when the
    /// host has to finish the job, `"handled"` for anything else the map
    /// knows, and an empty string when the key is unbound.
    pub fn key(&mut self, key: &str, shift: bool, ctrl: bool, alt: bool, meta: bool) -> String {
        let action = self.session.handle_key(key, modifiers(shift, ctrl, alt, meta));
        self.sync();
        match action {
            Some(ShortcutAction::Save) => "save",
            Some(ShortcutAction::Export) => "export",
            Some(_) => "handled",
            None => "",
        }
        .to_string()
    }

    fn dispatch(&mut self, event: &InputEvent) -> bool {
        let changed = self.session.handle_event(event);
        self.sync();
        changed
    }

    /// Forward store changes to the mounted scene.
    fn sync(&mut self) {
        let changes = self.session.drain_changes();
        if let Some(scene) = &mut self.scene {
            for change in &changes {
                scene.apply(change, self.session.store());
            }
        }
    }

    // ─── Tools and selection ─────────────────────────────────────────────

    /// Arm the placement tool for an element type key such as `"shelf"`.
    pub fn arm_tool(&mut self, key: &str) -> bool {
        match ElementType::from_key(key) {
            Some(ty) => {
                self.session.arm_tool(ty);
                true
            }
            None => {
                log::warn!("unknown element type {key:?}");
                false
            }
        }
    }

    /// Current tool key, or empty when none is armed.
    pub fn armed_tool(&self) -> String {
        self.session
            .interaction()
            .armed_tool()
            .map(|ty| ty.key().to_string())
            .unwrap_or_default()
    }

    pub fn cancel(&mut self) {
        self.session.cancel();
    }

    pub fn delete_selected(&mut self) -> bool {
        let removed = self.session.delete_selected().is_some();
        self.sync();
        removed
    }

    /// Select by id; an empty string clears the selection.
    pub fn select(&mut self, id: &str) {
        let id = (!id.is_empty()).then(|| ElementId::intern(id));
        self.session.select(id);
        self.sync();
    }

    /// Get the selected element id, or empty string if none.
    pub fn selected_id(&self) -> String {
        self.session
            .store()
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// The selected element as JSON, or `null`.
    pub fn selected_json(&self) -> String {
        let store = self.session.store();
        let element = store.selected().and_then(|id| store.get(id));
        serde_json::to_string(&element).unwrap_or_else(|_| "null".to_string())
    }

    /// Apply a property-panel edit, e.g. `{"width":140,"rotation":90}`.
    pub fn update_element(&mut self, id: &str, patch_json: &str) -> bool {
        let patch: PatchJson = match serde_json::from_str(patch_json) {
            Ok(patch) => patch,
            Err(err) => {
                log::warn!("rejected patch for {id}: {err}");
                return false;
            }
        };
        let changed = self.session.update_element(ElementId::intern(id), patch.into()).is_some();
        self.sync();
        changed
    }

    pub fn set_snap_to_grid(&mut self, on: bool) {
        self.session.set_snap_to_grid(on);
    }

    /// `"meters"` or `"centimeters"`.
    pub fn set_unit(&mut self, unit: &str) -> bool {
        match serde_json::from_value::<UnitSystem>(serde_json::Value::from(unit)) {
            Ok(unit) => {
                self.session.set_unit(unit);
                true
            }
            Err(_) => false,
        }
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// The current 2D frame as JSON, for hosts that paint it themselves.
    pub fn view_json(&self) -> String {
        serde_json::to_string(&self.session.view()).unwrap_or_default()
    }

    pub fn zoom(&self) -> f32 {
        self.session.viewport().zoom
    }

    /// `[x, y]` center of the plan in plan units.
    pub fn plan_center(&self) -> Vec<f32> {
        let (x, y) = self.session.plan_center();
        vec![x, y]
    }

    /// Pending user-facing notices as a JSON array; drains the queue.
    pub fn take_notices(&mut self) -> String {
        serde_json::to_string(&self.session.drain_notices()).unwrap_or_else(|_| "[]".to_string())
    }

    // ─── 3D scene ────────────────────────────────────────────────────────

    /// Build the 3D scene from the current plan and return its description.
    pub fn mount_scene(&mut self) -> String {
        // Changes made before mounting are already in the store.
        self.session.drain_changes();
        let scene = SceneSession::new(self.session.store());
        log::debug!("scene mounted with {} objects", scene.len());
        self.scene = Some(scene);
        self.scene_json()
    }

    pub fn unmount_scene(&mut self) {
        if let Some(mut scene) = self.scene.take() {
            scene.teardown();
        }
    }

    pub fn is_scene_mounted(&self) -> bool {
        self.scene.is_some()
    }

    /// The mounted scene as JSON, or `null` when the 3D view is closed.
    pub fn scene_json(&self) -> String {
        match &self.scene {
            Some(scene) => serde_json::to_string(&scene.describe(self.session.store())).unwrap_or_default(),
            None => "null".to_string(),
        }
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Replace the plan with an exported element array. On failure the plan
    /// is untouched and a notice is queued.
    pub fn import_json(&mut self, json: &str) -> bool {
        let ok = self.session.import_json(json).is_ok();
        self.sync();
        ok
    }

    pub fn export_json(&self) -> String {
        self.session.export_json()
    }

    pub fn export_svg(&self) -> String {
        self.session.export_svg()
    }

    pub fn export_png(&mut self) -> Option<Vec<u8>> {
        self.session.export_png().ok()
    }

    /// Suggested download name, e.g. `floor-plan-2d-2026-10-16.png`.
    /// `view` is `"2d"` or `"3d"`.
    pub fn export_file_name(&self, view: &str, extension: &str) -> String {
        let view = if view == "3d" { ExportView::Scene } else { ExportView::Plan };
        export_file_name(view.file_stem(), Utc::now(), extension)
    }

    /// Printable document of the 2D plan, or `null` on failure.
    pub fn export_document(&mut self) -> JsValue {
        let mut sink = CollectedDocument::default();
        match self.session.export_document(&mut sink, Utc::now()) {
            Ok(()) => sink.into_js(),
            Err(_) => JsValue::NULL,
        }
    }

    /// Printable document around a PNG frame the host read back from the
    /// 3D canvas.
    pub fn export_scene_document(&mut self, png: Vec<u8>, width: u32, height: u32) -> JsValue {
        let mut capture = HostFrame(Some(ExportImage { width, height, png }));
        let mut sink = CollectedDocument::default();
        match self.session.export_scene_document(&mut capture, &mut sink, Utc::now()) {
            Ok(()) => sink.into_js(),
            Err(_) => JsValue::NULL,
        }
    }

    // ─── Plan library ────────────────────────────────────────────────────

    pub fn save_plan(&mut self, id: &str, name: &str) -> bool {
        let Some(mut library) = open_library() else {
            return false;
        };
        self.session.save_plan(&mut library, id, name, Utc::now()).is_ok()
    }

    pub fn load_plan(&mut self, id: &str) -> bool {
        let Some(library) = open_library() else {
            return false;
        };
        let ok = self.session.load_plan(&library, id).is_ok();
        self.sync();
        ok
    }

    /// Reopen the plan that was active in the previous session.
    pub fn restore_active(&mut self) -> bool {
        let Some(library) = open_library() else {
            return false;
        };
        let restored = matches!(self.session.restore_active(&library), Ok(Some(_)));
        self.sync();
        restored
    }

    /// Saved plans as JSON, in save order.
    pub fn list_plans(&self) -> String {
        let plans = open_library().map(|library| library.list());
        match plans {
            Some(Ok(plans)) => serde_json::to_string(&plans).unwrap_or_else(|_| "[]".to_string()),
            Some(Err(err)) => {
                log::warn!("listing plans failed: {err}");
                "[]".to_string()
            }
            None => "[]".to_string(),
        }
    }

    pub fn delete_plan(&self, id: &str) -> bool {
        let Some(mut library) = open_library() else {
            return false;
        };
        library
            .delete(id)
            .inspect_err(|err| log::warn!("deleting plan {id} failed: {err}"))
            .is_ok()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers { shift, ctrl, alt, meta }
}

fn open_library() -> Option<PlanLibrary<LocalStorage>> {
    match LocalStorage::open() {
        Ok(storage) => Some(PlanLibrary::new(storage)),
        Err(err) => {
            log::warn!("plan library unavailable: {err}");
            None
        }
    }
}

/// Property-panel patch as sent by the host. Only geometry, the name and
/// the window distances are editable from there.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct PatchJson {
    x: Option<f32>,
    y: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    depth: Option<f32>,
    rotation: Option<f32>,
    name: Option<String>,
    window_top_distance: Option<f32>,
    window_bottom_distance: Option<f32>,
}

impl From<PatchJson> for ElementPatch {
    fn from(p: PatchJson) -> Self {
        ElementPatch {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
            depth: p.depth,
            rotation: p.rotation,
            name: p.name,
            window_top_distance: p.window_top_distance,
            window_bottom_distance: p.window_bottom_distance,
            ..Default::default()
        }
    }
}

// ─── Export plumbing ─────────────────────────────────────────────────────

/// The frame the host already read back from its WebGL canvas.
struct HostFrame(Option<ExportImage>);

impl FrameCapture for HostFrame {
    fn capture(&mut self) -> Result<ExportImage, ExportError> {
        match self.0.take() {
            Some(image) if !image.png.is_empty() => Ok(image),
            _ => Err(ExportError::Capture("no frame from the 3D view".to_string())),
        }
    }
}

/// Keeps the finished document so it can be handed to JavaScript.
#[derive(Default)]
struct CollectedDocument(Option<DocumentExport>);

impl DocumentSink for CollectedDocument {
    fn write_document(&mut self, document: &DocumentExport) -> Result<(), ExportError> {
        self.0 = Some(document.clone());
        Ok(())
    }
}

impl CollectedDocument {
    /// `{title, generatedOn, elementCount, legendTitle, legend, image:{width, height, png}}`
    fn into_js(self) -> JsValue {
        let Some(doc) = self.0 else {
            return JsValue::NULL;
        };
        let legend: js_sys::Array = doc.legend.iter().map(|line| JsValue::from_str(line)).collect();
        let image = js_sys::Object::new();
        let png = js_sys::Uint8Array::from(doc.image.png.as_slice());
        let out = js_sys::Object::new();
        let fields: [(&js_sys::Object, &str, JsValue); 9] = [
            (&image, "width", doc.image.width.into()),
            (&image, "height", doc.image.height.into()),
            (&image, "png", png.into()),
            (&out, "title", doc.title.into()),
            (&out, "generatedOn", doc.generated_on.into()),
            (&out, "elementCount", doc.element_count.into()),
            (&out, "legendTitle", doc.legend_title.into()),
            (&out, "legend", legend.into()),
            (&out, "image", image.clone().into()),
        ];
        for (target, key, value) in fields {
            if let Err(err) = js_sys::Reflect::set(target, &JsValue::from_str(key), &value) {
                log::error!("document field {key} not set: {err:?}");
            }
        }
        out.into()
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("store plan WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions (no canvas needed) ─────────────────────────────

/// Part tree for one furniture record with its items and product catalog,
/// each passed as JSON. Returns `{"ok":true,"root":{...}}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn synthesize_furniture(record_json: &str, items_json: &str, products_json: &str, rtl: bool) -> String {
    match furniture_tree(record_json, items_json, products_json, rtl) {
        Ok(root) => serde_json::json!({ "ok": true, "root": root }).to_string(),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }).to_string(),
    }
}

fn furniture_tree(
    record_json: &str,
    items_json: &str,
    products_json: &str,
    rtl: bool,
) -> Result<sp_scene::PartNode, serde_json::Error> {
    let record: FurnitureRecord = serde_json::from_str(record_json)?;
    let items: Vec<DisplayItem> = serde_json::from_str(items_json)?;
    let products: Vec<ProductInfo> = serde_json::from_str(products_json)?;
    let direction = if rtl { ReadingDirection::Rtl } else { ReadingDirection::Ltr };
    Ok(sp_scene::synthesize_furniture(&record, &items, &products, direction).to_node())
}

/// Placement palette: one entry per element type with its default size.
#[wasm_bindgen]
pub fn element_catalog() -> String {
    let entries: Vec<serde_json::Value> = ElementType::ALL
        .into_iter()
        .map(|ty| {
            let size = sp_core::catalog::default_size(ty);
            serde_json::json!({
                "type": ty.key(),
                "color": sp_core::catalog::element_color(ty).to_hex(),
                "width": size.width,
                "height": size.height,
                "depth": size.depth,
            })
        })
        .collect();
    serde_json::Value::from(entries).to_string()
}
