//! Editor session: the store, the interaction machine, and the viewport
//! behind one API.
//!
//! The session is the only writer of the [`ElementStore`]. Every committed
//! mutation is recorded as a [`StoreChange`] in an outbox the host drains
//! once per frame and forwards to the 3D scene session. Failures never
//! touch the store; they surface as [`Notice`]s instead.

use crate::input::{InputEvent, Modifiers};
use crate::interaction::{EditorMutation, Interaction, InteractionContext};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::viewport::Viewport;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sp_core::change::StoreChange;
use sp_core::config::EditorConfig;
use sp_core::document::{export_elements, import_elements};
use sp_core::error::{ImportError, PersistError, PlanError};
use sp_core::id::ElementId;
use sp_core::labels::{LabelProvider, StaticLabels};
use sp_core::library::{DocumentStore, PlanLibrary};
use sp_core::model::{ChangeSet, ElementPatch, ElementType, FloorPlan, SpatialElement};
use sp_core::store::ElementStore;
use sp_render::export::{
    DocumentSink, ExportError, ExportFrame, FrameCapture, export_plan_document, export_scene_document, render_png,
};
use sp_render::presentation::HANDLE_SIZE;
use sp_render::svg::render_svg;
use sp_render::{PlanView, build_view, hit_test_with_handles};

/// How prominently the host should show a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Modal; the user must acknowledge it.
    Blocking,
    /// Transient.
    Toast,
}

/// A user-facing message produced by a failed (or finished) operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub key: &'static str,
    pub message: String,
}

pub struct EditorSession {
    store: ElementStore,
    interaction: Interaction,
    viewport: Viewport,
    config: EditorConfig,
    labels: Box<dyn LabelProvider>,
    changes: Vec<StoreChange>,
    notices: Vec<Notice>,
    plan_center: (f32, f32),
}

impl EditorSession {
    /// Session with the bundled label table for `config.locale`.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let labels = StaticLabels::for_locale(config.locale);
        Self::with_labels(config, Box::new(labels))
    }

    #[must_use]
    pub fn with_labels(config: EditorConfig, labels: Box<dyn LabelProvider>) -> Self {
        Self {
            store: ElementStore::new(),
            interaction: Interaction::new(),
            viewport: Viewport::default(),
            config,
            labels,
            changes: Vec::new(),
            notices: Vec::new(),
            plan_center: (0.0, 0.0),
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn labels(&self) -> &dyn LabelProvider {
        self.labels.as_ref()
    }

    /// Midpoint of the plan's bounding box, `(0, 0)` when empty.
    pub fn plan_center(&self) -> (f32, f32) {
        self.plan_center
    }

    /// The 2D frame: boxes in paint order plus the ghost.
    pub fn view(&self) -> PlanView {
        build_view(
            &self.store,
            self.interaction.ghost(),
            self.labels.as_ref(),
            self.config.unit,
        )
    }

    /// Take every store change since the last call.
    pub fn drain_changes(&mut self) -> Vec<StoreChange> {
        std::mem::take(&mut self.changes)
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Route one input event. Returns whether anything visible changed.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key { key, modifiers } => self.handle_key(key, *modifiers).is_some(),
            InputEvent::Scroll { dx, dy, zoom } => {
                if *zoom > 1.0 {
                    self.viewport.zoom_in(&self.config);
                } else if *zoom < 1.0 {
                    self.viewport.zoom_out(&self.config);
                } else {
                    self.viewport.pan_by(-dx, -dy);
                }
                true
            }
            _ => {
                let hit = match event {
                    InputEvent::PointerDown { x, y, .. } => {
                        let (px, py) = self.viewport.screen_to_plan(*x, *y);
                        let tolerance = HANDLE_SIZE / 2.0 / self.viewport.zoom;
                        hit_test_with_handles(&self.view(), px, py, tolerance)
                    }
                    _ => None,
                };
                let had_ghost = self.interaction.ghost().is_some();
                let mutations = {
                    let ctx = InteractionContext {
                        store: &self.store,
                        viewport: &self.viewport,
                        config: &self.config,
                        labels: self.labels.as_ref(),
                        hit,
                    };
                    self.interaction.handle(event, &ctx)
                };
                let changed = !mutations.is_empty() || had_ghost || self.interaction.ghost().is_some();
                for mutation in mutations {
                    self.apply_mutation(mutation);
                }
                changed
            }
        }
    }

    /// Resolve and run a keyboard shortcut. Save and export are returned
    /// for the host to carry out, since they need its storage and sinks.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let action = ShortcutMap::resolve(key, modifiers.ctrl, modifiers.shift, modifiers.alt, modifiers.meta)?;
        log::debug!("shortcut {key:?} → {action:?}");
        match action {
            ShortcutAction::Arm(ty) => self.arm_tool(ty),
            ShortcutAction::ToggleHand => {
                let hand = !self.interaction.hand();
                self.interaction.cancel();
                self.interaction.set_hand(hand);
            }
            ShortcutAction::Cancel => self.cancel(),
            ShortcutAction::Delete => {
                self.delete_selected();
            }
            ShortcutAction::ToggleSnap => self.config.snap_to_grid = !self.config.snap_to_grid,
            ShortcutAction::ZoomIn => self.viewport.zoom_in(&self.config),
            ShortcutAction::ZoomOut => self.viewport.zoom_out(&self.config),
            ShortcutAction::ZoomReset => self.viewport.reset_zoom(),
            ShortcutAction::Save | ShortcutAction::Export => {}
        }
        Some(action)
    }

    // ─── Commands ────────────────────────────────────────────────────────

    /// Arm a placement tool. The selection is dropped, as with Escape.
    pub fn arm_tool(&mut self, ty: ElementType) {
        self.interaction.arm(ty);
        self.store.clear_selection();
    }

    /// Escape: drop the tool, the ghost, any gesture, and the selection.
    pub fn cancel(&mut self) {
        self.interaction.cancel();
        self.interaction.set_hand(false);
        self.store.clear_selection();
    }

    /// Remove the selected element. Returns its id.
    pub fn delete_selected(&mut self) -> Option<ElementId> {
        let id = self.store.selected()?;
        self.apply_mutation(EditorMutation::Remove(id));
        Some(id)
    }

    pub fn select(&mut self, id: Option<ElementId>) {
        self.apply_mutation(EditorMutation::Select(id));
    }

    /// Property-panel edit of one element.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) -> Option<ChangeSet> {
        let changes = self.store.update(id, &patch)?;
        self.record_update(id, changes.clone());
        Some(changes)
    }

    pub fn set_snap_to_grid(&mut self, on: bool) {
        self.config.snap_to_grid = on;
    }

    pub fn set_unit(&mut self, unit: sp_core::units::UnitSystem) {
        self.config.unit = unit;
    }

    /// Apply one mutation to the store or view and record the change.
    pub fn apply_mutation(&mut self, mutation: EditorMutation) {
        match mutation {
            EditorMutation::Add(element) => {
                let id = self.store.add(*element);
                self.publish(StoreChange::Added(id));
            }
            EditorMutation::Update { id, patch } => {
                if let Some(changes) = self.store.update(id, &patch) {
                    self.record_update(id, changes);
                }
            }
            EditorMutation::Remove(id) => {
                if self.store.remove(id).is_some() {
                    self.interaction.forget(id);
                    self.publish(StoreChange::Removed(id));
                }
            }
            EditorMutation::Select(Some(id)) => {
                self.store.select(id);
            }
            EditorMutation::Select(None) => self.store.clear_selection(),
            EditorMutation::Pan { dx, dy } => self.viewport.pan_by(dx, dy),
            EditorMutation::Rejected(err) => self.report(err),
            EditorMutation::Replace(elements) => {
                self.interaction.end_gesture();
                self.store.replace_all(elements);
                self.publish(StoreChange::Replaced);
            }
        }
    }

    fn record_update(&mut self, id: ElementId, changes: ChangeSet) {
        if !changes.is_empty() {
            self.publish(StoreChange::Updated { id, changes });
        }
    }

    fn publish(&mut self, change: StoreChange) {
        if change.moves_footprint() {
            self.plan_center = self.store.plan_center();
        }
        self.changes.push(change);
    }

    /// Log a failure and queue its notice. Placement and import failures
    /// block; persistence failures are a toast.
    fn report(&mut self, err: impl Into<PlanError>) {
        let err = err.into();
        log::warn!("session: {err}");
        let level = match err {
            PlanError::Persist(_) => NoticeLevel::Toast,
            PlanError::Placement(_) | PlanError::Import(_) => NoticeLevel::Blocking,
        };
        self.notify(level, err.notice_key());
    }

    fn notify(&mut self, level: NoticeLevel, key: &'static str) {
        let message = self.labels.text(key);
        self.notices.push(Notice { level, key, message });
    }

    // ─── Documents ───────────────────────────────────────────────────────

    /// Replace the plan with an imported element array. On failure the
    /// store is left untouched and a blocking notice is raised.
    pub fn import_json(&mut self, json: &str) -> Result<usize, ImportError> {
        match import_elements(json) {
            Ok(elements) => {
                let count = elements.len();
                self.apply_mutation(EditorMutation::Replace(elements));
                self.notify(NoticeLevel::Toast, "notice.import_done");
                log::debug!("session: imported {count} elements");
                Ok(count)
            }
            Err(err) => {
                self.report(err.clone());
                Err(err)
            }
        }
    }

    pub fn export_json(&self) -> String {
        export_elements(self.store.elements())
    }

    /// Load a set of elements without going through JSON.
    pub fn load_elements(&mut self, elements: Vec<SpatialElement>) {
        self.apply_mutation(EditorMutation::Replace(elements));
    }

    /// Save the current elements under `id` and make it the active plan.
    pub fn save_plan<S: DocumentStore>(
        &mut self,
        library: &mut PlanLibrary<S>,
        id: &str,
        name: &str,
        now: DateTime<Utc>,
    ) -> Result<FloorPlan, PersistError> {
        let result = library
            .save(id, name, self.store.elements(), now)
            .and_then(|plan| library.set_active(id).map(|()| plan));
        match &result {
            Ok(_) => self.notify(NoticeLevel::Toast, "notice.saved"),
            Err(err) => self.report(err.clone()),
        }
        result
    }

    pub fn load_plan<S: DocumentStore>(&mut self, library: &PlanLibrary<S>, id: &str) -> Result<FloorPlan, PersistError> {
        match library.load(id) {
            Ok(plan) => {
                self.load_elements(plan.elements.clone());
                Ok(plan)
            }
            Err(err) => {
                self.report(err.clone());
                Err(err)
            }
        }
    }

    /// Reopen the library's active plan, if there is one.
    pub fn restore_active<S: DocumentStore>(
        &mut self,
        library: &PlanLibrary<S>,
    ) -> Result<Option<FloorPlan>, PersistError> {
        let active = library.active().inspect_err(|err| self.report(err.clone()))?;
        match active {
            Some(id) => self.load_plan(library, &id).map(Some),
            None => Ok(None),
        }
    }

    // ─── Export ──────────────────────────────────────────────────────────

    pub fn export_frame(&self) -> ExportFrame {
        ExportFrame::build(&self.store, self.labels.as_ref(), &self.config)
    }

    pub fn export_svg(&self) -> String {
        render_svg(&self.export_frame())
    }

    pub fn export_png(&mut self) -> Result<Vec<u8>, ExportError> {
        let result = render_png(&self.export_frame());
        self.report_export(result)
    }

    /// Printable document from the 2D plan.
    pub fn export_document(&mut self, sink: &mut dyn DocumentSink, now: DateTime<Utc>) -> Result<(), ExportError> {
        let result = export_plan_document(&self.store, self.labels.as_ref(), &self.config, now, sink);
        self.report_export(result)
    }

    /// Printable document around a frame captured from the 3D view.
    pub fn export_scene_document(
        &mut self,
        capture: &mut dyn FrameCapture,
        sink: &mut dyn DocumentSink,
        now: DateTime<Utc>,
    ) -> Result<(), ExportError> {
        let result = export_scene_document(&self.store, capture, self.labels.as_ref(), &self.config, now, sink);
        self.report_export(result)
    }

    fn report_export<T>(&mut self, result: Result<T, ExportError>) -> Result<T, ExportError> {
        if let Err(err) = &result {
            log::warn!("session: export failed: {err}");
            self.notify(NoticeLevel::Toast, err.notice_key());
        }
        result
    }
}
