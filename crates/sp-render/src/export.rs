//! Plan export: raster frame, PNG encoding, and the printable document.
//!
//! An [`ExportFrame`] is the plan's bounding box grown by the export
//! margin, with every element positioned relative to the frame's top-left
//! corner. The same frame feeds the PNG backend here and the SVG backend
//! in [`crate::svg`]. In 3D mode the host hands over a [`FrameCapture`]
//! instead and the document is built around the captured image.

use crate::presentation::{BoxShape, PlanBox, plan_box};
use chrono::{DateTime, Utc};
use kurbo::Affine;
use serde::Serialize;
use sp_core::config::EditorConfig;
use sp_core::geometry::Bounds;
use sp_core::labels::LabelProvider;
use sp_core::model::{Color, SpatialElement};
use sp_core::store::ElementStore;
use sp_core::units::format_dimensions;
use thiserror::Error;
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

pub const EXPORT_BACKGROUND: Color = Color::rgba(248.0 / 255.0, 248.0 / 255.0, 248.0 / 255.0, 1.0);
pub const EXPORT_GRID: Color = Color::rgba(221.0 / 255.0, 221.0 / 255.0, 221.0 / 255.0, 1.0);

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error("export frame {width}×{height} cannot be allocated")]
    Canvas { width: u32, height: u32 },
    #[error("image encoding failed: {0}")]
    Encode(String),
    #[error("frame capture failed: {0}")]
    Capture(String),
    #[error("document sink failed: {0}")]
    Sink(String),
}

impl ExportError {
    pub fn notice_key(&self) -> &'static str {
        "notice.export_failed"
    }
}

// ─── Frame ───────────────────────────────────────────────────────────────────

/// Everything needed to draw the plan off-screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFrame {
    /// Plan-space position of the frame's top-left corner.
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
    pub grid_size: f32,
    pub background: Color,
    pub grid: Color,
    /// Elements in insertion order, labelled by type.
    pub items: Vec<PlanBox>,
}

impl ExportFrame {
    /// Frame the whole store. An empty plan yields a frame of twice the
    /// margin around the origin.
    pub fn build(store: &ElementStore, labels: &dyn LabelProvider, config: &EditorConfig) -> Self {
        let bbox = store
            .bounding_box()
            .unwrap_or(Bounds::new(0.0, 0.0, 0.0, 0.0))
            .inflate(config.export_margin);
        let items = store
            .elements()
            .iter()
            .enumerate()
            .map(|(z, el)| {
                let mut item = plan_box(el, z, false, labels, config.unit);
                item.label = labels.element_label(el.element_type);
                item
            })
            .collect();
        Self {
            origin_x: bbox.x,
            origin_y: bbox.y,
            width: bbox.width,
            height: bbox.height,
            grid_size: config.grid_size,
            background: EXPORT_BACKGROUND,
            grid: EXPORT_GRID,
            items,
        }
    }

    /// Frame-local transform for one item: shift by the origin, then rotate
    /// about the item's center.
    pub fn item_transform(&self, item: &PlanBox) -> Affine {
        Affine::translate((-self.origin_x as f64, -self.origin_y as f64)) * item.transform()
    }

    /// Frame-local positions of the vertical and horizontal grid lines.
    pub fn grid_lines(&self) -> (Vec<f32>, Vec<f32>) {
        let step = self.grid_size;
        if step <= 0.0 {
            return (Vec::new(), Vec::new());
        }
        let lines = |extent: f32| {
            let mut out = Vec::new();
            let mut at = 0.0;
            while at < extent {
                out.push(at);
                at += step;
            }
            out
        };
        (lines(self.width), lines(self.height))
    }

    /// Pixel size of the raster, at least one pixel each way.
    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width.ceil().max(1.0) as u32, self.height.ceil().max(1.0) as u32)
    }
}

// ─── PNG backend ─────────────────────────────────────────────────────────────

/// Rasterize the frame and encode it as PNG.
///
/// Shapes and grid only; label text is left to the SVG backend and the
/// document legend.
pub fn render_png(frame: &ExportFrame) -> Result<Vec<u8>, ExportError> {
    let pixmap = rasterize(frame)?;
    pixmap.encode_png().map_err(|e| ExportError::Encode(e.to_string()))
}

pub fn rasterize(frame: &ExportFrame) -> Result<Pixmap, ExportError> {
    let (width, height) = frame.pixel_size();
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Canvas { width, height })?;
    pixmap.fill(to_skia(frame.background));

    let mut paint = Paint::default();
    paint.set_color(to_skia(frame.grid));
    paint.anti_alias = false;
    let hairline = Stroke {
        width: 1.0,
        ..Default::default()
    };
    let (columns, rows) = frame.grid_lines();
    let mut pb = PathBuilder::new();
    for x in columns {
        pb.move_to(x, 0.0);
        pb.line_to(x, frame.height);
    }
    for y in rows {
        pb.move_to(0.0, y);
        pb.line_to(frame.width, y);
    }
    if let Some(path) = pb.finish() {
        pixmap.stroke_path(&path, &paint, &hairline, Transform::identity(), None);
    }

    for item in &frame.items {
        let transform = to_skia_transform(frame.item_transform(item));
        let b = &item.bounds;
        let Some(rect) = Rect::from_xywh(b.x, b.y, b.width.max(0.5), b.height.max(0.5)) else {
            log::warn!("export: skipping degenerate {} {:?}", item.id.as_str(), b);
            continue;
        };
        let mut fill = Paint::default();
        fill.set_color(to_skia(item.fill));
        let mut outline = Paint::default();
        outline.set_color(to_skia(Color::BLACK));

        let path = match item.shape {
            BoxShape::Ellipse => PathBuilder::from_oval(rect),
            BoxShape::Rect | BoxShape::Line => Some(PathBuilder::from_rect(rect)),
        };
        if let Some(path) = path {
            pixmap.fill_path(&path, &fill, FillRule::Winding, transform, None);
            pixmap.stroke_path(&path, &outline, &hairline, transform, None);
        }
    }

    log::debug!("export: rasterized {} items at {width}×{height}", frame.items.len());
    Ok(pixmap)
}

fn to_skia(color: Color) -> tiny_skia::Color {
    let [r, g, b, a] = color.to_rgba8();
    tiny_skia::Color::from_rgba8(r, g, b, a)
}

fn to_skia_transform(affine: Affine) -> Transform {
    let [a, b, c, d, e, f] = affine.as_coeffs();
    Transform::from_row(a as f32, b as f32, c as f32, d as f32, e as f32, f as f32)
}

// ─── Document ────────────────────────────────────────────────────────────────

/// An encoded image plus its pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportImage {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

/// Supplies the current 3D frame when exporting from the 3D view.
pub trait FrameCapture {
    fn capture(&mut self) -> Result<ExportImage, ExportError>;
}

/// The printable plan: header, embedded image, legend.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentExport {
    pub title: String,
    /// `"{generated_on}: {date}"`.
    pub generated_on: String,
    /// `"{element_count}: {n}"`.
    pub element_count: String,
    pub legend_title: String,
    /// `"{label}: {w × h × d}"` for the first `legend_limit` elements.
    pub legend: Vec<String>,
    pub image: ExportImage,
}

/// Receives the finished document (PDF writer, download, print dialog).
pub trait DocumentSink {
    fn write_document(&mut self, document: &DocumentExport) -> Result<(), ExportError>;
}

/// Which view the export was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportView {
    Plan,
    Scene,
}

impl ExportView {
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::Plan => "floor-plan-2d",
            Self::Scene => "floor-plan-3d",
        }
    }
}

/// Legend lines for the first `limit` elements in insertion order.
pub fn legend(elements: &[SpatialElement], labels: &dyn LabelProvider, config: &EditorConfig) -> Vec<String> {
    elements
        .iter()
        .take(config.legend_limit)
        .map(|el| {
            format!(
                "{}: {}",
                labels.element_label(el.element_type),
                format_dimensions(el.width, el.height, el.depth, config.unit)
            )
        })
        .collect()
}

/// Assemble the document around an already encoded image.
pub fn build_document(
    store: &ElementStore,
    image: ExportImage,
    view: ExportView,
    labels: &dyn LabelProvider,
    config: &EditorConfig,
    now: DateTime<Utc>,
) -> DocumentExport {
    let title = match view {
        ExportView::Plan => labels.text("export.title"),
        ExportView::Scene => format!("{} 3D", labels.text("export.title")),
    };
    DocumentExport {
        title,
        generated_on: format!("{}: {}", labels.text("export.generated_on"), now.format("%Y-%m-%d")),
        element_count: format!("{}: {}", labels.text("export.element_count"), store.len()),
        legend_title: labels.text("export.legend"),
        legend: legend(store.elements(), labels, config),
        image,
    }
}

/// Rasterize the 2D plan and hand the document to `sink`.
pub fn export_plan_document(
    store: &ElementStore,
    labels: &dyn LabelProvider,
    config: &EditorConfig,
    now: DateTime<Utc>,
    sink: &mut dyn DocumentSink,
) -> Result<(), ExportError> {
    let frame = ExportFrame::build(store, labels, config);
    let (width, height) = frame.pixel_size();
    let png = render_png(&frame)?;
    let document = build_document(
        store,
        ExportImage { width, height, png },
        ExportView::Plan,
        labels,
        config,
        now,
    );
    sink.write_document(&document)
}

/// Capture the 3D frame and hand the document to `sink`.
pub fn export_scene_document(
    store: &ElementStore,
    capture: &mut dyn FrameCapture,
    labels: &dyn LabelProvider,
    config: &EditorConfig,
    now: DateTime<Utc>,
    sink: &mut dyn DocumentSink,
) -> Result<(), ExportError> {
    let image = capture.capture()?;
    let document = build_document(store, image, ExportView::Scene, labels, config, now);
    sink.write_document(&document)
}

/// `"{stem}-{YYYY-MM-DD}.{ext}"`.
pub fn export_file_name(stem: &str, now: DateTime<Utc>, extension: &str) -> String {
    format!("{stem}-{}.{extension}", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use sp_core::id::ElementId;
    use sp_core::labels::{Locale, StaticLabels};
    use sp_core::model::ElementType;

    fn store() -> ElementStore {
        let mut store = ElementStore::new();
        let mut wall = SpatialElement::new(ElementType::Wall, Bounds::new(100.0, 40.0, 200.0, 10.0), 100.0);
        wall.id = ElementId::intern("ex-wall");
        store.add(wall);
        let mut table = SpatialElement::new(ElementType::Table, Bounds::new(120.0, 80.0, 80.0, 60.0), 75.0);
        table.id = ElementId::intern("ex-table");
        table.rotation = 45.0;
        store.add(table);
        store
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).single().unwrap()
    }

    #[test]
    fn frame_is_bbox_plus_margin() {
        let labels = StaticLabels::for_locale(Locale::En);
        let frame = ExportFrame::build(&store(), &labels, &EditorConfig::default());
        assert_eq!((frame.origin_x, frame.origin_y), (50.0, -10.0));
        assert_eq!((frame.width, frame.height), (300.0, 200.0));
        assert_eq!(frame.items[0].label, "Wall");
        assert_eq!(frame.grid_lines().0.len(), 15);
    }

    #[test]
    fn empty_plan_frames_the_margin() {
        let frame = ExportFrame::build(&ElementStore::new(), &StaticLabels::default(), &EditorConfig::default());
        assert_eq!(frame.pixel_size(), (100, 100));
        assert!(frame.items.is_empty());
    }

    #[test]
    fn png_has_signature_and_background() {
        let frame = ExportFrame::build(&store(), &StaticLabels::default(), &EditorConfig::default());
        let png = render_png(&frame).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let pixmap = rasterize(&frame).unwrap();
        // (1, 1) sits between grid lines and outside every element.
        let px = pixmap.pixel(1, 1).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (248, 248, 248));
    }

    #[test]
    fn legend_is_capped() {
        let mut store = ElementStore::new();
        for i in 0..20 {
            store.add(SpatialElement::new(
                ElementType::Chair,
                Bounds::new(i as f32 * 50.0, 0.0, 40.0, 40.0),
                80.0,
            ));
        }
        let labels = StaticLabels::for_locale(Locale::En);
        let lines = legend(store.elements(), &labels, &EditorConfig::default());
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "Chair: 40cm × 40cm × 80cm");
    }

    struct Collect(Vec<DocumentExport>);

    impl DocumentSink for Collect {
        fn write_document(&mut self, document: &DocumentExport) -> Result<(), ExportError> {
            self.0.push(document.clone());
            Ok(())
        }
    }

    struct FixedFrame;

    impl FrameCapture for FixedFrame {
        fn capture(&mut self) -> Result<ExportImage, ExportError> {
            Ok(ExportImage {
                width: 640,
                height: 480,
                png: vec![1, 2, 3],
            })
        }
    }

    #[test]
    fn plan_document_has_header_and_image() {
        let labels = StaticLabels::for_locale(Locale::En);
        let mut sink = Collect(Vec::new());
        export_plan_document(&store(), &labels, &EditorConfig::default(), now(), &mut sink).unwrap();
        let doc = &sink.0[0];
        assert_eq!(doc.title, "Store floor plan");
        assert_eq!(doc.generated_on, "Generated on: 2026-03-14");
        assert_eq!(doc.element_count, "Element count: 2");
        assert_eq!((doc.image.width, doc.image.height), (300, 200));
    }

    #[test]
    fn scene_document_uses_capture() {
        let labels = StaticLabels::for_locale(Locale::En);
        let mut sink = Collect(Vec::new());
        export_scene_document(&store(), &mut FixedFrame, &labels, &EditorConfig::default(), now(), &mut sink)
            .unwrap();
        assert_eq!(sink.0[0].title, "Store floor plan 3D");
        assert_eq!(sink.0[0].image.png, vec![1, 2, 3]);
    }

    #[test]
    fn file_names_carry_the_date() {
        assert_eq!(
            export_file_name(ExportView::Scene.file_stem(), now(), "png"),
            "floor-plan-3d-2026-03-14.png"
        );
    }
}
