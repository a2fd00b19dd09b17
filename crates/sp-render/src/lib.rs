pub mod export;
pub mod hit;
pub mod paint;
pub mod presentation;
pub mod svg;

pub use export::{DocumentExport, DocumentSink, ExportError, ExportFrame, ExportImage, FrameCapture};
pub use hit::{Hit, hit_test, hit_test_with_handles};
pub use presentation::{PlanBox, PlanView, build_view};
