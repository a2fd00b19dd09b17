pub mod catalog;
pub mod change;
pub mod config;
pub mod constraints;
pub mod document;
pub mod error;
pub mod furniture;
pub mod geometry;
pub mod id;
pub mod labels;
pub mod library;
pub mod model;
pub mod store;
pub mod units;

pub use change::StoreChange;
pub use config::{EditorConfig, ReadingDirection};
pub use constraints::{Placement, can_place, check_placement, find_parent_wall};
pub use error::{ImportError, PersistError, PlacementError, PlanError};
pub use geometry::{Bounds, ResizeHandle};
pub use id::ElementId;
pub use labels::{LabelProvider, Locale, StaticLabels};
pub use model::*;
pub use store::ElementStore;
pub use units::UnitSystem;
