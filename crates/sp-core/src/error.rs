//! Error types for plan editing and persistence.
//!
//! Every failure here is recoverable: the operation is not applied and the
//! prior state stays intact. Each variant carries the label key of the
//! notice the editor shows for it.

use crate::model::ElementType;
use thiserror::Error;

/// A door or window would be committed where its wall rule fails.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlacementError {
    /// Door rectangle does not touch any wall.
    #[error("door at ({x}, {y}) does not touch any wall")]
    DoorNeedsWall { x: f32, y: f32 },

    /// Window rectangle is not fully inside any wall.
    #[error("window at ({x}, {y}) is not inside any wall")]
    WindowNeedsWall { x: f32, y: f32 },
}

impl PlacementError {
    pub fn notice_key(&self) -> &'static str {
        match self {
            Self::DoorNeedsWall { .. } => "notice.door_needs_wall",
            Self::WindowNeedsWall { .. } => "notice.window_needs_wall",
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Self::DoorNeedsWall { .. } => ElementType::Door,
            Self::WindowNeedsWall { .. } => ElementType::Window,
        }
    }
}

/// Imported data could not be turned into elements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// Not valid JSON, or not an array of element records.
    #[error("malformed plan data: {message}")]
    Malformed { message: String },

    /// Parsed, but an element has a non-finite or negative extent.
    #[error("element {index} has invalid geometry")]
    InvalidGeometry { index: usize },
}

impl ImportError {
    pub fn notice_key(&self) -> &'static str {
        "notice.import_failed"
    }
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed {
            message: err.to_string(),
        }
    }
}

/// Saving or loading a plan through a document store failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistError {
    /// The backing store rejected a read or write.
    #[error("document store error on `{key}`: {message}")]
    Store { key: String, message: String },

    /// Stored data is not a valid plan list.
    #[error("stored plans under `{key}` are corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// No plan with that id.
    #[error("no saved plan with id `{id}`")]
    NotFound { id: String },
}

impl PersistError {
    pub fn notice_key(&self) -> &'static str {
        match self {
            Self::Store { .. } => "notice.save_failed",
            Self::Corrupt { .. } | Self::NotFound { .. } => "notice.load_failed",
        }
    }
}

/// Umbrella error for callers that cross several layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Import(#[from] ImportError),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

impl PlanError {
    pub fn notice_key(&self) -> &'static str {
        match self {
            Self::Placement(e) => e.notice_key(),
            Self::Import(e) => e.notice_key(),
            Self::Persist(e) => e.notice_key(),
        }
    }
}
