//! JSON document format for plans and bare element arrays.
//!
//! Two shapes are accepted on the wire:
//!
//! - a full [`FloorPlan`] envelope (`{ id, name, elements, createdAt, updatedAt }`)
//! - a raw element array, as produced by "export JSON" and consumed by
//!   "import"

use crate::error::ImportError;
use crate::geometry::normalize_degrees;
use crate::model::{FloorPlan, SpatialElement};

/// Parse an imported element array. Rejects the whole document if any
/// record is malformed or has unusable geometry.
pub fn import_elements(json: &str) -> Result<Vec<SpatialElement>, ImportError> {
    let mut elements: Vec<SpatialElement> = serde_json::from_str(json)?;
    validate(&mut elements)?;
    log::debug!("import: parsed {} elements", elements.len());
    Ok(elements)
}

/// Serialize elements as a pretty-printed JSON array.
pub fn export_elements(elements: &[SpatialElement]) -> String {
    // Plain data with string keys cannot fail to serialize.
    serde_json::to_string_pretty(elements).unwrap_or_else(|_| "[]".to_string())
}

/// Parse a full plan envelope.
pub fn parse_plan(json: &str) -> Result<FloorPlan, ImportError> {
    let mut plan: FloorPlan = serde_json::from_str(json)?;
    validate(&mut plan.elements)?;
    Ok(plan)
}

pub fn plan_to_json(plan: &FloorPlan) -> String {
    serde_json::to_string_pretty(plan).unwrap_or_else(|_| "{}".to_string())
}

/// Reject broken geometry and wrap rotations into `[0, 360)`.
fn validate(elements: &mut [SpatialElement]) -> Result<(), ImportError> {
    for (index, el) in elements.iter_mut().enumerate() {
        let finite = [el.x, el.y, el.width, el.height, el.depth, el.rotation]
            .iter()
            .all(|v| v.is_finite());
        if !finite || el.width < 0.0 || el.height < 0.0 || el.depth < 0.0 {
            return Err(ImportError::InvalidGeometry { index });
        }
        el.rotation = normalize_degrees(el.rotation);
    }
    Ok(())
}
