//! Plan space → world space.
//!
//! World units equal plan units. Plan X stays X, plan Y becomes world Z,
//! and the floor is world Y = 0. A plan rotation of `r` degrees becomes a
//! yaw of `r·π/180` radians about world +Y.

use glam::{Mat4, Quat, Vec3};
use serde::Serialize;
use sp_core::geometry::Bounds;
use sp_core::model::SpatialElement;

/// Map a plan-space point onto the floor.
pub fn plan_to_world(x: f32, y: f32) -> Vec3 {
    Vec3::new(x, 0.0, y)
}

/// Yaw about world +Y for a plan rotation in degrees.
pub fn plan_yaw(degrees: f32) -> f32 {
    degrees.to_radians()
}

/// Placement of one object: its part tree root goes here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTransform {
    pub translation: Vec3,
    /// Radians about world +Y.
    pub yaw: f32,
}

impl ObjectTransform {
    /// Footprint center on the floor, turned by the element's rotation.
    pub fn for_element(el: &SpatialElement) -> Self {
        let (cx, cy) = el.center();
        Self {
            translation: plan_to_world(cx, cy),
            yaw: plan_yaw(el.rotation),
        }
    }

    /// Move to the element's footprint center, keeping the current height.
    pub fn recenter(&mut self, el: &SpatialElement) {
        let (cx, cy) = el.center();
        self.translation.x = cx;
        self.translation.z = cy;
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    /// Column-major world matrix, the layout WebGL hosts upload as is.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation(), self.translation)
    }
}

/// Perspective camera placement for the orbit controls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    /// Closest the camera frames a plan from.
    pub const MIN_DISTANCE: f32 = 300.0;

    /// Pose used when the 3D view mounts.
    pub fn looking_at(center: (f32, f32)) -> Self {
        let target = plan_to_world(center.0, center.1);
        Self {
            position: target + Vec3::new(0.0, 200.0, 300.0),
            target,
        }
    }

    /// Back off far enough to see the whole plan.
    pub fn framing(bounds: Option<Bounds>, center: (f32, f32)) -> Self {
        let size = bounds.map_or(0.0, |b| b.width.max(b.height));
        let distance = (size * 1.5).max(Self::MIN_DISTANCE);
        let target = plan_to_world(center.0, center.1);
        Self {
            position: target + Vec3::new(0.0, distance / 2.0, distance),
            target,
        }
    }
}
