//! Local transform of a scene node (position + rotation + scale)

use serde::{Deserialize, Serialize};

use super::{Matrix4, Point3D, Pose, Quaternion, Vector3D};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Point3D,
    pub rotation: Quaternion,
    pub scale: Vector3D,
}

impl Transform {
    /// Origin, no rotation, unit scale
    pub fn identity() -> Self {
        Self {
            position: Point3D::ORIGIN,
            rotation: Quaternion::IDENTITY,
            scale: Vector3D::ONE,
        }
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self {
            position: pose.position,
            rotation: pose.orientation,
            scale: Vector3D::ONE,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }

    /// Overwrite rotation and position, leaving scale alone.
    ///
    /// Rotation is written before position; both fields are always replaced.
    pub fn set_pose(&mut self, pose: Pose) {
        self.rotation = pose.orientation;
        self.position = pose.position;
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::from_trs(self.position, self.rotation, self.scale)
    }

    pub fn transform_point(&self, local: Point3D) -> Point3D {
        self.to_matrix().transform_point(local)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
