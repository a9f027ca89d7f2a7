//! Rigid-body math for anchors and tracked poses
//!
//! Uses a right-handed coordinate system:
//! - X: Right (+) / Left (-)
//! - Y: Up (+) / Down (-)
//! - Z: Forward (+) / Backward (-)

mod matrix;
mod point3d;
mod pose;
mod quaternion;
mod transform;
mod vector3d;

pub use matrix::Matrix4;
pub use point3d::Point3D;
pub use pose::Pose;
pub use quaternion::Quaternion;
pub use transform::Transform;
pub use vector3d::Vector3D;

/// Tolerance used by the approximate comparisons in this module.
pub const EPSILON: f32 = 1e-4;
