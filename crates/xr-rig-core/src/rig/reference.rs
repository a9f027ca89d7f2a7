//! Tracking-space to world-space reference frame

use crate::spatial::{Matrix4, Pose};

/// Matrix taking a raw tracking-space pose into the rig's world frame.
///
/// `center_eye_world` is where the rig currently places the center eye and
/// `head` is the live head pose in tracking space; their relation
/// `W * inverse(H)` maps any other tracking-space pose the same way.
pub fn tracking_reference_matrix(center_eye_world: &Matrix4, head: &Pose) -> Matrix4 {
    *center_eye_world * head.inverse().to_matrix()
}
