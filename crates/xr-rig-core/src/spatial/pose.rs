//! Rigid pose reported by tracking hardware

use serde::{Deserialize, Serialize};

use super::{Matrix4, Point3D, Quaternion, Vector3D};

/// Position and orientation without scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point3D,
    pub orientation: Quaternion,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Point3D::ORIGIN,
        orientation: Quaternion::IDENTITY,
    };

    pub fn new(position: Point3D, orientation: Quaternion) -> Self {
        Self {
            position,
            orientation,
        }
    }

    /// The pose that undoes this one: `p * p.inverse() == IDENTITY`.
    pub fn inverse(&self) -> Self {
        let orientation = self.orientation.inverse();
        let position = orientation.rotate_vector(-self.position.to_vector()).to_point();
        Self {
            position,
            orientation,
        }
    }

    /// Apply `self` after `local`, i.e. express `local` in `self`'s parent frame.
    pub fn compose(&self, local: &Pose) -> Pose {
        Pose {
            position: self.position + self.orientation.rotate_vector(local.position.to_vector()),
            orientation: self.orientation * local.orientation,
        }
    }

    /// Shift the position along this pose's own axes.
    pub fn offset_local(&self, offset: Vector3D) -> Pose {
        Pose {
            position: self.position + self.orientation.rotate_vector(offset),
            orientation: self.orientation,
        }
    }

    pub fn to_matrix(&self) -> Matrix4 {
        Matrix4::from_trs(self.position, self.orientation, Vector3D::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::EPSILON;

    #[test]
    fn test_inverse_composes_to_identity() {
        let pose = Pose::new(
            Point3D::new(0.2, 1.6, -0.4),
            Quaternion::from_euler(0.7, -0.1, 0.05),
        );
        let result = pose.compose(&pose.inverse());
        assert!(result.position.distance(&Point3D::ORIGIN) < EPSILON);
        assert!(result.orientation.approx_eq(&Quaternion::IDENTITY, EPSILON));
    }

    #[test]
    fn test_matrix_matches_compose() {
        let a = Pose::new(Point3D::new(1.0, 0.0, 0.0), Quaternion::from_euler(0.5, 0.0, 0.0));
        let b = Pose::new(Point3D::new(0.0, 2.0, 1.0), Quaternion::from_euler(0.0, 0.3, 0.0));
        let via_matrix = a.to_matrix() * b.to_matrix();
        assert!(via_matrix.approx_eq(&a.compose(&b).to_matrix(), EPSILON));
    }
}
