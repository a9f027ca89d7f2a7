//! 4x4 affine matrix for world placement and reference frames

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::{Point3D, Quaternion, Vector3D};

/// Row-major 4x4 matrix acting on column vectors (`M * p`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    rows: [[f32; 4]; 4],
}

impl Matrix4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Translation * rotation * scale.
    pub fn from_trs(translation: Point3D, rotation: Quaternion, scale: Vector3D) -> Self {
        let Quaternion { x, y, z, w } = rotation.normalize();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);

        Self {
            rows: [
                [
                    (1.0 - 2.0 * (yy + zz)) * scale.x,
                    2.0 * (xy - wz) * scale.y,
                    2.0 * (xz + wy) * scale.z,
                    translation.x,
                ],
                [
                    2.0 * (xy + wz) * scale.x,
                    (1.0 - 2.0 * (xx + zz)) * scale.y,
                    2.0 * (yz - wx) * scale.z,
                    translation.y,
                ],
                [
                    2.0 * (xz - wy) * scale.x,
                    2.0 * (yz + wx) * scale.y,
                    (1.0 - 2.0 * (xx + yy)) * scale.z,
                    translation.z,
                ],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Translation column
    pub fn translation(&self) -> Point3D {
        Point3D::new(self.rows[0][3], self.rows[1][3], self.rows[2][3])
    }

    pub fn transform_point(&self, p: Point3D) -> Point3D {
        let r = &self.rows;
        Point3D::new(
            r[0][0] * p.x + r[0][1] * p.y + r[0][2] * p.z + r[0][3],
            r[1][0] * p.x + r[1][1] * p.y + r[1][2] * p.z + r[1][3],
            r[2][0] * p.x + r[2][1] * p.y + r[2][2] * p.z + r[2][3],
        )
    }

    pub fn approx_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut rows = [[0.0f32; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.rows[i][k] * rhs.rows[k][j]).sum();
            }
        }
        Matrix4 { rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::EPSILON;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_is_neutral() {
        let m = Matrix4::from_trs(
            Point3D::new(1.0, 2.0, 3.0),
            Quaternion::from_euler(0.4, 0.2, 0.0),
            Vector3D::new(2.0, 2.0, 2.0),
        );
        assert!((m * Matrix4::IDENTITY).approx_eq(&m, EPSILON));
        assert!((Matrix4::IDENTITY * m).approx_eq(&m, EPSILON));
    }

    #[test]
    fn test_trs_applies_scale_then_rotation_then_translation() {
        let m = Matrix4::from_trs(
            Point3D::new(10.0, 0.0, 0.0),
            Quaternion::from_axis_angle(Vector3D::UP, FRAC_PI_2),
            Vector3D::new(2.0, 2.0, 2.0),
        );
        // (0,0,1) scaled to (0,0,2), yawed to (2,0,0), shifted to (12,0,0)
        let p = m.transform_point(Point3D::new(0.0, 0.0, 1.0));
        assert!(p.distance(&Point3D::new(12.0, 0.0, 0.0)) < EPSILON);
        assert_eq!(m.translation(), Point3D::new(10.0, 0.0, 0.0));
    }
}
