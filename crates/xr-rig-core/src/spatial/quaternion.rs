//! Unit quaternion orientation

use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::Vector3D;

/// A rotation in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quaternion {
    /// Identity quaternion (no rotation)
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Create a new quaternion
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle_radians` about `axis`
    pub fn from_axis_angle(axis: Vector3D, angle_radians: f32) -> Self {
        let (sin_half, cos_half) = (angle_radians * 0.5).sin_cos();
        let axis = axis.normalize();
        Self::new(axis.x * sin_half, axis.y * sin_half, axis.z * sin_half, cos_half)
    }

    /// Yaw about Y, then pitch about X, then roll about Z (all radians).
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        Self::from_axis_angle(Vector3D::UP, yaw)
            * Self::from_axis_angle(Vector3D::RIGHT, pitch)
            * Self::from_axis_angle(Vector3D::FORWARD, roll)
    }

    /// Magnitude of the quaternion
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit-length copy, or identity for a zero quaternion
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag > 0.0 {
            Self::new(self.x / mag, self.y / mag, self.z / mag, self.w / mag)
        } else {
            Self::IDENTITY
        }
    }

    /// Conjugate of the quaternion
    pub fn conjugate(&self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Multiplicative inverse; identity for a zero quaternion.
    pub fn inverse(&self) -> Self {
        let mag_sq = self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w;
        if mag_sq > 0.0 {
            let c = self.conjugate();
            Self::new(c.x / mag_sq, c.y / mag_sq, c.z / mag_sq, c.w / mag_sq)
        } else {
            Self::IDENTITY
        }
    }

    /// Rotate a vector by this quaternion
    pub fn rotate_vector(&self, v: Vector3D) -> Vector3D {
        let q_vec = Vector3D::new(self.x, self.y, self.z);
        let uv = q_vec.cross(&v);
        let uuv = q_vec.cross(&uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// True when both describe the same rotation (`q` and `-q` are equivalent).
    pub fn approx_eq(&self, other: &Quaternion, epsilon: f32) -> bool {
        let dot = self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w;
        (dot.abs() - 1.0).abs() <= epsilon
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Self) -> Self::Output {
        Quaternion::new(
            self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_yaw_turns_forward_to_right() {
        let q = Quaternion::from_axis_angle(Vector3D::UP, FRAC_PI_2);
        let rotated = q.rotate_vector(Vector3D::FORWARD);
        assert!((rotated.x - 1.0).abs() < 0.0001);
        assert!(rotated.z.abs() < 0.0001);
    }

    #[test]
    fn test_inverse_cancels() {
        let q = Quaternion::from_euler(0.3, -0.2, 0.1);
        assert!((q * q.inverse()).approx_eq(&Quaternion::IDENTITY, 0.0001));
    }

    #[test]
    fn test_negated_is_same_rotation() {
        let q = Quaternion::from_euler(1.0, 0.5, 0.0);
        let neg = Quaternion::new(-q.x, -q.y, -q.z, -q.w);
        assert!(q.approx_eq(&neg, 0.0001));
    }
}
