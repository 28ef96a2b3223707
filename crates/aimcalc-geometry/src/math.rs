use aimcalc_base::DEGENERATE_EPS;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Points and vectors share one representation; positions are in millimeters.
pub type Point3 = Vec3;

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Unit vector in the same direction, or [`Vec3::ZERO`] when the length
    /// is below [`DEGENERATE_EPS`].
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < DEGENERATE_EPS {
            Self::ZERO
        } else {
            self / len
        }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl std::ops::Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl std::ops::Div<f64> for Vec3 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl std::ops::Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Row-major 3x3 matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat3 {
    pub rows: [[f64; 3]; 3],
}

impl Mat3 {
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    pub fn rot_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]])
    }

    pub fn rot_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]])
    }

    pub fn rot_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]])
    }

    /// `Rz(yaw) * Rx(pitch) * Ry(roll)`: yaw outermost, roll innermost.
    pub fn yaw_pitch_roll(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::rot_z(yaw) * Self::rot_x(pitch) * Self::rot_y(roll)
    }

    pub fn transpose(self) -> Self {
        let r = self.rows;
        Self::from_rows([
            [r[0][0], r[1][0], r[2][0]],
            [r[0][1], r[1][1], r[2][1]],
            [r[0][2], r[1][2], r[2][2]],
        ])
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        let mut out = [[0.0; 3]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = self.rows[i][0] * rhs.rows[0][j]
                    + self.rows[i][1] * rhs.rows[1][j]
                    + self.rows[i][2] * rhs.rows[2][j];
            }
        }
        Self::from_rows(out)
    }
}

impl std::ops::Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let r = self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_vec_close(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1.0e-12, "{a:?} != {b:?}");
    }

    #[test]
    fn normalizing_zero_returns_zero() {
        assert_eq!(Vec3::ZERO.normalized(), Vec3::ZERO);
        assert_eq!(Vec3::new(1.0e-13, 0.0, 0.0).normalized(), Vec3::ZERO);
        assert_vec_close(Vec3::new(0.0, 3.0, 4.0).normalized(), Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        assert_vec_close(Vec3::UNIT_X.cross(Vec3::UNIT_Y), Vec3::UNIT_Z);
        assert_vec_close(Vec3::UNIT_Y.cross(Vec3::UNIT_Z), Vec3::UNIT_X);
    }

    #[test]
    fn elementary_rotations_are_right_handed() {
        assert_vec_close(Mat3::rot_z(FRAC_PI_2) * Vec3::UNIT_X, Vec3::UNIT_Y);
        assert_vec_close(Mat3::rot_x(FRAC_PI_2) * Vec3::UNIT_Y, Vec3::UNIT_Z);
        assert_vec_close(Mat3::rot_y(FRAC_PI_2) * Vec3::UNIT_Z, Vec3::UNIT_X);
    }

    #[test]
    fn composition_applies_roll_first() {
        let r = Mat3::yaw_pitch_roll(FRAC_PI_2, FRAC_PI_2, 0.0);
        // pitch lifts +Y to +Z, yaw leaves +Z alone
        assert_vec_close(r * Vec3::UNIT_Y, Vec3::UNIT_Z);
        let r = Mat3::yaw_pitch_roll(FRAC_PI_2, 0.0, FRAC_PI_2);
        // roll takes +Z to +X, yaw takes +X to +Y
        assert_vec_close(r * Vec3::UNIT_Z, Vec3::UNIT_Y);
    }

    #[test]
    fn rotation_is_orthonormal() {
        let r = Mat3::yaw_pitch_roll(0.3, -0.7, 1.9);
        let product = r * r.transpose();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.rows[i][j] - expected).abs() < 1.0e-12);
            }
        }
    }
}
