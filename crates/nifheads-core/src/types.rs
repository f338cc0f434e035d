//! Common types used across nifheads
//!
//! Vectors serialize as plain arrays (`[x, y, z]`), which is the shape both
//! the scene dumps and the exported mesh document use.

use serde::{Deserialize, Serialize};

/// 3D vector (position, normal, translation)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for [f32; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

/// 2D vector (UV coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        v.to_array()
    }
}

/// 3x3 rotation matrix, rows first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mat3 {
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    pub const IDENTITY: Self = Self {
        m: [
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ],
    };

    /// Create a matrix from nine row-major values
    pub fn from_row_major(data: [f32; 9]) -> Self {
        Self {
            m: [
                [data[0], data[1], data[2]],
                [data[3], data[4], data[5]],
                [data[6], data[7], data[8]],
            ],
        }
    }

    /// Flatten to nine values, row after row
    pub fn to_row_major(&self) -> [f32; 9] {
        let [r0, r1, r2] = self.m;
        [
            r0[0], r0[1], r0[2],
            r1[0], r1[1], r1[2],
            r2[0], r2[1], r2[2],
        ]
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_serializes_as_array() {
        let v = Vec3::new(1.0, 2.5, -3.0);
        assert_eq!(serde_json::to_string(&v).unwrap(), "[1.0,2.5,-3.0]");

        let back: Vec3 = serde_json::from_str("[1.0,2.5,-3.0]").unwrap();
        assert_eq!(back, v);
    }

    #[test]
    fn test_vec2_from_array() {
        let uv: Vec2 = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(uv, Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_mat3_row_major() {
        let m = Mat3::from_row_major([1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(m.m[1], [4.0, 5.0, 6.0]);
        assert_eq!(m.to_row_major(), [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_mat3_deserializes_nested_rows() {
        let m: Mat3 = serde_json::from_str("[[0,1,0],[1,0,0],[0,0,1]]").unwrap();
        assert_eq!(m.to_row_major(), [0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
        assert_eq!(Mat3::default(), Mat3::IDENTITY);
    }
}
