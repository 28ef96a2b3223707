use serde::{Deserialize, Serialize};

use crate::math::{Mat3, Point3, Vec3};

/// Yaw/pitch/roll in radians, composed as `Rz(yaw) * Rx(pitch) * Ry(roll)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl Orientation {
    pub fn from_degrees(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            yaw: yaw.to_radians(),
            pitch: pitch.to_radians(),
            roll: roll.to_radians(),
        }
    }

    pub fn rotation(&self) -> Mat3 {
        Mat3::yaw_pitch_roll(self.yaw, self.pitch, self.roll)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedRect {
    pub center: Point3,
    pub width: f64,
    pub height: f64,
    pub orientation: Orientation,
}

impl OrientedRect {
    /// Corners in winding order, local z = 0.
    pub fn corners(&self) -> [Point3; 4] {
        let hx = self.width / 2.0;
        let hy = self.height / 2.0;
        let r = self.orientation.rotation();
        [
            Vec3::new(hx, hy, 0.0),
            Vec3::new(-hx, hy, 0.0),
            Vec3::new(-hx, -hy, 0.0),
            Vec3::new(hx, -hy, 0.0),
        ]
        .map(|local| self.center + r * local)
    }
}

/// Vertex indices of the six box faces; each is a planar quad.
pub const BOX_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [7, 6, 5, 4],
    [0, 3, 7, 4],
    [1, 5, 6, 2],
    [0, 4, 5, 1],
    [3, 2, 6, 7],
];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientedBox {
    pub center: Point3,
    pub size: Vec3,
    pub orientation: Orientation,
}

impl OrientedBox {
    /// Top ring (+z) first, then bottom ring, both counter-clockwise from
    /// the `(+x, +y)` corner.
    pub fn vertices(&self) -> [Point3; 8] {
        let h = self.size * 0.5;
        let r = self.orientation.rotation();
        [
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
        ]
        .map(|local| self.center + r * local)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceDepth {
    pub face: usize,
    pub depth: f64,
}

/// Painter's order for the box faces given each vertex's camera depth
/// (`None` when the vertex is not visible). Faces with any hidden vertex are
/// dropped; the rest are sorted farthest first.
pub fn faces_back_to_front(vertex_depths: &[Option<f64>; 8]) -> Vec<FaceDepth> {
    let mut faces: Vec<FaceDepth> = BOX_FACES
        .iter()
        .enumerate()
        .filter_map(|(face, indices)| {
            let mut sum = 0.0;
            for &idx in indices {
                sum += vertex_depths[idx]?;
            }
            Some(FaceDepth {
                face,
                depth: sum / 4.0,
            })
        })
        .collect();
    faces.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    faces
}
