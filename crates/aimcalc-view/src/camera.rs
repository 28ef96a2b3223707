use aimcalc_geometry::{Point3, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ui::{Point2, pos2};

pub const PITCH_LIMIT: f64 = 1.2;
pub const MIN_RADIUS: f64 = 500.0;
pub const MAX_RADIUS: f64 = 60_000.0;
/// Radians of orbit per pixel of pointer movement.
pub const ORBIT_SPEED: f64 = 0.005;
/// Millimetres of radius per wheel unit.
pub const ZOOM_SPEED: f64 = 6.0;

const PARALLEL_EPS: f64 = 1.0e-8;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Sizes below one pixel are raised to one.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Spherical camera around the world origin, +Z up.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitCamera {
    pub yaw: f64,
    pub pitch: f64,
    pub radius: f64,
    pub fov_deg: f64,
    pub near: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.45,
            radius: 9000.0,
            fov_deg: 50.0,
            near: 1.0,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Point3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * cy, cp * sy, sp) * self.radius
    }

    pub fn camera(&self, viewport: Viewport) -> Camera {
        Camera {
            eye: self.eye(),
            target: Vec3::ZERO,
            up: Vec3::UNIT_Z,
            fov: self.fov_deg.to_radians(),
            aspect: viewport.aspect(),
            near: self.near,
        }
    }

    /// Applies a drag of `dx, dy` pixels.
    pub fn orbit(&mut self, dx: f64, dy: f64) {
        self.yaw -= dx * ORBIT_SPEED;
        self.pitch = (self.pitch - dy * ORBIT_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn zoom(&mut self, delta_y: f64) {
        self.radius = (self.radius + delta_y * ZOOM_SPEED).clamp(MIN_RADIUS, MAX_RADIUS);
        debug!(radius = self.radius, "zoom");
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

/// Orthonormal basis looking from `eye` at `target`. `up` only needs to be
/// roughly upward; it is re-orthogonalised.
pub fn camera_basis(eye: Point3, target: Point3, up: Vec3) -> CameraBasis {
    let forward = (target - eye).normalized();
    let mut right = forward.cross(up);
    if right.length() <= 1.0e-6 {
        right = forward.cross(Vec3::UNIT_Y);
    }
    let right = right.normalized();
    let up = right.cross(forward).normalized();
    CameraBasis { right, up, forward }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProjectedPoint {
    pub pos: Point2,
    /// Camera-space depth along the view direction.
    pub depth: f64,
    /// Perspective factor `f / z`; sizes markers and handle rings.
    pub scale: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Point3,
    pub dir: Vec3,
}

/// Perspective camera. `fov` is the vertical field of view in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub eye: Point3,
    pub target: Point3,
    pub up: Vec3,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
}

impl Camera {
    pub fn basis(&self) -> CameraBasis {
        camera_basis(self.eye, self.target, self.up)
    }

    fn focal(&self) -> f64 {
        1.0 / (0.5 * self.fov).tan()
    }

    pub fn world_to_camera(&self, point: Point3) -> Vec3 {
        let basis = self.basis();
        let rel = point - self.eye;
        Vec3::new(rel.dot(basis.right), rel.dot(basis.up), rel.dot(basis.forward))
    }

    /// `None` when the point sits at or behind the near plane.
    pub fn project(&self, point: Point3, viewport: Viewport) -> Option<ProjectedPoint> {
        let camera = self.world_to_camera(point);
        if camera.z <= self.near {
            return None;
        }
        let f = self.focal();
        let x_ndc = camera.x * f / (camera.z * self.aspect);
        let y_ndc = camera.y * f / camera.z;
        Some(ProjectedPoint {
            pos: pos2(
                (x_ndc + 1.0) * 0.5 * viewport.width,
                (1.0 - y_ndc) * 0.5 * viewport.height,
            ),
            depth: camera.z,
            scale: f / camera.z,
        })
    }

    /// World ray from the eye through a pixel. `dir` is unit length.
    pub fn screen_ray(&self, pos: Point2, viewport: Viewport) -> Ray {
        let x_ndc = pos.x / viewport.width * 2.0 - 1.0;
        let y_ndc = 1.0 - pos.y / viewport.height * 2.0;
        let f = self.focal();
        let local = Vec3::new(x_ndc * self.aspect / f, y_ndc / f, 1.0).normalized();
        let basis = self.basis();
        let dir = (basis.right * local.x + basis.up * local.y + basis.forward * local.z).normalized();
        Ray {
            origin: self.eye,
            dir,
        }
    }
}

/// Hit point on the plane `z = plane_z`, or `None` when the ray runs
/// parallel to it or the plane is behind the origin.
pub fn intersect_ray_plane_z(ray: &Ray, plane_z: f64) -> Option<Point3> {
    if ray.dir.z.abs() < PARALLEL_EPS {
        return None;
    }
    let t = (plane_z - ray.origin.z) / ray.dir.z;
    if t <= 0.0 {
        return None;
    }
    Some(ray.origin + ray.dir * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_matches_spherical_formula() {
        let orbit = OrbitCamera::default();
        let eye = orbit.eye();
        assert!((eye.length() - 9000.0).abs() < 1.0e-9);
        assert!((eye.z - 9000.0 * 0.45_f64.sin()).abs() < 1.0e-9);
    }

    #[test]
    fn basis_is_orthonormal_for_skewed_up() {
        let basis = camera_basis(
            Vec3::new(100.0, -50.0, 30.0),
            Vec3::ZERO,
            Vec3::new(0.3, 0.1, 2.0),
        );
        for v in [basis.right, basis.up, basis.forward] {
            assert!((v.length() - 1.0).abs() < 1.0e-12);
        }
        assert!(basis.right.dot(basis.up).abs() < 1.0e-12);
        assert!(basis.right.dot(basis.forward).abs() < 1.0e-12);
        assert!(basis.up.dot(basis.forward).abs() < 1.0e-12);
        assert!(basis.up.z > 0.0);
    }

    #[test]
    fn target_projects_to_viewport_centre() {
        let viewport = Viewport::new(800.0, 600.0);
        let camera = OrbitCamera::default().camera(viewport);
        let projected = camera.project(Vec3::ZERO, viewport);
        let Some(projected) = projected else {
            panic!("origin should be visible");
        };
        assert!((projected.pos.x - 400.0).abs() < 1.0e-9);
        assert!((projected.pos.y - 300.0).abs() < 1.0e-9);
        assert!((projected.depth - 9000.0).abs() < 1.0e-9);
    }

    #[test]
    fn parallel_and_backward_rays_miss() {
        let flat = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::UNIT_X,
        };
        assert_eq!(intersect_ray_plane_z(&flat, 0.0), None);

        let upward = Ray {
            origin: Vec3::new(0.0, 0.0, 10.0),
            dir: Vec3::UNIT_Z,
        };
        assert_eq!(intersect_ray_plane_z(&upward, 0.0), None);
        assert_eq!(
            intersect_ray_plane_z(&upward, 15.0),
            Some(Vec3::new(0.0, 0.0, 15.0))
        );
    }
}
