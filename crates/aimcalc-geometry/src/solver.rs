use aimcalc_base::DEGENERATE_EPS;
use serde::{Deserialize, Serialize};

use crate::math::{Point3, Vec3};

/// Planar reference point in world XY.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

impl PlanePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Mounting offsets: the FLR offset is expressed in the frame of the
/// reference center, which is the midpoint of the left/right D1 points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MountGeometry {
    pub flr: Vec3,
    pub d1_left: PlanePoint,
    pub d1_right: PlanePoint,
}

impl Default for MountGeometry {
    fn default() -> Self {
        Self {
            flr: Vec3::new(5638.0, 0.0, 0.0),
            d1_left: PlanePoint::new(-4300.0, 1245.0),
            d1_right: PlanePoint::new(-4300.0, -1255.0),
        }
    }
}

impl MountGeometry {
    pub fn reference_center(&self) -> PlanePoint {
        PlanePoint::new(
            self.d1_left.x + (self.d1_right.x - self.d1_left.x) / 2.0,
            self.d1_left.y + (self.d1_right.y - self.d1_left.y) / 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct BaseSolution {
    pub center: PlanePoint,
    pub base: Point3,
}

/// Base = reference center + FLR rotated in-plane by `beta_deg`; FLRz passes
/// through unchanged.
pub fn compute_base(mount: &MountGeometry, beta_deg: f64) -> BaseSolution {
    let center = mount.reference_center();
    let (sb, cb) = beta_deg.to_radians().sin_cos();
    let flr = mount.flr;
    let base = Point3::new(
        center.x + (flr.x * cb - flr.y * sb),
        center.y + (flr.x * sb + flr.y * cb),
        flr.z,
    );
    BaseSolution { center, base }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RayDirection {
    pub dir: Vec3,
    pub eta_deg: f64,
    pub eta_rad: f64,
}

/// Unit aim direction from azimuth `eta = eps - alpha` and polar angle
/// `theta` measured from +Z. All inputs in degrees.
pub fn compute_ray(eps_deg: f64, alpha_deg: f64, theta_deg: f64) -> RayDirection {
    let eta_deg = eps_deg - alpha_deg;
    let eta_rad = eta_deg.to_radians();
    let (st, ct) = theta_deg.to_radians().sin_cos();
    let (se, ce) = eta_rad.sin_cos();
    RayDirection {
        dir: Vec3::new(ce * st, se * st, ct),
        eta_deg,
        eta_rad,
    }
}

pub fn compute_target(base: Point3, ray: &RayDirection, distance: f64) -> Point3 {
    base + ray.dir * distance
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputAngles {
    pub distance: f64,
    pub eta_deg: f64,
    pub theta_deg: f64,
    pub elev_deg: f64,
    pub eps_deg: f64,
    pub valid: bool,
}

impl OutputAngles {
    pub const INVALID: Self = Self {
        distance: 0.0,
        eta_deg: 0.0,
        theta_deg: 0.0,
        elev_deg: 0.0,
        eps_deg: 0.0,
        valid: false,
    };
}

/// Back-derives the aim angles between two points. Coincident points give
/// [`OutputAngles::INVALID`].
pub fn compute_output_angles(base: Point3, target: Point3, alpha_deg: f64) -> OutputAngles {
    let d = target - base;
    let distance = d.length();
    if distance < DEGENERATE_EPS {
        return OutputAngles::INVALID;
    }
    let eta = d.y.atan2(d.x);
    let theta = (d.z / distance).clamp(-1.0, 1.0).acos();
    let eta_deg = eta.to_degrees();
    let theta_deg = theta.to_degrees();
    OutputAngles {
        distance,
        eta_deg,
        theta_deg,
        elev_deg: 90.0 - theta_deg,
        eps_deg: eta_deg + alpha_deg,
        valid: true,
    }
}

/// Closed-form target Y used to cross-check the vector pipeline.
pub fn yt_formula(
    mount: &MountGeometry,
    beta_deg: f64,
    eps_deg: f64,
    alpha_deg: f64,
    theta_deg: f64,
    distance: f64,
) -> f64 {
    let beta = beta_deg.to_radians();
    (mount.d1_left.y + mount.d1_right.y) / 2.0
        + mount.flr.x * beta.sin()
        + mount.flr.y * beta.cos()
        + distance * (eps_deg - alpha_deg).to_radians().sin() * theta_deg.to_radians().sin()
}
