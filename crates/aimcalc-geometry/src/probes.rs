use serde::Serialize;

use crate::math::{Point3, Vec3};
use crate::solver::{RayDirection, compute_ray};

const RAY_TOLERANCE: f64 = 1.0e-9;
const DISTANCE_TOLERANCE: f64 = 1.0e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProbeKind {
    UnitRay,
    BaseTargetDistance,
    YtAgreement,
    RayAlongX,
    RayUp,
    RayDown,
    RayAlongY,
}

impl ProbeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::UnitRay => "|r| = 1",
            Self::BaseTargetDistance => "|base -> target| = V",
            Self::YtAgreement => "Yt(sim) = Yt(formula)",
            Self::RayAlongX => "r(eta=0, theta=90) = (1,0,0)",
            Self::RayUp => "r(theta=0) = (0,0,1)",
            Self::RayDown => "r(theta=180) = (0,0,-1)",
            Self::RayAlongY => "r(eta=90, theta=90) = (0,1,0)",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ProbeResult {
    pub kind: ProbeKind,
    pub passed: bool,
    /// Measured quantity when the probe is informational (manual mode).
    pub measured: Option<f64>,
}

/// Inputs for the live probe battery.
#[derive(Clone, Copy, Debug)]
pub struct ProbeInputs {
    pub ray: RayDirection,
    pub base: Point3,
    pub target: Point3,
    pub distance: f64,
    pub d_yt: f64,
    pub angle_driven: bool,
}

pub fn run_probes(inputs: &ProbeInputs) -> Vec<ProbeResult> {
    let mut results = Vec::with_capacity(7);

    let unit = !inputs.angle_driven || (inputs.ray.dir.length() - 1.0).abs() < RAY_TOLERANCE;
    results.push(ProbeResult {
        kind: ProbeKind::UnitRay,
        passed: unit,
        measured: None,
    });

    let measured = inputs.base.distance(inputs.target);
    results.push(ProbeResult {
        kind: ProbeKind::BaseTargetDistance,
        passed: !inputs.angle_driven || (measured - inputs.distance).abs() < DISTANCE_TOLERANCE,
        measured: (!inputs.angle_driven).then_some(measured),
    });

    results.push(ProbeResult {
        kind: ProbeKind::YtAgreement,
        passed: !inputs.angle_driven || inputs.d_yt.abs() < DISTANCE_TOLERANCE,
        measured: (!inputs.angle_driven).then_some(inputs.d_yt),
    });

    results.extend(canonical_ray_probes());
    results
}

/// The four fixed direction checks; independent of any live parameters.
pub fn canonical_ray_probes() -> [ProbeResult; 4] {
    let cases = [
        (ProbeKind::RayAlongX, compute_ray(0.0, 0.0, 90.0), Vec3::UNIT_X),
        (ProbeKind::RayUp, compute_ray(0.0, 0.0, 0.0), Vec3::UNIT_Z),
        (ProbeKind::RayDown, compute_ray(0.0, 0.0, 180.0), -Vec3::UNIT_Z),
        (ProbeKind::RayAlongY, compute_ray(90.0, 0.0, 90.0), Vec3::UNIT_Y),
    ];
    cases.map(|(kind, ray, expected)| ProbeResult {
        kind,
        passed: componentwise_close(ray.dir, expected, RAY_TOLERANCE),
        measured: None,
    })
}

pub fn all_passed(results: &[ProbeResult]) -> bool {
    results.iter().all(|probe| probe.passed)
}

fn componentwise_close(a: Vec3, b: Vec3, tol: f64) -> bool {
    (a.x - b.x).abs() < tol && (a.y - b.y).abs() < tol && (a.z - b.z).abs() < tol
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::compute_target;

    #[test]
    fn canonical_probes_pass() {
        assert!(canonical_ray_probes().iter().all(|p| p.passed));
    }

    #[test]
    fn angle_mode_detects_wrong_distance() {
        let ray = compute_ray(0.0, 0.0, 90.0);
        let base = Vec3::ZERO;
        let inputs = ProbeInputs {
            ray,
            base,
            target: compute_target(base, &ray, 999.0),
            distance: 1000.0,
            d_yt: 0.0,
            angle_driven: true,
        };
        let results = run_probes(&inputs);
        assert_eq!(results.len(), 7);
        assert!(!all_passed(&results));
        assert!(!results[1].passed);
    }

    #[test]
    fn manual_mode_reports_distance() {
        let ray = compute_ray(0.0, 0.0, 90.0);
        let inputs = ProbeInputs {
            ray,
            base: Vec3::ZERO,
            target: Vec3::new(3.0, 4.0, 0.0),
            distance: 1000.0,
            d_yt: 12.0,
            angle_driven: false,
        };
        let results = run_probes(&inputs);
        assert!(all_passed(&results));
        assert_eq!(results[1].measured, Some(5.0));
        assert_eq!(results[2].measured, Some(12.0));
    }
}
