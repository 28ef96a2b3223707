use aimcalc_geometry::{
    BaseSolution, OrientedBox, OrientedRect, OutputAngles, Point3, ProbeInputs, ProbeResult,
    RayDirection, compute_base, compute_output_angles, compute_ray, compute_target, run_probes,
    yt_formula,
};

use crate::params::{ControlMode, SceneParams};

/// Everything derived from a [`SceneParams`] in one pass. Never stored; call
/// [`solve`] again after any parameter change.
#[derive(Clone, Debug)]
pub struct Solution {
    pub base_from_angles: BaseSolution,
    pub ray: RayDirection,
    pub target_from_angles: Point3,
    pub base: Point3,
    pub target: Point3,
    pub output: OutputAngles,
    pub yt_formula: f64,
    pub yt_sim: f64,
    pub d_yt: f64,
    pub rect: OrientedRect,
    pub solid: OrientedBox,
    pub probes: Vec<ProbeResult>,
}

impl Solution {
    pub fn rect_corners(&self) -> [Point3; 4] {
        self.rect.corners()
    }

    pub fn box_vertices(&self) -> [Point3; 8] {
        self.solid.vertices()
    }
}

pub fn solve(params: &SceneParams) -> Solution {
    let eps_deg = params.eps_deg();
    let alpha_deg = params.alpha_deg();

    let base_from_angles = compute_base(&params.mount, params.beta_deg);
    let ray = compute_ray(eps_deg, alpha_deg, params.zeta_deg);
    let target_from_angles = compute_target(base_from_angles.base, &ray, params.distance);

    let base = params.base_position().resolve(base_from_angles.base);
    let target = params.target_position().resolve(target_from_angles);

    let yt_formula = yt_formula(
        &params.mount,
        params.beta_deg,
        eps_deg,
        alpha_deg,
        params.zeta_deg,
        params.distance,
    );
    let yt_sim = target.y;
    let d_yt = yt_sim - yt_formula;

    let probes = run_probes(&ProbeInputs {
        ray,
        base,
        target,
        distance: params.distance,
        d_yt,
        angle_driven: params.control == ControlMode::Angles,
    });

    Solution {
        base_from_angles,
        ray,
        target_from_angles,
        base,
        target,
        output: compute_output_angles(base, target, alpha_deg),
        yt_formula,
        yt_sim,
        d_yt,
        rect: params.target_rect(target),
        solid: params.oriented_box(),
        probes,
    }
}
