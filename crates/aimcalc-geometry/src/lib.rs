pub mod angles;
pub mod math;
pub mod probes;
pub mod solid;
pub mod solver;

pub use angles::{arcmin_to_deg, crab_deg_to_mm_per_m, crab_mm_per_m_to_deg, deg_to_arcmin};
pub use math::{Mat3, Point3, Vec3};
pub use probes::{ProbeInputs, ProbeKind, ProbeResult, all_passed, canonical_ray_probes, run_probes};
pub use solid::{BOX_FACES, FaceDepth, Orientation, OrientedBox, OrientedRect, faces_back_to_front};
pub use solver::{
    BaseSolution, MountGeometry, OutputAngles, PlanePoint, RayDirection, compute_base,
    compute_output_angles, compute_ray, compute_target, yt_formula,
};
