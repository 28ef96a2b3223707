//! Conversions between the small-angle encodings used at the parameter
//! boundary. The solver itself only works in degrees.

pub const ARCMIN_PER_DEGREE: f64 = 60.0;

pub fn arcmin_to_deg(arcmin: f64) -> f64 {
    arcmin / ARCMIN_PER_DEGREE
}

pub fn deg_to_arcmin(deg: f64) -> f64 {
    deg * ARCMIN_PER_DEGREE
}

/// Crab slope in millimeters per meter to degrees: `atan(mm / 1000)`.
pub fn crab_mm_per_m_to_deg(mm_per_m: f64) -> f64 {
    (mm_per_m / 1000.0).atan().to_degrees()
}

pub fn crab_deg_to_mm_per_m(deg: f64) -> f64 {
    deg.to_radians().tan() * 1000.0
}
