use aimcalc_base::{Error, Result};
use aimcalc_geometry::{
    MountGeometry, Orientation, OrientedBox, OrientedRect, Point3, Vec3, arcmin_to_deg,
    compute_base, compute_ray, compute_target, crab_mm_per_m_to_deg,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which source drives the base and target positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    #[serde(rename = "angles")]
    Angles,
    #[default]
    #[serde(rename = "manuel", alias = "manual")]
    Manual,
}

impl ControlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Angles => "angles",
            Self::Manual => "manuel",
        }
    }
}

impl FromStr for ControlMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "angles" => Ok(Self::Angles),
            "manuel" | "manual" => Ok(Self::Manual),
            other => Err(Error::InvalidParameter(format!(
                "ctrl must be \"angles\" or \"manuel\", got \"{other}\""
            ))),
        }
    }
}

/// A position is either derived from the angle solver or pinned by hand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Position {
    FromAngles,
    Manual(Point3),
}

impl Position {
    pub fn resolve(self, from_angles: Point3) -> Point3 {
        match self {
            Self::FromAngles => from_angles,
            Self::Manual(point) => point,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectParams {
    pub width: f64,
    pub height: f64,
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl Default for RectParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 300.0,
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            roll_deg: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxParams {
    pub center: Point3,
    pub size: Vec3,
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            center: Vec3::new(1000.0, 0.0, 400.0),
            size: Vec3::new(900.0, 600.0, 500.0),
            yaw_deg: 15.0,
            pitch_deg: -5.0,
            roll_deg: 10.0,
        }
    }
}

/// The complete editable state of one aiming configuration. Everything
/// shown in the scene is recomputed from this record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub mount: MountGeometry,
    /// Symmetry angle, degrees.
    pub beta_deg: f64,
    /// Drive angle, arc-minutes.
    pub alpha_arcmin: f64,
    /// Crab angle as a slope in mm/m; supplies epsilon.
    pub crab_mm_per_m: f64,
    /// Polar angle from +Z, degrees.
    pub zeta_deg: f64,
    /// Base to target distance, mm.
    pub distance: f64,
    pub control: ControlMode,
    pub manual_base: Point3,
    pub manual_target: Point3,
    pub rect: RectParams,
    #[serde(rename = "box")]
    pub solid: BoxParams,
}

impl Default for SceneParams {
    fn default() -> Self {
        let mut params = Self {
            mount: MountGeometry::default(),
            beta_deg: 0.0,
            alpha_arcmin: 0.0,
            crab_mm_per_m: 0.0,
            zeta_deg: 90.0,
            distance: 1000.0,
            control: ControlMode::Manual,
            manual_base: Vec3::ZERO,
            manual_target: Vec3::ZERO,
            rect: RectParams::default(),
            solid: BoxParams::default(),
        };
        let (base, target) = params.angle_positions();
        params.manual_base = base;
        params.manual_target = target;
        params
    }
}

impl SceneParams {
    pub fn eps_deg(&self) -> f64 {
        crab_mm_per_m_to_deg(self.crab_mm_per_m)
    }

    pub fn alpha_deg(&self) -> f64 {
        arcmin_to_deg(self.alpha_arcmin)
    }

    pub fn base_position(&self) -> Position {
        match self.control {
            ControlMode::Angles => Position::FromAngles,
            ControlMode::Manual => Position::Manual(self.manual_base),
        }
    }

    pub fn target_position(&self) -> Position {
        match self.control {
            ControlMode::Angles => Position::FromAngles,
            ControlMode::Manual => Position::Manual(self.manual_target),
        }
    }

    /// Base and target as the angle solver places them.
    pub fn angle_positions(&self) -> (Point3, Point3) {
        let base = compute_base(&self.mount, self.beta_deg).base;
        let ray = compute_ray(self.eps_deg(), self.alpha_deg(), self.zeta_deg);
        (base, compute_target(base, &ray, self.distance))
    }

    /// Switches to manual control, pinning both points where the angle
    /// solver currently puts them so nothing jumps.
    pub fn pin_to_manual(&mut self) {
        if self.control == ControlMode::Angles {
            let (base, target) = self.angle_positions();
            self.manual_base = base;
            self.manual_target = target;
            self.control = ControlMode::Manual;
        }
    }

    pub fn target_rect(&self, center: Point3) -> OrientedRect {
        OrientedRect {
            center,
            width: self.rect.width,
            height: self.rect.height,
            orientation: Orientation::from_degrees(
                self.rect.yaw_deg,
                self.rect.pitch_deg,
                self.rect.roll_deg,
            ),
        }
    }

    pub fn oriented_box(&self) -> OrientedBox {
        OrientedBox {
            center: self.solid.center,
            size: self.solid.size,
            orientation: Orientation::from_degrees(
                self.solid.yaw_deg,
                self.solid.pitch_deg,
                self.solid.roll_deg,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_seed_manual_points_from_angles() {
        let params = SceneParams::default();
        assert_eq!(params.control, ControlMode::Manual);
        assert!((params.manual_base - Vec3::new(1338.0, -5.0, 0.0)).length() < 1.0e-9);
        assert!((params.manual_target - Vec3::new(2338.0, -5.0, 0.0)).length() < 1.0e-9);
    }

    #[test]
    fn position_resolution() {
        let derived = Vec3::new(1.0, 2.0, 3.0);
        let pinned = Vec3::new(-4.0, 5.0, 6.0);
        assert_eq!(Position::FromAngles.resolve(derived), derived);
        assert_eq!(Position::Manual(pinned).resolve(derived), pinned);
    }

    #[test]
    fn control_mode_parsing() -> Result<()> {
        assert_eq!("angles".parse::<ControlMode>()?, ControlMode::Angles);
        assert_eq!(" Manuel ".parse::<ControlMode>()?, ControlMode::Manual);
        assert!("sideways".parse::<ControlMode>().is_err());
        Ok(())
    }

    #[test]
    fn pinning_keeps_positions() {
        let mut params = SceneParams {
            control: ControlMode::Angles,
            zeta_deg: 45.0,
            manual_base: Vec3::new(9.0, 9.0, 9.0),
            ..SceneParams::default()
        };
        let (base, target) = params.angle_positions();
        params.pin_to_manual();
        assert_eq!(params.control, ControlMode::Manual);
        assert_eq!(params.manual_base, base);
        assert_eq!(params.manual_target, target);
    }
}
