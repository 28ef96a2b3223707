use aimcalc_geometry::Point3;
use serde::{Deserialize, Serialize};

use crate::params::SceneParams;

/// Pitch is held away from +-90 degrees where yaw and roll collapse.
pub const PITCH_LIMIT_DEG: f64 = 89.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationDelta {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub roll_deg: f64,
}

impl RotationDelta {
    pub const fn yaw(deg: f64) -> Self {
        Self {
            yaw_deg: deg,
            pitch_deg: 0.0,
            roll_deg: 0.0,
        }
    }

    pub const fn pitch(deg: f64) -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: deg,
            roll_deg: 0.0,
        }
    }

    pub const fn roll(deg: f64) -> Self {
        Self {
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            roll_deg: deg,
        }
    }
}

/// A change requested by the viewer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SceneEdit {
    MoveBase(Point3),
    MoveTarget(Point3),
    MoveBox(Point3),
    RotateTarget(RotationDelta),
    RotateBox(RotationDelta),
}

impl SceneParams {
    /// Returns the parameters with `edit` applied. Moving the base or the
    /// target pins both points to manual control first.
    pub fn apply(&self, edit: SceneEdit) -> SceneParams {
        let mut next = self.clone();
        match edit {
            SceneEdit::MoveBase(point) => {
                next.pin_to_manual();
                next.manual_base = point;
            }
            SceneEdit::MoveTarget(point) => {
                next.pin_to_manual();
                next.manual_target = point;
            }
            SceneEdit::MoveBox(point) => next.solid.center = point,
            SceneEdit::RotateTarget(delta) => {
                let (yaw, pitch, roll) = rotate(
                    (next.rect.yaw_deg, next.rect.pitch_deg, next.rect.roll_deg),
                    delta,
                );
                next.rect.yaw_deg = yaw;
                next.rect.pitch_deg = pitch;
                next.rect.roll_deg = roll;
            }
            SceneEdit::RotateBox(delta) => {
                let (yaw, pitch, roll) = rotate(
                    (next.solid.yaw_deg, next.solid.pitch_deg, next.solid.roll_deg),
                    delta,
                );
                next.solid.yaw_deg = yaw;
                next.solid.pitch_deg = pitch;
                next.solid.roll_deg = roll;
            }
        }
        next
    }
}

// yaw and roll accumulate without wrapping
fn rotate((yaw, pitch, roll): (f64, f64, f64), delta: RotationDelta) -> (f64, f64, f64) {
    (
        yaw + delta.yaw_deg,
        (pitch + delta.pitch_deg).clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG),
        roll + delta.roll_deg,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ControlMode;
    use aimcalc_geometry::Vec3;

    #[test]
    fn moving_target_in_angle_mode_pins_base() {
        let params = SceneParams {
            control: ControlMode::Angles,
            beta_deg: 30.0,
            ..SceneParams::default()
        };
        let (base, _) = params.angle_positions();
        let moved = params.apply(SceneEdit::MoveTarget(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(moved.control, ControlMode::Manual);
        assert_eq!(moved.manual_target, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(moved.manual_base, base);
        // input record unchanged
        assert_eq!(params.control, ControlMode::Angles);
    }

    #[test]
    fn pitch_is_clamped_and_yaw_accumulates() {
        let mut params = SceneParams::default();
        for _ in 0..10 {
            params = params.apply(SceneEdit::RotateBox(RotationDelta::pitch(25.0)));
            params = params.apply(SceneEdit::RotateBox(RotationDelta::yaw(90.0)));
        }
        assert_eq!(params.solid.pitch_deg, PITCH_LIMIT_DEG);
        assert_eq!(params.solid.yaw_deg, 15.0 + 900.0);

        for _ in 0..20 {
            params = params.apply(SceneEdit::RotateTarget(RotationDelta::pitch(-30.0)));
        }
        assert_eq!(params.rect.pitch_deg, -PITCH_LIMIT_DEG);
    }

    #[test]
    fn moving_box_leaves_control_alone() {
        let params = SceneParams {
            control: ControlMode::Angles,
            ..SceneParams::default()
        };
        let moved = params.apply(SceneEdit::MoveBox(Vec3::new(5.0, 6.0, 7.0)));
        assert_eq!(moved.control, ControlMode::Angles);
        assert_eq!(moved.solid.center, Vec3::new(5.0, 6.0, 7.0));
    }
}
