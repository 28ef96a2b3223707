use aimcalc_geometry::{Point3, Vec3};
use aimcalc_model::{Error, RotationDelta, SceneEdit, Solution};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use std::str::FromStr;
use tracing::debug;

use crate::camera::{OrbitCamera, Viewport, intersect_ray_plane_z};
use crate::input::{Modifiers, PointerEvent};
use crate::overlay::OverlayPainter;
use crate::scene::{ProjectedScene, RotationHandles};
use crate::ui::{Point2, Vec2};

/// Pixel tolerance around the yaw ring and the pitch/roll knobs.
pub const HANDLE_GRAB_PX: f64 = 12.0;
/// Grab radius around a centre when its outline is not fully on screen.
pub const CENTER_GRAB_PX: f64 = 40.0;
pub const BASE_GRAB_PX: f64 = 20.0;
/// Degrees of pitch or roll per pixel.
pub const ROTATE_SPEED: f64 = 0.25;
/// Depth drag moves `radius / DEPTH_DIVISOR` millimetres per pixel.
pub const DEPTH_DIVISOR: f64 = 400.0;

/// Which gestures the viewer accepts. `Free` accepts all of them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionMode {
    #[default]
    Free,
    Orbit,
    MoveBase,
    MoveTarget,
    RotateTarget,
    MoveBox,
    RotateBox,
}

impl InteractionMode {
    pub const ALL: [InteractionMode; 7] = [
        Self::Free,
        Self::Orbit,
        Self::MoveBase,
        Self::MoveTarget,
        Self::RotateTarget,
        Self::MoveBox,
        Self::RotateBox,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Orbit => "orbit",
            Self::MoveBase => "moveBase",
            Self::MoveTarget => "moveTarget",
            Self::RotateTarget => "rotateTarget",
            Self::MoveBox => "moveBox",
            Self::RotateBox => "rotateBox",
        }
    }

    fn allows(self, mode: InteractionMode) -> bool {
        self == Self::Free || self == mode
    }

    pub fn allows_orbit(self) -> bool {
        self.allows(Self::Orbit)
    }

    pub fn allows_move_base(self) -> bool {
        self.allows(Self::MoveBase)
    }

    pub fn allows_move_target(self) -> bool {
        self.allows(Self::MoveTarget)
    }

    pub fn allows_rotate_target(self) -> bool {
        self.allows(Self::RotateTarget)
    }

    pub fn allows_move_box(self) -> bool {
        self.allows(Self::MoveBox)
    }

    pub fn allows_rotate_box(self) -> bool {
        self.allows(Self::RotateBox)
    }
}

impl FromStr for InteractionMode {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        let text = text.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(text))
            .ok_or_else(|| Error::InvalidParameter(format!("unknown interaction mode \"{text}\"")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveEntity {
    Base,
    Target,
    Box,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotatable {
    Target,
    Box,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RotateHandle {
    /// Screen angle of the pointer around the centre at the last event.
    Yaw { last_angle: f64 },
    Pitch,
    Roll,
}

/// The gesture in progress between pointer down and pointer up.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Orbit,
    Move {
        entity: MoveEntity,
        last_y: f64,
    },
    Rotate {
        entity: Rotatable,
        handle: RotateHandle,
        last_y: f64,
    },
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Camera and gesture state of the 3D view.
#[derive(Clone, Debug, Default)]
pub struct ViewerState {
    pub orbit: OrbitCamera,
    pub mode: InteractionMode,
    drag: DragState,
}

impl ViewerState {
    pub fn drag(&self) -> DragState {
        self.drag
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if self.mode != mode {
            self.mode = mode;
            self.cancel_interaction();
        }
    }

    pub fn cancel_interaction(&mut self) {
        if !self.drag.is_idle() {
            debug!(from = ?self.drag, "drag ended");
        }
        self.drag = DragState::Idle;
    }

    pub fn project(&self, solution: &Solution, viewport: Viewport) -> ProjectedScene {
        ProjectedScene::new(solution, self.orbit.camera(viewport), viewport)
    }

    pub fn paint<P: OverlayPainter>(&self, painter: &mut P, solution: &Solution, viewport: Viewport) {
        self.project(solution, viewport).paint(painter, self.mode);
    }

    /// Feeds one pointer event through the gesture machine. Camera changes
    /// are applied here; scene changes are returned for the caller to apply.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        solution: &Solution,
        viewport: Viewport,
    ) -> Option<SceneEdit> {
        match event {
            PointerEvent::Down { pos } => {
                let scene = self.project(solution, viewport);
                self.drag = self.pick(pos, &scene);
                if !self.drag.is_idle() {
                    debug!(state = ?self.drag, "drag started");
                }
                None
            }
            PointerEvent::Move {
                pos,
                delta,
                modifiers,
            } => self.drag_to(pos, delta, modifiers, solution, viewport),
            PointerEvent::Up | PointerEvent::Leave => {
                self.cancel_interaction();
                None
            }
            PointerEvent::Wheel { delta_y } => {
                if self.mode.allows_orbit() {
                    self.orbit.zoom(delta_y);
                }
                None
            }
        }
    }

    /// Hit-tests in priority order: rotation handles, move regions, base,
    /// then orbit.
    fn pick(&self, pos: Point2, scene: &ProjectedScene) -> DragState {
        let mode = self.mode;
        let last_y = pos.y;

        let rotatables = [
            (mode.allows_rotate_target(), Rotatable::Target, scene.target),
            (mode.allows_rotate_box(), Rotatable::Box, scene.box_center),
        ];
        for (allowed, entity, center) in rotatables {
            let Some(center) = center.filter(|_| allowed) else {
                continue;
            };
            if let Some(handle) = hit_handles(pos, RotationHandles::around(&center)) {
                return DragState::Rotate {
                    entity,
                    handle,
                    last_y,
                };
            }
        }

        if mode.allows_move_target() {
            let hit = match scene.rect_bounds() {
                Some(bounds) => bounds.contains(pos),
                None => within(pos, scene.target.map(|p| p.pos), CENTER_GRAB_PX),
            };
            if hit {
                return DragState::Move {
                    entity: MoveEntity::Target,
                    last_y,
                };
            }
        }

        if mode.allows_move_box() {
            if let Some(bounds) = scene.box_bounds() {
                if bounds.contains(pos)
                    || within(pos, scene.box_center.map(|p| p.pos), CENTER_GRAB_PX)
                {
                    return DragState::Move {
                        entity: MoveEntity::Box,
                        last_y,
                    };
                }
            }
        }

        if mode.allows_move_base() && within(pos, scene.base.map(|p| p.pos), BASE_GRAB_PX) {
            return DragState::Move {
                entity: MoveEntity::Base,
                last_y,
            };
        }

        if mode.allows_orbit() {
            DragState::Orbit
        } else {
            DragState::Idle
        }
    }

    fn drag_to(
        &mut self,
        pos: Point2,
        delta: Vec2,
        modifiers: Modifiers,
        solution: &Solution,
        viewport: Viewport,
    ) -> Option<SceneEdit> {
        match self.drag {
            DragState::Idle => None,
            DragState::Orbit => {
                self.orbit.orbit(delta.x, delta.y);
                None
            }
            DragState::Rotate {
                entity,
                handle,
                last_y,
            } => {
                let scene = self.project(solution, viewport);
                let center = match entity {
                    Rotatable::Target => scene.target,
                    Rotatable::Box => scene.box_center,
                };
                let (handle, rotation) = match handle {
                    RotateHandle::Yaw { last_angle } => match center {
                        Some(center) => {
                            let angle = (pos - center.pos).angle();
                            let step = unwrap_angle(angle - last_angle);
                            (
                                RotateHandle::Yaw { last_angle: angle },
                                Some(RotationDelta::yaw(step.to_degrees())),
                            )
                        }
                        None => (handle, None),
                    },
                    RotateHandle::Pitch => (
                        handle,
                        Some(RotationDelta::pitch(-(pos.y - last_y) * ROTATE_SPEED)),
                    ),
                    RotateHandle::Roll => (handle, Some(RotationDelta::roll(delta.x * ROTATE_SPEED))),
                };
                self.drag = DragState::Rotate {
                    entity,
                    handle,
                    last_y: pos.y,
                };
                rotation.map(|delta| match entity {
                    Rotatable::Target => SceneEdit::RotateTarget(delta),
                    Rotatable::Box => SceneEdit::RotateBox(delta),
                })
            }
            DragState::Move { entity, last_y } => {
                self.drag = DragState::Move {
                    entity,
                    last_y: pos.y,
                };
                let current = match entity {
                    MoveEntity::Base => solution.base,
                    MoveEntity::Target => solution.target,
                    MoveEntity::Box => solution.solid.center,
                };
                let point = if modifiers.alt {
                    let dz = -(pos.y - last_y) * (self.orbit.radius / DEPTH_DIVISOR);
                    Vec3::new(current.x, current.y, current.z + dz)
                } else {
                    let ray = self.orbit.camera(viewport).screen_ray(pos, viewport);
                    let hit = intersect_ray_plane_z(&ray, current.z)?;
                    Point3::new(hit.x, hit.y, current.z)
                };
                Some(match entity {
                    MoveEntity::Base => SceneEdit::MoveBase(point),
                    MoveEntity::Target => SceneEdit::MoveTarget(point),
                    MoveEntity::Box => SceneEdit::MoveBox(point),
                })
            }
        }
    }
}

fn within(pos: Point2, center: Option<Point2>, radius: f64) -> bool {
    center.is_some_and(|center| pos.distance(center) < radius)
}

fn hit_handles(pos: Point2, handles: RotationHandles) -> Option<RotateHandle> {
    let offset = pos - handles.center;
    if (offset.length() - handles.ring_radius).abs() < HANDLE_GRAB_PX {
        return Some(RotateHandle::Yaw {
            last_angle: offset.angle(),
        });
    }
    if pos.distance(handles.pitch) < HANDLE_GRAB_PX {
        return Some(RotateHandle::Pitch);
    }
    if pos.distance(handles.roll) < HANDLE_GRAB_PX {
        return Some(RotateHandle::Roll);
    }
    None
}

/// Folds an angle step into (-pi, pi] so crossing the atan2 seam does not
/// add a full turn.
fn unwrap_angle(step: f64) -> f64 {
    let wrapped = (step + PI).rem_euclid(TAU) - PI;
    if wrapped == -PI { PI } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwrap_keeps_small_steps() {
        assert!((unwrap_angle(0.1) - 0.1).abs() < 1.0e-12);
        assert!((unwrap_angle(-0.1) + 0.1).abs() < 1.0e-12);
        // crossing from +179 to -179 degrees is a +2 degree step
        let step = unwrap_angle((-179.0_f64).to_radians() - 179.0_f64.to_radians());
        assert!((step.to_degrees() - 2.0).abs() < 1.0e-9);
        assert_eq!(unwrap_angle(PI), PI);
    }

    #[test]
    fn mode_names_round_trip() -> aimcalc_model::Result<()> {
        for mode in InteractionMode::ALL {
            assert_eq!(mode.as_str().parse::<InteractionMode>()?, mode);
        }
        assert!("spin".parse::<InteractionMode>().is_err());
        Ok(())
    }

    #[test]
    fn only_free_and_exact_mode_permit() {
        assert!(InteractionMode::Free.allows_move_box());
        assert!(InteractionMode::MoveBox.allows_move_box());
        assert!(!InteractionMode::MoveBox.allows_orbit());
        assert!(!InteractionMode::Orbit.allows_rotate_target());
    }
}
