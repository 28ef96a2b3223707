pub mod camera;
pub mod input;
pub mod interaction;
pub mod overlay;
pub mod scene;
pub mod session;
pub mod ui;

pub use camera::{
    Camera, CameraBasis, OrbitCamera, ProjectedPoint, Ray, Viewport, camera_basis,
    intersect_ray_plane_z,
};
pub use input::{Modifiers, PointerEvent};
pub use interaction::{DragState, InteractionMode, MoveEntity, RotateHandle, Rotatable, ViewerState};
pub use overlay::{OverlayCollector, OverlayPainter, OverlayShape};
pub use scene::{ProjectedScene, RotationHandles};
pub use session::Session;
pub use ui::{Align2, Color32, Point2, Rect, Stroke, Vec2, pos2, vec2};
