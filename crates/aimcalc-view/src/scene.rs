use aimcalc_geometry::{BOX_FACES, Point3, Vec3, faces_back_to_front};
use aimcalc_model::Solution;

use crate::camera::{Camera, ProjectedPoint, Viewport};
use crate::interaction::InteractionMode;
use crate::overlay::OverlayPainter;
use crate::ui::{Align2, Color32, Point2, Rect, Stroke, vec2};

pub const GRID_EXTENT: f64 = 6000.0;
pub const GRID_STEP: f64 = 500.0;
pub const AXIS_LENGTH: f64 = 2000.0;

pub const BASE_MARKER: f64 = 60.0;
pub const TARGET_MARKER: f64 = 55.0;
pub const BOX_MARKER: f64 = 48.0;
const MIN_MARKER_PX: f64 = 2.0;

pub const RING_MIN_PX: f64 = 40.0;
pub const RING_WORLD: f64 = 150.0;
pub const HANDLE_OFFSET: f64 = 2.2;
const HANDLE_RADIUS_PX: f64 = 10.0;

const GRID: Color32 = Color32::from_rgb(0xe5, 0xe7, 0xeb);
const AXIS_X: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const AXIS_Y: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
const AXIS_Z: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
const BLUE: Color32 = Color32::from_rgb(0x25, 0x63, 0xeb);
const BLUE_LITE: Color32 = Color32::from_rgb(0x93, 0xc5, 0xfd);
const GREEN: Color32 = Color32::from_rgb(0x10, 0xb9, 0x81);
const RED: Color32 = Color32::from_rgb(0xef, 0x44, 0x44);
const TARGET_FILL: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);
const TARGET_EDGE: Color32 = Color32::from_rgb(0xea, 0xb3, 0x08);
const RECT_FILL: Color32 = Color32::from_rgb(0xfd, 0xe0, 0x47);
const AIM_LINE: Color32 = Color32::from_rgb(0x02, 0x84, 0xc7);

/// Face fills, indexed by face number.
pub const FACE_FILLS: [Color32; 6] = [
    Color32::from_rgb(0xc7, 0xd2, 0xfe),
    Color32::from_rgb(0xbf, 0xdb, 0xfe),
    Color32::from_rgb(0x93, 0xc5, 0xfd),
    Color32::from_rgb(0xa5, 0xb4, 0xfc),
    Color32::from_rgb(0x60, 0xa5, 0xfa),
    Color32::from_rgb(0x93, 0xc5, 0xfd),
];
const FACE_ALPHA: u8 = 166;

/// On-screen marker radius for a world size, never below two pixels.
pub fn marker_radius(world_size: f64, projected: &ProjectedPoint) -> f64 {
    (world_size * projected.scale).max(MIN_MARKER_PX)
}

/// Yaw ring plus pitch and roll knobs around a projected centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationHandles {
    pub center: Point2,
    pub ring_radius: f64,
    pub pitch: Point2,
    pub roll: Point2,
}

impl RotationHandles {
    pub fn around(center: &ProjectedPoint) -> Self {
        let ring_radius = (RING_WORLD * center.scale).max(RING_MIN_PX);
        Self {
            center: center.pos,
            ring_radius,
            pitch: center.pos + vec2(HANDLE_OFFSET * ring_radius, 0.0),
            roll: center.pos + vec2(-HANDLE_OFFSET * ring_radius, 0.0),
        }
    }
}

/// Every entity of a [`Solution`] pushed through one camera.
#[derive(Clone, Debug)]
pub struct ProjectedScene {
    pub camera: Camera,
    pub viewport: Viewport,
    pub base: Option<ProjectedPoint>,
    pub target: Option<ProjectedPoint>,
    pub box_center: Option<ProjectedPoint>,
    pub rect_corners: [Option<ProjectedPoint>; 4],
    pub box_vertices: [Option<ProjectedPoint>; 8],
}

impl ProjectedScene {
    pub fn new(solution: &Solution, camera: Camera, viewport: Viewport) -> Self {
        let project = |point: Point3| camera.project(point, viewport);
        Self {
            camera,
            viewport,
            base: project(solution.base),
            target: project(solution.target),
            box_center: project(solution.solid.center),
            rect_corners: solution.rect_corners().map(project),
            box_vertices: solution.box_vertices().map(project),
        }
    }

    /// Screen bounds of the rectangle, only when all four corners show.
    pub fn rect_bounds(&self) -> Option<Rect> {
        let corners: Option<Vec<Point2>> = self
            .rect_corners
            .iter()
            .map(|corner| corner.map(|p| p.pos))
            .collect();
        Rect::bounding(corners?)
    }

    /// Screen bounds of whichever box vertices are visible.
    pub fn box_bounds(&self) -> Option<Rect> {
        Rect::bounding(self.box_vertices.iter().flatten().map(|p| p.pos))
    }

    fn segment(&self, a: Point3, b: Point3) -> Option<(Point2, Point2)> {
        let pa = self.camera.project(a, self.viewport)?;
        let pb = self.camera.project(b, self.viewport)?;
        Some((pa.pos, pb.pos))
    }

    /// Paints the scene back to front.
    pub fn paint<P: OverlayPainter>(&self, painter: &mut P, mode: InteractionMode) {
        self.paint_grid(painter);
        self.paint_axes(painter);

        if let Some(base) = &self.base {
            painter.circle_filled(base.pos, marker_radius(BASE_MARKER, base), GREEN);
        }

        self.paint_box_faces(painter);
        if let Some(center) = &self.box_center {
            painter.circle(
                center.pos,
                marker_radius(BOX_MARKER, center),
                Some(BLUE_LITE),
                Some(Stroke::new(1.0, BLUE)),
            );
            if mode.allows_rotate_box() {
                paint_handles(painter, RotationHandles::around(center));
            }
        }

        if let Some(corners) = self.rect_corners.iter().copied().collect::<Option<Vec<_>>>() {
            let points = corners.into_iter().map(|p| p.pos).collect();
            painter.polygon(points, RECT_FILL, Stroke::new(2.0, TARGET_EDGE));
        }

        if let (Some(base), Some(target)) = (&self.base, &self.target) {
            painter.circle(
                target.pos,
                marker_radius(TARGET_MARKER, target),
                Some(TARGET_FILL),
                Some(Stroke::new(1.0, TARGET_EDGE)),
            );
            painter.line_segment(base.pos, target.pos, Stroke::new(2.0, AIM_LINE));
        }

        if mode.allows_rotate_target() {
            if let Some(target) = &self.target {
                paint_handles(painter, RotationHandles::around(target));
            }
        }
    }

    fn paint_grid<P: OverlayPainter>(&self, painter: &mut P) {
        let stroke = Stroke::new(1.0, GRID);
        let steps = (2.0 * GRID_EXTENT / GRID_STEP).round() as i64;
        for i in 0..=steps {
            let v = -GRID_EXTENT + i as f64 * GRID_STEP;
            let lines = [
                (Vec3::new(v, -GRID_EXTENT, 0.0), Vec3::new(v, GRID_EXTENT, 0.0)),
                (Vec3::new(-GRID_EXTENT, v, 0.0), Vec3::new(GRID_EXTENT, v, 0.0)),
            ];
            for (a, b) in lines {
                if let Some((start, end)) = self.segment(a, b) {
                    painter.line_segment(start, end, stroke);
                }
            }
        }
    }

    fn paint_axes<P: OverlayPainter>(&self, painter: &mut P) {
        for (axis, color) in [
            (Vec3::UNIT_X, AXIS_X),
            (Vec3::UNIT_Y, AXIS_Y),
            (Vec3::UNIT_Z, AXIS_Z),
        ] {
            if let Some((start, end)) = self.segment(Vec3::ZERO, axis * AXIS_LENGTH) {
                painter.line_segment(start, end, Stroke::new(2.0, color));
            }
        }
    }

    fn paint_box_faces<P: OverlayPainter>(&self, painter: &mut P) {
        let depths = self.box_vertices.map(|v| v.map(|p| p.depth));
        for face in faces_back_to_front(&depths) {
            let points: Vec<Point2> = BOX_FACES[face.face]
                .iter()
                .filter_map(|&i| self.box_vertices[i].map(|p| p.pos))
                .collect();
            let fill = FACE_FILLS[face.face % FACE_FILLS.len()].with_alpha(FACE_ALPHA);
            painter.polygon(points, fill, Stroke::new(1.5, BLUE));
        }
    }
}

fn paint_handles<P: OverlayPainter>(painter: &mut P, handles: RotationHandles) {
    painter.circle_stroke(
        handles.center,
        handles.ring_radius,
        Stroke::dashed(4.0, BLUE_LITE, 6.0, 6.0),
    );
    for (pos, color, label) in [(handles.pitch, RED, "Pitch"), (handles.roll, GREEN, "Roll")] {
        painter.circle_filled(pos, HANDLE_RADIUS_PX, color);
        painter.text(
            pos + vec2(0.0, HANDLE_RADIUS_PX + 4.0),
            Align2::CenterTop,
            label.to_string(),
            10.0,
            color,
        );
    }
    painter.text(
        handles.center + vec2(0.0, -handles.ring_radius - 10.0),
        Align2::CenterBottom,
        "Yaw".to_string(),
        10.0,
        BLUE_LITE,
    );
}
