use serde::Serialize;

use crate::ui::{Align2, Color32, Point2, Stroke};

/// One screen-space primitive, already in paint order.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayShape {
    Line {
        start: Point2,
        end: Point2,
        stroke: Stroke,
    },
    Circle {
        center: Point2,
        radius: f64,
        fill: Option<Color32>,
        stroke: Option<Stroke>,
    },
    Polygon {
        points: Vec<Point2>,
        fill: Option<Color32>,
        stroke: Option<Stroke>,
    },
    Text {
        pos: Point2,
        align: Align2,
        text: String,
        size: f64,
        color: Color32,
    },
}

/// Backend-neutral drawing surface.
pub trait OverlayPainter {
    fn line_segment(&mut self, start: Point2, end: Point2, stroke: Stroke);
    fn circle(&mut self, center: Point2, radius: f64, fill: Option<Color32>, stroke: Option<Stroke>);
    fn polygon(&mut self, points: Vec<Point2>, fill: Color32, stroke: Stroke);
    fn text(&mut self, pos: Point2, align: Align2, text: String, size: f64, color: Color32);

    fn circle_filled(&mut self, center: Point2, radius: f64, fill: Color32) {
        self.circle(center, radius, Some(fill), None);
    }

    fn circle_stroke(&mut self, center: Point2, radius: f64, stroke: Stroke) {
        self.circle(center, radius, None, Some(stroke));
    }
}

/// Records shapes instead of drawing them.
#[derive(Default)]
pub struct OverlayCollector {
    pub shapes: Vec<OverlayShape>,
}

impl OverlayPainter for OverlayCollector {
    fn line_segment(&mut self, start: Point2, end: Point2, stroke: Stroke) {
        self.shapes.push(OverlayShape::Line { start, end, stroke });
    }

    fn circle(&mut self, center: Point2, radius: f64, fill: Option<Color32>, stroke: Option<Stroke>) {
        self.shapes.push(OverlayShape::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn polygon(&mut self, points: Vec<Point2>, fill: Color32, stroke: Stroke) {
        self.shapes.push(OverlayShape::Polygon {
            points,
            fill: Some(fill),
            stroke: Some(stroke),
        });
    }

    fn text(&mut self, pos: Point2, align: Align2, text: String, size: f64, color: Color32) {
        self.shapes.push(OverlayShape::Text {
            pos,
            align,
            text,
            size,
            color,
        });
    }
}
