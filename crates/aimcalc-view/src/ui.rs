use serde::Serialize;

/// Screen position in pixels, origin top-left, y down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Rect {
    pub min: Point2,
    pub max: Point2,
}

impl Point2 {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point2) -> f64 {
        (self - other).length()
    }
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Polar angle in radians, measured with y pointing down.
    pub fn angle(&self) -> f64 {
        self.y.atan2(self.x)
    }
}

impl Rect {
    pub fn from_points(a: Point2, b: Point2) -> Self {
        let min = Point2::new(a.x.min(b.x), a.y.min(b.y));
        let max = Point2::new(a.x.max(b.x), a.y.max(b.y));
        Self { min, max }
    }

    /// Smallest rectangle holding every point; `None` for an empty set.
    pub fn bounding(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::from_points(first, first), |rect, p| Self {
            min: Point2::new(rect.min.x.min(p.x), rect.min.y.min(p.y)),
            max: Point2::new(rect.max.x.max(p.x), rect.max.y.max(p.y)),
        }))
    }

    pub fn contains(&self, pos: Point2) -> bool {
        pos.x >= self.min.x && pos.x <= self.max.x && pos.y >= self.min.y && pos.y <= self.max.y
    }
}

impl std::ops::Add<Vec2> for Point2 {
    type Output = Point2;

    fn add(self, rhs: Vec2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub<Point2> for Point2 {
    type Output = Vec2;

    fn sub(self, rhs: Point2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color32 {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Stroke {
    pub width: f64,
    pub color: Color32,
    /// Dash and gap lengths in pixels; solid when `None`.
    pub dash: Option<[f64; 2]>,
}

impl Stroke {
    pub fn new(width: f64, color: Color32) -> Self {
        Self {
            width,
            color,
            dash: None,
        }
    }

    pub fn dashed(width: f64, color: Color32, dash: f64, gap: f64) -> Self {
        Self {
            width,
            color,
            dash: Some([dash, gap]),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Align2 {
    CenterTop,
    CenterBottom,
}

pub const fn pos2(x: f64, y: f64) -> Point2 {
    Point2::new(x, y)
}

pub const fn vec2(x: f64, y: f64) -> Vec2 {
    Vec2::new(x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_rect_covers_points() {
        let rect = Rect::bounding([pos2(3.0, 9.0), pos2(-1.0, 4.0), pos2(2.0, 12.0)]);
        assert_eq!(rect, Some(Rect::from_points(pos2(-1.0, 4.0), pos2(3.0, 12.0))));
        assert_eq!(Rect::bounding(Vec::new()), None);
    }

    #[test]
    fn contains_is_inclusive() {
        let rect = Rect::from_points(pos2(0.0, 0.0), pos2(10.0, 5.0));
        assert!(rect.contains(pos2(10.0, 5.0)));
        assert!(!rect.contains(pos2(10.5, 5.0)));
    }
}
