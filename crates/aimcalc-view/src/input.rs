use crate::ui::{Point2, Vec2};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Modifiers {
    /// Held to drag a point along Z instead of across its plane.
    pub alt: bool,
}

/// Pointer input in viewport pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    Down {
        pos: Point2,
    },
    Move {
        pos: Point2,
        /// Movement since the previous event.
        delta: Vec2,
        modifiers: Modifiers,
    },
    Up,
    /// Pointer left the surface or the gesture was cancelled.
    Leave,
    Wheel {
        delta_y: f64,
    },
}
