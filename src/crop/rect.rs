use super::{centered_position, clamp_position, position_for_center, to_focal_percent};
use crate::geometry::{FocalPoint, Point, Rect, Size};

/// The movable selection rectangle inside a display frame.
///
/// Size is fixed per target ratio; only the position changes, and it is
/// re-clamped into the frame after every mutation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    position: Point,
    size: Size,
    frame: Size,
}

impl CropRect {
    pub fn centered(frame: Size, size: Size) -> Self {
        Self {
            position: clamp_position(centered_position(frame, size), frame, size),
            size,
            frame,
        }
    }

    pub fn centered_on(frame: Size, size: Size, focal: FocalPoint) -> Self {
        Self {
            position: position_for_center(focal.to_frame_point(frame), frame, size),
            size,
            frame,
        }
    }

    pub const fn position(&self) -> Point {
        self.position
    }

    pub const fn size(&self) -> Size {
        self.size
    }

    pub const fn frame(&self) -> Size {
        self.frame
    }

    pub const fn bounds(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    /// Moves the top-left corner toward `proposed`; returns where it landed.
    pub fn move_to(&mut self, proposed: Point) -> Point {
        self.position = clamp_position(proposed, self.frame, self.size);
        self.position
    }

    pub fn move_by(&mut self, delta_x: f64, delta_y: f64) -> Point {
        self.move_to(self.position.offset(delta_x, delta_y))
    }

    pub fn recenter(&mut self) -> Point {
        self.move_to(centered_position(self.frame, self.size))
    }

    /// Swaps in a new size while keeping the current center where possible.
    pub fn resize_keeping_center(&mut self, size: Size) {
        let center = self.bounds().center();
        self.size = size;
        self.position = position_for_center(center, self.frame, size);
    }

    pub fn focal_point(&self) -> FocalPoint {
        to_focal_percent(self.position, self.size, self.frame)
    }
}
