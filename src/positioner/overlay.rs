use crate::crop::CropRect;
use crate::geometry::{FocalPoint, Point, Rect, Size};

/// Paintable description of the crop editor: the bright crop rectangle and
/// the four dimmed bands around it, all in frame-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    pub frame: Size,
    pub crop: Rect,
    /// Top, bottom, left and right bands. Bands may be empty when the
    /// rectangle touches an edge.
    pub shades: [Rect; 4],
    pub focal_point: FocalPoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorHint {
    Default,
    Grab,
    Grabbing,
}

impl Overlay {
    pub fn from_crop(crop: &CropRect) -> Self {
        let frame = crop.frame();
        let bounds = crop.bounds();
        let top = Rect::new(0.0, 0.0, frame.width, bounds.y);
        let bottom = Rect::new(
            0.0,
            bounds.bottom(),
            frame.width,
            (frame.height - bounds.bottom()).max(0.0),
        );
        let left = Rect::new(0.0, bounds.y, bounds.x, bounds.height);
        let right = Rect::new(
            bounds.right(),
            bounds.y,
            (frame.width - bounds.right()).max(0.0),
            bounds.height,
        );

        Self {
            frame,
            crop: bounds,
            shades: [top, bottom, left, right],
            focal_point: crop.focal_point(),
        }
    }

    pub fn visible_shades(&self) -> impl Iterator<Item = &Rect> + '_ {
        self.shades
            .iter()
            .filter(|shade| shade.width > 0.0 && shade.height > 0.0)
    }

    pub fn cursor_at(&self, pointer: Point, dragging: bool) -> CursorHint {
        if dragging {
            CursorHint::Grabbing
        } else if self.crop.contains(pointer) {
            CursorHint::Grab
        } else {
            CursorHint::Default
        }
    }
}
