use crate::crop::CropRect;
use crate::geometry::Point;

/// Toolkit-agnostic pointer input, in DisplayFrame-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// `anchor` is the grab point relative to the rect's top-left corner.
    Dragging { anchor: Point },
}

/// What a pointer event did to the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragUpdate {
    Grabbed,
    Moved(Point),
    Released,
    Ignored,
}

/// Turns a pointer drag into clamped crop rectangle moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub const fn state(&self) -> DragState {
        self.state
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Hosts attach viewport-wide move/up listeners only while this holds,
    /// so a drag that leaves the rect keeps tracking.
    pub const fn wants_global_pointer(&self) -> bool {
        self.is_dragging()
    }

    pub fn handle(&mut self, event: PointerEvent, crop: &mut CropRect) -> DragUpdate {
        match (self.state, event) {
            (DragState::Idle, PointerEvent::Down(pointer)) => {
                if !crop.bounds().contains(pointer) {
                    tracing::trace!(x = pointer.x, y = pointer.y, "pointer down outside crop rect");
                    return DragUpdate::Ignored;
                }
                let anchor = pointer - crop.position();
                self.state = DragState::Dragging { anchor };
                tracing::debug!(anchor_x = anchor.x, anchor_y = anchor.y, "crop drag started");
                DragUpdate::Grabbed
            }
            (DragState::Dragging { anchor }, PointerEvent::Move(pointer)) => {
                let landed = crop.move_to(pointer - anchor);
                tracing::debug!(x = landed.x, y = landed.y, "crop rect moved");
                DragUpdate::Moved(landed)
            }
            (DragState::Dragging { .. }, PointerEvent::Up(_)) => {
                self.state = DragState::Idle;
                tracing::debug!("crop drag released");
                DragUpdate::Released
            }
            _ => DragUpdate::Ignored,
        }
    }

    /// Drops an in-flight drag without moving the rect further.
    pub fn reset(&mut self) {
        self.state = DragState::Idle;
    }
}
