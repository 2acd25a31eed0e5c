mod drag;
mod shortcut;

pub use drag::{DragController, DragState, DragUpdate, PointerEvent};
pub use shortcut::{
    resolve_shortcut, InputContext, NudgeDirection, ShortcutAction, ShortcutKey,
    ShortcutModifiers,
};
