#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Enter,
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub session_open: bool,
    pub image_ready: bool,
    pub dragging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeDirection {
    Left,
    Right,
    Up,
    Down,
}

impl NudgeDirection {
    /// Unit step along each axis.
    pub const fn unit(self) -> (f64, f64) {
        match self {
            Self::Left => (-1.0, 0.0),
            Self::Right => (1.0, 0.0),
            Self::Up => (0.0, -1.0),
            Self::Down => (0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Confirm,
    Cancel,
    ResetPosition,
    Nudge {
        direction: NudgeDirection,
        large: bool,
    },
}

fn nudge_direction(key: ShortcutKey) -> Option<NudgeDirection> {
    match key {
        ShortcutKey::ArrowLeft => Some(NudgeDirection::Left),
        ShortcutKey::ArrowRight => Some(NudgeDirection::Right),
        ShortcutKey::ArrowUp => Some(NudgeDirection::Up),
        ShortcutKey::ArrowDown => Some(NudgeDirection::Down),
        _ => None,
    }
}

fn resolve_ready_shortcut(key: ShortcutKey, modifiers: ShortcutModifiers) -> Option<ShortcutAction> {
    if let Some(direction) = nudge_direction(key) {
        return (!modifiers.ctrl).then_some(ShortcutAction::Nudge {
            direction,
            large: modifiers.shift,
        });
    }

    match (key, modifiers.ctrl, modifiers.shift) {
        (ShortcutKey::Enter, _, _) => Some(ShortcutAction::Confirm),
        (ShortcutKey::Character('r'), false, false) => Some(ShortcutAction::ResetPosition),
        _ => None,
    }
}

pub fn resolve_shortcut(
    key: ShortcutKey,
    modifiers: ShortcutModifiers,
    context: InputContext,
) -> Option<ShortcutAction> {
    if !context.session_open {
        return None;
    }

    if key == ShortcutKey::Escape {
        return Some(ShortcutAction::Cancel);
    }

    if !context.image_ready || context.dragging {
        return None;
    }

    resolve_ready_shortcut(key, modifiers)
}
