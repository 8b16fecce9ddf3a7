use std::time::Duration;

use glam::IVec2;
use strum_macros::{Display, EnumIter};

use crate::landmarks::Side;

/// Modifier keys held during a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub alt: bool,
    pub ctrl: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        alt: false,
        ctrl: false,
        meta: false,
    };

    #[inline]
    pub fn any(&self) -> bool {
        self.alt || self.ctrl || self.meta
    }
}

#[derive(Debug, Display, EnumIter, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Delete,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Tab,
}

impl Key {
    /// Unit direction for arrow keys, in image coordinates (y down).
    pub fn direction(self) -> Option<IVec2> {
        match self {
            Key::Up => Some(IVec2::NEG_Y),
            Key::Down => Some(IVec2::Y),
            Key::Left => Some(IVec2::NEG_X),
            Key::Right => Some(IVec2::X),
            Key::Delete | Key::Backspace | Key::Tab => None,
        }
    }
}

/// Canvas input for one image of the pair. `screen` is in canvas pixels;
/// `at` is the event time since any fixed epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Press {
        side: Side,
        screen: IVec2,
        modifiers: Modifiers,
        at: Duration,
    },
    Drag {
        side: Side,
        screen: IVec2,
    },
    Key {
        side: Side,
        key: Key,
    },
}

impl InputEvent {
    pub fn side(&self) -> Side {
        match *self {
            InputEvent::Press { side, .. }
            | InputEvent::Drag { side, .. }
            | InputEvent::Key { side, .. } => side,
        }
    }
}
