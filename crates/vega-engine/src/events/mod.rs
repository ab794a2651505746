mod dispatcher;

pub use dispatcher::EventDispatcher;

use crate::window::{KeyCode, MouseButton};

/// Engine event.
///
/// One variant per event kind the window layer can raise. Events are plain
/// values; anything that needs to outlive the dispatch phase must be copied
/// out by the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WindowClose,
    WindowResize { width: u32, height: u32 },
    WindowMove { x: i32, y: i32 },
    WindowContentScale { scale: f64 },
    WindowMinimize,
    WindowMaximize,
    WindowRestore,
    WindowGainFocus,
    WindowLoseFocus,

    KeyPress { key: KeyCode, repeat: bool },
    KeyRelease { key: KeyCode },
    CharInput { character: char },

    MouseMove { x: f64, y: f64 },
    MouseEnter,
    MouseLeave,
    MouseButtonPress { button: MouseButton },
    MouseButtonRelease { button: MouseButton },
    MouseScroll { dx: f64, dy: f64 },
}

/// Discriminant used to subscribe to one kind of [`Event`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EventKind {
    WindowClose,
    WindowResize,
    WindowMove,
    WindowContentScale,
    WindowMinimize,
    WindowMaximize,
    WindowRestore,
    WindowGainFocus,
    WindowLoseFocus,
    KeyPress,
    KeyRelease,
    CharInput,
    MouseMove,
    MouseEnter,
    MouseLeave,
    MouseButtonPress,
    MouseButtonRelease,
    MouseScroll,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::WindowClose => EventKind::WindowClose,
            Event::WindowResize { .. } => EventKind::WindowResize,
            Event::WindowMove { .. } => EventKind::WindowMove,
            Event::WindowContentScale { .. } => EventKind::WindowContentScale,
            Event::WindowMinimize => EventKind::WindowMinimize,
            Event::WindowMaximize => EventKind::WindowMaximize,
            Event::WindowRestore => EventKind::WindowRestore,
            Event::WindowGainFocus => EventKind::WindowGainFocus,
            Event::WindowLoseFocus => EventKind::WindowLoseFocus,
            Event::KeyPress { .. } => EventKind::KeyPress,
            Event::KeyRelease { .. } => EventKind::KeyRelease,
            Event::CharInput { .. } => EventKind::CharInput,
            Event::MouseMove { .. } => EventKind::MouseMove,
            Event::MouseEnter => EventKind::MouseEnter,
            Event::MouseLeave => EventKind::MouseLeave,
            Event::MouseButtonPress { .. } => EventKind::MouseButtonPress,
            Event::MouseButtonRelease { .. } => EventKind::MouseButtonRelease,
            Event::MouseScroll { .. } => EventKind::MouseScroll,
        }
    }
}
