use std::collections::HashSet;

use crate::events::Event;

use super::{KeyCode, MouseButton};

/// Window and input state accumulated from the event stream.
///
/// The runtime applies every engine event to this snapshot before queueing it
/// on the dispatcher, so per-frame code can poll state instead of tracking
/// transitions itself.
#[derive(Debug, Default)]
pub struct WindowState {
    width: u32,
    height: u32,
    position: (i32, i32),
    cursor: (f64, f64),
    cursor_inside: bool,
    focused: bool,
    minimized: bool,
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<MouseButton>,
}

impl WindowState {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            focused: true,
            ..Self::default()
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn position(&self) -> (i32, i32) {
        self.position
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor
    }

    pub fn is_cursor_inside(&self) -> bool {
        self.cursor_inside
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_minimized(&self) -> bool {
        self.minimized
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Folds one event into the snapshot.
    pub fn apply(&mut self, event: &Event) {
        match *event {
            Event::WindowResize { width, height } => {
                self.width = width;
                self.height = height;
            }
            Event::WindowMove { x, y } => self.position = (x, y),
            Event::WindowMinimize => self.minimized = true,
            Event::WindowMaximize | Event::WindowRestore => self.minimized = false,
            Event::WindowGainFocus => self.focused = true,
            Event::WindowLoseFocus => self.focused = false,

            Event::KeyPress { key, .. } => {
                self.keys_down.insert(key);
            }
            Event::KeyRelease { key } => {
                self.keys_down.remove(&key);
            }

            Event::MouseMove { x, y } => self.cursor = (x, y),
            Event::MouseEnter => self.cursor_inside = true,
            Event::MouseLeave => self.cursor_inside = false,
            Event::MouseButtonPress { button } => {
                self.buttons_down.insert(button);
            }
            Event::MouseButtonRelease { button } => {
                self.buttons_down.remove(&button);
            }

            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── size / focus ──────────────────────────────────────────────────────

    #[test]
    fn tracks_resize_and_minimize() {
        let mut state = WindowState::new(800, 600);
        state.apply(&Event::WindowResize {
            width: 1920,
            height: 1080,
        });
        assert_eq!(state.size(), (1920, 1080));

        state.apply(&Event::WindowMinimize);
        assert!(state.is_minimized());
        state.apply(&Event::WindowRestore);
        assert!(!state.is_minimized());
    }

    #[test]
    fn tracks_focus_transitions() {
        let mut state = WindowState::new(10, 10);
        assert!(state.is_focused());
        state.apply(&Event::WindowLoseFocus);
        assert!(!state.is_focused());
        state.apply(&Event::WindowGainFocus);
        assert!(state.is_focused());
    }

    // ── keys / buttons ────────────────────────────────────────────────────

    #[test]
    fn key_press_and_release_round_trip() {
        let mut state = WindowState::new(10, 10);
        state.apply(&Event::KeyPress {
            key: KeyCode::W,
            repeat: false,
        });
        assert!(state.is_key_down(KeyCode::W));
        assert!(!state.is_key_down(KeyCode::S));

        state.apply(&Event::KeyRelease { key: KeyCode::W });
        assert!(!state.is_key_down(KeyCode::W));
    }

    #[test]
    fn repeated_press_is_stable() {
        let mut state = WindowState::new(10, 10);
        for _ in 0..3 {
            state.apply(&Event::KeyPress {
                key: KeyCode::Space,
                repeat: true,
            });
        }
        assert!(state.is_key_down(KeyCode::Space));
        state.apply(&Event::KeyRelease {
            key: KeyCode::Space,
        });
        assert!(!state.is_key_down(KeyCode::Space));
    }

    #[test]
    fn cursor_enter_move_leave() {
        let mut state = WindowState::new(10, 10);
        state.apply(&Event::MouseEnter);
        state.apply(&Event::MouseMove { x: 4.0, y: 8.0 });
        assert!(state.is_cursor_inside());
        assert_eq!(state.cursor_position(), (4.0, 8.0));

        state.apply(&Event::MouseLeave);
        assert!(!state.is_cursor_inside());
    }

    #[test]
    fn mouse_buttons_tracked_independently() {
        let mut state = WindowState::new(10, 10);
        state.apply(&Event::MouseButtonPress {
            button: MouseButton::Left,
        });
        state.apply(&Event::MouseButtonPress {
            button: MouseButton::Right,
        });
        state.apply(&Event::MouseButtonRelease {
            button: MouseButton::Left,
        });

        assert!(!state.is_button_down(MouseButton::Left));
        assert!(state.is_button_down(MouseButton::Right));
    }
}
