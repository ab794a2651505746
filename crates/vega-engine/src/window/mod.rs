mod input;
mod runtime;
mod settings;
mod state;

pub use input::{KeyCode, MouseButton};
pub(crate) use input::{map_key_code, map_mouse_button};
pub use runtime::EngineRuntime;
pub use settings::WindowSettings;
pub use state::WindowState;
