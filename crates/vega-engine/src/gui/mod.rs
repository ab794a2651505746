//! Immediate-mode GUI overlay backed by egui.

mod overlay;

pub use overlay::GuiOverlay;
