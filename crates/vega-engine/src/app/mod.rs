//! Application shell: the [`App`] trait and the [`Engine`] entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use winit::event::WindowEvent;
use winit::event_loop::EventLoop;
use winit::window::Window;

use crate::context::{RenderContext, RenderContextBuilder};
use crate::events::Event;
use crate::logging::{LoggingConfig, init_logging};
use crate::time::FrameTime;
use crate::window::{EngineRuntime, WindowSettings, WindowState};

/// Flow-control decision returned from application callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Everything the runtime lends to the application for one callback.
pub struct EngineCtx<'a> {
    /// Render context driving the window's surface.
    pub context: &'a mut RenderContext,
    /// The native window, e.g. for cursor grabs or GUI input routing.
    pub window: &'a Arc<Window>,
    /// Aggregated input and window state as of the current event batch.
    pub state: &'a WindowState,
    /// Timing snapshot for the frame being processed.
    pub time: FrameTime,
}

/// Application callbacks invoked by the [`Engine`] runtime.
///
/// `setup` runs once after the window and render context exist. Queued engine
/// events are delivered through `on_event` before each `frame`.
pub trait App {
    /// One-time initialization; resources built here live for the app's life.
    fn setup(&mut self, ctx: &mut EngineCtx) -> Result<()>;

    /// Raw window-event hook, called before translation into engine events.
    ///
    /// Return `true` to consume the event, preventing it from reaching the
    /// dispatcher. GUI overlays forward events to egui here.
    fn on_window_event(&mut self, _window: &Window, _event: &WindowEvent) -> bool {
        false
    }

    /// Handles one translated engine event.
    fn on_event(&mut self, _event: &Event, _ctx: &mut EngineCtx) -> AppControl {
        AppControl::Continue
    }

    /// Produces one frame.
    fn frame(&mut self, ctx: &mut EngineCtx) -> Result<AppControl>;
}

/// Engine entry point; owns the winit event loop.
pub struct Engine;

impl Engine {
    /// Runs `app` until it exits or the window closes.
    ///
    /// Blocks the calling thread for the lifetime of the event loop. A fatal
    /// error from setup, rendering, or surface recovery tears the loop down
    /// and is returned here.
    pub fn run<A>(
        settings: WindowSettings,
        context_builder: RenderContextBuilder,
        app: A,
    ) -> Result<()>
    where
        A: App + 'static,
    {
        init_logging(LoggingConfig::default());

        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let mut runtime = EngineRuntime::new(settings, context_builder, app);

        event_loop
            .run_app(&mut runtime)
            .context("event loop terminated with error")?;

        runtime.into_result()
    }
}
