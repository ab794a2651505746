use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Fullscreen, Window, WindowId};

use crate::app::{App, AppControl, EngineCtx};
use crate::context::{RenderContext, RenderContextBuilder};
use crate::events::{Event, EventDispatcher};
use crate::time::FrameClock;
use crate::window::{KeyCode, WindowSettings, WindowState, map_key_code, map_mouse_button};

/// Everything that exists only while the window is alive.
struct ActiveWindow {
    window: Arc<Window>,
    context: RenderContext,
    state: WindowState,
    dispatcher: EventDispatcher,
    clock: FrameClock,
}

/// winit `ApplicationHandler` driving one window and one [`App`].
///
/// The window and render context are created lazily in `resumed`, as required
/// by winit 0.30. Translated engine events are queued on the dispatcher and
/// delivered in order right before each frame.
pub struct EngineRuntime<A: App> {
    settings: WindowSettings,
    context_builder: Option<RenderContextBuilder>,
    app: A,
    active: Option<ActiveWindow>,
    fatal: Option<anyhow::Error>,
}

impl<A: App> EngineRuntime<A> {
    pub fn new(settings: WindowSettings, context_builder: RenderContextBuilder, app: A) -> Self {
        Self {
            settings,
            context_builder: Some(context_builder),
            app,
            active: None,
            fatal: None,
        }
    }

    /// Consumes the runtime after the event loop returns, surfacing any fatal
    /// error that tore the loop down.
    pub fn into_result(self) -> Result<()> {
        match self.fatal {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn abort(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("fatal engine error: {err:#}");
        self.fatal = Some(err);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let builder = self
            .context_builder
            .take()
            .ok_or_else(|| anyhow!("render context was already built"))?;

        let mut attrs = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(PhysicalSize::new(self.settings.width, self.settings.height))
            .with_resizable(self.settings.resizable);
        if self.settings.fullscreen {
            attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let context = builder.build(window.clone())?;
        let (width, height) = context.size();

        self.active = Some(ActiveWindow {
            window,
            context,
            state: WindowState::new(width, height),
            dispatcher: EventDispatcher::new(),
            clock: FrameClock::new(),
        });
        Ok(())
    }

    fn setup_app(&mut self) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Err(anyhow!("setup requested before the window exists"));
        };
        let mut ctx = EngineCtx {
            context: &mut active.context,
            window: &active.window,
            state: &active.state,
            time: active.clock.tick(),
        };
        self.app.setup(&mut ctx)
    }

    fn drive_frame(&mut self) -> Result<AppControl> {
        let Some(active) = self.active.as_mut() else {
            return Ok(AppControl::Continue);
        };

        let time = active.clock.tick();

        // Deliver queued events, letting the application see the render
        // context while each one is handled.
        let mut control = AppControl::Continue;
        {
            let app = &mut self.app;
            let context = &mut active.context;
            let window = &active.window;
            let state = &active.state;
            active.dispatcher.dispatch_with(|event| {
                let mut ctx = EngineCtx {
                    context: &mut *context,
                    window,
                    state,
                    time,
                };
                if app.on_event(event, &mut ctx) == AppControl::Exit {
                    control = AppControl::Exit;
                }
            });
        }
        if control == AppControl::Exit {
            return Ok(AppControl::Exit);
        }

        // A minimized window has no drawable surface.
        if active.state.is_minimized() {
            return Ok(AppControl::Continue);
        }

        let mut ctx = EngineCtx {
            context: &mut active.context,
            window: &active.window,
            state: &active.state,
            time,
        };
        self.app.frame(&mut ctx)
    }
}

impl<A: App> ApplicationHandler for EngineRuntime<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.active.is_some() {
            return;
        }

        if let Err(err) = self.create_window(event_loop) {
            self.abort(event_loop, err);
            return;
        }
        if let Err(err) = self.setup_app() {
            self.abort(event_loop, err.context("application setup failed"));
            return;
        }

        if let Some(active) = &self.active {
            active.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::Poll);

        // Continuous redraw; the frame clock paces downstream systems.
        if let Some(active) = &self.active {
            active.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if active.window.id() != window_id {
            return;
        }

        // Raw hook first so GUI overlays can claim input before translation.
        let window = active.window.clone();
        let consumed = self.app.on_window_event(&window, &event);

        let Some(active) = self.active.as_mut() else {
            return;
        };

        match &event {
            WindowEvent::CloseRequested => {
                active.dispatcher.push(Event::WindowClose);
                active.dispatcher.dispatch();
                event_loop.exit();
                return;
            }

            WindowEvent::Resized(size) => {
                active.context.resize(size.width, size.height);
                let event = Event::WindowResize {
                    width: size.width,
                    height: size.height,
                };
                active.state.apply(&event);
                active.dispatcher.push(event);
                if active.window.is_maximized() {
                    active.dispatcher.push(Event::WindowMaximize);
                }
                active.window.request_redraw();
                return;
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                active.dispatcher.push(Event::WindowContentScale {
                    scale: *scale_factor,
                });
                return;
            }

            WindowEvent::RedrawRequested => {
                match self.drive_frame() {
                    Ok(AppControl::Continue) => {}
                    Ok(AppControl::Exit) => event_loop.exit(),
                    Err(err) => self.abort(event_loop, err.context("frame failed")),
                }
                return;
            }

            _ => {}
        }

        // Input claimed by the raw hook stays out of the event queue.
        if consumed {
            return;
        }

        let mut events = Vec::new();
        translate_window_event(&event, &mut events);
        for event in events {
            if self.settings.quit_on_escape
                && matches!(
                    event,
                    Event::KeyPress {
                        key: KeyCode::Escape,
                        ..
                    }
                )
            {
                event_loop.exit();
                return;
            }

            active.state.apply(&event);
            active.dispatcher.push(event);
        }
    }
}

/// Translates one winit window event into zero or more engine events.
fn translate_window_event(event: &WindowEvent, out: &mut Vec<Event>) {
    match event {
        WindowEvent::Moved(position) => out.push(Event::WindowMove {
            x: position.x,
            y: position.y,
        }),

        WindowEvent::Focused(true) => out.push(Event::WindowGainFocus),
        WindowEvent::Focused(false) => out.push(Event::WindowLoseFocus),

        WindowEvent::Occluded(true) => out.push(Event::WindowMinimize),
        WindowEvent::Occluded(false) => out.push(Event::WindowRestore),

        WindowEvent::KeyboardInput { event, .. } => {
            let key = map_key_code(event.physical_key);
            match event.state {
                ElementState::Pressed => {
                    out.push(Event::KeyPress {
                        key,
                        repeat: event.repeat,
                    });
                    if let Some(text) = &event.text {
                        for character in text.chars().filter(|c| !c.is_control()) {
                            out.push(Event::CharInput { character });
                        }
                    }
                }
                ElementState::Released => out.push(Event::KeyRelease { key }),
            }
        }

        WindowEvent::Ime(winit::event::Ime::Commit(text)) => {
            for character in text.chars().filter(|c| !c.is_control()) {
                out.push(Event::CharInput { character });
            }
        }

        WindowEvent::CursorMoved { position, .. } => out.push(Event::MouseMove {
            x: position.x,
            y: position.y,
        }),
        WindowEvent::CursorEntered { .. } => out.push(Event::MouseEnter),
        WindowEvent::CursorLeft { .. } => out.push(Event::MouseLeave),

        WindowEvent::MouseInput { state, button, .. } => {
            let button = map_mouse_button(*button);
            out.push(match state {
                ElementState::Pressed => Event::MouseButtonPress { button },
                ElementState::Released => Event::MouseButtonRelease { button },
            });
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let (dx, dy) = match delta {
                MouseScrollDelta::LineDelta(x, y) => (*x as f64, *y as f64),
                MouseScrollDelta::PixelDelta(p) => (p.x, p.y),
            };
            out.push(Event::MouseScroll { dx, dy });
        }

        _ => {}
    }
}
