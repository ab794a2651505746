use winit::event::WindowEvent;
use winit::window::Window;

use crate::command::{CommandEncoder, RenderPass};
use crate::context::RenderContext;
use crate::resources::{Framebuffer, Texture};

/// Egui overlay drawn on top of the application's own passes.
///
/// The per-frame lifecycle is split into phases:
///
/// 1. `handle_input` for each winit event,
/// 2. `begin_frame`, build widgets via `context()`, `end_frame`,
/// 3. `prepare` to upload textures and geometry,
/// 4. `paint` inside a render pass targeting the surface.
pub struct GuiOverlay {
    egui_ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,

    clipped_primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    screen_descriptor: egui_wgpu::ScreenDescriptor,
}

impl GuiOverlay {
    /// Creates the overlay against the context's surface format.
    ///
    /// The initial screen descriptor is derived from the window's inner size
    /// and scale factor.
    pub fn new(ctx: &RenderContext, window: &Window) -> Self {
        let size = window.inner_size();
        let egui_ctx = egui::Context::default();

        let viewport_id = egui_ctx.viewport_id();
        let state = egui_winit::State::new(egui_ctx.clone(), viewport_id, window, None, None, None);

        let renderer = egui_wgpu::Renderer::new(
            ctx.device(),
            ctx.surface_format(),
            egui_wgpu::RendererOptions::default(),
        );

        Self {
            egui_ctx,
            state,
            renderer,
            clipped_primitives: Vec::new(),
            textures_delta: egui::TexturesDelta::default(),
            screen_descriptor: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: window.scale_factor() as f32,
            },
        }
    }

    /// Forwards a winit window event to egui.
    ///
    /// Returns `true` if egui consumed the event. Mouse-button releases are
    /// always reported as unconsumed so camera controls can detect drag end.
    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);

        if let WindowEvent::MouseInput {
            state: winit::event::ElementState::Released,
            ..
        } = event
        {
            return false;
        }

        response.consumed
    }

    /// Starts an egui frame. Call once per frame before building widgets.
    pub fn begin_frame(&mut self, window: &Window) {
        let raw_input = self.state.take_egui_input(window);
        self.egui_ctx.begin_pass(raw_input);
    }

    /// The shared egui context for building widgets.
    pub fn context(&self) -> &egui::Context {
        &self.egui_ctx
    }

    /// Ends the egui frame: tessellates shapes, captures the texture delta,
    /// and forwards platform output (cursor icon, clipboard, IME) to winit.
    pub fn end_frame(&mut self, window: &Window) {
        let egui::FullOutput {
            shapes,
            textures_delta,
            platform_output,
            ..
        } = self.egui_ctx.end_pass();

        self.state.handle_platform_output(window, platform_output);
        self.textures_delta = textures_delta;
        self.clipped_primitives = self
            .egui_ctx
            .tessellate(shapes, self.egui_ctx.pixels_per_point());
    }

    /// Updates the screen descriptor after a resize or scale change.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f32) {
        self.screen_descriptor.size_in_pixels = [width, height];
        self.screen_descriptor.pixels_per_point = scale_factor;
    }

    /// Makes an engine texture usable in egui widgets (e.g. `egui::Image`).
    pub fn register_texture(
        &mut self,
        ctx: &RenderContext,
        texture: &Texture,
        filter: wgpu::FilterMode,
    ) -> egui::TextureId {
        self.renderer
            .register_native_texture(ctx.device(), texture.view(), filter)
    }

    /// Releases a texture previously registered with [`register_texture`].
    ///
    /// [`register_texture`]: Self::register_texture
    pub fn unregister_texture(&mut self, id: egui::TextureId) {
        self.renderer.free_texture(&id);
    }

    /// True when a text field or similar widget holds keyboard focus.
    pub fn wants_keyboard_input(&self) -> bool {
        self.egui_ctx.egui_wants_keyboard_input()
    }

    /// True when the pointer hovers or drags an egui widget.
    pub fn wants_pointer_input(&self) -> bool {
        self.egui_ctx.egui_wants_pointer_input()
    }

    /// Uploads egui-managed textures and geometry for the tessellated frame.
    ///
    /// Must run after `end_frame` and before `paint`. Buffer uploads go
    /// through a temporary encoder submitted immediately.
    pub fn prepare(&mut self, ctx: &RenderContext) {
        let device = ctx.device();
        let queue = ctx.queue();

        for (id, delta) in &self.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Vega Gui Upload"),
        });
        let user_buffers = self.renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &self.clipped_primitives,
            &self.screen_descriptor,
        );
        let mut buffers: Vec<wgpu::CommandBuffer> = Vec::with_capacity(1 + user_buffers.len());
        buffers.push(encoder.finish());
        buffers.extend(user_buffers);
        queue.submit(buffers);

        for id in &self.textures_delta.free {
            self.renderer.free_texture(id);
        }

        // Deltas must not be re-applied next frame.
        self.textures_delta.set.clear();
        self.textures_delta.free.clear();
    }

    /// Records the overlay's draws into an already open render pass.
    ///
    /// The pass must target the surface format the overlay was created with,
    /// load the existing contents rather than clearing them, and carry no
    /// depth-stencil attachment (the overlay's pipeline has none, and wgpu
    /// rejects the draw in a pass whose attachments disagree). Prefer
    /// [`paint_onto_surface`] unless the pass is already shaped that way.
    ///
    /// [`paint_onto_surface`]: Self::paint_onto_surface
    pub fn paint(&self, pass: &mut RenderPass) {
        self.renderer.render(
            pass.raw_mut(),
            &self.clipped_primitives,
            &self.screen_descriptor,
        );
    }

    /// Records the overlay into its own color-only pass over the surface
    /// frame.
    ///
    /// Opens a dedicated pass that loads the frame's contents and binds no
    /// depth-stencil attachment, keeping it compatible with the overlay's
    /// depth-less pipeline regardless of how the scene passes are shaped.
    pub fn paint_onto_surface(&self, surface: &Framebuffer, encoder: &mut CommandEncoder) {
        let mut rpass = encoder
            .raw_mut()
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Vega Gui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: surface.view(),
                    depth_slice: None,
                    resolve_target: None,
                    ops: overlay_ops(),
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        self.renderer.render(
            &mut rpass,
            &self.clipped_primitives,
            &self.screen_descriptor,
        );
    }
}

/// Load/store ops for the overlay's own pass. The scene underneath must
/// survive, so the pass loads instead of clearing.
fn overlay_ops() -> wgpu::Operations<wgpu::Color> {
    wgpu::Operations {
        load: wgpu::LoadOp::Load,
        store: wgpu::StoreOp::Store,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_pass_loads_the_existing_frame() {
        let ops = overlay_ops();
        assert_eq!(ops.load, wgpu::LoadOp::Load);
        assert_eq!(ops.store, wgpu::StoreOp::Store);
    }
}
