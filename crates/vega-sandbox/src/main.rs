//! Sandbox application: a spinning triangle with an egui control panel.

use std::sync::Arc;

use anyhow::Result;
use bytemuck::{Pod, Zeroable};

use vega_engine::app::{App, AppControl, Engine, EngineCtx};
use vega_engine::assets::FileAsset;
use vega_engine::binding::{
    BindGroup, BindGroupBuilder, BindGroupLayoutBuilder, BufferEntry, PipelineLayoutBuilder,
};
use vega_engine::command::{
    ColorAttachment, CommandEncoderBuilder, DepthStencilAttachment, RenderPassBuilder,
};
use vega_engine::context::{FrameOutcome, RenderContextBuilder};
use vega_engine::events::Event;
use vega_engine::gui::GuiOverlay;
use vega_engine::logging::{LoggingConfig, init_logging};
use vega_engine::pipeline::{
    ColorTargetStateBuilder, DepthStencilStateBuilder, FragmentState, RenderPipeline,
    RenderPipelineBuilder, VertexLayout, VertexState,
};
use vega_engine::resources::{
    ShaderBuilder, UniformBuffer, UniformBufferBuilder, VertexBuffer, VertexBufferBuilder,
};
use vega_engine::window::WindowSettings;

const TRIANGLE_SHADER: &str = r#"
struct Globals {
    angle: f32,
    aspect: f32,
    _pad: vec2<f32>,
}

@group(0) @binding(0) var<uniform> globals: Globals;

struct VsIn {
    @location(0) position: vec2<f32>,
    @location(1) color: vec3<f32>,
}

struct VsOut {
    @builtin(position) position: vec4<f32>,
    @location(0) color: vec3<f32>,
}

@vertex
fn vs_main(in: VsIn) -> VsOut {
    let c = cos(globals.angle);
    let s = sin(globals.angle);
    let rotated = vec2<f32>(
        in.position.x * c - in.position.y * s,
        in.position.x * s + in.position.y * c,
    );

    var out: VsOut;
    out.position = vec4<f32>(rotated.x / globals.aspect, rotated.y, 0.0, 1.0);
    out.color = in.color;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Globals {
    angle: f32,
    aspect: f32,
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    color: [f32; 3],
}

const VERTICES: [Vertex; 3] = [
    Vertex {
        position: [0.0, 0.6],
        color: [1.0, 0.2, 0.2],
    },
    Vertex {
        position: [-0.6, -0.5],
        color: [0.2, 1.0, 0.2],
    },
    Vertex {
        position: [0.6, -0.5],
        color: [0.2, 0.2, 1.0],
    },
];

/// GPU resources built once in `setup`.
struct Scene {
    pipeline: Arc<RenderPipeline>,
    vertices: Arc<VertexBuffer>,
    globals: Arc<UniformBuffer>,
    bind_group: Arc<BindGroup>,
}

struct SandboxApp {
    gui: Option<GuiOverlay>,
    scene: Option<Scene>,
    angle: f32,
    speed: f32,
    clear_color: [f32; 3],
}

impl SandboxApp {
    fn new() -> Self {
        Self {
            gui: None,
            scene: None,
            angle: 0.0,
            speed: 1.0,
            clear_color: [0.02, 0.02, 0.05],
        }
    }
}

impl App for SandboxApp {
    fn setup(&mut self, ctx: &mut EngineCtx) -> Result<()> {
        let context = &*ctx.context;

        let shader_asset = FileAsset::from_content("triangle.wgsl", TRIANGLE_SHADER);
        let shader = ShaderBuilder::new()
            .with_label("Triangle Shader")
            .build_wgsl(&shader_asset, context);

        let vertices = VertexBufferBuilder::new()
            .with_label("Triangle Vertices")
            .build(&VERTICES, context);

        let globals = UniformBufferBuilder::new()
            .with_label("Triangle Globals")
            .build_value(
                &Globals {
                    angle: 0.0,
                    aspect: 1.0,
                    _pad: [0.0; 2],
                },
                context,
            );

        let bind_group_layout = BindGroupLayoutBuilder::new()
            .with_label("Triangle Bindings")
            .add_uniform_buffer(0, BufferEntry::new())
            .build(context)?;
        let bind_group = BindGroupBuilder::new()
            .with_label("Triangle Bindings")
            .add_uniform_buffer(0, globals.clone())
            .build(&bind_group_layout, context)?;

        let pipeline_layout = PipelineLayoutBuilder::new()
            .with_label("Triangle Layout")
            .add_bind_group_layout(bind_group_layout)
            .build(context);

        let vertex_layout = VertexLayout::new(std::mem::size_of::<Vertex>() as u64)
            .add_attribute(wgpu::VertexFormat::Float32x2, 0, 0)
            .add_attribute(wgpu::VertexFormat::Float32x3, 8, 1);

        let pipeline = RenderPipelineBuilder::new()
            .with_label("Triangle Pipeline")
            .with_layout(pipeline_layout)
            .with_vertex_state(VertexState::new(shader.clone()).add_layout(vertex_layout))
            .with_fragment_state(
                FragmentState::new(shader)
                    .add_target(ColorTargetStateBuilder::new(context.surface_format()).build()),
            )
            .with_depth_stencil_state(DepthStencilStateBuilder::new().build())
            .build(context)?;

        self.scene = Some(Scene {
            pipeline,
            vertices,
            globals,
            bind_group,
        });
        self.gui = Some(GuiOverlay::new(context, ctx.window));

        log::info!("sandbox scene ready");
        Ok(())
    }

    fn on_window_event(&mut self, window: &winit::window::Window, event: &winit::event::WindowEvent) -> bool {
        match self.gui.as_mut() {
            Some(gui) => gui.handle_input(window, event),
            None => false,
        }
    }

    fn on_event(&mut self, event: &Event, ctx: &mut EngineCtx) -> AppControl {
        match event {
            Event::WindowResize { width, height } => {
                if let Some(gui) = self.gui.as_mut() {
                    gui.resize(*width, *height, gui.context().pixels_per_point());
                }
            }
            Event::WindowContentScale { scale } => {
                if let Some(gui) = self.gui.as_mut() {
                    let (width, height) = ctx.context.size();
                    gui.resize(width, height, *scale as f32);
                }
            }
            _ => {}
        }
        AppControl::Continue
    }

    fn frame(&mut self, ctx: &mut EngineCtx) -> Result<AppControl> {
        let (Some(scene), Some(gui)) = (self.scene.as_ref(), self.gui.as_mut()) else {
            return Ok(AppControl::Continue);
        };

        self.angle += self.speed * ctx.time.dt;

        // Build the overlay for this frame.
        gui.begin_frame(ctx.window);
        egui::Window::new("Sandbox")
            .resizable(false)
            .show(gui.context(), |ui| {
                ui.label(format!("frame {}", ctx.time.frame_index));
                ui.label(format!("dt {:.2} ms", ctx.time.dt * 1000.0));
                ui.add(egui::Slider::new(&mut self.speed, -4.0..=4.0).text("spin speed"));
                ui.color_edit_button_rgb(&mut self.clear_color);
            });
        gui.end_frame(ctx.window);

        let (width, height) = ctx.context.size();
        let globals = Globals {
            angle: self.angle,
            aspect: width as f32 / height.max(1) as f32,
            _pad: [0.0; 2],
        };
        scene.globals.write(ctx.context, bytemuck::bytes_of(&globals));

        gui.prepare(ctx.context);

        let clear = self.clear_color;
        let outcome = ctx.context.render_frame_on_surface(|context, surface| {
            let mut encoder = CommandEncoderBuilder::new()
                .with_label("Sandbox Frame")
                .build(context);

            let mut pass = RenderPassBuilder::new()
                .with_label("Triangle Pass")
                .add_color_attachment(
                    ColorAttachment::new(surface.clone()).with_clear_color(
                        clear[0] as f64,
                        clear[1] as f64,
                        clear[2] as f64,
                        1.0,
                    ),
                )
                .with_depth_stencil_attachment(DepthStencilAttachment::new(
                    context.depth_framebuffer().clone(),
                ))
                .build(&mut encoder);

            pass.set_render_pipeline(scene.pipeline.clone());
            pass.set_bind_group(0, scene.bind_group.clone());
            pass.draw(0, scene.vertices.clone());
            pass.finish();

            // The overlay pipeline carries no depth state, so it paints in
            // its own color-only pass after the scene.
            gui.paint_onto_surface(surface, &mut encoder);

            context.submit_commands([encoder.finish("Sandbox Frame")]);
            Ok(())
        })?;

        if outcome == FrameOutcome::Skipped {
            log::debug!("frame skipped while the surface recovers");
        }
        Ok(AppControl::Continue)
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let settings = WindowSettings::default()
        .with_title("Vega Sandbox")
        .with_size(1280, 720)
        .with_quit_on_escape(true);

    Engine::run(settings, RenderContextBuilder::new(), SandboxApp::new())
}
