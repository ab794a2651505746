use std::sync::Arc;

use anyhow::{Result, bail};

use crate::binding::PipelineLayout;
use crate::context::RenderContext;
use crate::resources::Shader;

use super::state::{FragmentState, VertexState};

/// Immutable, submittable render pipeline.
///
/// Retains its shaders and layout so nothing it references can be released
/// while the pipeline is bindable.
pub struct RenderPipeline {
    label: String,
    pipeline: wgpu::RenderPipeline,
    layout: Option<Arc<PipelineLayout>>,
    vertex_shader: Arc<Shader>,
    fragment_shader: Arc<Shader>,
}

impl RenderPipeline {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn layout(&self) -> Option<&Arc<PipelineLayout>> {
        self.layout.as_ref()
    }

    pub fn vertex_shader(&self) -> &Arc<Shader> {
        &self.vertex_shader
    }

    pub fn fragment_shader(&self) -> &Arc<Shader> {
        &self.fragment_shader
    }
}

impl Drop for RenderPipeline {
    fn drop(&mut self) {
        log::trace!("releasing render pipeline '{}'", self.label);
    }
}

/// Builder composing programmable and fixed-function state into a
/// [`RenderPipeline`].
///
/// A pipeline is meaningless without both programmable stages, so `build`
/// fails before touching the device when either the vertex or the fragment
/// state is missing.
pub struct RenderPipelineBuilder {
    label: String,
    layout: Option<Arc<PipelineLayout>>,
    vertex: Option<VertexState>,
    fragment: Option<FragmentState>,
    primitive: wgpu::PrimitiveState,
    depth_stencil: Option<wgpu::DepthStencilState>,
    multisample: wgpu::MultisampleState,
}

impl Default for RenderPipelineBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Render Pipeline".to_string(),
            layout: None,
            vertex: None,
            fragment: None,
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
        }
    }
}

impl RenderPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_layout(mut self, layout: Arc<PipelineLayout>) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn with_vertex_state(mut self, vertex: VertexState) -> Self {
        self.vertex = Some(vertex);
        self
    }

    pub fn with_fragment_state(mut self, fragment: FragmentState) -> Self {
        self.fragment = Some(fragment);
        self
    }

    pub fn with_primitive_state(mut self, primitive: wgpu::PrimitiveState) -> Self {
        self.primitive = primitive;
        self
    }

    pub fn with_depth_stencil_state(mut self, depth_stencil: wgpu::DepthStencilState) -> Self {
        self.depth_stencil = Some(depth_stencil);
        self
    }

    pub fn with_multisample_state(mut self, multisample: wgpu::MultisampleState) -> Self {
        self.multisample = multisample;
        self
    }

    pub fn build(self, ctx: &RenderContext) -> Result<Arc<RenderPipeline>> {
        let (vertex, fragment) = match (self.vertex, self.fragment) {
            (Some(vertex), Some(fragment)) => (vertex, fragment),
            (vertex, fragment) => {
                let missing = missing_state(vertex.is_some(), fragment.is_some())
                    .unwrap_or("vertex");
                bail!("render pipeline '{}' is missing a {missing} state", self.label);
            }
        };

        let vertex_layouts: Vec<wgpu::VertexBufferLayout> =
            vertex.layouts.iter().map(|l| l.buffer_layout()).collect();
        let targets: Vec<Option<wgpu::ColorTargetState>> =
            fragment.targets.iter().cloned().map(Some).collect();

        let pipeline = ctx
            .device()
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&self.label),
                layout: self.layout.as_ref().map(|l| l.raw()),
                vertex: wgpu::VertexState {
                    module: vertex.shader.raw(),
                    entry_point: Some(&vertex.entry_point),
                    buffers: &vertex_layouts,
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: fragment.shader.raw(),
                    entry_point: Some(&fragment.entry_point),
                    targets: &targets,
                    compilation_options: Default::default(),
                }),
                primitive: self.primitive,
                depth_stencil: self.depth_stencil,
                multisample: self.multisample,
                multiview_mask: None,
                cache: None,
            });

        Ok(Arc::new(RenderPipeline {
            label: self.label,
            pipeline,
            layout: self.layout,
            vertex_shader: vertex.shader,
            fragment_shader: fragment.shader,
        }))
    }
}

/// Names the first missing programmable stage, if any.
fn missing_state(has_vertex: bool, has_fragment: bool) -> Option<&'static str> {
    if !has_vertex {
        return Some("vertex");
    }
    if !has_fragment {
        return Some("fragment");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── required-state validation ─────────────────────────────────────────

    #[test]
    fn both_stages_present_is_valid() {
        assert_eq!(missing_state(true, true), None);
    }

    #[test]
    fn missing_vertex_is_reported_first() {
        assert_eq!(missing_state(false, false), Some("vertex"));
        assert_eq!(missing_state(false, true), Some("vertex"));
    }

    #[test]
    fn missing_fragment_is_reported() {
        assert_eq!(missing_state(true, false), Some("fragment"));
    }
}
