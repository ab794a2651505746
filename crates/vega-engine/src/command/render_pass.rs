use std::sync::Arc;

use crate::binding::BindGroup;
use crate::pipeline::RenderPipeline;
use crate::resources::{Framebuffer, IndexBuffer, VertexBuffer};

use super::bundle::RenderBundle;
use super::encoder::CommandEncoder;

/// One color target of a render pass.
///
/// Defaults to clearing with transparent black and storing the result.
#[derive(Clone)]
pub struct ColorAttachment {
    target: Arc<Framebuffer>,
    load_op: wgpu::LoadOp<wgpu::Color>,
    store_op: wgpu::StoreOp,
}

impl ColorAttachment {
    pub fn new(target: Arc<Framebuffer>) -> Self {
        Self {
            target,
            load_op: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
            store_op: wgpu::StoreOp::Store,
        }
    }

    pub fn with_clear_color(mut self, r: f64, g: f64, b: f64, a: f64) -> Self {
        self.load_op = wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a });
        self
    }

    /// Keeps whatever the target already holds instead of clearing.
    pub fn with_load(mut self) -> Self {
        self.load_op = wgpu::LoadOp::Load;
        self
    }

    pub fn with_store_op(mut self, store_op: wgpu::StoreOp) -> Self {
        self.store_op = store_op;
        self
    }

    fn as_attachment(&self) -> wgpu::RenderPassColorAttachment<'_> {
        wgpu::RenderPassColorAttachment {
            view: self.target.view(),
            depth_slice: None,
            resolve_target: None,
            ops: wgpu::Operations {
                load: self.load_op,
                store: self.store_op,
            },
        }
    }
}

/// Depth target of a render pass; clears to the far plane by default.
#[derive(Clone)]
pub struct DepthStencilAttachment {
    target: Arc<Framebuffer>,
    load_op: wgpu::LoadOp<f32>,
    store_op: wgpu::StoreOp,
}

impl DepthStencilAttachment {
    pub fn new(target: Arc<Framebuffer>) -> Self {
        Self {
            target,
            load_op: wgpu::LoadOp::Clear(1.0),
            store_op: wgpu::StoreOp::Store,
        }
    }

    pub fn with_clear_depth(mut self, depth: f32) -> Self {
        self.load_op = wgpu::LoadOp::Clear(depth);
        self
    }

    pub fn with_load(mut self) -> Self {
        self.load_op = wgpu::LoadOp::Load;
        self
    }

    pub fn with_store_op(mut self, store_op: wgpu::StoreOp) -> Self {
        self.store_op = store_op;
        self
    }

    fn as_attachment(&self) -> wgpu::RenderPassDepthStencilAttachment<'_> {
        wgpu::RenderPassDepthStencilAttachment {
            view: self.target.view(),
            depth_ops: Some(wgpu::Operations {
                load: self.load_op,
                store: self.store_op,
            }),
            stencil_ops: None,
        }
    }
}

/// Recording render pass.
///
/// Bound pipelines, buffers, and bind groups are retained for the lifetime of
/// the pass, so callers may drop their own handles immediately after binding.
pub struct RenderPass {
    pass: wgpu::RenderPass<'static>,
    pipelines: Vec<Arc<RenderPipeline>>,
    bind_groups: Vec<Arc<BindGroup>>,
    vertex_buffers: Vec<Arc<VertexBuffer>>,
    index_buffers: Vec<Arc<IndexBuffer>>,
    bundles: Vec<Arc<RenderBundle>>,
}

impl RenderPass {
    pub fn set_render_pipeline(&mut self, pipeline: Arc<RenderPipeline>) {
        self.pass.set_pipeline(pipeline.raw());
        self.pipelines.push(pipeline);
    }

    pub fn set_vertex_buffer(&mut self, slot: u32, buffer: Arc<VertexBuffer>) {
        self.pass.set_vertex_buffer(slot, buffer.raw().slice(..));
        self.vertex_buffers.push(buffer);
    }

    /// Binds buffers to consecutive slots starting at zero.
    pub fn set_vertex_buffers(&mut self, buffers: impl IntoIterator<Item = Arc<VertexBuffer>>) {
        for (slot, buffer) in buffers.into_iter().enumerate() {
            self.set_vertex_buffer(slot as u32, buffer);
        }
    }

    pub fn set_bind_group(&mut self, index: u32, group: Arc<BindGroup>) {
        self.pass.set_bind_group(index, group.raw(), &[]);
        self.bind_groups.push(group);
    }

    /// Binds groups to consecutive indices starting at zero.
    pub fn set_bind_groups(&mut self, groups: impl IntoIterator<Item = Arc<BindGroup>>) {
        for (index, group) in groups.into_iter().enumerate() {
            self.set_bind_group(index as u32, group);
        }
    }

    /// Binds the buffer to `slot` and issues a non-indexed draw covering it.
    pub fn draw(&mut self, slot: u32, buffer: Arc<VertexBuffer>) {
        let count = buffer.count();
        self.set_vertex_buffer(slot, buffer);
        self.pass.draw(0..count, 0..1);
    }

    /// Issues an indexed draw covering the whole index buffer.
    pub fn draw_indexed(&mut self, buffer: Arc<IndexBuffer>) {
        let count = buffer.count();
        self.pass
            .set_index_buffer(buffer.raw().slice(..), buffer.format());
        self.index_buffers.push(buffer);
        self.pass.draw_indexed(0..count, 0, 0..1);
    }

    pub fn execute_render_bundle(&mut self, bundle: Arc<RenderBundle>) {
        self.pass.execute_bundles(std::iter::once(bundle.raw()));
        self.bundles.push(bundle);
    }

    pub fn execute_render_bundles(&mut self, bundles: impl IntoIterator<Item = Arc<RenderBundle>>) {
        for bundle in bundles {
            self.execute_render_bundle(bundle);
        }
    }

    pub(crate) fn raw_mut(&mut self) -> &mut wgpu::RenderPass<'static> {
        &mut self.pass
    }

    /// Ends the pass; commands become part of the parent encoder.
    pub fn finish(self) {}
}

/// Builder describing a render pass's attachments.
pub struct RenderPassBuilder {
    label: String,
    color_attachments: Vec<ColorAttachment>,
    depth_stencil_attachment: Option<DepthStencilAttachment>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Render Pass".to_string(),
            color_attachments: Vec::new(),
            depth_stencil_attachment: None,
        }
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn add_color_attachment(mut self, attachment: ColorAttachment) -> Self {
        self.color_attachments.push(attachment);
        self
    }

    pub fn with_depth_stencil_attachment(mut self, attachment: DepthStencilAttachment) -> Self {
        self.depth_stencil_attachment = Some(attachment);
        self
    }

    pub fn build(self, encoder: &mut CommandEncoder) -> RenderPass {
        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = self
            .color_attachments
            .iter()
            .map(|a| Some(a.as_attachment()))
            .collect();

        let pass = encoder
            .raw_mut()
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some(&self.label),
                color_attachments: &color_attachments,
                depth_stencil_attachment: self
                    .depth_stencil_attachment
                    .as_ref()
                    .map(|a| a.as_attachment()),
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            })
            .forget_lifetime();

        RenderPass {
            pass,
            pipelines: Vec::new(),
            bind_groups: Vec::new(),
            vertex_buffers: Vec::new(),
            index_buffers: Vec::new(),
            bundles: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_starts_without_attachments() {
        let builder = RenderPassBuilder::new();
        assert!(builder.color_attachments.is_empty());
        assert!(builder.depth_stencil_attachment.is_none());
    }
}
