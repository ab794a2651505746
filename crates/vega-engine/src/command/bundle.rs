use std::sync::Arc;

use crate::binding::BindGroup;
use crate::context::RenderContext;
use crate::pipeline::RenderPipeline;
use crate::resources::{IndexBuffer, VertexBuffer};

/// Pre-recorded draw sequence replayable inside any compatible render pass.
///
/// Retains everything it references, so the bundle stays valid for as long as
/// the handle lives.
pub struct RenderBundle {
    label: String,
    bundle: wgpu::RenderBundle,
    pipelines: Vec<Arc<RenderPipeline>>,
    bind_groups: Vec<Arc<BindGroup>>,
    vertex_buffers: Vec<Arc<VertexBuffer>>,
    index_buffers: Vec<Arc<IndexBuffer>>,
}

impl RenderBundle {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn raw(&self) -> &wgpu::RenderBundle {
        &self.bundle
    }
}

impl Drop for RenderBundle {
    fn drop(&mut self) {
        log::trace!("releasing render bundle '{}'", self.label);
    }
}

/// Records draws into a [`RenderBundle`].
pub struct RenderBundleEncoder<'a> {
    encoder: wgpu::RenderBundleEncoder<'a>,
    pipelines: Vec<Arc<RenderPipeline>>,
    bind_groups: Vec<Arc<BindGroup>>,
    vertex_buffers: Vec<Arc<VertexBuffer>>,
    index_buffers: Vec<Arc<IndexBuffer>>,
}

impl RenderBundleEncoder<'_> {
    pub fn set_render_pipeline(&mut self, pipeline: Arc<RenderPipeline>) {
        self.encoder.set_pipeline(pipeline.raw());
        self.pipelines.push(pipeline);
    }

    pub fn set_vertex_buffer(&mut self, slot: u32, buffer: Arc<VertexBuffer>) {
        self.encoder.set_vertex_buffer(slot, buffer.raw().slice(..));
        self.vertex_buffers.push(buffer);
    }

    pub fn set_bind_group(&mut self, index: u32, group: Arc<BindGroup>) {
        self.encoder.set_bind_group(index, group.raw(), &[]);
        self.bind_groups.push(group);
    }

    /// Binds the buffer to `slot` and issues a non-indexed draw covering it.
    pub fn draw(&mut self, slot: u32, buffer: Arc<VertexBuffer>) {
        let count = buffer.count();
        self.set_vertex_buffer(slot, buffer);
        self.encoder.draw(0..count, 0..1);
    }

    /// Issues an indexed draw covering the whole index buffer.
    pub fn draw_indexed(&mut self, buffer: Arc<IndexBuffer>) {
        let count = buffer.count();
        self.encoder
            .set_index_buffer(buffer.raw().slice(..), buffer.format());
        self.index_buffers.push(buffer);
        self.encoder.draw_indexed(0..count, 0, 0..1);
    }

    pub fn finish(self, label: impl Into<String>) -> Arc<RenderBundle> {
        let label = label.into();
        let bundle = self.encoder.finish(&wgpu::RenderBundleDescriptor {
            label: Some(&label),
        });
        Arc::new(RenderBundle {
            label,
            bundle,
            pipelines: self.pipelines,
            bind_groups: self.bind_groups,
            vertex_buffers: self.vertex_buffers,
            index_buffers: self.index_buffers,
        })
    }
}

/// Builder declaring the attachment formats a bundle is compatible with.
pub struct RenderBundleEncoderBuilder {
    label: String,
    color_formats: Vec<Option<wgpu::TextureFormat>>,
    depth_stencil_format: Option<wgpu::TextureFormat>,
    depth_read_only: bool,
    stencil_read_only: bool,
    sample_count: u32,
}

impl Default for RenderBundleEncoderBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Render Bundle Encoder".to_string(),
            color_formats: Vec::new(),
            depth_stencil_format: None,
            depth_read_only: false,
            stencil_read_only: false,
            sample_count: 1,
        }
    }
}

impl RenderBundleEncoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Appends a color target format; slot order must match the pass the
    /// bundle will execute in.
    pub fn add_color_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_formats.push(Some(format));
        self
    }

    pub fn with_depth_stencil_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.depth_stencil_format = Some(format);
        self
    }

    pub fn with_depth_read_only(mut self, read_only: bool) -> Self {
        self.depth_read_only = read_only;
        self
    }

    pub fn with_stencil_read_only(mut self, read_only: bool) -> Self {
        self.stencil_read_only = read_only;
        self
    }

    pub fn with_sample_count(mut self, sample_count: u32) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn build<'a>(self, ctx: &'a RenderContext) -> RenderBundleEncoder<'a> {
        let encoder =
            ctx.device()
                .create_render_bundle_encoder(&wgpu::RenderBundleEncoderDescriptor {
                    label: Some(&self.label),
                    color_formats: &self.color_formats,
                    depth_stencil: self.depth_stencil_format.map(|format| {
                        wgpu::RenderBundleDepthStencil {
                            format,
                            depth_read_only: self.depth_read_only,
                            stencil_read_only: self.stencil_read_only,
                        }
                    }),
                    sample_count: self.sample_count,
                    multiview: None,
                });

        RenderBundleEncoder {
            encoder,
            pipelines: Vec::new(),
            bind_groups: Vec::new(),
            vertex_buffers: Vec::new(),
            index_buffers: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_formats_keep_slot_order() {
        let builder = RenderBundleEncoderBuilder::new()
            .add_color_format(wgpu::TextureFormat::Rgba8Unorm)
            .add_color_format(wgpu::TextureFormat::Bgra8UnormSrgb);

        assert_eq!(
            builder.color_formats,
            vec![
                Some(wgpu::TextureFormat::Rgba8Unorm),
                Some(wgpu::TextureFormat::Bgra8UnormSrgb),
            ]
        );
        assert_eq!(builder.sample_count, 1);
        assert!(builder.depth_stencil_format.is_none());
    }
}
