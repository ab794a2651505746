use std::sync::Arc;

use crate::assets::TextureAsset;
use crate::context::RenderContext;

/// Owning wrapper around one GPU texture and its default view.
pub struct Texture {
    label: String,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    size: wgpu::Extent3d,
}

impl Texture {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.size.width
    }

    pub fn height(&self) -> u32 {
        self.size.height
    }

    pub fn depth(&self) -> u32 {
        self.size.depth_or_array_layers
    }

    pub fn size(&self) -> wgpu::Extent3d {
        self.size
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        log::trace!("releasing texture '{}'", self.label);
    }
}

/// A render target view.
///
/// `Owned` framebuffers (depth buffers, off-screen color targets) carry their
/// own texture and release it when dropped. `Borrowed` framebuffers view a
/// texture owned elsewhere, such as the swapchain frame; dropping the view
/// never releases the underlying texture, so surface presentation stays the
/// sole owner's job.
pub struct Framebuffer {
    label: String,
    target: FramebufferTarget,
    view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

enum FramebufferTarget {
    Owned(wgpu::Texture),
    Borrowed,
}

impl Framebuffer {
    /// Creates an owned depth attachment.
    pub(crate) fn new_depth(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        Self::new_owned(
            device,
            label,
            format,
            width,
            height,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        )
    }

    pub(crate) fn new_owned(
        device: &wgpu::Device,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        usage: wgpu::TextureUsages,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            label: label.to_string(),
            target: FramebufferTarget::Owned(texture),
            view,
            format,
            width,
            height,
        }
    }

    /// Wraps the current swapchain texture as a borrowed view.
    pub(crate) fn from_surface(
        surface_texture: &wgpu::SurfaceTexture,
        label: &str,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            label: label.to_string(),
            target: FramebufferTarget::Borrowed,
            view,
            format,
            width,
            height,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when this framebuffer views a texture owned elsewhere.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.target, FramebufferTarget::Borrowed)
    }

    /// The backing texture, when this framebuffer owns one.
    pub fn owned_texture(&self) -> Option<&wgpu::Texture> {
        match &self.target {
            FramebufferTarget::Owned(texture) => Some(texture),
            FramebufferTarget::Borrowed => None,
        }
    }
}

/// Builder for [`Texture`]s and owned [`Framebuffer`]s.
#[derive(Debug, Clone)]
pub struct TextureBuilder {
    label: String,
    usage: wgpu::TextureUsages,
    format: wgpu::TextureFormat,
    mip_level_count: u32,
    sample_count: u32,
}

impl Default for TextureBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Texture".to_string(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            format: wgpu::TextureFormat::Rgba8Unorm,
            mip_level_count: 1,
            sample_count: 1,
        }
    }
}

impl TextureBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage = usage;
        self
    }

    pub fn add_usage(mut self, usage: wgpu::TextureUsages) -> Self {
        self.usage |= usage;
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_mip_level_count(mut self, count: u32) -> Self {
        self.mip_level_count = count;
        self
    }

    pub fn with_sample_count(mut self, count: u32) -> Self {
        self.sample_count = count;
        self
    }

    fn descriptor(&self, size: wgpu::Extent3d) -> wgpu::TextureDescriptor<'_> {
        // Depth 1 means a plain 2D texture; anything deeper is 3D.
        let dimension = if size.depth_or_array_layers <= 1 {
            wgpu::TextureDimension::D2
        } else {
            wgpu::TextureDimension::D3
        };

        wgpu::TextureDescriptor {
            label: Some(&self.label),
            size,
            mip_level_count: self.mip_level_count,
            sample_count: self.sample_count,
            dimension,
            format: self.format,
            usage: self.usage,
            view_formats: &[],
        }
    }

    fn create(self, size: wgpu::Extent3d, ctx: &RenderContext) -> Arc<Texture> {
        let texture = ctx.device().create_texture(&self.descriptor(size));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Arc::new(Texture {
            label: self.label,
            texture,
            view,
            format: self.format,
            size,
        })
    }

    /// Allocates an uninitialized 2D texture.
    pub fn empty_2d(self, width: u32, height: u32, ctx: &RenderContext) -> Arc<Texture> {
        self.create(
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            ctx,
        )
    }

    /// Allocates an uninitialized 3D texture.
    pub fn empty_3d(self, width: u32, height: u32, depth: u32, ctx: &RenderContext) -> Arc<Texture> {
        self.create(
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: depth,
            },
            ctx,
        )
    }

    /// Allocates a 2D texture and uploads the asset's pixels.
    pub fn build(self, asset: &TextureAsset, ctx: &RenderContext) -> Arc<Texture> {
        let texture = self.empty_2d(asset.width(), asset.height(), ctx);

        ctx.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: texture.raw(),
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            asset.data(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(asset.stride()),
                rows_per_image: Some(asset.height()),
            },
            texture.size(),
        );

        texture
    }

    /// Allocates an owned framebuffer, forcing render-attachment usage.
    pub fn empty_framebuffer(self, width: u32, height: u32, ctx: &RenderContext) -> Arc<Framebuffer> {
        let builder = self.add_usage(wgpu::TextureUsages::RENDER_ATTACHMENT);
        Arc::new(Framebuffer::new_owned(
            ctx.device(),
            &builder.label,
            builder.format,
            width,
            height,
            builder.usage,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extent(width: u32, height: u32, depth: u32) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: depth,
        }
    }

    // ── builder defaults ──────────────────────────────────────────────────

    #[test]
    fn default_usage_is_binding_plus_copy_dst() {
        let builder = TextureBuilder::new();
        assert_eq!(
            builder.usage,
            wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST
        );
        assert_eq!(builder.format, wgpu::TextureFormat::Rgba8Unorm);
        assert_eq!(builder.mip_level_count, 1);
        assert_eq!(builder.sample_count, 1);
    }

    #[test]
    fn framebuffer_path_forces_render_attachment() {
        let builder = TextureBuilder::new().add_usage(wgpu::TextureUsages::RENDER_ATTACHMENT);
        assert!(builder.usage.contains(wgpu::TextureUsages::RENDER_ATTACHMENT));
        assert!(builder.usage.contains(wgpu::TextureUsages::TEXTURE_BINDING));
    }

    // ── descriptor shape ──────────────────────────────────────────────────

    #[test]
    fn shallow_extent_is_two_dimensional() {
        let builder = TextureBuilder::new();
        let desc = builder.descriptor(extent(64, 64, 1));
        assert_eq!(desc.dimension, wgpu::TextureDimension::D2);
    }

    #[test]
    fn deep_extent_is_three_dimensional() {
        let builder = TextureBuilder::new();
        let desc = builder.descriptor(extent(16, 16, 8));
        assert_eq!(desc.dimension, wgpu::TextureDimension::D3);
    }
}
