use std::sync::Arc;

use crate::context::RenderContext;
use crate::resources::{Buffer, Texture};

/// Finished, submittable stream of recorded GPU commands.
pub struct CommandBuffer {
    label: String,
    buffer: wgpu::CommandBuffer,
}

impl CommandBuffer {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn into_raw(self) -> wgpu::CommandBuffer {
        self.buffer
    }
}

/// One texture subresource participating in a copy.
#[derive(Clone)]
pub struct ImageCopyTexture {
    texture: Arc<Texture>,
    mip_level: u32,
    origin: wgpu::Origin3d,
    aspect: wgpu::TextureAspect,
}

impl ImageCopyTexture {
    pub fn new(texture: Arc<Texture>) -> Self {
        Self {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        }
    }

    pub fn with_mip_level(mut self, mip_level: u32) -> Self {
        self.mip_level = mip_level;
        self
    }

    pub fn with_origin(mut self, x: u32, y: u32, z: u32) -> Self {
        self.origin = wgpu::Origin3d { x, y, z };
        self
    }

    pub fn with_aspect(mut self, aspect: wgpu::TextureAspect) -> Self {
        self.aspect = aspect;
        self
    }

    pub fn texture(&self) -> &Arc<Texture> {
        &self.texture
    }

    pub(crate) fn as_info(&self) -> wgpu::TexelCopyTextureInfo<'_> {
        wgpu::TexelCopyTextureInfo {
            texture: self.texture.raw(),
            mip_level: self.mip_level,
            origin: self.origin,
            aspect: self.aspect,
        }
    }
}

/// Records copy commands and render passes into a [`CommandBuffer`].
///
/// Copy extents are derived from the participating resources, so callers only
/// name sources and destinations.
pub struct CommandEncoder {
    encoder: wgpu::CommandEncoder,
}

impl CommandEncoder {
    /// Copies the destination-sized region between two textures.
    pub fn copy_texture_to_texture(&mut self, src: &ImageCopyTexture, dst: &ImageCopyTexture) {
        self.encoder
            .copy_texture_to_texture(src.as_info(), dst.as_info(), dst.texture.size());
    }

    /// Fills the destination buffer from the source at offset zero.
    pub fn copy_buffer_to_buffer(&mut self, src: &Buffer, dst: &Buffer) {
        let len = buffer_copy_len(src.size(), dst.size());
        self.encoder
            .copy_buffer_to_buffer(src.raw(), 0, dst.raw(), 0, len);
    }

    /// Copies the source texture into a tightly packed buffer.
    ///
    /// Assumes four bytes per texel; `bytes_per_row` must still satisfy the
    /// 256 byte row alignment for the copy to validate.
    pub fn copy_texture_to_buffer(&mut self, src: &ImageCopyTexture, dst: &Buffer) {
        let size = src.texture.size();
        self.encoder.copy_texture_to_buffer(
            src.as_info(),
            wgpu::TexelCopyBufferInfo {
                buffer: dst.raw(),
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(size.width * 4),
                    rows_per_image: Some(size.height),
                },
            },
            size,
        );
    }

    /// Copies a tightly packed buffer into the destination texture.
    pub fn copy_buffer_to_texture(&mut self, src: &Buffer, dst: &ImageCopyTexture) {
        let size = dst.texture.size();
        self.encoder.copy_buffer_to_texture(
            wgpu::TexelCopyBufferInfo {
                buffer: src.raw(),
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(size.width * 4),
                    rows_per_image: Some(size.height),
                },
            },
            dst.as_info(),
            size,
        );
    }

    pub(crate) fn raw_mut(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    pub fn finish(self, label: impl Into<String>) -> CommandBuffer {
        CommandBuffer {
            label: label.into(),
            buffer: self.encoder.finish(),
        }
    }
}

/// Byte length of a whole-buffer copy.
///
/// The destination bounds the copy, like the texture copy operations. A
/// source shorter than the destination cannot satisfy the copy and surfaces
/// as a validation error at submit.
fn buffer_copy_len(src_size: u64, dst_size: u64) -> u64 {
    if src_size < dst_size {
        log::warn!("buffer copy needs {dst_size} bytes but the source holds {src_size}");
    }
    dst_size
}

/// Builder for [`CommandEncoder`]s.
pub struct CommandEncoderBuilder {
    label: String,
}

impl Default for CommandEncoderBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Command Encoder".to_string(),
        }
    }
}

impl CommandEncoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn build(self, ctx: &RenderContext) -> CommandEncoder {
        let encoder = ctx
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(&self.label),
            });
        CommandEncoder { encoder }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── copy sizing ───────────────────────────────────────────────────────

    #[test]
    fn buffer_copies_span_the_destination() {
        // A 64 byte source into a 32 byte destination copies 32 bytes.
        assert_eq!(buffer_copy_len(64, 32), 32);
        assert_eq!(buffer_copy_len(32, 32), 32);
    }

    #[test]
    fn short_source_still_reports_destination_length() {
        assert_eq!(buffer_copy_len(16, 32), 32);
    }
}
