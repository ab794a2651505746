use std::ops::Deref;
use std::sync::Arc;

use wgpu::util::DeviceExt;

use crate::context::RenderContext;

/// Managed wrapper around one GPU buffer.
///
/// Writes are queued through the context's queue and are ordered relative to
/// other queue operations. A write that does not fit the allocation is logged
/// and dropped rather than surfaced as an error; the buffer is unchanged.
pub struct Buffer {
    label: String,
    buffer: wgpu::Buffer,
    size: u64,
    usage: wgpu::BufferUsages,
}

impl Buffer {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn usage(&self) -> wgpu::BufferUsages {
        self.usage
    }

    pub fn raw(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Writes `data` at the start of the buffer.
    pub fn write(&self, ctx: &RenderContext, data: &[u8]) {
        self.write_with_offset(ctx, 0, data);
    }

    /// Writes `data` at a byte offset.
    pub fn write_with_offset(&self, ctx: &RenderContext, offset: u64, data: &[u8]) {
        if let Err(reason) = validate_write(self.size, offset, data.len() as u64) {
            log::error!("buffer '{}': rejected write: {reason}", self.label);
            return;
        }

        ctx.queue().write_buffer(&self.buffer, offset, data);
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        log::trace!("releasing buffer '{}'", self.label);
    }
}

/// Checks that a write of `len` bytes at `offset` fits a buffer of
/// `capacity` bytes.
fn validate_write(capacity: u64, offset: u64, len: u64) -> Result<(), String> {
    if len == 0 {
        return Err("empty payload".to_string());
    }

    let end = offset.checked_add(len);
    match end {
        Some(end) if end <= capacity => Ok(()),
        _ => Err(format!(
            "wrong data size: capacity is {capacity} bytes, write wants {len} bytes at offset {offset}"
        )),
    }
}

/// Builder for untyped [`Buffer`]s.
///
/// Terminal operations: [`empty`](Self::empty) allocates zeroed storage,
/// [`build`](Self::build) allocates and uploads in one step via a buffer
/// mapped at creation.
#[derive(Debug, Clone)]
pub struct BufferBuilder {
    label: String,
    usage: wgpu::BufferUsages,
}

impl Default for BufferBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Buffer".to_string(),
            usage: wgpu::BufferUsages::empty(),
        }
    }
}

impl BufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.usage = usage;
        self
    }

    pub fn add_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.usage |= usage;
        self
    }

    pub fn empty(self, size: u64, ctx: &RenderContext) -> Arc<Buffer> {
        let buffer = ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some(&self.label),
            size,
            usage: self.usage,
            mapped_at_creation: false,
        });

        Arc::new(Buffer {
            label: self.label,
            buffer,
            size,
            usage: self.usage,
        })
    }

    pub fn build(self, data: &[u8], ctx: &RenderContext) -> Arc<Buffer> {
        let buffer = ctx
            .device()
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&self.label),
                contents: data,
                usage: self.usage,
            });

        Arc::new(Buffer {
            label: self.label,
            buffer,
            size: data.len() as u64,
            usage: self.usage,
        })
    }
}

// ── vertex buffers ──────────────────────────────────────────────────────────

/// A [`Buffer`] carrying vertex data plus the element count and stride that
/// draw calls need.
pub struct VertexBuffer {
    buffer: Arc<Buffer>,
    count: u32,
    stride: u64,
}

impl VertexBuffer {
    /// Number of vertices stored.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Size of one vertex in bytes.
    pub fn stride(&self) -> u64 {
        self.stride
    }
}

impl Deref for VertexBuffer {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buffer
    }
}

/// Builder forcing `VERTEX | COPY_DST` usage.
#[derive(Debug, Clone)]
pub struct VertexBufferBuilder {
    inner: BufferBuilder,
}

impl Default for VertexBufferBuilder {
    fn default() -> Self {
        Self {
            inner: BufferBuilder::new().with_label("Vega Vertex Buffer"),
        }
    }
}

impl VertexBufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.inner = self.inner.with_label(label);
        self
    }

    pub fn add_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.inner = self.inner.add_usage(usage);
        self
    }

    fn forced(self) -> BufferBuilder {
        self.inner
            .add_usage(wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST)
    }

    /// Allocates room for `count` vertices of `stride` bytes each.
    pub fn empty(self, count: u32, stride: u64, ctx: &RenderContext) -> Arc<VertexBuffer> {
        let buffer = self.forced().empty(count as u64 * stride, ctx);
        Arc::new(VertexBuffer {
            buffer,
            count,
            stride,
        })
    }

    /// Allocates and uploads `vertices`; count and stride are derived from
    /// the element type.
    pub fn build<T: bytemuck::NoUninit>(self, vertices: &[T], ctx: &RenderContext) -> Arc<VertexBuffer> {
        let buffer = self.forced().build(bytemuck::cast_slice(vertices), ctx);
        Arc::new(VertexBuffer {
            buffer,
            count: vertices.len() as u32,
            stride: size_of::<T>() as u64,
        })
    }
}

// ── index buffers ───────────────────────────────────────────────────────────

/// A [`Buffer`] carrying index data plus its element count and format.
pub struct IndexBuffer {
    buffer: Arc<Buffer>,
    count: u32,
    format: wgpu::IndexFormat,
}

impl IndexBuffer {
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn format(&self) -> wgpu::IndexFormat {
        self.format
    }
}

impl Deref for IndexBuffer {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buffer
    }
}

/// Builder forcing `INDEX | COPY_DST` usage.
#[derive(Debug, Clone)]
pub struct IndexBufferBuilder {
    inner: BufferBuilder,
}

impl Default for IndexBufferBuilder {
    fn default() -> Self {
        Self {
            inner: BufferBuilder::new().with_label("Vega Index Buffer"),
        }
    }
}

impl IndexBufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.inner = self.inner.with_label(label);
        self
    }

    pub fn add_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.inner = self.inner.add_usage(usage);
        self
    }

    fn forced(self) -> BufferBuilder {
        self.inner
            .add_usage(wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST)
    }

    pub fn empty_u16(self, count: u32, ctx: &RenderContext) -> Arc<IndexBuffer> {
        let buffer = self.forced().empty(count as u64 * 2, ctx);
        Arc::new(IndexBuffer {
            buffer,
            count,
            format: wgpu::IndexFormat::Uint16,
        })
    }

    pub fn empty_u32(self, count: u32, ctx: &RenderContext) -> Arc<IndexBuffer> {
        let buffer = self.forced().empty(count as u64 * 4, ctx);
        Arc::new(IndexBuffer {
            buffer,
            count,
            format: wgpu::IndexFormat::Uint32,
        })
    }

    pub fn build_u16(self, indices: &[u16], ctx: &RenderContext) -> Arc<IndexBuffer> {
        let buffer = self.forced().build(bytemuck::cast_slice(indices), ctx);
        Arc::new(IndexBuffer {
            buffer,
            count: indices.len() as u32,
            format: wgpu::IndexFormat::Uint16,
        })
    }

    pub fn build_u32(self, indices: &[u32], ctx: &RenderContext) -> Arc<IndexBuffer> {
        let buffer = self.forced().build(bytemuck::cast_slice(indices), ctx);
        Arc::new(IndexBuffer {
            buffer,
            count: indices.len() as u32,
            format: wgpu::IndexFormat::Uint32,
        })
    }
}

// ── uniform buffers ─────────────────────────────────────────────────────────

/// A [`Buffer`] bindable as a shader uniform.
pub struct UniformBuffer {
    buffer: Arc<Buffer>,
}

impl Deref for UniformBuffer {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buffer
    }
}

/// Builder forcing `UNIFORM | COPY_DST` usage.
#[derive(Debug, Clone)]
pub struct UniformBufferBuilder {
    inner: BufferBuilder,
}

impl Default for UniformBufferBuilder {
    fn default() -> Self {
        Self {
            inner: BufferBuilder::new().with_label("Vega Uniform Buffer"),
        }
    }
}

impl UniformBufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.inner = self.inner.with_label(label);
        self
    }

    pub fn add_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.inner = self.inner.add_usage(usage);
        self
    }

    fn forced(self) -> BufferBuilder {
        self.inner
            .add_usage(wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST)
    }

    pub fn empty(self, size: u64, ctx: &RenderContext) -> Arc<UniformBuffer> {
        Arc::new(UniformBuffer {
            buffer: self.forced().empty(size, ctx),
        })
    }

    pub fn build(self, data: &[u8], ctx: &RenderContext) -> Arc<UniformBuffer> {
        Arc::new(UniformBuffer {
            buffer: self.forced().build(data, ctx),
        })
    }

    /// Uploads a single POD value.
    pub fn build_value<T: bytemuck::NoUninit>(self, value: &T, ctx: &RenderContext) -> Arc<UniformBuffer> {
        Arc::new(UniformBuffer {
            buffer: self.forced().build(bytemuck::bytes_of(value), ctx),
        })
    }
}

// ── storage buffers ─────────────────────────────────────────────────────────

/// A [`Buffer`] bindable as shader storage.
pub struct StorageBuffer {
    buffer: Arc<Buffer>,
}

impl Deref for StorageBuffer {
    type Target = Buffer;

    fn deref(&self) -> &Buffer {
        &self.buffer
    }
}

/// Builder forcing `STORAGE | COPY_DST` usage.
#[derive(Debug, Clone)]
pub struct StorageBufferBuilder {
    inner: BufferBuilder,
}

impl Default for StorageBufferBuilder {
    fn default() -> Self {
        Self {
            inner: BufferBuilder::new().with_label("Vega Storage Buffer"),
        }
    }
}

impl StorageBufferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.inner = self.inner.with_label(label);
        self
    }

    pub fn add_usage(mut self, usage: wgpu::BufferUsages) -> Self {
        self.inner = self.inner.add_usage(usage);
        self
    }

    fn forced(self) -> BufferBuilder {
        self.inner
            .add_usage(wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST)
    }

    pub fn empty(self, size: u64, ctx: &RenderContext) -> Arc<StorageBuffer> {
        Arc::new(StorageBuffer {
            buffer: self.forced().empty(size, ctx),
        })
    }

    pub fn build(self, data: &[u8], ctx: &RenderContext) -> Arc<StorageBuffer> {
        Arc::new(StorageBuffer {
            buffer: self.forced().build(data, ctx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── write validation ──────────────────────────────────────────────────

    #[test]
    fn exact_fit_write_is_accepted() {
        assert!(validate_write(32, 0, 32).is_ok());
    }

    #[test]
    fn oversized_write_is_rejected() {
        let err = validate_write(32, 0, 64).unwrap_err();
        assert!(err.contains("wrong data size"));
    }

    #[test]
    fn offset_write_must_fit_the_tail() {
        assert!(validate_write(32, 16, 16).is_ok());
        assert!(validate_write(32, 24, 16).is_err());
    }

    #[test]
    fn empty_payload_is_rejected() {
        assert!(validate_write(32, 0, 0).is_err());
    }

    #[test]
    fn offset_overflow_is_rejected() {
        assert!(validate_write(32, u64::MAX, 8).is_err());
    }

    // ── usage forcing ─────────────────────────────────────────────────────

    #[test]
    fn specializations_force_their_usage_bits() {
        let vertex = VertexBufferBuilder::new().forced();
        assert!(vertex.usage.contains(wgpu::BufferUsages::VERTEX));
        assert!(vertex.usage.contains(wgpu::BufferUsages::COPY_DST));

        let index = IndexBufferBuilder::new().forced();
        assert!(index.usage.contains(wgpu::BufferUsages::INDEX));

        let uniform = UniformBufferBuilder::new().forced();
        assert!(uniform.usage.contains(wgpu::BufferUsages::UNIFORM));

        let storage = StorageBufferBuilder::new().forced();
        assert!(storage.usage.contains(wgpu::BufferUsages::STORAGE));
    }

    #[test]
    fn caller_supplied_usage_is_preserved() {
        let builder = VertexBufferBuilder::new()
            .add_usage(wgpu::BufferUsages::COPY_SRC)
            .forced();
        assert!(builder.usage.contains(wgpu::BufferUsages::COPY_SRC));
        assert!(builder.usage.contains(wgpu::BufferUsages::VERTEX));
    }
}
