//! Binding entry descriptors.
//!
//! Pure value objects describing shader visibility and binding semantics.
//! They never own GPU resources; a layout builder consumes them into
//! `wgpu::BindGroupLayoutEntry` values.

/// Describes a buffer binding slot.
#[derive(Debug, Clone, Copy)]
pub struct BufferEntry {
    visibility: wgpu::ShaderStages,
    has_dynamic_offset: bool,
    read_only: bool,
}

impl Default for BufferEntry {
    fn default() -> Self {
        Self {
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            has_dynamic_offset: false,
            read_only: true,
        }
    }
}

impl BufferEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(mut self, visibility: wgpu::ShaderStages) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_dynamic_offset(mut self, dynamic: bool) -> Self {
        self.has_dynamic_offset = dynamic;
        self
    }

    /// Only meaningful for storage buffers; uniform buffers are always
    /// read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    pub(crate) fn uniform_layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: self.has_dynamic_offset,
                min_binding_size: None,
            },
            count: None,
        }
    }

    pub(crate) fn storage_layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage {
                    read_only: self.read_only,
                },
                has_dynamic_offset: self.has_dynamic_offset,
                min_binding_size: None,
            },
            count: None,
        }
    }
}

/// Describes a sampler binding slot.
#[derive(Debug, Clone, Copy)]
pub struct SamplerEntry {
    visibility: wgpu::ShaderStages,
    binding_type: wgpu::SamplerBindingType,
}

impl Default for SamplerEntry {
    fn default() -> Self {
        Self {
            visibility: wgpu::ShaderStages::FRAGMENT,
            binding_type: wgpu::SamplerBindingType::Filtering,
        }
    }
}

impl SamplerEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(mut self, visibility: wgpu::ShaderStages) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_binding_type(mut self, binding_type: wgpu::SamplerBindingType) -> Self {
        self.binding_type = binding_type;
        self
    }

    pub(crate) fn layout_entry(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Sampler(self.binding_type),
            count: None,
        }
    }
}

/// Describes a sampled texture binding slot.
#[derive(Debug, Clone, Copy)]
pub struct TextureEntry {
    visibility: wgpu::ShaderStages,
    sample_type: wgpu::TextureSampleType,
    multisampled: bool,
}

impl Default for TextureEntry {
    fn default() -> Self {
        Self {
            visibility: wgpu::ShaderStages::FRAGMENT,
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            multisampled: false,
        }
    }
}

impl TextureEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(mut self, visibility: wgpu::ShaderStages) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_sample_type(mut self, sample_type: wgpu::TextureSampleType) -> Self {
        self.sample_type = sample_type;
        self
    }

    pub fn with_multisampled(mut self, multisampled: bool) -> Self {
        self.multisampled = multisampled;
        self
    }

    pub(crate) fn layout_entry(
        &self,
        binding: u32,
        dimension: wgpu::TextureViewDimension,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::Texture {
                sample_type: self.sample_type,
                view_dimension: dimension,
                multisampled: self.multisampled,
            },
            count: None,
        }
    }
}

/// Describes a storage texture binding slot.
#[derive(Debug, Clone, Copy)]
pub struct StorageTextureEntry {
    visibility: wgpu::ShaderStages,
    access: wgpu::StorageTextureAccess,
    format: wgpu::TextureFormat,
}

impl Default for StorageTextureEntry {
    fn default() -> Self {
        Self {
            visibility: wgpu::ShaderStages::COMPUTE,
            access: wgpu::StorageTextureAccess::WriteOnly,
            format: wgpu::TextureFormat::Rgba8Unorm,
        }
    }
}

impl StorageTextureEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_visibility(mut self, visibility: wgpu::ShaderStages) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_access(mut self, access: wgpu::StorageTextureAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.format = format;
        self
    }

    pub(crate) fn layout_entry(
        &self,
        binding: u32,
        dimension: wgpu::TextureViewDimension,
    ) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility: self.visibility,
            ty: wgpu::BindingType::StorageTexture {
                access: self.access,
                format: self.format,
                view_dimension: dimension,
            },
            count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── buffer entries ────────────────────────────────────────────────────

    #[test]
    fn uniform_entry_shape() {
        let entry = BufferEntry::new()
            .with_visibility(wgpu::ShaderStages::VERTEX)
            .uniform_layout_entry(3);

        assert_eq!(entry.binding, 3);
        assert_eq!(entry.visibility, wgpu::ShaderStages::VERTEX);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                ..
            }
        ));
    }

    #[test]
    fn storage_entry_carries_read_only_flag() {
        let entry = BufferEntry::new()
            .with_read_only(false)
            .storage_layout_entry(0);

        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                ..
            }
        ));
    }

    // ── texture entries ───────────────────────────────────────────────────

    #[test]
    fn texture_entry_carries_dimension() {
        let entry = TextureEntry::new().layout_entry(1, wgpu::TextureViewDimension::D3);
        assert!(matches!(
            entry.ty,
            wgpu::BindingType::Texture {
                view_dimension: wgpu::TextureViewDimension::D3,
                ..
            }
        ));
    }

    #[test]
    fn storage_texture_entry_shape() {
        let entry = StorageTextureEntry::new()
            .with_access(wgpu::StorageTextureAccess::ReadWrite)
            .layout_entry(2, wgpu::TextureViewDimension::D2);

        assert!(matches!(
            entry.ty,
            wgpu::BindingType::StorageTexture {
                access: wgpu::StorageTextureAccess::ReadWrite,
                view_dimension: wgpu::TextureViewDimension::D2,
                ..
            }
        ));
    }
}
