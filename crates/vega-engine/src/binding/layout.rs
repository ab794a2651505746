use std::sync::Arc;

use anyhow::{Result, bail};

use crate::context::RenderContext;

use super::entries::{BufferEntry, SamplerEntry, StorageTextureEntry, TextureEntry};
use super::BindingKind;

/// One declared binding slot, kept for bind group validation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeclaredBinding {
    pub binding: u32,
    pub kind: BindingKind,
}

/// Immutable shape contract for bind groups.
///
/// Retains its declared slots so that [`BindGroupBuilder`] can validate
/// concrete bindings before touching the device.
///
/// [`BindGroupBuilder`]: super::BindGroupBuilder
pub struct BindGroupLayout {
    label: String,
    layout: wgpu::BindGroupLayout,
    declared: Vec<DeclaredBinding>,
}

impl BindGroupLayout {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub(crate) fn declared(&self) -> &[DeclaredBinding] {
        &self.declared
    }
}

/// Builder accumulating binding slots for a [`BindGroupLayout`].
///
/// Binding indices are caller-supplied, need not be contiguous, and must be
/// unique; a duplicate index is a construction-time error.
pub struct BindGroupLayoutBuilder {
    label: String,
    entries: Vec<wgpu::BindGroupLayoutEntry>,
    declared: Vec<DeclaredBinding>,
}

impl Default for BindGroupLayoutBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Bind Group Layout".to_string(),
            entries: Vec::new(),
            declared: Vec::new(),
        }
    }
}

impl BindGroupLayoutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    fn push(mut self, binding: u32, kind: BindingKind, entry: wgpu::BindGroupLayoutEntry) -> Self {
        self.entries.push(entry);
        self.declared.push(DeclaredBinding { binding, kind });
        self
    }

    pub fn add_uniform_buffer(self, binding: u32, entry: BufferEntry) -> Self {
        let layout_entry = entry.uniform_layout_entry(binding);
        self.push(binding, BindingKind::UniformBuffer, layout_entry)
    }

    pub fn add_storage_buffer(self, binding: u32, entry: BufferEntry) -> Self {
        let layout_entry = entry.storage_layout_entry(binding);
        self.push(binding, BindingKind::StorageBuffer, layout_entry)
    }

    pub fn add_sampler(self, binding: u32, entry: SamplerEntry) -> Self {
        let layout_entry = entry.layout_entry(binding);
        self.push(binding, BindingKind::Sampler, layout_entry)
    }

    pub fn add_texture_2d(self, binding: u32, entry: TextureEntry) -> Self {
        let layout_entry = entry.layout_entry(binding, wgpu::TextureViewDimension::D2);
        self.push(binding, BindingKind::Texture, layout_entry)
    }

    pub fn add_texture_3d(self, binding: u32, entry: TextureEntry) -> Self {
        let layout_entry = entry.layout_entry(binding, wgpu::TextureViewDimension::D3);
        self.push(binding, BindingKind::Texture, layout_entry)
    }

    pub fn add_storage_texture_2d(self, binding: u32, entry: StorageTextureEntry) -> Self {
        let layout_entry = entry.layout_entry(binding, wgpu::TextureViewDimension::D2);
        self.push(binding, BindingKind::StorageTexture, layout_entry)
    }

    pub fn add_storage_texture_3d(self, binding: u32, entry: StorageTextureEntry) -> Self {
        let layout_entry = entry.layout_entry(binding, wgpu::TextureViewDimension::D3);
        self.push(binding, BindingKind::StorageTexture, layout_entry)
    }

    pub fn build(self, ctx: &RenderContext) -> Result<Arc<BindGroupLayout>> {
        if let Some(binding) = duplicate_binding(&self.declared) {
            bail!(
                "bind group layout '{}': binding index {binding} declared more than once",
                self.label
            );
        }

        let layout = ctx
            .device()
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&self.label),
                entries: &self.entries,
            });

        Ok(Arc::new(BindGroupLayout {
            label: self.label,
            layout,
            declared: self.declared,
        }))
    }
}

/// Returns the first binding index declared twice, if any.
fn duplicate_binding(declared: &[DeclaredBinding]) -> Option<u32> {
    for (i, entry) in declared.iter().enumerate() {
        if declared[..i].iter().any(|d| d.binding == entry.binding) {
            return Some(entry.binding);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared(bindings: &[u32]) -> Vec<DeclaredBinding> {
        bindings
            .iter()
            .map(|&binding| DeclaredBinding {
                binding,
                kind: BindingKind::UniformBuffer,
            })
            .collect()
    }

    // ── duplicate detection ───────────────────────────────────────────────

    #[test]
    fn unique_bindings_pass() {
        assert_eq!(duplicate_binding(&declared(&[0, 1, 2])), None);
    }

    #[test]
    fn gaps_are_allowed() {
        assert_eq!(duplicate_binding(&declared(&[0, 2, 7])), None);
    }

    #[test]
    fn first_duplicate_is_reported() {
        assert_eq!(duplicate_binding(&declared(&[0, 1, 1, 0])), Some(1));
    }
}
