use std::sync::Arc;

use anyhow::{Result, bail};

use crate::context::RenderContext;
use crate::resources::{Sampler, StorageBuffer, Texture, UniformBuffer};

use super::layout::{BindGroupLayout, DeclaredBinding};
use super::BindingKind;

/// A resource bound into a bind group.
///
/// The bind group holds one of these per slot, which is what keeps the
/// underlying buffers, samplers, and textures alive for its lifetime.
enum BoundResource {
    UniformBuffer(Arc<UniformBuffer>),
    StorageBuffer(Arc<StorageBuffer>),
    Sampler(Arc<Sampler>),
    Texture(Arc<Texture>),
    StorageTexture(Arc<Texture>),
}

impl BoundResource {
    fn kind(&self) -> BindingKind {
        match self {
            BoundResource::UniformBuffer(_) => BindingKind::UniformBuffer,
            BoundResource::StorageBuffer(_) => BindingKind::StorageBuffer,
            BoundResource::Sampler(_) => BindingKind::Sampler,
            BoundResource::Texture(_) => BindingKind::Texture,
            BoundResource::StorageTexture(_) => BindingKind::StorageTexture,
        }
    }

    fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        match self {
            BoundResource::UniformBuffer(buffer) => {
                buffer.raw().as_entire_binding()
            }
            BoundResource::StorageBuffer(buffer) => {
                buffer.raw().as_entire_binding()
            }
            BoundResource::Sampler(sampler) => wgpu::BindingResource::Sampler(sampler.raw()),
            BoundResource::Texture(texture) | BoundResource::StorageTexture(texture) => {
                wgpu::BindingResource::TextureView(texture.view())
            }
        }
    }
}

/// Concrete binding of resources to one layout's slots.
///
/// Shares ownership of every bound resource; dropping the bind group is what
/// finally lets those resources be released.
pub struct BindGroup {
    label: String,
    group: wgpu::BindGroup,
    layout: Arc<BindGroupLayout>,
    resources: Vec<BoundResource>,
}

impl BindGroup {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn raw(&self) -> &wgpu::BindGroup {
        &self.group
    }

    pub fn layout(&self) -> &Arc<BindGroupLayout> {
        &self.layout
    }

    /// Number of resources retained by this group.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

impl Drop for BindGroup {
    fn drop(&mut self) {
        log::trace!("releasing bind group '{}'", self.label);
    }
}

/// Builder accumulating resource-to-index associations for a [`BindGroup`].
///
/// `build` validates the accumulated bindings against the target layout:
/// every index must be declared with a matching kind, no index may be bound
/// twice, and no declared slot may be left unbound.
pub struct BindGroupBuilder {
    label: String,
    bindings: Vec<(u32, BoundResource)>,
}

impl Default for BindGroupBuilder {
    fn default() -> Self {
        Self {
            label: "Vega Bind Group".to_string(),
            bindings: Vec::new(),
        }
    }
}

impl BindGroupBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn add_uniform_buffer(mut self, binding: u32, buffer: Arc<UniformBuffer>) -> Self {
        self.bindings.push((binding, BoundResource::UniformBuffer(buffer)));
        self
    }

    pub fn add_storage_buffer(mut self, binding: u32, buffer: Arc<StorageBuffer>) -> Self {
        self.bindings.push((binding, BoundResource::StorageBuffer(buffer)));
        self
    }

    pub fn add_sampler(mut self, binding: u32, sampler: Arc<Sampler>) -> Self {
        self.bindings.push((binding, BoundResource::Sampler(sampler)));
        self
    }

    pub fn add_texture(mut self, binding: u32, texture: Arc<Texture>) -> Self {
        self.bindings.push((binding, BoundResource::Texture(texture)));
        self
    }

    pub fn add_storage_texture(mut self, binding: u32, texture: Arc<Texture>) -> Self {
        self.bindings.push((binding, BoundResource::StorageTexture(texture)));
        self
    }

    pub fn build(self, layout: &Arc<BindGroupLayout>, ctx: &RenderContext) -> Result<Arc<BindGroup>> {
        let bound: Vec<(u32, BindingKind)> = self
            .bindings
            .iter()
            .map(|(binding, resource)| (*binding, resource.kind()))
            .collect();

        if let Err(reason) = validate_bindings(layout.declared(), &bound) {
            bail!(
                "bind group '{}' does not match layout '{}': {reason}",
                self.label,
                layout.label()
            );
        }

        let entries: Vec<wgpu::BindGroupEntry> = self
            .bindings
            .iter()
            .map(|(binding, resource)| wgpu::BindGroupEntry {
                binding: *binding,
                resource: resource.binding_resource(),
            })
            .collect();

        let group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&self.label),
            layout: layout.raw(),
            entries: &entries,
        });

        drop(entries);

        Ok(Arc::new(BindGroup {
            label: self.label,
            group,
            layout: layout.clone(),
            resources: self.bindings.into_iter().map(|(_, r)| r).collect(),
        }))
    }
}

/// Structural check of concrete bindings against a layout's declared slots.
fn validate_bindings(
    declared: &[DeclaredBinding],
    bound: &[(u32, BindingKind)],
) -> Result<(), String> {
    for (i, (binding, kind)) in bound.iter().enumerate() {
        if bound[..i].iter().any(|(b, _)| b == binding) {
            return Err(format!("binding index {binding} bound more than once"));
        }

        match declared.iter().find(|d| d.binding == *binding) {
            None => {
                return Err(format!("binding index {binding} is not declared in the layout"));
            }
            Some(slot) if slot.kind != *kind => {
                return Err(format!(
                    "binding index {binding} expects {:?}, got {:?}",
                    slot.kind, kind
                ));
            }
            Some(_) => {}
        }
    }

    for slot in declared {
        if !bound.iter().any(|(b, _)| *b == slot.binding) {
            return Err(format!("declared binding index {} is unbound", slot.binding));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(binding: u32, kind: BindingKind) -> DeclaredBinding {
        DeclaredBinding { binding, kind }
    }

    // ── matching layouts ──────────────────────────────────────────────────

    #[test]
    fn matching_bindings_pass() {
        let declared = [
            slot(0, BindingKind::UniformBuffer),
            slot(1, BindingKind::Sampler),
            slot(2, BindingKind::Texture),
        ];
        let bound = [
            (0, BindingKind::UniformBuffer),
            (1, BindingKind::Sampler),
            (2, BindingKind::Texture),
        ];
        assert!(validate_bindings(&declared, &bound).is_ok());
    }

    #[test]
    fn bind_order_does_not_matter() {
        let declared = [
            slot(0, BindingKind::UniformBuffer),
            slot(1, BindingKind::Sampler),
        ];
        let bound = [
            (1, BindingKind::Sampler),
            (0, BindingKind::UniformBuffer),
        ];
        assert!(validate_bindings(&declared, &bound).is_ok());
    }

    // ── rejections ────────────────────────────────────────────────────────

    #[test]
    fn undeclared_index_is_rejected() {
        let declared = [slot(0, BindingKind::UniformBuffer)];
        let bound = [
            (0, BindingKind::UniformBuffer),
            (5, BindingKind::Texture),
        ];
        let err = validate_bindings(&declared, &bound).unwrap_err();
        assert!(err.contains("not declared"));
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let declared = [slot(0, BindingKind::Sampler)];
        let bound = [(0, BindingKind::Texture)];
        let err = validate_bindings(&declared, &bound).unwrap_err();
        assert!(err.contains("expects"));
    }

    #[test]
    fn double_bound_index_is_rejected() {
        let declared = [slot(0, BindingKind::UniformBuffer)];
        let bound = [
            (0, BindingKind::UniformBuffer),
            (0, BindingKind::UniformBuffer),
        ];
        let err = validate_bindings(&declared, &bound).unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn unbound_declared_slot_is_rejected() {
        let declared = [
            slot(0, BindingKind::UniformBuffer),
            slot(1, BindingKind::Sampler),
        ];
        let bound = [(0, BindingKind::UniformBuffer)];
        let err = validate_bindings(&declared, &bound).unwrap_err();
        assert!(err.contains("unbound"));
    }
}
