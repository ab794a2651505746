mod entries;
mod group;
mod layout;
mod pipeline_layout;

pub use entries::{BufferEntry, SamplerEntry, StorageTextureEntry, TextureEntry};
pub use group::{BindGroup, BindGroupBuilder};
pub use layout::{BindGroupLayout, BindGroupLayoutBuilder};
pub use pipeline_layout::{PipelineLayout, PipelineLayoutBuilder};

/// Kind of resource a binding slot accepts.
///
/// A bind group is validated against its layout on this level: every bound
/// index must be declared with the same kind, and every declared slot must
/// be bound.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BindingKind {
    UniformBuffer,
    StorageBuffer,
    Sampler,
    Texture,
    StorageTexture,
}
