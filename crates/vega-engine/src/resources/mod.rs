mod buffer;
mod sampler;
mod shader;
mod texture;

pub use buffer::{
    Buffer, BufferBuilder, IndexBuffer, IndexBufferBuilder, StorageBuffer, StorageBufferBuilder,
    UniformBuffer, UniformBufferBuilder, VertexBuffer, VertexBufferBuilder,
};
pub use sampler::{Sampler, SamplerBuilder};
pub use shader::{Shader, ShaderBuilder, ShaderStage};
pub use texture::{Framebuffer, Texture, TextureBuilder};
