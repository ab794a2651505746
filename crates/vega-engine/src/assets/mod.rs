mod file;
mod model;
mod registry;
mod texture;

pub use file::FileAsset;
pub use model::{MeshData, ModelAsset};
pub use registry::AssetRegistry;
pub use texture::TextureAsset;
