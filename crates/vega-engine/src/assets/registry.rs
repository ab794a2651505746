use std::collections::HashMap;
use std::sync::Arc;

use super::{FileAsset, ModelAsset, TextureAsset};

/// In-memory cache of loaded assets, keyed by kind and caller-chosen name.
///
/// `load_*` goes through the cache: a hit returns the shared handle without
/// touching the filesystem, a miss loads from disk and retains the result.
/// Load failures are not cached, so a fixed file can be retried under the
/// same name. The same name may be used for a file, a texture, and a model
/// simultaneously; the kind disambiguates.
#[derive(Default)]
pub struct AssetRegistry {
    files: HashMap<String, Arc<FileAsset>>,
    textures: HashMap<String, Arc<TextureAsset>>,
    models: HashMap<String, Arc<ModelAsset>>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // ── files ─────────────────────────────────────────────────────────────

    pub fn load_file(&mut self, name: &str, path: &str) -> Option<Arc<FileAsset>> {
        if let Some(asset) = self.files.get(name) {
            return Some(asset.clone());
        }
        let asset = FileAsset::from_path(path)?;
        self.files.insert(name.to_string(), asset.clone());
        Some(asset)
    }

    /// Registers an asset built elsewhere, e.g. from in-memory content.
    pub fn insert_file(&mut self, name: impl Into<String>, asset: Arc<FileAsset>) {
        self.files.insert(name.into(), asset);
    }

    pub fn file(&self, name: &str) -> Option<Arc<FileAsset>> {
        self.files.get(name).cloned()
    }

    pub fn remove_file(&mut self, name: &str) -> Option<Arc<FileAsset>> {
        self.files.remove(name)
    }

    // ── textures ──────────────────────────────────────────────────────────

    pub fn load_texture(
        &mut self,
        name: &str,
        path: &str,
        flip_vertically: bool,
    ) -> Option<Arc<TextureAsset>> {
        if let Some(asset) = self.textures.get(name) {
            return Some(asset.clone());
        }
        let asset = TextureAsset::from_path(path, flip_vertically)?;
        self.textures.insert(name.to_string(), asset.clone());
        Some(asset)
    }

    pub fn insert_texture(&mut self, name: impl Into<String>, asset: Arc<TextureAsset>) {
        self.textures.insert(name.into(), asset);
    }

    pub fn texture(&self, name: &str) -> Option<Arc<TextureAsset>> {
        self.textures.get(name).cloned()
    }

    pub fn remove_texture(&mut self, name: &str) -> Option<Arc<TextureAsset>> {
        self.textures.remove(name)
    }

    // ── models ────────────────────────────────────────────────────────────

    pub fn load_model(&mut self, name: &str, path: &str) -> Option<Arc<ModelAsset>> {
        if let Some(asset) = self.models.get(name) {
            return Some(asset.clone());
        }
        let asset = ModelAsset::from_path(path)?;
        self.models.insert(name.to_string(), asset.clone());
        Some(asset)
    }

    pub fn insert_model(&mut self, name: impl Into<String>, asset: Arc<ModelAsset>) {
        self.models.insert(name.into(), asset);
    }

    pub fn model(&self, name: &str) -> Option<Arc<ModelAsset>> {
        self.models.get(name).cloned()
    }

    pub fn remove_model(&mut self, name: &str) -> Option<Arc<ModelAsset>> {
        self.models.remove(name)
    }

    // ── bookkeeping ───────────────────────────────────────────────────────

    /// Total number of cached assets across all kinds.
    pub fn len(&self) -> usize {
        self.files.len() + self.textures.len() + self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached handle; assets still referenced elsewhere survive
    /// through their remaining `Arc`s.
    pub fn clear(&mut self) {
        self.files.clear();
        self.textures.clear();
        self.models.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── cache behavior ────────────────────────────────────────────────────

    #[test]
    fn insert_then_lookup_round_trips() {
        let mut registry = AssetRegistry::new();
        registry.insert_file("main", FileAsset::from_content("main.wgsl", "fn main() {}"));

        let asset = registry.file("main").unwrap();
        assert_eq!(asset.content(), "fn main() {}");
        assert!(registry.file("other").is_none());
    }

    #[test]
    fn load_file_serves_repeat_requests_from_the_cache() {
        let dir = std::env::temp_dir().join("vega-registry-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cached.txt");
        std::fs::write(&path, "first").unwrap();
        let path = path.to_str().unwrap();

        let mut registry = AssetRegistry::new();
        let first = registry.load_file("cached", path).unwrap();

        // The file changes on disk; the cached handle must win.
        std::fs::write(path, "second").unwrap();
        let second = registry.load_file("cached", path).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.content(), "first");
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut registry = AssetRegistry::new();
        assert!(registry.load_file("missing", "no/such/file.txt").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn kinds_share_a_name_without_colliding() {
        let mut registry = AssetRegistry::new();
        registry.insert_file("tri", FileAsset::from_content("tri.wgsl", ""));
        assert!(registry.file("tri").is_some());
        assert!(registry.texture("tri").is_none());
        assert!(registry.model("tri").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_and_clear_release_handles() {
        let mut registry = AssetRegistry::new();
        registry.insert_file("a", FileAsset::from_content("a.txt", "a"));
        registry.insert_file("b", FileAsset::from_content("b.txt", "b"));

        assert!(registry.remove_file("a").is_some());
        assert_eq!(registry.len(), 1);

        registry.clear();
        assert!(registry.is_empty());
    }
}
