use std::sync::Arc;

use super::file::decompose_path;

/// Triangle geometry of one mesh primitive, flattened to the attributes the
/// renderer consumes.
///
/// Normals and texture coordinates are optional in the source and empty when
/// absent; indices are synthesized sequentially for non-indexed primitives so
/// every mesh draws the same way.
#[derive(Debug, Clone)]
pub struct MeshData {
    name: String,
    positions: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MeshData {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub fn uvs(&self) -> &[[f32; 2]] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// A 3D model decoded from glTF (`.gltf`/`.glb`), with its path decomposed
/// like the other asset types.
#[derive(Debug, Clone)]
pub struct ModelAsset {
    path: String,
    name: String,
    directory: String,
    extension: String,
    meshes: Vec<MeshData>,
}

impl ModelAsset {
    /// Loads and decodes a model from disk.
    ///
    /// Returns `None` with an error log on I/O or decode failure.
    pub fn from_path(path: &str) -> Option<Arc<Self>> {
        let (document, buffers, _images) = match gltf::import(path) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::error!("failed to load model asset '{path}': {err}");
                return None;
            }
        };

        Self::from_document(path, &document, &buffers)
    }

    /// Decodes a model from bytes already in memory (GLB or embedded glTF).
    /// `path` is used for labeling only.
    pub fn from_data(path: &str, data: &[u8]) -> Option<Arc<Self>> {
        let (document, buffers, _images) = match gltf::import_slice(data) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::error!("failed to decode model asset '{path}': {err}");
                return None;
            }
        };

        Self::from_document(path, &document, &buffers)
    }

    fn from_document(
        path: &str,
        document: &gltf::Document,
        buffers: &[gltf::buffer::Data],
    ) -> Option<Arc<Self>> {
        let mut meshes = Vec::new();

        for (mesh_index, mesh) in document.meshes().enumerate() {
            let mesh_name = mesh
                .name()
                .map(str::to_string)
                .unwrap_or_else(|| format!("mesh{mesh_index}"));

            for primitive in mesh.primitives() {
                if primitive.mode() != gltf::mesh::Mode::Triangles {
                    log::warn!(
                        "model '{path}': skipping non-triangle primitive in '{mesh_name}'"
                    );
                    continue;
                }

                let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

                let Some(positions) = reader.read_positions().map(|iter| iter.collect::<Vec<_>>())
                else {
                    log::warn!("model '{path}': primitive in '{mesh_name}' has no positions");
                    continue;
                };

                let normals = reader
                    .read_normals()
                    .map(|iter| iter.collect())
                    .unwrap_or_default();
                let uvs = reader
                    .read_tex_coords(0)
                    .map(|coords| coords.into_f32().collect())
                    .unwrap_or_default();
                let indices = reader
                    .read_indices()
                    .map(|indices| indices.into_u32().collect())
                    .unwrap_or_else(|| (0..positions.len() as u32).collect());

                meshes.push(MeshData {
                    name: mesh_name.clone(),
                    positions,
                    normals,
                    uvs,
                    indices,
                });
            }
        }

        if meshes.is_empty() {
            log::error!("model asset '{path}' contains no triangle geometry");
            return None;
        }

        log::debug!("loaded model asset '{path}' ({} meshes)", meshes.len());

        let (name, directory, extension) = decompose_path(path);
        Some(Arc::new(Self {
            path: path.to_string(),
            name,
            directory,
            extension,
            meshes,
        }))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── helpers ───────────────────────────────────────────────────────────

    /// One indexed triangle, assembled as a binary glTF container.
    fn tiny_glb() -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices: [u16; 3] = [0, 1, 2];

        let mut bin = Vec::new();
        for value in positions {
            bin.extend_from_slice(&value.to_le_bytes());
        }
        for index in indices {
            bin.extend_from_slice(&index.to_le_bytes());
        }
        while bin.len() % 4 != 0 {
            bin.push(0);
        }

        let mut json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"#,
                r#""buffers":[{{"byteLength":{}}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36}},"#,
                r#"{{"buffer":0,"byteOffset":36,"byteLength":6}}],"#,
                r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"#,
                r#""type":"VEC3","min":[0,0,0],"max":[1,1,0]}},"#,
                r#"{{"bufferView":1,"componentType":5123,"count":3,"type":"SCALAR"}}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}},"indices":1}}]}}],"#,
                r#""nodes":[{{"mesh":0}}],"scenes":[{{"nodes":[0]}}],"scene":0}}"#,
            ),
            bin.len()
        )
        .into_bytes();
        while json.len() % 4 != 0 {
            json.push(b' ');
        }

        let total = 12 + 8 + json.len() + 8 + bin.len();
        let mut glb = Vec::with_capacity(total);
        glb.extend_from_slice(b"glTF");
        glb.extend_from_slice(&2u32.to_le_bytes());
        glb.extend_from_slice(&(total as u32).to_le_bytes());
        glb.extend_from_slice(&(json.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"JSON");
        glb.extend_from_slice(&json);
        glb.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        glb.extend_from_slice(b"BIN\0");
        glb.extend_from_slice(&bin);
        glb
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn decodes_an_indexed_triangle() {
        let model = ModelAsset::from_data("memory/triangle.glb", &tiny_glb()).unwrap();

        assert_eq!(model.mesh_count(), 1);
        let mesh = &model.meshes()[0];
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.indices(), &[0, 1, 2]);
        assert_eq!(mesh.positions()[1], [1.0, 0.0, 0.0]);
        // The source declares no normals or texture coordinates.
        assert!(mesh.normals().is_empty());
        assert!(mesh.uvs().is_empty());
    }

    #[test]
    fn path_is_decomposed_like_other_assets() {
        let model = ModelAsset::from_data("models/props/triangle.glb", &tiny_glb()).unwrap();
        assert_eq!(model.name(), "triangle.glb");
        assert_eq!(model.directory(), "models/props");
        assert_eq!(model.extension(), "glb");
    }

    // ── failure ───────────────────────────────────────────────────────────

    #[test]
    fn garbage_bytes_are_none() {
        assert!(ModelAsset::from_data("memory/garbage.glb", &[0xde, 0xad, 0xbe, 0xef]).is_none());
    }

    #[test]
    fn missing_file_is_none() {
        assert!(ModelAsset::from_path("definitely/not/a/real/model.glb").is_none());
    }
}
