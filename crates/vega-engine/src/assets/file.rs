use std::path::Path;
use std::sync::Arc;

/// A text file loaded into memory, with its path decomposed for convenience.
///
/// Shader builders consume these; nothing here touches the GPU.
#[derive(Debug, Clone)]
pub struct FileAsset {
    path: String,
    name: String,
    directory: String,
    extension: String,
    content: String,
}

impl FileAsset {
    fn new(path: &str, content: String) -> Self {
        let (name, directory, extension) = decompose_path(path);
        Self {
            path: path.to_string(),
            name,
            directory,
            extension,
            content,
        }
    }

    /// Loads a file from disk.
    ///
    /// Returns `None` with an error log when the file is missing or
    /// unreadable; the caller decides whether that is fatal.
    pub fn from_path(path: &str) -> Option<Arc<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                log::error!("failed to load file asset '{path}': {err}");
                return None;
            }
        };

        log::debug!("loaded file asset '{path}'");
        Some(Arc::new(Self::new(path, content)))
    }

    /// Wraps in-memory content as an asset. `path` is used for labeling only.
    pub fn from_content(path: &str, content: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(path, content.into()))
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

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Splits a path into (file name, parent directory, extension).
///
/// The extension is reported without its leading dot.
pub(crate) fn decompose_path(path: &str) -> (String, String, String) {
    let p = Path::new(path);

    let name = p
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let directory = p
        .parent()
        .map(|d| d.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = p
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();

    (name, directory, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── path decomposition ────────────────────────────────────────────────

    #[test]
    fn decomposes_a_nested_path() {
        let asset = FileAsset::from_content("shaders/pbr/main.wgsl", "fn main() {}");
        assert_eq!(asset.name(), "main.wgsl");
        assert_eq!(asset.directory(), "shaders/pbr");
        assert_eq!(asset.extension(), "wgsl");
        assert_eq!(asset.content(), "fn main() {}");
    }

    #[test]
    fn bare_file_name_has_empty_directory() {
        let (name, directory, extension) = decompose_path("triangle.wgsl");
        assert_eq!(name, "triangle.wgsl");
        assert_eq!(directory, "");
        assert_eq!(extension, "wgsl");
    }

    #[test]
    fn missing_extension_is_empty() {
        let (_, _, extension) = decompose_path("assets/LICENSE");
        assert_eq!(extension, "");
    }

    // ── loading ───────────────────────────────────────────────────────────

    #[test]
    fn from_path_on_missing_file_is_none() {
        assert!(FileAsset::from_path("definitely/not/a/real/file.wgsl").is_none());
    }

    #[test]
    fn from_path_reads_file_content() {
        let dir = std::env::temp_dir().join("vega-file-asset-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("sample.txt");
        std::fs::write(&path, "hello").unwrap();

        let asset = FileAsset::from_path(path.to_str().unwrap()).unwrap();
        assert_eq!(asset.content(), "hello");
        assert_eq!(asset.name(), "sample.txt");
    }
}
