use std::sync::Arc;

use super::file::decompose_path;

/// Decoded image pixels, always RGBA8.
///
/// Decoding forces four channels so the GPU upload path never has to deal
/// with per-format row layouts; `stride` is the tightly packed row size in
/// bytes (width * 4).
#[derive(Debug, Clone)]
pub struct TextureAsset {
    path: String,
    name: String,
    directory: String,
    extension: String,
    data: Vec<u8>,
    width: u32,
    height: u32,
    channel_count: u32,
    stride: u32,
}

impl TextureAsset {
    fn new(path: &str, data: Vec<u8>, width: u32, height: u32) -> Self {
        let (name, directory, extension) = decompose_path(path);
        Self {
            path: path.to_string(),
            name,
            directory,
            extension,
            data,
            width,
            height,
            channel_count: 4,
            stride: width * 4,
        }
    }

    /// Decodes an image file from disk.
    ///
    /// Returns `None` with an error log on I/O or decode failure.
    pub fn from_path(path: &str, flip_vertically: bool) -> Option<Arc<Self>> {
        let image = match image::open(path) {
            Ok(image) => image,
            Err(err) => {
                log::error!("failed to load texture asset '{path}': {err}");
                return None;
            }
        };

        Some(Arc::new(Self::from_image(path, image, flip_vertically)))
    }

    /// Decodes an image from an in-memory encoded byte stream.
    ///
    /// `path` is used for labeling and diagnostics only.
    pub fn from_data(path: &str, data: &[u8], flip_vertically: bool) -> Option<Arc<Self>> {
        let image = match image::load_from_memory(data) {
            Ok(image) => image,
            Err(err) => {
                log::error!("failed to decode texture asset '{path}' from memory: {err}");
                return None;
            }
        };

        Some(Arc::new(Self::from_image(path, image, flip_vertically)))
    }

    fn from_image(path: &str, image: image::DynamicImage, flip_vertically: bool) -> Self {
        let image = if flip_vertically { image.flipv() } else { image };
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();

        log::debug!("decoded texture asset '{path}' ({width}x{height})");
        Self::new(path, rgba.into_raw(), width, height)
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

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channel_count(&self) -> u32 {
        self.channel_count
    }

    /// Bytes per row of pixel data.
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbaImage};
    use std::io::Cursor;

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    // ── decoding ──────────────────────────────────────────────────────────

    #[test]
    fn decodes_rgba8_with_packed_stride() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let png = encode_png(&image);

        let asset = TextureAsset::from_data("memory/red.png", &png, false).unwrap();
        assert_eq!(asset.width(), 3);
        assert_eq!(asset.height(), 2);
        assert_eq!(asset.channel_count(), 4);
        assert_eq!(asset.stride(), 12);
        assert_eq!(asset.size(), 24);
        assert_eq!(&asset.data()[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn vertical_flip_reorders_rows() {
        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, image::Rgba([10, 0, 0, 255]));
        image.put_pixel(0, 1, image::Rgba([20, 0, 0, 255]));
        let png = encode_png(&image);

        let plain = TextureAsset::from_data("memory/rows.png", &png, false).unwrap();
        let flipped = TextureAsset::from_data("memory/rows.png", &png, true).unwrap();

        assert_eq!(plain.data()[0], 10);
        assert_eq!(flipped.data()[0], 20);
    }

    // ── failure paths ─────────────────────────────────────────────────────

    #[test]
    fn garbage_bytes_decode_to_none() {
        assert!(TextureAsset::from_data("memory/junk", &[0, 1, 2, 3], false).is_none());
    }

    #[test]
    fn missing_path_decodes_to_none() {
        assert!(TextureAsset::from_path("no/such/texture.png", false).is_none());
    }
}
