//! Decoded tile payloads and the decoding capability.

use crate::Result;

/// A decoded tile, RGBA8, row-major
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedTile {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl DecodedTile {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Approximate heap footprint in bytes
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

impl std::fmt::Debug for DecodedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedTile")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Turns raw asset bytes into pixels.
pub trait ImageDecoder: Send + Sync {
    /// Pixel dimensions without decoding the full image where possible
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)>;

    fn decode(&self, bytes: &[u8]) -> Result<DecodedTile>;
}

/// Decoder backed by the `image` crate (PNG, JPEG and the other default formats)
#[cfg(feature = "image-decode")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateDecoder;

#[cfg(feature = "image-decode")]
impl ImageDecoder for ImageCrateDecoder {
    fn dimensions(&self, bytes: &[u8]) -> Result<(u32, u32)> {
        image::io::Reader::new(std::io::Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| crate::Error::Decode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedTile> {
        let rgba = image::load_from_memory(bytes)
            .map_err(|e| crate::Error::Decode(e.to_string()))?
            .to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(DecodedTile::new(width, height, rgba.into_raw()))
    }
}
