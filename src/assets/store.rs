use std::{collections::HashMap, sync::Arc};

use crate::{
    foundation::{
        core::Rgba8Premul,
        error::{ChoreoError, ChoreoResult},
    },
    frames::model::ImageKey,
};

/// Decoded frame image ready for sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> ChoreoResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| ChoreoError::validation("image buffer size overflow"))?;
        if width == 0 || height == 0 {
            return Err(ChoreoError::validation("image width/height must be > 0"));
        }
        if data.len() != expected {
            return Err(ChoreoError::validation(format!(
                "image buffer is {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Uniformly filled image; mostly useful for synthetic libraries and tests.
    pub fn solid(width: u32, height: u32, color: Rgba8Premul) -> ChoreoResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        Self::from_rgba8_premul(width, height, color.to_array().repeat(px))
    }

    /// Premultiplied pixel at integer coordinates, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Read-only image lookup the compositor draws from.
///
/// `None` means the image is missing or not ready yet; the layer using it is skipped.
pub trait AssetSource {
    fn image(&self, key: &ImageKey) -> Option<&PreparedImage>;
}

/// In-memory image table keyed by [`ImageKey`].
#[derive(Clone, Debug, Default)]
pub struct AssetStore {
    images: HashMap<ImageKey, PreparedImage>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the image under `key`.
    pub fn insert(&mut self, key: ImageKey, image: PreparedImage) -> Option<PreparedImage> {
        self.images.insert(key, image)
    }

    pub fn remove(&mut self, key: &ImageKey) -> Option<PreparedImage> {
        self.images.remove(key)
    }

    pub fn contains(&self, key: &ImageKey) -> bool {
        self.images.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetSource for AssetStore {
    fn image(&self, key: &ImageKey) -> Option<&PreparedImage> {
        self.images.get(key)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
