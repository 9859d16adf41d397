use std::path::Path;

use glam::Vec2;
use image::{DynamicImage, GenericImageView};

use crate::error::{RasterError, Result};
use crate::math::pack_bytes;

/// CPU-side RGBA8 image, row-major, 4 bytes per texel, row 0 at the top.
#[derive(Debug, Clone)]
pub struct Texture {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Texture {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let img: DynamicImage = image::open(path)?;
        Ok(Self::from_image(&img))
    }

    pub fn from_image(img: &DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self { width, height, rgba: img.to_rgba8().into_raw() }
    }

    pub fn from_rgba(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self> {
        if rgba.len() != (width as usize) * (height as usize) * 4 {
            return Err(RasterError::TextureSize { width, height, len: rgba.len() });
        }
        Ok(Self { width, height, rgba })
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self { width: 1, height: 1, rgba: rgba.to_vec() }
    }

    /// Nearest texel for `uv`, packed as RGBA. UVs are truncated to texel
    /// coordinates; a fetch whose byte offset falls outside the image, or
    /// cannot be represented at all, is rejected with `None`.
    #[inline(always)]
    pub fn sample(&self, uv: Vec2) -> Option<u32> {
        // float to int casts saturate, so huge UVs arrive here as i64::MAX/MIN
        let x = (uv.x * self.width as f32) as i64;
        let y = (uv.y * self.height as f32) as i64;
        let offset = y
            .checked_mul(i64::from(self.width))
            .and_then(|row| row.checked_add(x))
            .and_then(|texel| texel.checked_mul(4))
            .and_then(|bytes| usize::try_from(bytes).ok())
            .filter(|&i| i.checked_add(4).is_some_and(|end| end <= self.rgba.len()));

        let Some(i) = offset else {
            log::debug!("texel ({x}, {y}) outside {}x{} texture, sample skipped", self.width, self.height);
            return None;
        };
        Some(pack_bytes([self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]))
    }
}
