use std::sync::atomic::{AtomicU32, Ordering};

use glam::IVec2;
use rayon::prelude::*;

use crate::error::{RasterError, Result};

/// Color and depth targets, both indexed by `y * width + x`.
///
/// Pixels are stored as relaxed atomics so the shading workers can write
/// disjoint pixels of the same triangle through a shared reference. Each pixel
/// is owned by exactly one quad at a time, so no ordering between neighbours is
/// needed; the barrier rendezvous publishes the writes to the main thread.
pub struct Framebuffer {
    width: u32,
    height: u32,
    color: Vec<AtomicU32>,
    depth: Vec<AtomicU32>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let size = (width as usize) * (height as usize);
        Ok(Self {
            width,
            height,
            color: (0..size).map(|_| AtomicU32::new(0)).collect(),
            depth: (0..size).map(|_| AtomicU32::new(f32::INFINITY.to_bits())).collect(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Buffer index for a pixel, `None` when outside the target.
    #[inline(always)]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    /// Reset every color to `color` and every depth to +inf.
    pub fn clear(&self, color: u32) {
        let far = f32::INFINITY.to_bits();
        self.color.par_iter().for_each(|px| px.store(color, Ordering::Relaxed));
        self.depth.par_iter().for_each(|d| d.store(far, Ordering::Relaxed));
    }

    #[inline(always)]
    pub(crate) fn load_depth(&self, index: usize) -> f32 {
        f32::from_bits(self.depth[index].load(Ordering::Relaxed))
    }

    #[inline(always)]
    pub(crate) fn store_depth(&self, index: usize, depth: f32) {
        self.depth[index].store(depth.to_bits(), Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn store_color(&self, index: usize, color: u32) {
        self.color[index].store(color, Ordering::Relaxed);
    }

    /// Returns false when the pixel is outside the target.
    pub fn set_pixel(&self, x: i32, y: i32, color: u32) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.store_color(i, color);
                true
            }
            None => false,
        }
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color[i].load(Ordering::Relaxed))
    }

    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.load_depth(i))
    }

    pub fn color_snapshot(&self) -> Vec<u32> {
        self.color.iter().map(|px| px.load(Ordering::Relaxed)).collect()
    }

    pub fn depth_snapshot(&self) -> Vec<f32> {
        (0..self.depth.len()).map(|i| self.load_depth(i)).collect()
    }

    /// Copy the color buffer into `out` with the row order reversed, turning
    /// the top-down raster into the bottom-up layout the presenter expects.
    pub fn copy_flipped_into(&self, out: &mut [u32]) {
        let width = self.width as usize;
        let height = self.height as usize;
        debug_assert_eq!(out.len(), width * height);
        out.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
            let src = (height - 1 - y) * width;
            for (dst, px) in row.iter_mut().zip(&self.color[src..src + width]) {
                *dst = px.load(Ordering::Relaxed);
            }
        });
    }

    /// Integer Bresenham from `start` to `end` inclusive. Points falling outside
    /// the target are skipped. Returns the number of pixels written.
    pub fn draw_line(&self, start: IVec2, end: IVec2, color: u32) -> usize {
        let dx = (end.x - start.x).abs();
        let dy = -(end.y - start.y).abs();
        let sx = if start.x <= end.x { 1 } else { -1 };
        let sy = if start.y <= end.y { 1 } else { -1 };
        let mut err = dx + dy;
        let (mut x, mut y) = (start.x, start.y);
        let mut written = 0;

        loop {
            if self.set_pixel(x, y, color) {
                written += 1;
            }
            if x == end.x && y == end.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
        written
    }
}
