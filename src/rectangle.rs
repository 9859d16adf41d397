use glam::Vec2;

use crate::math::divide_and_round_up;

/// Side length of a shading quad in pixels.
pub const QUAD_SIZE: u32 = 2;

/// Pixel rectangle with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl Rect {
    #[inline(always)]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Screen-space bounding box of three points clamped to a `width` x
    /// `height` target. `None` when the box misses the target entirely or a
    /// coordinate is NaN.
    pub fn bounding(points: [Vec2; 3], width: u32, height: u32) -> Option<Rect> {
        // f32::min ignores NaN operands, so reject them up front
        if points.iter().any(|p| p.is_nan()) {
            return None;
        }
        let [a, b, c] = points;
        let lo = a.min(b).min(c).floor();
        let hi = a.max(b).max(c).ceil();
        let last_x = (width - 1) as f32;
        let last_y = (height - 1) as f32;
        let overlaps = hi.x >= 0.0 && hi.y >= 0.0 && lo.x <= last_x && lo.y <= last_y;
        if !overlaps {
            return None;
        }
        Some(Rect {
            min_x: lo.x.max(0.0) as u32,
            min_y: lo.y.max(0.0) as u32,
            max_x: hi.x.min(last_x) as u32,
            max_y: hi.y.min(last_y) as u32,
        })
    }
}

/// 2x2 quads tiled left-to-right, top-to-bottom over the whole framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuadGrid {
    pub quads_per_row: u32,
}

impl QuadGrid {
    pub fn new(width: u32) -> Self {
        Self { quads_per_row: divide_and_round_up(width, QUAD_SIZE) }
    }

    #[inline(always)]
    pub fn quad_index(&self, x: u32, y: u32) -> usize {
        ((y / QUAD_SIZE) * self.quads_per_row + x / QUAD_SIZE) as usize
    }

    /// Inclusive quad range covering `rect`. Quads on the rows in between may
    /// lie outside the rect horizontally; `quad_pixels` filters those out.
    pub fn quad_range(&self, rect: &Rect) -> (usize, usize) {
        (self.quad_index(rect.min_x, rect.min_y), self.quad_index(rect.max_x, rect.max_y))
    }

    /// The pixels of `quad` that fall inside `rect`.
    #[inline(always)]
    pub fn quad_pixels(&self, quad: usize, rect: Rect) -> impl Iterator<Item = (u32, u32)> {
        let qx = (quad as u32 % self.quads_per_row) * QUAD_SIZE;
        let qy = (quad as u32 / self.quads_per_row) * QUAD_SIZE;
        (0..QUAD_SIZE * QUAD_SIZE)
            .map(move |i| (qx + i % QUAD_SIZE, qy + i / QUAD_SIZE))
            .filter(move |&(x, y)| rect.contains(x, y))
    }
}
