//! Per-pixel stage: inside test, depth test, perspective-correct texture
//! coordinates and the nearest-neighbour texel write.
//!
//! Every rejection here is a silent skip. A rejected pixel leaves both the
//! color and the depth buffer untouched.

use glam::{Vec2, Vec3};

use crate::framebuffer::Framebuffer;
use crate::math::{barycentric, safe_w, weights_inside};
use crate::rectangle::QuadGrid;
use crate::triangle::RasterPackage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelOutcome {
    Written,
    OutOfBounds,
    /// Pixel center is not covered by the triangle.
    Outside,
    /// Interpolated NDC depth is outside (0, 1].
    DepthClipped,
    /// Not strictly closer than what is already stored.
    DepthFailed,
    TexelRejected,
}

/// Texture coordinates at `weights`, interpolated with the 1/w correction and
/// with V flipped to the texture's top-down rows.
#[inline(always)]
pub fn interpolate_tex_coords(pkg: &RasterPackage, weights: Vec3) -> Vec2 {
    let [a, b, c] = &pkg.vertices;
    let inv_w = Vec3::new(
        1.0 / safe_w(a.position.w),
        1.0 / safe_w(b.position.w),
        1.0 / safe_w(c.position.w),
    );
    let pixel_w = 1.0 / weights.dot(inv_w);
    let uv = (a.tex_coords * (weights.x * inv_w.x)
        + b.tex_coords * (weights.y * inv_w.y)
        + c.tex_coords * (weights.z * inv_w.z))
        * pixel_w;
    Vec2::new(uv.x, 1.0 - uv.y)
}

#[inline(always)]
pub fn shade_pixel(fb: &Framebuffer, pkg: &RasterPackage, x: i32, y: i32, depth_test: bool) -> PixelOutcome {
    let Some(index) = fb.index(x, y) else {
        return PixelOutcome::OutOfBounds;
    };

    let [a, b, c] = pkg.screen;
    let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
    let weights = barycentric(a, b, c, center);
    if !weights_inside(weights) {
        return PixelOutcome::Outside;
    }

    // NDC depth is linear in screen space, no 1/w correction needed here
    let depth = weights.dot(Vec3::new(pkg.ndc[0].z, pkg.ndc[1].z, pkg.ndc[2].z));
    if !(depth > 0.0 && depth <= 1.0) {
        return PixelOutcome::DepthClipped;
    }
    if depth_test && !(depth < fb.load_depth(index)) {
        return PixelOutcome::DepthFailed;
    }

    let uv = interpolate_tex_coords(pkg, weights);
    let Some(color) = pkg.texture.sample(uv) else {
        return PixelOutcome::TexelRejected;
    };

    if depth_test {
        fb.store_depth(index, depth);
    }
    fb.store_color(index, color);
    PixelOutcome::Written
}

/// Shade every pixel of the triangle's bounding box on the calling thread.
/// Returns the number of pixels written.
pub fn rasterize_triangle(fb: &Framebuffer, pkg: &RasterPackage, depth_test: bool) -> usize {
    let bounds = pkg.bounds;
    let mut written = 0;
    for y in bounds.min_y..=bounds.max_y {
        for x in bounds.min_x..=bounds.max_x {
            if shade_pixel(fb, pkg, x as i32, y as i32, depth_test) == PixelOutcome::Written {
                written += 1;
            }
        }
    }
    written
}

/// Shade the pixels of one quad that fall inside the triangle's bounds.
#[inline(always)]
pub fn shade_quad(fb: &Framebuffer, pkg: &RasterPackage, grid: &QuadGrid, quad: usize, depth_test: bool) {
    for (x, y) in grid.quad_pixels(quad, pkg.bounds) {
        shade_pixel(fb, pkg, x as i32, y as i32, depth_test);
    }
}
