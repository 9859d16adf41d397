use glam::{Vec2, Vec3, Vec4};

/// Divisor for the homogeneous divide. A vertex sitting exactly on the camera
/// plane (`w == 0`) keeps its coordinates unscaled instead of blowing up to
/// inf/NaN. This is an approximation, not a near-plane clip.
#[inline(always)]
pub fn safe_w(w: f32) -> f32 {
    if w == 0.0 { 1.0 } else { w }
}

#[inline(always)]
pub fn perspective_divide(clip: Vec4) -> Vec3 {
    clip.truncate() / safe_w(clip.w)
}

/// Map NDC xy from [-1, 1] onto pixel space [0, width-1] x [0, height-1].
/// Y is left as is, rows get reversed once at present time.
#[inline(always)]
pub fn ndc_to_screen(ndc: Vec3, width: u32, height: u32) -> Vec2 {
    let unit = ndc.truncate() * 0.5 + Vec2::splat(0.5);
    unit * Vec2::new(width.saturating_sub(1) as f32, height.saturating_sub(1) as f32)
}

/// Barycentric weights of `p` relative to triangle `abc`, solved with Cramer's
/// rule on the edge vectors `b - a` and `c - a`.
///
/// A zero determinant (zero-area triangle) substitutes 1 for its reciprocal so
/// the call never divides by zero; the caller's range check decides what
/// happens to the pixel.
#[inline(always)]
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec3 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let det = v0.x * v1.y - v1.x * v0.y;
    let inv_det = if det == 0.0 { 1.0 } else { 1.0 / det };

    let w_b = (v2.x * v1.y - v1.x * v2.y) * inv_det;
    let w_c = (v0.x * v2.y - v2.x * v0.y) * inv_det;
    Vec3::new(1.0 - w_b - w_c, w_b, w_c)
}

#[inline(always)]
pub fn weights_inside(weights: Vec3) -> bool {
    (0.0..=1.0).contains(&weights.x)
        && (0.0..=1.0).contains(&weights.y)
        && (0.0..=1.0).contains(&weights.z)
}

pub fn divide_and_round_up(dividend: u32, divisor: u32) -> u32 {
    (dividend + divisor - 1) / divisor
}

/// Pack a [0, 1] float color as `a << 24 | b << 16 | g << 8 | r`.
pub fn pack_rgba(color: Vec4) -> u32 {
    let r = (color.x * 255.0) as u8;
    let g = (color.y * 255.0) as u8;
    let b = (color.z * 255.0) as u8;
    let a = (color.w * 255.0) as u8;
    pack_bytes([r, g, b, a])
}

#[inline(always)]
pub fn pack_bytes(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

#[inline(always)]
pub fn unpack_rgba(pixel: u32) -> [u8; 4] {
    pixel.to_le_bytes()
}
