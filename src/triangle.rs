use std::sync::Arc;

use glam::{Vec2, Vec3};

use crate::math::{ndc_to_screen, perspective_divide};
use crate::rectangle::Rect;
use crate::texture::Texture;
use crate::vertex::VertexShaderOutput;

/// NDC looks down +Z. Counter-clockwise winding in NDC xy gives an edge cross
/// product along +Z.
const VIEW_DIR: Vec3 = Vec3::Z;

/// Everything the per-pixel stage needs for one triangle. In the parallel path
/// a single package is shared read-only by every worker until the end
/// barrier.
#[derive(Debug, Clone)]
pub struct RasterPackage {
    pub vertices: [VertexShaderOutput; 3],
    pub ndc: [Vec3; 3],
    pub screen: [Vec2; 3],
    pub bounds: Rect,
    pub texture: Arc<Texture>,
}

#[derive(Debug)]
pub enum TriangleSetup {
    Rasterize(RasterPackage),
    BackFacing,
    OffScreen,
    /// Every vertex depth is outside (0, 1], so no interior pixel can pass.
    DepthClipped,
}

/// Counter-clockwise (as seen by the camera) is front facing. Zero-area
/// triangles count as back facing.
pub fn is_back_facing(ndc: &[Vec3; 3]) -> bool {
    let normal = (ndc[1] - ndc[0]).cross(ndc[2] - ndc[0]);
    normal.dot(VIEW_DIR) <= 0.0
}

pub fn setup_triangle(
    vertices: [VertexShaderOutput; 3],
    texture: &Arc<Texture>,
    width: u32,
    height: u32,
    backface_culling: bool,
) -> TriangleSetup {
    let ndc = vertices.map(|v| perspective_divide(v.position));

    if backface_culling && is_back_facing(&ndc) {
        return TriangleSetup::BackFacing;
    }
    if ndc.iter().all(|p| p.z <= 0.0) || ndc.iter().all(|p| p.z > 1.0) {
        return TriangleSetup::DepthClipped;
    }

    let screen = ndc.map(|p| ndc_to_screen(p, width, height));
    match Rect::bounding(screen, width, height) {
        Some(bounds) => TriangleSetup::Rasterize(RasterPackage {
            vertices,
            ndc,
            screen,
            bounds,
            texture: Arc::clone(texture),
        }),
        None => TriangleSetup::OffScreen,
    }
}
