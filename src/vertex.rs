use glam::{Mat4, Vec2, Vec3, Vec4};

/// Model-space vertex as produced by mesh import.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self { position, normal, tex_coords }
    }
}

/// Clip-space vertex; `w` has not been divided out yet.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct VertexShaderOutput {
    pub position: Vec4,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

/// Transform one triangle's vertices by `projection * view * model`.
/// Normals and texture coordinates pass through untouched.
#[inline(always)]
pub fn vertex_shader(vertices: [&Vertex; 3], mvp: &Mat4) -> [VertexShaderOutput; 3] {
    vertices.map(|v| VertexShaderOutput {
        position: *mvp * v.position.extend(1.0),
        normal: v.normal,
        tex_coords: v.tex_coords,
    })
}
