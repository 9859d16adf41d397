//! Built-in models, used by the demo and handy as test geometry.

use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3};

use crate::error::Result;
use crate::scene::{Mesh, Model, NodeKind};
use crate::texture::Texture;
use crate::vertex::Vertex;

/// (normal, u axis, v axis) with `u x v == normal`, so every face winds
/// counter-clockwise when seen from outside.
const CUBE_FACES: [(Vec3, Vec3, Vec3); 6] = [
    (Vec3::X, Vec3::NEG_Z, Vec3::Y),
    (Vec3::NEG_X, Vec3::Z, Vec3::Y),
    (Vec3::Y, Vec3::X, Vec3::NEG_Z),
    (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    (Vec3::Z, Vec3::X, Vec3::Y),
    (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
];

const QUAD_CORNERS: [(f32, f32); 4] = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

fn push_face(vertices: &mut Vec<Vertex>, indices: &mut Vec<u32>, normal: Vec3, u: Vec3, v: Vec3) {
    let base = vertices.len() as u32;
    let center = normal * 0.5;
    for (cu, cv) in QUAD_CORNERS {
        vertices.push(Vertex::new(
            center + u * cu + v * cv,
            normal,
            Vec2::new(cu + 0.5, cv + 0.5),
        ));
    }
    indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
}

/// Unit cube centred on the origin, one mesh node, 12 triangles.
pub fn cube_model(texture: Arc<Texture>) -> Result<Model> {
    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in CUBE_FACES {
        push_face(&mut vertices, &mut indices, normal, u, v);
    }

    let mut model = Model::new("Cube");
    let material = model.add_material(texture);
    let mesh = Mesh::new(vertices, indices, material)?;
    model.add_node(None, "Cube Mesh", Mat4::IDENTITY, NodeKind::Mesh(mesh))?;
    Ok(model)
}

/// Unit square in the XY plane facing +Z.
pub fn square_model(texture: Arc<Texture>) -> Result<Model> {
    let mut vertices = Vec::with_capacity(4);
    let mut indices = Vec::with_capacity(6);
    push_face(&mut vertices, &mut indices, Vec3::Z, Vec3::X, Vec3::Y);
    // the face helper offsets by half the normal, pull it back onto z = 0
    for v in &mut vertices {
        v.position.z = 0.0;
    }

    let mut model = Model::new("Square");
    let material = model.add_material(texture);
    let mesh = Mesh::new(vertices, indices, material)?;
    model.add_node(None, "Quad Mesh", Mat4::IDENTITY, NodeKind::Mesh(mesh))?;
    Ok(model)
}

/// `size` x `size` texture split into `cells` x `cells` alternating squares.
pub fn checkerboard(size: u32, cells: u32, even: [u8; 4], odd: [u8; 4]) -> Texture {
    let cell = (size / cells.max(1)).max(1);
    let mut rgba = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let color = if (x / cell + y / cell) % 2 == 0 { even } else { odd };
            rgba.extend_from_slice(&color);
        }
    }
    Texture { width: size, height: size, rgba }
}
