use std::sync::Arc;

use glam::Mat4;

use crate::error::{RasterError, Result};
use crate::texture::Texture;
use crate::vertex::Vertex;

pub type NodeId = usize;

/// Indexed triangle list. The index count is always a multiple of 3 and every
/// index refers to an existing vertex.
#[derive(Debug, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    material: usize,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>, material: usize) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(RasterError::IndexCount(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(RasterError::IndexOutOfRange { index, vertex_count: vertices.len() });
        }
        Ok(Self { vertices, indices, material })
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn material(&self) -> usize {
        self.material
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
        self.indices.chunks_exact(3).map(|tri| {
            [
                &self.vertices[tri[0] as usize],
                &self.vertices[tri[1] as usize],
                &self.vertices[tri[2] as usize],
            ]
        })
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Transform-only node.
    Group,
    Mesh(Mesh),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub local: Mat4,
    /// Invisible nodes are skipped together with their subtree.
    pub visible: bool,
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// A model owns its node hierarchy as an arena plus its material table.
/// `transform` places the whole model and is the parent of every root node.
#[derive(Debug, Clone)]
pub struct Model {
    pub name: String,
    pub transform: Mat4,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    materials: Vec<Arc<Texture>>,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            nodes: Vec::new(),
            roots: Vec::new(),
            materials: Vec::new(),
        }
    }

    pub fn add_material(&mut self, texture: Arc<Texture>) -> usize {
        self.materials.push(texture);
        self.materials.len() - 1
    }

    pub fn material(&self, index: usize) -> Option<&Arc<Texture>> {
        self.materials.get(index)
    }

    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        local: Mat4,
        kind: NodeKind,
    ) -> Result<NodeId> {
        let id = self.nodes.len();
        match parent {
            Some(p) => self.nodes.get_mut(p).ok_or(RasterError::UnknownNode(p))?.children.push(id),
            None => self.roots.push(id),
        }
        self.nodes.push(Node { name: name.into(), local, visible: true, kind, parent, children: Vec::new() });
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.node_mut(id).ok_or(RasterError::UnknownNode(id))?.visible = visible;
        Ok(())
    }

    /// Model transform composed with every local transform from the root down
    /// to `id`.
    pub fn absolute_transform(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(id)?;
        let mut matrix = node.local;
        while let Some(parent) = node.parent {
            node = &self.nodes[parent];
            matrix = node.local * matrix;
        }
        Some(self.transform * matrix)
    }

    /// Depth-first, pre-order walk over the visible mesh nodes. Absolute
    /// transforms are accumulated on the way down.
    pub fn visit_meshes(&self, mut visit: impl FnMut(NodeId, &Mesh, &Mat4)) {
        let mut stack: Vec<(NodeId, Mat4)> =
            self.roots.iter().rev().map(|&id| (id, self.transform)).collect();

        while let Some((id, parent_abs)) = stack.pop() {
            let node = &self.nodes[id];
            if !node.visible {
                continue;
            }
            let absolute = parent_abs * node.local;
            if let NodeKind::Mesh(mesh) = &node.kind {
                visit(id, mesh, &absolute);
            }
            stack.extend(node.children.iter().rev().map(|&child| (child, absolute)));
        }
    }
}
