//! CPU triangle rasterizer.
//!
//! Meshes are transformed to clip space, set up in screen space and shaded
//! per pixel with perspective-correct texture coordinates and a depth test.
//! Pixel shading runs either on the calling thread or on a fixed pool of
//! workers that split each triangle's bounding box into 2x2 quads.

pub mod barrier;
pub mod camera;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod math;
pub mod pool;
pub mod raster;
pub mod rasterizer;
pub mod rectangle;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod transform;
pub mod triangle;
pub mod vertex;

pub use camera::{Camera, CameraMatrices};
pub use config::RasterizerConfig;
pub use error::{RasterError, Result};
pub use framebuffer::Framebuffer;
pub use rasterizer::{FrameStats, Rasterizer};
pub use scene::{Mesh, Model, Node, NodeId, NodeKind};
pub use texture::Texture;
pub use transform::Transform;
pub use vertex::{Vertex, VertexShaderOutput};
