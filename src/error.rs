use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("framebuffer dimensions must be non-zero (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("texture of {width}x{height} needs 4 bytes per texel, got {len} bytes")]
    TextureSize { width: u32, height: u32, len: usize },
    #[error("index count {0} is not a multiple of 3")]
    IndexCount(usize),
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("unknown node id {0}")]
    UnknownNode(usize),
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to spawn shading worker: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RasterError>;
