use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::{IVec2, Mat4};

use crate::camera::CameraMatrices;
use crate::config::RasterizerConfig;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::pool::ShadingPool;
use crate::raster::rasterize_triangle;
use crate::scene::Model;
use crate::texture::Texture;
use crate::triangle::{TriangleSetup, setup_triangle};
use crate::vertex::{Vertex, vertex_shader};

/// Counters and timings for the current frame, reset by `begin_frame`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub triangles_submitted: usize,
    pub triangles_culled: usize,
    /// Off screen, or every vertex outside the depth range.
    pub triangles_clipped: usize,
    pub triangles_rasterized: usize,
    pub meshes_skipped: usize,
    pub draw_time: Duration,
    pub present_time: Duration,
}

/// Software rasterizer driving the vertex stage, triangle setup and pixel
/// shading into a CPU framebuffer.
///
/// Per frame: [`begin_frame`](Self::begin_frame), any number of
/// [`draw_model`](Self::draw_model) / [`draw_triangle`](Self::draw_triangle)
/// calls, [`prepare_present`](Self::prepare_present), then read
/// [`image`](Self::image).
pub struct Rasterizer {
    config: RasterizerConfig,
    framebuffer: Arc<Framebuffer>,
    pool: Option<ShadingPool>,
    final_image: Vec<u32>,
    stats: FrameStats,
}

impl Rasterizer {
    pub fn new(config: RasterizerConfig) -> Result<Self> {
        let framebuffer = Arc::new(Framebuffer::new(config.width, config.height)?);
        framebuffer.clear(config.clear_color);

        let pool = match config.worker_count {
            0 => None,
            n => Some(ShadingPool::new(n, Arc::clone(&framebuffer), config.depth_test)?),
        };
        log::info!(
            "rasterizer {}x{}, {} shading workers, backface culling {}, depth test {}",
            config.width,
            config.height,
            config.worker_count,
            config.backface_culling,
            config.depth_test,
        );

        let size = (config.width as usize) * (config.height as usize);
        Ok(Self { config, framebuffer, pool, final_image: vec![0; size], stats: FrameStats::default() })
    }

    pub fn config(&self) -> &RasterizerConfig {
        &self.config
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    pub fn begin_frame(&mut self) {
        self.framebuffer.clear(self.config.clear_color);
        self.stats = FrameStats::default();
    }

    /// Rasterize every visible mesh of `model`. Meshes whose material is
    /// missing are skipped.
    pub fn draw_model(&mut self, model: &Model, camera: &CameraMatrices) {
        let start = Instant::now();
        let view_projection = camera.view_projection();

        model.visit_meshes(|id, mesh, absolute| {
            let Some(texture) = model.material(mesh.material()) else {
                log::warn!("{}: node {id} uses missing material {}, skipped", model.name, mesh.material());
                self.stats.meshes_skipped += 1;
                return;
            };
            let mvp = view_projection * *absolute;
            for triangle in mesh.triangles() {
                self.draw_triangle(triangle, &mvp, texture);
            }
        });

        self.stats.draw_time += start.elapsed();
    }

    pub fn draw_triangle(&mut self, vertices: [&Vertex; 3], mvp: &Mat4, texture: &Arc<Texture>) {
        self.stats.triangles_submitted += 1;
        let clip = vertex_shader(vertices, mvp);

        match setup_triangle(
            clip,
            texture,
            self.config.width,
            self.config.height,
            self.config.backface_culling,
        ) {
            TriangleSetup::Rasterize(package) => {
                self.stats.triangles_rasterized += 1;
                match &self.pool {
                    Some(pool) => pool.shade(package),
                    None => {
                        rasterize_triangle(&self.framebuffer, &package, self.config.depth_test);
                    }
                }
            }
            TriangleSetup::BackFacing => {
                log::trace!("back facing triangle culled");
                self.stats.triangles_culled += 1;
            }
            TriangleSetup::OffScreen | TriangleSetup::DepthClipped => {
                self.stats.triangles_clipped += 1;
            }
        }
    }

    /// Debug overlay line straight into the color buffer.
    pub fn draw_line(&self, start: IVec2, end: IVec2, color: u32) -> usize {
        self.framebuffer.draw_line(start, end, color)
    }

    /// Copy the frame into the presentable image, reversing the row order.
    pub fn prepare_present(&mut self) {
        let start = Instant::now();
        self.framebuffer.copy_flipped_into(&mut self.final_image);
        self.stats.present_time = start.elapsed();
        log::debug!("frame stats: {:?}", self.stats);
    }

    /// Packed RGBA pixels, `width * height`, valid until the next `prepare_present`.
    pub fn image(&self) -> &[u32] {
        &self.final_image
    }

    pub fn image_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.final_image)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        image::save_buffer(
            path,
            self.image_bytes(),
            self.config.width,
            self.config.height,
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(())
    }
}
