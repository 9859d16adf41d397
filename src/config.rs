/// Rasterizer settings, fixed for the lifetime of a [`Rasterizer`](crate::Rasterizer).
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizerConfig {
    pub width: u32,
    pub height: u32,
    /// Shading workers. 0 shades on the calling thread and creates no pool.
    pub worker_count: usize,
    pub backface_culling: bool,
    pub depth_test: bool,
    /// Packed RGBA written to every pixel at the start of a frame.
    pub clear_color: u32,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            worker_count: num_cpus::get(),
            backface_culling: true,
            depth_test: true,
            clear_color: 0,
        }
    }
}

impl RasterizerConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Default::default() }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn single_threaded(self) -> Self {
        self.with_workers(0)
    }

    pub fn with_backface_culling(mut self, enabled: bool) -> Self {
        self.backface_culling = enabled;
        self
    }

    pub fn with_depth_test(mut self, enabled: bool) -> Self {
        self.depth_test = enabled;
        self
    }

    pub fn with_clear_color(mut self, color: u32) -> Self {
        self.clear_color = color;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}
