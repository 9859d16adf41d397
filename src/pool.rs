//! Parallel pixel shading.
//!
//! A fixed set of workers is parked on a start barrier. For every triangle the
//! main thread publishes a [`RasterPackage`] and a range of quad indices,
//! releases the start barrier, and waits on the end barrier while the workers
//! claim quads from a shared atomic counter. Triangles are fully serialized:
//! the next package is only written after every worker has rendezvoused.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::RwLock;

use crate::barrier::{Barrier, BarrierWait};
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::raster::shade_quad;
use crate::rectangle::QuadGrid;
use crate::triangle::RasterPackage;

/// Shades the pixels of one claimed quad.
pub(crate) type QuadShader = fn(&Framebuffer, &RasterPackage, &QuadGrid, usize, bool);

/// State shared between the main thread and every worker.
///
/// The package and the quad range are only written while all workers are
/// parked on the start barrier; releasing the barrier publishes them.
pub struct ShadingContext {
    framebuffer: Arc<Framebuffer>,
    grid: QuadGrid,
    depth_test: bool,
    shader: QuadShader,
    package: RwLock<Option<RasterPackage>>,
    start: AtomicUsize,
    end: AtomicUsize,
    next: AtomicUsize,
    paused: AtomicBool,
    /// Set by a worker whose shading step panicked, cleared by the main thread.
    worker_panicked: AtomicBool,
    start_barrier: Barrier,
    end_barrier: Barrier,
}

impl ShadingContext {
    fn new(framebuffer: Arc<Framebuffer>, depth_test: bool, shader: QuadShader, worker_count: usize) -> Self {
        let grid = QuadGrid::new(framebuffer.width());
        Self {
            framebuffer,
            grid,
            depth_test,
            shader,
            package: RwLock::new(None),
            start: AtomicUsize::new(0),
            end: AtomicUsize::new(0),
            next: AtomicUsize::new(0),
            paused: AtomicBool::new(false),
            worker_panicked: AtomicBool::new(false),
            // workers plus the main thread
            start_barrier: Barrier::new(worker_count + 1),
            end_barrier: Barrier::new(worker_count + 1),
        }
    }

    fn shade_claimed_quads(&self) {
        let package = self.package.read();
        let Some(pkg) = package.as_ref() else {
            return;
        };
        let start = self.start.load(Ordering::Relaxed);
        let end = self.end.load(Ordering::Relaxed);

        while !self.paused.load(Ordering::Relaxed) {
            let quad = self.next.fetch_add(1, Ordering::Relaxed);
            if quad < start || quad > end {
                break;
            }
            (self.shader)(&self.framebuffer, pkg, &self.grid, quad, self.depth_test);
        }
    }
}

fn worker_loop(context: Arc<ShadingContext>) {
    loop {
        if context.start_barrier.wait() == BarrierWait::Stopped {
            break;
        }
        // a panicking worker must still reach the end barrier or the main
        // thread blocks forever
        if panic::catch_unwind(AssertUnwindSafe(|| context.shade_claimed_quads())).is_err() {
            context.worker_panicked.store(true, Ordering::Relaxed);
        }
        if context.end_barrier.wait() == BarrierWait::Stopped {
            break;
        }
    }
}

pub struct ShadingPool {
    context: Arc<ShadingContext>,
    workers: Vec<JoinHandle<()>>,
}

impl ShadingPool {
    pub fn new(worker_count: usize, framebuffer: Arc<Framebuffer>, depth_test: bool) -> Result<Self> {
        Self::with_shader(worker_count, framebuffer, depth_test, shade_quad)
    }

    pub(crate) fn with_shader(
        worker_count: usize,
        framebuffer: Arc<Framebuffer>,
        depth_test: bool,
        shader: QuadShader,
    ) -> Result<Self> {
        assert!(worker_count > 0, "a shading pool needs at least one worker");
        let context = Arc::new(ShadingContext::new(framebuffer, depth_test, shader, worker_count));

        let mut pool = Self { context, workers: Vec::with_capacity(worker_count) };
        for i in 0..worker_count {
            let context = Arc::clone(&pool.context);
            // on error the partially built pool is dropped, which stops and joins
            let handle = thread::Builder::new()
                .name(format!("shade-{i}"))
                .spawn(move || worker_loop(context))?;
            pool.workers.push(handle);
        }
        log::info!("shading pool started with {worker_count} workers");
        Ok(pool)
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Shade one triangle across all workers. Blocks until every quad of its
    /// bounding box has been processed, or until the pool is paused.
    ///
    /// Panics if a worker panicked while shading this triangle; the pool
    /// itself stays usable and can still be dropped cleanly.
    pub fn shade(&self, package: RasterPackage) {
        let ctx = &self.context;
        assert!(
            !ctx.paused.load(Ordering::Relaxed) && !ctx.start_barrier.is_stopped(),
            "shading dispatched to a stopped pool"
        );

        let (start, end) = ctx.grid.quad_range(&package.bounds);
        *ctx.package.write() = Some(package);
        ctx.start.store(start, Ordering::Relaxed);
        ctx.end.store(end, Ordering::Relaxed);
        ctx.next.store(start, Ordering::Relaxed);

        ctx.start_barrier.wait();
        ctx.end_barrier.wait();
        assert!(!ctx.worker_panicked.swap(false, Ordering::Relaxed), "a shading worker panicked");
    }
}

impl Drop for ShadingPool {
    fn drop(&mut self) {
        let ctx = &self.context;
        ctx.paused.store(true, Ordering::Relaxed);
        ctx.start_barrier.stop();
        ctx.end_barrier.stop();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("shading worker panicked");
            }
        }
        log::info!("shading pool stopped");
    }
}
