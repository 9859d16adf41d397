use std::env;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3, Vec4};

use rusterizer::math::pack_rgba;
use rusterizer::shapes::{checkerboard, cube_model};
use rusterizer::{Camera, Rasterizer, RasterizerConfig, Texture, Transform};

const FRAMES: usize = 120;

fn average_micros(times: &[f64]) -> f64 {
    if times.is_empty() { 0.0 } else { times.iter().sum::<f64>() / times.len() as f64 }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // usage: rusterizer [texture] [output.png]
    let mut args = env::args().skip(1);
    let texture_path = args.next();
    let output = args.next().unwrap_or_else(|| "frame.png".to_string());

    let texture = match &texture_path {
        Some(path) => Texture::load(path).with_context(|| format!("loading texture {path}"))?,
        None => checkerboard(256, 8, [230, 230, 230, 255], [40, 90, 200, 255]),
    };

    let config = RasterizerConfig::new(1280, 720).with_clear_color(pack_rgba(Vec4::new(0.05, 0.05, 0.08, 1.0)));
    let aspect = config.aspect();
    let mut rasterizer = Rasterizer::new(config).context("creating rasterizer")?;
    let mut model = cube_model(Arc::new(texture)).context("building cube")?;

    let camera = Camera::new(60.0_f32.to_radians(), 0.1, 100.0, Transform::new(0.0, 0.0, Vec3::new(0.0, 0.0, 3.0)));
    let matrices = camera.matrices(aspect);

    let mut draw_times: Vec<f64> = Vec::with_capacity(FRAMES);
    let mut frame_times: Vec<f64> = Vec::with_capacity(FRAMES);
    let mut yaw: f32 = 0.0;

    for _ in 0..FRAMES {
        let frame_start = Instant::now();
        yaw += 0.02;
        model.transform = Transform::new(yaw, yaw * 0.5, Vec3::ZERO).to_matrix() * Mat4::from_scale(Vec3::splat(1.2));

        rasterizer.begin_frame();
        rasterizer.draw_model(&model, &matrices);
        rasterizer.prepare_present();

        draw_times.push(rasterizer.stats().draw_time.as_micros() as f64);
        frame_times.push(frame_start.elapsed().as_micros() as f64);
    }

    let stats = rasterizer.stats();
    log::info!(
        "{FRAMES} frames, draw {:.1}us avg, frame {:.1}us avg, last frame {} triangles rasterized / {} culled",
        average_micros(&draw_times),
        average_micros(&frame_times),
        stats.triangles_rasterized,
        stats.triangles_culled,
    );

    rasterizer.save_png(&output).with_context(|| format!("saving {output}"))?;
    log::info!("saved {output}");
    Ok(())
}
