//! End-to-end frame scenarios driven through the public rasterizer API.

use std::sync::Arc;

use approx::assert_relative_eq;
use glam::{Mat4, Vec2, Vec3};

use rusterizer::raster::{PixelOutcome, rasterize_triangle, shade_pixel};
use rusterizer::shapes::{checkerboard, cube_model};
use rusterizer::triangle::{TriangleSetup, setup_triangle};
use rusterizer::vertex::vertex_shader;
use rusterizer::{
    Camera, Mesh, Model, NodeKind, Rasterizer, RasterizerConfig, Texture, Transform, Vertex,
};

const RED: u32 = 0xFF0000FF;

fn vertex(x: f32, y: f32, z: f32) -> Vertex {
    Vertex::new(Vec3::new(x, y, z), Vec3::Z, Vec2::splat(0.5))
}

fn solid(rgba: [u8; 4]) -> Arc<Texture> {
    Arc::new(Texture::solid(rgba))
}

fn assert_untouched(r: &Rasterizer) {
    assert!(r.framebuffer().color_snapshot().iter().all(|&px| px == 0));
    assert!(r.framebuffer().depth_snapshot().iter().all(|&d| d == f32::INFINITY));
}

#[test]
fn full_viewport_triangle_on_two_by_two() {
    for workers in [0, 1, 4] {
        let config = RasterizerConfig::new(2, 2).with_workers(workers);
        let mut r = Rasterizer::new(config).unwrap();
        r.begin_frame();

        let (a, b, c) = (vertex(-1.0, -1.0, 0.5), vertex(7.0, -1.0, 0.5), vertex(-1.0, 7.0, 0.5));
        r.draw_triangle([&a, &b, &c], &Mat4::IDENTITY, &solid([255, 0, 0, 255]));

        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(r.framebuffer().get_pixel(x, y), Some(RED), "{workers} workers, ({x}, {y})");
                assert_eq!(r.framebuffer().get_depth(x, y), Some(0.5));
            }
        }
        r.prepare_present();
        assert_eq!(r.image(), &[RED; 4]);
    }
}

#[test]
fn triangle_outside_the_target_writes_nothing() {
    let mut r = Rasterizer::new(RasterizerConfig::new(16, 16).with_workers(2)).unwrap();
    r.begin_frame();
    let (a, b, c) = (vertex(1.5, -0.5, 0.5), vertex(3.0, -0.5, 0.5), vertex(1.5, 0.5, 0.5));
    r.draw_triangle([&a, &b, &c], &Mat4::IDENTITY, &solid([255; 4]));
    let (a, b, c) = (vertex(-0.5, -4.0, 0.5), vertex(0.5, -4.0, 0.5), vertex(0.0, -2.0, 0.5));
    r.draw_triangle([&a, &b, &c], &Mat4::IDENTITY, &solid([255; 4]));

    assert_eq!(r.stats().triangles_clipped, 2);
    assert_untouched(&r);
}

#[test]
fn triangles_behind_or_inside_the_near_plane_write_nothing() {
    let camera = Camera::new(60.0_f32.to_radians(), 0.1, 100.0, Transform::default());
    let view_projection = camera.matrices(1.0).view_projection();
    let tex = solid([255; 4]);

    for culling in [true, false] {
        let config = RasterizerConfig::new(32, 32).with_workers(2).with_backface_culling(culling);
        let mut r = Rasterizer::new(config).unwrap();
        r.begin_frame();
        for z in [1.0, 0.05, -0.05] {
            let (a, b, c) = (vertex(-0.5, -0.5, z), vertex(0.5, -0.5, z), vertex(0.0, 0.5, z));
            r.draw_triangle([&a, &b, &c], &view_projection, &tex);
            r.draw_triangle([&a, &c, &b], &view_projection, &tex);
        }
        assert_untouched(&r);
    }
}

#[test]
fn reshading_the_same_triangle_writes_once() {
    let r = Rasterizer::new(RasterizerConfig::new(8, 8).single_threaded()).unwrap();
    let (a, b, c) = (vertex(-1.0, -1.0, 0.3), vertex(1.0, -1.0, 0.3), vertex(-1.0, 1.0, 0.3));
    let clip = vertex_shader([&a, &b, &c], &Mat4::IDENTITY);
    let TriangleSetup::Rasterize(pkg) = setup_triangle(clip, &solid([9, 9, 9, 255]), 8, 8, true) else {
        panic!("triangle should be rasterized");
    };

    let first = rasterize_triangle(r.framebuffer(), &pkg, true);
    let after_first = r.framebuffer().color_snapshot();
    let second = rasterize_triangle(r.framebuffer(), &pkg, true);

    assert!(first > 0);
    assert_eq!(second, 0);
    assert_eq!(r.framebuffer().color_snapshot(), after_first);
    assert_eq!(shade_pixel(r.framebuffer(), &pkg, 0, 0, true), PixelOutcome::DepthFailed);
}

#[test]
fn nearer_triangle_wins_in_either_order() {
    let near = [vertex(-1.0, -1.0, 0.2), vertex(3.0, -1.0, 0.2), vertex(-1.0, 3.0, 0.2)];
    let far = [vertex(-1.0, -1.0, 0.8), vertex(3.0, -1.0, 0.8), vertex(-1.0, 3.0, 0.8)];
    let green = solid([0, 255, 0, 255]);
    let blue = solid([0, 0, 255, 255]);

    for near_first in [true, false] {
        let mut r = Rasterizer::new(RasterizerConfig::new(4, 4).with_workers(3)).unwrap();
        r.begin_frame();
        let order = if near_first { [(&near, &green), (&far, &blue)] } else { [(&far, &blue), (&near, &green)] };
        for (tri, tex) in order {
            r.draw_triangle([&tri[0], &tri[1], &tri[2]], &Mat4::IDENTITY, tex);
        }
        assert_eq!(r.framebuffer().get_pixel(1, 1), Some(0xFF00FF00));
        assert_relative_eq!(r.framebuffer().get_depth(1, 1).unwrap(), 0.2, epsilon = 1e-6);
    }
}

#[test]
fn depth_test_disabled_lets_the_last_triangle_win() {
    let config = RasterizerConfig::new(4, 4).single_threaded().with_depth_test(false);
    let mut r = Rasterizer::new(config).unwrap();
    r.begin_frame();
    let near = [vertex(-1.0, -1.0, 0.2), vertex(3.0, -1.0, 0.2), vertex(-1.0, 3.0, 0.2)];
    let far = [vertex(-1.0, -1.0, 0.8), vertex(3.0, -1.0, 0.8), vertex(-1.0, 3.0, 0.8)];
    r.draw_triangle([&near[0], &near[1], &near[2]], &Mat4::IDENTITY, &solid([0, 255, 0, 255]));
    r.draw_triangle([&far[0], &far[1], &far[2]], &Mat4::IDENTITY, &solid([0, 0, 255, 255]));

    assert_eq!(r.framebuffer().get_pixel(1, 1), Some(0xFFFF0000));
    assert_eq!(r.framebuffer().get_depth(1, 1), Some(f32::INFINITY));
}

#[test]
fn begin_frame_twice_is_the_same_as_once() {
    let mut r = Rasterizer::new(RasterizerConfig::new(5, 3).with_workers(2)).unwrap();
    let (a, b, c) = (vertex(-1.0, -1.0, 0.5), vertex(1.0, -1.0, 0.5), vertex(-1.0, 1.0, 0.5));
    r.draw_triangle([&a, &b, &c], &Mat4::IDENTITY, &solid([255; 4]));

    r.begin_frame();
    let once = (r.framebuffer().color_snapshot(), r.framebuffer().depth_snapshot());
    r.begin_frame();
    let twice = (r.framebuffer().color_snapshot(), r.framebuffer().depth_snapshot());
    assert_eq!(once, twice);
    assert_untouched(&r);
}

#[test]
fn spinning_cube_renders_the_same_on_any_worker_count() {
    let texture = Arc::new(checkerboard(16, 4, [255, 255, 255, 255], [200, 20, 20, 255]));
    let mut model = cube_model(texture).unwrap();
    model.transform = Transform::new(0.6, 0.4, Vec3::ZERO).to_matrix();
    let camera = Camera::new(60.0_f32.to_radians(), 0.1, 50.0, Transform::new(0.0, 0.0, Vec3::new(0.0, 0.0, 3.0)));

    let render = |workers: usize| {
        let config = RasterizerConfig::new(64, 48).with_workers(workers);
        let mut r = Rasterizer::new(config.clone()).unwrap();
        r.begin_frame();
        r.draw_model(&model, &camera.matrices(config.aspect()));
        r.prepare_present();
        (r.image().to_vec(), *r.stats())
    };

    let (reference, stats) = render(0);
    assert_eq!(stats.triangles_submitted, 12);
    assert!(stats.triangles_culled >= 4);
    assert!(stats.triangles_rasterized > 0);
    // the cube covers the middle of the frame
    assert_ne!(reference[24 * 64 + 32], 0);
    assert_eq!(reference[0], 0);

    for workers in [1, 2, 4, 8] {
        assert_eq!(render(workers).0, reference, "{workers} workers");
    }
}

#[test]
fn mesh_with_missing_material_is_skipped() {
    let mut model = Model::new("broken");
    let mesh = Mesh::new(
        vec![vertex(-1.0, -1.0, 0.5), vertex(1.0, -1.0, 0.5), vertex(-1.0, 1.0, 0.5)],
        vec![0, 1, 2],
        3,
    )
    .unwrap();
    model.add_node(None, "orphan", Mat4::IDENTITY, NodeKind::Mesh(mesh)).unwrap();

    let mut r = Rasterizer::new(RasterizerConfig::new(8, 8).single_threaded()).unwrap();
    r.begin_frame();
    let identity = rusterizer::CameraMatrices { view: Mat4::IDENTITY, projection: Mat4::IDENTITY };
    r.draw_model(&model, &identity);

    assert_eq!(r.stats().meshes_skipped, 1);
    assert_eq!(r.stats().triangles_submitted, 0);
    assert_untouched(&r);
}

#[test]
fn huge_texture_coordinates_are_skipped_on_every_path() {
    for workers in [0, 2] {
        let mut r = Rasterizer::new(RasterizerConfig::new(8, 8).with_workers(workers)).unwrap();
        r.begin_frame();
        let at = |x: f32, y: f32| Vertex::new(Vec3::new(x, y, 0.5), Vec3::Z, Vec2::new(1e20, 0.5));
        let (a, b, c) = (at(-1.0, -1.0), at(1.0, -1.0), at(-1.0, 1.0));
        r.draw_triangle([&a, &b, &c], &Mat4::IDENTITY, &solid([255; 4]));

        assert_eq!(r.stats().triangles_rasterized, 1, "{workers} workers");
        assert_untouched(&r);
    }
}
