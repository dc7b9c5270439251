//! Ember Engine viewer
//!
//! Interactive window over the software rasterizer. The platform layer only
//! blits the frame buffer's color bytes to the screen; every pixel is drawn
//! on the CPU.
//!
//! Controls:
//! - drag: orbit camera, scroll: dolly
//! - 1-4: fill strategy (standard / barycentric / bresenham / edge-table)
//! - W: wireframe, O: outlined, F: back to fill
//! - B: toggle backface culling
//! - P: toggle the Blinn-Phong shader pipeline
//! - S: save screenshot.png

use ember::pipeline::{draw_mesh, ShaderContext};
use ember::raster::{draw_integer, draw_text, Color as RasterColor};
use ember::scene::{demo_scene, load_scene, DrawMode};
use ember::shading::{BlinnPhongProgram, Light};
use ember::{FillStrategy, FrameBuffer, HEIGHT, WIDTH};
use macroquad::prelude::*;
use nalgebra_glm as glm;

fn window_conf() -> Conf {
    Conf {
        window_title: format!("Ember Engine v{}", ember::VERSION),
        window_width: WIDTH as i32,
        window_height: HEIGHT as i32,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn mode_label(mode: DrawMode, shaded: bool) -> &'static str {
    if shaded {
        return "blinn-phong";
    }
    match mode {
        DrawMode::Wireframe => "wireframe",
        DrawMode::Fill(strategy) => strategy.label(),
        DrawMode::Outlined => "outlined",
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let mut fb = FrameBuffer::new(WIDTH, HEIGHT);

    let args: Vec<String> = std::env::args().collect();
    let (mut scene, mut camera, mut settings) = match args.get(1) {
        Some(path) => match load_scene(path) {
            Ok(loaded) => {
                println!("Loaded scene: {}", path);
                loaded
            }
            Err(e) => {
                eprintln!("Failed to load scene {}: {}", path, e);
                demo_scene()
            }
        },
        None => demo_scene(),
    };
    camera.set_aspect(WIDTH as f32 / HEIGHT as f32);

    let lights = vec![
        Light::ambient(glm::vec3(0.15, 0.15, 0.18)),
        Light::directional(glm::vec3(-1.0, -1.0, -0.5), glm::vec3(0.9, 0.9, 0.85)),
        Light::point(glm::vec3(2.5, 3.0, 2.0), glm::vec3(0.5, 0.4, 0.3)),
    ];

    let mut shaded = false;
    let mut rgba = vec![0u8; WIDTH * HEIGHT * 4];
    let mut last_mouse: Option<(f32, f32)> = None;

    println!("=== Ember Engine ===");

    loop {
        // input
        if is_key_pressed(KeyCode::Key1) {
            settings.mode = DrawMode::Fill(FillStrategy::Standard);
        }
        if is_key_pressed(KeyCode::Key2) {
            settings.mode = DrawMode::Fill(FillStrategy::Barycentric);
        }
        if is_key_pressed(KeyCode::Key3) {
            settings.mode = DrawMode::Fill(FillStrategy::Bresenham);
        }
        if is_key_pressed(KeyCode::Key4) || is_key_pressed(KeyCode::F) {
            settings.mode = DrawMode::Fill(FillStrategy::EdgeTable);
        }
        if is_key_pressed(KeyCode::W) {
            settings.mode = DrawMode::Wireframe;
        }
        if is_key_pressed(KeyCode::O) {
            settings.mode = DrawMode::Outlined;
        }
        if is_key_pressed(KeyCode::B) {
            settings.backface_cull = !settings.backface_cull;
            println!("backface culling: {}", settings.backface_cull);
        }
        if is_key_pressed(KeyCode::P) {
            shaded = !shaded;
        }
        if is_key_pressed(KeyCode::S) {
            match image::save_buffer(
                "screenshot.png",
                fb.color_bytes(),
                WIDTH as u32,
                HEIGHT as u32,
                image::ExtendedColorType::Rgb8,
            ) {
                Ok(()) => println!("Saved screenshot.png"),
                Err(e) => eprintln!("Screenshot failed: {}", e),
            }
        }

        let scroll = mouse_wheel().1;
        if scroll.abs() > 0.0 {
            camera.dolly(-scroll * 0.4);
        }
        let (mx, my) = mouse_position();
        if is_mouse_button_down(MouseButton::Left) {
            if let Some((lx, ly)) = last_mouse {
                camera.rotate_by_drag(my - ly, mx - lx);
            }
            last_mouse = Some((mx, my));
        } else {
            last_mouse = None;
        }

        // render
        if shaded {
            fb.clear_color(scene.background());
            fb.clear_depth(1.0);
            scene.sort_models(&camera.view_matrix());
            for model in scene.models() {
                let program = BlinnPhongProgram::new(model.color());
                let ctx = ShaderContext::new(model.transform(), &camera, &lights, None);
                draw_mesh(&mut fb, model.mesh(), &program, &ctx, settings.backface_cull);
            }
        } else {
            scene.draw_scene(&mut fb, &camera, &settings);
        }

        // stats overlay
        draw_text(&mut fb, 8.0, 8.0, mode_label(settings.mode, shaded), 6.0, RasterColor::WHITE);
        draw_integer(&mut fb, 8.0, 24.0, get_fps() as i64, 6.0, RasterColor::WHITE);

        // blit the packed RGB buffer through a transient RGBA texture
        for (i, px) in fb.color_bytes().chunks_exact(3).enumerate() {
            rgba[i * 4..i * 4 + 3].copy_from_slice(px);
            rgba[i * 4 + 3] = 255;
        }
        let texture = Texture2D::from_rgba8(WIDTH as u16, HEIGHT as u16, &rgba);
        texture.set_filter(FilterMode::Nearest);
        draw_texture_ex(
            &texture,
            0.0,
            0.0,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(screen_width(), screen_height())),
                ..Default::default()
            },
        );

        next_frame().await;
    }
}
