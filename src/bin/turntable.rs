//! Headless turntable renderer
//!
//! Orbits the camera around the scene target and writes one PNG per frame.
//! Usage: `turntable [scene.ron] [frames] [outdir] [supersample]`

use ember::scene::{demo_scene, load_scene};
use ember::{FrameBuffer, HEIGHT, WIDTH};
use indicatif::{ProgressBar, ProgressStyle};
use nalgebra_glm as glm;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let scene_path = args.get(1);
    let frames: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(120);
    let out_dir = args.get(3).map(String::as_str).unwrap_or("frames");
    let factor: usize = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(1);
    if !matches!(factor, 1 | 2 | 4) {
        eprintln!("supersample factor must be 1, 2 or 4");
        std::process::exit(1);
    }

    let (mut scene, mut camera, settings) = match scene_path {
        Some(path) => match load_scene(path) {
            Ok(loaded) => {
                println!("Loaded scene: {}", path);
                loaded
            }
            Err(e) => {
                eprintln!("Failed to load scene {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => demo_scene(),
    };
    camera.set_aspect(WIDTH as f32 / HEIGHT as f32);

    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {}", out_dir, e);
        std::process::exit(1);
    }

    let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
    let mut hi = (factor > 1).then(|| FrameBuffer::new(WIDTH * factor, HEIGHT * factor));

    // orbit parameters from the initial camera placement
    let target = camera.target();
    let offset = camera.position() - target;
    let radius = (offset.x * offset.x + offset.z * offset.z).sqrt().max(0.5);
    let elevation = offset.y;
    let start_angle = offset.z.atan2(offset.x);

    let progress = ProgressBar::new(frames as u64);
    if let Ok(style) =
        ProgressStyle::with_template("{bar:40} {pos}/{len} frames [{elapsed_precise}]")
    {
        progress.set_style(style);
    }

    for frame in 0..frames {
        let angle = start_angle + frame as f32 / frames as f32 * std::f32::consts::TAU;
        camera.set_transform(
            target + glm::vec3(radius * angle.cos(), elevation, radius * angle.sin()),
            target,
        );

        match hi.as_mut() {
            Some(hi_fb) => {
                scene.draw_scene(hi_fb, &camera, &settings);
                fb.resolve_from(hi_fb, factor);
            }
            None => scene.draw_scene(&mut fb, &camera, &settings),
        }

        let path = format!("{}/frame_{:04}.png", out_dir, frame);
        if let Err(e) = image::save_buffer(
            &path,
            fb.color_bytes(),
            WIDTH as u32,
            HEIGHT as u32,
            image::ExtendedColorType::Rgb8,
        ) {
            eprintln!("Failed to write {}: {}", path, e);
            std::process::exit(1);
        }
        progress.inc(1);
    }

    progress.finish();
    println!("Rendered {} frames to {}/", frames, out_dir);
}
