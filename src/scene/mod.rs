//! Scene composition
//!
//! Cameras, models and the per-frame draw orchestration: clear, depth-sort,
//! draw each model in order. Scene descriptions live in RON files.

mod camera;
mod file;
mod model;
#[allow(clippy::module_inception)]
mod scene;

pub use camera::Camera;
pub use file::{load_scene, load_scene_from_str, save_scene, SceneError, SceneFile};
pub use model::{DrawMode, Model, RenderSettings};
pub use scene::Scene;

use crate::mesh::Mesh;
use crate::raster::Color;
use nalgebra_glm as glm;
use std::rc::Rc;

/// Built-in demo scene: two cubes over a ground slab, used by the binaries
/// when no scene file is given.
pub fn demo_scene() -> (Scene, Camera, RenderSettings) {
    let mut scene = Scene::new();
    scene.set_background(Color::new(25, 25, 35));

    let mut ground = Model::new(Rc::new(Mesh::cube(1.0)));
    ground.set_transform(
        glm::translation(&glm::vec3(0.0, -1.7, 0.0)) * glm::scaling(&glm::vec3(3.0, 0.1, 3.0)),
    );
    ground.set_color(Color::new(70, 80, 90));
    scene.add_model(ground);

    let mut cube = Model::new(Rc::new(Mesh::cube(1.0)));
    cube.set_color(Color::new(200, 120, 80));
    scene.add_model(cube);

    let mut glass = Model::new(Rc::new(Mesh::cube(0.6)));
    glass.set_transform(
        glm::translation(&glm::vec3(1.8, 0.2, 0.8))
            * glm::rotation(0.6, &glm::vec3(0.0, 1.0, 0.0)),
    );
    glass.set_color(Color::new(120, 170, 220));
    glass.set_opaque(false);
    scene.add_model(glass);

    let mut camera = Camera::new();
    camera.set_transform(glm::vec3(4.0, 2.5, 5.0), glm::vec3(0.0, 0.0, 0.0));

    (scene, camera, RenderSettings::default())
}
