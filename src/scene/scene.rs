//! Scene: the per-frame draw entry point
//!
//! A scene is a collection of models plus a background color. Every frame it
//! clears the buffers, re-sorts models by camera-space distance and draws
//! them in order: opaque front-to-back first, then transparent back-to-front.

use super::{Camera, Model, RenderSettings};
use crate::raster::{Color, FrameBuffer};
use nalgebra_glm as glm;
use std::cmp::Ordering;

pub struct Scene {
    background: Color,
    models: Vec<Model>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: Color::BLACK,
            models: Vec::new(),
        }
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn add_model(&mut self, model: Model) {
        self.models.push(model);
    }

    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn models_mut(&mut self) -> &mut [Model] {
        &mut self.models
    }

    /// Refresh camera-space distances and sort for drawing.
    ///
    /// Opaque models always precede transparent ones; opaque sort by
    /// ascending distance, transparent by descending. The sort is stable so
    /// equal keys keep their insertion order.
    pub fn sort_models(&mut self, view: &glm::Mat4) {
        for model in &mut self.models {
            let center = model.world_center();
            let view_pos = view * glm::vec4(center.x, center.y, center.z, 1.0);
            model.set_distance(-view_pos.z);
        }
        self.models.sort_by(|a, b| match (a.opaque(), b.opaque()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (true, true) => a
                .distance()
                .partial_cmp(&b.distance())
                .unwrap_or(Ordering::Equal),
            (false, false) => b
                .distance()
                .partial_cmp(&a.distance())
                .unwrap_or(Ordering::Equal),
        });
    }

    /// Clear color and depth, sort, draw every model in order
    pub fn draw_scene(&mut self, fb: &mut FrameBuffer, camera: &Camera, settings: &RenderSettings) {
        fb.clear_color(self.background);
        fb.clear_depth(1.0);
        self.sort_models(&camera.view_matrix());
        for model in &self.models {
            model.draw(fb, camera, settings);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use crate::scene::DrawMode;
    use std::rc::Rc;

    fn model_at(z: f32, opaque: bool, color: Color) -> Model {
        let mut model = Model::new(Rc::new(Mesh::cube(0.5)));
        model.set_transform(glm::translation(&glm::vec3(0.0, 0.0, z)));
        model.set_opaque(opaque);
        model.set_color(color);
        model
    }

    #[test]
    fn sort_puts_opaque_first_then_distance_rules() {
        let mut scene = Scene::new();
        // opacity [true, false, true] at distances [5, 3, 1]
        scene.add_model(model_at(-5.0, true, Color::RED));
        scene.add_model(model_at(-3.0, false, Color::GREEN));
        scene.add_model(model_at(-1.0, true, Color::BLUE));

        let mut camera = Camera::new();
        camera.set_transform(glm::vec3(0.0, 0.0, 0.0), glm::vec3(0.0, 0.0, -1.0));
        scene.sort_models(&camera.view_matrix());

        let order: Vec<Color> = scene.models().iter().map(|m| m.color()).collect();
        assert_eq!(order, vec![Color::BLUE, Color::RED, Color::GREEN]);
        assert!((scene.models()[0].distance() - 1.0).abs() < 1e-4);
        assert!((scene.models()[1].distance() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn transparent_models_sort_back_to_front() {
        let mut scene = Scene::new();
        scene.add_model(model_at(-2.0, false, Color::RED));
        scene.add_model(model_at(-8.0, false, Color::GREEN));
        scene.add_model(model_at(-4.0, false, Color::BLUE));

        let mut camera = Camera::new();
        camera.set_transform(glm::vec3(0.0, 0.0, 0.0), glm::vec3(0.0, 0.0, -1.0));
        scene.sort_models(&camera.view_matrix());

        let order: Vec<Color> = scene.models().iter().map(|m| m.color()).collect();
        assert_eq!(order, vec![Color::GREEN, Color::BLUE, Color::RED]);
    }

    #[test]
    fn draw_scene_clears_then_renders() {
        let mut scene = Scene::new();
        scene.set_background(Color::new(20, 20, 30));
        let mut model = Model::new(Rc::new(Mesh::cube(1.0)));
        model.set_color(Color::WHITE);
        scene.add_model(model);

        let mut camera = Camera::new();
        camera.set_transform(glm::vec3(3.0, 2.0, 4.0), glm::vec3(0.0, 0.0, 0.0));

        let mut fb = FrameBuffer::new(64, 64);
        scene.draw_scene(&mut fb, &camera, &RenderSettings::default());

        // corner stays background, center shows the cube
        assert_eq!(fb.pixel(0, 0), Color::new(20, 20, 30));
        assert_ne!(fb.pixel(32, 32), Color::new(20, 20, 30));
    }

    #[test]
    fn camera_inside_geometry_clips_instead_of_asserting() {
        let mut scene = Scene::new();
        scene.add_model(Model::new(Rc::new(Mesh::cube(1.0))));

        let mut camera = Camera::new();
        // inside the cube, faces straddle the near plane
        camera.set_transform(glm::vec3(0.0, 0.0, 0.5), glm::vec3(0.0, 0.0, -1.0));

        let mut fb = FrameBuffer::new(32, 32);
        for mode in [
            DrawMode::Wireframe,
            DrawMode::Fill(Default::default()),
            DrawMode::Outlined,
        ] {
            let settings = RenderSettings {
                mode,
                ..Default::default()
            };
            scene.draw_scene(&mut fb, &camera, &settings);
        }
    }

    #[test]
    fn wireframe_draws_edges_only() {
        let mut scene = Scene::new();
        let mut model = Model::new(Rc::new(Mesh::cube(1.0)));
        model.set_color(Color::GREEN);
        scene.add_model(model);

        let mut camera = Camera::new();
        camera.set_transform(glm::vec3(0.0, 0.0, 5.0), glm::vec3(0.0, 0.0, 0.0));

        let mut fb = FrameBuffer::new(64, 64);
        let settings = RenderSettings {
            mode: DrawMode::Wireframe,
            ..Default::default()
        };
        scene.draw_scene(&mut fb, &camera, &settings);

        let lit: usize = (0..64)
            .flat_map(|y| (0..64).map(move |x| (x, y)))
            .filter(|&(x, y)| fb.pixel(x, y) != Color::BLACK)
            .count();
        // edges light up a thin fraction of the raster
        assert!(lit > 0 && lit < 64 * 64 / 4);
    }
}
