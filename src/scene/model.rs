//! Drawable model and its draw call
//!
//! A model pairs a shared mesh with its own world transform, a base color
//! and an opacity flag used by scene sorting. The draw call runs the simple
//! path: model-view transform, near-plane clip, perspective divide, viewport
//! map, viewport clip, then wireframe lines or one triangle fill per face.
//! Only the frame buffer is mutated.

use crate::mesh::Mesh;
use crate::pipeline::clip::{clip_polygon_near, clip_polygon_rect};
use crate::pipeline::viewport_transform;
use crate::raster::{
    draw_line, draw_triangle_outlined, fill_triangle, Color, FillStrategy, FrameBuffer,
};
use crate::scene::Camera;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// How the simple draw path renders each face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawMode {
    Wireframe,
    Fill(FillStrategy),
    /// Edge-table fill with a darkened outline from the same edge walk
    Outlined,
}

/// Settings for the simple draw path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSettings {
    pub mode: DrawMode,
    pub backface_cull: bool,
    /// One lighting term per face from the world-space face normal
    pub flat_shade: bool,
    pub light_dir: glm::Vec3,
    pub ambient: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            mode: DrawMode::Fill(FillStrategy::default()),
            backface_cull: true,
            flat_shade: true,
            light_dir: glm::normalize(&glm::vec3(-1.0, -1.0, -1.0)),
            ambient: 0.3,
        }
    }
}

pub struct Model {
    mesh: Rc<Mesh>,
    transform: glm::Mat4,
    color: Color,
    opaque: bool,
    /// Camera-space distance, refreshed by scene sorting each frame
    distance: f32,
}

impl Model {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        Self {
            mesh,
            transform: glm::Mat4::identity(),
            color: Color::WHITE,
            opaque: true,
            distance: 0.0,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn transform(&self) -> glm::Mat4 {
        self.transform
    }

    pub fn set_transform(&mut self, transform: glm::Mat4) {
        self.transform = transform;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn opaque(&self) -> bool {
        self.opaque
    }

    pub fn set_opaque(&mut self, opaque: bool) {
        self.opaque = opaque;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub(crate) fn set_distance(&mut self, distance: f32) {
        self.distance = distance;
    }

    /// World-space center of the mesh under this model's transform
    pub fn world_center(&self) -> glm::Vec3 {
        let c = self.mesh.center();
        let w = self.transform * glm::vec4(c.x, c.y, c.z, 1.0);
        glm::vec3(w.x, w.y, w.z)
    }

    /// Render every face of the mesh into the frame buffer
    pub fn draw(&self, fb: &mut FrameBuffer, camera: &Camera, settings: &RenderSettings) {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let model_view = view * self.transform;
        let light = glm::normalize(&settings.light_dir);

        for face in &self.mesh.faces {
            let mut world = [glm::vec3(0.0, 0.0, 0.0); 3];
            let mut cam = [glm::vec3(0.0, 0.0, 0.0); 3];
            for (i, &vi) in face.iter().enumerate() {
                let p = self.mesh.vertices[vi].position;
                let p4 = glm::vec4(p.x, p.y, p.z, 1.0);
                let w = self.transform * p4;
                world[i] = glm::vec3(w.x, w.y, w.z);
                let c = model_view * p4;
                cam[i] = glm::vec3(c.x, c.y, c.z);
            }

            // near-plane pre-pass: nothing behind the eye reaches the divide
            let clipped = clip_polygon_near(&cam, camera.near());
            if clipped.len() < 3 {
                continue;
            }

            let screen: Vec<glm::Vec2> = clipped
                .iter()
                .map(|v| {
                    let c = projection * glm::vec4(v.x, v.y, v.z, 1.0);
                    let ndc = glm::vec3(c.x / c.w, c.y / c.w, c.z / c.w);
                    let s = viewport_transform(&ndc, fb.width(), fb.height());
                    glm::vec2(s.x, s.y)
                })
                .collect();

            let wireframe = settings.mode == DrawMode::Wireframe;
            if settings.backface_cull && !wireframe && polygon_area2(&screen) <= 0.0 {
                continue;
            }

            // clamp away the float residue rect clipping can leave on the
            // boundary; the rasterizer asserts on anything outside
            let (w, h) = (fb.width() as f32, fb.height() as f32);
            let screen: Vec<glm::Vec2> = clip_polygon_rect(&screen, w, h)
                .into_iter()
                .map(|v| glm::vec2(v.x.clamp(0.0, w), v.y.clamp(0.0, h)))
                .collect();
            if screen.len() < 3 {
                continue;
            }

            let color = if settings.flat_shade && !wireframe {
                let normal = glm::cross(&(world[1] - world[0]), &(world[2] - world[0]));
                let len = glm::length(&normal);
                if len > 1e-12 {
                    let diffuse = glm::dot(&(normal / len), &-light).max(0.0);
                    self.color
                        .shade(settings.ambient + (1.0 - settings.ambient) * diffuse)
                } else {
                    self.color
                }
            } else {
                self.color
            };

            match settings.mode {
                DrawMode::Wireframe => {
                    for i in 0..screen.len() {
                        draw_line(fb, screen[i], screen[(i + 1) % screen.len()], color);
                    }
                }
                DrawMode::Fill(strategy) => {
                    for i in 1..screen.len() - 1 {
                        fill_triangle(fb, strategy, screen[0], screen[i], screen[i + 1], color);
                    }
                }
                DrawMode::Outlined => {
                    let outline = color.shade(0.25);
                    for i in 1..screen.len() - 1 {
                        draw_triangle_outlined(
                            fb,
                            screen[0],
                            screen[i],
                            screen[i + 1],
                            color,
                            outline,
                        );
                    }
                }
            }
        }
    }
}

/// Twice the signed area of a screen-space polygon. Positive for front
/// faces under the pipeline's winding convention (counter-clockwise in NDC).
fn polygon_area2(poly: &[glm::Vec2]) -> f32 {
    let mut sum = 0.0;
    for i in 0..poly.len() {
        let a = poly[i];
        let b = poly[(i + 1) % poly.len()];
        // y-down screen space flips the usual shoelace sign
        sum += a.y * b.x - a.x * b.y;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn front_face_area_is_positive() {
        // NDC counter-clockwise maps to this screen-space order (y down)
        let poly = [
            glm::vec2(10.0, 30.0),
            glm::vec2(30.0, 30.0),
            glm::vec2(10.0, 10.0),
        ];
        assert!(polygon_area2(&poly) > 0.0);
        let reversed = [poly[2], poly[1], poly[0]];
        assert!(polygon_area2(&reversed) < 0.0);
    }

    #[test]
    fn default_settings_use_the_production_strategy() {
        let settings = RenderSettings::default();
        assert_eq!(settings.mode, DrawMode::Fill(FillStrategy::EdgeTable));
        assert!(settings.backface_cull);
    }
}
