//! Typed vertex-in/fragment-out shader pipeline
//!
//! A `Program` turns mesh vertices into clip-space positions plus a typed
//! varying record, and turns interpolated varyings into fragment colors.
//! The pipeline stage is generic over the varying type, so every program
//! keeps its data strongly typed end to end.
//!
//! Per triangle: vertex stage, homogeneous near-plane clip, perspective
//! divide, viewport map, backface cull by signed screen area, then a
//! barycentric walk over the clamped bounding box with perspective-correct
//! varying interpolation and depth-tested writes.

pub mod clip;

use crate::mesh::{Mesh, Vertex};
use crate::raster::{Color, FrameBuffer};
use crate::scene::Camera;
use crate::shading::Light;
use crate::texture::Texture;
use nalgebra_glm as glm;

/// Per-fragment data interpolated across a triangle
pub trait Varying: Copy {
    fn lerp(a: &Self, b: &Self, t: f32) -> Self;
    fn blend(a: &Self, b: &Self, c: &Self, weights: glm::Vec3) -> Self;
}

impl Varying for () {
    fn lerp(_: &Self, _: &Self, _: f32) -> Self {}
    fn blend(_: &Self, _: &Self, _: &Self, _: glm::Vec3) -> Self {}
}

/// The varying record used by the built-in programs
#[derive(Debug, Clone, Copy)]
pub struct StdVarying {
    pub world_pos: glm::Vec3,
    pub normal: glm::Vec3,
    pub texcoord: glm::Vec2,
}

impl Varying for StdVarying {
    fn lerp(a: &Self, b: &Self, t: f32) -> Self {
        Self {
            world_pos: a.world_pos + (b.world_pos - a.world_pos) * t,
            normal: a.normal + (b.normal - a.normal) * t,
            texcoord: a.texcoord + (b.texcoord - a.texcoord) * t,
        }
    }

    fn blend(a: &Self, b: &Self, c: &Self, w: glm::Vec3) -> Self {
        Self {
            world_pos: a.world_pos * w.x + b.world_pos * w.y + c.world_pos * w.z,
            normal: a.normal * w.x + b.normal * w.y + c.normal * w.z,
            texcoord: a.texcoord * w.x + b.texcoord * w.y + c.texcoord * w.z,
        }
    }
}

/// Uniform state shared by every vertex and fragment of a draw call
pub struct ShaderContext<'a> {
    pub model: glm::Mat4,
    pub view: glm::Mat4,
    pub projection: glm::Mat4,
    pub mvp: glm::Mat4,
    /// Inverse-transpose of the model matrix, for normals
    pub normal_matrix: glm::Mat3,
    pub camera_position: glm::Vec3,
    pub lights: &'a [Light],
    pub texture: Option<&'a Texture>,
}

impl<'a> ShaderContext<'a> {
    pub fn new(
        model: glm::Mat4,
        camera: &Camera,
        lights: &'a [Light],
        texture: Option<&'a Texture>,
    ) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let model3 = glm::mat4_to_mat3(&model);
        let normal_matrix = model3
            .try_inverse()
            .unwrap_or_else(glm::Mat3::identity)
            .transpose();
        Self {
            model,
            view,
            projection,
            mvp: projection * view * model,
            normal_matrix,
            camera_position: camera.position(),
            lights,
            texture,
        }
    }
}

/// A shader program with a typed varying record
pub trait Program {
    type V: Varying;

    /// Vertex stage: object-space vertex to clip-space position + varyings
    fn vertex(&self, vertex: &Vertex, ctx: &ShaderContext) -> (glm::Vec4, Self::V);

    /// Fragment stage: interpolated varyings (and window-space depth) to a
    /// color
    fn fragment(&self, varying: &Self::V, depth: f32, ctx: &ShaderContext) -> Color;
}

/// Map NDC to window space: y flipped, depth packed into [0, 1]
pub fn viewport_transform(ndc: &glm::Vec3, width: usize, height: usize) -> glm::Vec3 {
    glm::vec3(
        (ndc.x + 1.0) * 0.5 * width as f32,
        (1.0 - ndc.y) * 0.5 * height as f32,
        ndc.z * 0.5 + 0.5,
    )
}

#[inline]
fn edge_function(a: &glm::Vec3, b: &glm::Vec3, px: f32, py: f32) -> f32 {
    (px - a.x) * (b.y - a.y) - (py - a.y) * (b.x - a.x)
}

/// Combine screen-space barycentric weights with per-vertex 1/w into
/// perspective-correct attribute weights.
pub(crate) fn perspective_weights(bary: glm::Vec3, inv_w: [f32; 3]) -> glm::Vec3 {
    let q = glm::vec3(bary.x * inv_w[0], bary.y * inv_w[1], bary.z * inv_w[2]);
    let sum = q.x + q.y + q.z;
    if sum.abs() < 1e-12 {
        return bary;
    }
    q / sum
}

/// Run a program over a whole mesh
pub fn draw_mesh<P: Program>(
    fb: &mut FrameBuffer,
    mesh: &Mesh,
    program: &P,
    ctx: &ShaderContext,
    backface_cull: bool,
) {
    for face in &mesh.faces {
        let tri = [
            program.vertex(&mesh.vertices[face[0]], ctx),
            program.vertex(&mesh.vertices[face[1]], ctx),
            program.vertex(&mesh.vertices[face[2]], ctx),
        ];

        let clipped = clip::clip_triangle_homogeneous(&tri);
        if clipped.len() < 3 {
            continue;
        }
        for i in 1..clipped.len() - 1 {
            raster_triangle(
                fb,
                program,
                ctx,
                [&clipped[0], &clipped[i], &clipped[i + 1]],
                backface_cull,
            );
        }
    }
}

fn raster_triangle<P: Program>(
    fb: &mut FrameBuffer,
    program: &P,
    ctx: &ShaderContext,
    verts: [&(glm::Vec4, P::V); 3],
    backface_cull: bool,
) {
    let mut screen = [glm::vec3(0.0, 0.0, 0.0); 3];
    let mut inv_w = [0.0f32; 3];
    for i in 0..3 {
        let pos = verts[i].0;
        let ndc = glm::vec3(pos.x / pos.w, pos.y / pos.w, pos.z / pos.w);
        screen[i] = viewport_transform(&ndc, fb.width(), fb.height());
        inv_w[i] = 1.0 / pos.w;
    }

    let area = edge_function(&screen[0], &screen[1], screen[2].x, screen[2].y);
    if area == 0.0 {
        return;
    }
    // after the viewport y-flip, front faces have positive signed area
    if backface_cull && area < 0.0 {
        return;
    }

    let min_x = screen.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let max_x = screen.iter().map(|s| s.x).fold(f32::NEG_INFINITY, f32::max);
    let min_y = screen.iter().map(|s| s.y).fold(f32::INFINITY, f32::min);
    let max_y = screen.iter().map(|s| s.y).fold(f32::NEG_INFINITY, f32::max);

    let x_min = (min_x.floor() as i32).max(0);
    let x_max = (max_x.ceil() as i32).min(fb.width() as i32 - 1);
    let y_min = (min_y.floor() as i32).max(0);
    let y_max = (max_y.ceil() as i32).min(fb.height() as i32 - 1);

    for y in y_min..=y_max {
        for x in x_min..=x_max {
            let (px, py) = (x as f32, y as f32);
            let w0 = edge_function(&screen[1], &screen[2], px, py) / area;
            let w1 = edge_function(&screen[2], &screen[0], px, py) / area;
            let w2 = edge_function(&screen[0], &screen[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let depth = w0 * screen[0].z + w1 * screen[1].z + w2 * screen[2].z;
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }

            let weights = perspective_weights(glm::vec3(w0, w1, w2), inv_w);
            let varying = P::V::blend(&verts[0].1, &verts[1].1, &verts[2].1, weights);
            let color = program.fragment(&varying, depth, ctx);
            fb.set_pixel_with_depth(x, y, depth, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shading::UnlitProgram;

    fn unit_ctx<'a>(camera: &Camera, lights: &'a [Light]) -> ShaderContext<'a> {
        ShaderContext::new(glm::Mat4::identity(), camera, lights, None)
    }

    /// Program that passes object-space positions straight to clip space
    struct PassthroughProgram;

    impl Program for PassthroughProgram {
        type V = ();

        fn vertex(&self, vertex: &Vertex, _ctx: &ShaderContext) -> (glm::Vec4, ()) {
            let p = vertex.position;
            (glm::vec4(p.x, p.y, p.z, 1.0), ())
        }

        fn fragment(&self, _v: &(), _depth: f32, _ctx: &ShaderContext) -> Color {
            Color::WHITE
        }
    }

    #[test]
    fn fullscreen_triangle_covers_every_pixel() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.clear_depth(1.0);
        let mesh = Mesh::new(
            vec![
                Vertex::from_position(-1.0, 1.0, 0.0),
                Vertex::from_position(3.0, 1.0, 0.0),
                Vertex::from_position(-1.0, -3.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let camera = Camera::new();
        let lights: [Light; 0] = [];
        let ctx = unit_ctx(&camera, &lights);
        draw_mesh(&mut fb, &mesh, &PassthroughProgram, &ctx, false);
        for y in 0..8 {
            for x in 0..8 {
                assert_eq!(fb.pixel(x, y), Color::WHITE, "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn triangle_behind_camera_draws_nothing() {
        let mut fb = FrameBuffer::new(16, 16);
        let mesh = Mesh::new(
            vec![
                Vertex::from_position(-1.0, 0.0, 5.0),
                Vertex::from_position(1.0, 0.0, 5.0),
                Vertex::from_position(0.0, 1.0, 5.0),
            ],
            vec![[0, 1, 2]],
        );
        let mut camera = Camera::new();
        camera.set_transform(glm::vec3(0.0, 0.0, 0.0), glm::vec3(0.0, 0.0, -1.0));
        let lights: [Light; 0] = [];
        let ctx = unit_ctx(&camera, &lights);
        let program = UnlitProgram::new(Color::WHITE);
        draw_mesh(&mut fb, &mesh, &program, &ctx, false);
        for y in 0..16 {
            for x in 0..16 {
                assert_eq!(fb.pixel(x, y), Color::BLACK);
            }
        }
    }

    #[test]
    fn backface_culling_drops_reverse_winding() {
        let mesh = Mesh::new(
            vec![
                Vertex::from_position(-0.5, 0.5, 0.0),
                Vertex::from_position(0.5, 0.5, 0.0),
                Vertex::from_position(-0.5, -0.5, 0.0),
            ],
            // clockwise in NDC, i.e. back-facing
            vec![[0, 1, 2]],
        );
        let camera = Camera::new();
        let lights: [Light; 0] = [];
        let ctx = unit_ctx(&camera, &lights);

        let mut culled = FrameBuffer::new(8, 8);
        draw_mesh(&mut culled, &mesh, &PassthroughProgram, &ctx, true);
        let mut drawn = FrameBuffer::new(8, 8);
        draw_mesh(&mut drawn, &mesh, &PassthroughProgram, &ctx, false);

        let count = |fb: &FrameBuffer| {
            let mut n = 0;
            for y in 0..8 {
                for x in 0..8 {
                    if fb.pixel(x, y) != Color::BLACK {
                        n += 1;
                    }
                }
            }
            n
        };
        assert_eq!(count(&culled), 0);
        assert!(count(&drawn) > 0);
    }

    #[test]
    fn perspective_weights_match_affine_when_w_is_uniform() {
        let bary = glm::vec3(0.2, 0.3, 0.5);
        let w = perspective_weights(bary, [1.0, 1.0, 1.0]);
        assert!((w.x - 0.2).abs() < 1e-6);
        assert!((w.y - 0.3).abs() < 1e-6);
        assert!((w.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn perspective_weights_favor_near_vertices() {
        // vertex 0 is twice as close (w = 1 vs w = 2); its attribute weight
        // must grow relative to the screen-space weight
        let bary = glm::vec3(0.5, 0.5, 0.0);
        let w = perspective_weights(bary, [1.0, 0.5, 0.5]);
        assert!(w.x > 0.5);
        assert!((w.x + w.y + w.z - 1.0).abs() < 1e-6);
    }
}
