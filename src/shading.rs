//! Lights and built-in shader programs
//!
//! Lights are a tagged variant with one uniform contract:
//! `evaluate(normal, frag_pos, view_dir)` yields diffuse and specular terms.
//! Shading is Blinn-Phong (halfway vector, shininess 32).

use crate::mesh::Vertex;
use crate::pipeline::{Program, ShaderContext, StdVarying};
use crate::raster::Color;
use nalgebra_glm as glm;

const SHININESS: f32 = 32.0;

/// Diffuse and specular contributions of one light
#[derive(Debug, Clone, Copy, Default)]
pub struct LightingComponents {
    pub diffuse: glm::Vec3,
    pub specular: glm::Vec3,
}

/// Light source variants sharing the `evaluate` contract
#[derive(Debug, Clone)]
pub enum Light {
    Directional {
        direction: glm::Vec3,
        diffuse: glm::Vec3,
        specular: glm::Vec3,
    },
    Point {
        position: glm::Vec3,
        diffuse: glm::Vec3,
        specular: glm::Vec3,
        constant: f32,
        linear: f32,
        quadratic: f32,
    },
    /// Constant environment term, diffuse only
    Ambient { color: glm::Vec3 },
}

impl Light {
    pub fn directional(direction: glm::Vec3, color: glm::Vec3) -> Self {
        Light::Directional {
            direction: glm::normalize(&direction),
            diffuse: color,
            specular: color,
        }
    }

    pub fn point(position: glm::Vec3, color: glm::Vec3) -> Self {
        Light::Point {
            position,
            diffuse: color,
            specular: color,
            constant: 1.0,
            linear: 0.1,
            quadratic: 0.01,
        }
    }

    pub fn ambient(color: glm::Vec3) -> Self {
        Light::Ambient { color }
    }

    /// Lighting contribution at a surface point
    pub fn evaluate(
        &self,
        normal: glm::Vec3,
        frag_pos: glm::Vec3,
        view_dir: glm::Vec3,
    ) -> LightingComponents {
        let normal = glm::normalize(&normal);
        match self {
            Light::Directional {
                direction,
                diffuse,
                specular,
            } => {
                let lambertian = glm::dot(&-direction, &normal).max(0.0);
                let halfway = glm::normalize(&(-direction + view_dir));
                let spec = glm::dot(&normal, &halfway).max(0.0).powf(SHININESS);
                LightingComponents {
                    diffuse: diffuse * lambertian,
                    specular: specular * spec,
                }
            }
            Light::Point {
                position,
                diffuse,
                specular,
                constant,
                linear,
                quadratic,
            } => {
                let to_light = position - frag_pos;
                let distance = glm::length(&to_light);
                let light_dir = to_light / distance.max(1e-6);
                let lambertian = glm::dot(&light_dir, &normal).max(0.0);
                let halfway = glm::normalize(&(light_dir + view_dir));
                let spec = glm::dot(&normal, &halfway).max(0.0).powf(SHININESS);
                let attenuation =
                    1.0 / (constant + linear * distance + quadratic * distance * distance);
                LightingComponents {
                    diffuse: diffuse * lambertian * attenuation,
                    specular: specular * spec * attenuation,
                }
            }
            Light::Ambient { color } => LightingComponents {
                diffuse: *color,
                specular: glm::vec3(0.0, 0.0, 0.0),
            },
        }
    }
}

/// Sum every light's contribution at a surface point
pub fn accumulate_lights(
    lights: &[Light],
    normal: glm::Vec3,
    frag_pos: glm::Vec3,
    view_dir: glm::Vec3,
) -> LightingComponents {
    let mut total = LightingComponents::default();
    for light in lights {
        let comp = light.evaluate(normal, frag_pos, view_dir);
        total.diffuse += comp.diffuse;
        total.specular += comp.specular;
    }
    total
}

fn standard_vertex(vertex: &Vertex, ctx: &ShaderContext) -> (glm::Vec4, StdVarying) {
    let p = vertex.position;
    let clip = ctx.mvp * glm::vec4(p.x, p.y, p.z, 1.0);
    let world = ctx.model * glm::vec4(p.x, p.y, p.z, 1.0);
    let varying = StdVarying {
        world_pos: glm::vec3(world.x, world.y, world.z),
        normal: ctx.normal_matrix * vertex.normal,
        texcoord: vertex.texcoord,
    };
    (clip, varying)
}

fn base_color(v: &StdVarying, fallback: Color, ctx: &ShaderContext) -> Color {
    match ctx.texture {
        Some(tex) => tex.sample_bilinear(v.texcoord.x, v.texcoord.y),
        None => fallback,
    }
}

/// Raw base color or texture, no lighting
pub struct UnlitProgram {
    pub color: Color,
}

impl UnlitProgram {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

impl Program for UnlitProgram {
    type V = StdVarying;

    fn vertex(&self, vertex: &Vertex, ctx: &ShaderContext) -> (glm::Vec4, StdVarying) {
        standard_vertex(vertex, ctx)
    }

    fn fragment(&self, v: &StdVarying, _depth: f32, ctx: &ShaderContext) -> Color {
        base_color(v, self.color, ctx)
    }
}

/// Blinn-Phong lit surface over a base color or texture
pub struct BlinnPhongProgram {
    pub color: Color,
    pub diffuse_strength: f32,
    pub specular_strength: f32,
}

impl BlinnPhongProgram {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            diffuse_strength: 1.0,
            specular_strength: 0.8,
        }
    }
}

impl Program for BlinnPhongProgram {
    type V = StdVarying;

    fn vertex(&self, vertex: &Vertex, ctx: &ShaderContext) -> (glm::Vec4, StdVarying) {
        standard_vertex(vertex, ctx)
    }

    fn fragment(&self, v: &StdVarying, _depth: f32, ctx: &ShaderContext) -> Color {
        let base = base_color(v, self.color, ctx);
        let albedo = glm::vec3(
            base.r as f32 / 255.0,
            base.g as f32 / 255.0,
            base.b as f32 / 255.0,
        );
        let view_dir = glm::normalize(&(ctx.camera_position - v.world_pos));
        let comp = accumulate_lights(ctx.lights, v.normal, v.world_pos, view_dir);
        let lit = glm::vec3(
            albedo.x * comp.diffuse.x,
            albedo.y * comp.diffuse.y,
            albedo.z * comp.diffuse.z,
        ) * self.diffuse_strength
            + comp.specular * self.specular_strength;
        Color::from_unit(lit.x, lit.y, lit.z)
    }
}

/// Visualizes window-space depth as grayscale (near = white)
pub struct DepthProgram;

impl Program for DepthProgram {
    type V = StdVarying;

    fn vertex(&self, vertex: &Vertex, ctx: &ShaderContext) -> (glm::Vec4, StdVarying) {
        standard_vertex(vertex, ctx)
    }

    fn fragment(&self, _v: &StdVarying, depth: f32, _ctx: &ShaderContext) -> Color {
        let shade = 1.0 - depth.clamp(0.0, 1.0);
        Color::from_unit(shade, shade, shade)
    }
}
