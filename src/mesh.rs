//! Triangle mesh container and OBJ loading
//!
//! A mesh owns uniform vertices (position, normal, texcoord) and a face
//! index list. Loading goes through tobj with triangulation and a single
//! index per vertex, so every face is exactly three indices.

use nalgebra_glm as glm;
use std::path::Path;

/// A vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: glm::Vec3,
    pub normal: glm::Vec3,
    pub texcoord: glm::Vec2,
}

impl Vertex {
    pub fn new(position: glm::Vec3, normal: glm::Vec3, texcoord: glm::Vec2) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }

    pub fn from_position(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: glm::vec3(x, y, z),
            normal: glm::vec3(0.0, 0.0, 0.0),
            texcoord: glm::vec2(0.0, 0.0),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: glm::Vec3,
    pub max: glm::Vec3,
}

impl Aabb {
    pub fn new(min: glm::Vec3, max: glm::Vec3) -> Self {
        Self { min, max }
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: glm::Vec3) {
        self.min = glm::vec3(
            self.min.x.min(point.x),
            self.min.y.min(point.y),
            self.min.z.min(point.z),
        );
        self.max = glm::vec3(
            self.max.x.max(point.x),
            self.max.y.max(point.y),
            self.max.z.max(point.z),
        );
    }

    pub fn center(&self) -> glm::Vec3 {
        (self.min + self.max) * 0.5
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self {
            min: glm::vec3(0.0, 0.0, 0.0),
            max: glm::vec3(0.0, 0.0, 0.0),
        }
    }
}

/// Shared triangle mesh
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<[usize; 3]>,
    pub has_normals: bool,
    pub has_texcoords: bool,
    bounds: Aabb,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>, faces: Vec<[usize; 3]>) -> Self {
        let mut mesh = Self {
            vertices,
            faces,
            has_normals: false,
            has_texcoords: false,
            bounds: Aabb::default(),
        };
        mesh.recompute_bounds();
        mesh
    }

    /// Load a mesh from an OBJ file
    pub fn from_obj<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|e| format!("Failed to load {}: {}", path.display(), e))?;

        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        let mut has_normals = true;
        let mut has_texcoords = true;

        for model in models {
            let m = model.mesh;
            let base = vertices.len();
            has_normals &= !m.normals.is_empty();
            has_texcoords &= !m.texcoords.is_empty();

            for (i, pos) in m.positions.chunks(3).enumerate() {
                let normal = m
                    .normals
                    .chunks(3)
                    .nth(i)
                    .map(|n| glm::vec3(n[0], n[1], n[2]))
                    .unwrap_or_else(|| glm::vec3(0.0, 0.0, 0.0));
                let texcoord = m
                    .texcoords
                    .chunks(2)
                    .nth(i)
                    .map(|t| glm::vec2(t[0], 1.0 - t[1]))
                    .unwrap_or_else(|| glm::vec2(0.0, 0.0));
                vertices.push(Vertex::new(glm::vec3(pos[0], pos[1], pos[2]), normal, texcoord));
            }
            for face in m.indices.chunks(3) {
                if face.len() == 3 {
                    faces.push([
                        base + face[0] as usize,
                        base + face[1] as usize,
                        base + face[2] as usize,
                    ]);
                }
            }
        }

        let mut mesh = Mesh::new(vertices, faces);
        mesh.has_normals = has_normals;
        mesh.has_texcoords = has_texcoords;
        if !mesh.has_normals {
            mesh.compute_vertex_normals();
        }

        println!(
            "Loaded mesh: {} ({} vertices, {} faces)",
            path.display(),
            mesh.vertices.len(),
            mesh.faces.len()
        );
        Ok(mesh)
    }

    /// Axis-aligned cube centered on the origin, two triangles per side
    pub fn cube(half: f32) -> Self {
        let face_data: [(glm::Vec3, [glm::Vec3; 4]); 6] = [
            (
                glm::vec3(0.0, 0.0, 1.0),
                [
                    glm::vec3(-1.0, -1.0, 1.0),
                    glm::vec3(1.0, -1.0, 1.0),
                    glm::vec3(1.0, 1.0, 1.0),
                    glm::vec3(-1.0, 1.0, 1.0),
                ],
            ),
            (
                glm::vec3(0.0, 0.0, -1.0),
                [
                    glm::vec3(1.0, -1.0, -1.0),
                    glm::vec3(-1.0, -1.0, -1.0),
                    glm::vec3(-1.0, 1.0, -1.0),
                    glm::vec3(1.0, 1.0, -1.0),
                ],
            ),
            (
                glm::vec3(0.0, 1.0, 0.0),
                [
                    glm::vec3(-1.0, 1.0, 1.0),
                    glm::vec3(1.0, 1.0, 1.0),
                    glm::vec3(1.0, 1.0, -1.0),
                    glm::vec3(-1.0, 1.0, -1.0),
                ],
            ),
            (
                glm::vec3(0.0, -1.0, 0.0),
                [
                    glm::vec3(-1.0, -1.0, -1.0),
                    glm::vec3(1.0, -1.0, -1.0),
                    glm::vec3(1.0, -1.0, 1.0),
                    glm::vec3(-1.0, -1.0, 1.0),
                ],
            ),
            (
                glm::vec3(1.0, 0.0, 0.0),
                [
                    glm::vec3(1.0, -1.0, 1.0),
                    glm::vec3(1.0, -1.0, -1.0),
                    glm::vec3(1.0, 1.0, -1.0),
                    glm::vec3(1.0, 1.0, 1.0),
                ],
            ),
            (
                glm::vec3(-1.0, 0.0, 0.0),
                [
                    glm::vec3(-1.0, -1.0, -1.0),
                    glm::vec3(-1.0, -1.0, 1.0),
                    glm::vec3(-1.0, 1.0, 1.0),
                    glm::vec3(-1.0, 1.0, -1.0),
                ],
            ),
        ];
        let uvs = [
            glm::vec2(0.0, 0.0),
            glm::vec2(1.0, 0.0),
            glm::vec2(1.0, 1.0),
            glm::vec2(0.0, 1.0),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut faces = Vec::with_capacity(12);
        for (normal, corners) in face_data {
            let base = vertices.len();
            for (corner, uv) in corners.iter().zip(uvs.iter()) {
                vertices.push(Vertex::new(corner * half, normal, *uv));
            }
            faces.push([base, base + 1, base + 2]);
            faces.push([base, base + 2, base + 3]);
        }

        let mut mesh = Mesh::new(vertices, faces);
        mesh.has_normals = true;
        mesh.has_texcoords = true;
        mesh
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn center(&self) -> glm::Vec3 {
        self.bounds.center()
    }

    fn recompute_bounds(&mut self) {
        let mut bounds = match self.vertices.first() {
            Some(v) => Aabb::new(v.position, v.position),
            None => Aabb::default(),
        };
        for v in &self.vertices {
            bounds.expand(v.position);
        }
        self.bounds = bounds;
    }

    /// Rebuild vertex normals by accumulating area-weighted face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![glm::vec3(0.0, 0.0, 0.0); self.vertices.len()];
        for face in &self.faces {
            let [a, b, c] = *face;
            let edge1 = self.vertices[b].position - self.vertices[a].position;
            let edge2 = self.vertices[c].position - self.vertices[a].position;
            // cross product length carries the area weighting
            let face_normal = glm::cross(&edge1, &edge2);
            normals[a] += face_normal;
            normals[b] += face_normal;
            normals[c] += face_normal;
        }
        for (v, n) in self.vertices.iter_mut().zip(normals) {
            let len = glm::length(&n);
            v.normal = if len > 1e-12 { n / len } else { glm::vec3(0.0, 1.0, 0.0) };
        }
        self.has_normals = true;
    }
}
