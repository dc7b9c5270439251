//! Scene loading and saving
//!
//! Uses RON (Rusty Object Notation) for human-readable scene files. A scene
//! document carries the background, the camera placement, render settings
//! and a model list; meshes referenced by path are loaded once and shared.

use super::{Camera, Model, RenderSettings, Scene};
use crate::mesh::Mesh;
use crate::raster::Color;
use nalgebra_glm as glm;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Error type for scene loading
#[derive(Debug)]
pub enum SceneError {
    IoError(std::io::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    MeshError(String),
}

impl From<std::io::Error> for SceneError {
    fn from(e: std::io::Error) -> Self {
        SceneError::IoError(e)
    }
}

impl From<ron::error::SpannedError> for SceneError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneError::ParseError(e)
    }
}

impl From<ron::Error> for SceneError {
    fn from(e: ron::Error) -> Self {
        SceneError::SerializeError(e)
    }
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::IoError(e) => write!(f, "IO error: {}", e),
            SceneError::ParseError(e) => write!(f, "Parse error: {}", e),
            SceneError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            SceneError::MeshError(e) => write!(f, "Mesh error: {}", e),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [3.0, 2.0, 4.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MeshSource {
    /// Path to an OBJ file, relative to the working directory
    Obj(String),
    /// Builtin cube with the given half-extent
    Cube { half: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub source: MeshSource,
    #[serde(default)]
    pub translate: [f32; 3],
    #[serde(default)]
    pub rotate_y_degrees: f32,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default = "default_color")]
    pub color: Color,
    #[serde(default = "default_opaque")]
    pub opaque: bool,
}

fn default_scale() -> f32 {
    1.0
}

fn default_color() -> Color {
    Color::WHITE
}

fn default_opaque() -> bool {
    true
}

/// On-disk scene description
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    pub background: Color,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub settings: RenderSettings,
    pub models: Vec<ModelConfig>,
}

/// Build runtime objects from a parsed scene document
pub fn build_scene(file: &SceneFile) -> Result<(Scene, Camera, RenderSettings), SceneError> {
    let mut scene = Scene::new();
    scene.set_background(file.background);

    // meshes referenced by the same path are shared
    let mut obj_cache: HashMap<String, Rc<Mesh>> = HashMap::new();

    for config in &file.models {
        let mesh = match &config.source {
            MeshSource::Obj(path) => match obj_cache.get(path) {
                Some(mesh) => Rc::clone(mesh),
                None => {
                    let mesh = Rc::new(Mesh::from_obj(path).map_err(SceneError::MeshError)?);
                    obj_cache.insert(path.clone(), Rc::clone(&mesh));
                    mesh
                }
            },
            MeshSource::Cube { half } => Rc::new(Mesh::cube(*half)),
        };

        let transform = glm::translation(&glm::make_vec3(&config.translate))
            * glm::rotation(config.rotate_y_degrees.to_radians(), &glm::vec3(0.0, 1.0, 0.0))
            * glm::scaling(&glm::vec3(config.scale, config.scale, config.scale));

        let mut model = Model::new(mesh);
        model.set_transform(transform);
        model.set_color(config.color);
        model.set_opaque(config.opaque);
        scene.add_model(model);
    }

    let mut camera = Camera::new();
    camera.set_transform(
        glm::make_vec3(&file.camera.position),
        glm::make_vec3(&file.camera.target),
    );
    camera.set_fov(file.camera.fov_degrees.to_radians());

    Ok((scene, camera, file.settings.clone()))
}

/// Load a scene from a RON file
pub fn load_scene<P: AsRef<Path>>(path: P) -> Result<(Scene, Camera, RenderSettings), SceneError> {
    let contents = fs::read_to_string(path)?;
    let file: SceneFile = ron::from_str(&contents)?;
    build_scene(&file)
}

/// Load a scene from a RON string (for embedded scenes or testing)
pub fn load_scene_from_str(s: &str) -> Result<(Scene, Camera, RenderSettings), SceneError> {
    let file: SceneFile = ron::from_str(s)?;
    build_scene(&file)
}

/// Save a scene description to a RON file
pub fn save_scene<P: AsRef<Path>>(file: &SceneFile, path: P) -> Result<(), SceneError> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    let contents = ron::ser::to_string_pretty(file, config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_CUBES: &str = r#"(
        background: (r: 20, g: 20, b: 30),
        models: [
            (
                source: Cube(half: 1.0),
                color: (r: 200, g: 80, b: 80),
            ),
            (
                source: Cube(half: 0.5),
                translate: [2.0, 0.0, 0.0],
                rotate_y_degrees: 45.0,
                opaque: false,
            ),
        ],
    )"#;

    #[test]
    fn parses_scene_with_defaults() {
        let (scene, camera, settings) = load_scene_from_str(TWO_CUBES).expect("valid scene");
        assert_eq!(scene.models().len(), 2);
        assert_eq!(scene.background(), Color::new(20, 20, 30));
        assert_eq!(scene.models()[0].color(), Color::new(200, 80, 80));
        assert!(!scene.models()[1].opaque());
        assert!((camera.fov() - 60.0f32.to_radians()).abs() < 1e-6);
        assert!(settings.backface_cull);
    }

    #[test]
    fn transform_places_translated_model() {
        let (scene, _, _) = load_scene_from_str(TWO_CUBES).expect("valid scene");
        let center = scene.models()[1].world_center();
        assert!((center.x - 2.0).abs() < 1e-5);
        assert!(center.y.abs() < 1e-5);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let result = load_scene_from_str("(background: oops");
        assert!(matches!(result, Err(SceneError::ParseError(_))));
    }

    #[test]
    fn document_roundtrips_through_ron() {
        let file: SceneFile = ron::from_str(TWO_CUBES).expect("parse");
        let text = ron::ser::to_string_pretty(&file, ron::ser::PrettyConfig::default())
            .expect("serialize");
        let reparsed: SceneFile = ron::from_str(&text).expect("reparse");
        assert_eq!(reparsed.models.len(), file.models.len());
        assert_eq!(reparsed.background, file.background);
    }
}
