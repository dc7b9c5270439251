//! Ember Engine: a CPU-only software rasterization pipeline
//!
//! Converts 3D triangle meshes into colored pixels in a frame buffer
//! without touching any GPU API:
//! - Packed-RGB frame buffer with a float depth buffer
//! - Four interchangeable triangle fill strategies (scanline, barycentric,
//!   dual Bresenham, edge-table)
//! - Depth-sorted scene composition with opaque/transparent ordering
//! - A typed vertex-in/fragment-out shader pipeline with near-plane clipping
//!   and perspective-correct attribute interpolation

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod mesh;
pub mod pipeline;
pub mod raster;
pub mod scene;
pub mod shading;
pub mod texture;

pub use mesh::{Aabb, Mesh, Vertex};
pub use raster::{Color, FillStrategy, FrameBuffer};
pub use scene::{Camera, DrawMode, Model, RenderSettings, Scene};

/// Default raster target dimensions
pub const WIDTH: usize = 640;
pub const HEIGHT: usize = 480;
