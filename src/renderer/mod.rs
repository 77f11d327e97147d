//! WebGPU rendering for the grass field

pub mod grass_pipeline;
pub mod mesh;
pub mod vertex;

pub use grass_pipeline::{GrassRenderState, OrbitCamera};
pub use mesh::{GrassMesh, build_grass_mesh};
pub use vertex::GrassVertex;
