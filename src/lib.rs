//! # Phong Sphere
//!
//! A minimal real-time viewer that renders a Phong-lit UV sphere with wgpu.
//!
//! The sphere is tessellated once at startup, uploaded to the GPU, and drawn every
//! frame with fixed model, view and projection matrices and a single point light.
//!
//! ## Quick Start
//!
//! ```no_run
//! use phong_sphere::{ViewerConfig, run};
//!
//! fn main() {
//!     run(ViewerConfig::default()).unwrap();
//! }
//! ```
//!
//! The geometry and transform math work without a GPU:
//!
//! ```
//! use phong_sphere::{SceneParams, TransformState, generate_sphere};
//!
//! let sphere = generate_sphere(32, 16).unwrap();
//! assert_eq!(sphere.vertex_count(), 450);
//!
//! let transforms = TransformState::compute(&SceneParams::default());
//! assert_eq!(transforms.modeling_inv_tr, transforms.modeling.inverse().transpose());
//! ```

mod app;
mod camera;
mod config;
mod error;
mod gpu;
mod mesh;
mod renderer;
mod shader;
mod transform;

pub use app::run;
pub use camera::{CameraState, Frustum};
pub use config::ViewerConfig;
pub use error::ViewerError;
pub use gpu::GpuContext;
pub use mesh::{
    DEFAULT_LATITUDE_SEGMENTS, DEFAULT_LONGITUDE_SEGMENTS, GpuMesh, MIN_SEGMENTS, SphereMesh,
    Vertex, expected_index_count, expected_vertex_count, generate_sphere,
};
pub use renderer::{PhongUniforms, Renderer};
pub use shader::{ShaderDiagnostic, ShaderProgram, ShaderSource, ShaderStage};
pub use transform::{LightState, ModelPlacement, SceneParams, TransformState, normal_matrix};

// Re-export glam math types for convenience
pub use glam::{Mat4, Vec3};
