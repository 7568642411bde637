//! Error types shared by the viewer.
//!
//! Shader compile and link diagnostics are deliberately absent here: they are
//! logged by [`ShaderProgram`](crate::ShaderProgram) and leave the viewer
//! running without a pipeline.

use std::path::PathBuf;

/// Errors that stop the viewer from starting or that reject invalid input.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// A numeric parameter fell below its minimum.
    #[error("invalid argument `{name}`: {value} (must be at least {min})")]
    InvalidArgument {
        name: &'static str,
        value: u32,
        min: u32,
    },

    /// The sphere would have more vertices than `u32` indices can address.
    #[error(
        "sphere of {longitude_segments}x{latitude_segments} segments exceeds the u32 index range"
    )]
    MeshTooLarge {
        longitude_segments: u32,
        latitude_segments: u32,
    },

    /// A shader source file does not exist.
    #[error("shader file not found: {}", path.display())]
    ShaderNotFound { path: PathBuf },

    /// A shader source file exists but could not be read.
    #[error("failed to read shader file {}: {source}", path.display())]
    ShaderRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("failed to create window: {0}")]
    CreateWindow(#[from] winit::error::OsError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

impl ViewerError {
    /// Builds an [`InvalidArgument`](Self::InvalidArgument) error when `value < min`.
    pub(crate) fn check_min(name: &'static str, value: u32, min: u32) -> Result<(), Self> {
        if value < min {
            Err(Self::InvalidArgument { name, value, min })
        } else {
            Ok(())
        }
    }
}
