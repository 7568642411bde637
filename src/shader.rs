//! Shader source loading and the Phong shader program.
//!
//! A missing shader file is fatal ([`ViewerError::ShaderNotFound`]). A shader that
//! fails to compile or link is not: the diagnostics are logged and kept on the
//! [`ShaderProgram`], which then has no pipeline and draws nothing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::ViewerError;
use crate::gpu::GpuContext;
use crate::mesh::Vertex;

/// Entry point the vertex shader file must define.
pub const VERTEX_ENTRY: &str = "vs_main";

/// Entry point the fragment shader file must define.
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Depth buffer format shared by the pipeline and the renderer's depth texture.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// WGSL source text read from disk.
#[derive(Clone, Debug)]
pub struct ShaderSource {
    path: PathBuf,
    source: String,
}

impl ShaderSource {
    /// Read a WGSL file.
    ///
    /// # Errors
    ///
    /// [`ViewerError::ShaderNotFound`] if the file does not exist, and
    /// [`ViewerError::ShaderRead`] for any other I/O failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ViewerError> {
        let path = path.as_ref().to_path_buf();
        log::debug!("Loading shader source {:?}", path);

        match fs::read_to_string(&path) {
            Ok(source) => Ok(Self { path, source }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ViewerError::ShaderNotFound { path })
            }
            Err(source) => Err(ViewerError::ShaderRead { path, source }),
        }
    }

    /// Get the shader source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the shader file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Which step of building a [`ShaderProgram`] produced a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Link,
}

/// A compile or link error captured while building a [`ShaderProgram`].
#[derive(Clone, Debug)]
pub struct ShaderDiagnostic {
    pub stage: ShaderStage,
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for ShaderDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.stage {
            ShaderStage::Vertex | ShaderStage::Fragment => "Shader Compile Error",
            ShaderStage::Link => "Shader Link Error",
        };
        write!(f, "{} ({}): {}", kind, self.path.display(), self.message)
    }
}

/// The Phong shader program: a vertex module, a fragment module, and the render
/// pipeline linking them.
///
/// The uniform block layout (group 0, binding 0) is owned here so the renderer can
/// build a matching bind group. All GPU objects are released when the program is
/// dropped.
pub struct ShaderProgram {
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: Option<wgpu::RenderPipeline>,
    diagnostics: Vec<ShaderDiagnostic>,
}

impl ShaderProgram {
    /// Compile both stages and link them into a render pipeline.
    ///
    /// The pipeline draws indexed triangle lists of [`Vertex`] with counter-clockwise
    /// front faces, back-face culling and a `Less` depth test. Compile and link
    /// errors are logged and leave the program without a pipeline.
    pub fn new(gpu: &GpuContext, vertex: &ShaderSource, fragment: &ShaderSource) -> Self {
        let device = &gpu.device;
        let mut diagnostics = Vec::new();

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Phong Uniforms Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let vertex_module = compile(device, vertex, ShaderStage::Vertex, &mut diagnostics);
        let fragment_module = compile(device, fragment, ShaderStage::Fragment, &mut diagnostics);

        let pipeline = if diagnostics.is_empty() {
            link(
                gpu,
                &bind_group_layout,
                &vertex_module,
                &fragment_module,
                fragment.path(),
                &mut diagnostics,
            )
        } else {
            None
        };

        for diagnostic in &diagnostics {
            log::error!("{}", diagnostic);
        }

        if pipeline.is_some() {
            log::info!(
                "Linked shader program ({:?}, {:?})",
                vertex.path(),
                fragment.path()
            );
        }

        Self {
            bind_group_layout,
            pipeline,
            diagnostics,
        }
    }

    /// Returns `true` if both stages compiled and the pipeline linked.
    pub fn is_linked(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Compile and link errors collected while building the program.
    pub fn diagnostics(&self) -> &[ShaderDiagnostic] {
        &self.diagnostics
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub(crate) fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.pipeline.as_ref()
    }
}

fn compile(
    device: &wgpu::Device,
    source: &ShaderSource,
    stage: ShaderStage,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> wgpu::ShaderModule {
    let label = source.path().to_string_lossy();

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label.as_ref()),
        source: wgpu::ShaderSource::Wgsl(source.source().into()),
    });

    if let Some(error) = pollster::block_on(device.pop_error_scope()) {
        diagnostics.push(ShaderDiagnostic {
            stage,
            path: source.path().to_path_buf(),
            message: error.to_string(),
        });
    }

    module
}

fn link(
    gpu: &GpuContext,
    bind_group_layout: &wgpu::BindGroupLayout,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    path: &Path,
    diagnostics: &mut Vec<ShaderDiagnostic>,
) -> Option<wgpu::RenderPipeline> {
    let device = &gpu.device;

    device.push_error_scope(wgpu::ErrorFilter::Validation);

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Phong Pipeline Layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Phong Pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some(VERTEX_ENTRY),
            buffers: &[Vertex::LAYOUT],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some(FRAGMENT_ENTRY),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.config.format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            front_face: wgpu::FrontFace::Ccw,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });

    match pollster::block_on(device.pop_error_scope()) {
        None => Some(pipeline),
        Some(error) => {
            diagnostics.push(ShaderDiagnostic {
                stage: ShaderStage::Link,
                path: path.to_path_buf(),
                message: error.to_string(),
            });
            None
        }
    }
}
