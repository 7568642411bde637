//! Frame renderer: uploads the per-frame uniforms and draws the sphere.
//!
//! The renderer owns everything built during initialization (GPU mesh, shader
//! program, uniform buffer, depth texture). Each frame it writes the uniform
//! block, clears color and depth, and issues one indexed draw over the whole
//! index buffer.
//!
//! # Uniform Block
//!
//! | Field             | Type      | Offset |
//! |-------------------|-----------|--------|
//! | `modeling`        | mat4x4    | 0      |
//! | `camera`          | mat4x4    | 64     |
//! | `projection`      | mat4x4    | 128    |
//! | `modeling_inv_tr` | mat4x4    | 192    |
//! | `lightPos`        | vec3      | 256    |
//! | `viewPos`         | vec3      | 272    |
//! | `lightColor`      | vec3      | 288    |

use crate::gpu::GpuContext;
use crate::mesh::{GpuMesh, SphereMesh};
use crate::shader::{DEPTH_FORMAT, ShaderProgram};
use crate::transform::{LightState, SceneParams, TransformState};

/// The Phong shader's uniform block, laid out to match WGSL's uniform rules.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PhongUniforms {
    /// Model matrix (object to world space).
    pub modeling: [[f32; 4]; 4],
    /// View matrix (world to camera space).
    pub camera: [[f32; 4]; 4],
    /// Projection matrix (camera to clip space).
    pub projection: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals.
    pub modeling_inv_tr: [[f32; 4]; 4],
    pub light_pos: [f32; 3],
    _pad0: f32,
    pub view_pos: [f32; 3],
    _pad1: f32,
    pub light_color: [f32; 3],
    _pad2: f32,
}

impl PhongUniforms {
    pub fn new(transforms: &TransformState, light: &LightState) -> Self {
        Self {
            modeling: transforms.modeling.to_cols_array_2d(),
            camera: transforms.camera.to_cols_array_2d(),
            projection: transforms.projection.to_cols_array_2d(),
            modeling_inv_tr: transforms.modeling_inv_tr.to_cols_array_2d(),
            light_pos: light.light_pos.to_array(),
            _pad0: 0.0,
            view_pos: light.view_pos.to_array(),
            _pad1: 0.0,
            light_color: light.light_color.to_array(),
            _pad2: 0.0,
        }
    }
}

/// Draws the sphere with the Phong program.
///
/// Transforms are computed once from the fixed [`SceneParams`] and re-uploaded
/// every frame; nothing else changes after construction.
pub struct Renderer {
    mesh: GpuMesh,
    program: ShaderProgram,
    uniforms: PhongUniforms,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
    clear_color: wgpu::Color,
}

impl Renderer {
    /// Uploads the mesh and creates the uniform buffer, bind group and depth buffer.
    pub fn new(
        gpu: &GpuContext,
        mesh: &SphereMesh,
        program: ShaderProgram,
        scene: &SceneParams,
        clear_color: wgpu::Color,
    ) -> Self {
        let device = &gpu.device;
        let mesh = GpuMesh::upload(gpu, mesh);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Phong Uniforms"),
            size: std::mem::size_of::<PhongUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Phong Uniforms Bind Group"),
            layout: program.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let transforms = TransformState::compute(scene);
        let uniforms = PhongUniforms::new(&transforms, &scene.light);

        Self {
            mesh,
            program,
            uniforms,
            uniform_buffer,
            uniform_bind_group,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
            clear_color,
        }
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Renders and presents one frame.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped. If the
    /// shader program failed to build, the frame is only cleared.
    pub fn render_frame(&mut self, gpu: &GpuContext) {
        self.ensure_depth_size(gpu);

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::warn!("Failed to get surface texture: {}", e);
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        gpu.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[self.uniforms]),
        );

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Phong Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.draw(&mut render_pass);
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        let Some(pipeline) = self.program.pipeline() else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.mesh.index_count(), 0, 0..1);
    }
}
