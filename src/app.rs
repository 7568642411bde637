use std::sync::Arc;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::gpu::GpuContext;
use crate::mesh::generate_sphere;
use crate::renderer::Renderer;
use crate::shader::{ShaderProgram, ShaderSource};

/// Run the viewer until its window is closed.
///
/// Opens the window, generates and uploads the sphere, builds the shader program,
/// then redraws continuously. Returns once the window closes.
///
/// # Errors
///
/// Fails if the configuration is invalid, the event loop or window cannot be
/// created, the GPU cannot be initialized, or a shader file is missing.
///
/// # Example
/// ```no_run
/// phong_sphere::run(phong_sphere::ViewerConfig::default()).unwrap();
/// ```
pub fn run(config: ViewerConfig) -> Result<(), ViewerError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::Pending { config };
    event_loop.run_app(&mut app)?;

    match app {
        ViewerApp::Failed(e) => Err(e),
        _ => Ok(()),
    }
}

enum ViewerApp {
    Pending {
        config: ViewerConfig,
    },
    Running {
        window: Arc<Window>,
        gpu: GpuContext,
        renderer: Renderer,
    },
    Failed(ViewerError),
    Terminated,
}

impl ViewerApp {
    fn initialize(event_loop: &ActiveEventLoop, config: &ViewerConfig) -> Result<Self, ViewerError> {
        let window_attrs = WindowAttributes::default()
            .with_title(&config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height))
            .with_resizable(false);

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(window.clone())?;

        let sphere = generate_sphere(config.longitude_segments, config.latitude_segments)?;

        let vertex = ShaderSource::load(&config.vertex_shader)?;
        let fragment = ShaderSource::load(&config.fragment_shader)?;
        let program = ShaderProgram::new(&gpu, &vertex, &fragment);
        if !program.is_linked() {
            log::warn!(
                "Shader program is unusable ({} diagnostic(s)), frames will only be cleared",
                program.diagnostics().len()
            );
        }

        let renderer = Renderer::new(&gpu, &sphere, program, &config.scene, config.clear_color);

        log::info!(
            "Viewer initialized: {}x{} window, sphere with {} vertices and {} triangles",
            gpu.width(),
            gpu.height(),
            sphere.vertex_count(),
            sphere.triangle_count()
        );

        Ok(ViewerApp::Running {
            window,
            gpu,
            renderer,
        })
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let ViewerApp::Pending { config } = self else {
            return;
        };

        match Self::initialize(event_loop, config) {
            Ok(running) => *self = running,
            Err(e) => {
                log::error!("Failed to initialize viewer: {}", e);
                *self = ViewerApp::Failed(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let WindowEvent::CloseRequested = event {
            log::info!("Window closed, shutting down");
            *self = ViewerApp::Terminated;
            event_loop.exit();
            return;
        }

        let ViewerApp::Running {
            window,
            gpu,
            renderer,
        } = self
        else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                renderer.render_frame(gpu);
                window.request_redraw();
            }
            _ => {}
        }
    }
}
