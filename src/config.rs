use std::path::PathBuf;

use crate::error::ViewerError;
use crate::mesh::{DEFAULT_LATITUDE_SEGMENTS, DEFAULT_LONGITUDE_SEGMENTS, MIN_SEGMENTS};
use crate::transform::SceneParams;

/// Configuration for the viewer window, shaders, tessellation and scene.
///
/// The defaults reproduce the fixed demo: a 512×512 window titled
/// "Phong Shader Sphere", shaders read from `phong.vert.wgsl` and
/// `phong.frag.wgsl` in the working directory, and a 32×16 sphere.
#[derive(Clone, Debug)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub longitude_segments: u32,
    pub latitude_segments: u32,
    pub clear_color: wgpu::Color,
    pub scene: SceneParams,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Phong Shader Sphere".to_string(),
            width: 512,
            height: 512,
            vertex_shader: PathBuf::from("phong.vert.wgsl"),
            fragment_shader: PathBuf::from("phong.frag.wgsl"),
            longitude_segments: DEFAULT_LONGITUDE_SEGMENTS,
            latitude_segments: DEFAULT_LATITUDE_SEGMENTS,
            clear_color: wgpu::Color::BLACK,
            scene: SceneParams::default(),
        }
    }
}

impl ViewerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn shaders(mut self, vertex: impl Into<PathBuf>, fragment: impl Into<PathBuf>) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    pub fn tessellation(mut self, longitude_segments: u32, latitude_segments: u32) -> Self {
        self.longitude_segments = longitude_segments;
        self.latitude_segments = latitude_segments;
        self
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn scene(mut self, scene: SceneParams) -> Self {
        self.scene = scene;
        self
    }

    /// Rejects a zero-sized window or a tessellation below 3×3.
    pub fn validate(&self) -> Result<(), ViewerError> {
        ViewerError::check_min("width", self.width, 1)?;
        ViewerError::check_min("height", self.height, 1)?;
        ViewerError::check_min("longitude_segments", self.longitude_segments, MIN_SEGMENTS)?;
        ViewerError::check_min("latitude_segments", self.latitude_segments, MIN_SEGMENTS)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo() {
        let config = ViewerConfig::default();

        assert_eq!(config.title, "Phong Shader Sphere");
        assert_eq!((config.width, config.height), (512, 512));
        assert_eq!(config.vertex_shader, PathBuf::from("phong.vert.wgsl"));
        assert_eq!(config.fragment_shader, PathBuf::from("phong.frag.wgsl"));
        assert_eq!((config.longitude_segments, config.latitude_segments), (32, 16));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_overrides() {
        let config = ViewerConfig::new()
            .title("Test")
            .size(640, 480)
            .shaders("a.wgsl", "b.wgsl")
            .tessellation(8, 6);

        assert_eq!(config.title, "Test");
        assert_eq!((config.width, config.height), (640, 480));
        assert_eq!(config.vertex_shader, PathBuf::from("a.wgsl"));
        assert_eq!(config.fragment_shader, PathBuf::from("b.wgsl"));
        assert_eq!((config.longitude_segments, config.latitude_segments), (8, 6));
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(matches!(
            ViewerConfig::new().size(0, 512).validate(),
            Err(ViewerError::InvalidArgument { name: "width", .. })
        ));
        assert!(matches!(
            ViewerConfig::new().tessellation(32, 2).validate(),
            Err(ViewerError::InvalidArgument {
                name: "latitude_segments",
                ..
            })
        ));
    }

    #[test]
    fn clear_color_and_scene_overrides() {
        let mut scene = SceneParams::default();
        scene.model.scale = 1.0;
        let color = wgpu::Color {
            r: 0.1,
            g: 0.2,
            b: 0.3,
            a: 1.0,
        };

        let config = ViewerConfig::new().clear_color(color).scene(scene);

        assert_eq!(config.clear_color, color);
        assert_eq!(config.scene, scene);
        assert_eq!(ViewerConfig::default().clear_color, wgpu::Color::BLACK);
    }
}
