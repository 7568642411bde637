//! UV-sphere tessellation and GPU mesh upload.
//!
//! This module provides the geometry side of the viewer:
//!
//! - [`Vertex`] - The vertex format (position + normal) uploaded to the GPU
//! - [`SphereMesh`] - CPU-side vertex and index lists produced by [`generate_sphere`]
//! - [`GpuMesh`] - The same geometry resident in GPU vertex and index buffers
//!
//! # Sphere Layout
//!
//! The sphere has radius 1 and is centered at the origin. Interior latitude rings are
//! stored first, ring by ring from the north pole down, `W` vertices per ring. The
//! north pole and the south pole are appended last, in that order.
//!
//! ```
//! use phong_sphere::generate_sphere;
//!
//! let sphere = generate_sphere(32, 16).unwrap();
//! assert_eq!(sphere.vertex_count(), 450);
//! assert_eq!(sphere.index_count() % 3, 0);
//! ```
//!
//! # Vertex Layout
//!
//! The [`Vertex`] struct uses the following GPU layout (24 bytes per vertex):
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |

use crate::error::ViewerError;
use crate::gpu::GpuContext;
use glam::Vec3;

/// Half-turn angle used for the polar and azimuthal sweeps.
const PI: f32 = std::f32::consts::PI;

/// Default number of longitude segments around the equator.
pub const DEFAULT_LONGITUDE_SEGMENTS: u32 = 32;

/// Default number of latitude rows, counting both poles.
pub const DEFAULT_LATITUDE_SEGMENTS: u32 = 16;

/// Smallest accepted value for either segment count.
pub const MIN_SEGMENTS: u32 = 3;

/// A vertex with a position and a unit-length normal.
///
/// Uses `#[repr(C)]` and derives [`bytemuck::Pod`] so a `&[Vertex]` can be cast
/// straight to bytes for buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space.
    pub position: [f32; 3],
    /// Surface normal (unit length).
    pub normal: [f32; 3],
}

impl Vertex {
    /// The wgpu vertex buffer layout for this vertex type.
    ///
    /// Position is bound at shader location 0 and the normal at location 1,
    /// tightly packed in that order.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3]) -> Self {
        Self { position, normal }
    }

    /// Creates a vertex on the unit sphere whose normal is its normalized position.
    fn on_sphere(position: Vec3) -> Self {
        Self::new(position.to_array(), position.normalize().to_array())
    }
}

/// CPU-side sphere geometry: a vertex list and a flat triangle index list.
///
/// Every three consecutive indices form one triangle, wound counter-clockwise
/// when seen from outside the sphere. The mesh is never mutated after
/// [`generate_sphere`] returns it.
#[derive(Clone, Debug)]
pub struct SphereMesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    longitude_segments: u32,
    latitude_segments: u32,
}

impl SphereMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Number of longitude segments (`W`) this mesh was generated with.
    pub fn longitude_segments(&self) -> u32 {
        self.longitude_segments
    }

    /// Number of latitude rows (`H`, poles included) this mesh was generated with.
    pub fn latitude_segments(&self) -> u32 {
        self.latitude_segments
    }

    /// Index of the north pole vertex `(0, 1, 0)`.
    pub fn north_pole(&self) -> u32 {
        self.vertices.len() as u32 - 2
    }

    /// Index of the south pole vertex `(0, -1, 0)`.
    pub fn south_pole(&self) -> u32 {
        self.vertices.len() as u32 - 1
    }

    /// Iterates over triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}

/// Vertex count of a sphere with `w` longitude segments and `h` latitude rows.
///
/// Returns `None` if `h < 2` or the count overflows `usize`.
pub fn expected_vertex_count(w: u32, h: u32) -> Option<usize> {
    (w as usize)
        .checked_mul((h as usize).checked_sub(2)?)?
        .checked_add(2)
}

/// Index count of a sphere with `w` longitude segments and `h` latitude rows.
///
/// Two triangles per quad between adjacent interior rings, plus one fan of `w`
/// triangles at each pole. Returns `None` if `h < 3` or the count overflows `usize`.
pub fn expected_index_count(w: u32, h: u32) -> Option<usize> {
    let w = w as usize;
    let bands = w.checked_mul((h as usize).checked_sub(3)?)?.checked_mul(6)?;
    bands.checked_add(w.checked_mul(6)?)
}

/// Generates a unit UV-sphere centered at the origin.
///
/// # Arguments
///
/// * `longitude_segments` - Vertices per latitude ring (`W`, at least 3)
/// * `latitude_segments` - Latitude rows from pole to pole, poles included (`H`, at least 3)
///
/// # Errors
///
/// Returns [`ViewerError::InvalidArgument`] when either count is below 3, and
/// [`ViewerError::MeshTooLarge`] when the vertex or index count does not fit in `u32`.
///
/// # Geometry Details
///
/// - **Vertices**: `W × (H − 2) + 2`
/// - **Indices**: `6W(H − 3) + 6W`
/// - **Ring `j`**: polar angle `θ = j / (H − 1) · π` for `j ∈ [1, H − 2]`
/// - **Column `i`**: azimuth `φ = i / W · 2π`, position `(sin θ cos φ, cos θ, −sin θ sin φ)`
pub fn generate_sphere(
    longitude_segments: u32,
    latitude_segments: u32,
) -> Result<SphereMesh, ViewerError> {
    ViewerError::check_min("longitude_segments", longitude_segments, MIN_SEGMENTS)?;
    ViewerError::check_min("latitude_segments", latitude_segments, MIN_SEGMENTS)?;

    let w = longitude_segments;
    let h = latitude_segments;

    // Indices are u32 and the whole index buffer is drawn with a u32 range
    let counts = (expected_vertex_count(w, h), expected_index_count(w, h));
    let (vertex_count, index_count) = match counts {
        (Some(v), Some(i)) if u32::try_from(i).is_ok() && u32::try_from(v - 1).is_ok() => (v, i),
        _ => {
            return Err(ViewerError::MeshTooLarge {
                longitude_segments: w,
                latitude_segments: h,
            });
        }
    };

    let mut vertices = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity(index_count);

    for j in 1..h - 1 {
        let theta = j as f32 / (h - 1) as f32 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for i in 0..w {
            let phi = i as f32 / w as f32 * 2.0 * PI;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let position = Vec3::new(sin_theta * cos_phi, cos_theta, -sin_theta * sin_phi);
            vertices.push(Vertex::on_sphere(position));
        }
    }

    vertices.push(Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]));
    vertices.push(Vertex::new([0.0, -1.0, 0.0], [0.0, -1.0, 0.0]));

    // Bands between interior rings
    for j in 0..h - 3 {
        for i in 0..w {
            let next = (i + 1) % w;
            let a = j * w + i;
            let b = (j + 1) * w + i;
            let c = j * w + next;
            let d = (j + 1) * w + next;

            indices.extend_from_slice(&[a, d, c, a, b, d]);
        }
    }

    // North cap
    let top = vertices.len() as u32 - 2;
    for i in 0..w {
        indices.extend_from_slice(&[top, i, (i + 1) % w]);
    }

    // South cap
    let bottom = vertices.len() as u32 - 1;
    let base = (h - 3) * w;
    for i in 0..w {
        indices.extend_from_slice(&[bottom, base + (i + 1) % w, base + i]);
    }

    log::debug!(
        "Generated sphere {}x{}: {} vertices, {} triangles",
        w,
        h,
        vertices.len(),
        indices.len() / 3
    );

    Ok(SphereMesh {
        vertices,
        indices,
        longitude_segments: w,
        latitude_segments: h,
    })
}

/// GPU-resident mesh geometry with vertex and index buffers.
///
/// Uploaded once at startup and only read afterwards. The buffers are released
/// when the `GpuMesh` is dropped.
#[derive(Debug)]
pub struct GpuMesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl GpuMesh {
    /// Uploads a sphere's vertices and indices to GPU buffers.
    pub fn upload(gpu: &GpuContext, mesh: &SphereMesh) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Vertex Buffer"),
                contents: bytemuck::cast_slice(mesh.vertices()),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Sphere Index Buffer"),
                contents: bytemuck::cast_slice(mesh.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });

        log::debug!(
            "Uploaded sphere mesh ({} vertices, {} indices)",
            mesh.vertex_count(),
            mesh.index_count()
        );

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count() as u32,
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn position(mesh: &SphereMesh, index: u32) -> Vec3 {
        Vec3::from(mesh.vertices()[index as usize].position)
    }

    #[test]
    fn default_sphere_counts() {
        let mesh = generate_sphere(DEFAULT_LONGITUDE_SEGMENTS, DEFAULT_LATITUDE_SEGMENTS).unwrap();

        assert_eq!(mesh.vertex_count(), 450);
        assert!(mesh.index_count() > 0);
        assert_eq!(mesh.index_count() % 3, 0);
        assert_eq!(mesh.index_count(), 2688);
        assert_eq!(mesh.triangle_count(), 896);
        assert_eq!(mesh.longitude_segments(), 32);
        assert_eq!(mesh.latitude_segments(), 16);
    }

    #[test]
    fn counts_match_formula() {
        for w in 3..12 {
            for h in 3..12 {
                let mesh = generate_sphere(w, h).unwrap();
                assert_eq!(Some(mesh.vertex_count()), expected_vertex_count(w, h), "w={w} h={h}");
                assert_eq!(Some(mesh.index_count()), expected_index_count(w, h), "w={w} h={h}");
            }
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for (w, h) in [(3, 3), (5, 4), (32, 16), (64, 33)] {
            let mesh = generate_sphere(w, h).unwrap();
            for v in mesh.vertices() {
                let n = Vec3::from(v.normal);
                assert!((n.length() - 1.0).abs() < EPSILON, "normal {n:?}");
            }
        }
    }

    #[test]
    fn normals_match_positions() {
        let mesh = generate_sphere(16, 9).unwrap();
        for v in mesh.vertices() {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            assert!(p.normalize().abs_diff_eq(n, EPSILON));
            assert!((p.length() - 1.0).abs() < EPSILON);
        }
    }

    #[test]
    fn indices_are_in_range() {
        for (w, h) in [(3, 3), (7, 5), (32, 16)] {
            let mesh = generate_sphere(w, h).unwrap();
            let count = mesh.vertex_count() as u32;
            assert!(mesh.indices().iter().all(|&i| i < count));
        }
    }

    #[test]
    fn triangles_face_outward() {
        for (w, h) in [(3, 3), (4, 5), (32, 16)] {
            let mesh = generate_sphere(w, h).unwrap();
            for [a, b, c] in mesh.triangles() {
                let (pa, pb, pc) = (position(&mesh, a), position(&mesh, b), position(&mesh, c));
                let face_normal = (pb - pa).cross(pc - pa);
                let vertices = mesh.vertices();
                let averaged = Vec3::from(vertices[a as usize].normal)
                    + Vec3::from(vertices[b as usize].normal)
                    + Vec3::from(vertices[c as usize].normal);

                assert!(
                    face_normal.dot(averaged) > 0.0,
                    "triangle {a},{b},{c} faces inward (w={w} h={h})"
                );
            }
        }
    }

    #[test]
    fn poles_are_last_two_vertices() {
        let mesh = generate_sphere(32, 16).unwrap();
        let vertices = mesh.vertices();
        let north = vertices[vertices.len() - 2];
        let south = vertices[vertices.len() - 1];

        assert_eq!(north, Vertex::new([0.0, 1.0, 0.0], [0.0, 1.0, 0.0]));
        assert_eq!(south, Vertex::new([0.0, -1.0, 0.0], [0.0, -1.0, 0.0]));
        assert_eq!(mesh.north_pole(), 448);
        assert_eq!(mesh.south_pole(), 449);
    }

    #[test]
    fn each_pole_owns_a_full_fan() {
        let w = 12;
        let mesh = generate_sphere(w, 7).unwrap();
        let north = mesh.north_pole();
        let south = mesh.south_pole();

        let north_fan = mesh.triangles().filter(|t| t.contains(&north)).count();
        let south_fan = mesh.triangles().filter(|t| t.contains(&south)).count();

        assert_eq!(north_fan, w as usize);
        assert_eq!(south_fan, w as usize);
    }

    #[test]
    fn seam_wraps_to_first_column() {
        let w = 8;
        let mesh = generate_sphere(w, 5).unwrap();
        // Last quad of the first band closes back onto column 0
        let band = &mesh.indices()[6 * (w as usize - 1)..6 * w as usize];
        assert_eq!(band, &[w - 1, w, 0, w - 1, 2 * w - 1, w]);
    }

    #[test]
    fn first_ring_is_below_north_pole() {
        let mesh = generate_sphere(4, 5).unwrap();
        // theta = pi / 4, phi = 0
        let first = position(&mesh, 0);
        let expected = Vec3::new((PI / 4.0).sin(), (PI / 4.0).cos(), 0.0);
        assert!(first.abs_diff_eq(expected, EPSILON));

        // phi = pi / 2 maps to -Z
        let quarter = position(&mesh, 1);
        assert!(quarter.abs_diff_eq(Vec3::new(0.0, (PI / 4.0).cos(), -(PI / 4.0).sin()), EPSILON));
    }

    #[test]
    fn rejects_degenerate_counts() {
        assert!(matches!(
            generate_sphere(2, 16),
            Err(ViewerError::InvalidArgument {
                name: "longitude_segments",
                value: 2,
                ..
            })
        ));
        assert!(matches!(
            generate_sphere(32, 2),
            Err(ViewerError::InvalidArgument {
                name: "latitude_segments",
                value: 2,
                ..
            })
        ));
        assert!(generate_sphere(0, 0).is_err());
    }

    #[test]
    fn oversized_counts_are_rejected_without_overflow() {
        assert_eq!(expected_index_count(u32::MAX, u32::MAX), None);
        assert_eq!(expected_index_count(32, 2), None);

        // 30_000 x 30_000 has fewer than u32::MAX vertices but too many indices
        for (w, h) in [(u32::MAX, u32::MAX), (70_000, 70_000), (u32::MAX, 3), (30_000, 30_000)] {
            assert!(
                matches!(
                    generate_sphere(w, h),
                    Err(ViewerError::MeshTooLarge { longitude_segments, latitude_segments })
                        if longitude_segments == w && latitude_segments == h
                ),
                "w={w} h={h}"
            );
        }
    }

    #[test]
    fn vertex_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(Vertex::LAYOUT.array_stride, 24);
        assert_eq!(Vertex::LAYOUT.attributes.len(), 2);
        assert_eq!(Vertex::LAYOUT.attributes[1].offset, 12);
        assert_eq!(Vertex::LAYOUT.attributes[1].shader_location, 1);
    }
}
