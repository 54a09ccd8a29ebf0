//! Sphere geometry, GPU meshes and object transforms.
//!
//! Geometry is generated on the CPU as a [`Geometry`] (plain vertex/index
//! vectors) and uploaded once into a [`Mesh`]. Keeping the two apart means the
//! tessellation can be checked without a GPU.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Quat, Vec3};

use crate::gpu::GpuContext;

/// A vertex in 3D space with position, normal and texture coordinates.
///
/// Laid out as 32 bytes: position (12), normal (12), uv (8).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// The 3D position of this vertex in model space.
    pub position: [f32; 3],
    /// Unit surface normal.
    pub normal: [f32; 3],
    /// Texture coordinates in `[0, 1]`.
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    ///
    /// Attributes: position (location 0), normal (location 1), uv (location 2).
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
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
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// CPU-side triangle geometry.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub vertices: Vec<Vertex3d>,
    pub indices: Vec<u32>,
}

impl Geometry {
    /// A UV sphere centered at the origin.
    ///
    /// `width_segments` runs around the equator (min 3), `height_segments`
    /// from pole to pole (min 2). The seam column is duplicated so UVs wrap
    /// cleanly, and the degenerate triangles at each pole are left out.
    /// Triangles wind counter-clockwise seen from outside.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let columns = width_segments + 1;

        let mut vertices = Vec::with_capacity((columns * (height_segments + 1)) as usize);
        for ring in 0..=height_segments {
            let v = ring as f32 / height_segments as f32;
            let phi = v * PI;

            for seg in 0..=width_segments {
                let u = seg as f32 / width_segments as f32;
                let theta = u * TAU;

                let normal = Vec3::new(
                    -theta.cos() * phi.sin(),
                    phi.cos(),
                    theta.sin() * phi.sin(),
                );
                let position = normal * radius;
                vertices.push(Vertex3d::new(
                    position.to_array(),
                    normal.to_array(),
                    [u, v],
                ));
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for ring in 0..height_segments {
            for seg in 0..width_segments {
                let a = ring * columns + seg + 1;
                let b = ring * columns + seg;
                let c = (ring + 1) * columns + seg;
                let d = (ring + 1) * columns + seg + 1;

                if ring != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if ring != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// GPU-resident geometry with vertex and index buffers.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Upload geometry to the GPU.
    pub fn new(gpu: &GpuContext, geometry: &Geometry) -> Self {
        use wgpu::util::DeviceExt;

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&geometry.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&geometry.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Position, rotation and scale of an object in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Model matrix, applied scale first, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Inverse-transpose of the model matrix, for transforming normals.
    ///
    /// A zero scale (the first frame of a scale-in) has no inverse; the
    /// identity is returned instead since nothing is visible anyway.
    pub fn normal_matrix(&self) -> Mat4 {
        let model = self.matrix();
        if model.determinant().abs() <= f32::EPSILON {
            return Mat4::IDENTITY;
        }
        model.inverse().transpose()
    }
}
