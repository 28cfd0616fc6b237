use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use wgpu::util::DeviceExt;

use crate::OPENGL_TO_WGPU_MATRIX;

/// Accumulated model rotation and translation.
///
/// Both matrices start as identity and are post-multiplied by every call, so
/// transforms compose in the order they were issued and are never clamped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraTransform {
    rotation: Matrix4<f32>,
    translation: Matrix4<f32>,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraTransform {
    pub fn new() -> Self {
        Self {
            rotation: Matrix4::identity(),
            translation: Matrix4::identity(),
        }
    }

    pub fn rotate(&mut self, angle: Deg<f32>, axis: Vector3<f32>) {
        self.rotation = self.rotation * Matrix4::from_axis_angle(axis, angle);
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.translation = self.translation * Matrix4::from_translation(offset);
    }

    pub fn reset(&mut self) {
        self.rotation = Matrix4::identity();
        self.translation = Matrix4::identity();
    }

    pub fn rotation(&self) -> Matrix4<f32> {
        self.rotation
    }

    pub fn translation(&self) -> Matrix4<f32> {
        self.translation
    }

    /// Object-to-world matrix as the vertex shader applies it.
    pub fn model(&self) -> Matrix4<f32> {
        self.translation * self.rotation
    }
}

/// Maps the demo's GL-style coordinates into wgpu clip space.
pub fn projection(aspect: f32) -> Matrix4<f32> {
    // Squash X so the sphere stays round, flip Z so +Z faces the viewer.
    OPENGL_TO_WGPU_MATRIX * Matrix4::from_nonuniform_scale(1.0 / aspect, 1.0, -1.0)
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformUniform {
    pub projection: [[f32; 4]; 4],
    pub transform: [[f32; 4]; 4],
    pub translation: [[f32; 4]; 4],
}

impl TransformUniform {
    pub fn from(camera: &CameraTransform, aspect: f32) -> Self {
        Self {
            projection: projection(aspect).into(),
            transform: camera.rotation().into(),
            translation: camera.translation().into(),
        }
    }

    pub fn to_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Transform Buffer"),
            contents: bytemuck::bytes_of(self),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, buffer: &wgpu::Buffer, queue: &wgpu::Queue) {
        queue.write_buffer(buffer, 0, bytemuck::bytes_of(self));
    }
}

/// Per-pass color multiplied with the vertex color in the fragment shader.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TintUniform {
    pub color: [f32; 3],
    _padding: f32,
}

impl TintUniform {
    pub fn new(color: [f32; 3]) -> Self {
        Self { color, _padding: 0.0 }
    }

    pub fn to_buffer(&self, device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(self),
            usage: wgpu::BufferUsages::UNIFORM,
        })
    }
}
