use std::f32::consts::PI;

use cgmath::{Matrix4, Vector4};
use wgpu::util::DeviceExt;

use crate::primitives::vertex::Vertex;

/// Fixed-length vertex store. Only colors change after construction.
#[derive(Clone, Debug)]
pub struct Mesh {
    vertices: Vec<Vertex>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex>) -> Self {
        Self { vertices }
    }

    /// Non-indexed UV sphere, wound counter-clockwise seen from outside.
    ///
    /// The poles use one triangle per sector, every other band two, so the
    /// mesh has `2 * sectors * (stacks - 1)` triangles. Each vertex starts
    /// with the absolute value of its unit normal as color.
    pub fn sphere(radius: f32, sectors: u32, stacks: u32) -> Self {
        let mut grid: Vec<[f32; 3]> = Vec::with_capacity(((stacks + 1) * (sectors + 1)) as usize);
        for i in 0..=stacks {
            let phi = PI / 2.0 - i as f32 * PI / stacks as f32;
            let xz = radius * phi.cos();
            let y = radius * phi.sin();
            for j in 0..=sectors {
                let theta = j as f32 * 2.0 * PI / sectors as f32;
                grid.push([xz * theta.cos(), y, -xz * theta.sin()]);
            }
        }

        let mut indices: Vec<u32> = Vec::new();
        for i in 0..stacks {
            let mut k1 = i * (sectors + 1);
            let mut k2 = k1 + sectors + 1;
            for _ in 0..sectors {
                if i != 0 {
                    indices.extend_from_slice(&[k1, k2, k1 + 1]);
                }
                if i != stacks - 1 {
                    indices.extend_from_slice(&[k1 + 1, k2, k2 + 1]);
                }
                k1 += 1;
                k2 += 1;
            }
        }

        let vertices = indices
            .iter()
            .map(|&index| {
                let position = grid[index as usize];
                let color = [
                    (position[0] / radius).abs(),
                    (position[1] / radius).abs(),
                    (position[2] / radius).abs(),
                ];
                Vertex::new(position, color)
            })
            .collect();

        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn color(&self, index: usize) -> [f32; 3] {
        self.vertices[index].color
    }

    pub fn set_color(&mut self, index: usize, color: [f32; 3]) {
        self.vertices[index].color = color;
    }

    /// Line-list indices for the edges of the triangles that stay after
    /// counter-clockwise back-face culling under `clip`.
    ///
    /// Line topologies are never culled by the GPU, so the edge-list
    /// wireframe has to drop the back hemisphere here.
    pub fn visible_edge_indices(&self, clip: Matrix4<f32>) -> Vec<u32> {
        let screen = |vertex: &Vertex| {
            let [x, y, z] = vertex.position;
            let p = clip * Vector4::new(x, y, z, 1.0);
            (p.x / p.w, p.y / p.w)
        };
        self.vertices
            .chunks_exact(3)
            .enumerate()
            .filter(|(_, tri)| {
                let (a, b, c) = (screen(&tri[0]), screen(&tri[1]), screen(&tri[2]));
                (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0) > 0.0
            })
            .flat_map(|(tri, _)| {
                let a = tri as u32 * 3;
                [a, a + 1, a + 1, a + 2, a + 2, a]
            })
            .collect()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn to_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertex Buffer"),
            contents: self.as_bytes(),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        })
    }

    /// Replaces the whole buffer contents with the current vertices.
    pub fn update_buffer(&self, buffer: &wgpu::Buffer, queue: &wgpu::Queue) {
        queue.write_buffer(buffer, 0, self.as_bytes());
    }
}
