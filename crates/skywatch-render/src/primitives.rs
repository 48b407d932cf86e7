//! Mesh primitives (box, sphere, cylinder) and the ground grid.

use bytemuck::{Pod, Zeroable};

/// A vertex with position, normal, and color.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A vertex for line primitives (grid).
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x4,
    ];

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// A mesh with vertices and indices.
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Create a box mesh with the given dimensions and color.
pub fn create_box_mesh(width: f32, height: f32, depth: f32, color: [f32; 4]) -> Mesh {
    let hw = width / 2.0;
    let hh = height / 2.0;
    let hd = depth / 2.0;

    // (normal, four corners) per face.
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, -1.0],
            [[hw, -hh, -hd], [-hw, -hh, -hd], [-hw, hh, -hd], [hw, hh, -hd]],
        ),
        (
            [0.0, 0.0, 1.0],
            [[-hw, -hh, hd], [hw, -hh, hd], [hw, hh, hd], [-hw, hh, hd]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-hw, -hh, -hd], [-hw, -hh, hd], [-hw, hh, hd], [-hw, hh, -hd]],
        ),
        (
            [1.0, 0.0, 0.0],
            [[hw, -hh, hd], [hw, -hh, -hd], [hw, hh, -hd], [hw, hh, hd]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-hw, -hh, -hd], [hw, -hh, -hd], [hw, -hh, hd], [-hw, -hh, hd]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-hw, hh, hd], [hw, hh, hd], [hw, hh, -hd], [-hw, hh, -hd]],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for position in corners {
            vertices.push(Vertex {
                position,
                normal,
                color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

/// Create a UV sphere mesh.
pub fn create_sphere_mesh(radius: f32, sectors: u32, stacks: u32, color: [f32; 4]) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for stack in 0..=stacks {
        let phi = std::f32::consts::PI * stack as f32 / stacks as f32;
        let y = phi.cos();
        let ring = phi.sin();

        for sector in 0..=sectors {
            let theta = std::f32::consts::TAU * sector as f32 / sectors as f32;
            let x = ring * theta.cos();
            let z = ring * theta.sin();
            vertices.push(Vertex {
                position: [x * radius, y * radius, z * radius],
                normal: [x, y, z],
                color,
            });
        }
    }

    let stride = sectors + 1;
    for stack in 0..stacks {
        for sector in 0..sectors {
            let a = stack * stride + sector;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    Mesh { vertices, indices }
}

/// Create a capped cylinder mesh centered on the origin, axis along +Y.
pub fn create_cylinder_mesh(radius: f32, height: f32, segments: u32, color: [f32; 4]) -> Mesh {
    let hh = height / 2.0;
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side wall: two rings with outward normals.
    for i in 0..=segments {
        let theta = std::f32::consts::TAU * i as f32 / segments as f32;
        let (x, z) = (theta.cos(), theta.sin());
        for y in [-hh, hh] {
            vertices.push(Vertex {
                position: [x * radius, y, z * radius],
                normal: [x, 0.0, z],
                color,
            });
        }
    }
    for i in 0..segments {
        let a = i * 2;
        indices.extend_from_slice(&[a, a + 2, a + 1, a + 1, a + 2, a + 3]);
    }

    // Caps: center vertex plus the ring, flat normals.
    for (y, ny) in [(-hh, -1.0f32), (hh, 1.0f32)] {
        let center = vertices.len() as u32;
        vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal: [0.0, ny, 0.0],
            color,
        });
        for i in 0..=segments {
            let theta = std::f32::consts::TAU * i as f32 / segments as f32;
            vertices.push(Vertex {
                position: [theta.cos() * radius, y, theta.sin() * radius],
                normal: [0.0, ny, 0.0],
                color,
            });
        }
        for i in 0..segments {
            indices.extend_from_slice(&[center, center + 1 + i, center + 2 + i]);
        }
    }

    Mesh { vertices, indices }
}

/// Ground-plane grid lines on y = 0: `divisions` cells across
/// `2 * half_extent`, with the two center lines in the accent color.
pub fn create_grid_lines(
    half_extent: f32,
    divisions: u32,
    center_color: [f32; 4],
    line_color: [f32; 4],
) -> Vec<LineVertex> {
    let mut lines = Vec::new();
    let step = (half_extent * 2.0) / divisions as f32;

    for i in 0..=divisions {
        let offset = -half_extent + i as f32 * step;
        let color = if offset.abs() < step * 0.5 {
            center_color
        } else {
            line_color
        };

        // Parallel to X and parallel to Z.
        lines.push(LineVertex {
            position: [-half_extent, 0.0, offset],
            color,
        });
        lines.push(LineVertex {
            position: [half_extent, 0.0, offset],
            color,
        });
        lines.push(LineVertex {
            position: [offset, 0.0, -half_extent],
            color,
        });
        lines.push(LineVertex {
            position: [offset, 0.0, half_extent],
            color,
        });
    }

    lines
}
