//! Instance meshes: a low-poly unit sphere and a cube of the same extent.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};

/// Mesh vertex (position only; spheres are flat shaded).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Which mesh each instance is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceShape {
    Sphere,
    Cube,
}

impl InstanceShape {
    pub fn from_use_cube(use_cube: bool) -> Self {
        if use_cube {
            InstanceShape::Cube
        } else {
            InstanceShape::Sphere
        }
    }

    pub fn mesh(self) -> Mesh {
        match self {
            InstanceShape::Sphere => Mesh::uv_sphere(1.0, 6, 6),
            InstanceShape::Cube => Mesh::cube(1.0),
        }
    }
}

impl Mesh {
    /// UV sphere with `width_segments` around and `height_segments` pole to pole.
    ///
    /// Pole rows collapse to a point, so their degenerate triangles are skipped.
    pub fn uv_sphere(radius: f32, width_segments: u16, height_segments: u16) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row = width_segments + 1;

        let mut vertices = Vec::with_capacity(row as usize * (height_segments as usize + 1));
        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                vertices.push(MeshVertex {
                    position: [
                        -radius * (u * TAU).cos() * (v * PI).sin(),
                        radius * (v * PI).cos(),
                        radius * (u * TAU).sin() * (v * PI).sin(),
                    ],
                });
            }
        }

        let mut indices = Vec::new();
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self { vertices, indices }
    }

    /// Axis-aligned cube centered on the origin.
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let vertices = [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ]
        .into_iter()
        .map(|position| MeshVertex { position })
        .collect();

        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 6, 2, 3, 7, 6, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];

        Self { vertices, indices }
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}
