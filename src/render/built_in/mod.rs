//! Procedural unit meshes every scene object is built from.

use std::{collections::HashMap, ops::Range};

use anyhow::{anyhow, Result};
use log::debug;
use wgpu::{Device, VertexBufferLayout};

use crate::scene::draw::{Shape, ShapePart};

use super::mesh::{vertex_buffer_layout, Mesh, MeshBind, MeshBindBuilder};

pub mod cube;
pub mod cylinder;
pub mod plane;
pub mod sphere;
pub mod torus;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct ShapeVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl ShapeVertex {
    pub fn desc() -> VertexBufferLayout<'static> {
        vertex_buffer_layout!(ShapeVertex; Vertex; struct {
            0; position; Float32x3,
            1; normal; Float32x3,
            2; tex_coords; Float32x2,
        })
    }
}

/// CPU side of a primitive: vertices, indices, and the index range of
/// every part that can be drawn on its own.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub mesh: Mesh<ShapeVertex>,
    pub parts: Vec<(ShapePart, Range<u32>)>,
}

impl Geometry {
    pub fn for_shape(shape: Shape) -> Geometry {
        match shape {
            Shape::Box => cube::geometry(),
            Shape::Plane => plane::geometry(),
            Shape::Cylinder => cylinder::geometry(1.0, 1.0),
            Shape::TaperedCylinder => cylinder::geometry(1.0, 0.5),
            Shape::Torus => torus::geometry(),
            Shape::Sphere => sphere::geometry(),
        }
    }

    pub fn vertex(&mut self, position: [f32; 3], normal: [f32; 3], tex_coords: [f32; 2]) -> u16 {
        let index = self.mesh.vertices.len() as u16;
        self.mesh.vertices.push(ShapeVertex {
            position,
            normal,
            tex_coords,
        });
        index
    }

    pub fn triangle(&mut self, a: u16, b: u16, c: u16) {
        self.mesh.indices.extend_from_slice(&[a, b, c]);
    }

    /// Indices pushed inside `build` become `part`.
    pub fn part(&mut self, part: ShapePart, build: impl FnOnce(&mut Geometry)) {
        let start = self.mesh.indices.len() as u32;
        build(self);
        let end = self.mesh.indices.len() as u32;
        self.parts.push((part, start..end));
    }

    pub fn part_range(&self, part: ShapePart) -> Option<Range<u32>> {
        self.parts
            .iter()
            .find(|(p, _)| *p == part)
            .map(|(_, r)| r.clone())
    }

    pub fn triangles(&self, range: Range<u32>) -> impl Iterator<Item = [&ShapeVertex; 3]> + '_ {
        self.mesh.indices[range.start as usize..range.end as usize]
            .chunks_exact(3)
            .map(|t| {
                [
                    &self.mesh.vertices[t[0] as usize],
                    &self.mesh.vertices[t[1] as usize],
                    &self.mesh.vertices[t[2] as usize],
                ]
            })
    }
}

#[derive(Debug)]
pub struct ShapeMesh {
    pub bind: MeshBind,
    pub parts: Vec<(ShapePart, Range<u32>)>,
}

/// Uploaded primitives, one GPU mesh per [`Shape`].
#[derive(Debug, Default)]
pub struct ShapeMeshes {
    meshes: HashMap<Shape, ShapeMesh>,
}

impl ShapeMeshes {
    pub fn load_mesh(&mut self, device: &Device, shape: Shape) -> Result<()> {
        if self.meshes.contains_key(&shape) {
            return Ok(());
        }
        let geometry = Geometry::for_shape(shape);
        let label = format!("{:?}", shape);
        let bind = {
            let mut builder = MeshBindBuilder::default();
            builder
                .set_device(device)
                .set_label(&label)
                .set_mesh(&geometry.mesh);
            builder.build()?
        };
        debug!(
            "{:?} mesh: {} vertices, {} indices",
            shape,
            geometry.mesh.vertices.len(),
            geometry.mesh.indices.len()
        );
        self.meshes.insert(
            shape,
            ShapeMesh {
                bind,
                parts: geometry.parts,
            },
        );
        Ok(())
    }

    pub fn get(&self, shape: Shape) -> Result<&ShapeMesh> {
        self.meshes
            .get(&shape)
            .ok_or_else(|| anyhow!("{:?} mesh was never loaded", shape))
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use nalgebra::Vector3;

    use super::*;

    /// Face normal from the winding order.
    pub fn winding_normal(t: [&ShapeVertex; 3]) -> Vector3<f32> {
        let a = Vector3::from(t[0].position);
        let b = Vector3::from(t[1].position);
        let c = Vector3::from(t[2].position);
        (b - a).cross(&(c - a))
    }

    pub fn assert_parts_cover_indices(g: &Geometry) {
        let mut covered = 0;
        for (_, range) in &g.parts {
            assert_eq!(range.start, covered);
            assert_eq!((range.end - range.start) % 3, 0);
            covered = range.end;
        }
        assert_eq!(covered as usize, g.mesh.indices.len());
        assert!(g
            .mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < g.mesh.vertices.len()));
    }

    pub fn assert_unit_normals(g: &Geometry) {
        for v in &g.mesh.vertices {
            let n = Vector3::from(v.normal).norm();
            assert!((n - 1.0).abs() < 1e-4, "normal length {}", n);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_parts() {
        for shape in Shape::ALL {
            let g = Geometry::for_shape(shape);
            assert!(!g.parts.is_empty(), "{:?}", shape);
            test_util::assert_parts_cover_indices(&g);
            test_util::assert_unit_normals(&g);
        }
    }

    #[test]
    fn vertex_layout() {
        let layout = ShapeVertex::desc();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }
}
