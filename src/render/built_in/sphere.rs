use std::f32::consts::{PI, TAU};

use crate::scene::draw::ShapePart;

use super::Geometry;

pub const STACKS: u16 = 18;
pub const SLICES: u16 = 36;

/// Unit sphere, poles on the Y axis.
pub fn geometry() -> Geometry {
    let mut g = Geometry::default();
    for i in 0..=STACKS {
        let phi = PI * i as f32 / STACKS as f32;
        let (sin_p, cos_p) = phi.sin_cos();
        for j in 0..=SLICES {
            let theta = TAU * j as f32 / SLICES as f32;
            let (sin_t, cos_t) = theta.sin_cos();
            let p = [sin_p * cos_t, cos_p, sin_p * sin_t];
            g.vertex(
                p,
                p,
                [
                    j as f32 / SLICES as f32,
                    1.0 - i as f32 / STACKS as f32,
                ],
            );
        }
    }
    g.part(ShapePart::Body, |g| {
        let row = SLICES + 1;
        for i in 0..STACKS {
            for j in 0..SLICES {
                let a = i * row + j;
                let b = a + row;
                g.triangle(a, a + 1, b);
                g.triangle(a + 1, b + 1, b);
            }
        }
    });
    g
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn unit_radius() {
        let g = geometry();
        assert_eq!(g.mesh.indices.len(), (STACKS * SLICES * 6) as usize);
        for v in &g.mesh.vertices {
            assert_relative_eq!(Vector3::from(v.position).norm(), 1.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn texture_runs_bottom_to_top() {
        let g = geometry();
        let north = &g.mesh.vertices[0];
        let south = g.mesh.vertices.last().unwrap();
        assert_relative_eq!(north.position[1], 1.0);
        assert_relative_eq!(north.tex_coords[1], 1.0);
        assert_relative_eq!(south.position[1], -1.0);
        assert_relative_eq!(south.tex_coords[1], 0.0);
    }

    #[test]
    fn faces_point_outward() {
        let g = geometry();
        let body = g.part_range(ShapePart::Body).unwrap();
        for t in g.triangles(body) {
            let n = winding_normal(t);
            if n.norm() < 1e-6 {
                // collapsed triangles at the poles
                continue;
            }
            let p = Vector3::from(t[0].position) + Vector3::from(t[1].position) + Vector3::from(t[2].position);
            assert!(n.dot(&p) > 0.0);
        }
    }
}
