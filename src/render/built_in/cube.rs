use nalgebra::Vector3;

use crate::scene::draw::{BoxSide, ShapePart};

use super::Geometry;

/// Outward normal and the (u, v) texture axes of a side, with `u × v = n`.
fn side_axes(side: BoxSide) -> [Vector3<f32>; 3] {
    let x = Vector3::x();
    let y = Vector3::y();
    let z = Vector3::z();
    match side {
        BoxSide::Front => [z, x, y],
        BoxSide::Back => [-z, -x, y],
        BoxSide::Right => [x, -z, y],
        BoxSide::Left => [-x, z, y],
        BoxSide::Top => [y, x, -z],
        BoxSide::Bottom => [-y, x, z],
    }
}

/// Unit cube centred at the origin, one quad per side.
pub fn geometry() -> Geometry {
    let mut g = Geometry::default();
    for side in BoxSide::ALL {
        let [n, u, v] = side_axes(side);
        let center = n * 0.5;
        g.part(ShapePart::Side(side), |g| {
            let corners = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];
            let quad = corners.map(|(du, dv)| {
                let p = center + u * du + v * dv;
                g.vertex(p.into(), n.into(), [du + 0.5, dv + 0.5])
            });
            g.triangle(quad[0], quad[1], quad[2]);
            g.triangle(quad[2], quad[3], quad[0]);
        });
    }
    g
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sides_face_outward() {
        let g = geometry();
        assert_eq!(g.mesh.vertices.len(), 24);
        assert_eq!(g.mesh.indices.len(), 36);
        for side in BoxSide::ALL {
            let range = g.part_range(ShapePart::Side(side)).unwrap();
            assert_eq!(range.end - range.start, 6);
            let [n, _, _] = side_axes(side);
            for t in g.triangles(range) {
                assert_relative_eq!(winding_normal(t).normalize(), n, epsilon = 1e-6);
                for v in t {
                    assert_relative_eq!(Vector3::from(v.position).dot(&n), 0.5);
                }
            }
        }
    }

    #[test]
    fn side_uv_spans_the_texture() {
        let g = geometry();
        let range = g.part_range(ShapePart::Side(BoxSide::Top)).unwrap();
        let uvs: Vec<_> = g.triangles(range).flatten().map(|v| v.tex_coords).collect();
        assert!(uvs.contains(&[0.0, 0.0]));
        assert!(uvs.contains(&[1.0, 1.0]));
    }
}
