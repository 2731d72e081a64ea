use crate::scene::draw::ShapePart;

use super::Geometry;

/// Square on the XZ plane from -1 to 1, facing +Y.
pub fn geometry() -> Geometry {
    let mut g = Geometry::default();
    g.part(ShapePart::Body, |g| {
        let up = [0.0, 1.0, 0.0];
        let a = g.vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]);
        let b = g.vertex([1.0, 0.0, 1.0], up, [1.0, 0.0]);
        let c = g.vertex([1.0, 0.0, -1.0], up, [1.0, 1.0]);
        let d = g.vertex([-1.0, 0.0, -1.0], up, [0.0, 1.0]);
        g.triangle(a, b, c);
        g.triangle(c, d, a);
    });
    g
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;

    #[test]
    fn faces_up() {
        let g = geometry();
        assert_eq!(g.mesh.indices.len(), 6);
        let range = g.part_range(ShapePart::Body).unwrap();
        for t in g.triangles(range) {
            let n = winding_normal(t);
            assert!(n.y > 0.0 && n.x == 0.0 && n.z == 0.0);
        }
        assert!(g.mesh.vertices.iter().all(|v| v.position[1] == 0.0));
    }
}
