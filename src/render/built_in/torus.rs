use std::f32::consts::TAU;

use crate::scene::draw::ShapePart;

use super::Geometry;

pub const MAIN_SEGMENTS: u16 = 48;
pub const TUBE_SEGMENTS: u16 = 16;
pub const MAIN_RADIUS: f32 = 1.0;
pub const TUBE_RADIUS: f32 = 0.1;

/// Ring around the Z axis. The first half of the main segments (y >= 0)
/// is drawable alone as the half torus.
pub fn geometry() -> Geometry {
    let mut g = Geometry::default();
    let row = TUBE_SEGMENTS + 1;

    for i in 0..=MAIN_SEGMENTS {
        let theta = TAU * i as f32 / MAIN_SEGMENTS as f32;
        let (sin_t, cos_t) = theta.sin_cos();
        for j in 0..=TUBE_SEGMENTS {
            let phi = TAU * j as f32 / TUBE_SEGMENTS as f32;
            let (sin_p, cos_p) = phi.sin_cos();
            let ring = MAIN_RADIUS + TUBE_RADIUS * cos_p;
            g.vertex(
                [ring * cos_t, ring * sin_t, TUBE_RADIUS * sin_p],
                [cos_p * cos_t, cos_p * sin_t, sin_p],
                [
                    i as f32 / MAIN_SEGMENTS as f32,
                    j as f32 / TUBE_SEGMENTS as f32,
                ],
            );
        }
    }

    let strip = |g: &mut Geometry, segments: std::ops::Range<u16>| {
        for i in segments {
            for j in 0..TUBE_SEGMENTS {
                let a = i * row + j;
                let b = (i + 1) * row + j;
                g.triangle(a, b, a + 1);
                g.triangle(a + 1, b, b + 1);
            }
        }
    };
    let half = MAIN_SEGMENTS / 2;
    g.part(ShapePart::UpperHalf, |g| strip(g, 0..half));
    g.part(ShapePart::LowerHalf, |g| strip(g, half..MAIN_SEGMENTS));
    g
}

#[cfg(test)]
mod tests {
    use super::super::test_util::*;
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn halves_split_at_the_x_axis() {
        let g = geometry();
        assert_eq!(
            g.mesh.vertices.len(),
            ((MAIN_SEGMENTS + 1) * (TUBE_SEGMENTS + 1)) as usize
        );
        let upper = g.part_range(ShapePart::UpperHalf).unwrap();
        let lower = g.part_range(ShapePart::LowerHalf).unwrap();
        assert_eq!(upper.end - upper.start, lower.end - lower.start);
        assert!(g.triangles(upper).flatten().all(|v| v.position[1] >= -1e-5));
        assert!(g.triangles(lower).flatten().all(|v| v.position[1] <= 1e-5));
        assert_parts_cover_indices(&g);
    }

    #[test]
    fn points_lie_on_the_tube() {
        let g = geometry();
        for v in &g.mesh.vertices {
            let p = Vector3::from(v.position);
            let center = Vector3::new(p.x, p.y, 0.0).normalize() * MAIN_RADIUS;
            assert_relative_eq!((p - center).norm(), TUBE_RADIUS, epsilon = 1e-5);
        }
    }
}
