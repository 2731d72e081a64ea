use std::f32::consts::TAU;

use nalgebra::Vector3;

use crate::scene::draw::ShapePart;

use super::Geometry;

pub const SEGMENTS: u16 = 36;

/// Cylinder from y = 0 to y = 1. A top radius smaller than the bottom one
/// gives the tapered variant.
pub fn geometry(bottom_radius: f32, top_radius: f32) -> Geometry {
    let mut g = Geometry::default();
    let angle = |i: u16| TAU * i as f32 / SEGMENTS as f32;

    g.part(ShapePart::Top, |g| {
        cap(g, top_radius, 1.0, angle, true);
    });
    g.part(ShapePart::Bottom, |g| {
        cap(g, bottom_radius, 0.0, angle, false);
    });
    g.part(ShapePart::Sides, |g| {
        let slope = bottom_radius - top_radius;
        let mut ring = Vec::with_capacity(SEGMENTS as usize + 1);
        // the seam is duplicated so u can run 0..1
        for i in 0..=SEGMENTS {
            let (sin, cos) = angle(i).sin_cos();
            let normal = Vector3::new(cos, slope, sin).normalize();
            let u = i as f32 / SEGMENTS as f32;
            let b = g.vertex(
                [bottom_radius * cos, 0.0, bottom_radius * sin],
                normal.into(),
                [u, 0.0],
            );
            let t = g.vertex(
                [top_radius * cos, 1.0, top_radius * sin],
                normal.into(),
                [u, 1.0],
            );
            ring.push((b, t));
        }
        for pair in ring.windows(2) {
            let [(b0, t0), (b1, t1)] = [pair[0], pair[1]];
            g.triangle(b0, t0, t1);
            g.triangle(t1, b1, b0);
        }
    });
    g
}

fn cap(g: &mut Geometry, radius: f32, y: f32, angle: impl Fn(u16) -> f32, up: bool) {
    let normal = if up { [0.0, 1.0, 0.0] } else { [0.0, -1.0, 0.0] };
    let center = g.vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
    let rim: Vec<u16> = (0..SEGMENTS)
        .map(|i| {
            let (sin, cos) = angle(i).sin_cos();
            g.vertex(
                [radius * cos, y, radius * sin],
                normal,
                [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
            )
        })
        .collect();
    for i in 0..rim.len() {
        let p = rim[i];
        let next = rim[(i + 1) % rim.len()];
        if up {
            g.triangle(center, next, p);
        } else {
            g.triangle(center, p, next);
        }
    }
}
