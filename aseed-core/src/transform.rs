//! Host-to-renderer coordinate conversion
//!
//! The host's world space is Z-up; appleseed's is Y-up. Every coordinate
//! that reaches the output passes through the same axis swap:
//! `(x, y, z) -> (x, z, -y)`.

use nalgebra::{Matrix4, Vector3};

/// Apply the axis swap to one vector.
pub fn to_renderer(v: Vector3<f64>) -> Vector3<f64> {
    Vector3::new(v.x, v.z, neg(v.y))
}

/// Negate, normalizing `-0.0` to `0.0` so formatted output stays clean.
fn neg(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        -value
    }
}

/// Camera placement expressed as origin / target / up, already converted
/// to renderer axes.
#[derive(Debug, Clone, Copy)]
pub struct LookAt {
    pub origin: Vector3<f64>,
    pub target: Vector3<f64>,
    pub up: Vector3<f64>,
}

/// Derive a look-at triple from a camera world transform.
///
/// In column-vector convention: origin is the translation column, the view
/// direction is the negated third basis column, up is the second basis
/// column, and the target sits one unit along the view direction.
pub fn look_at(world: &Matrix4<f64>) -> LookAt {
    let origin = Vector3::new(world[(0, 3)], world[(1, 3)], world[(2, 3)]);
    let forward = -Vector3::new(world[(0, 2)], world[(1, 2)], world[(2, 2)]);
    let up = Vector3::new(world[(0, 1)], world[(1, 1)], world[(2, 1)]);

    LookAt {
        origin: to_renderer(origin),
        target: to_renderer(origin + forward),
        up: to_renderer(up),
    }
}

/// Reshuffle a world transform into the four rows appleseed expects.
///
/// Each basis column goes through the axis swap and the translation fills
/// the last column as (x, z, -y). The exact element placement is a basis
/// change specific to this pair of coordinate systems; do not re-derive it
/// unless the target convention changes.
pub fn matrix_rows(m: &Matrix4<f64>) -> [[f64; 4]; 4] {
    [
        [m[(0, 0)], m[(2, 0)], neg(m[(1, 0)]), m[(0, 3)]],
        [m[(0, 1)], m[(2, 1)], neg(m[(1, 1)]), m[(2, 3)]],
        [m[(0, 2)], m[(2, 2)], neg(m[(1, 2)]), neg(m[(1, 3)])],
        [m[(3, 0)], m[(3, 2)], neg(m[(3, 1)]), m[(3, 3)]],
    ]
}
