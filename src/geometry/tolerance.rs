// src/geometry/tolerance.rs
// Equivalence checks for positions and orientations, used to compare solver output
// against expected poses.

use nalgebra::{UnitQuaternion, Vector3};

/// Default tolerance for pose comparisons
pub const TOLERANCE: f64 = 1e-5;

/// True when both quaternions describe the same rotation.
///
/// Compares rotation matrices, so `q` and `-q` are equivalent.
pub fn are_quat_equivalent(q1: &UnitQuaternion<f64>, q2: &UnitQuaternion<f64>, tolerance: f64) -> bool {
    let rot1 = q1.to_rotation_matrix();
    let rot2 = q2.to_rotation_matrix();

    (rot1.matrix() - rot2.matrix()).norm() < tolerance
}

/// True when both positions are closer than `tolerance`
pub fn are_pos_equivalent(p1: &Vector3<f64>, p2: &Vector3<f64>, tolerance: f64) -> bool {
    (p1 - p2).norm() < tolerance
}
