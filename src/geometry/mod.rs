//! Plane-alignment orientation solver
//!
//! Computes the unit quaternion that rotates a reference direction onto an edge of
//! the triangle formed by an ROI start point, its end point and the robot reference
//! position, optionally turned in the triangle plane by `theta`.

mod tolerance;

use nalgebra::{Unit, UnitQuaternion, Vector3};

pub use tolerance::*;

/// Relative threshold below which a cross product is treated as vanishing
pub const DEGENERACY_EPSILON: f64 = 1e-9;

/// Geometry failures reported by the solver
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// One of the triangle edges has zero length (coincident points)
    ZeroLengthEdge,
    /// The three points lie on a single line, so no plane is defined
    CollinearPoints,
    /// The reference direction has zero length
    ZeroReference,
    /// An input coordinate is NaN or infinite
    NonFinite,
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            GeometryError::ZeroLengthEdge => write!(f, "Degenerate geometry: coincident points"),
            GeometryError::CollinearPoints => write!(f, "Degenerate geometry: collinear points"),
            GeometryError::ZeroReference => write!(f, "Degenerate geometry: zero-length reference vector"),
            GeometryError::NonFinite => write!(f, "Degenerate geometry: non-finite coordinate"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Computes the orientation aligning `ref_vector` with the plane of `points`.
///
/// `points` are `[start, end, robot_position]`. The edge `start - end` is rotated by
/// `theta` radians about the plane normal, then the returned quaternion is the
/// shortest rotation taking `ref_vector` onto that rotated edge.
pub fn rotate_vector_in_plane(
    points: &[Vector3<f64>; 3],
    ref_vector: &Vector3<f64>,
    theta: f64,
) -> Result<UnitQuaternion<f64>, GeometryError> {
    let all_finite = points.iter().chain(std::iter::once(ref_vector))
        .all(|v| v.iter().all(|c| c.is_finite()));
    if !all_finite || !theta.is_finite() {
        return Err(GeometryError::NonFinite);
    }

    let plan_vector_1 = points[0] - points[1];
    let plan_vector_2 = points[0] - points[2];
    let (norm_1, norm_2) = (plan_vector_1.norm(), plan_vector_2.norm());
    if norm_1 == 0.0 || norm_2 == 0.0 {
        return Err(GeometryError::ZeroLengthEdge);
    }

    let normal = plan_vector_1.cross(&plan_vector_2);
    if normal.norm() <= DEGENERACY_EPSILON * norm_1 * norm_2 {
        return Err(GeometryError::CollinearPoints);
    }
    let normal = Unit::new_normalize(normal);

    // (cos(theta/2), n sin(theta/2))
    let in_plane = UnitQuaternion::from_axis_angle(&normal, theta);
    let rotated = in_plane * plan_vector_1;

    let ref_norm = ref_vector.norm();
    if ref_norm == 0.0 {
        return Err(GeometryError::ZeroReference);
    }

    let scale = ref_norm * rotated.norm();
    let cos_angle = (ref_vector.dot(&rotated) / scale).clamp(-1.0, 1.0);
    let angle = cos_angle.acos();

    let axis = ref_vector.cross(&rotated);
    let axis = if axis.norm() > DEGENERACY_EPSILON * scale {
        Unit::new_normalize(axis)
    } else if cos_angle > 0.0 {
        return Ok(UnitQuaternion::identity());
    } else {
        orthogonal_axis(ref_vector)
    };

    Ok(UnitQuaternion::from_axis_angle(&axis, angle))
}

/// Deterministic unit axis orthogonal to `v` (crossed with its least aligned world axis)
fn orthogonal_axis(v: &Vector3<f64>) -> Unit<Vector3<f64>> {
    let abs = v.abs();
    let helper = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    Unit::new_normalize(v.cross(&helper))
}
