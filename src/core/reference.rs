// src/core/reference.rs
// Externally owned reference state read by every ingest: the alignment direction,
// the robot base position closing the ROI triangle, and the in-plane angle.

use nalgebra::Vector3;

use crate::ReferenceConfig;

/// Reference state passed to the orientation solver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceFrame {
    /// World-frame axis the end-effector is aligned from
    pub ref_vector: Vector3<f64>,
    /// Robot base position, third point of the alignment plane
    pub robot_pos: Vector3<f64>,
    /// In-plane rotation (radians)
    pub theta: f64,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        ReferenceFrame {
            ref_vector: Vector3::x(),
            robot_pos: Vector3::zeros(),
            theta: 0.0,
        }
    }
}

impl ReferenceFrame {
    /// Creates a reference frame with `theta` in radians
    pub fn new(ref_vector: Vector3<f64>, robot_pos: Vector3<f64>, theta: f64) -> Self {
        ReferenceFrame {
            ref_vector,
            robot_pos,
            theta,
        }
    }

    /// Returns a copy with the robot base moved to `robot_pos`
    pub fn with_robot_pos(self, robot_pos: Vector3<f64>) -> Self {
        ReferenceFrame { robot_pos, ..self }
    }
}

impl From<&ReferenceConfig> for ReferenceFrame {
    fn from(config: &ReferenceConfig) -> Self {
        ReferenceFrame {
            ref_vector: Vector3::from(config.ref_vector),
            robot_pos: Vector3::from(config.robot_position),
            theta: config.theta_deg.to_radians(),
        }
    }
}
