// src/core/roi.rs
// Region of interest record: a named waypoint segment with the orientation the
// end-effector should hold along it. Records are immutable once built.

use nalgebra::{UnitQuaternion, Vector3};
use std::fmt;

/// Endpoint selector for [`Roi::pose_vector`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoseKind {
    /// Segment start
    Start,
    /// Segment end
    End,
}

/// Validated region of interest
#[derive(Debug, Clone, PartialEq)]
pub struct Roi {
    id: String,
    pos_start: Vector3<f64>,
    pos_end: Vector3<f64>,
    quat: UnitQuaternion<f64>,
}

impl Default for Roi {
    /// Empty record: no id, zero positions, identity orientation
    fn default() -> Self {
        Roi {
            id: String::new(),
            pos_start: Vector3::zeros(),
            pos_end: Vector3::zeros(),
            quat: UnitQuaternion::identity(),
        }
    }
}

impl Roi {
    /// Builds a record from already validated parts
    pub fn new(
        id: impl Into<String>,
        pos_start: Vector3<f64>,
        pos_end: Vector3<f64>,
        quat: UnitQuaternion<f64>,
    ) -> Self {
        Roi {
            id: id.into(),
            pos_start,
            pos_end,
            quat,
        }
    }

    /// True for the placeholder record
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
    }

    /// Identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// World-frame start position
    pub fn pos_start(&self) -> &Vector3<f64> {
        &self.pos_start
    }

    /// World-frame end position
    pub fn pos_end(&self) -> &Vector3<f64> {
        &self.pos_end
    }

    /// Target orientation
    pub fn quat(&self) -> &UnitQuaternion<f64> {
        &self.quat
    }

    /// Pose of one endpoint as `[x, y, z, qx, qy, qz, qw]`
    pub fn pose_vector(&self, kind: PoseKind) -> [f64; 7] {
        let pos = match kind {
            PoseKind::Start => &self.pos_start,
            PoseKind::End => &self.pos_end,
        };
        let q = self.quat.quaternion();

        [pos.x, pos.y, pos.z, q.i, q.j, q.k, q.w]
    }
}

impl fmt::Display for Roi {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let q = self.quat.quaternion();
        writeln!(f, "ID: {}", self.id)?;
        writeln!(
            f,
            "Starting Position: [{}, {}, {}]",
            self.pos_start.x, self.pos_start.y, self.pos_start.z
        )?;
        writeln!(
            f,
            "Ending Position: [{}, {}, {}]",
            self.pos_end.x, self.pos_end.y, self.pos_end.z
        )?;
        write!(f, "Quaternion (xyzw): [{}, {}, {}, {}]", q.i, q.j, q.k, q.w)
    }
}
