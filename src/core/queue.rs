// src/core/queue.rs
// Ordered store of validated ROIs. Descriptors are parsed, deduplicated by id and
// solved for orientation before being appended; consumers pop them oldest first.

use log::{error, info, warn};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::parser::WaypointParser;
use super::reference::ReferenceFrame;
use super::roi::Roi;
use crate::debug::{DebugArtifact, DebugNotifier};
use crate::geometry::rotate_vector_in_plane;
use crate::RoiError;

use nalgebra::Vector3;

/// Result of a successful ingest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// New ROI appended to the queue
    Queued(String),
    /// Id already stored, message ignored
    Duplicate(String),
}

/// FIFO queue of deduplicated ROIs
pub struct RoiQueue {
    rois: Mutex<VecDeque<Roi>>,
    parser: WaypointParser,
    notifier: Option<Box<dyn DebugNotifier>>,
}

impl Default for RoiQueue {
    fn default() -> Self {
        RoiQueue::new(WaypointParser::default())
    }
}

impl RoiQueue {
    /// Creates an empty queue without debug publishing
    pub fn new(parser: WaypointParser) -> Self {
        RoiQueue {
            rois: Mutex::new(VecDeque::new()),
            parser,
            notifier: None,
        }
    }

    /// Creates an empty queue reporting each new ROI to `notifier`
    pub fn with_notifier(parser: WaypointParser, notifier: Box<dyn DebugNotifier>) -> Self {
        RoiQueue {
            notifier: Some(notifier),
            ..RoiQueue::new(parser)
        }
    }

    /// Parses, deduplicates and solves a raw descriptor.
    ///
    /// Failures are logged and returned; the queue is left untouched.
    pub fn ingest(&self, raw: &str, reference: &ReferenceFrame) -> Result<IngestOutcome, RoiError> {
        let waypoint = self.parser.unpack_roi(raw).map_err(|e| {
            error!("[RoiQueue] - Discarding descriptor {:?}: {}", raw, e);
            RoiError::from(e)
        })?;

        let p = &waypoint.positions;
        let pos_start = Vector3::new(p[0], p[1], p[2]);
        let pos_end = Vector3::new(p[3], p[4], p[5]);

        let roi = {
            let mut rois = self.lock();
            if rois.iter().any(|roi| roi.id() == waypoint.id) {
                info!("[RoiQueue] - Waypoint received previously, already registered, key : {}", waypoint.id);
                return Ok(IngestOutcome::Duplicate(waypoint.id));
            }

            let points = [pos_start, pos_end, reference.robot_pos];
            let quat = rotate_vector_in_plane(&points, &reference.ref_vector, reference.theta).map_err(|e| {
                error!("[RoiQueue] - Rejecting waypoint {}: {}", waypoint.id, e);
                RoiError::from(e)
            })?;

            let roi = Roi::new(waypoint.id, pos_start, pos_end, quat);
            rois.push_back(roi.clone());
            roi
        };

        info!("[RoiQueue] - Waypoint registered, key : {}", roi.id());
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify(DebugArtifact::for_roi(&roi, &reference.robot_pos)) {
                warn!("[RoiQueue] - Debug artifacts for {} dropped: {}", roi.id(), e);
            }
        }

        Ok(IngestOutcome::Queued(roi.id().to_string()))
    }

    /// Removes and returns the oldest ROI
    pub fn consume(&self) -> Option<Roi> {
        self.lock().pop_front()
    }

    /// True if no ROI is pending
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of pending ROIs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if an ROI with `id` is pending
    pub fn contains(&self, id: &str) -> bool {
        self.lock().iter().any(|roi| roi.id() == id)
    }

    /// Drops every pending ROI
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Flushes and stops the debug notifier; later ROIs are queued without artifacts
    pub fn close_notifier(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.close();
        }
    }

    // Records are immutable, so a poisoned store is still consistent
    fn lock(&self) -> MutexGuard<'_, VecDeque<Roi>> {
        self.rois.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
