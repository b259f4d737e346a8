//! Debug visualization publishing
//!
//! Every accepted ROI produces a handful of artifacts (start and end points, the
//! robot reference position and the computed pose). They are handed to a background
//! worker that emits each one a bounded number of times to a [`VisualizationSink`],
//! so a slow or absent subscriber never stalls ingestion.

use log::{debug, warn};
use nalgebra::{UnitQuaternion, Vector3};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::core::Roi;
use crate::DebugConfig;

/// Visualization stream an artifact belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugChannel {
    /// ROI start point
    WaypointStart,
    /// ROI end point
    WaypointEnd,
    /// Robot reference position
    RobotBase,
    /// Start position with the computed orientation
    ComputedPose,
}

/// One visualization message
#[derive(Debug, Clone, PartialEq)]
pub enum DebugArtifact {
    /// Bare position
    Point {
        /// Target stream
        channel: DebugChannel,
        /// World-frame position
        position: Vector3<f64>,
    },
    /// Position with orientation
    Pose {
        /// Target stream
        channel: DebugChannel,
        /// World-frame position
        position: Vector3<f64>,
        /// Orientation
        orientation: UnitQuaternion<f64>,
    },
}

impl DebugArtifact {
    /// Stream this artifact is sent on
    pub fn channel(&self) -> DebugChannel {
        match self {
            DebugArtifact::Point { channel, .. } | DebugArtifact::Pose { channel, .. } => *channel,
        }
    }

    /// Artifacts describing a freshly queued ROI, in emission order
    pub fn for_roi(roi: &Roi, robot_pos: &Vector3<f64>) -> Vec<DebugArtifact> {
        vec![
            DebugArtifact::Point {
                channel: DebugChannel::WaypointStart,
                position: *roi.pos_start(),
            },
            DebugArtifact::Point {
                channel: DebugChannel::WaypointEnd,
                position: *roi.pos_end(),
            },
            DebugArtifact::Point {
                channel: DebugChannel::RobotBase,
                position: *robot_pos,
            },
            DebugArtifact::Pose {
                channel: DebugChannel::ComputedPose,
                position: *roi.pos_start(),
                orientation: *roi.quat(),
            },
        ]
    }
}

/// Publishing failures; never fatal to ingestion
#[derive(Debug, Clone, PartialEq)]
pub enum PublishError {
    /// Worker queue is full
    Backpressure,
    /// Worker has stopped
    Disconnected,
    /// Sink refused the message
    Sink(String),
}

impl std::fmt::Display for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PublishError::Backpressure => write!(f, "Debug publisher queue is full"),
            PublishError::Disconnected => write!(f, "Debug publisher is not running"),
            PublishError::Sink(msg) => write!(f, "Sink error: {}", msg),
        }
    }
}

impl std::error::Error for PublishError {}

/// Receives the artifacts of each queued ROI
#[cfg_attr(test, mockall::automock)]
pub trait DebugNotifier: Send + Sync {
    /// Hands artifacts over for delivery without blocking
    fn notify(&self, artifacts: Vec<DebugArtifact>) -> Result<(), PublishError>;

    /// Stops accepting artifacts and waits for pending ones to be delivered
    fn close(&self) {}
}

/// Final destination of debug artifacts (ROS topics, log, ...)
#[cfg_attr(test, mockall::automock)]
pub trait VisualizationSink: Send {
    /// Emits one artifact once
    fn emit(&mut self, artifact: &DebugArtifact) -> Result<(), PublishError>;
}

/// Repeat budget and pacing of the publisher
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Emissions per artifact
    pub repeats: usize,
    /// Delay between repeats of a point
    pub point_interval: Duration,
    /// Delay between repeats of a pose
    pub pose_interval: Duration,
    /// Pending ROI batches before notifications are refused
    pub channel_capacity: usize,
}

impl Default for PublishSettings {
    fn default() -> Self {
        PublishSettings {
            repeats: 3,
            point_interval: Duration::from_millis(50),
            pose_interval: Duration::from_millis(200),
            channel_capacity: 64,
        }
    }
}

impl From<&DebugConfig> for PublishSettings {
    fn from(config: &DebugConfig) -> Self {
        PublishSettings {
            repeats: config.repeats,
            point_interval: Duration::from_millis(config.point_interval_ms),
            pose_interval: Duration::from_millis(config.pose_interval_ms),
            channel_capacity: config.channel_capacity,
        }
    }
}

/// Background worker delivering artifacts to a sink.
///
/// Each ROI's artifacts travel as one batch: a notification is queued whole or
/// refused whole.
pub struct DebugPublisher {
    sender: Mutex<Option<SyncSender<Vec<DebugArtifact>>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DebugPublisher {
    /// Starts the worker thread that owns `sink`
    pub fn spawn(sink: Box<dyn VisualizationSink>, settings: PublishSettings) -> std::io::Result<Self> {
        let (sender, receiver) = mpsc::sync_channel(settings.channel_capacity.max(1));
        let worker = std::thread::Builder::new()
            .name("roi-debug-publisher".to_string())
            .spawn(move || run_worker(receiver, sink, settings))?;

        Ok(DebugPublisher {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// Closes the queue and waits until pending artifacts are delivered
    pub fn shutdown(self) {
        self.close();
    }
}

impl DebugNotifier for DebugPublisher {
    fn notify(&self, artifacts: Vec<DebugArtifact>) -> Result<(), PublishError> {
        let sender = self.sender.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = sender.as_ref().ok_or(PublishError::Disconnected)?;
        sender.try_send(artifacts).map_err(|e| match e {
            TrySendError::Full(_) => PublishError::Backpressure,
            TrySendError::Disconnected(_) => PublishError::Disconnected,
        })
    }

    fn close(&self) {
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
        let worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner).take();
        if let Some(worker) = worker {
            if worker.join().is_err() {
                warn!("Debug publisher worker panicked");
            }
        }
    }
}

impl Drop for DebugPublisher {
    fn drop(&mut self) {
        // Detach: the worker exits once the channel drains
        self.sender.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

fn run_worker(receiver: Receiver<Vec<DebugArtifact>>, mut sink: Box<dyn VisualizationSink>, settings: PublishSettings) {
    for batch in receiver {
        for artifact in &batch {
            deliver(sink.as_mut(), artifact, &settings);
        }
    }
    debug!("Debug publisher worker stopped");
}

/// Emits `artifact` up to `settings.repeats` times, returns the successful count
pub(crate) fn deliver(sink: &mut dyn VisualizationSink, artifact: &DebugArtifact, settings: &PublishSettings) -> usize {
    let interval = match artifact {
        DebugArtifact::Point { .. } => settings.point_interval,
        DebugArtifact::Pose { .. } => settings.pose_interval,
    };

    let mut delivered = 0;
    for attempt in 0..settings.repeats {
        match sink.emit(artifact) {
            Ok(()) => delivered += 1,
            Err(e) => warn!("Failed to publish {:?} ({}/{}): {}", artifact.channel(), attempt + 1, settings.repeats, e),
        }
        if attempt + 1 < settings.repeats && !interval.is_zero() {
            std::thread::sleep(interval);
        }
    }
    delivered
}

/// `[a, b, c]` formatting used in debug strings
pub fn vec_string(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(", "))
}

/// `Position - xyz [..] Orientation - xyzw [..]`
pub fn pose_string(position: &Vector3<f64>, orientation: &UnitQuaternion<f64>) -> String {
    let q = orientation.quaternion();
    format!(
        "Position - xyz {} Orientation - xyzw {}",
        vec_string(position.as_slice()),
        vec_string(&[q.i, q.j, q.k, q.w])
    )
}

/// Sink writing artifacts to the log, used when no transport is available
#[derive(Debug, Default)]
pub struct LogSink;

impl VisualizationSink for LogSink {
    fn emit(&mut self, artifact: &DebugArtifact) -> Result<(), PublishError> {
        match artifact {
            DebugArtifact::Point { channel, position } => {
                debug!("[{:?}] Position - xyz {}", channel, vec_string(position.as_slice()))
            }
            DebugArtifact::Pose {
                channel,
                position,
                orientation,
            } => debug!("[{:?}] {}", channel, pose_string(position, orientation)),
        }
        Ok(())
    }
}
