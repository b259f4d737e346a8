//! ROI Planner - region of interest ingestion for mobile manipulators
//!
//! This library turns streamed waypoint descriptors (`id,x0,y0,z0,x1,y1,z1`) into an
//! ordered, deduplicated queue of regions of interest, each carrying the end-effector
//! orientation that aligns a reference axis with the plane formed by the segment and
//! the robot base.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

/// Descriptor parsing, ROI records and the ingestion queue
pub mod core;
/// Debug visualization publishing
pub mod debug;
/// Orientation solver and tolerance helpers
pub mod geometry;
/// ROS 2 transport
#[cfg(feature = "ros")]
pub mod ros_interface;

// Re-export commonly used items for easier access
pub use crate::core::{IngestOutcome, ParseError, PoseKind, ReferenceFrame, Roi, RoiQueue, WaypointParser};
pub use debug::{DebugArtifact, DebugChannel, DebugNotifier, DebugPublisher, LogSink, PublishError, VisualizationSink};
pub use geometry::{rotate_vector_in_plane, GeometryError};

use log::info;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{PoisonError, RwLock};

/// Main configuration structure for the planner
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoiConfig {
    /// ROS 2 transport settings
    pub ros: RosConfig,
    /// Descriptor parsing
    pub parser: ParserConfig,
    /// Reference state fed to the solver
    pub reference: ReferenceConfig,
    /// Debug visualization publishing
    pub debug: DebugConfig,
}

/// ROS 2 specific configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosConfig {
    /// Node name
    pub node_name: String,
    /// Node namespace
    pub namespace: String,
    /// Topic carrying ROI descriptors
    pub descriptor_topic: String,
    /// Frame of published debug messages
    pub frame_id: String,
    /// QoS history depth
    pub qos_depth: usize,
}

impl Default for RosConfig {
    fn default() -> Self {
        RosConfig {
            node_name: "roi_planner".to_string(),
            namespace: String::new(),
            descriptor_topic: "/damage_string".to_string(),
            frame_id: "base_link".to_string(),
            qos_depth: 100,
        }
    }
}

/// Descriptor parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Field delimiter
    pub delimiter: char,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { delimiter: ',' }
    }
}

/// Reference state configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Alignment axis, world frame
    pub ref_vector: [f64; 3],
    /// Robot base position, world frame
    pub robot_position: [f64; 3],
    /// In-plane rotation in degrees
    pub theta_deg: f64,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        ReferenceConfig {
            ref_vector: [1.0, 0.0, 0.0],
            robot_position: [0.0, 0.0, 0.0],
            theta_deg: 0.0,
        }
    }
}

/// Debug publishing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Publish debug artifacts at all
    pub enabled: bool,
    /// Emissions per artifact
    pub repeats: usize,
    /// Pause between point emissions (ms)
    pub point_interval_ms: u64,
    /// Pause between pose emissions (ms)
    pub pose_interval_ms: u64,
    /// Pending ROI batches before new ones are dropped
    pub channel_capacity: usize,
    /// Output topic names
    pub topics: DebugTopics,
}

impl Default for DebugConfig {
    fn default() -> Self {
        DebugConfig {
            enabled: true,
            repeats: 3,
            point_interval_ms: 50,
            pose_interval_ms: 200,
            channel_capacity: 64,
            topics: DebugTopics::default(),
        }
    }
}

/// Topic names of the debug streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugTopics {
    /// ROI start point
    pub waypoint_start: String,
    /// ROI end point
    pub waypoint_end: String,
    /// Robot reference position
    pub robot_base: String,
    /// Computed pose
    pub computed_pose: String,
}

impl Default for DebugTopics {
    fn default() -> Self {
        DebugTopics {
            waypoint_start: "debug_waypoint_1".to_string(),
            waypoint_end: "debug_waypoint_2".to_string(),
            robot_base: "debug_robot_base".to_string(),
            computed_pose: "debug_computedQuat".to_string(),
        }
    }
}

impl RoiConfig {
    /// Loads and validates a YAML configuration file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, RoiError> {
        let file = std::fs::File::open(path.as_ref())?;
        let config: RoiConfig = serde_yaml::from_reader(file).map_err(|e| RoiError::Config(e.to_string()))?;
        config.validate()?;
        info!("Loaded configuration from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parses and validates a YAML configuration string
    pub fn from_yaml_str(text: &str) -> Result<Self, RoiError> {
        let config: RoiConfig = serde_yaml::from_str(text).map_err(|e| RoiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the solver and publisher cannot work with
    pub fn validate(&self) -> Result<(), RoiError> {
        let ref_vector = Vector3::from(self.reference.ref_vector);
        if !ref_vector.iter().all(|c| c.is_finite()) || ref_vector.norm() == 0.0 {
            return Err(RoiError::Config("reference.ref_vector must be a finite non-zero vector".to_string()));
        }
        if !self.reference.robot_position.iter().all(|c| c.is_finite()) || !self.reference.theta_deg.is_finite() {
            return Err(RoiError::Config("reference values must be finite".to_string()));
        }
        let delimiter = self.parser.delimiter;
        if delimiter.is_alphanumeric() || matches!(delimiter, '.' | '-' | '+') || delimiter.is_whitespace() {
            return Err(RoiError::Config(format!("parser.delimiter {:?} clashes with number syntax", delimiter)));
        }
        if self.debug.repeats == 0 {
            return Err(RoiError::Config("debug.repeats must be at least 1".to_string()));
        }
        if self.debug.channel_capacity == 0 {
            return Err(RoiError::Config("debug.channel_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Planner error types
#[derive(Debug)]
pub enum RoiError {
    /// Malformed descriptor
    Parse(ParseError),
    /// Degenerate ROI geometry
    Geometry(GeometryError),
    /// Debug publishing failure
    Publish(PublishError),
    /// Configuration error
    Config(String),
    /// I/O error
    Io(std::io::Error),
    /// ROS interface error
    #[cfg(feature = "ros")]
    Ros(ros_interface::RosError),
}

impl std::fmt::Display for RoiError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RoiError::Parse(e) => write!(f, "Parse error: {}", e),
            RoiError::Geometry(e) => write!(f, "Geometry error: {}", e),
            RoiError::Publish(e) => write!(f, "Publish error: {}", e),
            RoiError::Config(msg) => write!(f, "Configuration error: {}", msg),
            RoiError::Io(e) => write!(f, "I/O error: {}", e),
            #[cfg(feature = "ros")]
            RoiError::Ros(e) => write!(f, "ROS error: {}", e),
        }
    }
}

impl std::error::Error for RoiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoiError::Parse(e) => Some(e),
            RoiError::Geometry(e) => Some(e),
            RoiError::Publish(e) => Some(e),
            RoiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for RoiError {
    fn from(e: ParseError) -> Self {
        RoiError::Parse(e)
    }
}

impl From<GeometryError> for RoiError {
    fn from(e: GeometryError) -> Self {
        RoiError::Geometry(e)
    }
}

impl From<PublishError> for RoiError {
    fn from(e: PublishError) -> Self {
        RoiError::Publish(e)
    }
}

impl From<std::io::Error> for RoiError {
    fn from(e: std::io::Error) -> Self {
        RoiError::Io(e)
    }
}

#[cfg(feature = "ros")]
impl From<ros_interface::RosError> for RoiError {
    fn from(e: ros_interface::RosError) -> Self {
        RoiError::Ros(e)
    }
}

/// Primary entry point: queue plus the reference state it is solved against
pub struct RoiPlanner {
    config: RoiConfig,
    queue: RoiQueue,
    reference: RwLock<ReferenceFrame>,
}

impl RoiPlanner {
    /// Creates a planner that writes debug artifacts to the log
    pub fn new(config: RoiConfig) -> Result<Self, RoiError> {
        Self::with_sink(config, Box::new(LogSink))
    }

    /// Creates a planner publishing debug artifacts to `sink`
    pub fn with_sink(config: RoiConfig, sink: Box<dyn VisualizationSink>) -> Result<Self, RoiError> {
        config.validate()?;

        let parser = WaypointParser::new(config.parser.delimiter);
        let queue = if config.debug.enabled {
            let publisher = DebugPublisher::spawn(sink, (&config.debug).into())?;
            RoiQueue::with_notifier(parser, Box::new(publisher))
        } else {
            RoiQueue::new(parser)
        };
        let reference = RwLock::new(ReferenceFrame::from(&config.reference));

        Ok(RoiPlanner {
            config,
            queue,
            reference,
        })
    }

    /// Ingests one descriptor against the current reference state
    pub fn handle_descriptor(&self, raw: &str) -> Result<IngestOutcome, RoiError> {
        let reference = self.reference();
        self.queue.ingest(raw, &reference)
    }

    /// Snapshot of the reference state
    pub fn reference(&self) -> ReferenceFrame {
        *self.reference.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the reference state used by later ingests
    pub fn set_reference(&self, reference: ReferenceFrame) {
        *self.reference.write().unwrap_or_else(PoisonError::into_inner) = reference;
    }

    /// Moves the robot base used as third alignment point
    pub fn update_robot_position(&self, robot_pos: Vector3<f64>) {
        let mut reference = self.reference.write().unwrap_or_else(PoisonError::into_inner);
        *reference = reference.with_robot_pos(robot_pos);
    }

    /// Delivers pending debug artifacts and stops the publisher worker
    pub fn shutdown(self) {
        info!("Flushing debug artifacts");
        self.queue.close_notifier();
    }

    /// ROI queue shared with the motion-execution side
    pub fn queue(&self) -> &RoiQueue {
        &self.queue
    }

    /// Active configuration
    pub fn config(&self) -> &RoiConfig {
        &self.config
    }
}
