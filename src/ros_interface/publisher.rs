// src/ros_interface/publisher.rs
// Typed ROS 2 publisher wrapper and the sink turning debug artifacts into
// PointStamped / PoseStamped messages.

use r2r::geometry_msgs::msg::{Point, Pose, PointStamped, PoseStamped, Quaternion};
use r2r::std_msgs::msg::Header;
use r2r::{QosProfile, WrappedTypesupport};
use std::time::{SystemTime, UNIX_EPOCH};

use super::RosError;
use crate::debug::{DebugArtifact, DebugChannel, PublishError, VisualizationSink};
use crate::DebugTopics;

// Generic ROS2 Publisher wrapper
pub struct Publisher<T>
where
    T: WrappedTypesupport,
{
    topic: String,
    inner: r2r::Publisher<T>,
}

impl<T> Publisher<T>
where
    T: WrappedTypesupport + 'static,
{
    // Create a new publisher on the given topic with specified QoS
    pub fn new(node: &mut r2r::Node, topic: &str, qos: QosProfile) -> Result<Self, RosError> {
        let inner = node
            .create_publisher::<T>(topic, qos)
            .map_err(|e| RosError::PublishError(format!("{}: {}", topic, e)))?;
        Ok(Publisher {
            topic: topic.to_string(),
            inner,
        })
    }

    // Publish a message to the topic
    pub fn publish(&self, message: &T) -> Result<(), PublishError> {
        self.inner
            .publish(message)
            .map_err(|e| PublishError::Sink(format!("{}: {}", self.topic, e)))
    }
}

/// Publishes debug artifacts on the four visualization topics
pub struct RosVisualizationSink {
    frame_id: String,
    waypoint_start: Publisher<PointStamped>,
    waypoint_end: Publisher<PointStamped>,
    robot_base: Publisher<PointStamped>,
    computed_pose: Publisher<PoseStamped>,
}

impl RosVisualizationSink {
    /// Advertises the debug topics on `node`
    pub fn new(node: &mut r2r::Node, topics: &DebugTopics, frame_id: &str) -> Result<Self, RosError> {
        let qos = QosProfile::default().keep_last(10);
        Ok(RosVisualizationSink {
            frame_id: frame_id.to_string(),
            waypoint_start: Publisher::new(node, &topics.waypoint_start, qos.clone())?,
            waypoint_end: Publisher::new(node, &topics.waypoint_end, qos.clone())?,
            robot_base: Publisher::new(node, &topics.robot_base, qos.clone())?,
            computed_pose: Publisher::new(node, &topics.computed_pose, qos)?,
        })
    }

    fn header(&self) -> Header {
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        Header {
            stamp: r2r::builtin_interfaces::msg::Time {
                sec: now.as_secs() as i32,
                nanosec: now.subsec_nanos(),
            },
            frame_id: self.frame_id.clone(),
        }
    }

    fn point_publisher(&self, channel: DebugChannel) -> Option<&Publisher<PointStamped>> {
        match channel {
            DebugChannel::WaypointStart => Some(&self.waypoint_start),
            DebugChannel::WaypointEnd => Some(&self.waypoint_end),
            DebugChannel::RobotBase => Some(&self.robot_base),
            DebugChannel::ComputedPose => None,
        }
    }
}

impl VisualizationSink for RosVisualizationSink {
    fn emit(&mut self, artifact: &DebugArtifact) -> Result<(), PublishError> {
        match artifact {
            DebugArtifact::Point { channel, position } => {
                let publisher = self
                    .point_publisher(*channel)
                    .ok_or_else(|| PublishError::Sink(format!("{:?} carries poses only", channel)))?;
                let msg = PointStamped {
                    header: self.header(),
                    point: Point { x: position.x, y: position.y, z: position.z },
                };
                publisher.publish(&msg)
            }
            DebugArtifact::Pose { position, orientation, .. } => {
                let q = orientation.quaternion();
                let msg = PoseStamped {
                    header: self.header(),
                    pose: Pose {
                        position: Point { x: position.x, y: position.y, z: position.z },
                        orientation: Quaternion { x: q.i, y: q.j, z: q.k, w: q.w },
                    },
                };
                self.computed_pose.publish(&msg)
            }
        }
    }
}
