//! ROS 2 interface for the ROI planner
//!
//! This module handles all communication with ROS 2, including:
//! - Receiving ROI descriptors on the descriptor topic
//! - Publishing debug points and poses for RViz
//! - Owning and spinning the node

mod publisher;
mod subscriber;

use r2r::{Context, Node};
use std::time::Duration;

pub use publisher::*;
pub use subscriber::*;

use crate::RoiConfig;

/// ROS 2 interface manager
pub struct RosInterface {
    node: Node,
    subscriber: Subscriber,
}

impl RosInterface {
    /// Creates the node and the descriptor subscription
    pub fn new(config: &RoiConfig) -> Result<Self, RosError> {
        let context = Context::create().map_err(|e| RosError::InitError(e.to_string()))?;
        let mut node = Node::create(context, &config.ros.node_name, &config.ros.namespace)
            .map_err(|e| RosError::InitError(e.to_string()))?;

        let subscriber = Subscriber::new(&mut node, &config.ros.descriptor_topic, config.ros.qos_depth)?;
        log::info!("Subscribed to {}", subscriber.topic());

        Ok(RosInterface { node, subscriber })
    }

    /// Advertises the debug topics and returns the sink publishing on them
    pub fn visualization_sink(&mut self, config: &RoiConfig) -> Result<RosVisualizationSink, RosError> {
        let sink = RosVisualizationSink::new(&mut self.node, &config.debug.topics, &config.ros.frame_id)?;
        log::info!("Publishing debug artifacts in frame {}", config.ros.frame_id);
        Ok(sink)
    }

    /// Processes pending ROS work and returns the descriptors received
    pub fn spin_once(&mut self, timeout: Duration) -> Vec<String> {
        self.node.spin_once(timeout);
        self.subscriber.drain()
    }
}

/// ROS error types
#[derive(Debug)]
pub enum RosError {
    /// ROS initialization error
    InitError(String),
    /// Publishing error
    PublishError(String),
    /// Subscription error
    SubscribeError(String),
}

impl std::fmt::Display for RosError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            RosError::InitError(msg) => write!(f, "ROS init error: {}", msg),
            RosError::PublishError(msg) => write!(f, "Publish error: {}", msg),
            RosError::SubscribeError(msg) => write!(f, "Subscribe error: {}", msg),
        }
    }
}

impl std::error::Error for RosError {}
