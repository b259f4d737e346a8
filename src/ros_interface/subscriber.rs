// src/ros_interface/subscriber.rs
// Subscribes to the ROI descriptor topic (std_msgs/String) and buffers incoming
// descriptors until the planner loop collects them.

use futures::{FutureExt, Stream, StreamExt};
use r2r::{Node, QosProfile};

use super::RosError;

type DescriptorStream = Box<dyn Stream<Item = r2r::std_msgs::msg::String> + Unpin + Send>;

/// Descriptor topic subscription
pub struct Subscriber {
    topic: String,
    stream: DescriptorStream,
}

impl Subscriber {
    /// Creates a new subscription on `topic` (e.g. `/damage_string`)
    pub fn new(node: &mut Node, topic: &str, depth: usize) -> Result<Self, RosError> {
        let qos = QosProfile::default().keep_last(depth);
        let stream = node
            .subscribe::<r2r::std_msgs::msg::String>(topic, qos)
            .map_err(|e| RosError::SubscribeError(format!("{}: {}", topic, e)))?;

        Ok(Subscriber {
            topic: topic.to_string(),
            stream: Box::new(stream),
        })
    }

    /// Topic name
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Returns every descriptor received since the last call, oldest first.
    /// Never waits: messages still in flight are picked up on the next spin.
    pub fn drain(&mut self) -> Vec<String> {
        let mut descriptors = Vec::new();
        while let Some(Some(msg)) = self.stream.next().now_or_never() {
            descriptors.push(msg.data);
        }
        descriptors
    }
}
