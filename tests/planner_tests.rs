// End-to-end tests: configuration, solver and debug publishing wired together
use nalgebra::{UnitQuaternion, Vector3};
use roi_planner::geometry::{are_quat_equivalent, TOLERANCE};
use roi_planner::{
    rotate_vector_in_plane, DebugArtifact, DebugChannel, GeometryError, PublishError, RoiConfig, RoiPlanner,
    VisualizationSink,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<DebugArtifact>>>);

    impl VisualizationSink for SharedSink {
        fn emit(&mut self, artifact: &DebugArtifact) -> Result<(), PublishError> {
            self.0.lock().unwrap().push(artifact.clone());
            Ok(())
        }
    }

    fn quick_config() -> RoiConfig {
        RoiConfig::from_yaml_str(
            "reference:\n  ref_vector: [0.0, 0.0, 1.0]\n  robot_position: [0.0, 1.0, 0.0]\n\
             debug:\n  repeats: 3\n  point_interval_ms: 0\n  pose_interval_ms: 0\n",
        )
        .unwrap()
    }

    fn wait_for(sink: &SharedSink, count: usize) -> Vec<DebugArtifact> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let seen = sink.0.lock().unwrap().clone();
            if seen.len() >= count || Instant::now() > deadline {
                return seen;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn maps_reference_onto_edge() {
        let points = [Vector3::zeros(), Vector3::x(), Vector3::y()];
        let quat = rotate_vector_in_plane(&points, &Vector3::z(), 0.0).unwrap();

        let mapped = quat * Vector3::z();
        let target = Vector3::new(-1.0, 0.0, 0.0);

        assert!(mapped.cross(&target).norm() < 1e-9);
        assert!(mapped.dot(&target) > 0.0);
    }

    #[test]
    fn collinear_points_never_produce_nan() {
        let points = [Vector3::zeros(), Vector3::x(), Vector3::new(2.0, 0.0, 0.0)];

        let result = rotate_vector_in_plane(&points, &Vector3::z(), 0.0);

        assert_eq!(result, Err(GeometryError::CollinearPoints));
    }

    #[test]
    fn planner_publishes_each_artifact_three_times() {
        let sink = SharedSink::default();
        let planner = RoiPlanner::with_sink(quick_config(), Box::new(sink.clone())).unwrap();

        planner.handle_descriptor("crack_1,0,0,0,1,0,0").unwrap();
        let seen = wait_for(&sink, 12);

        assert_eq!(seen.len(), 12);
        let channels: Vec<DebugChannel> = seen.iter().map(DebugArtifact::channel).collect();
        assert_eq!(&channels[..3], &[DebugChannel::WaypointStart; 3]);
        assert_eq!(&channels[9..], &[DebugChannel::ComputedPose; 3]);
        assert_eq!(
            seen[6],
            DebugArtifact::Point { channel: DebugChannel::RobotBase, position: Vector3::y() }
        );
    }

    #[test]
    fn shutdown_delivers_pending_artifacts() {
        let sink = SharedSink::default();
        let mut config = quick_config();
        config.debug.point_interval_ms = 5;
        config.debug.pose_interval_ms = 20;
        let planner = RoiPlanner::with_sink(config, Box::new(sink.clone())).unwrap();

        planner.handle_descriptor("crack_1,0,0,0,1,0,0").unwrap();
        planner.handle_descriptor("crack_2,0,0,1,1,0,1").unwrap();
        planner.shutdown();

        assert_eq!(sink.0.lock().unwrap().len(), 24);
    }

    #[test]
    fn planner_queue_matches_solver() {
        let sink = SharedSink::default();
        let planner = RoiPlanner::with_sink(quick_config(), Box::new(sink)).unwrap();

        planner.handle_descriptor("crack_1,0,0,0,1,0,0").unwrap();
        let roi = planner.queue().consume().unwrap();

        let expected = rotate_vector_in_plane(
            &[Vector3::zeros(), Vector3::x(), Vector3::y()],
            &Vector3::z(),
            0.0,
        )
        .unwrap();
        assert!(are_quat_equivalent(roi.quat(), &expected, TOLERANCE));
        assert!(!are_quat_equivalent(roi.quat(), &UnitQuaternion::identity(), TOLERANCE));
    }

    #[test]
    fn disabled_debug_still_queues() {
        let mut config = quick_config();
        config.debug.enabled = false;
        let planner = RoiPlanner::new(config).unwrap();

        planner.handle_descriptor("quiet,0,0,0,1,0,0").unwrap();

        assert_eq!(planner.queue().len(), 1);
    }

    #[test]
    fn config_file_is_loaded() {
        let path = std::env::temp_dir().join(format!("roi_planner_{}.yaml", std::process::id()));
        std::fs::write(&path, "ros:\n  descriptor_topic: /rois\nparser:\n  delimiter: \";\"\n").unwrap();

        let config = RoiConfig::from_yaml_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.ros.descriptor_topic, "/rois");
        assert_eq!(config.parser.delimiter, ';');
        assert_eq!(config.ros.frame_id, "base_link");
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let result = RoiConfig::from_yaml_file("/nonexistent/roi_planner.yaml");
        assert!(matches!(result, Err(roi_planner::RoiError::Io(_))));
    }
}
