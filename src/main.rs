// src/main.rs
// Entry point for the ROI planner: loads configuration, then feeds descriptors from
// ROS 2 (feature `ros`) or from stdin into the ROI queue.

// Imports dependencies and planner modules.
// - env_logger: Logging, `RUST_LOG` overrides the default `info` filter.
// - roi_planner: Configuration, queue and debug publishing.
use log::info;
use roi_planner::{RoiConfig, RoiError, RoiPlanner};
use std::error::Error;

/// Main function: first argument is an optional YAML configuration path.
fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting ROI planner...");

    let config = load_config(std::env::args().nth(1))?;
    run(config)
}

fn load_config(path: Option<String>) -> Result<RoiConfig, RoiError> {
    match path {
        Some(path) => RoiConfig::from_yaml_file(path),
        None => {
            info!("No configuration file given, using defaults");
            Ok(RoiConfig::default())
        }
    }
}

/// Runs the ROS 2 node until the process is stopped.
#[cfg(feature = "ros")]
fn run(config: RoiConfig) -> Result<(), Box<dyn Error>> {
    use roi_planner::ros_interface::RosInterface;
    use std::time::Duration;

    let mut ros = RosInterface::new(&config)?;
    let sink = ros.visualization_sink(&config)?;
    let planner = RoiPlanner::with_sink(config, Box::new(sink))?;
    info!("ROS 2 node initialized");

    let mut pending = 0;
    loop {
        for descriptor in ros.spin_once(Duration::from_millis(100)) {
            // Failures are reported by the queue; the loop keeps going
            let _ = planner.handle_descriptor(&descriptor);
        }

        let len = planner.queue().len();
        if len != pending {
            info!("{} ROI(s) pending", len);
            pending = len;
        }
    }
}

/// Reads one descriptor per stdin line, then prints the queue oldest first.
#[cfg(not(feature = "ros"))]
fn run(config: RoiConfig) -> Result<(), Box<dyn Error>> {
    use log::error;
    use roi_planner::debug::vec_string;
    use roi_planner::PoseKind;
    use std::io::BufRead;

    let planner = RoiPlanner::new(config)?;
    info!("Reading descriptors from stdin (id,x0,y0,z0,x1,y1,z1)");

    // Split on raw bytes so one undecodable line only loses itself
    for line in std::io::stdin().lock().split(b'\n') {
        let line = match String::from_utf8(line?) {
            Ok(line) => line,
            Err(e) => {
                error!("Discarding descriptor that is not valid UTF-8: {}", e);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = planner.handle_descriptor(&line);
    }

    info!("Input closed, {} ROI(s) queued", planner.queue().len());
    while let Some(roi) = planner.queue().consume() {
        println!(
            "{} start={} end={}",
            roi.id(),
            vec_string(&roi.pose_vector(PoseKind::Start)),
            vec_string(&roi.pose_vector(PoseKind::End))
        );
    }

    planner.shutdown();
    Ok(())
}
