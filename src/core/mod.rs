// core/mod.rs

// Ingestion side of the planner: descriptor parsing, the ROI record, the reference
// state handed to the solver, and the deduplicating FIFO queue.

pub mod parser;
pub mod queue;
pub mod reference;
pub mod roi;

// Re-export key types for a flat API
pub use parser::{is_number, ParseError, Waypoint, WaypointParser, DESCRIPTOR_COORDINATES};
pub use queue::{IngestOutcome, RoiQueue};
pub use reference::ReferenceFrame;
pub use roi::{PoseKind, Roi};
