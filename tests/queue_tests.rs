// Integration tests for ROI ingestion and consumption through the public API
use nalgebra::Vector3;
use roi_planner::{IngestOutcome, ReferenceFrame, RoiError, RoiQueue, WaypointParser};
use rstest::rstest;

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> RoiQueue {
        RoiQueue::new(WaypointParser::default())
    }

    fn reference() -> ReferenceFrame {
        ReferenceFrame::new(Vector3::z(), Vector3::new(0.0, 1.0, 0.0), 0.0)
    }

    #[rstest]
    #[case("roi,0,0,0,1,0")]
    #[case("roi,0,0,0,1,0,0,0")]
    #[case("roi")]
    #[case("roi,0,0,0,1,0,zero")]
    fn wrong_shape_adds_nothing(#[case] raw: &str) {
        let queue = queue();

        assert!(matches!(queue.ingest(raw, &reference()), Err(RoiError::Parse(_))));
        assert!(queue.is_empty());
    }

    #[test]
    fn seven_fields_add_one_record() {
        let queue = queue();

        let outcome = queue.ingest("roi,0,0,0,1,0,0", &reference()).unwrap();

        assert_eq!(outcome, IngestOutcome::Queued("roi".to_string()));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn duplicate_keeps_first_record() {
        let queue = queue();
        queue.ingest("dup,0,0,0,1,0,0", &reference()).unwrap();
        let outcome = queue.ingest("dup,0,0,5,3,0,0", &reference()).unwrap();

        assert_eq!(outcome, IngestOutcome::Duplicate("dup".to_string()));
        let roi = queue.consume().unwrap();
        assert_eq!(roi.pos_start(), &Vector3::zeros());
        assert_eq!(roi.pos_end(), &Vector3::x());
        assert!(queue.consume().is_none());
    }

    #[test]
    fn consumption_is_fifo() {
        let queue = queue();
        for id in ["id1", "id2", "id3"] {
            queue.ingest(&format!("{},0,0,0,1,0,0", id), &reference()).unwrap();
        }

        let order: Vec<String> = std::iter::from_fn(|| queue.consume())
            .map(|roi| roi.id().to_string())
            .collect();

        assert_eq!(order, vec!["id1", "id2", "id3"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn consumed_id_can_be_queued_again() {
        let queue = queue();
        queue.ingest("again,0,0,0,1,0,0", &reference()).unwrap();
        queue.consume().unwrap();

        let outcome = queue.ingest("again,0,0,0,1,0,0", &reference()).unwrap();
        assert_eq!(outcome, IngestOutcome::Queued("again".to_string()));
    }

    #[test]
    fn stored_quaternions_are_unit() {
        let queue = queue();
        let descriptors = [
            "a,0.3,1.2,-0.4,2.0,0.1,0.9",
            "b,10,-3,2,4,4,4",
            "c,-1,-1,0,1,-1,0.5",
        ];
        for raw in descriptors {
            queue.ingest(raw, &reference()).unwrap();
        }

        while let Some(roi) = queue.consume() {
            assert!((roi.quat().into_inner().norm() - 1.0).abs() < 1e-9, "{}", roi);
        }
    }

    #[test]
    fn collinear_descriptor_is_rejected() {
        let queue = queue();
        let frame = ReferenceFrame::new(Vector3::z(), Vector3::new(2.0, 0.0, 0.0), 0.0);

        let result = queue.ingest("line,0,0,0,1,0,0", &frame);

        assert!(matches!(result, Err(RoiError::Geometry(_))));
        assert!(queue.consume().is_none());
    }

    #[test]
    fn clear_discards_pending() {
        let queue = queue();
        for i in 0..5 {
            queue.ingest(&format!("roi_{},0,0,0,1,0,0", i), &reference()).unwrap();
        }

        queue.clear();

        assert!(queue.is_empty());
        assert!(queue.consume().is_none());
    }

    #[test]
    fn semicolon_delimiter() {
        let queue = RoiQueue::new(WaypointParser::new(';'));

        assert!(queue.ingest("s;0;0;0;1;0;0", &reference()).is_ok());
        assert!(queue.ingest("s,0,0,0,1,0,0", &reference()).is_err());
    }
}
