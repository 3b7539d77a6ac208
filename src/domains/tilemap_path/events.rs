use super::types::GridCell;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FollowEvent {
    FollowStarted {
        sprite_id: String,
        run_id: Uuid,
        waypoint_count: usize,
        segment_count: usize,
        speed: f64,
        timestamp: DateTime<Utc>,
    },
    ApproachIssued {
        sprite_id: String,
        run_id: Uuid,
        from: Option<GridCell>,
        to: GridCell,
        cell_count: usize,
        timestamp: DateTime<Utc>,
    },
    SegmentStarted {
        sprite_id: String,
        run_id: Uuid,
        index: usize,
        cell_count: usize,
        timestamp: DateTime<Utc>,
    },
    SegmentFinished {
        sprite_id: String,
        run_id: Uuid,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    StopRequested {
        sprite_id: String,
        timestamp: DateTime<Utc>,
    },
    FollowInterrupted {
        sprite_id: String,
        run_id: Uuid,
        segments_completed: usize,
        timestamp: DateTime<Utc>,
    },
    FollowCompleted {
        sprite_id: String,
        run_id: Uuid,
        segments_completed: usize,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for FollowEvent {
    fn event_type(&self) -> &'static str {
        match self {
            FollowEvent::FollowStarted { .. } => "FollowStarted",
            FollowEvent::ApproachIssued { .. } => "ApproachIssued",
            FollowEvent::SegmentStarted { .. } => "SegmentStarted",
            FollowEvent::SegmentFinished { .. } => "SegmentFinished",
            FollowEvent::StopRequested { .. } => "StopRequested",
            FollowEvent::FollowInterrupted { .. } => "FollowInterrupted",
            FollowEvent::FollowCompleted { .. } => "FollowCompleted",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            FollowEvent::FollowStarted { sprite_id, .. } => sprite_id,
            FollowEvent::ApproachIssued { sprite_id, .. } => sprite_id,
            FollowEvent::SegmentStarted { sprite_id, .. } => sprite_id,
            FollowEvent::SegmentFinished { sprite_id, .. } => sprite_id,
            FollowEvent::StopRequested { sprite_id, .. } => sprite_id,
            FollowEvent::FollowInterrupted { sprite_id, .. } => sprite_id,
            FollowEvent::FollowCompleted { sprite_id, .. } => sprite_id,
        }
    }

    fn event_version(&self) -> u64 { 1 }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            FollowEvent::FollowStarted { timestamp, .. } => *timestamp,
            FollowEvent::ApproachIssued { timestamp, .. } => *timestamp,
            FollowEvent::SegmentStarted { timestamp, .. } => *timestamp,
            FollowEvent::SegmentFinished { timestamp, .. } => *timestamp,
            FollowEvent::StopRequested { timestamp, .. } => *timestamp,
            FollowEvent::FollowInterrupted { timestamp, .. } => *timestamp,
            FollowEvent::FollowCompleted { timestamp, .. } => *timestamp,
        }
    }
}
