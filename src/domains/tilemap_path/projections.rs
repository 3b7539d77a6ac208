use super::events::FollowEvent;
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowStatus {
    Idle,
    Approaching,
    WalkingSegment(usize),
    StopPending,
    Completed,
    Interrupted,
}

/// Per-sprite summary of follow activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowOverview {
    pub sprite_id: String,
    pub status: FollowStatus,
    pub runs_started: u32,
    pub runs_completed: u32,
    pub runs_interrupted: u32,
    pub segments_walked: usize,
    pub last_activity: DateTime<Utc>,
}

impl FollowOverview {
    pub fn new(sprite_id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            sprite_id,
            status: FollowStatus::Idle,
            runs_started: 0,
            runs_completed: 0,
            runs_interrupted: 0,
            segments_walked: 0,
            last_activity: created_at,
        }
    }

    pub fn apply_event(&mut self, event: &FollowEvent) {
        match event {
            FollowEvent::FollowStarted { .. } => {
                self.runs_started += 1;
                self.status = FollowStatus::Idle;
            }
            FollowEvent::ApproachIssued { .. } => {
                self.status = FollowStatus::Approaching;
            }
            FollowEvent::SegmentStarted { index, .. } => {
                if self.status != FollowStatus::StopPending {
                    self.status = FollowStatus::WalkingSegment(*index);
                }
            }
            FollowEvent::SegmentFinished { .. } => {
                self.segments_walked += 1;
            }
            FollowEvent::StopRequested { .. } => {
                self.status = FollowStatus::StopPending;
            }
            FollowEvent::FollowInterrupted { .. } => {
                self.runs_interrupted += 1;
                self.status = FollowStatus::Interrupted;
            }
            FollowEvent::FollowCompleted { .. } => {
                self.runs_completed += 1;
                self.status = FollowStatus::Completed;
            }
        }
        self.last_activity = event.occurred_at();
    }
}

/// In-memory projection store keyed by sprite id.
#[derive(Debug, Default)]
pub struct FollowProjectionStore {
    pub overviews: HashMap<String, FollowOverview>,
}

impl FollowProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_event(&mut self, event: &FollowEvent) {
        self.overviews
            .entry(event.aggregate_id().to_string())
            .or_insert_with(|| {
                FollowOverview::new(event.aggregate_id().to_string(), event.occurred_at())
            })
            .apply_event(event);
    }

    pub fn active_sprites(&self) -> Vec<String> {
        self.overviews
            .values()
            .filter(|o| {
                matches!(
                    o.status,
                    FollowStatus::Approaching
                        | FollowStatus::WalkingSegment(_)
                        | FollowStatus::StopPending
                )
            })
            .map(|o| o.sprite_id.clone())
            .collect()
    }
}
