use serde::{Deserialize, Serialize};
use std::fmt;

/// Movement speed used when a caller does not pass one.
pub const DEFAULT_SPEED: f64 = 100.0;

/// Discrete tile coordinate. The follower never looks inside it; only the
/// grid and movement adapters read `col` and `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub col: i32,
    pub row: i32,
}

impl GridCell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpriteId(pub String);

impl SpriteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpriteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Continuous screen position of a sprite, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPosition {
    pub x: f64,
    pub y: f64,
}

impl PixelPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &PixelPosition) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// How a follow task ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FollowOutcome {
    /// Every segment was walked and the finish handler ran.
    Completed { segments: usize },
    /// A stop request was observed at a segment boundary.
    Interrupted { segments_completed: usize },
}

impl FollowOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, FollowOutcome::Completed { .. })
    }
}
