use super::ports::PathfindingProvider;
use super::types::GridCell;
use std::fmt;
use std::sync::Arc;

/// Owned copy of a route taken when a follow task starts. Later calls to
/// [`WaypointPath::set_path`] do not affect a task already running on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSnapshot {
    pub first_waypoint: Option<GridCell>,
    pub segments: Vec<Vec<GridCell>>,
}

/// Ordered waypoints plus the shortest path for each consecutive pair.
pub struct WaypointPath {
    waypoints: Vec<GridCell>,
    segments: Vec<Vec<GridCell>>,
    pathfinder: Arc<dyn PathfindingProvider>,
}

impl WaypointPath {
    pub fn new(waypoints: Vec<GridCell>, pathfinder: Arc<dyn PathfindingProvider>) -> Self {
        let mut path = Self {
            waypoints,
            segments: Vec::new(),
            pathfinder,
        };
        path.calculate_segments();
        path
    }

    pub fn empty(pathfinder: Arc<dyn PathfindingProvider>) -> Self {
        Self::new(Vec::new(), pathfinder)
    }

    /// Replace the waypoints and recompute every segment before returning.
    pub fn set_path(&mut self, waypoints: Vec<GridCell>) {
        self.waypoints = waypoints;
        self.calculate_segments();
    }

    pub fn path(&self) -> &[GridCell] {
        &self.waypoints
    }

    /// Segment `i` runs from waypoint `i` to waypoint `i + 1`.
    pub fn segments(&self) -> &[Vec<GridCell>] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            first_waypoint: self.waypoints.first().copied(),
            segments: self.segments.clone(),
        }
    }

    // Provider results are stored verbatim, empty ones included.
    fn calculate_segments(&mut self) {
        self.segments = self
            .waypoints
            .windows(2)
            .map(|pair| self.pathfinder.find_path(pair[0], pair[1]))
            .collect();
    }
}

impl fmt::Debug for WaypointPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaypointPath")
            .field("waypoints", &self.waypoints)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}
