use std::sync::{Arc, Mutex};
use tilemap_path::adapters::outbound::GridMap;
use tilemap_path::domains::tilemap_path::*;

/// Returns `[from, to]` and remembers every query.
struct RecordingPathfinder {
    queries: Mutex<Vec<(GridCell, GridCell)>>,
}

impl RecordingPathfinder {
    fn new() -> Self {
        Self { queries: Mutex::new(Vec::new()) }
    }

    fn queries(&self) -> Vec<(GridCell, GridCell)> {
        self.queries.lock().unwrap().clone()
    }
}

impl PathfindingProvider for RecordingPathfinder {
    fn find_path(&self, from: GridCell, to: GridCell) -> Vec<GridCell> {
        self.queries.lock().unwrap().push((from, to));
        vec![from, to]
    }
}

fn cells(coords: &[(i32, i32)]) -> Vec<GridCell> {
    coords.iter().map(|&(col, row)| GridCell::new(col, row)).collect()
}

#[test]
fn test_segment_per_consecutive_pair_in_order() {
    let pathfinder = Arc::new(RecordingPathfinder::new());
    let waypoints = cells(&[(0, 0), (4, 0), (4, 4), (0, 4)]);

    let path = WaypointPath::new(waypoints.clone(), pathfinder.clone());

    assert_eq!(path.path(), waypoints.as_slice());
    assert_eq!(path.segments().len(), 3);
    assert_eq!(
        pathfinder.queries(),
        vec![
            (waypoints[0], waypoints[1]),
            (waypoints[1], waypoints[2]),
            (waypoints[2], waypoints[3]),
        ]
    );
    for (i, segment) in path.segments().iter().enumerate() {
        assert_eq!(segment, &vec![waypoints[i], waypoints[i + 1]]);
    }
}

#[test]
fn test_short_lists_have_no_segments() {
    let pathfinder = Arc::new(RecordingPathfinder::new());

    let empty = WaypointPath::empty(pathfinder.clone());
    assert!(empty.is_empty());
    assert!(empty.segments().is_empty());

    let single = WaypointPath::new(cells(&[(2, 3)]), pathfinder.clone());
    assert_eq!(single.len(), 1);
    assert!(single.segments().is_empty());
    assert!(pathfinder.queries().is_empty());
}

#[test]
fn test_set_path_recomputes_segments() {
    let pathfinder = Arc::new(RecordingPathfinder::new());
    let mut path = WaypointPath::new(cells(&[(0, 0), (1, 0), (2, 0)]), pathfinder.clone());
    assert_eq!(path.segments().len(), 2);

    path.set_path(cells(&[(5, 5), (6, 6)]));
    assert_eq!(path.len(), 2);
    assert_eq!(path.segments(), &[cells(&[(5, 5), (6, 6)])]);

    path.set_path(Vec::new());
    assert!(path.segments().is_empty());
}

#[test]
fn test_set_path_with_same_waypoints_is_deterministic() {
    let grid = Arc::new(GridMap::new(8, 8, cells(&[(3, 0), (3, 1), (3, 2)])).unwrap());
    let waypoints = cells(&[(0, 0), (6, 0), (6, 6)]);
    let mut path = WaypointPath::new(waypoints.clone(), grid);

    let first = path.segments().to_vec();
    path.set_path(waypoints.clone());
    assert_eq!(path.segments(), first.as_slice());
    path.set_path(waypoints);
    assert_eq!(path.segments(), first.as_slice());
}

#[test]
fn test_unreachable_leg_is_stored_empty() {
    let walls = cells(&[(2, 0), (2, 1), (2, 2)]);
    let grid = Arc::new(GridMap::new(5, 3, walls).unwrap());

    let path = WaypointPath::new(cells(&[(0, 0), (0, 2), (4, 2), (4, 0)]), grid);

    assert_eq!(path.segments().len(), 3);
    assert_eq!(path.segments()[0], cells(&[(0, 0), (0, 1), (0, 2)]));
    assert!(path.segments()[1].is_empty());
    assert_eq!(path.segments()[2], cells(&[(4, 2), (4, 1), (4, 0)]));
}

#[test]
fn test_repeated_waypoint_gives_single_cell_segment() {
    let grid = Arc::new(GridMap::new(4, 4, Vec::new()).unwrap());
    let path = WaypointPath::new(cells(&[(1, 1), (1, 1)]), grid);
    assert_eq!(path.segments(), &[cells(&[(1, 1)])]);
}

#[test]
fn test_snapshot_is_detached_from_later_updates() {
    let pathfinder = Arc::new(RecordingPathfinder::new());
    let mut path = WaypointPath::new(cells(&[(0, 0), (1, 0)]), pathfinder);

    let snapshot = path.snapshot();
    path.set_path(cells(&[(7, 7), (8, 8), (9, 9)]));

    assert_eq!(snapshot.first_waypoint, Some(GridCell::new(0, 0)));
    assert_eq!(snapshot.segments, vec![cells(&[(0, 0), (1, 0)])]);
    assert_eq!(path.snapshot().segments.len(), 2);
    let empty = WaypointPath::empty(Arc::new(RecordingPathfinder::new()));
    assert_eq!(empty.snapshot(), RouteSnapshot::default());
}
