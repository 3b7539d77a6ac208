// Tilemap path service - the surface UI bindings call into
use crate::common::ApplicationResult;
use crate::domains::tilemap_path::{
    FollowOutcome, GridCell, PathFollower, PathfindingProvider, SpriteId, WaypointPath,
};
use std::sync::Arc;

pub struct TilemapPathService {
    follower: Arc<PathFollower>,
    pathfinder: Arc<dyn PathfindingProvider>,
}

impl TilemapPathService {
    pub fn new(follower: Arc<PathFollower>, pathfinder: Arc<dyn PathfindingProvider>) -> Self {
        Self { follower, pathfinder }
    }

    /// Build a path through `waypoints`, in order.
    pub fn create_path(&self, waypoints: Vec<GridCell>) -> WaypointPath {
        WaypointPath::new(waypoints, self.pathfinder.clone())
    }

    /// Run a follow task to completion on the runtime. The sprite counts as
    /// following from the moment this is called.
    pub async fn follow_path(
        &self,
        sprite: SpriteId,
        path: &WaypointPath,
        speed: Option<f64>,
    ) -> ApplicationResult<FollowOutcome> {
        let handle = self.follower.spawn_follow(sprite, path, speed);
        Ok(handle.await?)
    }

    pub fn is_sprite_following_path(&self, sprite: &SpriteId) -> bool {
        self.follower.is_following(sprite)
    }

    pub fn stop_follow_path(&self, sprite: &SpriteId) -> bool {
        self.follower.request_stop(sprite)
    }

    /// Only the most recently registered handler is kept.
    pub fn on_sprite_finishes_path<F>(&self, handler: F)
    where
        F: Fn(&SpriteId) + Send + Sync + 'static,
    {
        self.follower.on_finish(handler);
    }
}
