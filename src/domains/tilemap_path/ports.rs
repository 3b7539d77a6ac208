use super::types::{GridCell, SpriteId};
use async_trait::async_trait;

/// Port for the host's grid search. Implementations return the cells from
/// `from` to `to` inclusive, `[from]` when both are equal, and an empty
/// vector when no route exists.
pub trait PathfindingProvider: Send + Sync {
    fn find_path(&self, from: GridCell, to: GridCell) -> Vec<GridCell>;
}

/// Port for the host's sprite movement.
#[async_trait]
pub trait MovementEngine: Send + Sync {
    /// Replace whatever the sprite is doing with a walk along `cells`.
    /// An empty slice leaves the sprite idle.
    fn follow_path(&self, sprite: &SpriteId, cells: &[GridCell], speed: f64);

    fn stop_moving(&self, sprite: &SpriteId);

    fn is_moving(&self, sprite: &SpriteId) -> bool;

    /// Resolves once the sprite is no longer walking a path.
    ///
    /// The default yields to the scheduler between status checks; engines
    /// that can signal completion directly should override it.
    async fn movement_finished(&self, sprite: &SpriteId) {
        while self.is_moving(sprite) {
            tokio::task::yield_now().await;
        }
    }
}

/// Port mapping a sprite's continuous position to the tile it stands on.
pub trait CoordinateResolver: Send + Sync {
    /// `None` when the sprite is unknown to the host.
    fn resolve_cell(&self, sprite: &SpriteId) -> Option<GridCell>;
}
