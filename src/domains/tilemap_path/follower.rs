use super::events::FollowEvent;
use super::path::{RouteSnapshot, WaypointPath};
use super::ports::{CoordinateResolver, MovementEngine, PathfindingProvider};
use super::registry::{FinishHandler, FollowRegistry};
use super::types::{FollowOutcome, GridCell, SpriteId, DEFAULT_SPEED};
use crate::domains::DynLogger;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Drives sprites through the segments of a [`WaypointPath`].
///
/// Each follow runs as its own task. Tasks share nothing but the
/// [`FollowRegistry`], and a stop request is only acted on once the leg in
/// progress has finished moving.
pub struct PathFollower {
    registry: Arc<FollowRegistry>,
    engine: Arc<dyn MovementEngine>,
    pathfinder: Arc<dyn PathfindingProvider>,
    resolver: Arc<dyn CoordinateResolver>,
    logger: DynLogger,
    default_speed: f64,
    event_sender: Option<mpsc::Sender<FollowEvent>>,
}

impl PathFollower {
    pub fn new(
        registry: Arc<FollowRegistry>,
        engine: Arc<dyn MovementEngine>,
        pathfinder: Arc<dyn PathfindingProvider>,
        resolver: Arc<dyn CoordinateResolver>,
        logger: DynLogger,
    ) -> Self {
        Self {
            registry,
            engine,
            pathfinder,
            resolver,
            logger,
            default_speed: DEFAULT_SPEED,
            event_sender: None,
        }
    }

    pub fn with_default_speed(mut self, speed: f64) -> Self {
        self.default_speed = speed;
        self
    }

    /// Publish [`FollowEvent`]s on `sender`. Events are dropped, with a
    /// warning, when the channel is full or closed.
    pub fn with_event_sender(mut self, sender: mpsc::Sender<FollowEvent>) -> Self {
        self.event_sender = Some(sender);
        self
    }

    pub fn registry(&self) -> &Arc<FollowRegistry> {
        &self.registry
    }

    /// Walk `sprite` through `path`, resolving when the route is finished or
    /// a stop request is observed. `speed` falls back to the default speed.
    ///
    /// The route is copied when the call starts; changing `path` afterwards
    /// does not affect this run.
    pub async fn follow(
        &self,
        sprite: &SpriteId,
        path: &WaypointPath,
        speed: Option<f64>,
    ) -> FollowOutcome {
        let speed = speed.unwrap_or(self.default_speed);
        let route = path.snapshot();
        let run = self.begin(sprite, path.len(), &route, speed);
        self.drive(run, route, speed).await
    }

    /// Like [`follow`](Self::follow), but registers the sprite immediately
    /// and runs the traversal on a spawned tokio task.
    pub fn spawn_follow(
        self: &Arc<Self>,
        sprite: SpriteId,
        path: &WaypointPath,
        speed: Option<f64>,
    ) -> JoinHandle<FollowOutcome> {
        let speed = speed.unwrap_or(self.default_speed);
        let route = path.snapshot();
        let run = self.begin(&sprite, path.len(), &route, speed);
        let follower = Arc::clone(self);
        tokio::spawn(async move { follower.drive(run, route, speed).await })
    }

    /// Ask a following sprite to stop. Movement is cancelled right away; the
    /// follow task ends at its next leg boundary. Returns false, without
    /// touching the engine, when the sprite is not following.
    pub fn request_stop(&self, sprite: &SpriteId) -> bool {
        if !self.registry.mark_stop_pending(sprite) {
            return false;
        }
        self.engine.stop_moving(sprite);
        self.logger.info(&format!("Stop requested for sprite {}", sprite));
        self.publish(FollowEvent::StopRequested {
            sprite_id: sprite.to_string(),
            timestamp: Utc::now(),
        });
        true
    }

    pub fn is_following(&self, sprite: &SpriteId) -> bool {
        self.registry.is_following(sprite)
    }

    /// Set the handler run when a sprite finishes a path without being
    /// stopped. Replaces any earlier handler; there is only one slot.
    pub fn on_finish<F>(&self, handler: F)
    where
        F: Fn(&SpriteId) + Send + Sync + 'static,
    {
        let handler: FinishHandler = Arc::new(handler);
        self.registry.set_finish_handler(handler);
    }

    fn begin(
        &self,
        sprite: &SpriteId,
        waypoint_count: usize,
        route: &RouteSnapshot,
        speed: f64,
    ) -> ActiveRun {
        let run = ActiveRun::register(self.registry.clone(), sprite.clone());
        self.logger.info(&format!(
            "Sprite {} following {} waypoints ({} segments) at speed {}",
            sprite,
            waypoint_count,
            route.segments.len(),
            speed
        ));
        self.publish(FollowEvent::FollowStarted {
            sprite_id: sprite.to_string(),
            run_id: run.id,
            waypoint_count,
            segment_count: route.segments.len(),
            speed,
            timestamp: Utc::now(),
        });
        run
    }

    async fn drive(&self, mut run: ActiveRun, route: RouteSnapshot, speed: f64) -> FollowOutcome {
        if let Some(first) = route.first_waypoint {
            let issued = self.issue_approach(&run, first, speed);
            // A path without segments completes as soon as the approach is issued.
            if issued && !route.segments.is_empty() {
                self.engine.movement_finished(&run.sprite).await;
                if run.take_pending_stop() {
                    return self.interrupted(&run, 0);
                }
            }
        }

        for (index, segment) in route.segments.iter().enumerate() {
            self.publish(FollowEvent::SegmentStarted {
                sprite_id: run.sprite.to_string(),
                run_id: run.id,
                index,
                cell_count: segment.len(),
                timestamp: Utc::now(),
            });
            self.engine.follow_path(&run.sprite, segment, speed);
            self.engine.movement_finished(&run.sprite).await;
            self.publish(FollowEvent::SegmentFinished {
                sprite_id: run.sprite.to_string(),
                run_id: run.id,
                index,
                timestamp: Utc::now(),
            });

            if run.take_pending_stop() {
                return self.interrupted(&run, index + 1);
            }
        }

        let segments = route.segments.len();
        if let Some(handler) = self.registry.finish_handler() {
            handler(&run.sprite);
        }
        let (sprite, run_id) = run.finish();

        self.logger.info(&format!("Sprite {} finished its path", sprite));
        self.publish(FollowEvent::FollowCompleted {
            sprite_id: sprite.to_string(),
            run_id,
            segments_completed: segments,
            timestamp: Utc::now(),
        });
        FollowOutcome::Completed { segments }
    }

    // The approach leg starts from wherever the sprite stands now, so it is
    // never taken from the stored segments. Returns false when nothing was
    // issued.
    fn issue_approach(&self, run: &ActiveRun, first: GridCell, speed: f64) -> bool {
        let sprite = &run.sprite;
        let Some(from) = self.resolver.resolve_cell(sprite) else {
            self.logger.warn(&format!(
                "Sprite {} has no known position; skipping approach to {}",
                sprite, first
            ));
            return false;
        };

        let cells = self.pathfinder.find_path(from, first);
        if cells.is_empty() {
            self.logger.warn(&format!(
                "No route from {} to first waypoint {} for sprite {}",
                from, first, sprite
            ));
        }
        self.publish(FollowEvent::ApproachIssued {
            sprite_id: sprite.to_string(),
            run_id: run.id,
            from: Some(from),
            to: first,
            cell_count: cells.len(),
            timestamp: Utc::now(),
        });
        self.engine.follow_path(sprite, &cells, speed);
        true
    }

    fn interrupted(&self, run: &ActiveRun, segments_completed: usize) -> FollowOutcome {
        self.logger.info(&format!(
            "Sprite {} stopped following after {} segments",
            run.sprite, segments_completed
        ));
        self.publish(FollowEvent::FollowInterrupted {
            sprite_id: run.sprite.to_string(),
            run_id: run.id,
            segments_completed,
            timestamp: Utc::now(),
        });
        FollowOutcome::Interrupted { segments_completed }
    }

    fn publish(&self, event: FollowEvent) {
        if let Some(sender) = &self.event_sender {
            if let Err(e) = sender.try_send(event) {
                self.logger.warn(&format!("Dropped follow event: {}", e));
            }
        }
    }
}

/// Registration of one follow run. Dropping it before the run ends, through
/// cancellation or a panicking finish handler, removes the sprite from the
/// registry.
struct ActiveRun {
    id: Uuid,
    sprite: SpriteId,
    registry: Arc<FollowRegistry>,
    registered: bool,
}

impl ActiveRun {
    fn register(registry: Arc<FollowRegistry>, sprite: SpriteId) -> Self {
        registry.register(&sprite);
        Self {
            id: Uuid::new_v4(),
            sprite,
            registry,
            registered: true,
        }
    }

    /// Consumes a pending stop. The registry has already dropped the sprite
    /// when this returns true.
    fn take_pending_stop(&mut self) -> bool {
        let stopped = self.registry.take_pending_stop(&self.sprite);
        if stopped {
            self.registered = false;
        }
        stopped
    }

    fn finish(mut self) -> (SpriteId, Uuid) {
        self.registry.unregister(&self.sprite);
        self.registered = false;
        (self.sprite.clone(), self.id)
    }
}

impl Drop for ActiveRun {
    fn drop(&mut self) {
        if self.registered {
            self.registry.unregister(&self.sprite);
        }
    }
}
