use crate::common::{DomainError, DomainResult};
use crate::domains::tilemap_path::{
    location_of, tile_center, CoordinateResolver, GridCell, MovementEngine, PixelPosition, SpriteId,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;

struct SpriteState {
    position: PixelPosition,
    route: VecDeque<PixelPosition>,
    speed: f64,
    moving: watch::Sender<bool>,
}

impl SpriteState {
    fn set_moving(&self, moving: bool) {
        self.moving.send_if_modified(|current| {
            let changed = *current != moving;
            *current = moving;
            changed
        });
    }
}

/// Movement engine that walks sprites from tile centre to tile centre.
///
/// Nothing moves until [`tick`](Self::tick) is called, either by hand or
/// from [`run`](Self::run). Moving status is published on a `watch` channel
/// per sprite so waiters wake exactly when a walk ends.
pub struct InMemorySpriteEngine {
    tile_scale: u32,
    sprites: Mutex<HashMap<SpriteId, SpriteState>>,
}

impl InMemorySpriteEngine {
    pub fn new(tile_scale: u32) -> Self {
        Self {
            tile_scale,
            sprites: Mutex::new(HashMap::new()),
        }
    }

    pub fn add_sprite(&self, sprite: SpriteId, position: PixelPosition) -> DomainResult<()> {
        let mut sprites = self.lock();
        if sprites.contains_key(&sprite) {
            return Err(DomainError::InvalidCommand {
                reason: format!("Sprite {} is already on the map", sprite),
            });
        }
        let (moving, _) = watch::channel(false);
        sprites.insert(
            sprite,
            SpriteState {
                position,
                route: VecDeque::new(),
                speed: 0.0,
                moving,
            },
        );
        Ok(())
    }

    /// Adds a sprite standing on the centre of `cell`.
    pub fn add_sprite_at(&self, sprite: SpriteId, cell: GridCell) -> DomainResult<()> {
        let position = tile_center(&cell, self.tile_scale);
        self.add_sprite(sprite, position)
    }

    pub fn remove_sprite(&self, sprite: &SpriteId) -> DomainResult<()> {
        let state = self
            .lock()
            .remove(sprite)
            .ok_or_else(|| DomainError::SpriteNotFound { id: sprite.clone() })?;
        state.set_moving(false);
        Ok(())
    }

    pub fn position(&self, sprite: &SpriteId) -> Option<PixelPosition> {
        self.lock().get(sprite).map(|state| state.position)
    }

    /// Moves a sprite instantly, cancelling any walk in progress.
    pub fn teleport(&self, sprite: &SpriteId, position: PixelPosition) -> DomainResult<()> {
        let mut sprites = self.lock();
        let state = sprites
            .get_mut(sprite)
            .ok_or_else(|| DomainError::SpriteNotFound { id: sprite.clone() })?;
        state.position = position;
        state.route.clear();
        state.set_moving(false);
        Ok(())
    }

    /// Advance every moving sprite by `elapsed`.
    pub fn tick(&self, elapsed: Duration) {
        let seconds = elapsed.as_secs_f64();
        let mut sprites = self.lock();
        for state in sprites.values_mut() {
            if state.route.is_empty() {
                continue;
            }
            let mut budget = state.speed * seconds;
            while let Some(target) = state.route.front().copied() {
                let distance = state.position.distance_to(&target);
                if distance > budget {
                    let ratio = budget / distance;
                    state.position.x += (target.x - state.position.x) * ratio;
                    state.position.y += (target.y - state.position.y) * ratio;
                    break;
                }
                budget -= distance;
                state.position = target;
                state.route.pop_front();
            }
            if state.route.is_empty() {
                state.set_moving(false);
            }
        }
    }

    /// Tick forever at `interval`. Spawn this on the runtime.
    pub async fn run(self: Arc<Self>, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let mut last = tokio::time::Instant::now();
        loop {
            let now = ticker.tick().await;
            self.tick(now.saturating_duration_since(last));
            last = now;
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SpriteId, SpriteState>> {
        self.sprites
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl MovementEngine for InMemorySpriteEngine {
    fn follow_path(&self, sprite: &SpriteId, cells: &[GridCell], speed: f64) {
        let mut sprites = self.lock();
        let Some(state) = sprites.get_mut(sprite) else {
            tracing::warn!("follow_path for unknown sprite {}", sprite);
            return;
        };
        state.route = cells
            .iter()
            .map(|cell| tile_center(cell, self.tile_scale))
            .collect();
        state.speed = speed.max(0.0);
        state.set_moving(!state.route.is_empty());
    }

    fn stop_moving(&self, sprite: &SpriteId) {
        if let Some(state) = self.lock().get_mut(sprite) {
            state.route.clear();
            state.set_moving(false);
        }
    }

    fn is_moving(&self, sprite: &SpriteId) -> bool {
        self.lock()
            .get(sprite)
            .map(|state| *state.moving.borrow())
            .unwrap_or(false)
    }

    async fn movement_finished(&self, sprite: &SpriteId) {
        let receiver = self.lock().get(sprite).map(|state| state.moving.subscribe());
        if let Some(mut receiver) = receiver {
            // A dropped sender means the sprite was removed, which also ends the walk.
            let _ = receiver.wait_for(|moving| !*moving).await;
        }
    }
}

impl CoordinateResolver for InMemorySpriteEngine {
    fn resolve_cell(&self, sprite: &SpriteId) -> Option<GridCell> {
        self.position(sprite)
            .map(|position| location_of(&position, self.tile_scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_hero() -> (InMemorySpriteEngine, SpriteId) {
        let engine = InMemorySpriteEngine::new(4);
        let hero = SpriteId::from("hero");
        engine.add_sprite_at(hero.clone(), GridCell::new(0, 0)).unwrap();
        (engine, hero)
    }

    #[test]
    fn test_tick_walks_to_last_cell() {
        let (engine, hero) = engine_with_hero();
        let cells = [GridCell::new(0, 0), GridCell::new(1, 0), GridCell::new(2, 0)];

        engine.follow_path(&hero, &cells, 16.0);
        assert!(engine.is_moving(&hero));

        engine.tick(Duration::from_secs(1));
        assert_eq!(engine.resolve_cell(&hero), Some(GridCell::new(1, 0)));
        assert!(engine.is_moving(&hero));

        engine.tick(Duration::from_secs(1));
        assert_eq!(engine.position(&hero), Some(PixelPosition::new(40.0, 8.0)));
        assert!(!engine.is_moving(&hero));
    }

    #[test]
    fn test_empty_route_is_idle() {
        let (engine, hero) = engine_with_hero();
        engine.follow_path(&hero, &[], 100.0);
        assert!(!engine.is_moving(&hero));
    }

    #[test]
    fn test_stop_keeps_position() {
        let (engine, hero) = engine_with_hero();
        engine.follow_path(&hero, &[GridCell::new(4, 0)], 16.0);
        engine.tick(Duration::from_millis(500));
        engine.stop_moving(&hero);

        assert!(!engine.is_moving(&hero));
        assert_eq!(engine.position(&hero), Some(PixelPosition::new(16.0, 8.0)));
        engine.tick(Duration::from_secs(5));
        assert_eq!(engine.position(&hero), Some(PixelPosition::new(16.0, 8.0)));
    }

    #[test]
    fn test_duplicate_and_unknown_sprites() {
        let (engine, hero) = engine_with_hero();
        assert!(engine.add_sprite(hero.clone(), PixelPosition::new(0.0, 0.0)).is_err());

        let ghost = SpriteId::from("ghost");
        assert!(matches!(
            engine.teleport(&ghost, PixelPosition::new(1.0, 1.0)),
            Err(DomainError::SpriteNotFound { .. })
        ));
        assert_eq!(engine.resolve_cell(&ghost), None);
        assert!(!engine.is_moving(&ghost));
    }

    #[tokio::test]
    async fn test_movement_finished_wakes_on_arrival() {
        let engine = Arc::new(InMemorySpriteEngine::new(4));
        let hero = SpriteId::from("hero");
        engine.add_sprite_at(hero.clone(), GridCell::new(0, 0)).unwrap();
        engine.follow_path(&hero, &[GridCell::new(1, 0)], 16.0);

        let waiter = {
            let engine = engine.clone();
            let hero = hero.clone();
            tokio::spawn(async move { engine.movement_finished(&hero).await })
        };
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        engine.tick(Duration::from_secs(1));
        waiter.await.unwrap();
        assert!(!engine.is_moving(&hero));
    }

    #[tokio::test]
    async fn test_removing_sprite_ends_its_walk() {
        let engine = Arc::new(InMemorySpriteEngine::new(4));
        let hero = SpriteId::from("hero");
        engine.add_sprite_at(hero.clone(), GridCell::new(0, 0)).unwrap();
        engine.follow_path(&hero, &[GridCell::new(5, 0)], 16.0);

        let waiter = {
            let engine = engine.clone();
            let hero = hero.clone();
            tokio::spawn(async move { engine.movement_finished(&hero).await })
        };
        tokio::task::yield_now().await;

        engine.remove_sprite(&hero).unwrap();
        waiter.await.unwrap();
        assert_eq!(engine.position(&hero), None);
        assert!(matches!(
            engine.remove_sprite(&hero),
            Err(DomainError::SpriteNotFound { .. })
        ));
    }
}
