use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tilemap_path::adapters::outbound::{init_logger, GridMap, InMemorySpriteEngine};
use tilemap_path::application::TilemapPathService;
use tilemap_path::domains::tilemap_path::{FollowEventActor, FollowRegistry, PathFollower, SpriteId};
use tilemap_path::{ApplicationResult, Config};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() -> ApplicationResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting tilemap path demo");

    let config = if Path::new(CONFIG_PATH).exists() {
        Config::load(CONFIG_PATH)?
    } else {
        warn!("{} not found, using defaults", CONFIG_PATH);
        Config::default()
    };
    info!(
        "Grid {}x{}, {} walls, default speed {}",
        config.grid.width,
        config.grid.height,
        config.grid.walls.len(),
        config.follow.default_speed
    );

    let logger = init_logger(&config.logging);

    let grid = Arc::new(GridMap::from_config(&config.grid)?);
    let engine = Arc::new(InMemorySpriteEngine::new(config.grid.tile_scale));
    tokio::spawn(engine.clone().run(Duration::from_millis(config.engine.tick_millis.max(1))));

    let (event_sender, event_receiver) = mpsc::channel(config.follow.event_buffer.max(1));
    let mut event_actor = FollowEventActor::new(event_receiver, logger.clone());
    let projections = event_actor.projection_store();
    tokio::spawn(async move { event_actor.run().await });

    let follower = Arc::new(
        PathFollower::new(
            Arc::new(FollowRegistry::new()),
            engine.clone(),
            grid.clone(),
            engine.clone(),
            logger.clone(),
        )
        .with_default_speed(config.follow.default_speed)
        .with_event_sender(event_sender),
    );
    let service = TilemapPathService::new(follower, grid);

    let sprite = SpriteId::new(config.demo.sprite.clone());
    engine.add_sprite_at(sprite.clone(), config.demo.start)?;

    let finished = engine.clone();
    service.on_sprite_finishes_path(move |sprite| match finished.position(sprite) {
        Some(position) => info!(
            "Sprite {} finished at ({:.1}, {:.1})",
            sprite, position.x, position.y
        ),
        None => info!("Sprite {} finished", sprite),
    });

    let path = service.create_path(config.demo.waypoints.clone());
    for (index, segment) in path.segments().iter().enumerate() {
        if segment.is_empty() {
            warn!("Segment {} has no route; it will be skipped", index);
        }
    }

    tokio::select! {
        outcome = service.follow_path(sprite.clone(), &path, None) => {
            match outcome {
                Ok(outcome) => info!("Follow ended: {:?}", outcome),
                Err(e) => error!("Follow failed: {}", e),
            }
        }
        _ = tokio::signal::ctrl_c() => {
            service.stop_follow_path(&sprite);
            info!("Interrupted, stop requested for {}", sprite);
        }
    }

    // Let the event actor drain before reporting.
    tokio::time::sleep(Duration::from_millis(50)).await;
    if let Some(overview) = projections.read().await.overviews.get(sprite.as_str()) {
        info!(
            "{}: {} runs, {} segments walked, status {:?}",
            overview.sprite_id, overview.runs_started, overview.segments_walked, overview.status
        );
    }

    info!("Shutting down tilemap path demo");
    Ok(())
}
