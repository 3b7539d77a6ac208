use crate::domains::tilemap_path::{GridCell, DEFAULT_SPEED, DEFAULT_TILE_SCALE, MAX_TILE_SCALE};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `TILEMAP_PATH__FOLLOW__DEFAULT_SPEED=60`.
pub const ENV_PREFIX: &str = "TILEMAP_PATH";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub follow: FollowConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
    pub demo: DemoConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    /// Tiles are `1 << tile_scale` pixels wide.
    pub tile_scale: u32,
    pub walls: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    pub default_speed: f64,
    pub event_buffer: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub tick_millis: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file for the `fast_log` adapter. Console only when unset.
    pub file: Option<String>,
    /// Send domain log lines through a bounded background channel.
    pub buffered: bool,
    pub buffer_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub sprite: String,
    pub start: GridCell,
    pub waypoints: Vec<GridCell>,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Layered load: defaults, then `path` if it exists, then `TILEMAP_PATH__*`
    /// environment variables.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path.as_ref()).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.grid.tile_scale <= MAX_TILE_SCALE,
            "grid.tile_scale {} exceeds the maximum of {}",
            self.grid.tile_scale,
            MAX_TILE_SCALE
        );
        ensure!(
            self.follow.default_speed.is_finite() && self.follow.default_speed > 0.0,
            "follow.default_speed must be a positive number, got {}",
            self.follow.default_speed
        );
        Ok(())
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 12,
            tile_scale: DEFAULT_TILE_SCALE,
            walls: Vec::new(),
        }
    }
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            default_speed: DEFAULT_SPEED,
            event_buffer: 64,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { tick_millis: 16 }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            buffered: false,
            buffer_capacity: 256,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            sprite: "hero".to_string(),
            start: GridCell::new(0, 0),
            waypoints: vec![GridCell::new(2, 0), GridCell::new(2, 4), GridCell::new(6, 4)],
        }
    }
}
