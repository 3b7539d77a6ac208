use std::io::Write;
use tempfile::NamedTempFile;
use tilemap_path::domains::tilemap_path::{GridCell, DEFAULT_SPEED, DEFAULT_TILE_SCALE};
use tilemap_path::Config;

const SAMPLE: &str = r#"
[grid]
width = 10
height = 6
tile_scale = 3
walls = [{ col = 4, row = 0 }, { col = 4, row = 1 }]

[follow]
default_speed = 60.0

[demo]
sprite = "scout"
start = { col = 1, row = 1 }
waypoints = [{ col = 8, row = 0 }, { col = 8, row = 5 }]
"#;

fn sample_file() -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_from_file_reads_toml_and_fills_defaults() {
    let file = sample_file();

    let config = Config::from_file(file.path()).await.unwrap();

    assert_eq!(config.grid.width, 10);
    assert_eq!(config.grid.tile_scale, 3);
    assert_eq!(config.grid.walls, vec![GridCell::new(4, 0), GridCell::new(4, 1)]);
    assert_eq!(config.follow.default_speed, 60.0);
    assert_eq!(config.follow.event_buffer, 64);
    assert_eq!(config.engine.tick_millis, 16);
    assert!(config.logging.file.is_none());
    assert_eq!(config.demo.sprite, "scout");
    assert_eq!(config.demo.waypoints.len(), 2);
}

#[tokio::test]
async fn test_from_file_missing_is_error() {
    assert!(Config::from_file("/definitely/not/here.toml").await.is_err());
}

#[test]
fn test_load_without_file_uses_defaults() {
    let config = Config::load("/definitely/not/here.toml").unwrap();

    assert_eq!(config.grid.width, 16);
    assert_eq!(config.grid.tile_scale, DEFAULT_TILE_SCALE);
    assert!(config.grid.walls.is_empty());
    assert_eq!(config.demo.sprite, "hero");
}

#[test]
fn test_load_applies_environment_overrides() {
    let file = sample_file();
    std::env::set_var("TILEMAP_PATH__ENGINE__TICK_MILLIS", "5");

    let config = Config::load(file.path()).unwrap();
    std::env::remove_var("TILEMAP_PATH__ENGINE__TICK_MILLIS");

    assert_eq!(config.engine.tick_millis, 5);
    assert_eq!(config.grid.width, 10);
    assert_eq!(config.follow.default_speed, 60.0);
}

#[test]
fn test_default_speed_matches_domain_default() {
    assert_eq!(Config::default().follow.default_speed, DEFAULT_SPEED);
}

#[tokio::test]
async fn test_out_of_range_tile_scale_is_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(b"[grid]\ntile_scale = 32\n").unwrap();

    assert!(Config::from_file(file.path()).await.is_err());
    assert!(Config::load(file.path()).is_err());
}
