pub mod grid_map;
pub mod logging;
pub mod sprite_engine;

pub use grid_map::*;
pub use logging::*;
pub use sprite_engine::*;
