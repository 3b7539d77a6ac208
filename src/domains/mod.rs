pub mod logger;
pub mod tilemap_path;

pub use logger::*;
pub use tilemap_path::*;
