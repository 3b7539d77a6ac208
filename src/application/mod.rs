pub mod tilemap_path_service;

pub use tilemap_path_service::*;
