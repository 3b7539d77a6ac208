use crate::domains::tilemap_path::{GridCell, SpriteId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Sprite not found: {id}")]
    SpriteNotFound { id: SpriteId },

    #[error("Cell {cell} lies outside the {width}x{height} grid")]
    CellOutOfBounds { cell: GridCell, width: u32, height: u32 },

    #[error("Invalid command: {reason}")]
    InvalidCommand { reason: String },
}

#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Follow task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;
pub type ApplicationResult<T> = Result<T, ApplicationError>;
