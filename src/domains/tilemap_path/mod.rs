pub mod actors;
pub mod coords;
pub mod events;
pub mod follower;
pub mod path;
pub mod ports;
pub mod projections;
pub mod registry;
pub mod types;

pub use actors::*;
pub use coords::*;
pub use events::*;
pub use follower::*;
pub use path::*;
pub use ports::*;
pub use projections::*;
pub use registry::*;
pub use types::*;
