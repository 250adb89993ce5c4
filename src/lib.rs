//! # tilescope
//!
//! A viewport-driven engine for viewing arbitrarily large images that have
//! been cut into a pyramid of tiles.
//!
//! The engine keeps only the tiles visible at the current resolution level
//! loaded, caches decoded tiles in a bounded LRU, and drives everything from
//! an explicit per-frame [`ViewportController::tick`] call. Presentation,
//! asset access and image decoding are pluggable through traits so the core
//! can run headless.

pub mod core;
pub mod input;
pub mod rendering;
pub mod runtime;
pub mod tiles;
pub mod prelude;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::ViewerConfig,
    controller::{TickOutcome, ViewportController},
    geo::{Point, ScreenRect, Size, TileKey, TileRange, WorldSize},
    scheduler::{FramePlan, FrameScheduler},
    status::ViewStatus,
    viewport::Viewport,
};

pub use crate::input::events::InputEvent;

pub use crate::rendering::{
    headless::HeadlessSurface,
    surface::{PlaceholderId, RenderSurface},
};

pub use crate::runtime::AsyncSpawner;

pub use crate::tiles::{
    active::ActiveTileSet,
    cache::TileCache,
    decode::{DecodedTile, ImageDecoder},
    loader::{TileLoader, TileRequest, TileResult},
    source::{AssetSource, FsAssetSource, MemoryAssetSource, TileLayout},
    world::WorldSizeProbe,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Asset not found: {}", .0.display())]
    AssetMissing(std::path::PathBuf),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Runtime error: {0}")]
    Runtime(String),
}

/// Error type alias for convenience
pub type Error = ViewerError;
