//! Prelude module for common tilescope types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use tilescope::prelude::*;`

pub use crate::core::{
    config::ViewerConfig,
    controller::{TickOutcome, ViewportController},
    geo::{Point, ScreenRect, Size, TileKey, TileRange, WorldSize},
    scheduler::{FramePlan, FrameScheduler},
    status::ViewStatus,
    transform::TileGeometry,
    viewport::Viewport,
};

pub use crate::input::events::InputEvent;

pub use crate::rendering::{
    headless::HeadlessSurface,
    surface::{PlaceholderId, RenderSurface},
};

pub use crate::runtime::{
    spawners::{InlineSpawner, ThreadSpawner},
    AsyncSpawner,
};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::spawners::tokio_impl::TokioSpawner;

pub use crate::tiles::{
    active::ActiveTileSet,
    cache::TileCache,
    decode::{DecodedTile, ImageDecoder},
    loader::{TileLoader, TileRequest, TileResult},
    source::{AssetSource, FsAssetSource, MemoryAssetSource, TileLayout},
    world::WorldSizeProbe,
};

#[cfg(feature = "image-decode")]
pub use crate::tiles::decode::ImageCrateDecoder;

pub use crate::{Error as ViewerError, Result};

pub use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
