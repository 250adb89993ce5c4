//! Core constants for the tile pyramid engine.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Default tiles root, relative to the working directory.
pub const DEFAULT_TILES_ROOT: &str = "tiles";

/// Default file extension of tile assets.
pub const DEFAULT_TILE_EXTENSION: &str = "jpg";

/// Deepest pyramid level used unless configured otherwise.
pub const DEFAULT_MAX_ZOOM_LEVEL: u8 = 5;

/// Hard ceiling for `max_zoom_level`; keeps `2^zoom` comfortably inside `u32`.
pub const MAX_SUPPORTED_ZOOM_LEVEL: u8 = 30;

/// Decoded tiles kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Ticks between reload passes when nothing forces an immediate load.
pub const DEFAULT_THROTTLE_INTERVAL: u32 = 5;

/// Scale multiplier applied per wheel notch.
pub const DEFAULT_ZOOM_STEP: f64 = 1.1;

/// Minimum scale used before the first fit-to-view has happened.
pub const DEFAULT_MIN_SCALE_FLOOR: f64 = 0.01;

/// Rings of extra tiles loaded around the visible rectangle.
pub const DEFAULT_TILE_PADDING: u32 = 1;

/// Added to `log2(scale / min_scale)` before flooring to absorb float jitter
/// at exact level boundaries.
pub const DEFAULT_ZOOM_EPSILON: f64 = 1e-6;

/// Physical pixels per logical pixel on the render surface.
pub const DEFAULT_DEVICE_PIXEL_RATIO: f64 = 1.0;

/// Environment variable overrides understood by `ViewerConfig::from_env`.
pub const ENV_TILES_ROOT: &str = "TILESCOPE_TILES_ROOT";
pub const ENV_MAX_ZOOM: &str = "TILESCOPE_MAX_ZOOM";
pub const ENV_CACHE_CAPACITY: &str = "TILESCOPE_CACHE_CAPACITY";
pub const ENV_THROTTLE_TICKS: &str = "TILESCOPE_THROTTLE_TICKS";
pub const ENV_ZOOM_STEP: &str = "TILESCOPE_ZOOM_STEP";
