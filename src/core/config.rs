//! Configuration for the tile engine
//!
//! `ViewerConfig` is built once by the host (defaults, a JSON file, or
//! environment overrides) and handed to the controller by reference. All
//! tunables of the update loop live here, including the padding ring and the
//! zoom epsilon.

use crate::core::constants::*;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory holding one sub-directory per zoom level
    pub tiles_root: PathBuf,
    /// Tile file extension without the dot
    pub tile_extension: String,
    pub max_zoom_level: u8,
    /// Decoded tiles kept in the LRU cache
    pub cache_capacity: usize,
    /// Ticks between throttled reload passes
    pub throttle_interval: u32,
    /// Scale multiplier per wheel notch
    pub zoom_step: f64,
    /// Minimum scale before the first fit
    pub min_scale_floor: f64,
    pub tile_padding: u32,
    pub zoom_epsilon: f64,
    pub device_pixel_ratio: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tiles_root: PathBuf::from(DEFAULT_TILES_ROOT),
            tile_extension: DEFAULT_TILE_EXTENSION.to_string(),
            max_zoom_level: DEFAULT_MAX_ZOOM_LEVEL,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            throttle_interval: DEFAULT_THROTTLE_INTERVAL,
            zoom_step: DEFAULT_ZOOM_STEP,
            min_scale_floor: DEFAULT_MIN_SCALE_FLOOR,
            tile_padding: DEFAULT_TILE_PADDING,
            zoom_epsilon: DEFAULT_ZOOM_EPSILON,
            device_pixel_ratio: DEFAULT_DEVICE_PIXEL_RATIO,
        }
    }
}

/// Unified configuration presets
impl ViewerConfig {
    /// Small cache, no throttling; keeps tests deterministic.
    pub fn for_testing() -> Self {
        Self {
            cache_capacity: 64,
            throttle_interval: 1,
            ..Self::default()
        }
    }

    pub fn with_tiles_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.tiles_root = root.into();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Defaults overridden by `TILESCOPE_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden through an arbitrary key lookup.
    ///
    /// Unset keys keep their default; set but unparsable values are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(root) = lookup(ENV_TILES_ROOT).filter(|v| !v.trim().is_empty()) {
            config.tiles_root = PathBuf::from(root.trim());
        }
        if let Some(v) = lookup(ENV_MAX_ZOOM) {
            config.max_zoom_level = parse_value(ENV_MAX_ZOOM, &v)?;
        }
        if let Some(v) = lookup(ENV_CACHE_CAPACITY) {
            config.cache_capacity = parse_value(ENV_CACHE_CAPACITY, &v)?;
        }
        if let Some(v) = lookup(ENV_THROTTLE_TICKS) {
            config.throttle_interval = parse_value(ENV_THROTTLE_TICKS, &v)?;
        }
        if let Some(v) = lookup(ENV_ZOOM_STEP) {
            config.zoom_step = parse_value(ENV_ZOOM_STEP, &v)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(Error::Config("cache_capacity must be at least 1".into()));
        }
        if self.throttle_interval == 0 {
            return Err(Error::Config("throttle_interval must be at least 1".into()));
        }
        if !(self.zoom_step > 1.0) || !self.zoom_step.is_finite() {
            return Err(Error::Config(format!("zoom_step must be > 1, got {}", self.zoom_step)));
        }
        if !(self.min_scale_floor > 0.0) || !self.min_scale_floor.is_finite() {
            return Err(Error::Config(format!(
                "min_scale_floor must be positive, got {}",
                self.min_scale_floor
            )));
        }
        if !(self.device_pixel_ratio > 0.0) || !self.device_pixel_ratio.is_finite() {
            return Err(Error::Config(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !(self.zoom_epsilon >= 0.0) || self.zoom_epsilon >= 1.0 {
            return Err(Error::Config(format!("zoom_epsilon must be in [0, 1), got {}", self.zoom_epsilon)));
        }
        if self.max_zoom_level > MAX_SUPPORTED_ZOOM_LEVEL {
            return Err(Error::Config(format!(
                "max_zoom_level {} exceeds {}",
                self.max_zoom_level, MAX_SUPPORTED_ZOOM_LEVEL
            )));
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} has invalid value {:?}", key, raw)))
}
