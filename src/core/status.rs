use crate::core::geo::{Point, TileKey};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot for a host's status line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewStatus {
    pub level: u8,
    pub active_tiles: usize,
    /// World coordinates under the canvas centre
    pub center: Point,
    /// Tile under the canvas centre
    pub center_tile: TileKey,
}

impl fmt::Display for ViewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Level: {} | Tiles: {} | ({:.0}, {:.0}) | {}_{}",
            self.level, self.active_tiles, self.center.x, self.center.y, self.center_tile.x, self.center_tile.y
        )
    }
}
