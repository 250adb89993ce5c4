use crate::core::geo::{ScreenRect, TileKey};
use crate::core::transform::TileGeometry;
use crate::prelude::{Arc, HashMap, HashSet};
use crate::rendering::surface::{PlaceholderId, RenderSurface};
use crate::tiles::decode::DecodedTile;

/// One tile that currently has a placeholder on the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveTile {
    pub placeholder: PlaceholderId,
    /// Last rectangle pushed to the surface
    pub rect: Option<ScreenRect>,
    pub visible: bool,
    pub has_content: bool,
}

/// What a reconcile pass changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub added: usize,
    pub removed: usize,
}

/// Tiles that own a placeholder, keyed by tile key
#[derive(Debug, Default)]
pub struct ActiveTileSet {
    tiles: HashMap<TileKey, ActiveTile>,
}

impl ActiveTileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the set match `needed`.
    ///
    /// Tiles no longer needed are released from the surface; new keys get a
    /// hidden, empty placeholder. Tiles present in both keep their
    /// placeholder and content.
    pub fn reconcile(&mut self, needed: &HashSet<TileKey>, surface: &mut dyn RenderSurface) -> ReconcileStats {
        let before = self.tiles.len();
        self.tiles.retain(|key, tile| {
            let keep = needed.contains(key);
            if !keep {
                surface.release(tile.placeholder);
            }
            keep
        });
        let removed = before - self.tiles.len();

        let mut added = 0;
        for key in needed {
            if !self.tiles.contains_key(key) {
                let placeholder = surface.allocate();
                surface.set_visible(placeholder, false);
                self.tiles.insert(
                    *key,
                    ActiveTile {
                        placeholder,
                        rect: None,
                        visible: false,
                        has_content: false,
                    },
                );
                added += 1;
            }
        }

        if added > 0 || removed > 0 {
            log::debug!("reconciled active tiles: +{} -{} ({} total)", added, removed, self.tiles.len());
        }
        ReconcileStats { added, removed }
    }

    /// Pushes fresh screen rectangles for every tile whose rect moved
    pub fn place_all(&mut self, geometry: &TileGeometry, surface: &mut dyn RenderSurface) -> usize {
        let mut moved = 0;
        for (key, tile) in self.tiles.iter_mut() {
            let rect = geometry.tile_screen_rect(*key);
            if tile.rect != Some(rect) {
                surface.set_rect(tile.placeholder, rect);
                tile.rect = Some(rect);
                moved += 1;
            }
        }
        moved
    }

    /// Shows decoded content in the tile's placeholder.
    ///
    /// Returns `false` when the tile is no longer active.
    pub fn show_content(&mut self, key: &TileKey, content: Arc<DecodedTile>, surface: &mut dyn RenderSurface) -> bool {
        let Some(tile) = self.tiles.get_mut(key) else {
            log::trace!("dropping content for inactive tile {:?}", key);
            return false;
        };
        surface.set_content(tile.placeholder, content);
        surface.set_visible(tile.placeholder, true);
        tile.has_content = true;
        tile.visible = true;
        true
    }

    /// Hides a tile whose content could not be produced.
    ///
    /// A tile already showing content keeps it.
    pub fn mark_unavailable(&mut self, key: &TileKey, surface: &mut dyn RenderSurface) {
        if let Some(tile) = self.tiles.get_mut(key) {
            if !tile.has_content && tile.visible {
                surface.set_visible(tile.placeholder, false);
                tile.visible = false;
            }
        }
    }

    /// Releases every placeholder
    pub fn clear(&mut self, surface: &mut dyn RenderSurface) {
        for (_, tile) in self.tiles.drain() {
            surface.release(tile.placeholder);
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.tiles.contains_key(key)
    }

    pub fn get(&self, key: &TileKey) -> Option<&ActiveTile> {
        self.tiles.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TileKey> + '_ {
        self.tiles.keys()
    }
}
