use crate::core::geo::TileKey;
use crate::prelude::{Arc, Mutex};
use crate::tiles::decode::DecodedTile;
use lru::LruCache;
use std::num::NonZeroUsize;

#[derive(Debug)]
struct CacheState {
    entries: LruCache<TileKey, Arc<DecodedTile>>,
    /// Bumped on every clear; inserts carrying an older epoch are dropped
    epoch: u64,
}

/// Bounded LRU of decoded tiles, shared between the tick thread and workers.
///
/// Cloning yields another handle to the same cache.
#[derive(Debug, Clone)]
pub struct TileCache {
    state: Arc<Mutex<CacheState>>,
}

impl TileCache {
    /// Create a new tile cache holding at most `capacity` tiles (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or_else(|| {
            log::warn!("tile cache capacity 0 is not usable, holding 1 tile");
            NonZeroUsize::MIN
        });
        Self {
            state: Arc::new(Mutex::new(CacheState {
                entries: LruCache::new(capacity),
                epoch: 0,
            })),
        }
    }

    /// Looks up a tile and marks it most recently used
    pub fn get(&self, key: &TileKey) -> Option<Arc<DecodedTile>> {
        self.state.lock().ok()?.entries.get(key).cloned()
    }

    /// Looks up a tile without touching recency
    pub fn peek(&self, key: &TileKey) -> Option<Arc<DecodedTile>> {
        self.state.lock().ok()?.entries.peek(key).cloned()
    }

    pub fn contains(&self, key: &TileKey) -> bool {
        self.state
            .lock()
            .ok()
            .map(|state| state.entries.contains(key))
            .unwrap_or(false)
    }

    /// Inserts a tile decoded during `epoch`.
    ///
    /// Returns `false` (and stores nothing) when the cache was cleared since
    /// the job started. Evicts the least recently used entry when full.
    pub fn insert(&self, key: TileKey, tile: Arc<DecodedTile>, epoch: u64) -> bool {
        let Ok(mut state) = self.state.lock() else {
            return false;
        };
        if state.epoch != epoch {
            log::trace!("dropping tile {:?} decoded for stale epoch {}", key, epoch);
            return false;
        }
        if let Some((evicted, _)) = state.entries.push(key, tile) {
            if evicted != key {
                log::trace!("evicted tile {:?}", evicted);
            }
        }
        true
    }

    /// Empties the cache and invalidates all in-flight work
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.entries.clear();
            state.epoch = state.epoch.wrapping_add(1);
            log::debug!("tile cache cleared (epoch {})", state.epoch);
        }
    }

    pub fn epoch(&self) -> u64 {
        self.state.lock().map(|state| state.epoch).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .ok()
            .map(|state| state.entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.state
            .lock()
            .ok()
            .map(|state| state.entries.cap().get())
            .unwrap_or(0)
    }
}
