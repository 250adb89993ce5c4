use crossbeam_channel::{unbounded, Receiver, Sender};

use super::cache::TileCache;
use super::decode::{DecodedTile, ImageDecoder};
use super::source::AssetSource;
use crate::core::geo::TileKey;
use crate::prelude::{Arc, HashMap, Mutex, PathBuf};
use crate::runtime::{spawn_blocking, AsyncSpawner};

/// Outcome of asking the loader for a tile
#[derive(Debug, Clone)]
pub enum TileRequest {
    /// Cache hit; content can be applied right away
    Ready(Arc<DecodedTile>),
    /// A fetch-and-decode job was spawned
    Queued,
    /// A job for this key is already running
    InFlight,
}

impl TileRequest {
    pub fn is_ready(&self) -> bool {
        matches!(self, TileRequest::Ready(_))
    }
}

/// Result of a tile loading operation
#[derive(Debug, Clone)]
pub struct TileResult {
    pub key: TileKey,
    /// Cache epoch the job started in
    pub epoch: u64,
    /// `None` when the asset was missing or failed to decode
    pub tile: Option<Arc<DecodedTile>>,
}

/// Fetches and decodes tiles off the tick thread.
///
/// Each key has at most one job running at a time. Completed jobs write into
/// the shared cache and report back over a channel that the tick thread
/// drains with [`TileLoader::drain_completed`].
pub struct TileLoader {
    cache: TileCache,
    source: Arc<dyn AssetSource>,
    decoder: Arc<dyn ImageDecoder>,
    spawner: Arc<dyn AsyncSpawner>,
    in_flight: Arc<Mutex<HashMap<TileKey, u64>>>,
    result_tx: Sender<TileResult>,
    result_rx: Receiver<TileResult>,
}

impl TileLoader {
    pub fn new(
        cache: TileCache,
        source: Arc<dyn AssetSource>,
        decoder: Arc<dyn ImageDecoder>,
        spawner: Arc<dyn AsyncSpawner>,
    ) -> Self {
        let (result_tx, result_rx) = unbounded();
        Self {
            cache,
            source,
            decoder,
            spawner,
            in_flight: Arc::new(Mutex::new(HashMap::default())),
            result_tx,
            result_rx,
        }
    }

    /// Requests the tile for `key`, stored at `path`.
    pub fn request(&self, key: TileKey, path: PathBuf) -> TileRequest {
        let epoch = {
            let Ok(mut in_flight) = self.in_flight.lock() else {
                return TileRequest::InFlight;
            };
            // Checked under the in-flight lock: a job always fills the cache
            // before dropping its mark, so a miss here cannot race a finish.
            if let Some(tile) = self.cache.get(&key) {
                return TileRequest::Ready(tile);
            }
            if in_flight.contains_key(&key) {
                return TileRequest::InFlight;
            }
            let epoch = self.cache.epoch();
            in_flight.insert(key, epoch);
            epoch
        };

        log::trace!("queueing tile {:?} from {}", key, path.display());

        let cache = self.cache.clone();
        let source = Arc::clone(&self.source);
        let decoder = Arc::clone(&self.decoder);
        let in_flight = Arc::clone(&self.in_flight);
        let tx = self.result_tx.clone();

        // No lock is held here: an inline spawner runs the job right now.
        spawn_blocking(self.spawner.as_ref(), move || {
            let tile = match source.read(&path).and_then(|bytes| decoder.decode(&bytes)) {
                Ok(tile) => {
                    let tile = Arc::new(tile);
                    cache.insert(key, Arc::clone(&tile), epoch);
                    Some(tile)
                }
                Err(e) => {
                    log::debug!("tile {:?} unavailable: {}", key, e);
                    None
                }
            };

            if let Ok(mut in_flight) = in_flight.lock() {
                if in_flight.get(&key) == Some(&epoch) {
                    in_flight.remove(&key);
                }
            }

            // The loader may be gone; nobody is left to care.
            let _ = tx.send(TileResult { key, epoch, tile });
        });

        TileRequest::Queued
    }

    /// Collects finished jobs without blocking, dropping stale ones
    pub fn drain_completed(&self) -> Vec<TileResult> {
        let epoch = self.cache.epoch();
        self.result_rx
            .try_iter()
            .filter(|result| {
                let fresh = result.epoch == epoch;
                if !fresh {
                    log::trace!("discarding stale result for {:?}", result.key);
                }
                fresh
            })
            .collect()
    }

    /// Drops all cached tiles and forgets in-flight work
    pub fn clear(&self) {
        self.cache.clear();
        if let Ok(mut in_flight) = self.in_flight.lock() {
            in_flight.clear();
        }
    }

    /// Number of jobs currently running
    pub fn pending_count(&self) -> usize {
        self.in_flight.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn cache(&self) -> &TileCache {
        &self.cache
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::spawners::InlineSpawner;
    use crate::tiles::source::MemoryAssetSource;
    use crate::tiles::testing::{ManualSpawner, StubDecoder};

    fn setup(spawner: Arc<dyn AsyncSpawner>) -> (TileLoader, Arc<MemoryAssetSource>) {
        let source = Arc::new(MemoryAssetSource::new());
        let loader = TileLoader::new(TileCache::new(8), source.clone(), Arc::new(StubDecoder), spawner);
        (loader, source)
    }

    fn path(key: TileKey) -> PathBuf {
        PathBuf::from(format!("t/{}/{}_{}", key.zoom, key.x, key.y))
    }

    #[test]
    fn test_miss_then_hit() {
        let (loader, source) = setup(Arc::new(InlineSpawner));
        let key = TileKey::new(1, 0, 1);
        source.insert(path(key), vec![2, 2]);

        assert!(matches!(loader.request(key, path(key)), TileRequest::Queued));
        let done = loader.drain_completed();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].key, key);
        assert_eq!(done[0].tile.as_ref().unwrap().width, 2);
        assert_eq!(loader.pending_count(), 0);

        assert!(loader.request(key, path(key)).is_ready());
        assert!(loader.drain_completed().is_empty());
    }

    #[test]
    fn test_concurrent_requests_share_one_job() {
        let spawner = Arc::new(ManualSpawner::default());
        let (loader, source) = setup(spawner.clone());
        let key = TileKey::new(2, 3, 1);
        source.insert(path(key), vec![1, 1]);

        assert!(matches!(loader.request(key, path(key)), TileRequest::Queued));
        assert!(matches!(loader.request(key, path(key)), TileRequest::InFlight));
        assert!(matches!(loader.request(key, path(key)), TileRequest::InFlight));
        assert_eq!(spawner.queued(), 1);
        assert_eq!(loader.pending_count(), 1);

        spawner.run_all();
        assert_eq!(loader.drain_completed().len(), 1);
        assert!(loader.request(key, path(key)).is_ready());
    }

    #[test]
    fn test_failure_is_not_memoised() {
        let (loader, source) = setup(Arc::new(InlineSpawner));
        let key = TileKey::new(1, 1, 1);

        loader.request(key, path(key));
        let done = loader.drain_completed();
        assert!(done[0].tile.is_none());
        assert!(!loader.cache().contains(&key));

        source.insert(path(key), vec![3, 1]);
        assert!(matches!(loader.request(key, path(key)), TileRequest::Queued));
        assert!(loader.drain_completed()[0].tile.is_some());
    }

    #[test]
    fn test_undecodable_bytes_report_none() {
        let (loader, source) = setup(Arc::new(InlineSpawner));
        let key = TileKey::new(0, 0, 0);
        source.insert(path(key), vec![7]);
        loader.request(key, path(key));
        assert!(loader.drain_completed()[0].tile.is_none());
    }

    #[test]
    fn test_results_from_before_clear_are_dropped() {
        let spawner = Arc::new(ManualSpawner::default());
        let (loader, source) = setup(spawner.clone());
        let key = TileKey::new(1, 0, 0);
        source.insert(path(key), vec![1, 1]);

        loader.request(key, path(key));
        loader.clear();
        assert_eq!(loader.pending_count(), 0);

        // A fresh request after the clear spawns its own job
        assert!(matches!(loader.request(key, path(key)), TileRequest::Queued));
        assert_eq!(spawner.queued(), 2);

        spawner.run_all();
        let done = loader.drain_completed();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].epoch, loader.cache().epoch());
        assert_eq!(loader.cache().len(), 1);
        assert_eq!(loader.pending_count(), 0);
    }
}
