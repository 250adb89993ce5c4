//! Discovery of the world size from the level-0 tile.

use crossbeam_channel::{bounded, Receiver, TryRecvError};

use super::decode::ImageDecoder;
use super::source::AssetSource;
use crate::core::geo::WorldSize;
use crate::prelude::{Arc, Path};
use crate::runtime::{spawn_blocking, AsyncSpawner};
use crate::Result;

#[derive(Debug, Default)]
enum ProbeState {
    #[default]
    Unloaded,
    Probing(Receiver<Result<WorldSize>>),
    Loaded(WorldSize),
}

/// Reads the pixel dimensions of the level-0 asset without blocking the tick.
///
/// Failed probes are retried on a later poll; a missing tile set simply keeps
/// the viewer waiting until the asset shows up.
#[derive(Debug, Default)]
pub struct WorldSizeProbe {
    state: ProbeState,
}

impl WorldSizeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the probe and returns the world size once known
    pub fn poll(
        &mut self,
        source: &Arc<dyn AssetSource>,
        decoder: &Arc<dyn ImageDecoder>,
        spawner: &dyn AsyncSpawner,
        path: &Path,
    ) -> Option<WorldSize> {
        match &self.state {
            ProbeState::Loaded(size) => Some(*size),
            ProbeState::Unloaded => {
                let (tx, rx) = bounded(1);
                let source = Arc::clone(source);
                let decoder = Arc::clone(decoder);
                let path = path.to_path_buf();

                self.state = ProbeState::Probing(rx);
                spawn_blocking(spawner, move || {
                    let size = source
                        .read(&path)
                        .and_then(|bytes| decoder.dimensions(&bytes))
                        .map(|(width, height)| WorldSize::new(width, height));
                    let _ = tx.send(size);
                });
                None
            }
            ProbeState::Probing(rx) => match rx.try_recv() {
                Ok(Ok(size)) if !size.is_empty() => {
                    log::info!("world size {}x{}", size.width, size.height);
                    self.state = ProbeState::Loaded(size);
                    Some(size)
                }
                Ok(Ok(_)) => {
                    log::debug!("world probe {} reported an empty image", path.display());
                    self.state = ProbeState::Unloaded;
                    None
                }
                Ok(Err(e)) => {
                    log::debug!("world probe {} failed: {}", path.display(), e);
                    self.state = ProbeState::Unloaded;
                    None
                }
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => {
                    self.state = ProbeState::Unloaded;
                    None
                }
            },
        }
    }

    /// Forgets the size; any probe still running is ignored
    pub fn reset(&mut self) {
        self.state = ProbeState::Unloaded;
    }

    pub fn world_size(&self) -> Option<WorldSize> {
        match self.state {
            ProbeState::Loaded(size) => Some(size),
            _ => None,
        }
    }

    pub fn is_probing(&self) -> bool {
        matches!(self.state, ProbeState::Probing(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::spawners::InlineSpawner;
    use crate::tiles::source::MemoryAssetSource;
    use crate::tiles::testing::{ManualSpawner, StubDecoder};

    fn parts() -> (Arc<MemoryAssetSource>, Arc<dyn AssetSource>, Arc<dyn ImageDecoder>) {
        let memory = Arc::new(MemoryAssetSource::new());
        let source: Arc<dyn AssetSource> = memory.clone();
        (memory, source, Arc::new(StubDecoder))
    }

    #[test]
    fn test_loads_after_one_round_trip() {
        let (memory, source, decoder) = parts();
        let path = Path::new("t/0/0_0");
        memory.insert(path, vec![40, 20]);

        let mut probe = WorldSizeProbe::new();
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), None);
        assert!(probe.is_probing());
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), Some(WorldSize::new(40, 20)));
        assert_eq!(probe.world_size(), Some(WorldSize::new(40, 20)));
        // Loaded is sticky until reset
        memory.remove(path);
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), Some(WorldSize::new(40, 20)));
    }

    #[test]
    fn test_missing_asset_retries() {
        let (memory, source, decoder) = parts();
        let path = Path::new("t/0/0_0");
        let mut probe = WorldSizeProbe::new();

        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), None);
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), None);
        assert!(!probe.is_probing());

        memory.insert(path, vec![8, 8]);
        probe.poll(&source, &decoder, &InlineSpawner, path);
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), Some(WorldSize::new(8, 8)));
    }

    #[test]
    fn test_reset_discards_running_probe() {
        let (memory, source, decoder) = parts();
        let spawner = ManualSpawner::default();
        let old = Path::new("old/0/0_0");
        let new = Path::new("new/0/0_0");
        memory.insert(old, vec![100, 100]);
        memory.insert(new, vec![10, 5]);

        let mut probe = WorldSizeProbe::new();
        probe.poll(&source, &decoder, &spawner, old);
        probe.reset();
        spawner.run_all();

        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, new), None);
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, new), Some(WorldSize::new(10, 5)));
    }

    #[test]
    fn test_empty_image_is_not_a_world() {
        let (memory, source, decoder) = parts();
        let path = Path::new("t/0/0_0");
        memory.insert(path, vec![0, 4]);
        let mut probe = WorldSizeProbe::new();
        probe.poll(&source, &decoder, &InlineSpawner, path);
        assert_eq!(probe.poll(&source, &decoder, &InlineSpawner, path), None);
        assert!(!probe.is_probing());
    }
}
