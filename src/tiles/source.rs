use crate::core::geo::TileKey;
use crate::prelude::{HashMap, Path, PathBuf};
use crate::{Error, Result};
use std::sync::RwLock;

/// Read access to tile assets keyed by path.
pub trait AssetSource: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    /// Raw bytes of the asset at `path`
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

/// Maps tile keys to asset paths: `{root}/{zoom}/{x}_{y}.{ext}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    root: PathBuf,
    extension: String,
}

impl TileLayout {
    pub fn new(root: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            extension: extension.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, root: impl Into<PathBuf>) {
        self.root = root.into();
    }

    pub fn tile_path(&self, key: TileKey) -> PathBuf {
        let file = if self.extension.is_empty() {
            format!("{}_{}", key.x, key.y)
        } else {
            format!("{}_{}.{}", key.x, key.y, self.extension)
        };
        self.root.join(key.zoom.to_string()).join(file)
    }

    /// The level-0 asset whose pixel size defines the world
    pub fn probe_path(&self) -> PathBuf {
        self.tile_path(TileKey::root())
    }
}

/// Tiles on the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAssetSource;

impl AssetSource for FsAssetSource {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::AssetMissing(path.to_path_buf())),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory asset store; assets can be added while the engine runs
#[derive(Debug, Default)]
pub struct MemoryAssetSource {
    assets: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryAssetSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        if let Ok(mut assets) = self.assets.write() {
            assets.insert(path.into(), bytes);
        }
    }

    pub fn remove(&self, path: &Path) -> Option<Vec<u8>> {
        self.assets.write().ok()?.remove(path)
    }

    pub fn len(&self) -> usize {
        self.assets.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetSource for MemoryAssetSource {
    fn exists(&self, path: &Path) -> bool {
        self.assets
            .read()
            .map(|assets| assets.contains_key(path))
            .unwrap_or(false)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.assets
            .read()
            .ok()
            .and_then(|assets| assets.get(path).cloned())
            .ok_or_else(|| Error::AssetMissing(path.to_path_buf()))
    }
}
