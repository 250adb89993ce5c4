pub mod active;
pub mod cache;
pub mod decode;
pub mod loader;
pub mod source;
pub mod world;

// Re-exports for convenience
pub use active::{ActiveTile, ActiveTileSet, ReconcileStats};
pub use cache::TileCache;
pub use loader::{TileLoader, TileRequest, TileResult};
pub use source::{AssetSource, FsAssetSource, MemoryAssetSource, TileLayout};
pub use world::WorldSizeProbe;
