use crate::core::geo::ScreenRect;
use crate::prelude::Arc;
use crate::tiles::decode::DecodedTile;
use serde::{Deserialize, Serialize};

/// Handle to one on-screen tile slot owned by a [`RenderSurface`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlaceholderId(pub u64);

/// Presentation capability the controller draws through.
///
/// A placeholder starts hidden and empty. The engine only ever calls these
/// from the tick thread.
pub trait RenderSurface {
    /// Creates a hidden, empty placeholder
    fn allocate(&mut self) -> PlaceholderId;

    /// Removes the placeholder and whatever it displays
    fn release(&mut self, id: PlaceholderId);

    fn set_rect(&mut self, id: PlaceholderId, rect: ScreenRect);

    fn set_visible(&mut self, id: PlaceholderId, visible: bool);

    fn set_content(&mut self, id: PlaceholderId, tile: Arc<DecodedTile>);

    fn clear_content(&mut self, id: PlaceholderId);
}
