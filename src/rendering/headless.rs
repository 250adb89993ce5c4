//! A surface that only records what it was told to draw.

use super::surface::{PlaceholderId, RenderSurface};
use crate::core::geo::ScreenRect;
use crate::prelude::{Arc, HashMap};
use crate::tiles::decode::DecodedTile;

/// Recorded state of one placeholder
#[derive(Debug, Clone, Default)]
pub struct PlaceholderState {
    pub rect: Option<ScreenRect>,
    pub visible: bool,
    pub content: Option<Arc<DecodedTile>>,
}

/// In-memory [`RenderSurface`] for headless hosts and tests
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    next_id: u64,
    placeholders: HashMap<PlaceholderId, PlaceholderState>,
    allocated: usize,
    released: usize,
    rect_updates: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: PlaceholderId) -> Option<&PlaceholderState> {
        self.placeholders.get(&id)
    }

    /// Live placeholders
    pub fn len(&self) -> usize {
        self.placeholders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placeholders.is_empty()
    }

    pub fn visible_count(&self) -> usize {
        self.placeholders.values().filter(|p| p.visible).count()
    }

    /// Placeholders both visible and holding content
    pub fn drawn_count(&self) -> usize {
        self.placeholders
            .values()
            .filter(|p| p.visible && p.content.is_some())
            .count()
    }

    pub fn allocated_total(&self) -> usize {
        self.allocated
    }

    pub fn released_total(&self) -> usize {
        self.released
    }

    pub fn rect_updates(&self) -> usize {
        self.rect_updates
    }

    fn slot(&mut self, id: PlaceholderId) -> Option<&mut PlaceholderState> {
        let slot = self.placeholders.get_mut(&id);
        if slot.is_none() {
            log::trace!("ignoring update for released placeholder {:?}", id);
        }
        slot
    }
}

impl RenderSurface for HeadlessSurface {
    fn allocate(&mut self) -> PlaceholderId {
        let id = PlaceholderId(self.next_id);
        self.next_id += 1;
        self.placeholders.insert(id, PlaceholderState::default());
        self.allocated += 1;
        id
    }

    fn release(&mut self, id: PlaceholderId) {
        if self.placeholders.remove(&id).is_some() {
            self.released += 1;
        }
    }

    fn set_rect(&mut self, id: PlaceholderId, rect: ScreenRect) {
        if let Some(slot) = self.slot(id) {
            slot.rect = Some(rect);
            self.rect_updates += 1;
        }
    }

    fn set_visible(&mut self, id: PlaceholderId, visible: bool) {
        if let Some(slot) = self.slot(id) {
            slot.visible = visible;
        }
    }

    fn set_content(&mut self, id: PlaceholderId, tile: Arc<DecodedTile>) {
        if let Some(slot) = self.slot(id) {
            slot.content = Some(tile);
        }
    }

    fn clear_content(&mut self, id: PlaceholderId) {
        if let Some(slot) = self.slot(id) {
            slot.content = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_placeholder_lifecycle() {
        let mut surface = HeadlessSurface::new();
        let a = surface.allocate();
        let b = surface.allocate();
        assert_ne!(a, b);
        assert!(!surface.get(a).unwrap().visible);

        surface.set_rect(a, ScreenRect::new(0.0, 0.0, 10.0, 10.0));
        surface.set_content(a, Arc::new(DecodedTile::new(1, 1, vec![0; 4])));
        surface.set_visible(a, true);
        assert_eq!(surface.drawn_count(), 1);

        surface.clear_content(a);
        assert_eq!(surface.drawn_count(), 0);
        assert_eq!(surface.visible_count(), 1);

        surface.release(a);
        surface.release(a);
        surface.set_visible(a, true);
        assert_eq!(surface.len(), 1);
        assert_eq!(surface.released_total(), 1);
        assert_eq!(surface.allocated_total(), 2);
        assert_eq!(surface.rect_updates(), 1);
    }
}
