//! Screen/world coordinate math.
//!
//! World space is the pixel space of the level-0 image. Screen space is
//! `world * scale + offset`. Tile geometry at level `z` divides the world
//! into `2^z × 2^z` equal cells.

use crate::core::geo::{Point, ScreenRect, Size, TileKey, WorldSize};

/// Converts a screen point to world coordinates
pub fn screen_to_world(point: Point, offset: Point, scale: f64) -> Point {
    point.subtract(&offset).divide(scale)
}

/// Converts a world point to screen coordinates
pub fn world_to_screen(point: Point, offset: Point, scale: f64) -> Point {
    point.multiply(scale).add(&offset)
}

/// Number of tiles along one axis at `zoom`
pub fn tiles_per_axis(zoom: u8) -> u64 {
    1u64 << zoom.min(63)
}

/// World-space dimensions of one tile at `zoom`
pub fn tile_world_size(world: WorldSize, zoom: u8) -> (f64, f64) {
    let n = tiles_per_axis(zoom) as f64;
    (f64::from(world.width) / n, f64::from(world.height) / n)
}

/// Everything needed to place tiles of one level on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileGeometry {
    pub offset: Point,
    pub scale: f64,
    pub tile_width: f64,
    pub tile_height: f64,
    pub device_pixel_ratio: f64,
}

impl TileGeometry {
    pub fn new(world: WorldSize, zoom: u8, offset: Point, scale: f64, device_pixel_ratio: f64) -> Self {
        let (tile_width, tile_height) = tile_world_size(world, zoom);
        Self {
            offset,
            scale,
            tile_width,
            tile_height,
            device_pixel_ratio,
        }
    }

    /// On-screen size of one tile before snapping
    pub fn draw_size(&self) -> (f64, f64) {
        (self.tile_width * self.scale, self.tile_height * self.scale)
    }

    /// Screen rectangle of `key`, edges snapped to device pixels.
    ///
    /// Neighbouring tiles compute their shared edge from the same value, so
    /// snapping never opens a seam between them.
    pub fn tile_screen_rect(&self, key: TileKey) -> ScreenRect {
        let (draw_w, draw_h) = self.draw_size();
        let x = f64::from(key.x);
        let y = f64::from(key.y);

        let left = self.snap(self.offset.x + x * draw_w);
        let top = self.snap(self.offset.y + y * draw_h);
        let right = self.snap(self.offset.x + (x + 1.0) * draw_w);
        let bottom = self.snap(self.offset.y + (y + 1.0) * draw_h);

        ScreenRect::new(left, top, right - left, bottom - top)
    }

    fn snap(&self, v: f64) -> f64 {
        let dpr = self.device_pixel_ratio;
        if dpr > 0.0 && dpr.is_finite() {
            (v * dpr).round() / dpr
        } else {
            v
        }
    }
}

/// Tile under the centre of the canvas, clamped into level bounds.
///
/// Returns `None` while the geometry is not usable.
pub fn center_tile(canvas: Size, offset: Point, scale: f64, zoom: u8, world: WorldSize) -> Option<TileKey> {
    if !canvas.is_valid() || world.is_empty() || !(scale > 0.0) {
        return None;
    }
    let center = screen_to_world(canvas.center(), offset, scale);
    let (tile_w, tile_h) = tile_world_size(world, zoom);
    let max_index = (tiles_per_axis(zoom) - 1) as f64;

    let tx = (center.x / tile_w).floor().clamp(0.0, max_index);
    let ty = (center.y / tile_h).floor().clamp(0.0, max_index);
    Some(TileKey::new(zoom, tx as u32, ty as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_screen_world_round_trip() {
        let offsets = [Point::new(0.0, 0.0), Point::new(-312.5, 77.25), Point::new(1e6, -1e6)];
        let scales = [0.013, 1.0, 3.7, 250.0];
        let points = [Point::new(0.0, 0.0), Point::new(10.5, -4.25), Point::new(-9999.0, 12345.678)];

        for &offset in &offsets {
            for &scale in &scales {
                for &p in &points {
                    let back = screen_to_world(world_to_screen(p, offset, scale), offset, scale);
                    assert!(approx(back.x, p.x) && approx(back.y, p.y), "{:?} -> {:?}", p, back);
                }
            }
        }
    }

    #[test]
    fn test_tile_world_size_halves_per_level() {
        let world = WorldSize::new(4096, 2048);
        assert_eq!(tile_world_size(world, 0), (4096.0, 2048.0));
        assert_eq!(tile_world_size(world, 1), (2048.0, 1024.0));
        assert_eq!(tile_world_size(world, 3), (512.0, 256.0));
        assert_eq!(tiles_per_axis(3), 8);
    }

    #[test]
    fn test_tile_rect_snaps_and_abuts() {
        let geometry = TileGeometry::new(WorldSize::new(1000, 1000), 2, Point::new(10.3, 0.0), 0.333, 1.0);
        let a = geometry.tile_screen_rect(TileKey::new(2, 0, 0));
        let b = geometry.tile_screen_rect(TileKey::new(2, 1, 0));

        assert_eq!(a.x, a.x.round());
        assert_eq!(a.right(), b.x);
        assert!(a.width > 0.0);
    }

    #[test]
    fn test_tile_rect_with_high_dpi() {
        let geometry = TileGeometry::new(WorldSize::new(100, 100), 0, Point::new(0.3, 0.3), 1.0, 2.0);
        let rect = geometry.tile_screen_rect(TileKey::root());
        assert_eq!(rect.x, 0.5);
        assert_eq!(rect.right(), 100.5);
    }

    #[test]
    fn test_center_tile() {
        let world = WorldSize::new(800, 800);
        let canvas = Size::new(800.0, 800.0);
        let key = center_tile(canvas, Point::new(0.0, 0.0), 1.0, 1, world).unwrap();
        assert_eq!(key, TileKey::new(1, 1, 1));

        // centre far outside the world clamps to the nearest edge tile
        let key = center_tile(canvas, Point::new(5000.0, 5000.0), 1.0, 2, world).unwrap();
        assert_eq!(key, TileKey::new(2, 0, 0));

        assert!(center_tile(Size::new(0.0, 10.0), Point::default(), 1.0, 0, world).is_none());
    }
}
