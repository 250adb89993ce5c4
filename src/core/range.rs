//! Visible tile rectangle computation.

use crate::core::geo::{Point, Size, TileRange, WorldSize};
use crate::core::transform::{tile_world_size, tiles_per_axis};

/// Computes the inclusive rectangle of tiles needed to cover the canvas.
///
/// The floored edge indices are expanded by `padding` tiles on every side
/// and clamped to `[0, 2^zoom - 1]`. Returns `None` when the canvas or world
/// is degenerate, the scale is unusable, or the view does not intersect the
/// world at all.
pub fn visible_tile_range(
    canvas: Size,
    offset: Point,
    scale: f64,
    zoom: u8,
    world: Option<WorldSize>,
    padding: u32,
) -> Option<TileRange> {
    let world = world.filter(|w| !w.is_empty())?;
    if !canvas.is_valid() || !(scale > 0.0) || !scale.is_finite() || !offset.is_finite() {
        return None;
    }

    let (tile_w, tile_h) = tile_world_size(world, zoom);
    let inv_scale = 1.0 / scale;
    let world_left = -offset.x * inv_scale;
    let world_top = -offset.y * inv_scale;
    let world_right = world_left + canvas.width * inv_scale;
    let world_bottom = world_top + canvas.height * inv_scale;

    let max_index = (tiles_per_axis(zoom) - 1) as f64;
    let pad = f64::from(padding);

    // Float clamping keeps far off-screen offsets from overflowing the cast.
    let x0 = (world_left / tile_w).floor() - pad;
    let y0 = (world_top / tile_h).floor() - pad;
    let x1 = (world_right / tile_w).floor() + pad;
    let y1 = (world_bottom / tile_h).floor() + pad;

    if x0 > max_index || y0 > max_index || x1 < 0.0 || y1 < 0.0 {
        return None;
    }

    let range = TileRange::new(
        x0.clamp(0.0, max_index) as u32,
        y0.clamp(0.0, max_index) as u32,
        x1.clamp(0.0, max_index) as u32,
        y1.clamp(0.0, max_index) as u32,
    );
    range.is_valid().then_some(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> Option<WorldSize> {
        Some(WorldSize::new(8192, 4096))
    }

    #[test]
    fn test_fitted_view_covers_level_zero() {
        let canvas = Size::new(1024.0, 768.0);
        let scale = 1024.0 / 8192.0;
        let offset = Point::new(0.0, (768.0 - 4096.0 * scale) / 2.0);
        let range = visible_tile_range(canvas, offset, scale, 0, world(), 1).unwrap();
        assert_eq!(range, TileRange::new(0, 0, 0, 0));
    }

    #[test]
    fn test_padding_ring_and_clamping() {
        // 1:1 scale at level 3 → tiles are 1024x512 world px
        let canvas = Size::new(1000.0, 500.0);
        let offset = Point::new(-3000.0, -1100.0);
        let range = visible_tile_range(canvas, offset, 1.0, 3, world(), 1).unwrap();
        // visible x: 3000..4000 → tiles 2..3, padded 1..4
        // visible y: 1100..1600 → tiles 2..3, padded 1..4
        assert_eq!(range, TileRange::new(1, 1, 4, 4));

        let unpadded = visible_tile_range(canvas, offset, 1.0, 3, world(), 0).unwrap();
        assert_eq!(unpadded, TileRange::new(2, 2, 3, 3));

        // top-left corner clamps to zero
        let corner = visible_tile_range(canvas, Point::new(0.0, 0.0), 1.0, 3, world(), 1).unwrap();
        assert_eq!((corner.x0, corner.y0), (0, 0));
    }

    #[test]
    fn test_invalid_inputs() {
        let canvas = Size::new(100.0, 100.0);
        assert!(visible_tile_range(Size::new(0.0, 100.0), Point::default(), 1.0, 0, world(), 1).is_none());
        assert!(visible_tile_range(canvas, Point::default(), 1.0, 0, None, 1).is_none());
        assert!(visible_tile_range(canvas, Point::default(), 0.0, 0, world(), 1).is_none());
        assert!(visible_tile_range(canvas, Point::default(), 1.0, 0, Some(WorldSize::new(0, 10)), 1).is_none());
    }

    #[test]
    fn test_view_outside_world_is_invalid() {
        let canvas = Size::new(100.0, 100.0);
        let far_right = Point::new(-1.0e9, 0.0);
        assert!(visible_tile_range(canvas, far_right, 1.0, 2, world(), 1).is_none());
        let far_left = Point::new(1.0e9, 0.0);
        assert!(visible_tile_range(canvas, far_left, 1.0, 2, world(), 1).is_none());
    }

    #[test]
    fn test_output_always_within_level_bounds() {
        let canvases = [Size::new(1.0, 1.0), Size::new(640.0, 480.0), Size::new(3840.0, 2160.0)];
        let scales = [0.001, 0.05, 0.5, 1.0, 7.5, 64.0];
        let offsets = [
            Point::new(0.0, 0.0),
            Point::new(-2500.0, 300.0),
            Point::new(120.0, -9000.0),
            Point::new(-1.0e7, -1.0e7),
        ];

        for zoom in 0..=6u8 {
            let max = (tiles_per_axis(zoom) - 1) as u32;
            for &canvas in &canvases {
                for &scale in &scales {
                    for &offset in &offsets {
                        if let Some(r) = visible_tile_range(canvas, offset, scale, zoom, world(), 1) {
                            assert!(r.x0 <= r.x1 && r.x1 <= max, "{:?} at z{}", r, zoom);
                            assert!(r.y0 <= r.y1 && r.y1 <= max, "{:?} at z{}", r, zoom);
                        }
                    }
                }
            }
        }
    }
}
