use crate::core::geo::{Point, Size, WorldSize};
use crate::core::transform::screen_to_world;
use serde::{Deserialize, Serialize};

/// Manages the current view of the image: scale, offset and canvas size
///
/// `scale` is screen pixels per world pixel and `offset` is where the world
/// origin lands on screen. `min_scale` is the fit-to-view scale once a fit has
/// happened (the configured floor before that); `scale` never drops below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub scale: f64,
    pub offset: Point,
    pub canvas: Size,
    pub min_scale: f64,
}

impl Viewport {
    /// Creates a viewport in its pre-fit state
    pub fn new(min_scale_floor: f64) -> Self {
        Self {
            scale: 1.0_f64.max(min_scale_floor),
            offset: Point::default(),
            canvas: Size::default(),
            min_scale: min_scale_floor,
        }
    }

    /// Back to the pre-fit state, keeping the canvas size
    pub fn reset(&mut self, min_scale_floor: f64) {
        let canvas = self.canvas;
        *self = Self::new(min_scale_floor);
        self.canvas = canvas;
    }

    pub fn set_canvas_size(&mut self, size: Size) {
        self.canvas = size;
    }

    /// Scale at which the whole world fits inside the canvas
    pub fn fit_scale(&self, world: WorldSize) -> Option<f64> {
        if !self.canvas.is_valid() || world.is_empty() {
            return None;
        }
        Some(
            (self.canvas.width / f64::from(world.width))
                .min(self.canvas.height / f64::from(world.height)),
        )
    }

    /// Fits the world into the canvas.
    ///
    /// `first_fit` forces `scale` to the fit scale; later fits only raise a
    /// scale that fell below it, so a user's zoom-in survives a resize. The
    /// world is recentred either way. Returns `false` when the canvas is not
    /// usable yet.
    pub fn fit_to_view(&mut self, world: WorldSize, first_fit: bool) -> bool {
        let Some(fit_scale) = self.fit_scale(world) else {
            return false;
        };

        self.min_scale = fit_scale;
        if first_fit || self.scale < self.min_scale {
            self.scale = fit_scale;
        }

        self.offset = Point::new(
            (self.canvas.width - f64::from(world.width) * self.scale) / 2.0,
            (self.canvas.height - f64::from(world.height) * self.scale) / 2.0,
        );
        true
    }

    /// Multiplies the scale by `factor`, keeping the world point under
    /// `cursor` fixed on screen. Returns whether the scale changed.
    pub fn zoom_about(&mut self, cursor: Point, factor: f64) -> bool {
        if !(factor > 0.0) || !factor.is_finite() || !cursor.is_finite() {
            return false;
        }

        let old = self.scale;
        let new = (old * factor).max(self.min_scale);
        if new == old {
            return false;
        }

        let ratio = new / old;
        self.scale = new;
        self.offset = Point::new(
            cursor.x - (cursor.x - self.offset.x) * ratio,
            cursor.y - (cursor.y - self.offset.y) * ratio,
        );
        true
    }

    /// Translates the view by a screen-space delta
    pub fn pan(&mut self, delta: Point) {
        self.offset = self.offset.add(&delta);
    }

    /// World coordinates at the canvas centre
    pub fn center_world(&self) -> Point {
        screen_to_world(self.canvas.center(), self.offset, self.scale)
    }

    /// Ratio of the current scale to the fit scale
    pub fn relative_scale(&self) -> f64 {
        self.scale / self.min_scale
    }
}
