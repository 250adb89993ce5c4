//! Discrete pyramid level selection.

/// Picks the pyramid level whose resolution matches the display scale.
///
/// Each doubling of `scale` relative to the fit-to-view `min_scale` promotes
/// one level. `epsilon` absorbs float jitter at exact powers of two. When
/// either scale is non-positive or not finite the viewport is not ready yet
/// and `current` is returned unchanged.
pub fn desired_zoom_level(scale: f64, min_scale: f64, max_zoom: u8, current: u8, epsilon: f64) -> u8 {
    if !(scale > 0.0) || !(min_scale > 0.0) || !scale.is_finite() || !min_scale.is_finite() {
        return current;
    }

    let rel = scale / min_scale;
    let level = (rel.log2() + epsilon).floor();
    if level <= 0.0 {
        0
    } else {
        level.min(f64::from(max_zoom)) as u8
    }
}
