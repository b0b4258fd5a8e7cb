// src/painter/figure.rs

//! The figure marker: a "T" made of two filled bars around its centre.

use crate::color::Color;
use crate::painter::surface::{PixelRect, Surface};

// Bar geometry in pixels relative to the figure centre, at scale 1.0.
const BAR_HALF_WIDTH: f32 = 225.0;
const BAR_TOP: f32 = -175.0;
const BAR_BOTTOM: f32 = 0.0;
const STEM_HALF_WIDTH: f32 = 75.0;
const STEM_BOTTOM: f32 = 250.0;

/// The two rectangles of a figure centred at `center`: the horizontal bar
/// first, then the stem.
pub fn figure_rects(center: (i32, i32), scale: f32) -> [PixelRect; 2] {
    let (cx, cy) = center;
    // `as` saturates, so only the addition needs guarding.
    let offset = |origin: i32, delta: f32| origin.saturating_add((delta * scale) as i32);
    [
        PixelRect::new(
            offset(cx, -BAR_HALF_WIDTH),
            offset(cy, BAR_TOP),
            offset(cx, BAR_HALF_WIDTH),
            offset(cy, BAR_BOTTOM),
        ),
        PixelRect::new(
            offset(cx, -STEM_HALF_WIDTH),
            offset(cy, BAR_TOP),
            offset(cx, STEM_HALF_WIDTH),
            offset(cy, STEM_BOTTOM),
        ),
    ]
}

pub fn draw_figure(surface: &mut dyn Surface, center: (i32, i32), color: Color, scale: f32) {
    for rect in figure_rects(center, scale) {
        surface.fill(rect, color);
    }
}
