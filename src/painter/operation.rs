// src/painter/operation.rs

//! The closed set of canvas operations.
//!
//! Every `Operation` has two independent contracts:
//! - `apply` mutates a `CanvasState` and nothing else.
//! - `draw` issues fill calls against a `Surface`. Only the variants that are
//!   visible on screen (fill, background rectangle, figure) draw anything.

use log::trace;

use crate::color::Color;
use crate::config::Config;
use crate::painter::figure;
use crate::painter::state::CanvasState;
use crate::painter::surface::{PixelRect, Surface};

/// A position in fractional canvas space, both axes in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scales the point to pixel coordinates on a surface of the given size.
    pub fn to_pixels(self, width: u32, height: u32) -> (i32, i32) {
        (to_pixel(self.x, width), to_pixel(self.y, height))
    }
}

/// A rectangle in fractional canvas space, from `(x1, y1)` to `(x2, y2)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Pixel area of the rectangle. Corners may be given in either order.
    pub fn to_pixels(self, width: u32, height: u32) -> PixelRect {
        let (x1, x2) = (to_pixel(self.x1, width), to_pixel(self.x2, width));
        let (y1, y2) = (to_pixel(self.y1, height), to_pixel(self.y2, height));
        PixelRect::new(x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2))
    }
}

/// `pixel = fraction * extent`, truncated toward zero.
fn to_pixel(fraction: f32, extent: u32) -> i32 {
    (fraction * extent as f32) as i32
}

/// Colours and sizes that drawing needs but operations do not carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStyle {
    pub rect_color: Color,
    pub figure_color: Color,
    pub figure_scale: f32,
}

impl RenderStyle {
    pub fn from_config(config: &Config) -> Self {
        Self {
            rect_color: config.canvas.rect_color,
            figure_color: config.figure.color,
            figure_scale: config.figure.scale,
        }
    }
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// One unit of the command vocabulary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    /// Replace the background colour.
    Fill(Color),
    /// Replace the background rectangle.
    BackgroundRect(Rect),
    /// Append a figure at the given position.
    FigureAdd(Point),
    /// Put every existing figure at the given position.
    MoveAll(Point),
    /// Drop rectangle and figures, paint the background black.
    Reset,
    /// Render the current state and hand the frame to the receiver.
    Commit,
}

impl Operation {
    /// Short lowercase name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Fill(_) => "fill",
            Operation::BackgroundRect(_) => "bgrect",
            Operation::FigureAdd(_) => "figure",
            Operation::MoveAll(_) => "move",
            Operation::Reset => "reset",
            Operation::Commit => "commit",
        }
    }

    pub fn is_commit(&self) -> bool {
        matches!(self, Operation::Commit)
    }

    /// Applies this operation's state mutation. `Commit` leaves the state alone.
    pub fn apply(&self, state: &mut CanvasState) {
        match *self {
            Operation::Fill(color) => state.set_background(color),
            Operation::BackgroundRect(rect) => state.set_background_rect(rect),
            Operation::FigureAdd(point) => state.add_figure(point),
            Operation::MoveAll(point) => state.move_all_figures(point),
            Operation::Reset => state.reset(),
            Operation::Commit => {}
        }
    }

    /// Draws this operation onto `surface`, scaling fractional coordinates to
    /// the surface's pixel size.
    pub fn draw(&self, surface: &mut dyn Surface, style: &RenderStyle) {
        let (width, height) = surface.size();
        match *self {
            Operation::Fill(color) => {
                trace!("Operation: fill {}x{} with {:?}", width, height, color);
                let bounds = surface.bounds();
                surface.fill(bounds, color);
            }
            Operation::BackgroundRect(rect) => {
                let area = rect.to_pixels(width, height);
                trace!("Operation: bgrect {:?}", area);
                surface.fill(area, style.rect_color);
            }
            Operation::FigureAdd(point) => {
                let center = point.to_pixels(width, height);
                trace!("Operation: figure at {:?}", center);
                figure::draw_figure(surface, center, style.figure_color, style.figure_scale);
            }
            Operation::MoveAll(_) | Operation::Reset | Operation::Commit => {}
        }
    }
}
