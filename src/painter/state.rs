// src/painter/state.rs

//! `CanvasState` - the single mutable record the painter loop owns.

use crate::color::Color;
use crate::painter::operation::{Operation, Point, Rect};

/// Background colour, optional background rectangle and figure positions.
///
/// Owned by exactly one painter loop for its whole lifetime. Nothing outside
/// the loop thread ever holds a reference to it; hosts only see it again in
/// the `LoopReport` returned when the loop is shut down.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasState {
    background: Color,
    background_rect: Option<Rect>,
    figures: Vec<Point>,
}

impl CanvasState {
    pub fn new(background: Color) -> Self {
        Self {
            background,
            background_rect: None,
            figures: Vec::new(),
        }
    }

    pub fn background(&self) -> Color {
        self.background
    }

    pub fn background_rect(&self) -> Option<Rect> {
        self.background_rect
    }

    /// Figure positions in the order they were added.
    pub fn figures(&self) -> &[Point] {
        &self.figures
    }

    pub(crate) fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    pub(crate) fn set_background_rect(&mut self, rect: Rect) {
        self.background_rect = Some(rect);
    }

    pub(crate) fn add_figure(&mut self, point: Point) {
        self.figures.push(point);
    }

    /// Sets every existing figure to `point`. Count and order are kept;
    /// figures added later are not affected.
    pub(crate) fn move_all_figures(&mut self, point: Point) {
        for figure in &mut self.figures {
            *figure = point;
        }
    }

    pub(crate) fn reset(&mut self) {
        self.background = Color::BLACK;
        self.background_rect = None;
        self.figures.clear();
    }

    /// Operations that reproduce this state on a blank surface, in paint
    /// order: background, rectangle, then figures oldest first.
    pub fn draw_list(&self) -> impl Iterator<Item = Operation> + '_ {
        std::iter::once(Operation::Fill(self.background))
            .chain(self.background_rect.map(Operation::BackgroundRect))
            .chain(self.figures.iter().copied().map(Operation::FigureAdd))
    }
}

impl Default for CanvasState {
    fn default() -> Self {
        Self::new(Color::WHITE)
    }
}
