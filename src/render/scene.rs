//! Turns a `GameState` into pixel-space draw calls.

use crate::game::GameState;

/// Gap left between neighbouring segments, in pixels
const SEGMENT_GAP: f64 = 2.0;
const SEGMENT_RADIUS: f64 = 4.0;

/// What a shape depicts. Surfaces pick the look.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    SnakeHead,
    SnakeBody,
    Food,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// A 2D target addressed in pixels
pub trait RenderSurface {
    fn clear(&mut self);

    fn fill_rounded_rect(&mut self, rect: PixelRect, radius: f64, fill: Fill);

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, fill: Fill);
}

/// Draw one frame: clear, every snake segment head first, then the food.
pub fn draw_scene<S: RenderSurface + ?Sized>(state: &GameState, cell_size: f64, surface: &mut S) {
    surface.clear();

    for (index, segment) in state.snake.cells().iter().enumerate() {
        let (x, y) = segment.to_pixels(cell_size);
        let fill = if index == 0 {
            Fill::SnakeHead
        } else {
            Fill::SnakeBody
        };

        surface.fill_rounded_rect(
            PixelRect {
                x,
                y,
                width: cell_size - SEGMENT_GAP,
                height: cell_size - SEGMENT_GAP,
            },
            SEGMENT_RADIUS,
            fill,
        );
    }

    let (x, y) = state.food.to_pixels(cell_size);
    let half = cell_size / 2.0;
    surface.fill_circle((x + half, y + half), half - SEGMENT_GAP, Fill::Food);
}
