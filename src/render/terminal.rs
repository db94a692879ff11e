use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

use super::scene::{draw_scene, Fill, PixelRect, RenderSurface};
use crate::game::GameState;

/// Terminal columns per tile. Glyphs are about twice as tall as wide, so two
/// columns by one row keeps tiles roughly square.
pub const TILE_COLUMNS: u16 = 2;
pub const TILE_ROWS: u16 = 1;

/// Rasterises pixel-space shapes onto the cells of a ratatui `Buffer`.
///
/// A terminal cell is painted when a rectangle overlaps it, or when its centre
/// falls inside a circle. Corner radii are below cell resolution and ignored.
pub struct BufferSurface<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    cell_size: f64,
}

impl<'a> BufferSurface<'a> {
    pub fn new(buf: &'a mut Buffer, area: Rect, cell_size: f64) -> Self {
        Self {
            buf,
            area,
            cell_size,
        }
    }

    fn column_of(&self, px: f64) -> f64 {
        px * TILE_COLUMNS as f64 / self.cell_size
    }

    fn row_of(&self, px: f64) -> f64 {
        px * TILE_ROWS as f64 / self.cell_size
    }

    fn paint(&mut self, column: i64, row: i64, fill: Fill) {
        if column < 0 || row < 0 || column >= self.area.width as i64 || row >= self.area.height as i64 {
            return;
        }

        let (symbol, style) = match fill {
            Fill::SnakeHead => (
                "█",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Fill::SnakeBody => ("█", Style::default().fg(Color::Green)),
            Fill::Food => (
                "█",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
        };

        let x = self.area.x + column as u16;
        let y = self.area.y + row as u16;
        if let Some(cell) = self.buf.cell_mut((x, y)) {
            cell.set_symbol(symbol).set_style(style);
        }
    }
}

impl RenderSurface for BufferSurface<'_> {
    fn clear(&mut self) {
        let dot = Style::default().fg(Color::DarkGray);
        for row in 0..self.area.height {
            for column in 0..self.area.width {
                let symbol = if column % TILE_COLUMNS == 0 { "." } else { " " };
                if let Some(cell) = self.buf.cell_mut((self.area.x + column, self.area.y + row)) {
                    cell.reset();
                    cell.set_symbol(symbol).set_style(dot);
                }
            }
        }
    }

    fn fill_rounded_rect(&mut self, rect: PixelRect, _radius: f64, fill: Fill) {
        let first_column = self.column_of(rect.x).floor() as i64;
        let end_column = self.column_of(rect.x + rect.width).ceil() as i64;
        let first_row = self.row_of(rect.y).floor() as i64;
        let end_row = self.row_of(rect.y + rect.height).ceil() as i64;

        for row in first_row..end_row {
            for column in first_column..end_column {
                self.paint(column, row, fill);
            }
        }
    }

    fn fill_circle(&mut self, center: (f64, f64), radius: f64, fill: Fill) {
        let (cx, cy) = center;
        let first_column = self.column_of(cx - radius).floor() as i64;
        let end_column = self.column_of(cx + radius).ceil() as i64;
        let first_row = self.row_of(cy - radius).floor() as i64;
        let end_row = self.row_of(cy + radius).ceil() as i64;

        let column_width = self.cell_size / TILE_COLUMNS as f64;
        let row_height = self.cell_size / TILE_ROWS as f64;

        for row in first_row..end_row {
            for column in first_column..end_column {
                let dx = (column as f64 + 0.5) * column_width - cx;
                let dy = (row as f64 + 0.5) * row_height - cy;
                if dx * dx + dy * dy <= radius * radius {
                    self.paint(column, row, fill);
                }
            }
        }
    }
}

/// Widget drawing the playfield of a game into its area
pub struct GridView<'a> {
    state: &'a GameState,
    cell_size: f64,
}

impl<'a> GridView<'a> {
    pub fn new(state: &'a GameState, cell_size: u32) -> Self {
        Self {
            state,
            cell_size: cell_size as f64,
        }
    }

    /// Terminal size needed to show a whole grid of `tile_count` tiles
    pub fn size_for(tile_count: usize) -> (u16, u16) {
        let tiles = tile_count as u16;
        (tiles * TILE_COLUMNS, tiles * TILE_ROWS)
    }
}

impl Widget for GridView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut surface = BufferSurface::new(buf, area, self.cell_size);
        draw_scene(self.state, self.cell_size, &mut surface);
    }
}
