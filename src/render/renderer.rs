use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use super::terminal::GridView;
use crate::app::UiState;
use crate::game::GameState;

pub struct Renderer {
    cell_size: u32,
}

impl Renderer {
    pub fn new(cell_size: u32) -> Self {
        Self { cell_size }
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, ui: &UiState) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(ui), chunks[0]);

        let board = board_area(chunks[1], state.tile_count, ui.shaking);
        let border = if ui.shaking { Color::Red } else { Color::White };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(border))
            .title(" Snake ");
        let inner = block.inner(board);
        frame.render_widget(block, board);
        frame.render_widget(GridView::new(state, self.cell_size), inner);

        if ui.start_overlay {
            self.render_overlay(frame, inner, self.start_lines());
        } else if ui.game_over_overlay {
            self.render_overlay(frame, inner, self.game_over_lines(ui));
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    fn render_stats(&self, ui: &UiState) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                ui.score.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(ui.high_score.clone(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_overlay(&self, frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
        let height = (lines.len() as u16 + 2).min(area.height);
        let width = 34.min(area.width);
        let popup = Rect {
            x: area.x + (area.width - width) / 2,
            y: area.y + (area.height - height) / 2,
            width,
            height,
        };

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green)),
            ),
            popup,
        );
    }

    fn start_lines(&self) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "SNAKE",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press any key to start",
                Style::default().fg(Color::Gray),
            )),
        ]
    }

    fn game_over_lines(&self, ui: &UiState) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    ui.final_score.clone(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again", Style::default().fg(Color::Gray)),
            ]),
        ]
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("R", Style::default().fg(Color::Green)),
            Span::raw(" to restart | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

/// Centre a bordered board for `tile_count` tiles inside `area`. While
/// shaking the board is nudged one column right.
fn board_area(area: Rect, tile_count: usize, shaking: bool) -> Rect {
    let (grid_width, grid_height) = GridView::size_for(tile_count);
    let width = (grid_width + 2).min(area.width);
    let height = (grid_height + 2).min(area.height);
    let mut x = area.x + (area.width - width) / 2;
    if shaking && x + width < area.x + area.width {
        x += 1;
    }

    Rect {
        x,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
