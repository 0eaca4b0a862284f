//! Terminal UI rendering with ratatui

use crate::board::{COLS, ROWS};
use crate::game::{Game, GameState};
use crate::menu::Menu;
use crate::score::ScoreDisplay;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const EMPTY: &str = "  ";
const BLOCK: &str = "██";

/// Total width needed: board(22) + score panel(14)
const GAME_WIDTH: u16 = 36;
/// Total height needed: board(20) + 2 for borders
const GAME_HEIGHT: u16 = ROWS as u16 + 2;

/// Render the main menu
pub fn render_menu(frame: &mut Frame, menu: &Menu) {
    let menu_area = center_rect(frame.area(), 36, 14);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(menu_area);

    let title = Paragraph::new(vec![
        Line::raw(""),
        Line::styled("BLOCKFALL", Style::default().fg(Color::Cyan).bold()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(layout[1]);
    frame.render_widget(block, layout[1]);

    let mut lines = vec![Line::raw("")];
    for (i, item) in menu.items.iter().enumerate() {
        let line = if i == menu.selected {
            Line::styled(format!("▶ {}", item.label), Style::default().fg(Color::Yellow).bold())
        } else {
            Line::styled(format!("  {}", item.label), Style::default().fg(Color::White))
        };
        lines.push(line);
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "↑↓ Select  Enter Confirm",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Render the field, the score and any overlay
pub fn render_game(frame: &mut Frame, game: &Game, score: &ScoreDisplay) {
    let area = frame.area();
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(COLS as u16 * 2 + 2),
            Constraint::Length(14),
        ])
        .split(game_area);

    render_board(frame, layout[0], game);
    render_score(frame, layout[1], score);

    if game.state() == GameState::GameOver {
        render_overlay(
            frame,
            area,
            "GAME OVER",
            &format!("Final Score: {}", score.get()),
            "Enter: Back to Menu",
        );
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Color of each visible cell, top row first
fn board_colors(game: &Game) -> [[Option<Color>; COLS]; ROWS] {
    let mut colors = [[None; COLS]; ROWS];

    let piece_cells = game
        .current_piece
        .iter()
        .flat_map(|piece| piece.world_cells().map(|cell| (cell, piece.color())));

    for ((col, row), color) in game.board.occupied_cells().chain(piece_cells) {
        if (0..COLS as i32).contains(&col) && (0..ROWS as i32).contains(&row) {
            colors[row as usize][col as usize] = Some(color);
        }
    }

    colors
}

/// Render the playing field with the falling piece
fn render_board(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = board_colors(game)
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .map(|cell| match cell {
                    Some(color) => Span::styled(BLOCK, Style::default().fg(*color)),
                    None => Span::raw(EMPTY),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render the score panel
fn render_score(frame: &mut Frame, area: Rect, score: &ScoreDisplay) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        Line::from(Span::styled("SCORE", Style::default().fg(Color::Gray))),
        Line::from(Span::styled(
            format!("{}", score.get()),
            Style::default().fg(Color::Yellow).bold(),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Render a centered popup
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str, hint: &str) {
    let popup_area = center_rect(area, 26, 7);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .style(Style::default().bg(Color::Black));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Red).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::White)),
        Line::raw(""),
        Line::styled(hint, Style::default().fg(Color::DarkGray)),
    ];
    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::piece::Piece;
    use crate::tetromino::TetrominoType;
    use ratatui::{Terminal, backend::TestBackend};

    #[test]
    fn test_board_colors_merge_field_and_piece() {
        let mut game = Game::default();
        game.board.set(0, 19, Cell::Filled(Color::Red));
        game.current_piece = Some(Piece::new(TetrominoType::O));

        let colors = board_colors(&game);
        assert_eq!(colors[19][0], Some(Color::Red));
        assert_eq!(colors[0][4], Some(Color::Yellow));
        assert_eq!(colors[1][5], Some(Color::Yellow));
        assert_eq!(colors[10][3], None);
    }

    #[test]
    fn test_center_rect_clamps() {
        let area = Rect::new(0, 0, 10, 5);
        assert_eq!(center_rect(area, 20, 20), Rect::new(0, 0, 10, 5));
        assert_eq!(center_rect(area, 4, 1), Rect::new(3, 2, 4, 1));
    }

    #[test]
    fn test_render_smoke() {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        let game = Game::default();
        let display = ScoreDisplay::new();
        terminal
            .draw(|frame| {
                render_menu(frame, &Menu::new());
                render_game(frame, &game, &display);
            })
            .unwrap();
    }
}
