pub mod history_table;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, View};
use crate::celebration::Celebration;
use crate::display::NEW_HIGH_SCORE_TEXT;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const INPUT_WIDTH: u16 = 30;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view {
            View::Game => render_game(self, area, buf),
            View::History => history_table::render_history(&self.past_games, area, buf),
        }

        if self.celebration.is_active {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

fn render_game(app: &App, area: Rect, buf: &mut Buffer) {
    let board = app.scoreboard();

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(0),    // top padding
            Constraint::Length(1), // timer
            Constraint::Length(1), // score
            Constraint::Length(1), // padding
            Constraint::Length(3), // input box
            Constraint::Length(1), // pending checks
            Constraint::Length(2), // result text
            Constraint::Min(0),    // bottom padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let timer_style = if board.game_over {
        bold_style.fg(Color::Yellow)
    } else {
        bold_style
    };
    Paragraph::new(Span::styled(board.timer_text.clone(), timer_style))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let mut score_line = vec![
        Span::styled("Score: ", dim_style),
        Span::styled(board.score.to_string(), bold_style.fg(Color::Green)),
    ];
    if board.new_high_score {
        score_line.push(Span::raw("  "));
        score_line.push(Span::styled(
            NEW_HIGH_SCORE_TEXT,
            bold_style.fg(Color::Magenta),
        ));
    }
    Paragraph::new(Line::from(score_line))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if !board.game_over {
        let input_area = centered(chunks[4], INPUT_WIDTH);
        let mut text = app.input.clone();
        let max_width = input_area.width.saturating_sub(3) as usize;
        while text.width() > max_width {
            text.remove(0);
        }
        Paragraph::new(Line::from(vec![
            Span::styled(text, bold_style),
            Span::styled("_", dim_style.add_modifier(Modifier::SLOW_BLINK)),
        ]))
        .block(Block::default().borders(Borders::ALL).title("guess"))
        .render(input_area, buf);

        let pending = app.controller.pending_guesses();
        if pending > 0 {
            Paragraph::new(Span::styled(
                format!("checking {} word{}...", pending, if pending == 1 { "" } else { "s" }),
                italic_style.add_modifier(Modifier::DIM),
            ))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
        }
    }

    if let Some(result) = &board.result_text {
        Paragraph::new(Span::styled(result.clone(), italic_style.fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[6], buf);
    }

    let legend = if !board.game_over {
        "(enter) guess / (esc)ape"
    } else if app.has_history() {
        "(n)ew game / (h)istory / (esc)ape"
    } else {
        "(n)ew game / (esc)ape"
    };
    Paragraph::new(Span::styled(legend, italic_style)).render(chunks[8], buf);
}

/// A horizontally centered slice of `area`, at most `width` wide
fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Render celebration particles on top of the current screen
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let vitality = particle.vitality();
        let style = if particle.is_letter() || vitality > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if vitality > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
