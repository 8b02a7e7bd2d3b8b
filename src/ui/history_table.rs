use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

use crate::history::GameRecord;

/// Pure presenter for a single past game
pub fn present_row(record: &GameRecord) -> Row<'static> {
    let (high_score, high_score_style) = match record.new_high_score {
        Some(true) => (
            "yes",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        Some(false) => ("no", Style::default()),
        None => ("not recorded", Style::default().fg(Color::DarkGray)),
    };

    Row::new(vec![
        Cell::from(record.played_at.format("%Y-%m-%d %H:%M").to_string()),
        Cell::from(format!("{}s", record.duration_secs)),
        Cell::from(record.score.to_string()).style(Style::default().fg(Color::Green)),
        Cell::from(high_score).style(high_score_style),
    ])
}

/// Table of past games, newest first
pub fn render_history(records: &[GameRecord], area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // table
            Constraint::Length(3), // legend
        ])
        .split(area);

    Paragraph::new(format!("Games played: {}", records.len()))
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if records.is_empty() {
        Paragraph::new("No games recorded yet.")
            .block(Block::default().borders(Borders::ALL))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
    } else {
        let header = Row::new(vec!["Played", "Length", "Score", "New high"]).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
        let visible = chunks[1].height.saturating_sub(3) as usize;
        let rows: Vec<Row> = records.iter().take(visible).map(present_row).collect();

        Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(14),
            ],
        )
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Recent games"))
        .render(chunks[1], buf);
    }

    Paragraph::new("(b)ack / (n)ew game / (esc)ape")
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);
}
