use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table},
    Frame,
};

use crate::board::MAX_THANK_CHARS;
use crate::commands::{human_duration, local_time};
use crate::storage::KeyValueStore;
use crate::urgency::time_left;
use super::app::{App, InputMode, ViewMode, ADD_STEPS};

pub fn ui<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Main view
            Constraint::Length(3)  // Help / status
        ].as_ref())
        .split(f.area());

    match app.view_mode {
        ViewMode::Tasks => render_tasks(f, app, chunks[0]),
        ViewMode::Leaderboard => {
            let rows: Vec<Row> = app
                .board
                .top_helpers()
                .into_iter()
                .enumerate()
                .map(|(i, (name, count))| {
                    Row::new(vec![
                        Cell::from((i + 1).to_string()),
                        Cell::from(name),
                        Cell::from(count.to_string()).style(Style::default().fg(Color::Green)),
                    ])
                })
                .collect();

            let widths = [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(8),
            ];

            let table = Table::new(rows, widths)
                .header(Row::new(vec!["#", "Helper", "Helped"])
                    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                    .bottom_margin(1))
                .block(Block::default().borders(Borders::ALL).title(block_title(app)));

            f.render_widget(table, chunks[0]);
        }
        ViewMode::Skills => {
            let items: Vec<ListItem> = app
                .board
                .skills()
                .iter()
                .map(|s| ListItem::new(format!("{} — {}", s.nickname, s.skill_text)))
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(block_title(app)));
            f.render_widget(list, chunks[0]);
        }
        ViewMode::Thanks => {
            let items: Vec<ListItem> = app
                .board
                .thanks()
                .iter()
                .map(|t| ListItem::new(format!("💬 {}", t.text)))
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(block_title(app)));
            f.render_widget(list, chunks[0]);
        }
    }

    let help_text = match app.input_mode {
        InputMode::Normal => match app.view_mode {
            ViewMode::Tasks => "q: Quit | a: Post | r: Repost | h: I Helped | t: Thank | d: Del | s: Add Skill | /: Search | f: Neighborhood | Esc: Clear | x: Sweep | v: View",
            _ => "q: Quit | a: Post | t: Thank | s: Add Skill | v: Next View",
        },
        InputMode::ConfirmRemove => "y: Remove | n/Esc: Keep on Board",
        InputMode::Searching => "Type to filter | Enter: Done | Esc: Cancel",
        _ => "Enter: Next | Esc: Cancel",
    };
    let footer = match &app.status {
        Some(status) => format!("{}  ·  {}", status, help_text),
        None => help_text.to_string(),
    };

    let help = Paragraph::new(footer)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[1]);

    // Render Input Box if needed
    if app.input_mode != InputMode::Normal {
        let area = centered_rect(60, 3, f.area()); // Fixed height of 3 (border + 1 line)
        f.render_widget(Clear, area);

        let title = match app.input_mode {
            InputMode::Adding => format!(
                "Post Task ({}/{}): {}",
                app.add_state.step + 1,
                ADD_STEPS.len(),
                ADD_STEPS.get(app.add_state.step).copied().unwrap_or("")
            ),
            InputMode::Helping => "Your helper nickname (short)".to_string(),
            InputMode::ConfirmRemove => "Remove task from board? (y/N)".to_string(),
            InputMode::Thanking => format!(
                "Anonymous thank-you ({}/{})",
                app.input_buffer.chars().count(),
                MAX_THANK_CHARS
            ),
            InputMode::AddingSkill => match &app.skill_nick {
                None => "Add Skill: Your nickname".to_string(),
                Some(nick) => format!("Add Skill: What can {} help with?", nick),
            },
            InputMode::Searching => "Search".to_string(),
            InputMode::Normal => String::new(),
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn render_tasks<S: KeyValueStore>(f: &mut Frame, app: &mut App<S>, area: Rect) {
    let now = app.board.now();
    // Same snapshot as the selection.
    let rows: Vec<Row> = app
        .visible_ids
        .iter()
        .filter_map(|id| app.board.task(id))
        .map(|t| {
            let urgent = app.board.shows_urgent(t);
            let style = if urgent {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(t.category.icon()),
                Cell::from(t.title.clone()),
                Cell::from(t.neighborhood.clone()),
                Cell::from(format!("{}m", t.time_needed_minutes)),
                Cell::from(t.payment.clone()),
                Cell::from(t.safe_point.clone()),
                Cell::from(local_time(t.posted_at)),
                Cell::from(human_duration(time_left(t, now))),
                Cell::from(if urgent { "URGENT" } else { "" }),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(20),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(10),
        Constraint::Length(14),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["", "Task", "Neighborhood", "Time", "Payment", "Safe Point", "Posted", "Expires", ""])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title(block_title(app)))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn block_title<S: KeyValueStore>(app: &App<S>) -> String {
    let mut title = format!("Neighborly - {}", app.view_mode.title());
    if app.view_mode == ViewMode::Tasks {
        title.push_str(&format!(
            " [{}]",
            app.neighborhood_filter.as_deref().unwrap_or("All neighborhoods")
        ));
        if !app.search.is_empty() {
            title.push_str(&format!(" search: \"{}\"", app.search));
        }
    }
    title
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
