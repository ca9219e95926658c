//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! The layout is a scrollable recent-items list on top and a one-line status
//! bar at the bottom.  Modal dialogs are drawn centred over both.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Modal};
use crate::util::truncate_title;

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [main_area, status_area] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_recent_items(app, frame, main_area);
    draw_status_bar(app, frame, status_area);

    if let Some(modal) = &app.modal {
        draw_modal(modal, frame);
    }
}

/// Render the recent-items list, newest first.
fn draw_recent_items(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Syndi · Recent Items ")
        .borders(Borders::ALL);

    if app.items().is_empty() {
        let empty = Paragraph::new("No recent items")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let list_items: Vec<ListItem> = app
        .items()
        .iter()
        .map(|item| {
            let mut spans = Vec::with_capacity(4);
            if !item.timestamp.is_empty() {
                spans.push(Span::styled(
                    format!("[{}] ", item.timestamp),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            spans.push(Span::styled(
                truncate_title(&item.title),
                Style::default().fg(Color::White),
            ));
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("[{}]", item.feed_title),
                Style::default().fg(Color::Cyan),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(list_items)
        .block(block)
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::raw(" "),
        Span::styled(app.last_check_label(), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled(&app.status, Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::raw(format!("{} feeds", app.snapshot.enabled_feeds)),
    ];
    if app.snapshot.failed_feeds > 0 {
        spans.push(Span::styled(
            format!(" ({} failing)", app.snapshot.failed_feeds),
            Style::default().fg(Color::Red),
        ));
    }
    spans.push(Span::raw(
        "  c: check  ⏎: open  t: test  e: edit config  r: reload  x: clear  a: about  q: quit",
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render a dialog over everything else.
fn draw_modal(modal: &Modal, frame: &mut Frame) {
    let (title, body, hint) = match modal {
        Modal::ConfirmClear { seen, recent } => (
            "Clear Seen Data",
            format!(
                "Are you sure you want to clear all {seen} seen items and {recent} recent items?\n\n\
                 This will trigger notifications for all RSS items on the next check."
            ),
            "y: clear   n: cancel",
        ),
        Modal::Alert { title, message } => (title.as_str(), message.clone(), "any key: close"),
    };

    let area = centered(frame.area(), 60, 12);
    let mut text = vec![Line::from("")];
    text.extend(body.lines().map(|l| Line::from(l.to_string())));
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
    let dialog = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );

    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// A `width` x `height` rectangle centred in `area`, shrunk to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}
