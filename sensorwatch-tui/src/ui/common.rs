//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and the
//! help and alert overlays.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use sensorwatch_types::Quantity;

use crate::app::{App, View};

/// Render the header bar: title, per-quantity connectivity, actuator state.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" SENSORWATCH ", app.theme.header), Span::raw("│ ")];

    for quantity in Quantity::ALL {
        let connected = app.session(quantity).state().connected();
        let style = app.theme.connectivity_style(connected);
        spans.push(Span::styled("● ", style));
        spans.push(Span::raw(quantity.label()));
        spans.push(Span::raw("  "));
    }

    spans.push(Span::raw("│ actuator "));
    let (actuator, style) = if app.command_in_flight() {
        ("…", Style::default().add_modifier(Modifier::DIM))
    } else if app.actuator_on() {
        ("ON", Style::default().fg(app.theme.connected))
    } else {
        ("OFF", Style::default().add_modifier(Modifier::DIM))
    };
    spans.push(Span::styled(actuator, style));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the tab bar.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = [View::Dashboard, View::History]
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {} {} ", i + 1, view.label())))
        .collect();

    let selected = match app.current_view {
        View::Dashboard => 0,
        View::History => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("│");

    frame.render_widget(tabs, area);
}

/// Render the status bar: mode, endpoint, interval, and transient feedback.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!(" {} ", app.settings.mode.label()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::raw(app.settings.base_url.clone()),
        Span::raw(" │ "),
        Span::raw(format!("{}ms", app.settings.poll_interval_ms)),
        Span::raw(" │ "),
    ];

    if let Some(message) = app.get_status_message() {
        spans.push(Span::styled(
            message.to_string(),
            Style::default().fg(app.theme.highlight),
        ));
    } else if app.is_connected_mode() {
        spans.push(Span::styled(
            "live",
            app.theme.connectivity_style(true),
        ));
    } else {
        spans.push(Span::styled(
            "idle — press c to connect",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }

    let line = Line::from(spans);
    let hint = Paragraph::new(Line::from(Span::styled(
        "? help  q quit ",
        Style::default().add_modifier(Modifier::DIM),
    )))
    .alignment(Alignment::Right);

    frame.render_widget(Paragraph::new(line), area);
    frame.render_widget(hint, area);
}

/// Render the help overlay listing every key binding.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(44, 14, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        Line::from("  Tab / 1 / 2   switch view"),
        Line::from("  c             connect / disconnect"),
        Line::from("  m             cycle connection mode"),
        Line::from("  + / -         polling interval ±250ms"),
        Line::from("  a             toggle actuator"),
        Line::from("  ?             toggle this help"),
        Line::from("  q             quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  mode and interval changes restart the connection",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

/// Render the blocking alert overlay. Any key dismisses it.
pub fn render_alert(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let popup = centered_rect(54, 7, area);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(""),
        Line::from(Span::raw(message.to_string())).alignment(Alignment::Center),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to dismiss",
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center),
    ];

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.disconnected));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(ratatui::widgets::Wrap { trim: true }),
        popup,
    );
}

/// A centered rect of fixed size inside `area`, clipped to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
