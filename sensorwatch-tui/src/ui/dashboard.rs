//! Dashboard view rendering.
//!
//! One tile per quantity: a gauge scaled to the quantity's expected range,
//! the latest reading with its unit, and the connection state. A quantity
//! that loses its channel keeps showing the last reading, dimmed.

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use sensorwatch_types::Quantity;

use crate::app::App;

/// Render the Dashboard view: one tile per quantity, side by side.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::horizontal([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (quantity, column) in Quantity::ALL.into_iter().zip(columns.iter()) {
        render_tile(frame, app, quantity, *column);
    }
}

fn render_tile(frame: &mut Frame, app: &App, quantity: Quantity, area: Rect) {
    let session = app.session(quantity);
    let connected = session.state().connected();

    let border_style = if connected {
        Style::default().fg(app.theme.border)
    } else {
        app.theme.stale
    };
    let block = Block::default()
        .title(format!(" {} ", quantity.label()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(border_style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(1), // connection badge
        Constraint::Min(2),    // value
        Constraint::Length(1), // gauge
        Constraint::Length(1), // freshness
    ])
    .split(inner);

    // Connection badge
    let badge = if connected {
        Span::styled("● connected", app.theme.connectivity_style(true))
    } else {
        Span::styled("○ waiting…", app.theme.connectivity_style(false))
    };
    frame.render_widget(
        Paragraph::new(Line::from(badge)).alignment(Alignment::Center),
        rows[0],
    );

    // Latest value
    let value_line = match session.state().value() {
        Some(value) => {
            let style = if connected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                app.theme.stale
            };
            Line::from(Span::styled(
                format!("{:.1} {}", value, quantity.unit()),
                style,
            ))
        }
        None => Line::from(Span::styled(
            "--",
            Style::default().add_modifier(Modifier::DIM),
        )),
    };
    frame.render_widget(
        Paragraph::new(value_line).alignment(Alignment::Center),
        rows[1],
    );

    // Gauge scaled to the quantity's display range
    let ratio = session
        .state()
        .value()
        .map(|v| gauge_ratio(v, quantity))
        .unwrap_or(0.0);
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(app.theme.gauge))
        .ratio(ratio)
        .label("");
    frame.render_widget(gauge, rows[2]);

    // Freshness
    if let Some(age) = session.state().age() {
        let secs = age.as_secs();
        let text = if secs < 2 {
            "just now".to_string()
        } else {
            format!("{secs}s ago")
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().add_modifier(Modifier::DIM),
            )))
            .alignment(Alignment::Center),
            rows[3],
        );
    }
}

/// Map a value into the quantity's display range as a 0..=1 ratio.
fn gauge_ratio(value: f64, quantity: Quantity) -> f64 {
    let (lo, hi) = quantity.display_range();
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gauge_ratio_scales_into_range() {
        assert_eq!(gauge_ratio(25.0, Quantity::Temperature), 0.5);
        assert_eq!(gauge_ratio(50.0, Quantity::Humidity), 0.5);
        assert_eq!(gauge_ratio(100.0, Quantity::Distance), 0.25);
    }

    #[test]
    fn test_gauge_ratio_clamps_out_of_range() {
        assert_eq!(gauge_ratio(-10.0, Quantity::Temperature), 0.0);
        assert_eq!(gauge_ratio(900.0, Quantity::Distance), 1.0);
    }
}
