//! History view rendering.
//!
//! One row per quantity showing the rolling window as a unicode sparkline
//! with min/max/latest annotations.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use sensorwatch_types::{HistoryBuffer, Quantity};

use crate::app::App;

/// Sparkline characters (8 levels of height).
const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render the History view: one chart row per quantity.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
        Constraint::Ratio(1, 3),
    ])
    .split(area);

    for (quantity, row) in Quantity::ALL.into_iter().zip(rows.iter()) {
        render_row(frame, app, quantity, *row);
    }
}

fn render_row(frame: &mut Frame, app: &App, quantity: Quantity, area: Rect) {
    let session = app.session(quantity);
    let history = session.state().history();

    let title = match (history.min(), history.max(), history.latest()) {
        (Some(min), Some(max), Some(latest)) => format!(
            " {}  min {:.1}  max {:.1}  latest {:.1} {} ",
            quantity.label(),
            min,
            max,
            latest,
            quantity.unit()
        ),
        _ => format!(" {} ", quantity.label()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = if history.is_empty() {
        vec![Line::from(Span::styled(
            "no readings yet",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        let style = if session.state().connected() {
            Style::default().fg(app.theme.highlight)
        } else {
            app.theme.stale
        };
        vec![Line::from(Span::styled(render_sparkline(history), style))]
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Scale history values to 0-7 bar levels and render them as characters.
fn render_sparkline(history: &HistoryBuffer) -> String {
    let (Some(min), Some(max)) = (history.min(), history.max()) else {
        return String::new();
    };
    let range = (max - min).max(f64::EPSILON);

    history
        .iter()
        .map(|v| {
            let level = (((v - min) / range) * 7.0).round() as usize;
            SPARKLINE_CHARS[level.min(7)]
        })
        .collect()
}
