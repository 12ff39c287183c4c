use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::format_amount;

/// Rows taken by the cards and the gauge.
pub(crate) const HEIGHT: u16 = 8;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Summary cards
            Constraint::Length(3), // Budget gauge
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_gauge(f, chunks[1], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let summary = &app.summary;
    let count = app.rows.len();
    let with_bill = app.rows.iter().filter(|r| r.has_image).count();

    render_card(
        f,
        cards[0],
        "Budget",
        format_amount(summary.budget, &app.currency),
        theme::ACCENT,
        "per month".into(),
    );
    render_card(
        f,
        cards[1],
        "Spent",
        format_amount(summary.total, &app.currency),
        theme::YELLOW,
        format!(
            "{count} expense{}, {with_bill} with bill image",
            if count == 1 { "" } else { "s" }
        ),
    );
    let remaining_color = if summary.remaining < Decimal::ZERO {
        theme::RED
    } else {
        theme::GREEN
    };
    render_card(
        f,
        cards[2],
        "Remaining",
        format_amount(summary.remaining, &app.currency),
        remaining_color,
        summary.tier.to_string(),
    );
}

fn render_card(f: &mut Frame, area: Rect, title: &str, display: String, color: Color, sub: String) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn render_gauge(f: &mut Frame, area: Rect, app: &App) {
    let summary = &app.summary;
    let color = theme::tier_color(summary.tier);
    // An over-budget gauge is empty, so the marker carries the color instead.
    let label_color = if summary.is_over_budget() {
        color
    } else {
        theme::TEXT
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme::OVERLAY))
                .title(Span::styled(
                    " Budget left ",
                    Style::default()
                        .fg(theme::TEXT_DIM)
                        .add_modifier(Modifier::BOLD),
                )),
        )
        .gauge_style(Style::default().fg(color).bg(theme::SURFACE))
        .ratio(summary.ratio())
        .label(Span::styled(
            summary.label(),
            Style::default()
                .fg(label_color)
                .add_modifier(Modifier::BOLD),
        ));

    f.render_widget(gauge, area);
}
