use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::popup_area;
use crate::ui::app::ImagePreview;
use crate::ui::theme;
use crate::ui::util::{format_size, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, preview: &ImagePreview) {
    let image = &preview.image;
    let dimensions = match image.dimensions() {
        Some((w, h)) => format!("{w} x {h} px"),
        None => "unknown".to_string(),
    };
    let pdf_note = if image.is_jpeg() {
        "embedded in PDF exports"
    } else {
        "left out of PDF exports (JPEG only)"
    };

    let row = |label: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("  {label:<12}"), theme::dim_style()),
            Span::styled(value, theme::normal_style()),
        ])
    };

    let lines = vec![
        Line::from(""),
        row("Expense", format!("#{} {}", preview.index + 1, truncate(&preview.description, 36))),
        row("Type", image.mime().to_string()),
        row("Size", format_size(image.size())),
        row("Dimensions", dimensions),
        row("PDF", pdf_note.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            format!("  s save as bill-{}.{} in the export folder", preview.index + 1, image.extension()),
            Style::default().fg(theme::YELLOW),
        )),
        Line::from(Span::styled("  any other key closes", theme::dim_style())),
    ];

    let popup = popup_area(area, 60, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(
            " Bill Image ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(Paragraph::new(lines).block(block), popup);
}
