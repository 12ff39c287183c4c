use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::popup_area;
use crate::ui::form::{ExpenseForm, FormField, FormMode};
use crate::ui::theme;

const LABEL_WIDTH: usize = 13;

pub(crate) fn render(f: &mut Frame, area: Rect, form: &ExpenseForm) {
    let mut lines = vec![Line::from("")];
    let mut cursor = None;

    for (row, field) in form.fields().into_iter().enumerate() {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let marker = if focused { "> " } else { "  " };
        let label = format!("{marker}{:<LABEL_WIDTH$}", field.label());

        let value = form.value(field);
        let shown = if field.is_choice() {
            format!("< {value} >")
        } else {
            value.to_string()
        };
        let value_style = if focused {
            Style::default().fg(theme::TEXT).bg(theme::SURFACE)
        } else {
            theme::normal_style()
        };

        if focused && !field.is_choice() {
            let col = label.chars().count() + value.chars().count();
            cursor = Some((col as u16, row as u16 + 1));
        }

        lines.push(Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(shown, value_style),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(hint(form), theme::dim_style())));

    let popup = popup_area(area, 64, lines.len() as u16 + 2);
    f.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::ACCENT))
        .title(Span::styled(
            form.title(),
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(theme::HEADER_BG));
    f.render_widget(Paragraph::new(lines).block(block), popup);

    if let Some((x, y)) = cursor {
        // +1 for the border
        f.set_cursor_position((popup.x + 1 + x, popup.y + 1 + y));
    }
}

fn hint(form: &ExpenseForm) -> String {
    let choice = if form.focus.is_choice() {
        " Left/Right/Space change |"
    } else {
        ""
    };
    let extra = match (form.mode, form.focus) {
        (FormMode::Add, FormField::Image) => " path to the bill image |",
        (_, FormField::Date) => " YYYY-MM-DD |",
        _ => "",
    };
    let submit = match form.mode {
        FormMode::Add => " Enter add | Esc close ",
        FormMode::Edit { .. } => " Enter save | Esc cancel ",
    };
    format!(" Tab next |{choice}{extra}{submit}")
}
