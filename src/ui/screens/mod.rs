pub(crate) mod expenses;
pub(crate) mod form;
pub(crate) mod preview;
pub(crate) mod summary;

use ratatui::layout::Rect;

/// Center a popup of the given size, clamped to the terminal.
pub(crate) fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let height = height.min(area.height.saturating_sub(2));
    let width = width.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
