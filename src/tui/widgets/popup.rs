//! Shared popup geometry.

use ratatui::layout::Rect;

/// Fixed-size rect centered in `area`, shrunk to fit.
pub fn fixed_centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
