use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::widgets::Widget;

/// Rectangle of at most `width` x `height` centered in `area`.
#[must_use]
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [_, row, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height.min(area.height)),
        Constraint::Fill(1),
    ])
    .areas(area);
    let [_, cell, _] = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(width.min(area.width)),
        Constraint::Fill(1),
    ])
    .areas(row);
    cell
}

/// Splits `area` into `count` rows of `height`, top-aligned.
#[must_use]
pub fn rows(area: Rect, height: u16, count: usize) -> Vec<Rect> {
    (0..count)
        .map_while(|i| {
            let offset = u16::try_from(i).ok()?.checked_mul(height)?;
            (offset < area.height).then(|| Rect {
                x: area.x,
                y: area.y + offset,
                width: area.width,
                height: height.min(area.height - offset),
            })
        })
        .collect()
}

/// Renders `widget` into `rows[index]` when that row exists.
pub fn draw(rows: &[Rect], index: usize, widget: impl Widget, buf: &mut Buffer) {
    if let Some(rect) = rows.get(index) {
        widget.render(*rect, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fits() {
        let area = Rect::new(0, 0, 100, 40);
        let cell = centered(area, 60, 10);
        assert_eq!((cell.width, cell.height), (60, 10));
        assert_eq!((cell.x, cell.y), (20, 15));
    }

    #[test]
    fn test_centered_clamps() {
        let cell = centered(Rect::new(0, 0, 30, 5), 60, 10);
        assert_eq!((cell.width, cell.height), (30, 5));
    }

    #[test]
    fn test_rows_stop_at_bottom() {
        let rows = rows(Rect::new(0, 0, 10, 7), 3, 5);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].height, 1);
    }
}
