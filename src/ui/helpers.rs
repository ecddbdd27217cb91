use anyhow::Error;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Area of `percent_x` by `percent_y` of `area`, centered on both axes.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [column] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(column);
    cell
}

/// Cursor column for text `offset` characters into `inner`, pinned to the
/// last column of the field once the text no longer fits.
pub(crate) fn cursor_column(inner: Rect, offset: usize) -> u16 {
    let offset = u16::try_from(offset).unwrap_or(u16::MAX);
    inner
        .x
        .saturating_add(offset)
        .min(inner.right().saturating_sub(1))
}

/// Innermost cause of an error chain; that is the message users can act on.
pub(crate) fn surface_error(err: &Error) -> String {
    err.root_cause().to_string()
}

/// Primary action button; dimmed while the action is disabled.
pub(crate) fn button_line(label: &str, enabled: bool) -> Line<'static> {
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(Span::styled(format!("  {label}  "), style))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn surface_error_prefers_root_cause() {
        let err = anyhow!("disk I/O error").context("failed to insert task");
        assert_eq!(surface_error(&err), "disk I/O error");
    }

    #[test]
    fn cursor_column_is_clamped_to_field() {
        let inner = Rect::new(10, 3, 20, 1);
        assert_eq!(cursor_column(inner, 4), 14);
        assert_eq!(cursor_column(inner, 19), 29);
        assert_eq!(cursor_column(inner, 25), 29);
        assert_eq!(cursor_column(inner, 70_000), 29);
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_rect(60, 50, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!((popup.x, popup.y), (20, 10));
    }
}
