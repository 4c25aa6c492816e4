use crate::theme::WEEKDAY_STYLE;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

/// `(keys, description)` pairs, in display order
static KEYS: &[(&str, &str)] = &[
    ("ARROWS", "Move the selected day"),
    ("ENTER", "Select the highlighted day"),
    ("[, ]", "Previous / next period"),
    ("y", "Calendar year view"),
    ("m", "Month view"),
    ("r", "Rolling window view"),
    ("c", "Next color palette"),
    ("0, HOME", "Jump to today"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEY_COLUMN: usize = 10;

/// Popup listing the key bindings, drawn centered over whatever is below it
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn text(self) -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|&(keys, about)| {
                Line::from(vec![
                    Span::styled(format!("{keys:KEY_COLUMN$}"), WEEKDAY_STYLE),
                    Span::raw(about),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw("Press any key to dismiss."));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = self.text();
        // +2 for the border on each side, +2 for horizontal padding
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_add(2)
            .min(area.height);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .saturating_add(4)
            .min(area.width);
        let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(Alignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(popup, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::BASE_STYLE;

    #[test]
    fn test_help_popup() {
        let area = Rect::new(0, 0, 50, 20);
        let mut buffer = Buffer::empty(area);
        Help(BASE_STYLE).render(area, &mut buffer);
        let lines = buffer
            .content
            .chunks(50)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>();
        // 10 bindings, a blank line, the footer, and the border
        assert_eq!(lines[3].trim(), "┌────────────── Commands ──────────────┐");
        assert_eq!(lines[4].trim(), "│ ARROWS    Move the selected day      │");
        assert_eq!(lines[15].trim(), "│ Press any key to dismiss.            │");
        assert_eq!(lines[16].trim(), "└──────────────────────────────────────┘");
        assert_eq!(lines[0].trim(), "");
    }
}
