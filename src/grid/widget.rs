use super::util::{DayCell, DAYS_IN_WEEK};
use super::window::{HeatmapGrid, MonthGrid};
use crate::layout::{ResponsiveLayout, ROW_LABEL_WIDTH};
use crate::theme::{LABEL_STYLE, PADDING_STYLE, WEEKDAY_STYLE};
use crate::tier::{Palette, MAX_TIER};
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::{Color, Style},
    text::Text,
    widgets::{Paragraph, Widget},
};
use std::iter::zip;
use time::Date;

/// Row labels to the left of the heatmap, Sunday first
static ROW_LABELS: [&str; DAYS_IN_WEEK] = ["", "Mon", "", "Wed", "", "Fri", ""];

/// Lines above the first weekday row, used for the month labels
const LABEL_LINES: u16 = 1;

/// Blank lines between the grid and the legend
const LEGEND_GAP: u16 = 1;

const DAYS: u16 = 7;

pub(crate) const HEATMAP_HEIGHT: u16 = LABEL_LINES + DAYS + LEGEND_GAP + 1;

const CELL_GLYPH: char = '■';

const SELECTED_GLYPH: char = '◆';

/// "Less " + one glyph and one space per tier, minus the last space, + " More"
const LEGEND_WIDTH: u16 = 5 + 2 * (MAX_TIER as u16 + 1) - 1 + 5;

/// Number of columns per day of week in the month view
const DAY_WIDTH: u16 = 5;

const MONTH_WIDTH: u16 = DAY_WIDTH * DAYS;

/// Number of lines taken up by the month view's header and its rule
const HEADER_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// Year-mode and rolling-window heatmap: one column per week, one line per
/// weekday
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Heatmap<'a> {
    grid: &'a HeatmapGrid,
    palette: Palette,
    layout: ResponsiveLayout,
    selected: Option<Date>,
}

impl<'a> Heatmap<'a> {
    pub(crate) fn new(grid: &'a HeatmapGrid, palette: Palette, layout: ResponsiveLayout) -> Self {
        Heatmap {
            grid,
            palette,
            layout,
            selected: None,
        }
    }

    pub(crate) fn selected(mut self, date: Date) -> Self {
        self.selected = Some(date);
        self
    }

    pub(crate) fn width(&self) -> u16 {
        ROW_LABEL_WIDTH + self.layout.grid_width(self.grid.grid.rows().len())
    }

    fn week_x(&self, week_no: usize) -> u16 {
        let week_no = u16::try_from(week_no).unwrap_or(u16::MAX);
        ROW_LABEL_WIDTH.saturating_add(
            week_no.saturating_mul(self.layout.cell_width + self.layout.cell_gap),
        )
    }
}

impl Widget for Heatmap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([self.width().min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        for label in &self.grid.month_labels {
            canvas.mvprint(0, self.week_x(label.index), label.name, Some(LABEL_STYLE));
        }
        for (y, name) in zip(LABEL_LINES.., ROW_LABELS) {
            canvas.mvprint(y, 0, name, Some(LABEL_STYLE));
        }
        let width = usize::from(self.layout.cell_width);
        for (week_no, week) in self.grid.grid.rows().iter().enumerate() {
            let x = self.week_x(week_no);
            for cell in week.in_range_cells() {
                let y = LABEL_LINES + cell_row(cell);
                let glyph = if self.selected == Some(cell.date) {
                    SELECTED_GLYPH
                } else {
                    CELL_GLYPH
                };
                canvas.mvprint(
                    y,
                    x,
                    String::from(glyph).repeat(width),
                    Some(Style::new().fg(self.palette.tier_color(cell.tier()))),
                );
            }
        }
        let legend_x = area.width.saturating_sub(LEGEND_WIDTH);
        canvas.draw_legend(LABEL_LINES + DAYS + LEGEND_GAP, legend_x, self.palette);
    }
}

/// Month view for narrow terminals: one line per week, padding days dimmed
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthView<'a> {
    grid: &'a MonthGrid,
    palette: Palette,
    selected: Option<Date>,
}

impl<'a> MonthView<'a> {
    pub(crate) fn new(grid: &'a MonthGrid, palette: Palette) -> Self {
        MonthView {
            grid,
            palette,
            selected: None,
        }
    }

    pub(crate) fn selected(mut self, date: Date) -> Self {
        self.selected = Some(date);
        self
    }

    pub(crate) fn height(&self) -> u16 {
        let weeks = u16::try_from(self.grid.grid.rows().len()).unwrap_or(u16::MAX);
        HEADER_LINES
            .saturating_add(weeks)
            .saturating_add(LEGEND_GAP + 1)
    }

    fn day_style(&self, cell: &DayCell) -> Style {
        if !cell.in_range {
            return PADDING_STYLE;
        }
        let tier = cell.tier();
        let fg = if tier == 0 { Color::White } else { Color::Black };
        Style::new().fg(fg).bg(self.palette.tier_color(tier))
    }
}

impl Widget for MonthView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [area] = Layout::horizontal([MONTH_WIDTH.min(area.width)])
            .flex(Flex::Center)
            .areas(area);
        let mut canvas = BufferCanvas::new(area, buf);
        let header = self
            .grid
            .weekday_labels
            .iter()
            .map(|label| format!("{:^5}", label.name))
            .collect::<String>();
        canvas.mvprint(0, 0, header, Some(WEEKDAY_STYLE));
        canvas.hline(1, 0, ACS_HLINE, MONTH_WIDTH);
        for (week_no, week) in zip(0u16.., self.grid.grid.rows()) {
            for (col, cell) in zip(0u16.., week.cells()) {
                let day = cell.date.day();
                let s = if self.selected == Some(cell.date) && cell.in_range {
                    format!("[{day:2}]")
                } else {
                    format!(" {day:2} ")
                };
                canvas.mvprint(
                    HEADER_LINES + week_no,
                    DAY_WIDTH * col,
                    s,
                    Some(self.day_style(cell)),
                );
            }
        }
        let legend_y = self.height() - 1;
        let legend_x = MONTH_WIDTH.saturating_sub(LEGEND_WIDTH) / 2;
        canvas.draw_legend(legend_y, legend_x, self.palette);
    }
}

/// Line offset of a weekday within a week column
fn cell_row(cell: &DayCell) -> u16 {
    cell.date.weekday().number_days_from_sunday().into()
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_legend(&mut self, y: u16, x: u16, palette: Palette) {
        self.mvprint(y, x, "Less", Some(LABEL_STYLE));
        let mut col = x + 5;
        for color in palette.tier_colors() {
            self.mvprint(y, col, String::from(CELL_GLYPH), Some(Style::new().fg(color)));
            col += 2;
        }
        self.mvprint(y, col, "More", Some(LABEL_STYLE));
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // widget's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
