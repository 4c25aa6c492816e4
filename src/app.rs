use crate::grid::{
    build_month_grid, build_rolling_grid, build_year_grid, DayCell, Grid, GridError, Heatmap,
    HeatmapGrid, MonthGrid, MonthView, Window, DEFAULT_WINDOW_DAYS, HEATMAP_HEIGHT,
};
use crate::help::Help;
use crate::layout::ResponsiveLayout;
use crate::source::{valid_years, CountSource, FIRST_YEAR};
use crate::theme::{BASE_STYLE, ERROR_STYLE, STATUS_STYLE, TITLE_STYLE};
use crate::tier::Palette;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    style::Style,
    text::Line,
    widgets::{Paragraph, Widget},
    Terminal,
};
use std::io::{self, Write};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date, Duration};

static TOOLTIP_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[weekday repr:short] [month repr:short] [day] [year]");

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<S> {
    source: S,
    today: Date,
    window: Window,
    rolling_days: u16,
    palette: Palette,
    selected: Date,
    clicked: Option<DayCell>,
    // Set from the terminal width on each draw
    mobile: bool,
    state: AppState,
}

impl<S: CountSource> App<S> {
    pub(crate) fn new(source: S, today: Date, window: Window) -> App<S> {
        let rolling_days = match window {
            Window::Rolling { days, .. } => days.get(),
            _ => DEFAULT_WINDOW_DAYS,
        };
        App {
            source,
            today,
            window,
            rolling_days,
            palette: Palette::default(),
            selected: default_selection(window, today),
            clicked: None,
            mobile: false,
            state: AppState::Heatmap,
        }
    }

    pub(crate) fn palette(mut self, palette: Palette) -> App<S> {
        self.palette = palette;
        self
    }

    /// Length of the window the `r` key switches to
    pub(crate) fn rolling_days(mut self, days: u16) -> App<S> {
        self.rolling_days = days;
        self
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Heatmap => {
                let month_view = matches!(self.shown_window(), Window::Month { .. });
                match key {
                    KeyCode::Left if month_view => self.move_selection(-1),
                    KeyCode::Right if month_view => self.move_selection(1),
                    KeyCode::Up if month_view => self.move_selection(-7),
                    KeyCode::Down if month_view => self.move_selection(7),
                    KeyCode::Left => self.move_selection(-7),
                    KeyCode::Right => self.move_selection(7),
                    KeyCode::Up => self.move_selection(-1),
                    KeyCode::Down => self.move_selection(1),
                    KeyCode::Char('[') => self.step_period(false),
                    KeyCode::Char(']') => self.step_period(true),
                    KeyCode::Char('y') => self.switch_to(Window::year(self.selected.year()).ok()),
                    KeyCode::Char('m') => self.switch_to(Some(Window::month_of(self.selected))),
                    KeyCode::Char('r') => {
                        self.switch_to(Window::rolling(self.today, self.rolling_days).ok())
                    }
                    KeyCode::Char('0') | KeyCode::Home => {
                        self.reset();
                        true
                    }
                    KeyCode::Char('c') => {
                        self.palette = self.palette.cycle();
                        tracing::info!(palette = %self.palette, "switched palette");
                        true
                    }
                    KeyCode::Enter => self.click(),
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.state = AppState::Quitting;
                        true
                    }
                    KeyCode::Char('?') => {
                        self.state = AppState::Helping;
                        true
                    }
                    _ => false,
                }
            }
            AppState::Helping => {
                self.state = AppState::Heatmap;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    /// The window actually drawn: narrow terminals get the month containing
    /// the selected day instead of a year of weeks
    fn shown_window(&self) -> Window {
        match self.window {
            Window::Month { .. } => self.window,
            _ if self.mobile => Window::month_of(self.selected),
            w => w,
        }
    }

    fn is_offered(&self, window: &Window) -> bool {
        match *window {
            Window::Year(year) | Window::Month { year, .. } => {
                valid_years(self.today).contains(&year)
            }
            Window::Rolling { end, .. } => end <= self.today && end.year() >= FIRST_YEAR,
        }
    }

    fn move_selection(&mut self, days: i64) -> bool {
        match self.selected.checked_add(Duration::days(days)) {
            Some(date) if self.window.contains(date) => {
                self.selected = date;
                true
            }
            _ => false,
        }
    }

    fn step_period(&mut self, forward: bool) -> bool {
        let shown = self.shown_window();
        let target = if forward {
            shown.next()
        } else {
            shown.previous()
        };
        let Some(target) = target.filter(|w| self.is_offered(w)) else {
            return false;
        };
        if shown == self.window {
            tracing::debug!(window = ?target, "changed period");
            self.window = target;
            self.selected = default_selection(target, self.today);
            true
        } else {
            // Month fallback inside a longer window: move the selection to
            // the neighboring month as long as it stays in the window
            let edge = if forward {
                target.first_day()
            } else {
                target.last_day()
            };
            match edge {
                Ok(date) if self.window.contains(date) => {
                    self.selected = date;
                    true
                }
                _ => false,
            }
        }
    }

    fn switch_to(&mut self, window: Option<Window>) -> bool {
        match window {
            Some(w) if self.is_offered(&w) || w.contains(self.selected) => {
                tracing::debug!(window = ?w, "switched view");
                self.window = w;
                if !w.contains(self.selected) {
                    self.selected = default_selection(w, self.today);
                }
                true
            }
            _ => false,
        }
    }

    fn reset(&mut self) {
        let window = match self.window {
            Window::Rolling { .. } => Window::rolling(self.today, self.rolling_days).ok(),
            Window::Year(_) => Window::year(self.today.year()).ok(),
            Window::Month { .. } => Some(Window::month_of(self.today)),
        };
        if let Some(w) = window {
            self.window = w;
        }
        self.selected = self.today;
    }

    fn click(&mut self) -> bool {
        match self.build_view().ok().and_then(|v| v.get(self.selected)) {
            Some(cell) => {
                self.on_day_click(cell);
                true
            }
            None => false,
        }
    }

    fn on_day_click(&mut self, cell: DayCell) {
        tracing::info!(date = %cell.date, count = cell.count, "day clicked");
        self.clicked = Some(cell);
    }

    fn build_view(&self) -> Result<View, GridError> {
        match self.shown_window() {
            Window::Year(year) => build_year_grid(year, self.today, &self.source).map(View::Year),
            Window::Rolling { end, days } => {
                build_rolling_grid(end, days.get(), &self.source).map(View::Year)
            }
            shown @ Window::Month { year, month } => {
                let mut mg =
                    build_month_grid(year, u8::from(month) - 1, self.today, &self.source)?;
                if shown != self.window {
                    mg.grid.clip_to(&self.window);
                }
                Ok(View::Month(mg))
            }
        }
    }

    /// Builds the view for a `width`-column terminal along with the layout to
    /// draw it with.  Heatmaps too long for the width fall back to narrower
    /// cells, or to the month view if no cell size fits.
    fn fit_view(&mut self, width: u16) -> Result<(View, ResponsiveLayout), GridError> {
        let layout = ResponsiveLayout::for_width(width);
        self.mobile = layout.is_mobile;
        let view = self.build_view()?;
        let View::Year(hg) = &view else {
            return Ok((view, layout));
        };
        let layout = ResponsiveLayout::for_grid(width, hg.grid.rows().len());
        if layout.is_mobile {
            self.mobile = true;
            return Ok((self.build_view()?, layout));
        }
        Ok((view, layout))
    }

    fn title(&self, grid: &Grid) -> String {
        let total = grid.total();
        match grid.window() {
            Window::Year(year) => format!("{total} contributions in {year}"),
            Window::Rolling { end, days } if end == self.today => {
                format!("{total} contributions in the last {days} days")
            }
            Window::Rolling { end, days } => {
                format!("{total} contributions in the {days} days ending {end}")
            }
            Window::Month { year, month } => format!("{total} contributions in {month} {year}"),
        }
    }
}

impl<S: CountSource> Widget for &mut App<S> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let (view, layout) = match self.fit_view(area.width) {
            Ok(fitted) => fitted,
            Err(e) => {
                tracing::error!(%e, "failed to build calendar grid");
                Paragraph::new(e.to_string())
                    .style(ERROR_STYLE)
                    .alignment(Alignment::Center)
                    .render(area, buf);
                return;
            }
        };
        let [title_area, _, grid_area, _, status_area, clicked_area, _, hint_area] =
            Layout::vertical([1, 1, view.height(), 1, 1, 1, 1, 1])
                .flex(Flex::Center)
                .areas(area);
        centered_line(self.title(view.grid()), TITLE_STYLE).render(title_area, buf);
        match &view {
            View::Year(hg) => Heatmap::new(hg, self.palette, layout)
                .selected(self.selected)
                .render(grid_area, buf),
            View::Month(mg) => MonthView::new(mg, self.palette)
                .selected(self.selected)
                .render(grid_area, buf),
        }
        if let Some(cell) = view.get(self.selected) {
            centered_line(tooltip(&cell), STATUS_STYLE).render(status_area, buf);
        }
        if let Some(cell) = self.clicked {
            centered_line(format!("Selected: {}", tooltip(&cell)), STATUS_STYLE)
                .render(clicked_area, buf);
        }
        centered_line(
            format!("{} palette · ? for help", self.palette),
            STATUS_STYLE,
        )
        .render(hint_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum View {
    Year(HeatmapGrid),
    Month(MonthGrid),
}

impl View {
    fn grid(&self) -> &Grid {
        match self {
            View::Year(hg) => &hg.grid,
            View::Month(mg) => &mg.grid,
        }
    }

    fn get(&self, date: Date) -> Option<DayCell> {
        self.grid().get(date)
    }

    fn height(&self) -> u16 {
        match self {
            View::Year(_) => HEATMAP_HEIGHT,
            View::Month(mg) => MonthView::new(mg, Palette::default()).height(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Heatmap,
    Helping,
    Quitting,
}

fn default_selection(window: Window, today: Date) -> Date {
    if window.contains(today) {
        today
    } else {
        window.first_day().unwrap_or(today)
    }
}

fn tooltip(cell: &DayCell) -> String {
    let date = cell
        .date
        .format(TOOLTIP_FMT)
        .unwrap_or_else(|_| cell.date.to_string());
    if cell.count == 0 {
        format!("No contributions on {date}")
    } else {
        format!("{} contributions on {date}", cell.count)
    }
}

fn centered_line(s: String, style: Style) -> Paragraph<'static> {
    Paragraph::new(Line::from(s)).style(style).alignment(Alignment::Center)
}
