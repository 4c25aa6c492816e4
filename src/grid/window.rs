use super::util::{
    iter_days_from, last_day_of_month, sunday_on_or_before, DayCell, MonthExt, WeekRow,
    DAYS_IN_WEEK, WEEKDAY_NAMES,
};
use super::GridError;
use crate::source::CountSource;
use std::num::NonZeroU16;
use time::{Date, Duration, Month};

/// Length of the rolling "past year" window
pub(crate) const DEFAULT_WINDOW_DAYS: u16 = 365;

/// The period a grid is built for
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum Window {
    /// The last `days` days up to and including `end`
    Rolling { end: Date, days: NonZeroU16 },
    /// A civil year
    Year(i32),
    /// A civil month
    Month { year: i32, month: Month },
}

impl Window {
    pub(crate) fn rolling(end: Date, days: u16) -> Result<Window, GridError> {
        let days = NonZeroU16::new(days).ok_or(GridError::EmptyWindow)?;
        let window = Window::Rolling { end, days };
        window.first_day()?;
        Ok(window)
    }

    pub(crate) fn year(year: i32) -> Result<Window, GridError> {
        let window = Window::Year(year);
        window.first_day()?;
        window.last_day()?;
        Ok(window)
    }

    /// `month0` is zero-based: 0 is January and 11 is December.
    pub(crate) fn month(year: i32, month0: u8) -> Result<Window, GridError> {
        let month = month0
            .checked_add(1)
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(GridError::InvalidMonth { month: month0 })?;
        let window = Window::Month { year, month };
        window.first_day()?;
        Ok(window)
    }

    pub(crate) fn first_day(&self) -> Result<Date, GridError> {
        match *self {
            Window::Rolling { end, days } => end
                .checked_sub(Duration::days(i64::from(days.get()) - 1))
                .ok_or(GridError::OutOfRange),
            Window::Year(year) => Date::from_calendar_date(year, Month::January, 1)
                .map_err(|_| GridError::InvalidYear { year }),
            Window::Month { year, month } => {
                Date::from_calendar_date(year, month, 1).map_err(|_| GridError::InvalidYear { year })
            }
        }
    }

    pub(crate) fn last_day(&self) -> Result<Date, GridError> {
        match *self {
            Window::Rolling { end, .. } => Ok(end),
            Window::Year(year) => Date::from_calendar_date(year, Month::December, 31)
                .map_err(|_| GridError::InvalidYear { year }),
            Window::Month { .. } => self.first_day().map(last_day_of_month),
        }
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        match (self.first_day(), self.last_day()) {
            (Ok(first), Ok(last)) => (first..=last).contains(&date),
            _ => false,
        }
    }

    /// Returns the month window containing `date`
    pub(crate) fn month_of(date: Date) -> Window {
        Window::Month {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The window one period earlier, or `None` at the start of time
    pub(crate) fn previous(&self) -> Option<Window> {
        match *self {
            Window::Rolling { end, days } => {
                let end = end.checked_sub(Duration::days(days.get().into()))?;
                Window::rolling(end, days.get()).ok()
            }
            Window::Year(year) => Window::year(year.checked_sub(1)?).ok(),
            Window::Month { year, month } => {
                let year = if month == Month::January {
                    year.checked_sub(1)?
                } else {
                    year
                };
                let window = Window::Month {
                    year,
                    month: month.previous(),
                };
                window.first_day().ok().map(|_| window)
            }
        }
    }

    /// The window one period later, or `None` at the end of time
    pub(crate) fn next(&self) -> Option<Window> {
        match *self {
            Window::Rolling { end, days } => {
                let end = end.checked_add(Duration::days(days.get().into()))?;
                Window::rolling(end, days.get()).ok()
            }
            Window::Year(year) => Window::year(year.checked_add(1)?).ok(),
            Window::Month { year, month } => {
                let year = if month == Month::December {
                    year.checked_add(1)?
                } else {
                    year
                };
                let window = Window::Month {
                    year,
                    month: month.next(),
                };
                window.first_day().ok().map(|_| window)
            }
        }
    }

    /// Buckets the window into Sunday-aligned week rows.  Cells outside the
    /// window are kept as padding; cells after `now` never query `source`.
    pub(crate) fn build<S>(&self, now: Date, source: &S) -> Result<Grid, GridError>
    where
        S: CountSource + ?Sized,
    {
        let first = self.first_day()?;
        let last = self.last_day()?;
        let start = sunday_on_or_before(first).ok_or(GridError::OutOfRange)?;
        let span = usize::try_from((last - start).whole_days() + 1)
            .map_err(|_| GridError::OutOfRange)?;
        let row_qty = span.div_ceil(DAYS_IN_WEEK);
        let mut dates = iter_days_from(start);
        let mut rows = Vec::with_capacity(row_qty);
        for _ in 0..row_qty {
            let mut cells = [DayCell::padding(start); DAYS_IN_WEEK];
            for slot in &mut cells {
                let date = dates.next().ok_or(GridError::OutOfRange)?;
                *slot = if (first..=last).contains(&date) {
                    DayCell {
                        date,
                        count: if date > now {
                            0
                        } else {
                            source.clamped_count(date)
                        },
                        in_range: true,
                    }
                } else {
                    DayCell::padding(date)
                };
            }
            rows.push(WeekRow::new(cells));
        }
        tracing::debug!(window = ?self, rows = rows.len(), "built calendar grid");
        Ok(Grid {
            window: *self,
            rows,
        })
    }
}

/// A display string anchored to a row (month labels) or a column within
/// each row (weekday labels)
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Label {
    pub(crate) index: usize,
    pub(crate) name: &'static str,
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Grid {
    window: Window,
    rows: Vec<WeekRow>,
}

impl Grid {
    pub(crate) fn window(&self) -> Window {
        self.window
    }

    pub(crate) fn rows(&self) -> &[WeekRow] {
        &self.rows
    }

    pub(crate) fn cells(&self) -> impl Iterator<Item = &DayCell> {
        self.rows.iter().flat_map(WeekRow::cells)
    }

    /// Non-padding cells, oldest first
    pub(crate) fn days(&self) -> impl Iterator<Item = &DayCell> {
        self.cells().filter(|c| c.in_range)
    }

    /// Turns days outside `window` into padding
    pub(crate) fn clip_to(&mut self, window: &Window) {
        for row in &mut self.rows {
            row.clip(|date| window.contains(date));
        }
    }

    pub(crate) fn get(&self, date: Date) -> Option<DayCell> {
        self.days().find(|c| c.date == date).copied()
    }

    pub(crate) fn total(&self) -> u64 {
        self.days().map(|c| u64::from(c.count)).sum()
    }

    /// One label per row containing the first day of an in-range month
    pub(crate) fn month_labels(&self) -> Vec<Label> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(index, row)| {
                row.month_start().map(|m| Label {
                    index,
                    name: m.short_name(),
                })
            })
            .collect()
    }

    pub(crate) fn weekday_labels() -> [Label; DAYS_IN_WEEK] {
        std::array::from_fn(|index| Label {
            index,
            name: WEEKDAY_NAMES[index],
        })
    }
}

/// A year-mode or rolling-window grid with its month labels
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct HeatmapGrid {
    pub(crate) grid: Grid,
    pub(crate) month_labels: Vec<Label>,
}

impl HeatmapGrid {
    fn new(grid: Grid) -> Self {
        let month_labels = grid.month_labels();
        HeatmapGrid { grid, month_labels }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    pub(crate) grid: Grid,
    pub(crate) weekday_labels: [Label; DAYS_IN_WEEK],
}

pub(crate) fn build_year_grid<S>(
    anchor_year: i32,
    now: Date,
    source: &S,
) -> Result<HeatmapGrid, GridError>
where
    S: CountSource + ?Sized,
{
    Window::year(anchor_year)?
        .build(now, source)
        .map(HeatmapGrid::new)
}

/// `anchor_month0` is zero-based: 0 is January and 11 is December.
pub(crate) fn build_month_grid<S>(
    anchor_year: i32,
    anchor_month0: u8,
    now: Date,
    source: &S,
) -> Result<MonthGrid, GridError>
where
    S: CountSource + ?Sized,
{
    let grid = Window::month(anchor_year, anchor_month0)?.build(now, source)?;
    Ok(MonthGrid {
        grid,
        weekday_labels: Grid::weekday_labels(),
    })
}

/// The last `days` days ending at `now`
pub(crate) fn build_rolling_grid<S>(
    now: Date,
    days: u16,
    source: &S,
) -> Result<HeatmapGrid, GridError>
where
    S: CountSource + ?Sized,
{
    Window::rolling(now, days)?
        .build(now, source)
        .map(HeatmapGrid::new)
}
