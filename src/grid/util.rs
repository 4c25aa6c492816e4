use crate::tier::{tier_for_count, MAX_TIER};
use std::iter::successors;
use std::ops::Index;
use time::{Date, Duration, Month, Weekday};

pub(crate) const DAYS_IN_WEEK: usize = 7;

pub(crate) static WEEKDAY_NAMES: [&str; DAYS_IN_WEEK] =
    ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub(crate) trait WeekdayExt {
    fn index0(&self) -> usize;
}

impl WeekdayExt for Weekday {
    fn index0(&self) -> usize {
        self.number_days_from_sunday().into()
    }
}

pub(crate) trait MonthExt {
    fn short_name(&self) -> &'static str;
}

impl MonthExt for Month {
    fn short_name(&self) -> &'static str {
        match self {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) count: u32,
    /// `false` for padding cells that only keep the week row rectangular
    pub(crate) in_range: bool,
}

impl DayCell {
    pub(crate) fn padding(date: Date) -> DayCell {
        DayCell {
            date,
            count: 0,
            in_range: false,
        }
    }

    pub(crate) fn tier(&self) -> u8 {
        tier_for_count(self.count, MAX_TIER)
    }

    pub(super) fn is_month_start(&self) -> bool {
        self.in_range && self.date.day() == 1
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
// Invariant: cells are consecutive days starting on a Sunday
pub(crate) struct WeekRow([DayCell; DAYS_IN_WEEK]);

impl WeekRow {
    pub(super) fn new(cells: [DayCell; DAYS_IN_WEEK]) -> Self {
        debug_assert_eq!(
            cells[0].date.weekday(),
            Weekday::Sunday,
            "week rows start on Sunday"
        );
        WeekRow(cells)
    }

    pub(crate) fn cells(&self) -> &[DayCell; DAYS_IN_WEEK] {
        &self.0
    }

    pub(crate) fn in_range_cells(&self) -> impl Iterator<Item = &DayCell> {
        self.0.iter().filter(|c| c.in_range)
    }

    /// Turns the in-range days that `keep` rejects into padding
    pub(super) fn clip<F: Fn(Date) -> bool>(&mut self, keep: F) {
        for cell in &mut self.0 {
            if cell.in_range && !keep(cell.date) {
                *cell = DayCell::padding(cell.date);
            }
        }
    }

    /// The month whose first day falls in this week, if any
    pub(crate) fn month_start(&self) -> Option<Month> {
        self.0
            .iter()
            .find(|c| c.is_month_start())
            .map(|c| c.date.month())
    }
}

impl Index<Weekday> for WeekRow {
    type Output = DayCell;

    fn index(&self, wd: Weekday) -> &DayCell {
        &self.0[wd.index0()]
    }
}

pub(super) fn sunday_on_or_before(date: Date) -> Option<Date> {
    date.checked_sub(Duration::days(date.weekday().number_days_from_sunday().into()))
}

pub(super) fn iter_days_from(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day())
}

pub(super) fn last_day_of_month(date: Date) -> Date {
    date.replace_day(date.month().length(date.year()))
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Weekday::*;

    #[test]
    fn test_sunday_on_or_before() {
        assert_eq!(
            sunday_on_or_before(date!(2023 - 11 - 16)),
            Some(date!(2023 - 11 - 12))
        );
        assert_eq!(
            sunday_on_or_before(date!(2023 - 11 - 12)),
            Some(date!(2023 - 11 - 12))
        );
        assert_eq!(
            sunday_on_or_before(date!(2024 - 01 - 01)),
            Some(date!(2023 - 12 - 31))
        );
    }

    #[test]
    fn test_last_day_of_month() {
        assert_eq!(last_day_of_month(date!(2024 - 02 - 01)), date!(2024 - 02 - 29));
        assert_eq!(last_day_of_month(date!(2023 - 02 - 01)), date!(2023 - 02 - 28));
        assert_eq!(last_day_of_month(date!(2023 - 12 - 01)), date!(2023 - 12 - 31));
        assert_eq!(last_day_of_month(date!(2024 - 04 - 17)), date!(2024 - 04 - 30));
    }

    #[test]
    fn test_week_row_index() {
        let start = date!(2023 - 11 - 12);
        let mut cells = [DayCell::padding(start); DAYS_IN_WEEK];
        for (slot, d) in cells.iter_mut().zip(iter_days_from(start)) {
            *slot = DayCell {
                date: d,
                count: 1,
                in_range: d.day() >= 15,
            };
        }
        let row = WeekRow::new(cells);
        assert_eq!(row[Sunday].date, date!(2023 - 11 - 12));
        assert_eq!(row[Thursday].date, date!(2023 - 11 - 16));
        assert_eq!(row[Saturday].date, date!(2023 - 11 - 18));
        assert_eq!(row.in_range_cells().count(), 4);
        assert_eq!(row.month_start(), None);
    }

    #[test]
    fn test_month_start_ignores_padding() {
        let start = date!(2024 - 03 - 31);
        let mut cells = [DayCell::padding(start); DAYS_IN_WEEK];
        for (slot, d) in cells.iter_mut().zip(iter_days_from(start)) {
            *slot = DayCell::padding(d);
        }
        assert_eq!(WeekRow::new(cells).month_start(), None);
        cells[1].in_range = true;
        assert_eq!(WeekRow::new(cells).month_start(), Some(Month::April));
    }
}
