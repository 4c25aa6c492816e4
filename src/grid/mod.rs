mod util;
mod widget;
mod window;
pub(crate) use self::util::DayCell;
#[cfg(test)]
pub(crate) use self::util::WeekdayExt;
pub(crate) use self::widget::{Heatmap, MonthView, HEATMAP_HEIGHT};
pub(crate) use self::window::{
    build_month_grid, build_rolling_grid, build_year_grid, Grid, HeatmapGrid, MonthGrid, Window,
    DEFAULT_WINDOW_DAYS,
};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum GridError {
    #[error("month index {month} is out of range (expected 0-11)")]
    InvalidMonth { month: u8 },
    #[error("year {year} is outside the supported calendar")]
    InvalidYear { year: i32 },
    #[error("rolling window must cover at least one day")]
    EmptyWindow,
    #[error("grid extends beyond the supported calendar")]
    OutOfRange,
}
