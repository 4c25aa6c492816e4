mod app;
mod grid;
mod help;
mod layout;
mod logging;
mod source;
mod theme;
mod tier;
use crate::app::App;
use crate::grid::{Window, DEFAULT_WINDOW_DAYS};
use crate::source::{seeded_rng, ContributionData, FIRST_YEAR};
use crate::tier::{Palette, MAX_TIER};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::path::PathBuf;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Month,
    OffsetDateTime,
};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Environment variable consulted for the palette when `--color` is not given
const COLOR_ENV: &str = "HEATMAP_COLOR";

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    year: Option<i32>,
    /// One-based, as typed on the command line
    month: Option<u8>,
    days: Option<u16>,
    palette: Option<Palette>,
    seed: Option<u64>,
    today: Option<Date>,
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('y') | Arg::Long("year") => opts.year = Some(parser.value()?.parse()?),
                Arg::Short('m') | Arg::Long("month") => {
                    opts.month = Some(parser.value()?.parse()?);
                }
                Arg::Short('d') | Arg::Long("days") => opts.days = Some(parser.value()?.parse()?),
                Arg::Short('c') | Arg::Long("color") => {
                    opts.palette = Some(parser.value()?.parse()?);
                }
                Arg::Short('s') | Arg::Long("seed") => opts.seed = Some(parser.value()?.parse()?),
                Arg::Long("today") => {
                    opts.today = Some(
                        parser
                            .value()?
                            .parse_with(|s| Date::parse(s, &YMD_FMT))?,
                    );
                }
                Arg::Long("log-file") => opts.log_file = Some(parser.value()?.into()),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = &opts.log_file {
                    logging::init(path)?;
                }
                let today = match opts.today {
                    Some(d) => d,
                    None => OffsetDateTime::now_local()
                        .context("failed to determine local date")?
                        .date(),
                };
                let window = opts.window(today)?;
                let palette = opts.palette.unwrap_or_else(|| {
                    std::env::var(COLOR_ENV)
                        .map(|name| Palette::named(&name))
                        .unwrap_or_default()
                });
                let mut rng = seeded_rng(opts.seed);
                let history = Date::from_calendar_date(FIRST_YEAR, Month::January, 1)
                    .map(|first| (today - first).whole_days() + 1)
                    .ok()
                    .and_then(|days| u16::try_from(days).ok())
                    .unwrap_or(DEFAULT_WINDOW_DAYS);
                let data = ContributionData::past_days(today, history, MAX_TIER.into(), &mut rng);
                tracing::info!(%today, ?window, %palette, days = data.len(), "starting heatmap");
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(data, today, window)
                        .palette(palette)
                        .rolling_days(opts.days.unwrap_or(DEFAULT_WINDOW_DAYS))
                        .run(terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: heatmap [OPTIONS]");
                println!();
                println!("Terminal contribution heatmap with year, month, and rolling-window views");
                println!();
                println!("Options:");
                println!("  -y, --year YEAR       Show a calendar year");
                println!("  -m, --month 1-12      Show one month (of --year, or of this year)");
                println!("  -d, --days N          Show the last N days [default: 365]");
                println!("  -c, --color NAME      Palette: green, emerald, amber, cyan, fuchsia, rose");
                println!("  -s, --seed N          Seed for the generated contribution data");
                println!("      --today YYYY-MM-DD");
                println!("                        Treat the given date as today");
                println!("      --log-file PATH   Append log messages to PATH");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    /// The initial window: a month if `--month` is given, else a year if
    /// `--year` is given, else the rolling window ending today
    fn window(&self, today: Date) -> anyhow::Result<Window> {
        let window = match (self.year, self.month) {
            (year, Some(month)) => {
                let month0 = month.wrapping_sub(1);
                Window::month(year.unwrap_or(today.year()), month0)
                    .with_context(|| format!("invalid --month {month}"))?
            }
            (Some(year), None) => {
                Window::year(year).with_context(|| format!("invalid --year {year}"))?
            }
            (None, None) => Window::rolling(today, self.days.unwrap_or(DEFAULT_WINDOW_DAYS))
                .context("invalid --days")?,
        };
        Ok(window)
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_args(args))
    }

    #[test]
    fn test_parse_options() {
        let cmd = parse(&["--year", "2024", "-c", "amber", "--seed", "7", "--today", "2025-06-15"])
            .unwrap();
        assert_eq!(
            cmd,
            Command::Run(RunOptions {
                year: Some(2024),
                palette: Some(Palette::Amber),
                seed: Some(7),
                today: Some(date!(2025 - 06 - 15)),
                ..RunOptions::default()
            })
        );
        assert_eq!(parse(&["-h"]).unwrap(), Command::Help);
        assert_eq!(parse(&["-V"]).unwrap(), Command::Version);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&["--color", "purple"]).is_err());
        assert!(parse(&["--today", "June 15"]).is_err());
        assert!(parse(&["2024"]).is_err());
    }

    #[test]
    fn test_initial_window() {
        let today = date!(2025 - 06 - 15);
        let opts = RunOptions::default();
        assert_eq!(
            opts.window(today).unwrap(),
            Window::rolling(today, 365).unwrap()
        );
        let opts = RunOptions {
            month: Some(2),
            ..RunOptions::default()
        };
        assert_eq!(opts.window(today).unwrap(), Window::month(2025, 1).unwrap());
        let opts = RunOptions {
            year: Some(2023),
            month: Some(12),
            ..RunOptions::default()
        };
        assert_eq!(opts.window(today).unwrap(), Window::month(2023, 11).unwrap());
        let opts = RunOptions {
            year: Some(2023),
            ..RunOptions::default()
        };
        assert_eq!(opts.window(today).unwrap(), Window::Year(2023));
    }

    #[test]
    fn test_invalid_window() {
        let today = date!(2025 - 06 - 15);
        for month in [0, 13] {
            let opts = RunOptions {
                month: Some(month),
                ..RunOptions::default()
            };
            assert!(opts.window(today).is_err(), "month {month} accepted");
        }
        let opts = RunOptions {
            days: Some(0),
            ..RunOptions::default()
        };
        assert!(opts.window(today).is_err());
    }
}
