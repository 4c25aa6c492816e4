use crate::tier::MAX_TIER;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::HashMap;
use time::{Date, Duration};

/// First year offered by the year picker
pub(crate) const FIRST_YEAR: i32 = 2020;

/// Supplies the activity count for a day.  `None` means there is no data for
/// that day, which is displayed the same as a count of zero.
pub(crate) trait CountSource {
    fn count(&self, date: Date) -> Option<i64>;

    /// The count for `date`, clamped to the tier range `0..=MAX_TIER`
    fn clamped_count(&self, date: Date) -> u32 {
        let max = i64::from(MAX_TIER);
        let n = self.count(date).unwrap_or(0);
        if !(0..=max).contains(&n) {
            tracing::debug!(%date, count = n, "count clamped to tier range");
        }
        u32::try_from(n.clamp(0, max)).unwrap_or(0)
    }
}

impl<F> CountSource for F
where
    F: Fn(Date) -> Option<i64>,
{
    fn count(&self, date: Date) -> Option<i64> {
        self(date)
    }
}

/// Per-day counts keyed by date
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct ContributionData {
    counts: HashMap<Date, u32>,
}

impl ContributionData {
    /// Random counts in `0..=max_count` for every day from `first` through
    /// `last`
    pub(crate) fn generate<R: Rng + ?Sized>(
        first: Date,
        last: Date,
        max_count: u32,
        rng: &mut R,
    ) -> ContributionData {
        let mut counts = HashMap::new();
        let mut date = Some(first);
        while let Some(d) = date.filter(|&d| d <= last) {
            counts.insert(d, rng.random_range(0..=max_count));
            date = d.next_day();
        }
        tracing::debug!(%first, %last, days = counts.len(), "generated mock contributions");
        ContributionData { counts }
    }

    /// Random counts for the `days` days ending with `today`
    pub(crate) fn past_days<R: Rng + ?Sized>(
        today: Date,
        days: u16,
        max_count: u32,
        rng: &mut R,
    ) -> ContributionData {
        let Some(span) = days.checked_sub(1) else {
            return ContributionData::default();
        };
        let first = today
            .checked_sub(Duration::days(span.into()))
            .unwrap_or(Date::MIN);
        ContributionData::generate(first, today, max_count, rng)
    }

    pub(crate) fn get(&self, date: Date) -> Option<u32> {
        self.counts.get(&date).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.counts.len()
    }
}

impl FromIterator<(Date, u32)> for ContributionData {
    fn from_iter<I: IntoIterator<Item = (Date, u32)>>(iter: I) -> Self {
        ContributionData {
            counts: iter.into_iter().collect(),
        }
    }
}

impl CountSource for HashMap<Date, i64> {
    fn count(&self, date: Date) -> Option<i64> {
        self.get(&date).copied()
    }
}

impl CountSource for ContributionData {
    fn count(&self, date: Date) -> Option<i64> {
        self.get(date).map(i64::from)
    }
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// The years the year picker offers, newest first
pub(crate) fn valid_years(today: Date) -> Vec<i32> {
    (FIRST_YEAR..=today.year().max(FIRST_YEAR)).rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_clamped_count() {
        let source = |date: Date| match date.day() {
            1 => Some(-1),
            2 => Some(7),
            3 => Some(i64::from(u32::MAX) + 1),
            4 => Some(4),
            _ => None,
        };
        assert_eq!(source.clamped_count(date!(2024 - 05 - 01)), 0);
        assert_eq!(source.clamped_count(date!(2024 - 05 - 02)), 5);
        assert_eq!(source.clamped_count(date!(2024 - 05 - 03)), 5);
        assert_eq!(source.clamped_count(date!(2024 - 05 - 04)), 4);
        assert_eq!(source.clamped_count(date!(2024 - 05 - 05)), 0);
    }

    #[test]
    fn test_past_days() {
        let today = date!(2025 - 06 - 15);
        let data = ContributionData::past_days(today, 365, 4, &mut seeded_rng(Some(42)));
        assert_eq!(data.len(), 365);
        let mut date = date!(2024 - 06 - 16);
        while date <= today {
            assert!(data.get(date).is_some_and(|c| c <= 4), "bad entry for {date}");
            date = date.next_day().unwrap();
        }
        assert_eq!(data.get(date!(2024 - 06 - 15)), None);
    }

    #[test]
    fn test_past_zero_days() {
        let data = ContributionData::past_days(date!(2025 - 06 - 15), 0, 4, &mut seeded_rng(None));
        assert_eq!(data.len(), 0);
    }

    #[test]
    fn test_same_seed_same_data() {
        let first = date!(2024 - 01 - 01);
        let last = date!(2024 - 12 - 31);
        let a = ContributionData::generate(first, last, 5, &mut seeded_rng(Some(7)));
        let b = ContributionData::generate(first, last, 5, &mut seeded_rng(Some(7)));
        assert_eq!(a, b);
        assert_eq!(a.len(), 366);
    }

    #[test]
    fn test_lookup_as_source() {
        let data = [(date!(2024 - 03 - 01), 3), (date!(2024 - 03 - 02), 0)]
            .into_iter()
            .collect::<ContributionData>();
        assert_eq!(data.count(date!(2024 - 03 - 01)), Some(3));
        assert_eq!(data.count(date!(2024 - 03 - 02)), Some(0));
        assert_eq!(data.count(date!(2024 - 03 - 03)), None);
        assert_eq!(data.clamped_count(date!(2024 - 03 - 03)), 0);
    }

    #[test]
    fn test_raw_map_as_source() {
        let map = HashMap::from([(date!(2024 - 03 - 01), -2), (date!(2024 - 03 - 02), 9)]);
        assert_eq!(map.clamped_count(date!(2024 - 03 - 01)), 0);
        assert_eq!(map.clamped_count(date!(2024 - 03 - 02)), 5);
        assert_eq!(map.count(date!(2024 - 03 - 03)), None);
    }

    #[test]
    fn test_valid_years() {
        assert_eq!(
            valid_years(date!(2025 - 06 - 15)),
            [2025, 2024, 2023, 2022, 2021, 2020]
        );
        assert_eq!(valid_years(date!(2019 - 06 - 15)), [2020]);
    }
}
