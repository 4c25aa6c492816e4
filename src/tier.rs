use ratatui::style::{palette::tailwind, Color};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest display tier; counts at or above it share the darkest color
pub(crate) const MAX_TIER: u8 = 5;

const TIER_QTY: usize = MAX_TIER as usize + 1;

/// Maps a raw count onto `0..=max_tier`.  Thresholds are the integers
/// themselves: 0 is "none", 1 through `max_tier - 1` get their own tier, and
/// anything at or above `max_tier` is the top tier.
pub(crate) fn tier_for_count(count: u32, max_tier: u8) -> u8 {
    u8::try_from(count).unwrap_or(u8::MAX).min(max_tier)
}

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub(crate) enum Palette {
    #[default]
    Green,
    Emerald,
    Amber,
    Cyan,
    Fuchsia,
    Rose,
}

impl Palette {
    pub(crate) const ALL: [Palette; 6] = [
        Palette::Green,
        Palette::Emerald,
        Palette::Amber,
        Palette::Cyan,
        Palette::Fuchsia,
        Palette::Rose,
    ];

    /// Like `from_str()`, but unknown names fall back to the default palette
    pub(crate) fn named(name: &str) -> Palette {
        name.parse().unwrap_or_else(|e: ParsePaletteError| {
            tracing::warn!(%e, "using default palette");
            Palette::default()
        })
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Palette::Green => "green",
            Palette::Emerald => "emerald",
            Palette::Amber => "amber",
            Palette::Cyan => "cyan",
            Palette::Fuchsia => "fuchsia",
            Palette::Rose => "rose",
        }
    }

    /// The palette after this one, wrapping around
    pub(crate) fn cycle(self) -> Palette {
        let i = Palette::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Palette::ALL[(i + 1) % Palette::ALL.len()]
    }

    /// Tier colors from "none" to the top tier
    pub(crate) fn tier_colors(self) -> [Color; TIER_QTY] {
        let p = match self {
            Palette::Green => tailwind::GREEN,
            Palette::Emerald => tailwind::EMERALD,
            Palette::Amber => tailwind::AMBER,
            Palette::Cyan => tailwind::CYAN,
            Palette::Fuchsia => tailwind::FUCHSIA,
            Palette::Rose => tailwind::ROSE,
        };
        // Tier 0 is the darkest shade so that empty days recede
        [p.c950, p.c200, p.c400, p.c500, p.c600, p.c800]
    }

    pub(crate) fn tier_color(self, tier: u8) -> Color {
        let colors = self.tier_colors();
        colors[usize::from(tier).min(colors.len() - 1)]
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = ParsePaletteError;

    fn from_str(s: &str) -> Result<Palette, ParsePaletteError> {
        Palette::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePaletteError(s.to_owned()))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unknown color {0:?}; expected one of green, emerald, amber, cyan, fuchsia, rose")]
pub(crate) struct ParsePaletteError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        let tiers = (0..8).map(|c| tier_for_count(c, MAX_TIER)).collect::<Vec<_>>();
        assert_eq!(tiers, [0, 1, 2, 3, 4, 5, 5, 5]);
        assert_eq!(tier_for_count(u32::MAX, MAX_TIER), MAX_TIER);
        assert_eq!(tier_for_count(3, 2), 2);
    }

    #[test]
    fn test_tier_is_monotonic() {
        let mut prev = 0;
        for count in (0..1000).chain([u32::from(u8::MAX), 70_000, u32::MAX]) {
            let tier = tier_for_count(count, MAX_TIER);
            assert!(tier >= prev, "tier dropped at count {count}");
            prev = tier;
        }
    }

    #[test]
    fn test_parse_palette() {
        assert_eq!("amber".parse::<Palette>(), Ok(Palette::Amber));
        assert_eq!("Rose".parse::<Palette>(), Ok(Palette::Rose));
        assert_eq!(
            "purple".parse::<Palette>(),
            Err(ParsePaletteError(String::from("purple")))
        );
    }

    #[test]
    fn test_named_falls_back_to_default() {
        assert_eq!(Palette::named("cyan"), Palette::Cyan);
        assert_eq!(Palette::named("purple"), Palette::Green);
        assert_eq!(Palette::named(""), Palette::Green);
    }

    #[test]
    fn test_cycle_visits_every_palette() {
        let mut p = Palette::default();
        let mut seen = Vec::new();
        for _ in 0..Palette::ALL.len() {
            seen.push(p);
            p = p.cycle();
        }
        assert_eq!(seen, Palette::ALL);
        assert_eq!(p, Palette::default());
    }

    #[test]
    fn test_tier_color_clamps() {
        let colors = Palette::Amber.tier_colors();
        assert_eq!(Palette::Amber.tier_color(0), colors[0]);
        assert_eq!(Palette::Amber.tier_color(MAX_TIER), colors[5]);
        assert_eq!(Palette::Amber.tier_color(u8::MAX), colors[5]);
    }
}
