/// Cell sizing for the current terminal width, in columns
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ResponsiveLayout {
    pub(crate) cell_width: u16,
    pub(crate) cell_gap: u16,
    /// Too narrow for a year of weeks; show a single month instead
    pub(crate) is_mobile: bool,
}

/// Columns left of the first week, used for the row labels
pub(crate) const ROW_LABEL_WIDTH: u16 = 4;

const MOBILE: ResponsiveLayout = ResponsiveLayout {
    cell_width: 1,
    cell_gap: 0,
    is_mobile: true,
};

const COMPACT: ResponsiveLayout = ResponsiveLayout {
    cell_width: 1,
    cell_gap: 0,
    is_mobile: false,
};

const SPACED: ResponsiveLayout = ResponsiveLayout {
    cell_width: 1,
    cell_gap: 1,
    is_mobile: false,
};

const WIDE: ResponsiveLayout = ResponsiveLayout {
    cell_width: 2,
    cell_gap: 1,
    is_mobile: false,
};

/// `(width below which the layout applies, layout)`, narrowest first.  Each
/// width is the first at which the next entry's 53-week grid fits.
static BREAKPOINTS: [(u16, ResponsiveLayout); 3] = [(58, MOBILE), (110, COMPACT), (163, SPACED)];

/// Non-mobile layouts, widest first
static FALLBACKS: [ResponsiveLayout; 3] = [WIDE, SPACED, COMPACT];

impl ResponsiveLayout {
    pub(crate) fn for_width(width: u16) -> ResponsiveLayout {
        BREAKPOINTS
            .iter()
            .find(|&&(below, _)| width < below)
            .map_or(WIDE, |&(_, layout)| layout)
    }

    /// Like `for_width()`, but narrows the cells until `weeks` week columns
    /// and the row labels fit in `width`, going mobile if nothing fits
    pub(crate) fn for_grid(width: u16, weeks: usize) -> ResponsiveLayout {
        let start = ResponsiveLayout::for_width(width);
        if start.is_mobile {
            return start;
        }
        FALLBACKS
            .into_iter()
            .skip_while(|&layout| layout != start)
            .find(|layout| ROW_LABEL_WIDTH.saturating_add(layout.grid_width(weeks)) <= width)
            .unwrap_or(MOBILE)
    }

    /// Columns taken by `weeks` week columns
    pub(crate) fn grid_width(&self, weeks: usize) -> u16 {
        let weeks = u16::try_from(weeks).unwrap_or(u16::MAX);
        weeks
            .saturating_mul(self.cell_width + self.cell_gap)
            .saturating_sub(self.cell_gap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breakpoints() {
        let narrow = ResponsiveLayout::for_width(40);
        assert!(narrow.is_mobile);
        assert_eq!((narrow.cell_width, narrow.cell_gap), (1, 0));
        let compact = ResponsiveLayout::for_width(58);
        assert!(!compact.is_mobile);
        assert_eq!((compact.cell_width, compact.cell_gap), (1, 0));
        assert_eq!(ResponsiveLayout::for_width(109), compact);
        let spaced = ResponsiveLayout::for_width(110);
        assert_eq!((spaced.cell_width, spaced.cell_gap), (1, 1));
        assert_eq!(ResponsiveLayout::for_width(162), spaced);
        assert_eq!(ResponsiveLayout::for_width(163), WIDE);
        assert_eq!(ResponsiveLayout::for_width(u16::MAX), WIDE);
    }

    #[test]
    fn test_grid_width() {
        assert_eq!(ResponsiveLayout::for_width(80).grid_width(53), 53);
        assert_eq!(ResponsiveLayout::for_width(120).grid_width(53), 105);
        assert_eq!(WIDE.grid_width(53), 158);
        assert_eq!(WIDE.grid_width(0), 0);
    }

    #[test]
    fn test_for_grid_keeps_fitting_layout() {
        for width in [40, 58, 110, 163, 200] {
            assert_eq!(
                ResponsiveLayout::for_grid(width, 53),
                ResponsiveLayout::for_width(width),
                "width {width}"
            );
        }
    }

    #[test]
    fn test_for_grid_narrows_long_grids() {
        // 54 weeks need 4 + 107 columns when spaced and 4 + 161 when wide
        assert_eq!(ResponsiveLayout::for_grid(110, 54), COMPACT);
        assert_eq!(ResponsiveLayout::for_grid(111, 54), SPACED);
        assert_eq!(ResponsiveLayout::for_grid(163, 54), SPACED);
        assert_eq!(ResponsiveLayout::for_grid(165, 54), WIDE);
        // Two years of weeks only fit compact
        assert_eq!(ResponsiveLayout::for_grid(163, 105), COMPACT);
        assert_eq!(ResponsiveLayout::for_grid(100, 105), MOBILE);
        assert_eq!(ResponsiveLayout::for_grid(58, 54), COMPACT);
        assert_eq!(ResponsiveLayout::for_grid(57, 54), MOBILE);
    }
}
