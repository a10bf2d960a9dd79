use chrono::{Datelike, Months, NaiveDate};

/// One row of a month grid, Sunday first. `None` cells pad the month.
pub type Week = [Option<u32>; 7];

/// Column headers for a Sunday-first grid.
pub const WEEKDAY_SHORT: [&str; 7] = ["D", "S", "T", "Q", "Q", "S", "S"];

pub fn days_in_month(year: i32, month_index: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month_index.checked_add(1)?, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Lay out a month as whole weeks: leading blanks put day 1 under its
/// weekday, trailing blanks fill the last row to seven cells.
///
/// An invalid month yields no rows.
pub fn build_month_grid(year: i32, month_index: u32) -> Vec<Week> {
    let Some(total_days) = days_in_month(year, month_index) else {
        return Vec::new();
    };
    let first_day = month_index
        .checked_add(1)
        .and_then(|month| NaiveDate::from_ymd_opt(year, month, 1));
    let Some(first) = first_day else {
        return Vec::new();
    };

    let leading = first.weekday().num_days_from_sunday() as usize;
    let mut cells: Vec<Option<u32>> = Vec::with_capacity(42);
    cells.extend(std::iter::repeat_n(None, leading));
    cells.extend((1..=total_days).map(Some));
    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    cells
        .chunks(7)
        .map(|chunk| {
            let mut week: Week = [None; 7];
            week.copy_from_slice(chunk);
            week
        })
        .collect()
}

/// The twelve month indexes, for year views.
pub fn month_indexes() -> impl Iterator<Item = u32> {
    0..12
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_count(grid: &[Week]) -> usize {
        grid.iter().flatten().filter(|c| c.is_some()).count()
    }

    #[test]
    fn every_grid_is_whole_weeks() {
        for year in [2023, 2024, 2025, 2100] {
            for month in month_indexes() {
                let grid = build_month_grid(year, month);
                let cells: Vec<_> = grid.iter().flatten().collect();
                assert_eq!(cells.len() % 7, 0);
                assert_eq!(day_count(&grid) as u32, days_in_month(year, month).unwrap());
            }
        }
    }

    #[test]
    fn day_one_lands_on_its_weekday() {
        // 2025-01-01 is a Wednesday
        let grid = build_month_grid(2025, 0);
        assert_eq!(grid[0], [None, None, None, Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[4], [Some(26), Some(27), Some(28), Some(29), Some(30), Some(31), None]);
    }

    #[test]
    fn sunday_start_needs_no_padding() {
        // 2026-02-01 is a Sunday and 2026 is not a leap year
        let grid = build_month_grid(2026, 1);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], Some(1));
        assert_eq!(grid[3][6], Some(28));
    }

    #[test]
    fn leap_february() {
        assert_eq!(days_in_month(2024, 1), Some(29));
        assert_eq!(days_in_month(2025, 1), Some(28));
        assert_eq!(days_in_month(2025, 11), Some(31));
    }

    #[test]
    fn invalid_month_is_empty() {
        assert!(build_month_grid(2025, 12).is_empty());
        assert_eq!(days_in_month(2025, 12), None);
        assert!(build_month_grid(2025, u32::MAX).is_empty());
        assert_eq!(days_in_month(2025, u32::MAX), None);
    }
}
