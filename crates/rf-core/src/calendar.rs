//! Hour to period mapping.
//!
//! Periods are days of 24 hours, weeks of 168 hours, calendar months of a
//! 365-day year and a single annual period. The last day/week of a year may
//! be partial.

use crate::category::Precision;

pub const HOURS_PER_DAY: usize = 24;
pub const HOURS_PER_WEEK: usize = 168;
pub const DEFAULT_HOURS_IN_YEAR: usize = 8760;

const DAYS_PER_MONTH: [usize; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Calendar {
    hours_in_year: usize,
    /// Exclusive end hour of every month.
    month_ends: [usize; 12],
}

impl Calendar {
    pub fn new(hours_in_year: usize) -> Self {
        let mut month_ends = [0; 12];
        let mut end = 0;
        for (slot, days) in month_ends.iter_mut().zip(DAYS_PER_MONTH) {
            end += days * HOURS_PER_DAY;
            *slot = end;
        }
        Self {
            hours_in_year,
            month_ends,
        }
    }

    pub fn hours_in_year(&self) -> usize {
        self.hours_in_year
    }

    /// Number of periods of a single-bit precision; 0 for other masks.
    pub fn period_count(&self, precision: Precision) -> usize {
        let hours = self.hours_in_year;
        match precision {
            Precision::HOURLY => hours,
            Precision::DAILY => hours.div_ceil(HOURS_PER_DAY),
            Precision::WEEKLY => hours.div_ceil(HOURS_PER_WEEK),
            Precision::MONTHLY => {
                if hours == 0 {
                    0
                } else {
                    self.month_of(hours - 1) + 1
                }
            }
            Precision::ANNUAL => 1,
            _ => 0,
        }
    }

    /// Period index of `hour` for a single-bit precision; 0 for other masks.
    pub fn period_of(&self, precision: Precision, hour: usize) -> usize {
        match precision {
            Precision::HOURLY => hour,
            Precision::DAILY => hour / HOURS_PER_DAY,
            Precision::WEEKLY => hour / HOURS_PER_WEEK,
            Precision::MONTHLY => self.month_of(hour),
            _ => 0,
        }
    }

    fn month_of(&self, hour: usize) -> usize {
        self.month_ends
            .iter()
            .position(|&end| hour < end)
            .unwrap_or(self.month_ends.len() - 1)
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(DEFAULT_HOURS_IN_YEAR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_year_period_counts() {
        let cal = Calendar::default();
        assert_eq!(cal.period_count(Precision::HOURLY), 8760);
        assert_eq!(cal.period_count(Precision::DAILY), 365);
        assert_eq!(cal.period_count(Precision::WEEKLY), 53);
        assert_eq!(cal.period_count(Precision::MONTHLY), 12);
        assert_eq!(cal.period_count(Precision::ANNUAL), 1);
        assert_eq!(cal.period_count(Precision::ALL), 0);
    }

    #[test]
    fn short_year_period_counts() {
        let cal = Calendar::new(48);
        assert_eq!(cal.period_count(Precision::DAILY), 2);
        assert_eq!(cal.period_count(Precision::WEEKLY), 1);
        assert_eq!(cal.period_count(Precision::MONTHLY), 1);
    }

    #[test]
    fn period_of_boundaries() {
        let cal = Calendar::default();
        assert_eq!(cal.period_of(Precision::DAILY, 23), 0);
        assert_eq!(cal.period_of(Precision::DAILY, 24), 1);
        assert_eq!(cal.period_of(Precision::WEEKLY, 168), 1);
        assert_eq!(cal.period_of(Precision::MONTHLY, 31 * 24 - 1), 0);
        assert_eq!(cal.period_of(Precision::MONTHLY, 31 * 24), 1);
        assert_eq!(cal.period_of(Precision::MONTHLY, 8759), 11);
        assert_eq!(cal.period_of(Precision::ANNUAL, 4000), 0);
    }

    proptest::proptest! {
        #[test]
        fn every_hour_falls_in_a_counted_period(hours in 1usize..=8760, seed in 0usize..8760) {
            let cal = Calendar::new(hours);
            let hour = seed % hours;
            for precision in Precision::ALL.levels() {
                let period = cal.period_of(precision, hour);
                proptest::prop_assert!(period < cal.period_count(precision));
            }
        }
    }
}
