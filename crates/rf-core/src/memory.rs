//! Memory and disk estimates.

use crate::calendar::Calendar;
use crate::study::{SimulationMode, StudyContext};

/// Bytes written per cell of a year-by-year output series.
pub const DISK_BYTES_PER_CELL: u64 = 13;
/// Bytes written per cell of an ID series.
pub const DISK_BYTES_PER_ID_CELL: u64 = 5;
/// In-memory bookkeeping for one pending disk output series.
pub const DISK_OUTPUT_BOOKKEEPING_BYTES: u64 = 64;

/// Accumulator for memory and disk estimates, filled by additive folds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryUsage {
    pub mode: SimulationMode,
    pub years: u32,
    pub year_by_year: bool,
    pub hours_in_year: usize,
    pub parallel_spaces: usize,
    /// Set while only sizing inputs; output-related costs are skipped.
    pub gathering_information_for_input: bool,
    pub required_memory: u64,
    pub required_disk_space: u64,
    pub disk_timeseries: u64,
}

impl MemoryUsage {
    pub fn for_study(study: &StudyContext) -> Self {
        Self {
            mode: study.mode,
            years: study.nb_years,
            year_by_year: study.year_by_year,
            hours_in_year: study.hours_in_year,
            parallel_spaces: study.parallel_spaces,
            gathering_information_for_input: false,
            required_memory: 0,
            required_disk_space: 0,
            disk_timeseries: 0,
        }
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.hours_in_year)
    }

    pub fn add_memory(&mut self, bytes: u64) {
        self.required_memory += bytes;
    }

    /// Year-by-year files will be written for this estimate.
    pub fn year_by_year_output_expected(&self) -> bool {
        !self.gathering_information_for_input && self.year_by_year && !self.mode.is_draft()
    }

    pub fn take_into_consideration_a_new_timeseries_for_disk_output(&mut self, with_ids: bool) {
        let per_cell = if with_ids {
            DISK_BYTES_PER_ID_CELL
        } else {
            DISK_BYTES_PER_CELL
        };
        self.disk_timeseries += 1;
        self.required_disk_space += per_cell * self.hours_in_year as u64;
        self.required_memory += DISK_OUTPUT_BOOKKEEPING_BYTES;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_output_accounting() {
        let mut study = StudyContext::new(10, 3);
        study.year_by_year = true;
        let mut u = MemoryUsage::for_study(&study);
        assert!(u.year_by_year_output_expected());

        u.take_into_consideration_a_new_timeseries_for_disk_output(false);
        u.take_into_consideration_a_new_timeseries_for_disk_output(true);
        assert_eq!(u.disk_timeseries, 2);
        assert_eq!(u.required_disk_space, 130 + 50);
        assert_eq!(u.required_memory, 2 * DISK_OUTPUT_BOOKKEEPING_BYTES);
    }

    #[test]
    fn draft_mode_writes_no_year_by_year() {
        let mut study = StudyContext::new(10, 3);
        study.year_by_year = true;
        study.mode = SimulationMode::AdequacyDraft;
        assert!(!MemoryUsage::for_study(&study).year_by_year_output_expected());

        study.mode = SimulationMode::Adequacy;
        let mut u = MemoryUsage::for_study(&study);
        u.gathering_information_for_input = true;
        assert!(!u.year_by_year_output_expected());
    }
}
