//! Per-variable result storage.
//!
//! Every column of a variable holds:
//! - one [`IntermediateValues`] per parallel space: the hourly series of the
//!   year being simulated in that space and its period folds
//! - one [`YearStatistics`] per precision level: statistics over the years
//!   merged so far, one row per period

use std::mem::size_of;

use rf_core::{Calendar, Precision};
use rf_matrix::Matrix;

use crate::card::{ResultKind, TimeAggregate};

const LEVELS: usize = Precision::LEVELS.len();

/// Values of the current year in one space.
#[derive(Clone, Debug)]
pub struct IntermediateValues {
    hourly: Vec<f64>,
    /// Period folds by level index; the hourly slot stays empty.
    periods: [Vec<f64>; LEVELS],
}

impl IntermediateValues {
    pub fn new(calendar: &Calendar) -> Self {
        Self {
            hourly: vec![0.0; calendar.hours_in_year()],
            periods: std::array::from_fn(|i| match Precision::LEVELS[i] {
                Precision::HOURLY => Vec::new(),
                level => vec![0.0; calendar.period_count(level)],
            }),
        }
    }

    pub fn reset(&mut self) {
        self.hourly.fill(0.0);
        for values in &mut self.periods {
            values.fill(0.0);
        }
    }

    pub fn hourly(&self) -> &[f64] {
        &self.hourly
    }

    /// Out-of-range hours are ignored.
    pub fn set_hour(&mut self, hour: usize, value: f64) {
        if let Some(slot) = self.hourly.get_mut(hour) {
            *slot = value;
        }
    }

    pub fn add_hour(&mut self, hour: usize, value: f64) {
        if let Some(slot) = self.hourly.get_mut(hour) {
            *slot += value;
        }
    }

    pub fn set_hourly(&mut self, values: &[f64]) {
        let n = values.len().min(self.hourly.len());
        self.hourly[..n].copy_from_slice(&values[..n]);
    }

    /// Fold the hourly series into every coarser period.
    pub fn compute_periods(&mut self, calendar: &Calendar, aggregate: TimeAggregate) {
        for (level, sums) in Precision::LEVELS.iter().zip(self.periods.iter_mut()) {
            if *level == Precision::HOURLY {
                continue;
            }
            let mut counts = vec![0usize; sums.len()];
            sums.fill(0.0);
            for (hour, value) in self.hourly.iter().enumerate() {
                let p = calendar.period_of(*level, hour);
                if let Some(sum) = sums.get_mut(p) {
                    *sum += value;
                    counts[p] += 1;
                }
            }
            if aggregate == TimeAggregate::Average {
                for (sum, count) in sums.iter_mut().zip(counts) {
                    if count > 0 {
                        *sum /= count as f64;
                    }
                }
            }
        }
    }

    /// Values of a single-bit precision; empty for other masks.
    pub fn period_values(&self, level: Precision) -> &[f64] {
        match level.level_index() {
            Some(0) => &self.hourly,
            Some(i) => &self.periods[i],
            None => &[],
        }
    }

    pub fn estimate_memory_usage(calendar: &Calendar) -> u64 {
        let cells: usize = Precision::LEVELS
            .iter()
            .map(|&level| calendar.period_count(level))
            .sum();
        (size_of::<Self>() + cells * size_of::<f64>()) as u64
    }

    pub fn memory_usage(&self) -> u64 {
        let cells = self.hourly.capacity() + self.periods.iter().map(Vec::capacity).sum::<usize>();
        (size_of::<Self>() + cells * size_of::<f64>()) as u64
    }
}

const SUM: usize = 0;
const SUM_SQ: usize = 1;
const MIN: usize = 2;
const MAX: usize = 3;

/// Statistics over years, one row per period.
#[derive(Clone, Debug)]
pub struct YearStatistics {
    acc: Matrix<f64>,
    years: u32,
}

impl YearStatistics {
    pub fn new(periods: usize) -> Self {
        Self {
            acc: Matrix::with_size(periods, 4),
            years: 0,
        }
    }

    pub fn periods(&self) -> usize {
        self.acc.rows()
    }

    pub fn years(&self) -> u32 {
        self.years
    }

    /// Account for one more year.
    pub fn merge(&mut self, values: &[f64]) {
        let first = self.years == 0;
        for (p, &v) in values.iter().enumerate().take(self.acc.rows()) {
            self.acc[(p, SUM)] += v;
            self.acc[(p, SUM_SQ)] += v * v;
            if first {
                self.acc[(p, MIN)] = v;
                self.acc[(p, MAX)] = v;
            } else {
                self.acc[(p, MIN)] = self.acc[(p, MIN)].min(v);
                self.acc[(p, MAX)] = self.acc[(p, MAX)].max(v);
            }
        }
        self.years += 1;
    }

    pub fn average(&self, period: usize) -> f64 {
        if self.years == 0 {
            return 0.0;
        }
        self.acc[(period, SUM)] / f64::from(self.years)
    }

    pub fn std_deviation(&self, period: usize) -> f64 {
        if self.years == 0 {
            return 0.0;
        }
        let n = f64::from(self.years);
        let mean = self.acc[(period, SUM)] / n;
        (self.acc[(period, SUM_SQ)] / n - mean * mean).max(0.0).sqrt()
    }

    /// Statistics of one period in `kind` order.
    pub fn row(&self, period: usize, kind: ResultKind) -> Vec<f64> {
        if period >= self.periods() {
            return vec![0.0; kind.count() as usize];
        }
        match kind {
            ResultKind::AverageOnly => vec![self.average(period)],
            ResultKind::AvgStdMinMax => vec![
                self.average(period),
                self.std_deviation(period),
                self.acc[(period, MIN)],
                self.acc[(period, MAX)],
            ],
        }
    }

    /// `periods x kind.count()` report matrix.
    pub fn report(&self, kind: ResultKind) -> Matrix<f64> {
        let width = kind.count() as usize;
        let mut out = Matrix::with_size(self.periods(), width);
        for p in 0..self.periods() {
            for (c, v) in self.row(p, kind).into_iter().enumerate() {
                out[(p, c)] = v;
            }
        }
        out
    }

    pub fn estimate_memory_usage(periods: usize) -> u64 {
        Matrix::<f64>::estimate_memory_usage(periods, 4)
    }

    pub fn memory_usage(&self) -> u64 {
        self.acc.memory_usage()
    }
}

/// Results of one column of a variable.
#[derive(Clone, Debug)]
pub struct ColumnResults {
    pub label: String,
    spaces: Vec<IntermediateValues>,
    stats: [YearStatistics; LEVELS],
}

impl ColumnResults {
    pub fn new(label: impl Into<String>, calendar: &Calendar, spaces: usize) -> Self {
        Self {
            label: label.into(),
            spaces: (0..spaces).map(|_| IntermediateValues::new(calendar)).collect(),
            stats: std::array::from_fn(|i| {
                YearStatistics::new(calendar.period_count(Precision::LEVELS[i]))
            }),
        }
    }

    pub fn space(&self, space: usize) -> Option<&IntermediateValues> {
        self.spaces.get(space)
    }

    pub fn space_mut(&mut self, space: usize) -> Option<&mut IntermediateValues> {
        self.spaces.get_mut(space)
    }

    /// Statistics of a single-bit precision.
    pub fn stats(&self, level: Precision) -> Option<&YearStatistics> {
        level.level_index().map(|i| &self.stats[i])
    }

    fn year_end(&mut self, space: usize, calendar: &Calendar, aggregate: TimeAggregate) {
        let Some(values) = self.spaces.get_mut(space) else {
            return;
        };
        values.compute_periods(calendar, aggregate);
        for (level, stats) in Precision::LEVELS.iter().zip(self.stats.iter_mut()) {
            stats.merge(values.period_values(*level));
        }
    }

    fn memory_usage(&self) -> u64 {
        self.spaces.iter().map(IntermediateValues::memory_usage).sum::<u64>()
            + self.stats.iter().map(YearStatistics::memory_usage).sum::<u64>()
    }
}

/// All columns of a variable.
#[derive(Clone, Debug, Default)]
pub struct VariableResults {
    calendar: Calendar,
    parallel_spaces: usize,
    columns: Vec<ColumnResults>,
}

impl VariableResults {
    /// Allocate one column per label.
    pub fn initialize<S: Into<String>>(
        &mut self,
        calendar: Calendar,
        parallel_spaces: usize,
        labels: impl IntoIterator<Item = S>,
    ) {
        self.calendar = calendar;
        self.parallel_spaces = parallel_spaces;
        self.columns = labels
            .into_iter()
            .map(|label| ColumnResults::new(label, &self.calendar, parallel_spaces))
            .collect();
    }

    /// Add a runtime column (dynamic shapes).
    pub fn push_column(&mut self, label: impl Into<String>) -> usize {
        self.columns
            .push(ColumnResults::new(label, &self.calendar, self.parallel_spaces));
        self.columns.len() - 1
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column(&self, index: usize) -> Option<&ColumnResults> {
        self.columns.get(index)
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut ColumnResults> {
        self.columns.get_mut(index)
    }

    pub fn columns(&self) -> impl Iterator<Item = &ColumnResults> {
        self.columns.iter()
    }

    pub fn year_begin(&mut self, space: usize) {
        for column in &mut self.columns {
            if let Some(values) = column.space_mut(space) {
                values.reset();
            }
        }
    }

    pub fn year_end(&mut self, space: usize, aggregate: TimeAggregate) {
        let calendar = &self.calendar;
        for column in &mut self.columns {
            column.year_end(space, calendar, aggregate);
        }
    }

    /// Static cost of one column.
    pub fn estimate_column_memory(
        calendar: &Calendar,
        parallel_spaces: usize,
        with_intermediate_values: bool,
    ) -> u64 {
        let stats: u64 = Precision::LEVELS
            .iter()
            .map(|&level| YearStatistics::estimate_memory_usage(calendar.period_count(level)))
            .sum();
        let intermediate = if with_intermediate_values {
            parallel_spaces as u64 * IntermediateValues::estimate_memory_usage(calendar)
        } else {
            0
        };
        size_of::<ColumnResults>() as u64 + stats + intermediate
    }

    pub fn memory_usage(&self) -> u64 {
        size_of::<Self>() as u64 + self.columns.iter().map(ColumnResults::memory_usage).sum::<u64>()
    }
}
