//! Spatial aggregation of one variable over several entities.

use rf_core::AreaId;

use crate::card::SpatialAggregate;

/// Entities an aggregate is computed over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AggregateScope {
    WholeStudy,
    Areas(Vec<AreaId>),
}

impl AggregateScope {
    pub fn contains(&self, area: AreaId) -> bool {
        match self {
            Self::WholeStudy => true,
            Self::Areas(areas) => areas.contains(&area),
        }
    }
}

/// Running combination of per-entity hourly series, one per column.
#[derive(Clone, Debug, Default)]
pub struct SpatialAccumulator {
    operation: Option<SpatialAggregate>,
    columns: Vec<Vec<f64>>,
    count: usize,
}

impl SpatialAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold the series of one entity with `operation`.
    pub fn add(&mut self, operation: SpatialAggregate, series: &[&[f64]]) {
        self.operation = Some(operation);
        if self.count == 0 {
            self.columns = series.iter().map(|s| s.to_vec()).collect();
        } else {
            if self.columns.len() < series.len() {
                self.columns.resize(series.len(), Vec::new());
            }
            for (acc, values) in self.columns.iter_mut().zip(series) {
                if acc.len() < values.len() {
                    acc.resize(values.len(), 0.0);
                }
                for (a, v) in acc.iter_mut().zip(values.iter()) {
                    *a = operation.combine(*a, *v);
                }
            }
        }
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Final series; empty when nothing was added.
    pub fn finish(self) -> Vec<Vec<f64>> {
        let Some(operation) = self.operation else {
            return Vec::new();
        };
        let count = self.count;
        self.columns
            .into_iter()
            .map(|column| {
                column
                    .into_iter()
                    .map(|acc| operation.finish(acc, count))
                    .collect()
            })
            .collect()
    }
}
