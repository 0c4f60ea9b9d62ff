//! Simulation state handed to the lifecycle hooks.

use std::collections::HashMap;

use rf_core::{AreaId, ClusterId, LinkId};

use crate::card::VariableKey;

/// Entity a pipeline or a sample belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Area(AreaId),
    Link(LinkId),
    ThermalCluster(ClusterId),
    /// Position in the study's list of area sets.
    AreaSet(usize),
}

/// Values produced by the simulation for the current hour.
///
/// The simulation writes one sample per (entity, variable, column); variables
/// read the samples of their own entity. Missing samples read as zero.
#[derive(Clone, Debug, Default)]
pub struct State {
    pub year: u32,
    pub week: usize,
    pub hour_in_year: usize,
    samples: HashMap<(EntityRef, VariableKey, usize), f64>,
}

impl State {
    pub fn new(year: u32) -> Self {
        Self {
            year,
            ..Self::default()
        }
    }

    /// Move to `hour` and forget the previous samples.
    pub fn start_hour(&mut self, hour: usize) {
        self.hour_in_year = hour;
        self.week = hour / rf_core::calendar::HOURS_PER_WEEK;
        self.samples.clear();
    }

    pub fn set(&mut self, entity: EntityRef, key: VariableKey, column: usize, value: f64) {
        self.samples.insert((entity, key, column), value);
    }

    pub fn sample(&self, entity: EntityRef, key: VariableKey, column: usize) -> f64 {
        self.samples
            .get(&(entity, key, column))
            .copied()
            .unwrap_or(0.0)
    }
}
