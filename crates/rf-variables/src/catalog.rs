//! Standard variables and the pipelines built from them.

use rf_core::{ClusterId, ColumnCount, DataLevel, FileLevel, StudyContext};

use crate::card::{ResultKind, SpatialAggregate, TimeAggregate, VariableCard, VariableKey};
use crate::error::PipelineResult;
use crate::pipeline::Pipeline;
use crate::state::{EntityRef, State};
use crate::variable::{Variable, VariableBase};

const AREA_AND_SETS: DataLevel = DataLevel::AREA.union(DataLevel::SET_OF_AREAS);

pub static OVERALL_COST: VariableCard = VariableCard {
    key: VariableKey("OV. COST"),
    caption: "OV. COST",
    unit: "Euro",
    description: "Overall Cost throughout all MC years",
    data_level: AREA_AND_SETS,
    ..VariableCard::DEFAULT
};

pub static LOAD: VariableCard = VariableCard {
    key: VariableKey("LOAD"),
    caption: "LOAD",
    unit: "MWh",
    description: "Demand",
    data_level: AREA_AND_SETS,
    ..VariableCard::DEFAULT
};

pub static UNSUPPLIED_ENERGY: VariableCard = VariableCard {
    key: VariableKey("UNSP. ENRG"),
    caption: "UNSP. ENRG",
    unit: "MWh",
    description: "Unsupplied Energy",
    data_level: AREA_AND_SETS,
    possibly_non_applicable: true,
    ..VariableCard::DEFAULT
};

pub static MARGINAL_PRICE: VariableCard = VariableCard {
    key: VariableKey("MRG. PRICE"),
    caption: "MRG. PRICE",
    unit: "Euro",
    description: "Marginal Price, throughout all MC years",
    data_level: AREA_AND_SETS,
    spatial_aggregate: SpatialAggregate::Average,
    time_aggregate: TimeAggregate::Average,
    results: ResultKind::AverageOnly,
    decimals: 2,
    ..VariableCard::DEFAULT
};

pub static GENERATION_BY_FUEL: VariableCard = VariableCard {
    key: VariableKey("GENERATION BY FUEL"),
    caption: "GENERATION BY FUEL",
    unit: "MWh",
    description: "Thermal generation per fuel",
    columns: ColumnCount::Fixed(3),
    column_captions: &["NUCLEAR", "COAL", "GAS"],
    data_level: AREA_AND_SETS,
    node_depth_for_gui: true,
    ..VariableCard::DEFAULT
};

pub static DISPATCH_BY_PLANT: VariableCard = VariableCard {
    key: VariableKey("DTG BY PLANT"),
    caption: "DTG BY PLANT",
    unit: "MWh",
    description: "Energy generated by each thermal cluster",
    columns: ColumnCount::Dynamic,
    file_level: FileLevel::DETAILS,
    node_depth_for_gui: true,
    ..VariableCard::DEFAULT
};

pub static FLOW_LINEAR: VariableCard = VariableCard {
    key: VariableKey("FLOW LIN."),
    caption: "FLOW LIN.",
    unit: "MWh",
    description: "Flow assessed, over all MC years, through linear optimization",
    data_level: DataLevel::LINK,
    ..VariableCard::DEFAULT
};

/// Variable recording one sample per column and hour from its own entity.
#[derive(Clone, Debug)]
pub struct HourlyVariable {
    base: VariableBase,
}

impl HourlyVariable {
    pub fn new(card: &'static VariableCard) -> Self {
        Self {
            base: VariableBase::new(card),
        }
    }
}

impl Variable for HourlyVariable {
    fn base(&self) -> &VariableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VariableBase {
        &mut self.base
    }

    fn hour_for_each_area(&mut self, state: &State, space: usize) {
        if matches!(self.base.entity, Some(EntityRef::Area(_))) {
            self.base.record_entity_samples(state, space);
        }
    }

    fn hour_for_each_link(&mut self, state: &State, space: usize) {
        if matches!(self.base.entity, Some(EntityRef::Link(_))) {
            self.base.record_entity_samples(state, space);
        }
    }
}

/// One column per thermal cluster of the area, in cluster order.
#[derive(Clone, Debug)]
pub struct ThermalClusterVariable {
    base: VariableBase,
    clusters: Vec<ClusterId>,
}

impl ThermalClusterVariable {
    pub fn new(card: &'static VariableCard) -> Self {
        Self {
            base: VariableBase::new(card),
            clusters: Vec::new(),
        }
    }

    pub fn clusters(&self) -> &[ClusterId] {
        &self.clusters
    }
}

impl Variable for ThermalClusterVariable {
    fn base(&self) -> &VariableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VariableBase {
        &mut self.base
    }

    fn initialize_from_study(&mut self, study: &StudyContext) {
        self.clusters.clear();
        self.base.initialize(study);
    }

    fn initialize_from_thermal_cluster(&mut self, study: &StudyContext, cluster: ClusterId) {
        let Some(info) = study.thermal_cluster(cluster) else {
            return;
        };
        if self.base.entity != Some(EntityRef::Area(info.area))
            || self.clusters.contains(&cluster)
        {
            return;
        }
        self.clusters.push(cluster);
        self.base.results.push_column(info.name.clone());
    }

    fn hour_for_each_thermal_cluster(&mut self, state: &State, cluster: ClusterId, space: usize) {
        let Some(column) = self.clusters.iter().position(|c| *c == cluster) else {
            return;
        };
        let value = state.sample(EntityRef::ThermalCluster(cluster), self.base.card.key, 0);
        self.base.record(state, column, space, value);
    }
}

pub fn area_variables() -> PipelineResult<Pipeline> {
    let mut pipeline = Pipeline::new();
    pipeline.push(Box::new(HourlyVariable::new(&OVERALL_COST)))?;
    pipeline.push(Box::new(HourlyVariable::new(&LOAD)))?;
    pipeline.push(Box::new(HourlyVariable::new(&UNSUPPLIED_ENERGY)))?;
    pipeline.push(Box::new(HourlyVariable::new(&MARGINAL_PRICE)))?;
    pipeline.push(Box::new(HourlyVariable::new(&GENERATION_BY_FUEL)))?;
    pipeline.push(Box::new(ThermalClusterVariable::new(&DISPATCH_BY_PLANT)))?;
    Ok(pipeline)
}

pub fn link_variables() -> PipelineResult<Pipeline> {
    let mut pipeline = Pipeline::new();
    pipeline.push(Box::new(HourlyVariable::new(&FLOW_LINEAR)))?;
    Ok(pipeline)
}

/// Area variables that have a meaning over a set of areas.
pub fn set_of_areas_variables() -> PipelineResult<Pipeline> {
    let mut pipeline = Pipeline::new();
    pipeline.push(Box::new(HourlyVariable::new(&OVERALL_COST)))?;
    pipeline.push(Box::new(HourlyVariable::new(&LOAD)))?;
    pipeline.push(Box::new(HourlyVariable::new(&UNSUPPLIED_ENERGY)))?;
    pipeline.push(Box::new(HourlyVariable::new(&MARGINAL_PRICE)))?;
    pipeline.push(Box::new(HourlyVariable::new(&GENERATION_BY_FUEL)))?;
    Ok(pipeline)
}
