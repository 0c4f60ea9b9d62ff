//! Ordered variable pipeline of one entity.

use std::collections::HashMap;
use std::mem::size_of;

use rf_core::{
    AreaId, ClusterId, ColumnCount, DataLevel, FileLevel, LinkId, MemoryUsage, Precision,
    StudyContext,
};
use rf_matrix::Matrix;
use rf_registry::{PrintInfoCollector, PrintInfoRegistry};
use tracing::debug;

use crate::aggregate::SpatialAccumulator;
use crate::card::{VariableCard, VariableKey};
use crate::error::{PipelineError, PipelineResult};
use crate::info::{InformationSink, VariableListSink};
use crate::results::VariableResults;
use crate::state::State;
use crate::survey::{DigestLevel, ReportSection, SurveyResults};
use crate::variable::{Variable, VariableBase};

/// Data levels that appear in digests.
const DIGEST_LEVELS: DataLevel = DataLevel::SET_OF_AREAS
    .union(DataLevel::AREA)
    .union(DataLevel::LINK);

/// Captions of year-by-year sections.
const YEAR_VALUES: &[&str] = &["values"];

/// Variables of one entity in registration order.
///
/// Every lifecycle call visits every variable exactly once, in order. Keyed
/// lookups fail with a configuration-integrity error when the key is absent.
#[derive(Default)]
pub struct Pipeline {
    nodes: Vec<Box<dyn Variable>>,
    index: HashMap<VariableKey, usize>,
    parallel_spaces: usize,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("variables", &self.keys().collect::<Vec<_>>())
            .field("parallel_spaces", &self.parallel_spaces)
            .finish()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a variable. Keys are unique within a pipeline.
    pub fn push(&mut self, node: Box<dyn Variable>) -> PipelineResult<()> {
        let key = node.card().key;
        if self.index.contains_key(&key) {
            return Err(PipelineError::integrity(format!(
                "variable {key} registered twice"
            )));
        }
        self.index.insert(key, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = VariableKey> + '_ {
        self.nodes.iter().map(|n| n.card().key)
    }

    pub fn cards(&self) -> impl Iterator<Item = &'static VariableCard> + '_ {
        self.nodes.iter().map(|n| n.card())
    }

    pub fn node(&self, key: VariableKey) -> PipelineResult<&dyn Variable> {
        let i = self.position(key)?;
        Ok(self.nodes[i].as_ref())
    }

    fn node_mut(&mut self, key: VariableKey) -> PipelineResult<&mut dyn Variable> {
        let i = self.position(key)?;
        Ok(self.nodes[i].as_mut())
    }

    fn position(&self, key: VariableKey) -> PipelineResult<usize> {
        self.index
            .get(&key)
            .copied()
            .ok_or_else(|| PipelineError::integrity(format!("no variable {key} in pipeline")))
    }

    fn check_space(&self, space: usize) -> PipelineResult<()> {
        if space < self.parallel_spaces {
            Ok(())
        } else {
            Err(PipelineError::InvalidSpace {
                space,
                spaces: self.parallel_spaces,
            })
        }
    }

    // Initialization

    pub fn initialize_from_study(&mut self, study: &StudyContext) {
        self.parallel_spaces = study.parallel_spaces;
        for node in &mut self.nodes {
            node.initialize_from_study(study);
        }
    }

    pub fn initialize_from_area(&mut self, study: &StudyContext, area: AreaId) {
        for node in &mut self.nodes {
            node.initialize_from_area(study, area);
        }
    }

    pub fn initialize_from_link(&mut self, study: &StudyContext, link: LinkId) {
        for node in &mut self.nodes {
            node.initialize_from_link(study, link);
        }
    }

    pub fn initialize_from_thermal_cluster(&mut self, study: &StudyContext, cluster: ClusterId) {
        for node in &mut self.nodes {
            node.initialize_from_thermal_cluster(study, cluster);
        }
    }

    /// `set` is a position in the study's list of area sets.
    pub fn initialize_from_area_set(&mut self, study: &StudyContext, set: usize) {
        for node in &mut self.nodes {
            node.initialize_from_area_set(study, set);
        }
    }

    /// Mark possibly non-applicable variables when `apply` is set; clear
    /// every other flag.
    pub fn broadcast_non_applicability(&mut self, apply: bool) {
        for node in &mut self.nodes {
            let value = apply && node.card().possibly_non_applicable;
            node.base_mut().flags.fill_non_applicable(value);
        }
    }

    /// Copy the registry's print flags into every variable.
    ///
    /// Fixed multi-column variables read one flag per column name; other
    /// shapes read a single flag. A name missing from the registry means the
    /// registry was built from another variable list.
    pub fn get_print_status_from_registry(
        &mut self,
        registry: &mut PrintInfoRegistry,
    ) -> PipelineResult<()> {
        for node in &mut self.nodes {
            let card = node.card();
            for (i, name) in card.print_names().into_iter().enumerate() {
                if !registry.find(name) {
                    return Err(PipelineError::integrity(format!(
                        "variable {name:?} is not in the print registry"
                    )));
                }
                let printed = registry.is_printed()?;
                node.base_mut().flags.set_printed(i, printed);
            }
        }
        Ok(())
    }

    // Lifecycle

    pub fn simulation_begin(&mut self) {
        for node in &mut self.nodes {
            node.simulation_begin();
        }
    }

    pub fn simulation_end(&mut self) {
        for node in &mut self.nodes {
            node.simulation_end();
        }
    }

    pub fn year_begin(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.year_begin(year, space);
        }
        Ok(())
    }

    pub fn year_end(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.year_end(year, space);
        }
        Ok(())
    }

    pub fn before_year_by_year_export(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.before_year_by_year_export(year, space);
        }
        Ok(())
    }

    pub fn week_begin(&mut self, state: &State) {
        for node in &mut self.nodes {
            node.week_begin(state);
        }
    }

    pub fn week_for_each_area(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.week_for_each_area(state, space);
        }
        Ok(())
    }

    pub fn week_end(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.week_end(state, space);
        }
        Ok(())
    }

    pub fn hour_begin(&mut self, hour: usize) {
        for node in &mut self.nodes {
            node.hour_begin(hour);
        }
    }

    pub fn hour_for_each_area(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.hour_for_each_area(state, space);
        }
        Ok(())
    }

    pub fn hour_for_each_thermal_cluster(
        &mut self,
        state: &State,
        cluster: ClusterId,
        space: usize,
    ) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.hour_for_each_thermal_cluster(state, cluster, space);
        }
        Ok(())
    }

    pub fn hour_for_each_link(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.hour_for_each_link(state, space);
        }
        Ok(())
    }

    pub fn hour_end(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &mut self.nodes {
            node.hour_end(state, space);
        }
        Ok(())
    }

    // Retrieval

    pub fn retrieve_results(&self, key: VariableKey) -> PipelineResult<&VariableResults> {
        Ok(&self.node(key)?.base().results)
    }

    /// Hourly series of the year being simulated in `space`, one per column.
    ///
    /// `None` when the variable has no column.
    pub fn retrieve_hourly_results_for_current_year(
        &self,
        key: VariableKey,
        space: usize,
    ) -> PipelineResult<Option<Vec<&[f64]>>> {
        self.check_space(space)?;
        let results = self.retrieve_results(key)?;
        if results.column_count() == 0 {
            return Ok(None);
        }
        Ok(Some(
            results
                .columns()
                .filter_map(|c| c.space(space).map(|v| v.hourly()))
                .collect(),
        ))
    }

    /// Fold this entity's hourly series of `key` into `out`, using the
    /// variable's spatial aggregate.
    pub fn compute_spatial_aggregate_with(
        &self,
        key: VariableKey,
        out: &mut SpatialAccumulator,
        space: usize,
    ) -> PipelineResult<()> {
        let operation = self.node(key)?.card().spatial_aggregate;
        if let Some(series) = self.retrieve_hourly_results_for_current_year(key, space)? {
            out.add(operation, &series);
        }
        Ok(())
    }

    /// Overwrite the hourly series of `key` in `space`.
    pub fn store_hourly_results(
        &mut self,
        key: VariableKey,
        space: usize,
        series: &[Vec<f64>],
    ) -> PipelineResult<()> {
        self.check_space(space)?;
        let results = &mut self.node_mut(key)?.base_mut().results;
        for (i, values) in series.iter().enumerate() {
            if let Some(target) = results.column_mut(i).and_then(|c| c.space_mut(space)) {
                target.set_hourly(values);
            }
        }
        Ok(())
    }

    // Reports

    fn emits(
        card: &VariableCard,
        data_level: DataLevel,
        file_level: FileLevel,
        precision: Precision,
    ) -> bool {
        data_level.intersects(card.data_level)
            && file_level.intersects(card.file_level)
            && precision.intersects(card.precision)
    }

    /// Statistics over the merged years, one section per column and level.
    pub fn build_survey_report(
        &self,
        results: &mut SurveyResults,
        data_level: DataLevel,
        file_level: FileLevel,
        precision: Precision,
    ) {
        for node in &self.nodes {
            let base = node.base();
            let card = base.card;
            if base.results.column_count() == 0
                || !Self::emits(card, data_level, file_level, precision)
            {
                continue;
            }
            results.attach(&base.flags);
            for level in (precision & card.precision).levels() {
                for (i, column) in base.results.columns().enumerate() {
                    let Some(stats) = column.stats(level) else {
                        continue;
                    };
                    let values = stats.report(card.results);
                    let captions = card.results.captions();
                    results.push_section(
                        i,
                        section(base, &column.label, level, file_level, captions, values),
                    );
                }
            }
            debug!(variable = card.caption, "survey report emitted");
        }
    }

    /// Values of the year simulated in `space`, one section per column and level.
    pub fn build_annual_survey_report(
        &self,
        results: &mut SurveyResults,
        data_level: DataLevel,
        file_level: FileLevel,
        precision: Precision,
        space: usize,
    ) -> PipelineResult<()> {
        self.check_space(space)?;
        for node in &self.nodes {
            let base = node.base();
            let card = base.card;
            if base.results.column_count() == 0
                || !Self::emits(card, data_level, file_level, precision)
            {
                continue;
            }
            results.attach(&base.flags);
            for level in (precision & card.precision).levels() {
                for (i, column) in base.results.columns().enumerate() {
                    let Some(values) = column.space(space) else {
                        continue;
                    };
                    let values = Matrix::from_column(values.period_values(level).to_vec());
                    results.push_section(
                        i,
                        section(base, &column.label, level, file_level, YEAR_VALUES, values),
                    );
                }
            }
            debug!(variable = card.caption, space, "year-by-year report emitted");
        }
        Ok(())
    }

    /// Annual statistics of every column of area, link and set variables.
    pub fn build_digest(
        &self,
        results: &mut SurveyResults,
        digest_level: DigestLevel,
        data_level: DataLevel,
    ) {
        for node in &self.nodes {
            let base = node.base();
            let card = base.card;
            if base.results.column_count() == 0 || !card.data_level.intersects(DIGEST_LEVELS) {
                continue;
            }
            results.attach(&base.flags);
            let captions = card.results.captions();
            for (i, column) in base.results.columns().enumerate() {
                let Some(stats) = column.stats(Precision::ANNUAL) else {
                    continue;
                };
                let mut values = stats.row(0, card.results);
                let captions = match digest_level {
                    DigestLevel::Values => {
                        values.truncate(1);
                        captions[..1].to_vec()
                    }
                    DigestLevel::Detailed => captions.to_vec(),
                };
                results.push_digest(i, data_level, &column.label, captions, values, card.decimals);
            }
        }
    }

    // Memory

    /// Static estimate; dynamic variables are left out.
    pub fn estimate_memory_usage(&self, usage: &mut MemoryUsage) {
        let calendar = usage.calendar();
        for card in self.cards() {
            let Some(width) = card.columns.static_width() else {
                continue;
            };
            let per_column = VariableResults::estimate_column_memory(
                &calendar,
                usage.parallel_spaces,
                card.has_intermediate_values,
            );
            usage.add_memory(per_column * u64::from(width));
            if usage.year_by_year_output_expected() {
                for _ in 0..usage.years {
                    usage.take_into_consideration_a_new_timeseries_for_disk_output(false);
                }
            }
        }
    }

    /// Bytes currently held by the variables.
    pub fn memory_usage(&self) -> u64 {
        self.nodes
            .iter()
            .map(|n| size_of::<VariableBase>() as u64 + n.base().results.memory_usage())
            .sum()
    }

    // Enumeration

    /// One tuple per single or dynamic variable, one per column otherwise.
    pub fn retrieve_variable_list(&self, sink: &mut dyn VariableListSink) {
        for card in self.cards() {
            match card.columns {
                ColumnCount::Single | ColumnCount::Dynamic => {
                    sink.add(card.caption, card.unit, card.description);
                }
                ColumnCount::Fixed(n) => {
                    for i in 0..n as usize {
                        sink.add(card.column_caption(i), card.unit, card.description);
                    }
                }
            }
        }
    }

    /// Register one print entry per printable name.
    pub fn retrieve_print_info(
        &self,
        collector: &mut PrintInfoCollector<'_>,
    ) -> PipelineResult<()> {
        for card in self.cards() {
            let columns = if card.columns.is_dynamic() {
                ColumnCount::Dynamic
            } else {
                card.results.registry_columns()
            };
            for name in card.print_names() {
                collector.add(name, columns, card.data_level, card.file_level)?;
            }
        }
        Ok(())
    }

    pub fn provide_informations(&self, sink: &mut dyn InformationSink) {
        for card in self.cards() {
            if card.node_depth_for_gui {
                sink.begin_node(card.caption);
                sink.add_card(card);
                sink.end_node();
            } else {
                sink.add_card(card);
            }
        }
    }
}

fn section(
    base: &VariableBase,
    label: &str,
    level: Precision,
    file_level: FileLevel,
    result_captions: &'static [&'static str],
    values: Matrix<f64>,
) -> ReportSection {
    ReportSection {
        variable: base.card.caption,
        column: label.to_string(),
        unit: base.card.unit,
        precision: level,
        file_level: base.card.file_level & file_level,
        result_captions,
        values,
        decimals: base.card.decimals,
        printed: true,
        non_applicable: false,
    }
}
