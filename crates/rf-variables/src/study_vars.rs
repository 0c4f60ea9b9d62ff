//! Pipelines of a whole study.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rf_core::{
    AreaId, ClusterId, DataLevel, FileLevel, LinkId, MemoryUsage, Precision, StudyContext,
};
use rf_registry::{PrintInfoCollector, PrintInfoRegistry};
use tracing::{debug, info};

use crate::aggregate::{AggregateScope, SpatialAccumulator};
use crate::card::VariableKey;
use crate::catalog;
use crate::error::{PipelineError, PipelineResult};
use crate::info::{InformationSink, VariableListing};
use crate::pipeline::Pipeline;
use crate::results::{ColumnResults, VariableResults};
use crate::state::State;
use crate::survey::{DigestLevel, SurveyResults, write_digest};

/// One pipeline per area, link and set of areas.
///
/// Hooks that only touch one entity run in parallel over entities; each
/// pipeline is owned by exactly one worker at a time.
#[derive(Debug)]
pub struct StudyVariables {
    study: StudyContext,
    areas: Vec<Pipeline>,
    /// Thermal clusters of every area, in registration order.
    area_clusters: Vec<Vec<ClusterId>>,
    links: Vec<Pipeline>,
    sets: Vec<Pipeline>,
}

impl StudyVariables {
    pub fn new(study: &StudyContext) -> PipelineResult<Self> {
        study.validate()?;

        let mut areas = Vec::with_capacity(study.areas.len());
        let mut area_clusters = Vec::with_capacity(study.areas.len());
        for area in &study.areas {
            let mut pipeline = catalog::area_variables()?;
            pipeline.initialize_from_study(study);
            pipeline.initialize_from_area(study, area.id);
            let clusters: Vec<ClusterId> = study.clusters_of(area.id).map(|c| c.id).collect();
            for cluster in &clusters {
                pipeline.initialize_from_thermal_cluster(study, *cluster);
            }
            areas.push(pipeline);
            area_clusters.push(clusters);
        }

        let mut links = Vec::with_capacity(study.links.len());
        for link in &study.links {
            let mut pipeline = catalog::link_variables()?;
            pipeline.initialize_from_study(study);
            pipeline.initialize_from_link(study, link.id);
            links.push(pipeline);
        }

        let mut sets = Vec::with_capacity(study.area_sets.len());
        for index in 0..study.area_sets.len() {
            let mut pipeline = catalog::set_of_areas_variables()?;
            pipeline.initialize_from_study(study);
            pipeline.initialize_from_area_set(study, index);
            sets.push(pipeline);
        }

        info!(
            areas = areas.len(),
            links = links.len(),
            sets = sets.len(),
            "study variables initialized"
        );
        Ok(Self {
            study: study.clone(),
            areas,
            area_clusters,
            links,
            sets,
        })
    }

    pub fn study(&self) -> &StudyContext {
        &self.study
    }

    fn area_index(&self, id: AreaId) -> PipelineResult<usize> {
        self.study
            .areas
            .iter()
            .position(|a| a.id == id)
            .ok_or(PipelineError::UnknownEntity {
                what: "area",
                id: id.index(),
            })
    }

    fn link_index(&self, id: LinkId) -> PipelineResult<usize> {
        self.study
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(PipelineError::UnknownEntity {
                what: "link",
                id: id.index(),
            })
    }

    pub fn area(&self, id: AreaId) -> PipelineResult<&Pipeline> {
        Ok(&self.areas[self.area_index(id)?])
    }

    pub fn link(&self, id: LinkId) -> PipelineResult<&Pipeline> {
        Ok(&self.links[self.link_index(id)?])
    }

    pub fn area_set(&self, index: usize) -> PipelineResult<&Pipeline> {
        self.sets.get(index).ok_or(PipelineError::UnknownEntity {
            what: "area set",
            id: index as u32,
        })
    }

    fn all_mut(&mut self) -> impl Iterator<Item = &mut Pipeline> {
        self.areas
            .iter_mut()
            .chain(self.links.iter_mut())
            .chain(self.sets.iter_mut())
    }

    // Print information

    /// Fill `registry` with the print names of every kind of pipeline.
    pub fn register_print_info(registry: &mut PrintInfoRegistry) -> PipelineResult<()> {
        let mut collector = PrintInfoCollector::new(registry);
        catalog::area_variables()?.retrieve_print_info(&mut collector)?;
        catalog::link_variables()?.retrieve_print_info(&mut collector)?;
        catalog::set_of_areas_variables()?.retrieve_print_info(&mut collector)?;
        Ok(())
    }

    /// Variables of every kind of pipeline, areas first.
    pub fn variable_listing() -> PipelineResult<VariableListing> {
        let mut listing = VariableListing::default();
        catalog::area_variables()?.retrieve_variable_list(&mut listing);
        catalog::link_variables()?.retrieve_variable_list(&mut listing);
        Ok(listing)
    }

    pub fn provide_informations(sink: &mut dyn InformationSink) -> PipelineResult<()> {
        sink.begin_node("Areas");
        catalog::area_variables()?.provide_informations(sink);
        sink.end_node();
        sink.begin_node("Links");
        catalog::link_variables()?.provide_informations(sink);
        sink.end_node();
        Ok(())
    }

    pub fn get_print_status_from_registry(
        &mut self,
        registry: &mut PrintInfoRegistry,
    ) -> PipelineResult<()> {
        for pipeline in self.all_mut() {
            pipeline.get_print_status_from_registry(registry)?;
        }
        Ok(())
    }

    pub fn broadcast_non_applicability(&mut self, apply: bool) {
        for pipeline in self.all_mut() {
            pipeline.broadcast_non_applicability(apply);
        }
    }

    // Lifecycle

    pub fn simulation_begin(&mut self) {
        for pipeline in self.all_mut() {
            pipeline.simulation_begin();
        }
    }

    pub fn simulation_end(&mut self) {
        for pipeline in self.all_mut() {
            pipeline.simulation_end();
        }
    }

    pub fn year_begin(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.all_mut()
            .try_for_each(|pipeline| pipeline.year_begin(year, space))
    }

    /// Close the year of `space`; set-of-areas values are aggregated from
    /// their member areas first.
    pub fn year_end(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.areas
            .par_iter_mut()
            .chain(self.links.par_iter_mut())
            .try_for_each(|pipeline| pipeline.year_end(year, space))?;
        self.year_end_spatial_aggregates(space)?;
        for pipeline in &mut self.sets {
            pipeline.year_end(year, space)?;
        }
        debug!(year, space, "year closed");
        Ok(())
    }

    pub fn before_year_by_year_export(&mut self, year: u32, space: usize) -> PipelineResult<()> {
        self.all_mut()
            .try_for_each(|pipeline| pipeline.before_year_by_year_export(year, space))
    }

    pub fn week_begin(&mut self, state: &State) {
        for pipeline in self.all_mut() {
            pipeline.week_begin(state);
        }
    }

    pub fn week_for_each_area(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.areas
            .par_iter_mut()
            .try_for_each(|pipeline| pipeline.week_for_each_area(state, space))
    }

    pub fn week_end(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.all_mut()
            .try_for_each(|pipeline| pipeline.week_end(state, space))
    }

    pub fn hour_begin(&mut self, hour: usize) {
        for pipeline in self.all_mut() {
            pipeline.hour_begin(hour);
        }
    }

    /// Area hooks, then the thermal cluster hooks of that area.
    pub fn hour_for_each_area(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.areas
            .par_iter_mut()
            .zip(self.area_clusters.par_iter())
            .try_for_each(|(pipeline, clusters)| {
                pipeline.hour_for_each_area(state, space)?;
                for cluster in clusters {
                    pipeline.hour_for_each_thermal_cluster(state, *cluster, space)?;
                }
                Ok(())
            })
    }

    pub fn hour_for_each_link(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.links
            .par_iter_mut()
            .try_for_each(|pipeline| pipeline.hour_for_each_link(state, space))
    }

    pub fn hour_end(&mut self, state: &State, space: usize) -> PipelineResult<()> {
        self.all_mut()
            .try_for_each(|pipeline| pipeline.hour_end(state, space))
    }

    // Retrieval

    pub fn retrieve_results_for_area(
        &self,
        key: VariableKey,
        area: AreaId,
    ) -> PipelineResult<&VariableResults> {
        self.area(area)?.retrieve_results(key)
    }

    pub fn retrieve_results_for_link(
        &self,
        key: VariableKey,
        link: LinkId,
    ) -> PipelineResult<&VariableResults> {
        self.link(link)?.retrieve_results(key)
    }

    /// Column of `cluster` in the per-cluster variable `key` of its area.
    pub fn retrieve_results_for_thermal_cluster(
        &self,
        key: VariableKey,
        cluster: ClusterId,
    ) -> PipelineResult<&ColumnResults> {
        let unknown = PipelineError::UnknownEntity {
            what: "thermal cluster",
            id: cluster.index(),
        };
        let Some(info) = self.study.thermal_cluster(cluster) else {
            return Err(unknown);
        };
        let area = self.area_index(info.area)?;
        let column = self.area_clusters[area]
            .iter()
            .position(|c| *c == cluster)
            .ok_or(unknown)?;
        self.areas[area]
            .retrieve_results(key)?
            .column(column)
            .ok_or_else(|| {
                PipelineError::integrity(format!(
                    "variable {key} has no column per thermal cluster"
                ))
            })
    }

    /// Aggregate of `key` over the areas in `scope`, one hourly series per
    /// column. Empty when no area is in scope.
    pub fn compute_spatial_aggregate_with(
        &self,
        key: VariableKey,
        scope: &AggregateScope,
        space: usize,
    ) -> PipelineResult<Vec<Vec<f64>>> {
        let mut acc = SpatialAccumulator::new();
        for (area, pipeline) in self.study.areas.iter().zip(&self.areas) {
            if scope.contains(area.id) {
                pipeline.compute_spatial_aggregate_with(key, &mut acc, space)?;
            }
        }
        Ok(acc.finish())
    }

    /// Fill every set-of-areas pipeline from its member areas.
    pub fn year_end_spatial_aggregates(&mut self, space: usize) -> PipelineResult<()> {
        for (index, set) in self.study.area_sets.iter().enumerate() {
            let scope = AggregateScope::Areas(set.areas.clone());
            let keys: Vec<VariableKey> = self.sets[index].keys().collect();
            for key in keys {
                let series = self.compute_spatial_aggregate_with(key, &scope, space)?;
                self.sets[index].store_hourly_results(key, space, &series)?;
            }
        }
        Ok(())
    }

    // Memory

    pub fn estimate_memory_usage(&self, usage: &mut MemoryUsage) {
        for pipeline in self.areas.iter().chain(&self.links).chain(&self.sets) {
            pipeline.estimate_memory_usage(usage);
        }
    }

    pub fn memory_usage(&self) -> u64 {
        self.areas
            .iter()
            .chain(&self.links)
            .chain(&self.sets)
            .map(Pipeline::memory_usage)
            .sum()
    }

    // Exports

    fn survey_targets(&self) -> impl Iterator<Item = (&Pipeline, SurveyResults, PathBuf)> + '_ {
        let areas = self.study.areas.iter().zip(&self.areas).map(|(a, p)| {
            (p, SurveyResults::new(&a.name, DataLevel::AREA), Path::new("areas").join(&a.name))
        });
        let links = self.study.links.iter().zip(&self.links).map(|(l, p)| {
            (p, SurveyResults::new(&l.name, DataLevel::LINK), Path::new("links").join(&l.name))
        });
        let sets = self.study.area_sets.iter().zip(&self.sets).map(|(s, p)| {
            (
                p,
                SurveyResults::new(&s.name, DataLevel::SET_OF_AREAS),
                Path::new("sets").join(&s.name),
            )
        });
        areas.chain(links).chain(sets)
    }

    /// Write the statistics over all years under `dir`.
    pub fn export_survey_reports(
        &self,
        dir: &Path,
        file_level: FileLevel,
        precision: Precision,
    ) -> PipelineResult<Vec<PathBuf>> {
        let mut written = Vec::new();
        for (pipeline, mut results, sub) in self.survey_targets() {
            let level = results.data_level;
            pipeline.build_survey_report(&mut results, level, file_level, precision);
            written.extend(results.write_to_dir(&dir.join(sub))?);
        }
        info!(dir = %dir.display(), files = written.len(), "survey reports exported");
        Ok(written)
    }

    /// Write the values of the year simulated in `space` under
    /// `dir/mc-ind/<year>`.
    pub fn export_year_by_year(
        &mut self,
        dir: &Path,
        year: u32,
        space: usize,
        file_level: FileLevel,
        precision: Precision,
    ) -> PipelineResult<Vec<PathBuf>> {
        self.before_year_by_year_export(year, space)?;
        let root = dir.join("mc-ind").join(format!("{:05}", year + 1));
        let mut written = Vec::new();
        for (pipeline, mut results, sub) in self.survey_targets() {
            let level = results.data_level;
            pipeline.build_annual_survey_report(&mut results, level, file_level, precision, space)?;
            written.extend(results.write_to_dir(&root.join(sub))?);
        }
        info!(year, space, files = written.len(), "year-by-year reports exported");
        Ok(written)
    }

    /// Write the digest of every entity to `path`.
    pub fn export_digest(&self, path: &Path, digest_level: DigestLevel) -> PipelineResult<()> {
        let mut rows = Vec::new();
        for (pipeline, mut results, _) in self.survey_targets() {
            let level = results.data_level;
            pipeline.build_digest(&mut results, digest_level, level);
            rows.extend_from_slice(results.digest());
        }
        write_digest(path, &rows)
    }
}
