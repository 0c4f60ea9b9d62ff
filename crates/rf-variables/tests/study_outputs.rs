mod common;

use common::*;
use rf_core::{DataLevel, FileLevel, MemoryUsage, Precision, SimulationMode};
use rf_registry::{PrintInfoRegistry, SelectionTable};
use rf_variables::catalog::*;
use rf_variables::*;

fn prepared_registry() -> PrintInfoRegistry {
    let mut registry = PrintInfoRegistry::new();
    StudyVariables::register_print_info(&mut registry).unwrap();
    registry
}

#[test]
fn registry_has_one_entry_per_printable_name() {
    let mut registry = prepared_registry();
    let names: Vec<&str> = registry.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "OV. COST",
            "LOAD",
            "UNSP. ENRG",
            "MRG. PRICE",
            "NUCLEAR",
            "COAL",
            "GAS",
            "DTG BY PLANT",
            "FLOW LIN.",
        ]
    );
    registry.prepare_for_simulation(false);
    // 4 results for each of 7 names, 1 for the price, nothing for the dynamic one.
    assert_eq!(registry.columns_count(), 29);

    let load = registry.require("LOAD").unwrap();
    assert!(load.data_level.intersects(DataLevel::SET_OF_AREAS));
}

#[test]
fn print_status_is_read_per_fixed_column() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    let mut registry = prepared_registry();

    let mut selection = SelectionTable::all();
    selection.deselect.insert("COAL".into());
    selection.apply(&mut registry);
    registry.prepare_for_simulation(true);
    vars.get_print_status_from_registry(&mut registry).unwrap();

    let fuel = vars.area(s.north).unwrap().node(GENERATION_BY_FUEL.key).unwrap();
    assert_eq!(fuel.base().flags.printed(), &[true, false, true]);
    let load = vars.area(s.north).unwrap().node(LOAD.key).unwrap();
    assert_eq!(load.base().flags.printed(), &[true]);
}

#[test]
fn unregistered_names_are_a_configuration_error() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    let mut registry = PrintInfoRegistry::new();
    let err = vars.get_print_status_from_registry(&mut registry).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigurationIntegrity { .. }));
}

#[test]
fn statistics_over_years() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    vars.simulation_begin();
    run_year(&mut vars, 0, 0, constant_fill(&s, 1.0, 2.0));
    run_year(&mut vars, 1, 1, constant_fill(&s, 3.0, 2.0));
    vars.simulation_end();

    let load = vars.retrieve_results_for_area(LOAD.key, s.north).unwrap();
    let annual = load.column(0).unwrap().stats(Precision::ANNUAL).unwrap();
    assert_eq!(annual.years(), 2);
    assert_eq!(annual.row(0, ResultKind::AvgStdMinMax), vec![96.0, 48.0, 48.0, 144.0]);

    let daily = load.column(0).unwrap().stats(Precision::DAILY).unwrap();
    assert_eq!(daily.periods(), 2);
    assert_eq!(daily.average(1), 48.0);

    let price = vars.retrieve_results_for_area(MARGINAL_PRICE.key, s.south).unwrap();
    let annual = price.column(0).unwrap().stats(Precision::ANNUAL).unwrap();
    assert_eq!(annual.row(0, ResultKind::AverageOnly), vec![30.0]);

    let flow = vars.retrieve_results_for_link(FLOW_LINEAR.key, s.link).unwrap();
    let annual = flow.column(0).unwrap().stats(Precision::ANNUAL).unwrap();
    assert_eq!(annual.average(0), -240.0);
}

#[test]
fn thermal_clusters_get_their_own_columns() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    let (n1, n2) = (s.n1, s.n2);
    run_year(&mut vars, 0, 0, move |state, hour| {
        state.set(EntityRef::ThermalCluster(n1), DISPATCH_BY_PLANT.key, 0, 1.0);
        state.set(EntityRef::ThermalCluster(n2), DISPATCH_BY_PLANT.key, 0, hour as f64);
    });

    let north = vars.retrieve_results_for_area(DISPATCH_BY_PLANT.key, s.north).unwrap();
    assert_eq!(north.column_count(), 2);
    assert_eq!(north.column(1).unwrap().label, "n2");
    let south = vars.retrieve_results_for_area(DISPATCH_BY_PLANT.key, s.south).unwrap();
    assert_eq!(south.column_count(), 0);

    let n2 = vars
        .retrieve_results_for_thermal_cluster(DISPATCH_BY_PLANT.key, s.n2)
        .unwrap();
    let annual = n2.stats(Precision::ANNUAL).unwrap();
    assert_eq!(annual.average(0), (0..HOURS).sum::<usize>() as f64);

    let err = vars
        .retrieve_results_for_thermal_cluster(LOAD.key, s.n2)
        .unwrap_err();
    assert!(matches!(err, PipelineError::ConfigurationIntegrity { .. }));
}

#[test]
fn sets_of_areas_aggregate_their_members() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    run_year(&mut vars, 0, 0, constant_fill(&s, 1.0, 2.0));

    let set = vars.area_set(0).unwrap();
    let load = set.retrieve_results(LOAD.key).unwrap();
    let annual = load.column(0).unwrap().stats(Precision::ANNUAL).unwrap();
    assert_eq!(annual.average(0), 3.0 * HOURS as f64);

    let price = set.retrieve_results(MARGINAL_PRICE.key).unwrap();
    let hourly = price.column(0).unwrap().stats(Precision::HOURLY).unwrap();
    assert_eq!(hourly.average(5), 20.0);

    let only_north = vars
        .compute_spatial_aggregate_with(LOAD.key, &AggregateScope::Areas(vec![s.north]), 0)
        .unwrap();
    assert_eq!(only_north.len(), 1);
    assert!(only_north[0].iter().all(|v| *v == 1.0));

    let nobody = vars
        .compute_spatial_aggregate_with(LOAD.key, &AggregateScope::Areas(Vec::new()), 0)
        .unwrap();
    assert!(nobody.is_empty());
}

#[test]
fn survey_report_filters_by_category() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    run_year(&mut vars, 0, 0, constant_fill(&s, 1.0, 2.0));
    let north = vars.area(s.north).unwrap();

    let mut results = SurveyResults::new("north", DataLevel::AREA);
    north.build_survey_report(&mut results, DataLevel::LINK, FileLevel::VALUES, Precision::ANNUAL);
    assert!(results.sections().is_empty());

    north.build_survey_report(&mut results, DataLevel::AREA, FileLevel::VALUES, Precision::ANNUAL);
    let columns: Vec<&str> = results.sections().iter().map(|s| s.column.as_str()).collect();
    assert_eq!(
        columns,
        vec!["OV. COST", "LOAD", "UNSP. ENRG", "MRG. PRICE", "NUCLEAR", "COAL", "GAS"]
    );
    assert!(results.sections().iter().all(|s| s.precision == Precision::ANNUAL));

    let mut details = SurveyResults::new("north", DataLevel::AREA);
    north.build_survey_report(&mut details, DataLevel::AREA, FileLevel::DETAILS, Precision::ALL);
    assert_eq!(details.sections().len(), 2 * Precision::LEVELS.len());

    let mut south = SurveyResults::new("south", DataLevel::AREA);
    vars.area(s.south).unwrap().build_survey_report(
        &mut south,
        DataLevel::AREA,
        FileLevel::DETAILS,
        Precision::ALL,
    );
    assert!(south.sections().is_empty());
}

#[test]
fn report_sections_carry_print_and_applicability_flags() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    let mut registry = prepared_registry();
    registry.set_print_status("LOAD", false);
    registry.prepare_for_simulation(true);
    vars.get_print_status_from_registry(&mut registry).unwrap();
    vars.broadcast_non_applicability(true);

    let mut results = SurveyResults::new("north", DataLevel::AREA);
    vars.area(s.north).unwrap().build_survey_report(
        &mut results,
        DataLevel::AREA,
        FileLevel::VALUES,
        Precision::ANNUAL,
    );
    for section in results.sections() {
        assert_eq!(section.printed, section.column != "LOAD", "{}", section.column);
        assert_eq!(section.non_applicable, section.column == "UNSP. ENRG", "{}", section.column);
    }
}

#[test]
fn digest_levels() {
    let s = small_study();
    let mut vars = StudyVariables::new(&s.study).unwrap();
    run_year(&mut vars, 0, 0, constant_fill(&s, 1.0, 2.0));
    let north = vars.area(s.north).unwrap();

    let mut values = SurveyResults::new("north", DataLevel::AREA);
    north.build_digest(&mut values, DigestLevel::Values, DataLevel::AREA);
    let load = values.digest().iter().find(|r| r.column == "LOAD").unwrap();
    assert_eq!(load.values, vec![48.0]);
    assert_eq!(load.captions, vec!["EXP"]);
    // dynamic columns are listed too: one row per cluster
    assert_eq!(values.digest().len(), 9);

    let mut detailed = SurveyResults::new("north", DataLevel::AREA);
    north.build_digest(&mut detailed, DigestLevel::Detailed, DataLevel::AREA);
    let load = detailed.digest().iter().find(|r| r.column == "LOAD").unwrap();
    assert_eq!(load.values, vec![48.0, 0.0, 48.0, 48.0]);
}

#[test]
fn memory_estimate_skips_dynamic_variables() {
    let s = small_study();
    let vars = StudyVariables::new(&s.study).unwrap();
    let north = vars.area(s.north).unwrap();
    let calendar = s.study.calendar();
    let per_column = VariableResults::estimate_column_memory(&calendar, 2, true);

    let mut usage = MemoryUsage::for_study(&s.study);
    north.estimate_memory_usage(&mut usage);
    assert_eq!(usage.required_memory, 7 * per_column);
    assert_eq!(usage.disk_timeseries, 0);

    let mut study = s.study.clone();
    study.year_by_year = true;
    let mut usage = MemoryUsage::for_study(&study);
    north.estimate_memory_usage(&mut usage);
    // five static variables, two years each
    assert_eq!(usage.disk_timeseries, 10);
    assert_eq!(usage.required_memory, 7 * per_column + 10 * 64);

    study.mode = SimulationMode::AdequacyDraft;
    let mut usage = MemoryUsage::for_study(&study);
    north.estimate_memory_usage(&mut usage);
    assert_eq!(usage.disk_timeseries, 0);

    assert!(vars.memory_usage() > 0);
}

#[test]
fn variable_tree_groups_gui_nodes() {
    let mut tree = VariableTree::new("study");
    StudyVariables::provide_informations(&mut tree).unwrap();
    let areas = &tree.children[0];
    assert_eq!(areas.caption, "Areas");
    assert_eq!(areas.cards, vec!["OV. COST", "LOAD", "UNSP. ENRG", "MRG. PRICE"]);
    let nodes: Vec<&str> = areas.children.iter().map(|c| c.caption.as_str()).collect();
    assert_eq!(nodes, vec!["GENERATION BY FUEL", "DTG BY PLANT"]);
    assert_eq!(tree.children[1].cards, vec!["FLOW LIN."]);
}
