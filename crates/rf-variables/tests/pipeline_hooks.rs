use std::sync::{Arc, Mutex};

use rf_core::{ColumnCount, StudyContext};
use rf_variables::*;

static FIRST: VariableCard = VariableCard {
    key: VariableKey("FIRST"),
    caption: "FIRST",
    ..VariableCard::DEFAULT
};

static SECOND: VariableCard = VariableCard {
    key: VariableKey("SECOND"),
    caption: "SECOND",
    columns: ColumnCount::Fixed(2),
    column_captions: &["SECOND A", "SECOND B"],
    possibly_non_applicable: true,
    ..VariableCard::DEFAULT
};

static THIRD: VariableCard = VariableCard {
    key: VariableKey("THIRD"),
    caption: "THIRD",
    columns: ColumnCount::Dynamic,
    ..VariableCard::DEFAULT
};

type Journal = Arc<Mutex<Vec<String>>>;

struct Recorder {
    base: VariableBase,
    journal: Journal,
}

impl Recorder {
    fn boxed(card: &'static VariableCard, journal: &Journal) -> Box<dyn Variable> {
        Box::new(Self {
            base: VariableBase::new(card),
            journal: journal.clone(),
        })
    }

    fn log(&self, event: &str) {
        self.journal
            .lock()
            .unwrap()
            .push(format!("{}:{event}", self.base.card.caption));
    }
}

impl Variable for Recorder {
    fn base(&self) -> &VariableBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut VariableBase {
        &mut self.base
    }

    fn simulation_begin(&mut self) {
        self.log("simulation_begin");
    }

    fn hour_begin(&mut self, _hour: usize) {
        self.log("hour_begin");
    }

    fn hour_for_each_area(&mut self, _state: &State, space: usize) {
        self.log(&format!("hour_for_each_area@{space}"));
    }
}

fn pipeline(journal: &Journal) -> Pipeline {
    let mut p = Pipeline::new();
    p.push(Recorder::boxed(&FIRST, journal)).unwrap();
    p.push(Recorder::boxed(&SECOND, journal)).unwrap();
    p.push(Recorder::boxed(&THIRD, journal)).unwrap();
    let mut study = StudyContext::new(24, 1);
    study.parallel_spaces = 2;
    p.initialize_from_study(&study);
    p
}

#[test]
fn every_node_sees_every_event_in_order() {
    let journal = Journal::default();
    let mut p = pipeline(&journal);

    p.simulation_begin();
    p.hour_begin(0);
    p.hour_for_each_area(&State::new(0), 1).unwrap();

    let events = journal.lock().unwrap().clone();
    assert_eq!(
        events,
        vec![
            "FIRST:simulation_begin",
            "SECOND:simulation_begin",
            "THIRD:simulation_begin",
            "FIRST:hour_begin",
            "SECOND:hour_begin",
            "THIRD:hour_begin",
            "FIRST:hour_for_each_area@1",
            "SECOND:hour_for_each_area@1",
            "THIRD:hour_for_each_area@1",
        ]
    );
}

#[test]
fn invalid_space_is_rejected_before_any_node_runs() {
    let journal = Journal::default();
    let mut p = pipeline(&journal);
    let err = p.hour_for_each_area(&State::new(0), 2).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidSpace { space: 2, spaces: 2 }));
    assert!(journal.lock().unwrap().is_empty());
}

#[test]
fn duplicate_keys_are_a_configuration_error() {
    let journal = Journal::default();
    let mut p = pipeline(&journal);
    let err = p.push(Recorder::boxed(&FIRST, &journal)).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigurationIntegrity { .. }));
    assert_eq!(p.len(), 3);
}

#[test]
fn keyed_retrieval() {
    let journal = Journal::default();
    let p = pipeline(&journal);
    assert_eq!(p.retrieve_results(SECOND.key).unwrap().column_count(), 2);
    assert_eq!(p.retrieve_results(THIRD.key).unwrap().column_count(), 0);
    assert!(p.retrieve_hourly_results_for_current_year(THIRD.key, 0).unwrap().is_none());

    let hourly = p
        .retrieve_hourly_results_for_current_year(SECOND.key, 0)
        .unwrap()
        .unwrap();
    assert_eq!(hourly.len(), 2);
    assert_eq!(hourly[0].len(), 24);

    let err = p.retrieve_results(VariableKey("MISSING")).unwrap_err();
    assert!(matches!(err, PipelineError::ConfigurationIntegrity { .. }));
}

#[test]
fn non_applicability_only_marks_flagged_variables() {
    let journal = Journal::default();
    let mut p = pipeline(&journal);

    p.broadcast_non_applicability(true);
    assert_eq!(p.node(FIRST.key).unwrap().base().flags.non_applicable(), &[false]);
    assert_eq!(p.node(SECOND.key).unwrap().base().flags.non_applicable(), &[true, true]);

    p.broadcast_non_applicability(false);
    assert_eq!(p.node(SECOND.key).unwrap().base().flags.non_applicable(), &[false, false]);
}

#[test]
fn variable_list_follows_column_shape() {
    let journal = Journal::default();
    let p = pipeline(&journal);
    let mut listing = VariableListing::default();
    p.retrieve_variable_list(&mut listing);
    let captions: Vec<&str> = listing.captions().collect();
    assert_eq!(captions, vec!["FIRST", "SECOND A", "SECOND B", "THIRD"]);

    let json = listing.to_json().unwrap();
    assert!(json.contains("\"SECOND B\""));
}
