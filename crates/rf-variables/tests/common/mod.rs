#![allow(dead_code)]

use rf_core::{AreaId, ClusterId, LinkId, StudyContext};
use rf_variables::catalog::{FLOW_LINEAR, LOAD, MARGINAL_PRICE};
use rf_variables::{EntityRef, State, StudyVariables};

pub const HOURS: usize = 48;

pub struct SmallStudy {
    pub study: StudyContext,
    pub north: AreaId,
    pub south: AreaId,
    pub link: LinkId,
    pub n1: ClusterId,
    pub n2: ClusterId,
}

/// Two areas, one link, two clusters in the north, one set with both areas.
pub fn small_study() -> SmallStudy {
    let mut study = StudyContext::new(HOURS, 2);
    study.parallel_spaces = 2;
    let north = study.add_area("north");
    let south = study.add_area("south");
    let link = study.add_link(north, south);
    let n1 = study.add_thermal_cluster(north, "n1");
    let n2 = study.add_thermal_cluster(north, "n2");
    study.add_area_set("all", vec![north, south]);
    SmallStudy {
        study,
        north,
        south,
        link,
        n1,
        n2,
    }
}

/// Drive one year through every hour, letting `fill` write the samples.
pub fn run_year(
    vars: &mut StudyVariables,
    year: u32,
    space: usize,
    fill: impl Fn(&mut State, usize),
) {
    vars.year_begin(year, space).unwrap();
    let mut state = State::new(year);
    for hour in 0..HOURS {
        state.start_hour(hour);
        fill(&mut state, hour);
        if hour % 168 == 0 {
            vars.week_begin(&state);
        }
        vars.hour_begin(hour);
        vars.hour_for_each_area(&state, space).unwrap();
        vars.hour_for_each_link(&state, space).unwrap();
        vars.hour_end(&state, space).unwrap();
    }
    vars.week_for_each_area(&state, space).unwrap();
    vars.week_end(&state, space).unwrap();
    vars.year_end(year, space).unwrap();
}

/// Constant load, price and flow for every hour.
pub fn constant_fill(s: &SmallStudy, north_load: f64, south_load: f64) -> impl Fn(&mut State, usize) {
    let (north, south, link) = (s.north, s.south, s.link);
    move |state, _hour| {
        state.set(EntityRef::Area(north), LOAD.key, 0, north_load);
        state.set(EntityRef::Area(south), LOAD.key, 0, south_load);
        state.set(EntityRef::Area(north), MARGINAL_PRICE.key, 0, 10.0);
        state.set(EntityRef::Area(south), MARGINAL_PRICE.key, 0, 30.0);
        state.set(EntityRef::Link(link), FLOW_LINEAR.key, 0, -5.0);
    }
}
