//! Variable node trait and the state shared by every node.

use rf_core::{AreaId, ClusterId, ColumnCount, LinkId, StudyContext};

use crate::card::VariableCard;
use crate::results::VariableResults;
use crate::state::{EntityRef, State};

/// Per-column print and applicability flags, sized once from the card.
///
/// Single and dynamic variables hold one flag for their whole result set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintFlags {
    printed: Box<[bool]>,
    non_applicable: Box<[bool]>,
}

impl PrintFlags {
    pub fn new(columns: ColumnCount) -> Self {
        let width = columns.flag_width();
        Self {
            printed: vec![true; width].into_boxed_slice(),
            non_applicable: vec![false; width].into_boxed_slice(),
        }
    }

    pub fn printed(&self) -> &[bool] {
        &self.printed
    }

    pub fn non_applicable(&self) -> &[bool] {
        &self.non_applicable
    }

    pub fn set_printed(&mut self, index: usize, printed: bool) {
        if let Some(flag) = self.printed.get_mut(index) {
            *flag = printed;
        }
    }

    pub fn fill_non_applicable(&mut self, value: bool) {
        self.non_applicable.fill(value);
    }

    /// Flag of result column `column`; shared flags apply to every column.
    pub fn is_printed(&self, column: usize) -> bool {
        flag_at(&self.printed, column)
    }

    pub fn is_non_applicable(&self, column: usize) -> bool {
        flag_at(&self.non_applicable, column)
    }
}

fn flag_at(flags: &[bool], column: usize) -> bool {
    match flags {
        [] => false,
        [shared] => *shared,
        _ => flags.get(column).copied().unwrap_or(false),
    }
}

/// Card, flags and results of a node.
#[derive(Clone, Debug)]
pub struct VariableBase {
    pub card: &'static VariableCard,
    pub flags: PrintFlags,
    pub results: VariableResults,
    pub entity: Option<EntityRef>,
}

impl VariableBase {
    pub fn new(card: &'static VariableCard) -> Self {
        Self {
            card,
            flags: PrintFlags::new(card.columns),
            results: VariableResults::default(),
            entity: None,
        }
    }

    /// Allocate the static columns.
    pub fn initialize(&mut self, study: &StudyContext) {
        let labels: Vec<&str> = match self.card.columns {
            ColumnCount::Single => vec![self.card.caption],
            ColumnCount::Fixed(n) => (0..n as usize).map(|i| self.card.column_caption(i)).collect(),
            ColumnCount::Dynamic => Vec::new(),
        };
        self.results
            .initialize(study.calendar(), study.parallel_spaces, labels);
    }

    /// Store the hourly value of `column` for the current hour.
    pub fn record(&mut self, state: &State, column: usize, space: usize, value: f64) {
        if let Some(values) = self
            .results
            .column_mut(column)
            .and_then(|c| c.space_mut(space))
        {
            values.set_hour(state.hour_in_year, value);
        }
    }

    /// Read the sample of every column of this node's entity.
    pub fn record_entity_samples(&mut self, state: &State, space: usize) {
        let Some(entity) = self.entity else {
            return;
        };
        for column in 0..self.results.column_count() {
            let value = state.sample(entity, self.card.key, column);
            self.record(state, column, space, value);
        }
    }
}

/// One output variable of a pipeline.
///
/// Hooks default to no-ops, except for the year boundaries which maintain
/// the results of [`VariableBase`]. Hooks taking a space only touch that
/// space's intermediate values.
pub trait Variable: Send {
    fn base(&self) -> &VariableBase;

    fn base_mut(&mut self) -> &mut VariableBase;

    fn card(&self) -> &'static VariableCard {
        self.base().card
    }

    fn initialize_from_study(&mut self, study: &StudyContext) {
        self.base_mut().initialize(study);
    }

    fn initialize_from_area(&mut self, _study: &StudyContext, area: AreaId) {
        self.base_mut().entity = Some(EntityRef::Area(area));
    }

    fn initialize_from_link(&mut self, _study: &StudyContext, link: LinkId) {
        self.base_mut().entity = Some(EntityRef::Link(link));
    }

    fn initialize_from_thermal_cluster(&mut self, _study: &StudyContext, _cluster: ClusterId) {}

    fn initialize_from_area_set(&mut self, _study: &StudyContext, set: usize) {
        self.base_mut().entity = Some(EntityRef::AreaSet(set));
    }

    fn simulation_begin(&mut self) {}

    fn simulation_end(&mut self) {}

    fn year_begin(&mut self, _year: u32, space: usize) {
        self.base_mut().results.year_begin(space);
    }

    fn year_end(&mut self, _year: u32, space: usize) {
        let aggregate = self.card().time_aggregate;
        self.base_mut().results.year_end(space, aggregate);
    }

    fn before_year_by_year_export(&mut self, _year: u32, _space: usize) {}

    fn week_begin(&mut self, _state: &State) {}

    fn week_for_each_area(&mut self, _state: &State, _space: usize) {}

    fn week_end(&mut self, _state: &State, _space: usize) {}

    fn hour_begin(&mut self, _hour: usize) {}

    fn hour_for_each_area(&mut self, _state: &State, _space: usize) {}

    fn hour_for_each_thermal_cluster(
        &mut self,
        _state: &State,
        _cluster: ClusterId,
        _space: usize,
    ) {
    }

    fn hour_for_each_link(&mut self, _state: &State, _space: usize) {}

    fn hour_end(&mut self, _state: &State, _space: usize) {}
}
