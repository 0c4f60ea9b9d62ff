//! rf-variables: output variable pipelines.
//!
//! A [`Pipeline`] is the ordered list of output variables of one entity (an
//! area, a link or a set of areas). Every lifecycle event is forwarded to
//! every variable in registration order. Reports are built by filtering each
//! variable with the category masks of its [`VariableCard`] and the print
//! flags read from the registry.
//!
//! [`StudyVariables`] owns the pipelines of a whole study and drives them in
//! parallel over entities.

pub mod aggregate;
pub mod card;
pub mod catalog;
pub mod error;
pub mod info;
pub mod pipeline;
pub mod results;
pub mod state;
pub mod study_vars;
pub mod survey;
pub mod variable;

pub use aggregate::{AggregateScope, SpatialAccumulator};
pub use card::{ResultKind, SpatialAggregate, TimeAggregate, VariableCard, VariableKey};
pub use error::{PipelineError, PipelineResult};
pub use info::{InformationSink, VariableInfo, VariableListSink, VariableListing, VariableTree};
pub use pipeline::Pipeline;
pub use results::{ColumnResults, IntermediateValues, VariableResults, YearStatistics};
pub use state::{EntityRef, State};
pub use study_vars::StudyVariables;
pub use survey::{DigestLevel, DigestRow, ReportSection, SurveyResults, write_digest};
pub use variable::{PrintFlags, Variable, VariableBase};
