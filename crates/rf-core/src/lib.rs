//! rf-core: stable foundation for resultflow.
//!
//! Contains:
//! - ids (compact identifiers for areas, links and thermal clusters)
//! - category (data level / file level / precision bitmasks)
//! - columns (column-count shape of an output variable)
//! - calendar (hour to period mapping for each precision)
//! - study (entity identifiers consumed from the simulation model)
//! - memory (memory and disk estimates)
//! - numeric (result value type and the whole-number test)
//! - error (shared error types)

pub mod calendar;
pub mod category;
pub mod columns;
pub mod error;
pub mod ids;
pub mod memory;
pub mod numeric;
pub mod study;

// Re-exports: nice ergonomics for downstream crates
pub use calendar::Calendar;
pub use category::{DataLevel, FileLevel, Precision};
pub use columns::ColumnCount;
pub use error::{RfError, RfResult};
pub use ids::*;
pub use memory::MemoryUsage;
pub use numeric::*;
pub use study::{AreaInfo, AreaSet, LinkInfo, SimulationMode, StudyContext, ThermalClusterInfo};
