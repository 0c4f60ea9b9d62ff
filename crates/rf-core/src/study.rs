//! Identifiers consumed from the simulation model.
//!
//! The physical model lives elsewhere; this is only what output variables
//! need to size their buffers and to name the entities they report on.

use crate::calendar::{Calendar, DEFAULT_HOURS_IN_YEAR};
use crate::error::{RfError, RfResult};
use crate::ids::{AreaId, ClusterId, LinkId};

/// Simulation mode of the study.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SimulationMode {
    #[default]
    Economy,
    Adequacy,
    /// Quick adequacy pass, never writes year-by-year output.
    AdequacyDraft,
}

impl SimulationMode {
    pub fn is_draft(self) -> bool {
        matches!(self, Self::AdequacyDraft)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaInfo {
    pub id: AreaId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkInfo {
    pub id: LinkId,
    pub name: String,
    pub from: AreaId,
    pub to: AreaId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThermalClusterInfo {
    pub id: ClusterId,
    pub name: String,
    pub area: AreaId,
}

/// Named subset of areas reported as a whole.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaSet {
    pub name: String,
    pub areas: Vec<AreaId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StudyContext {
    pub hours_in_year: usize,
    pub nb_years: u32,
    /// Independent execution slots, one per concurrently simulated year.
    pub parallel_spaces: usize,
    pub year_by_year: bool,
    pub mode: SimulationMode,
    pub areas: Vec<AreaInfo>,
    pub links: Vec<LinkInfo>,
    pub thermal_clusters: Vec<ThermalClusterInfo>,
    pub area_sets: Vec<AreaSet>,
}

impl Default for StudyContext {
    fn default() -> Self {
        Self::new(DEFAULT_HOURS_IN_YEAR, 1)
    }
}

impl StudyContext {
    pub fn new(hours_in_year: usize, nb_years: u32) -> Self {
        Self {
            hours_in_year,
            nb_years,
            parallel_spaces: 1,
            year_by_year: false,
            mode: SimulationMode::default(),
            areas: Vec::new(),
            links: Vec::new(),
            thermal_clusters: Vec::new(),
            area_sets: Vec::new(),
        }
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.hours_in_year)
    }

    /// Add an area and return its ID.
    pub fn add_area(&mut self, name: impl Into<String>) -> AreaId {
        let id = AreaId::from_index(self.areas.len() as u32);
        self.areas.push(AreaInfo {
            id,
            name: name.into(),
        });
        id
    }

    /// Add a link between two areas and return its ID.
    pub fn add_link(&mut self, from: AreaId, to: AreaId) -> LinkId {
        let id = LinkId::from_index(self.links.len() as u32);
        let name = format!(
            "{} - {}",
            self.area_name(from).unwrap_or("?"),
            self.area_name(to).unwrap_or("?")
        );
        self.links.push(LinkInfo { id, name, from, to });
        id
    }

    /// Add a thermal cluster to an area and return its ID.
    pub fn add_thermal_cluster(&mut self, area: AreaId, name: impl Into<String>) -> ClusterId {
        let id = ClusterId::from_index(self.thermal_clusters.len() as u32);
        self.thermal_clusters.push(ThermalClusterInfo {
            id,
            name: name.into(),
            area,
        });
        id
    }

    pub fn add_area_set(&mut self, name: impl Into<String>, areas: Vec<AreaId>) {
        self.area_sets.push(AreaSet {
            name: name.into(),
            areas,
        });
    }

    pub fn area(&self, id: AreaId) -> Option<&AreaInfo> {
        self.areas.get(id.index() as usize).filter(|a| a.id == id)
    }

    pub fn area_name(&self, id: AreaId) -> Option<&str> {
        self.area(id).map(|a| a.name.as_str())
    }

    pub fn link(&self, id: LinkId) -> Option<&LinkInfo> {
        self.links.get(id.index() as usize).filter(|l| l.id == id)
    }

    pub fn thermal_cluster(&self, id: ClusterId) -> Option<&ThermalClusterInfo> {
        self.thermal_clusters
            .get(id.index() as usize)
            .filter(|c| c.id == id)
    }

    /// Thermal clusters of an area, in registration order.
    pub fn clusters_of(&self, area: AreaId) -> impl Iterator<Item = &ThermalClusterInfo> + '_ {
        self.thermal_clusters
            .iter()
            .filter(move |c| c.area == area)
    }

    /// Position of a cluster among the clusters of its area.
    pub fn cluster_index_in_area(&self, cluster: ClusterId) -> Option<usize> {
        let info = self.thermal_cluster(cluster)?;
        self.clusters_of(info.area).position(|c| c.id == cluster)
    }

    /// Check that every cross reference points at a known entity.
    pub fn validate(&self) -> RfResult<()> {
        if self.hours_in_year == 0 {
            return Err(RfError::InvalidArg {
                what: "hours_in_year must be positive",
            });
        }
        if self.parallel_spaces == 0 {
            return Err(RfError::InvalidArg {
                what: "parallel_spaces must be positive",
            });
        }
        for link in &self.links {
            for end in [link.from, link.to] {
                if self.area(end).is_none() {
                    return Err(RfError::UnknownEntity {
                        what: "area",
                        id: end.index(),
                    });
                }
            }
        }
        for cluster in &self.thermal_clusters {
            if self.area(cluster.area).is_none() {
                return Err(RfError::UnknownEntity {
                    what: "area",
                    id: cluster.area.index(),
                });
            }
        }
        for set in &self.area_sets {
            if let Some(missing) = set.areas.iter().find(|a| self.area(**a).is_none()) {
                return Err(RfError::UnknownEntity {
                    what: "area",
                    id: missing.index(),
                });
            }
        }
        Ok(())
    }
}
