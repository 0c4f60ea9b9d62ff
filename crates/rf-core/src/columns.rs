//! Column-count shape of an output variable.

/// How many columns a variable produces.
///
/// `Dynamic` variables only learn their width at runtime (one column per
/// thermal cluster for instance); they are excluded from static estimates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnCount {
    Single,
    Dynamic,
    Fixed(u32),
}

impl ColumnCount {
    /// Sentinel used by persisted registries for dynamic widths.
    pub const DYNAMIC_SENTINEL: i32 = -1;

    /// Width known before the simulation, if any.
    pub fn static_width(self) -> Option<u32> {
        match self {
            Self::Single => Some(1),
            Self::Fixed(n) => Some(n),
            Self::Dynamic => None,
        }
    }

    /// Length of the per-variable print/applicability flag arrays.
    ///
    /// Single and dynamic variables hold one flag for the whole result set.
    pub fn flag_width(self) -> usize {
        match self {
            Self::Fixed(n) => (n as usize).max(1),
            Self::Single | Self::Dynamic => 1,
        }
    }

    pub fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// A fixed shape with no column at all.
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Fixed(0))
    }

    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::DYNAMIC_SENTINEL => Self::Dynamic,
            1 => Self::Single,
            n => Self::Fixed(n.max(0) as u32),
        }
    }

    pub fn to_raw(self) -> i32 {
        match self {
            Self::Single => 1,
            Self::Dynamic => Self::DYNAMIC_SENTINEL,
            Self::Fixed(n) => n as i32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_width_never_zero() {
        assert_eq!(ColumnCount::Single.flag_width(), 1);
        assert_eq!(ColumnCount::Dynamic.flag_width(), 1);
        assert_eq!(ColumnCount::Fixed(0).flag_width(), 1);
        assert_eq!(ColumnCount::Fixed(3).flag_width(), 3);
    }

    #[test]
    fn raw_sentinel() {
        assert_eq!(ColumnCount::from_raw(-1), ColumnCount::Dynamic);
        assert_eq!(ColumnCount::from_raw(1), ColumnCount::Single);
        assert_eq!(ColumnCount::from_raw(4), ColumnCount::Fixed(4));
        assert_eq!(ColumnCount::Dynamic.to_raw(), -1);
        assert_eq!(ColumnCount::Fixed(7).to_raw(), 7);
    }

    #[test]
    fn static_width() {
        assert_eq!(ColumnCount::Single.static_width(), Some(1));
        assert_eq!(ColumnCount::Fixed(5).static_width(), Some(5));
        assert_eq!(ColumnCount::Dynamic.static_width(), None);
    }
}
