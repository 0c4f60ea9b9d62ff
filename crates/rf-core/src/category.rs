//! Category bitmasks used to route variables into reports.
//!
//! The three masks are opaque to the pipeline: it only ever tests whether a
//! requested mask intersects the mask a variable was registered with.
//! - [`DataLevel`]: granularity of the entity a variable reports on
//! - [`FileLevel`]: kind of report file a variable is written to
//! - [`Precision`]: time granularity of the written values

use core::fmt;
use core::ops::{BitAnd, BitOr};

macro_rules! category_mask {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(u32);

        impl $name {
            pub const NONE: Self = Self(0);

            pub const fn from_bits(bits: u32) -> Self {
                Self(bits)
            }

            pub const fn bits(self) -> u32 {
                self.0
            }

            pub const fn union(self, other: Self) -> Self {
                Self(self.0 | other.0)
            }

            /// True when at least one bit is shared.
            pub const fn intersects(self, other: Self) -> bool {
                self.0 & other.0 != 0
            }

            pub const fn is_empty(self) -> bool {
                self.0 == 0
            }
        }

        impl BitOr for $name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            fn bitand(self, rhs: Self) -> Self {
                Self(self.0 & rhs.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:#x})", stringify!($name), self.0)
            }
        }
    };
}

category_mask!(
    /// Granularity of the entity a variable reports on.
    DataLevel
);

impl DataLevel {
    pub const AREA: Self = Self(1);
    pub const THERMAL_AGGREGATE: Self = Self(2);
    pub const LINK: Self = Self(4);
    pub const SET_OF_AREAS: Self = Self(8);
}

category_mask!(
    /// Kind of report file a variable is written to.
    FileLevel
);

impl FileLevel {
    pub const VALUES: Self = Self(1);
    pub const ID: Self = Self(2);
    pub const DETAILS: Self = Self(4);
    pub const DETAILS_RES: Self = Self(8);

    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::VALUES => "values",
            Self::ID => "id",
            Self::DETAILS => "details",
            Self::DETAILS_RES => "details-res",
            _ => "mixed",
        }
    }
}

category_mask!(
    /// Time granularity of the written values.
    Precision
);

impl Precision {
    pub const HOURLY: Self = Self(1);
    pub const DAILY: Self = Self(2);
    pub const WEEKLY: Self = Self(4);
    pub const MONTHLY: Self = Self(8);
    pub const ANNUAL: Self = Self(16);
    pub const ALL: Self = Self(31);

    /// Single-bit precisions, finest first.
    pub const LEVELS: [Self; 5] = [
        Self::HOURLY,
        Self::DAILY,
        Self::WEEKLY,
        Self::MONTHLY,
        Self::ANNUAL,
    ];

    /// Position of a single-bit precision in [`Precision::LEVELS`].
    pub fn level_index(self) -> Option<usize> {
        Self::LEVELS.iter().position(|&level| level == self)
    }

    /// Single-bit precisions contained in this mask, finest first.
    pub fn levels(self) -> impl Iterator<Item = Self> {
        Self::LEVELS
            .into_iter()
            .filter(move |level| self.intersects(*level))
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Self::HOURLY => "hourly",
            Self::DAILY => "daily",
            Self::WEEKLY => "weekly",
            Self::MONTHLY => "monthly",
            Self::ANNUAL => "annual",
            _ => "mixed",
        }
    }
}
