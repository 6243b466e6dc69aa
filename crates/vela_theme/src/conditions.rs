//! Runtime conditions
//!
//! The three built-in theme axes derived from the device environment.
//! `None` in any field means the condition has not been observed yet.

use serde::{Deserialize, Serialize};

use crate::qualifier::{LAND, LDLTR, LDRTL, PORT};

/// Text layout direction
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    Ltr,
    Rtl,
}

impl LayoutDirection {
    pub fn from_rtl(is_rtl: bool) -> Self {
        if is_rtl {
            Self::Rtl
        } else {
            Self::Ltr
        }
    }

    /// Qualifier tag for this direction
    pub fn tag(self) -> &'static str {
        match self {
            Self::Ltr => LDLTR,
            Self::Rtl => LDRTL,
        }
    }
}

/// Screen orientation
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Landscape only when strictly wider than tall; a square window is portrait
    pub fn from_dimensions(width: f32, height: f32) -> Self {
        if width > height {
            Self::Landscape
        } else {
            Self::Portrait
        }
    }

    /// Qualifier tag for this orientation
    pub fn tag(self) -> &'static str {
        match self {
            Self::Landscape => LAND,
            Self::Portrait => PORT,
        }
    }
}

/// Immutable snapshot of the built-in conditions
#[derive(Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ConditionSet {
    pub layout_direction: Option<LayoutDirection>,
    pub orientation: Option<Orientation>,
    /// Selected breakpoint tag, e.g. `sw600`
    pub smallest_width: Option<String>,
}

impl ConditionSet {
    /// Tags contributed by the conditions that are known
    pub fn tags(&self) -> impl Iterator<Item = &str> + '_ {
        self.layout_direction
            .map(LayoutDirection::tag)
            .into_iter()
            .chain(self.orientation.map(Orientation::tag))
            .chain(self.smallest_width.as_deref())
    }
}
