use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Standard BGP community, split the way ExaBGP renders it: `[semantics, as-number]`.
///
/// ## Display
///
/// Displayed as `SEMANTICS:AS_NUMBER`, e.g. `100:3`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Community {
    pub semantics: u32,
    pub as_number: u32,
}

impl Community {
    pub fn new(semantics: u32, as_number: u32) -> Community {
        Community {
            semantics,
            as_number,
        }
    }
}

impl From<(u32, u32)> for Community {
    fn from((semantics, as_number): (u32, u32)) -> Self {
        Community::new(semantics, as_number)
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.semantics, self.as_number)
    }
}
