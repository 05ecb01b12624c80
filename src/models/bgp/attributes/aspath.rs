use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// AS number as carried in the AS-PATH attribute.
pub type Asn = u32;

/// One segment of an AS-PATH attribute.
///
/// ExaBGP renders the path as a flat list of AS numbers, so normalized routes only ever carry a
/// single [AsPathSegment::AsSequence]. AS-SET and confederation segments are not represented.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsPathSegment {
    #[serde(rename = "as-sequence")]
    AsSequence(Vec<Asn>),
}

impl AsPathSegment {
    /// Shorthand for creating an `AsSequence` segment.
    pub fn sequence<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPathSegment::AsSequence(seq.as_ref().to_vec())
    }

    /// Number of ASNs within the segment.
    pub fn len(&self) -> usize {
        self.as_ref().len()
    }

    /// Returns true if this segment has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.as_ref().is_empty()
    }
}

impl AsRef<[Asn]> for AsPathSegment {
    fn as_ref(&self) -> &[Asn] {
        match self {
            AsPathSegment::AsSequence(x) => x,
        }
    }
}

impl Display for AsPathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_ref().iter().join(" "))
    }
}
