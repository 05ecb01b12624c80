//! MPLS label stack carried with Labeled-Unicast NLRI.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt::{Display, Formatter};

/// Largest value a 20-bit MPLS label can hold.
pub const MAX_LABEL_VALUE: u32 = (1 << 20) - 1;

/// A single MPLS label.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Label {
    pub label_value: u32,
}

impl Label {
    pub fn new(label_value: u32) -> Label {
        Label { label_value }
    }
}

/// Ordered label stack, outermost label first. Most routes carry one or two labels.
pub type LabelStack = SmallVec<[Label; 4]>;

/// Wrapper to display a label stack as `18/24/...`.
pub struct DisplayLabels<'a>(pub &'a [Label]);

impl Display for DisplayLabels<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().map(|l| l.label_value).join("/"))
    }
}
