//! VLAN id representation.
//!
//! vCenter reports a port group's VLAN setting in several shapes: a single
//! id for VLAN tagging, a list of id ranges for trunking, or a private VLAN
//! id. [`VlanId`] captures all of them and renders the display form used in
//! network data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A VLAN id as configured on a port group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VlanId {
    /// A single numeric id.
    Number(i64),
    /// An id already in text form.
    Text(String),
    /// An inclusive id range.
    Range { start: i64, end: i64 },
    /// A trunk specification; `None` entries are ignored.
    List(Vec<Option<VlanId>>),
}

impl VlanId {
    /// Whether the id carries no value.
    ///
    /// Id `0`, empty text and an empty list are all treated as unset. A
    /// range is never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            VlanId::Number(id) => *id == 0,
            VlanId::Text(text) => text.is_empty(),
            VlanId::Range { .. } => false,
            VlanId::List(ids) => ids.is_empty(),
        }
    }
}

impl fmt::Display for VlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        match self {
            VlanId::Number(id) => write!(f, "{}", id),
            VlanId::Text(text) => f.write_str(text),
            VlanId::Range { start, end } if start == end => write!(f, "{}", start),
            VlanId::Range { start, end } => write!(f, "{}-{}", start, end),
            VlanId::List(ids) => {
                let parts: Vec<String> = ids
                    .iter()
                    .flatten()
                    .filter(|id| !id.is_empty())
                    .map(VlanId::to_string)
                    .collect();
                f.write_str(&parts.join(","))
            }
        }
    }
}
