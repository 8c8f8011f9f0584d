use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A staffed resource (person or unit) with its per-quarter allocation.
///
/// `quarterly_allocation` maps canonical quarter labels to the fraction of
/// capacity allocated in that quarter. Values above 1.0 are legal and mean
/// overcommitment. The validator guarantees every key parses as a quarter
/// label and that at least one entry is present.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceAllocation {
    pub name: String,
    pub area: String,
    pub quarterly_allocation: BTreeMap<String, f64>,
}

impl ResourceAllocation {
    /// Two records describe the same resource when both name and area match.
    pub fn same_resource(&self, other: &ResourceAllocation) -> bool {
        self.name == other.name && self.area == other.area
    }

    /// Merge another record for the same resource: new quarter keys are
    /// added, existing keys take the newer value.
    pub fn merge_quarters(&mut self, other: &ResourceAllocation) {
        for (quarter, value) in &other.quarterly_allocation {
            self.quarterly_allocation.insert(quarter.clone(), *value);
        }
    }
}

// Resources go out the same way they come in: quarter labels flattened to
// top-level keys next to name and area.
impl Serialize for ResourceAllocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2 + self.quarterly_allocation.len()))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry("area", &self.area)?;
        for (quarter, value) in &self.quarterly_allocation {
            map.serialize_entry(quarter, value)?;
        }
        map.end()
    }
}

/// A resource record as it arrives in an upload, before validation.
///
/// Kept loosely typed on purpose: missing fields default instead of failing
/// deserialization, and quarter values stay `serde_json::Value`, so the
/// validator can report per-record, per-field issues rather than the
/// transport layer rejecting the whole body with an opaque serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct RawResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area: String,
    /// Everything that is not name/area — expected to be quarter columns.
    #[serde(flatten)]
    pub quarters: BTreeMap<String, serde_json::Value>,
}
