use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A clinical trial. `name` is the primary key: re-uploading a trial with an
/// existing name replaces the stored record wholesale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trial {
    pub name: String,
    pub area: String,
    pub subjects: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// A trial record as uploaded, before validation. Loosely typed for the same
/// reason as `RawResource`: the validator owns the diagnostics.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrial {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub subjects: serde_json::Value,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}
