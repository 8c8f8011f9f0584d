use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::quarter::Quarter;
use crate::models::resource::{RawResource, ResourceAllocation};
use crate::models::trial::{RawTrial, Trial};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One ingestion payload: zero or more resources and trials, admitted
/// atomically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBatch {
    #[serde(default)]
    pub resources: Vec<RawResource>,
    #[serde(default)]
    pub trials: Vec<RawTrial>,
}

/// One failed check on one record of a batch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldIssue {
    /// Which record, e.g. "resources[2]" or "trials[0]".
    pub record: String,
    pub field: String,
    pub reason: String,
}

/// Rejection of a whole batch. Ingestion is all-or-nothing, so every failing
/// record is enumerated — the caller gets the complete picture in one round
/// trip instead of fixing records one at a time.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch rejected: {} validation issue(s)", self.issues.len())
    }
}

impl std::error::Error for ValidationError {}

/// A batch that passed every check, ready for the store.
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub resources: Vec<ResourceAllocation>,
    pub trials: Vec<Trial>,
}

/// Validate an uploaded batch. Pure: no store access, no side effects.
/// Either every record is admissible or the whole batch is rejected with
/// per-record diagnostics.
pub fn validate(batch: &RawBatch) -> Result<ValidatedBatch, ValidationError> {
    let mut issues = Vec::new();
    let mut validated = ValidatedBatch::default();

    for (i, raw) in batch.resources.iter().enumerate() {
        if let Some(resource) = validate_resource(raw, i, &mut issues) {
            validated.resources.push(resource);
        }
    }
    for (i, raw) in batch.trials.iter().enumerate() {
        if let Some(trial) = validate_trial(raw, i, &mut issues) {
            validated.trials.push(trial);
        }
    }

    if issues.is_empty() {
        Ok(validated)
    } else {
        Err(ValidationError { issues })
    }
}

fn validate_resource(
    raw: &RawResource,
    index: usize,
    issues: &mut Vec<FieldIssue>,
) -> Option<ResourceAllocation> {
    let record = format!("resources[{index}]");
    let before = issues.len();

    if raw.name.trim().is_empty() {
        push(issues, &record, "name", "must be a non-empty string");
    }
    if raw.area.trim().is_empty() {
        push(issues, &record, "area", "must be a non-empty string");
    }

    let mut quarterly_allocation = BTreeMap::new();
    for (key, value) in &raw.quarters {
        if !Quarter::is_valid_label(key) {
            push(issues, &record, key, "is not a valid quarter label (expected Q[1-4]-YYYY)");
            continue;
        }
        match value.as_f64() {
            Some(v) if v >= 0.0 => {
                quarterly_allocation.insert(key.clone(), v);
            }
            Some(_) => push(issues, &record, key, "allocation must not be negative"),
            None => push(issues, &record, key, "allocation must be a number"),
        }
    }
    if raw.quarters.is_empty() {
        push(issues, &record, "quarterly allocation", "at least one quarter entry is required");
    }

    if issues.len() > before {
        return None;
    }
    Some(ResourceAllocation {
        name: raw.name.clone(),
        area: raw.area.clone(),
        quarterly_allocation,
    })
}

fn validate_trial(raw: &RawTrial, index: usize, issues: &mut Vec<FieldIssue>) -> Option<Trial> {
    let record = format!("trials[{index}]");
    let before = issues.len();

    if raw.name.trim().is_empty() {
        push(issues, &record, "name", "must be a non-empty string");
    }
    if raw.area.trim().is_empty() {
        push(issues, &record, "area", "must be a non-empty string");
    }

    let subjects = match raw.subjects.as_i64() {
        Some(n) if n > 0 => match u32::try_from(n) {
            Ok(n) => Some(n),
            Err(_) => {
                push(issues, &record, "subjects", "is out of range for an enrollment target");
                None
            }
        },
        Some(_) => {
            push(issues, &record, "subjects", "must be a positive integer");
            None
        }
        None => {
            push(issues, &record, "subjects", "must be an integer");
            None
        }
    };

    let start_date = parse_date(&raw.start_date, &record, "start_date", issues);
    let end_date = parse_date(&raw.end_date, &record, "end_date", issues);
    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start > end {
            push(issues, &record, "start_date", "must not be after end_date");
        }
    }

    if issues.len() > before {
        return None;
    }
    Some(Trial {
        name: raw.name.clone(),
        area: raw.area.clone(),
        subjects: subjects?,
        start_date: start_date?,
        end_date: end_date?,
    })
}

fn parse_date(
    value: &str,
    record: &str,
    field: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            push(issues, record, field, "must be a calendar date (YYYY-MM-DD)");
            None
        }
    }
}

fn push(issues: &mut Vec<FieldIssue>, record: &str, field: &str, reason: &str) {
    issues.push(FieldIssue {
        record: record.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    });
}
