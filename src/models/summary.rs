use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

use crate::models::quarter::Quarter;
use crate::models::resource::ResourceAllocation;
use crate::models::trial::Trial;

/// Subjects one full-time resource can cover per year; converts trial
/// enrollment into FTE demand for the bottleneck analysis.
const SUBJECTS_PER_FTE: f64 = 650.0;

/// Fraction of supply reserved for non-trial activities (NTSA).
const NTSA_FRACTION: f64 = 0.2;

/// The precomputed numbers the dashboard header displays. Derived, never
/// persisted: always recomputed from current store contents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_resources: usize,
    pub total_trials: usize,
    pub therapeutic_areas: Vec<String>,
    pub quarters: Vec<String>,
    pub overall_utilization: f64,
}

impl DashboardSummary {
    pub fn empty() -> DashboardSummary {
        DashboardSummary {
            total_resources: 0,
            total_trials: 0,
            therapeutic_areas: Vec::new(),
            quarters: Vec::new(),
            overall_utilization: 0.0,
        }
    }
}

/// Invariant violation inside the aggregator — a record that should never
/// have gotten past the validator. A programming-defect signal, not a
/// user-facing condition.
#[derive(Debug, Clone)]
pub struct ConsistencyError {
    pub detail: String,
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "aggregation invariant violated: {}", self.detail)
    }
}

impl std::error::Error for ConsistencyError {}

/// Compute the dashboard summary from a store snapshot. Pure and
/// deterministic: same records in, same summary out.
pub fn compute(
    resources: &[ResourceAllocation],
    trials: &[Trial],
) -> Result<DashboardSummary, ConsistencyError> {
    let total_resources = resources.len();
    let total_trials = trials
        .iter()
        .map(|t| t.name.as_str())
        .collect::<BTreeSet<_>>()
        .len();

    let mut areas: Vec<String> = resources
        .iter()
        .map(|r| r.area.clone())
        .chain(trials.iter().map(|t| t.area.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    areas.sort_by(|a, b| a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b)));

    let quarters = sorted_quarter_labels(resources)?;

    // Mean over every (resource, quarter) pair that actually has a value.
    // Sparse allocation is expected: absent quarters stay out of the
    // denominator, a recorded 0.0 counts as a real data point.
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for resource in resources {
        for value in resource.quarterly_allocation.values() {
            sum += value;
            pairs += 1;
        }
    }
    let overall_utilization = if pairs == 0 {
        0.0
    } else {
        round1(sum / pairs as f64 * 100.0)
    };

    Ok(DashboardSummary {
        total_resources,
        total_trials,
        therapeutic_areas: areas,
        quarters,
        overall_utilization,
    })
}

/// All distinct quarter labels across the given resources, chronologically
/// sorted (by year, then quarter number).
pub fn sorted_quarter_labels(
    resources: &[ResourceAllocation],
) -> Result<Vec<String>, ConsistencyError> {
    let mut quarters: Vec<(Quarter, &str)> = Vec::new();
    let mut seen = BTreeSet::new();
    for resource in resources {
        for label in resource.quarterly_allocation.keys() {
            if !seen.insert(label.as_str()) {
                continue;
            }
            let quarter = Quarter::parse(label).ok_or_else(|| ConsistencyError {
                detail: format!("unparseable quarter label '{label}' in store"),
            })?;
            quarters.push((quarter, label));
        }
    }
    quarters.sort();
    Ok(quarters.into_iter().map(|(_, label)| label.to_string()).collect())
}

/// Supply/demand balance for one (therapeutic area, quarter) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bottleneck {
    pub therapeutic_area: String,
    pub quarter: String,
    pub supply: f64,
    pub demand: f64,
    pub ntsa: f64,
    pub bottleneck: f64,
    pub status: BottleneckStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BottleneckStatus {
    Overloaded,
    Balanced,
    Underutilized,
}

impl BottleneckStatus {
    fn classify(bottleneck: f64) -> BottleneckStatus {
        if bottleneck < -0.2 {
            BottleneckStatus::Overloaded
        } else if bottleneck > 0.5 {
            BottleneckStatus::Underutilized
        } else {
            BottleneckStatus::Balanced
        }
    }
}

/// Per-area, per-quarter bottleneck analysis.
///
/// Supply is the summed allocation of the area's resources in that quarter
/// (absent quarters count as 0 supply here, unlike the utilization mean);
/// demand is the area's trial enrollment converted to FTE. 20% of supply is
/// set aside for non-trial activities before comparing.
pub fn compute_bottlenecks(
    resources: &[ResourceAllocation],
    trials: &[Trial],
) -> Result<Vec<Bottleneck>, ConsistencyError> {
    let quarters = sorted_quarter_labels(resources)?;

    let mut supply: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
    for resource in resources {
        let per_quarter = supply.entry(resource.area.as_str()).or_default();
        for quarter in &quarters {
            let value = resource
                .quarterly_allocation
                .get(quarter)
                .copied()
                .unwrap_or(0.0);
            *per_quarter.entry(quarter.as_str()).or_insert(0.0) += value;
        }
    }

    let mut demand: BTreeMap<&str, f64> = BTreeMap::new();
    for trial in trials {
        *demand.entry(trial.area.as_str()).or_insert(0.0) +=
            f64::from(trial.subjects) / SUBJECTS_PER_FTE;
    }

    let mut bottlenecks = Vec::new();
    for (area, per_quarter) in &supply {
        for quarter in &quarters {
            let supply = per_quarter.get(quarter.as_str()).copied().unwrap_or(0.0);
            let demand = demand.get(area).copied().unwrap_or(0.0);
            let ntsa = supply * NTSA_FRACTION;
            let bottleneck = supply - ntsa - demand;
            bottlenecks.push(Bottleneck {
                therapeutic_area: (*area).to_string(),
                quarter: quarter.clone(),
                supply,
                demand,
                ntsa,
                bottleneck,
                status: BottleneckStatus::classify(bottleneck),
            });
        }
    }
    Ok(bottlenecks)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
