use std::sync::{Mutex, RwLock};

use serde::Serialize;

use crate::models::resource::ResourceAllocation;
use crate::models::summary::{self, ConsistencyError, DashboardSummary};
use crate::models::trial::Trial;
use crate::models::validator::ValidatedBatch;

/// In-memory record store plus the summary cache keyed on it.
///
/// Writers serialize on the inner write lock; readers take point-in-time
/// snapshots and never observe a half-applied batch. The generation counter
/// bumps on every mutation, which is what invalidates the cache: a cached
/// summary is only served while its generation matches the store's.
///
/// One instance per process, created in `main` and injected via
/// `web::Data` — tests build their own independent instances.
pub struct RecordStore {
    inner: RwLock<StoreInner>,
    cache: Mutex<Option<(u64, DashboardSummary)>>,
}

#[derive(Default)]
struct StoreInner {
    resources: Vec<ResourceAllocation>,
    trials: Vec<Trial>,
    generation: u64,
}

/// Point-in-time view of the store for the aggregator.
pub struct Snapshot {
    pub resources: Vec<ResourceAllocation>,
    pub trials: Vec<Trial>,
    generation: u64,
}

/// What a successful ingestion reports back.
#[derive(Debug, Clone, Serialize)]
pub struct IngestAck {
    pub message: String,
    pub resources_count: usize,
    pub trials_count: usize,
}

impl Default for RecordStore {
    fn default() -> Self {
        RecordStore::new()
    }
}

impl RecordStore {
    pub fn new() -> RecordStore {
        RecordStore {
            inner: RwLock::new(StoreInner::default()),
            cache: Mutex::new(None),
        }
    }

    /// Apply a validated batch: resource merge plus trial replacement under
    /// one write lock, so concurrent readers see either the full pre-batch
    /// or the full post-batch state.
    pub fn ingest(&self, batch: ValidatedBatch, message: &str) -> IngestAck {
        let resources_count = batch.resources.len();
        let trials_count = batch.trials.len();
        let mut inner = self.inner.write().expect("record store lock poisoned");
        inner.merge_resources(batch.resources);
        inner.replace_trials(batch.trials);
        inner.generation += 1;
        IngestAck {
            message: message.to_string(),
            resources_count,
            trials_count,
        }
    }

    /// Append or merge resource records. Identity is (name, area); matching
    /// records merge per quarter, last write wins.
    pub fn upsert_resources(&self, resources: Vec<ResourceAllocation>) {
        let mut inner = self.inner.write().expect("record store lock poisoned");
        inner.merge_resources(resources);
        inner.generation += 1;
    }

    /// Append trials, replacing any stored trial with the same name
    /// wholesale.
    pub fn upsert_trials(&self, trials: Vec<Trial>) {
        let mut inner = self.inner.write().expect("record store lock poisoned");
        inner.replace_trials(trials);
        inner.generation += 1;
    }

    pub fn snapshot(&self) -> Snapshot {
        let inner = self.inner.read().expect("record store lock poisoned");
        Snapshot {
            resources: inner.resources.clone(),
            trials: inner.trials.clone(),
            generation: inner.generation,
        }
    }

    pub fn is_empty(&self) -> bool {
        let inner = self.inner.read().expect("record store lock poisoned");
        inner.resources.is_empty() && inner.trials.is_empty()
    }

    /// Serve the cached summary if it is still current, otherwise recompute
    /// from a snapshot and repopulate. Correctness never depends on the
    /// cache: a miss just recomputes.
    pub fn get_or_compute(&self) -> Result<DashboardSummary, ConsistencyError> {
        let snap = self.snapshot();
        {
            let cache = self.cache.lock().expect("summary cache lock poisoned");
            if let Some((generation, summary)) = cache.as_ref() {
                if *generation == snap.generation {
                    return Ok(summary.clone());
                }
            }
        }

        // Compute outside both locks; parallel readers don't serialize on
        // the aggregation itself.
        let summary = summary::compute(&snap.resources, &snap.trials)?;

        let mut cache = self.cache.lock().expect("summary cache lock poisoned");
        let stale = matches!(cache.as_ref(), Some((generation, _)) if *generation > snap.generation);
        if !stale {
            *cache = Some((snap.generation, summary.clone()));
        }
        Ok(summary)
    }
}

impl StoreInner {
    fn merge_resources(&mut self, incoming: Vec<ResourceAllocation>) {
        for resource in incoming {
            match self.resources.iter_mut().find(|r| r.same_resource(&resource)) {
                Some(existing) => existing.merge_quarters(&resource),
                None => self.resources.push(resource),
            }
        }
    }

    fn replace_trials(&mut self, incoming: Vec<Trial>) {
        for trial in incoming {
            match self.trials.iter_mut().find(|t| t.name == trial.name) {
                Some(existing) => *existing = trial,
                None => self.trials.push(trial),
            }
        }
    }
}
