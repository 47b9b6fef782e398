pub mod entities;
pub mod seeds;

pub use entities::StoreEntity;

use crate::domain::error::{AppError, Result};
use crate::domain::execution::Execution;
use crate::domain::recording::Recording;
use crate::domain::test_case::TestCase;
use crate::infrastructure::config::{StoreLatency, StoresConfig};
use crate::infrastructure::scheduler::Scheduler;
use crate::shared::ids::IdGenerator;
use serde_json::Value as JsonValue;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// In-memory stand-in for a backend collection.
///
/// Records are kept most recently created first. Every operation waits for its
/// configured latency on the injected scheduler before touching the data, and
/// every returned record is a copy.
pub struct MockStore<E: StoreEntity> {
    items: Mutex<Vec<E>>,
    latency: StoreLatency,
    scheduler: Arc<dyn Scheduler>,
    ids: IdGenerator,
}

impl<E: StoreEntity> MockStore<E> {
    pub fn new(seed: Vec<E>, latency: StoreLatency, scheduler: Arc<dyn Scheduler>) -> Self {
        Self {
            items: Mutex::new(seed),
            latency,
            scheduler,
            ids: IdGenerator::new(),
        }
    }

    pub async fn get_all(&self) -> Result<Vec<E>> {
        self.pause(self.latency.get_all_ms).await;
        Ok(self.lock()?.clone())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<E> {
        self.pause(self.latency.get_by_id_ms).await;
        let found = self.lock()?.iter().find(|item| item.id() == id).cloned();
        found.ok_or_else(not_found::<E>)
    }

    pub async fn create(&self, draft: E::Draft) -> Result<E> {
        self.pause(self.latency.create_ms).await;
        let created_at = self.scheduler.now();
        let id = self.ids.next_string(created_at.timestamp_millis());
        let record = E::from_draft(draft, id, created_at);
        self.lock()?.insert(0, record.clone());
        debug!(store = E::LABEL, id = %record.id(), "Record created");
        Ok(record)
    }

    /// Shallow merge of the top-level keys of `patch` into the stored record.
    /// The id and the server-assigned timestamp are kept as they are. Keys the
    /// entity does not declare are rejected, so nothing in a patch is dropped.
    pub async fn update(&self, id: &str, patch: JsonValue) -> Result<E> {
        self.pause(self.latency.update_ms).await;
        let JsonValue::Object(patch) = patch else {
            return Err(AppError::ValidationError(
                "Update patch must be a JSON object.".to_string(),
            ));
        };

        let mut items = self.lock()?;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(not_found::<E>)?;

        let mut merged = match serde_json::to_value(&items[index])? {
            JsonValue::Object(map) => map,
            _ => {
                return Err(AppError::Internal(format!(
                    "{} is not stored as an object",
                    E::LABEL
                )))
            }
        };
        for (key, value) in patch {
            if key == "id" || key == E::TIMESTAMP_KEY {
                continue;
            }
            merged.insert(key, value);
        }

        let updated: E = serde_json::from_value(JsonValue::Object(merged)).map_err(|err| {
            AppError::ValidationError(format!("Invalid {} update: {}", E::LABEL, err))
        })?;
        items[index] = updated.clone();
        debug!(store = E::LABEL, id = %id, "Record updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        self.pause(self.latency.delete_ms).await;
        let mut items = self.lock()?;
        let index = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(not_found::<E>)?;
        items.remove(index);
        debug!(store = E::LABEL, id = %id, "Record deleted");
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.items.lock().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn pause(&self, millis: u64) {
        self.scheduler.sleep(Duration::from_millis(millis)).await;
    }

    /// Leaves the collection lock poisoned so every later operation fails.
    #[cfg(test)]
    pub(crate) fn poison(&self) {
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _items = self.items.lock();
            panic!("{} store poisoned", E::LABEL);
        }));
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<E>>> {
        self.items
            .lock()
            .map_err(|_| AppError::Internal(format!("{} store lock poisoned", E::LABEL)))
    }
}

fn not_found<E: StoreEntity>() -> AppError {
    AppError::NotFound(format!("{} not found", E::LABEL))
}

pub type RecordingStore = MockStore<Recording>;
pub type TestCaseStore = MockStore<TestCase>;
pub type ExecutionStore = MockStore<Execution>;

/// The three stores the workbench talks to, built once per process.
#[derive(Clone)]
pub struct Stores {
    pub recordings: Arc<RecordingStore>,
    pub test_cases: Arc<TestCaseStore>,
    pub executions: Arc<ExecutionStore>,
}

impl Stores {
    pub fn new(
        seeds: seeds::SeedCatalog,
        config: &StoresConfig,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self {
            recordings: Arc::new(MockStore::new(
                seeds.recordings,
                config.recordings,
                Arc::clone(&scheduler),
            )),
            test_cases: Arc::new(MockStore::new(
                seeds.test_cases,
                config.test_cases,
                Arc::clone(&scheduler),
            )),
            executions: Arc::new(MockStore::new(
                seeds.executions,
                config.executions,
                scheduler,
            )),
        }
    }

    /// Stores with no seed data, e.g. for isolated tests.
    pub fn empty(config: &StoresConfig, scheduler: Arc<dyn Scheduler>) -> Self {
        Self::new(seeds::SeedCatalog::default(), config, scheduler)
    }
}
