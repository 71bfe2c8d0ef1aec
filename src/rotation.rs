use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;

use crate::config::Config;
use crate::db::database::Database;
use crate::events::{CoreEvent, EventSink};

/// Composite key for per-user rotation counters. `vibe` is the
/// category+mood bucket name; `fashion_style` is the orthogonal style axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RotationKey {
    pub user_id: String,
    pub vibe: String,
    pub fashion_style: String,
}

impl RotationKey {
    pub fn new(user_id: &str, vibe: &str, fashion_style: &str) -> Self {
        RotationKey {
            user_id: user_id.to_string(),
            vibe: vibe.to_string(),
            fashion_style: fashion_style.to_string(),
        }
    }
}

/// Monotonic per-key counters. Indices are unbounded; the effective library
/// position is always `index % library_len`, computed at read time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RotationState {
    pub outfit_index: u64,
    pub location_index: u64,
    pub accessory_index: u64,
}

/// How far each counter advances per committed generation. Exposed as
/// configuration because the number of outfit slots one feed consumes is a
/// product decision, not an invariant (see the step validator in
/// `template.rs`).
#[derive(Debug, Clone, Copy)]
pub struct RotationSteps {
    pub outfit: u64,
    pub location: u64,
    pub accessory: u64,
}

impl RotationSteps {
    pub fn from_config(config: &Config) -> Self {
        RotationSteps {
            outfit: config.rotation_outfit_step,
            location: config.rotation_location_step,
            accessory: 1,
        }
    }
}

/// Maps an unbounded counter onto a library of the given length. Growing a
/// library never loses a position; shrinking one still yields a valid index.
pub fn effective_index(index: u64, library_len: usize) -> usize {
    if library_len == 0 {
        return 0;
    }
    (index % library_len as u64) as usize
}

pub trait RotationStore {
    async fn fetch(&self, key: &RotationKey) -> Result<Option<RotationState>>;
    async fn advance(&self, key: &RotationKey, steps: &RotationSteps) -> Result<()>;
}

impl RotationStore for Database {
    async fn fetch(&self, key: &RotationKey) -> Result<Option<RotationState>> {
        let row = self
            .fetch_rotation_row(&key.user_id, &key.vibe, &key.fashion_style)
            .await?;
        Ok(row.map(|row| RotationState {
            outfit_index: row.outfit_index.max(0) as u64,
            location_index: row.location_index.max(0) as u64,
            accessory_index: row.accessory_index.max(0) as u64,
        }))
    }

    async fn advance(&self, key: &RotationKey, steps: &RotationSteps) -> Result<()> {
        self.advance_rotation_row(
            &key.user_id,
            &key.vibe,
            &key.fashion_style,
            steps.outfit as i64,
            steps.location as i64,
            steps.accessory as i64,
        )
        .await
    }
}

/// In-process store for tests and for running without a database.
#[derive(Default)]
pub struct MemoryRotationStore {
    states: Mutex<HashMap<RotationKey, RotationState>>,
}

impl RotationStore for MemoryRotationStore {
    async fn fetch(&self, key: &RotationKey) -> Result<Option<RotationState>> {
        Ok(self.states.lock().get(key).copied())
    }

    async fn advance(&self, key: &RotationKey, steps: &RotationSteps) -> Result<()> {
        let mut states = self.states.lock();
        let state = states.entry(key.clone()).or_default();
        state.outfit_index += steps.outfit;
        state.location_index += steps.location;
        state.accessory_index += steps.accessory;
        Ok(())
    }
}

/// The only mutation path for rotation counters. Reads never write; writes
/// only ever add the configured steps. A store outage degrades to the zero
/// state so missing infrastructure never blocks content generation.
pub struct RotationManager<S> {
    store: S,
    steps: RotationSteps,
    sink: Arc<dyn EventSink>,
}

impl<S: RotationStore> RotationManager<S> {
    pub fn new(store: S, steps: RotationSteps, sink: Arc<dyn EventSink>) -> Self {
        RotationManager { store, steps, sink }
    }

    pub fn steps(&self) -> RotationSteps {
        self.steps
    }

    pub async fn get(&self, key: &RotationKey) -> RotationState {
        match self.store.fetch(key).await {
            Ok(Some(state)) => state,
            Ok(None) => RotationState::default(),
            Err(err) => {
                self.sink.emit(CoreEvent::StoreUnavailable {
                    operation: "get".to_string(),
                    detail: err.to_string(),
                });
                RotationState::default()
            }
        }
    }

    /// Call only after the read state has actually been used for a
    /// generation, never speculatively before.
    pub async fn increment(&self, key: &RotationKey) {
        if let Err(err) = self.store.advance(key, &self.steps).await {
            self.sink.emit(CoreEvent::StoreUnavailable {
                operation: "increment".to_string(),
                detail: err.to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::RecordingSink;
    use crate::events::TracingSink;
    use anyhow::anyhow;

    struct FailingStore;

    impl RotationStore for FailingStore {
        async fn fetch(&self, _key: &RotationKey) -> Result<Option<RotationState>> {
            Err(anyhow!("table missing"))
        }

        async fn advance(&self, _key: &RotationKey, _steps: &RotationSteps) -> Result<()> {
            Err(anyhow!("table missing"))
        }
    }

    fn steps() -> RotationSteps {
        RotationSteps {
            outfit: 4,
            location: 2,
            accessory: 1,
        }
    }

    #[tokio::test]
    async fn fresh_key_returns_zero_state_without_writing() {
        let store = MemoryRotationStore::default();
        let manager = RotationManager::new(store, steps(), Arc::new(TracingSink));
        let key = RotationKey::new("u1", "urban_confident", "casual");

        assert_eq!(manager.get(&key).await, RotationState::default());
        // A second read still sees no stored row.
        assert_eq!(manager.get(&key).await, RotationState::default());
    }

    #[tokio::test]
    async fn increment_is_strictly_monotonic() {
        let store = MemoryRotationStore::default();
        let manager = RotationManager::new(store, steps(), Arc::new(TracingSink));
        let key = RotationKey::new("u1", "urban_confident", "casual");

        let before = manager.get(&key).await;
        manager.increment(&key).await;
        let after = manager.get(&key).await;

        assert!(after.outfit_index > before.outfit_index);
        assert!(after.location_index > before.location_index);
        assert_eq!(after.outfit_index, 4);
        assert_eq!(after.location_index, 2);

        manager.increment(&key).await;
        let third = manager.get(&key).await;
        assert_eq!(third.outfit_index, 8);
        assert_eq!(third.location_index, 4);
    }

    #[tokio::test]
    async fn store_outage_degrades_to_zero_state() {
        let sink = Arc::new(RecordingSink::default());
        let manager = RotationManager::new(FailingStore, steps(), sink.clone());
        let key = RotationKey::new("u1", "coastal_serene", "business");

        assert_eq!(manager.get(&key).await, RotationState::default());
        manager.increment(&key).await;

        let events = sink.events.lock();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CoreEvent::StoreUnavailable { .. }));
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_counters() {
        let db = Database::init("sqlite::memory:").await.expect("init db");
        let manager = RotationManager::new(db, steps(), Arc::new(TracingSink));
        let key = RotationKey::new("u9", "studio_editorial", "athletic");

        assert_eq!(manager.get(&key).await, RotationState::default());
        manager.increment(&key).await;
        let state = manager.get(&key).await;
        assert_eq!(state.outfit_index, 4);
        assert_eq!(state.location_index, 2);
        assert_eq!(state.accessory_index, 1);
    }

    #[test]
    fn effective_index_wraps_and_tolerates_empty() {
        assert_eq!(effective_index(0, 2), 0);
        assert_eq!(effective_index(5, 2), 1);
        assert_eq!(effective_index(7, 0), 0);
    }
}
