use std::collections::BTreeMap;

use async_trait::async_trait;
use models::{Freelancer, FreelancerPatch, InsertFreelancer};
use tokio::sync::RwLock;
use tracing::debug;

use super::{Backend, FreelancerPage, FreelancerStore};
use crate::errors::ServiceError;

#[derive(Debug)]
struct MemoryState {
    records: BTreeMap<u64, Freelancer>,
    next_id: u64,
}

/// Transient in-process store used when no remote credentials are configured.
///
/// Ids are a counter starting at 1 and are never reused, even after deletes.
/// Nothing survives a restart.
#[derive(Debug)]
pub struct MemoryStore {
    inner: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(MemoryState { records: BTreeMap::new(), next_id: 1 }) }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self { Self::new() }
}

/// Ids handed out here are decimal counters; anything else cannot exist.
/// Only the exact rendering of a key matches, so "01" or "+1" never reach "1".
fn parse_id(id: &str) -> Option<u64> {
    let key = id.parse::<u64>().ok()?;
    (key.to_string() == id).then_some(key)
}

#[async_trait]
impl FreelancerStore for MemoryStore {
    fn backend(&self) -> Backend { Backend::Memory }

    async fn list(&self, _offset: Option<String>) -> Result<FreelancerPage, ServiceError> {
        let state = self.inner.read().await;
        // newest first
        let list = state.records.values().rev().cloned().collect::<Vec<_>>();
        debug!(count = list.len(), "memory list");
        Ok(FreelancerPage { list, offset: None })
    }

    async fn get(&self, id: &str) -> Result<Option<Freelancer>, ServiceError> {
        let Some(key) = parse_id(id) else { return Ok(None) };
        let state = self.inner.read().await;
        Ok(state.records.get(&key).cloned())
    }

    async fn create(&self, input: InsertFreelancer) -> Result<Freelancer, ServiceError> {
        let mut state = self.inner.write().await;
        // id allocation and insert under the same write guard
        let key = state.next_id;
        state.next_id += 1;
        let record = Freelancer::new(key.to_string(), FreelancerPatch::from(input).apply_defaults());
        state.records.insert(key, record.clone());
        debug!(id = %record.id, "memory create");
        Ok(record)
    }

    async fn update(&self, id: &str, patch: FreelancerPatch) -> Result<Freelancer, ServiceError> {
        let key = parse_id(id).ok_or_else(ServiceError::not_found)?;
        let mut state = self.inner.write().await;
        let existing = state.records.get_mut(&key).ok_or_else(ServiceError::not_found)?;
        // shallow merge, id is never touched
        existing.fields.merge(patch);
        debug!(%id, "memory update");
        Ok(existing.clone())
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let Some(key) = parse_id(id) else { return Ok(false) };
        let mut state = self.inner.write().await;
        let existed = state.records.remove(&key).is_some();
        debug!(%id, existed, "memory delete");
        Ok(existed)
    }
}
