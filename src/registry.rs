use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::models::{ReceiveFile, TransferStatus};

#[derive(Debug, Default)]
pub struct TransferRegistry {
    inner: Mutex<RegistryInner>,
}

#[derive(Debug, Default)]
struct RegistryInner {
    entries: HashMap<u8, ReceiveFile>,
    next_id: u8,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!(event = "receive_lock_poisoned", lock = "transfer_registry");
                poisoned.into_inner()
            }
        }
    }

    // Allocation and insertion happen under one lock so a concurrent
    // admission can never hand out the same identifier twice.
    pub fn register(&self, build: impl FnOnce(u8) -> ReceiveFile) -> AppResult<u8> {
        let mut inner = self.lock();
        let start = inner.next_id;
        for step in 0..=u8::MAX {
            let candidate = start.wrapping_add(step);
            if inner.entries.contains_key(&candidate) {
                continue;
            }
            inner.next_id = candidate.wrapping_add(1);
            inner.entries.insert(candidate, build(candidate));
            return Ok(candidate);
        }
        Err(AppError::new(
            "receive_registry_full",
            "同时进行的传输数量已达上限",
        ))
    }

    pub fn with_entry<R>(&self, id: u8, apply: impl FnOnce(&mut ReceiveFile) -> R) -> Option<R> {
        self.lock().entries.get_mut(&id).map(apply)
    }

    pub fn remove(&self, id: u8) -> Option<ReceiveFile> {
        self.lock().entries.remove(&id)
    }

    pub fn status_of(&self, id: u8) -> Option<TransferStatus> {
        self.lock().entries.get(&id).map(|entry| entry.status)
    }

    pub fn contains(&self, id: u8) -> bool {
        self.lock().entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn active_ids(&self) -> Vec<u8> {
        let mut ids: Vec<u8> = self.lock().entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn drain(&self) -> Vec<ReceiveFile> {
        let mut inner = self.lock();
        inner.entries.drain().map(|(_, entry)| entry).collect()
    }

    pub fn reap_terminal_older_than(&self, ttl: Duration) -> Vec<u8> {
        let mut inner = self.lock();
        let expired: Vec<u8> = inner
            .entries
            .values()
            .filter(|entry| entry.status.is_terminal() && entry.last_activity_at.elapsed() >= ttl)
            .map(|entry| entry.id)
            .collect();
        for id in expired.iter() {
            if let Some(mut entry) = inner.entries.remove(id) {
                entry.close_handle();
            }
        }
        expired
    }
}
