//! In-process record store backed by an ordered map.

use crate::error::{AppError, Result};
use crate::services::store::RecordStore;
use crate::types::ClassifiedRecord;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct Inner {
    records: BTreeMap<i64, ClassifiedRecord>,
    last_update: Option<i64>,
}

/// Volatile store for tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| AppError::Internal("memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn upsert(&self, records: &[ClassifiedRecord]) -> Result<usize> {
        let mut inner = self.lock()?;
        for record in records {
            inner.records.insert(record.timestamp(), record.clone());
        }
        Ok(records.len())
    }

    fn get_all(&self) -> Result<Vec<ClassifiedRecord>> {
        Ok(self.lock()?.records.values().cloned().collect())
    }

    fn latest_timestamp(&self) -> Result<i64> {
        Ok(self.lock()?.records.keys().next_back().copied().unwrap_or(0))
    }

    fn latest_before(&self, timestamp: i64) -> Result<Option<ClassifiedRecord>> {
        Ok(self
            .lock()?
            .records
            .range(..timestamp)
            .next_back()
            .map(|(_, record)| record.clone()))
    }

    fn set_last_update_mark(&self, timestamp: i64) -> Result<()> {
        self.lock()?.last_update = Some(timestamp);
        Ok(())
    }

    fn last_update_mark(&self) -> Result<Option<i64>> {
        Ok(self.lock()?.last_update)
    }
}
