//! Persistence contract for classified records.

use crate::error::Result;
use crate::types::ClassifiedRecord;

const HOUR_SECS: i64 = 3600;

/// Keyed store of classified records. The key is the record timestamp.
pub trait RecordStore: Send + Sync {
    /// Insert or overwrite records by timestamp. Records not in `records`
    /// are left untouched. Returns the number of records written.
    fn upsert(&self, records: &[ClassifiedRecord]) -> Result<usize>;

    /// Every stored record, oldest first.
    fn get_all(&self) -> Result<Vec<ClassifiedRecord>>;

    /// Newest stored timestamp, 0 when the store is empty.
    fn latest_timestamp(&self) -> Result<i64>;

    /// Newest record strictly older than `timestamp`.
    fn latest_before(&self, timestamp: i64) -> Result<Option<ClassifiedRecord>> {
        Ok(self
            .get_all()?
            .into_iter()
            .rev()
            .find(|record| record.timestamp() < timestamp))
    }

    fn set_last_update_mark(&self, timestamp: i64) -> Result<()>;

    fn last_update_mark(&self) -> Result<Option<i64>>;
}

/// True when a new hour has started since the latest stored point, or
/// nothing is stored yet.
pub fn needs_hourly_update(latest: i64, now: i64) -> bool {
    if latest == 0 {
        return true;
    }
    now.div_euclid(HOUR_SECS) > latest.div_euclid(HOUR_SECS)
}
