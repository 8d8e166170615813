//! In-memory append-only log
//!
//! Records live in a `Vec` behind a single mutex. The offset of a record is
//! its index in that `Vec`, so offsets are dense, zero-based, and assigned in
//! lock acquisition order.

use crate::common::{Error, Result};
use crate::log::Record;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct Log {
    records: Mutex<Vec<Record>>,
}

impl Log {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record and return the offset assigned to it.
    ///
    /// The caller's `record.offset` is ignored.
    pub fn append(&self, mut record: Record) -> Result<u64> {
        let mut records = self.records()?;

        let offset = records.len() as u64;
        record.offset = offset;
        let size = record.value.len();
        records.push(record);

        tracing::debug!(offset, size, "appended record");
        Ok(offset)
    }

    /// Read the record stored at `offset`
    pub fn read(&self, offset: u64) -> Result<Record> {
        let records = self.records()?;

        usize::try_from(offset)
            .ok()
            .and_then(|idx| records.get(idx))
            .cloned()
            .ok_or(Error::OffsetNotFound(offset))
    }

    /// Number of records appended so far
    pub fn len(&self) -> Result<u64> {
        Ok(self.records()?.len() as u64)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<Record>>> {
        self.records
            .lock()
            .map_err(|_| Error::Internal("log lock poisoned".into()))
    }
}
