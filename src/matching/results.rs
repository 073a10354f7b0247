use std::sync::{Mutex, PoisonError};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResultsError {
    #[error("Result slot {index} out of range ({len} slots)")]
    OutOfRange { index: usize, len: usize },

    #[error("Result slot {0} already written")]
    AlreadyStored(usize),

    #[error("Results table lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for ResultsError {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}

/// Pre-sized table of per-contig results shared by concurrent workers.
///
/// Each worker owns one slot index. The lock is held only while a single
/// result is written.
#[derive(Debug)]
pub struct ResultsTable<T> {
    slots: Mutex<Vec<Option<T>>>,
}

impl<T> ResultsTable<T> {
    #[must_use]
    pub fn new(len: usize) -> Self {
        let mut slots = Vec::with_capacity(len);
        slots.resize_with(len, || None);
        Self {
            slots: Mutex::new(slots),
        }
    }

    /// Write the result for slot `index`.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError` if the slot does not exist, was already
    /// written, or another writer panicked while holding the lock.
    pub fn store(&self, index: usize, value: T) -> Result<(), ResultsError> {
        let mut slots = self.slots.lock()?;
        let len = slots.len();
        let slot = slots
            .get_mut(index)
            .ok_or(ResultsError::OutOfRange { index, len })?;
        if slot.is_some() {
            return Err(ResultsError::AlreadyStored(index));
        }
        *slot = Some(value);
        Ok(())
    }

    /// Number of slots written so far
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Poisoned` if a writer panicked.
    pub fn filled(&self) -> Result<usize, ResultsError> {
        Ok(self.slots.lock()?.iter().filter(|s| s.is_some()).count())
    }

    /// Consume the table once all writers are done. Unwritten slots are `None`.
    ///
    /// # Errors
    ///
    /// Returns `ResultsError::Poisoned` if a writer panicked.
    pub fn into_inner(self) -> Result<Vec<Option<T>>, ResultsError> {
        Ok(self.slots.into_inner()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_collect() {
        let table = ResultsTable::new(3);
        table.store(2, "chr3").unwrap();
        table.store(0, "chr1").unwrap();
        assert_eq!(table.filled().unwrap(), 2);
        assert_eq!(table.into_inner().unwrap(), vec![Some("chr1"), None, Some("chr3")]);
    }

    #[test]
    fn test_store_errors() {
        let table = ResultsTable::new(1);
        assert_eq!(
            table.store(4, 1),
            Err(ResultsError::OutOfRange { index: 4, len: 1 })
        );
        table.store(0, 1).unwrap();
        assert_eq!(table.store(0, 2), Err(ResultsError::AlreadyStored(0)));
        assert_eq!(table.into_inner().unwrap(), vec![Some(1)]);
    }

    #[test]
    fn test_concurrent_writers() {
        let table = ResultsTable::new(16);
        std::thread::scope(|scope| {
            for index in 0..16 {
                let table = &table;
                scope.spawn(move || table.store(index, index * 10).unwrap());
            }
        });
        let values = table.into_inner().unwrap();
        assert!(values.iter().enumerate().all(|(i, v)| *v == Some(i * 10)));
    }
}
