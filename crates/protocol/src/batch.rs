use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Transfer;

/// Returned by [`BatchBuilder::push`] once the builder holds `capacity`
/// entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("batch is full ({capacity} entries)")]
pub struct BatchFull {
    pub capacity: usize,
}

/// An ordered group of transfers submitted as one request.
///
/// A batch is immutable once built: entries can only be appended through
/// [`BatchBuilder`], and never past the capacity the builder was created
/// with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    entries: Vec<Transfer>,
}

impl Batch {
    pub fn builder(capacity: usize) -> BatchBuilder {
        BatchBuilder {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Transfer] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Transfer> {
        self.entries
    }
}

/// Append-only construction of a [`Batch`] with a fixed upper bound on
/// length.
#[derive(Debug)]
pub struct BatchBuilder {
    capacity: usize,
    entries: Vec<Transfer>,
}

impl BatchBuilder {
    pub fn push(&mut self, transfer: Transfer) -> Result<(), BatchFull> {
        if self.entries.len() == self.capacity {
            return Err(BatchFull {
                capacity: self.capacity,
            });
        }
        self.entries.push(transfer);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.capacity - self.entries.len()
    }

    pub fn build(self) -> Batch {
        Batch {
            entries: self.entries,
        }
    }
}

#[cfg(test)]
#[path = "batch_tests.rs"]
mod tests;
