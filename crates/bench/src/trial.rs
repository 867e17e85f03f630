use std::time::{Duration, Instant};

use tally_client::{ClientError, SubmitTransfers};
use tally_protocol::{Batch, Transfer};
use thiserror::Error;

/// Field values for the synthetic load. The zero id is invalid on
/// purpose: the service must reject every entry, so the expected reply to
/// each batch is one outcome per submitted transfer.
const SYNTHETIC_TRANSFER: Transfer = Transfer {
    id: 0,
    debit_account_id: 0,
    credit_account_id: 0,
    amount: 10,
    ledger: 1,
    code: 1,
};

#[derive(Debug, Error)]
pub enum BenchError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(
        "unexpected result for batch starting at sample {batch_start}: \
         {actual} outcomes for {expected} transfers"
    )]
    ResultCountMismatch {
        batch_start: u64,
        expected: usize,
        actual: usize,
    },
}

/// Aggregate timing for one full pass over the samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialStats {
    total: Duration,
    max_batch: Duration,
}

impl TrialStats {
    pub(crate) fn record(&mut self, elapsed: Duration) {
        self.total += elapsed;
        if elapsed > self.max_batch {
            self.max_batch = elapsed;
        }
    }

    pub fn total_ms(&self) -> u64 {
        self.total.as_millis() as u64
    }

    pub fn max_batch_ms(&self) -> u64 {
        self.max_batch.as_millis() as u64
    }

    /// Transfers per second, truncated to an integer. `None` when the
    /// trial completed in under a millisecond, where the quotient is
    /// meaningless.
    pub fn transfers_per_second(&self, samples: u64) -> Option<u64> {
        match self.total_ms() {
            0 => None,
            ms => Some(samples * 1000 / ms),
        }
    }
}

/// Split `samples` into consecutive batches of at most `batch_size`
/// entries, yielding `(starting sample index, length)`. Only the final
/// batch may be short.
pub fn batch_plan(samples: u64, batch_size: u64) -> impl Iterator<Item = (u64, u64)> {
    debug_assert!(batch_size > 0);
    (0..samples)
        .step_by(batch_size as usize)
        .map(move |start| (start, batch_size.min(samples - start)))
}

fn synthetic_batch(len: usize) -> Batch {
    let mut builder = Batch::builder(len);
    for _ in 0..len {
        builder
            .push(SYNTHETIC_TRANSFER)
            .expect("builder capacity equals batch length");
    }
    builder.build()
}

/// One full pass: submit every batch in sequence, timing each round trip.
///
/// Any anomaly aborts the whole run. A reply that is not one outcome per
/// entry means the all-rejected premise is broken and later measurements
/// would be meaningless.
pub fn run_trial<C: SubmitTransfers>(
    client: &mut C,
    samples: u64,
    batch_size: u64,
) -> Result<TrialStats, BenchError> {
    let mut stats = TrialStats::default();

    for (batch_start, len) in batch_plan(samples, batch_size) {
        let batch = synthetic_batch(len as usize);

        let begin = Instant::now();
        let results = client.create_transfers(&batch)?;
        stats.record(begin.elapsed());

        if results.len() != batch.len() {
            return Err(BenchError::ResultCountMismatch {
                batch_start,
                expected: batch.len(),
                actual: results.len(),
            });
        }
    }

    Ok(stats)
}

#[cfg(test)]
#[path = "trial_tests.rs"]
mod tests;
