pub mod batch;
pub mod codec;

use serde::{Deserialize, Serialize};

pub use batch::{Batch, BatchBuilder, BatchFull};

/// One transfer attempt between two accounts on a ledger.
///
/// An all-zero id is never valid; the service rejects such transfers during
/// validation, before they touch any account state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: u128,
    pub debit_account_id: u128,
    pub credit_account_id: u128,
    pub amount: u64,
    pub ledger: u32,
    pub code: u16,
}

/// Validation outcome for a single rejected transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    IdMustNotBeZero,
    DebitAccountNotFound,
    CreditAccountNotFound,
    AccountsMustBeDifferent,
    LedgerNotFound,
    AmountMustBePositive,
}

/// Per-entry outcome returned for each transfer the service refused.
/// `index` is the entry's position within the submitted batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub index: u32,
    pub reason: RejectReason,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ServiceRequest {
    /// Opens a session. Cluster 0 selects the default configuration.
    Hello { cluster: u32 },
    CreateTransfers(Vec<Transfer>),
}

#[derive(Debug, Serialize, Deserialize)]
pub enum ServiceResponse {
    HelloAck,
    /// One entry per rejected transfer, in batch order.
    TransferResults(Vec<TransferResult>),
    Error(String),
}
