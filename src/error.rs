//! Error types for the bill splitter.

use crate::money::Money;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// Errors that can occur while building or reporting on a ledger.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Failed to open or read an input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed input row
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Bill that cannot be split (no beneficiaries)
    #[error("Invalid bill {id}: {reason}")]
    InvalidBill { id: String, reason: String },

    /// Bill amount outside `0 < amount <= MAX_AMOUNT` or finer than cents
    #[error("Invalid amount {amount} for bill {id}: {reason}")]
    InvalidAmount {
        id: String,
        amount: Money,
        reason: String,
    },

    /// Participant name that fails validation
    #[error("Invalid participant name {name:?}: {reason}")]
    InvalidParticipant { name: String, reason: String },

    /// A participant with a case-insensitively equal name already exists
    #[error("Participant {0:?} already exists")]
    DuplicateParticipant(String),

    /// Participant ID already present in the ledger
    #[error("Duplicate participant ID {0}")]
    DuplicateParticipantId(String),

    /// Bill ID already present in the ledger
    #[error("Duplicate bill ID {0}")]
    DuplicateBill(String),

    /// No participant with this ID or name
    #[error("Unknown participant {0:?}")]
    UnknownParticipant(String),

    /// No bill with this ID
    #[error("Unknown bill {0}")]
    UnknownBill(String),

    /// Participant still owes or is owed money
    #[error("Cannot remove {name:?} with pending balance {balance}")]
    OutstandingBalance { name: String, balance: Money },

    /// Missing input file argument
    #[error("Missing input file argument. Usage: bill-splitter <participants.csv> <bills.csv> [view]")]
    MissingArgument,

    /// Report view not recognised by the CLI
    #[error("Unknown view {0:?}. Expected one of: balances, settlements, residual, categories, months, people, debts, summary, bills")]
    UnknownView(String),
}
