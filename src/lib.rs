//! # Bill Splitter
//!
//! Derives who owes whom from a list of shared bills. Each bill is paid by
//! one participant and split equally among a set of beneficiaries.
//!
//! ## Design Principles
//!
//! - **Decimal arithmetic**: amounts use `rust_decimal`; nothing is rounded
//!   until display or settlement output
//! - **Pure core**: balances, settlements and analytics are recomputed from
//!   the full input on every call
//! - **One epsilon**: `Money::EPSILON` (0.01) decides what counts as settled
//! - **Deterministic output**: balances are ordered by name and independent of
//!   input order
//!
//! ## Example
//!
//! ```
//! use bill_splitter::{compute_balances, compute_settlements, Bill, Money, Participant};
//! use chrono::NaiveDate;
//!
//! let people = vec![
//!     Participant::new("1", "Alice").unwrap(),
//!     Participant::new("2", "Bob").unwrap(),
//! ];
//! let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let bills = vec![
//!     Bill::new("b1", Money::from_units(80), "Alice", ["Alice", "Bob"], "food", date).unwrap(),
//! ];
//!
//! let balances = compute_balances(&people, &bills);
//! let plan = compute_settlements(&balances);
//! assert_eq!(plan[0].from, "Bob");
//! assert_eq!(plan[0].amount, Money::from_units(40));
//! ```

pub mod analytics;
pub mod balance;
pub mod error;
pub mod ledger;
pub mod model;
pub mod money;
pub mod report;
pub mod settlement;

pub use analytics::{
    category_totals, date_range_total, debt_chain, participant_totals, period_totals,
    settlement_efficiency, Analytics, DebtLink, DebtRole, ParticipantTotals, Period, Totals,
};
pub use balance::{compute_balances, person_share, Balances};
pub use error::{Result, SplitError};
pub use ledger::Ledger;
pub use model::{Bill, BillId, BillRecord, Participant, ParticipantId, ParticipantRecord};
pub use money::Money;
pub use report::{write_report, View};
pub use settlement::{apply_settlements, compute_settlements, Settlement};
