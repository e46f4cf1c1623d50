//! Participant and bill value types, plus their raw CSV records.
//!
//! Both types validate on construction, so a `Bill` that reaches the
//! calculators always has a positive cent-scale amount and at least one
//! beneficiary.

use crate::error::{Result, SplitError};
use crate::money::Money;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Longest accepted participant name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Category assigned to bills that do not name one.
pub const DEFAULT_CATEGORY: &str = "general";

/// Date format used for bill dates on input and in reports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Separates names in a bill's beneficiaries column.
pub const BENEFICIARY_SEPARATOR: char = ';';

/// Opaque participant identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(pub String);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque bill identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BillId(pub String);

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A person taking part in the shared expenses.
///
/// The `name` is the join key bills use to reference participants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: ParticipantId,
    name: String,
}

impl Participant {
    /// Creates a participant, trimming the name.
    ///
    /// Fails when the trimmed name is empty, longer than [`MAX_NAME_LEN`], or
    /// contains [`BENEFICIARY_SEPARATOR`].
    pub fn new(id: impl Into<String>, name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(SplitError::InvalidParticipant {
                name: name.to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(SplitError::InvalidParticipant {
                name: name.to_string(),
                reason: format!("name must be at most {} characters", MAX_NAME_LEN),
            });
        }
        if name.contains(BENEFICIARY_SEPARATOR) {
            return Err(SplitError::InvalidParticipant {
                name: name.to_string(),
                reason: format!("name must not contain {:?}", BENEFICIARY_SEPARATOR),
            });
        }

        Ok(Participant {
            id: ParticipantId(id.into()),
            name: name.to_string(),
        })
    }

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Case-insensitive name comparison used for the uniqueness rule.
    pub fn same_name(&self, other: &str) -> bool {
        self.name.to_lowercase() == other.trim().to_lowercase()
    }
}

/// One expense paid by a single participant and shared equally.
///
/// # Invariants
///
/// - `0 < amount <= Money::MAX_AMOUNT`, with at most two decimal places
/// - `beneficiaries` is a non-empty set; the payer may or may not be in it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bill {
    id: BillId,
    amount: Money,
    payer: String,
    beneficiaries: BTreeSet<String>,
    category: String,
    date: NaiveDate,
    description: String,
}

impl Bill {
    /// Creates a validated bill.
    ///
    /// Beneficiary names are trimmed and de-duplicated; blank entries are
    /// dropped before the non-empty check.
    ///
    /// # Errors
    ///
    /// - [`SplitError::InvalidAmount`] when the amount is not positive, exceeds
    ///   [`Money::MAX_AMOUNT`], or has more than two decimal places
    /// - [`SplitError::InvalidBill`] when the payer is blank or no beneficiary
    ///   remains
    pub fn new<I, S>(
        id: impl Into<String>,
        amount: Money,
        payer: impl AsRef<str>,
        beneficiaries: I,
        category: impl AsRef<str>,
        date: NaiveDate,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let id = id.into();

        check_amount(&id, amount)?;

        let payer = payer.as_ref().trim();
        if payer.is_empty() {
            return Err(SplitError::InvalidBill {
                id,
                reason: "payer must not be empty".to_string(),
            });
        }

        let beneficiaries: BTreeSet<String> = beneficiaries
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        if beneficiaries.is_empty() {
            return Err(SplitError::InvalidBill {
                id,
                reason: "bill must be split among at least one participant".to_string(),
            });
        }

        let category = match category.as_ref().trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            c => c.to_string(),
        };

        Ok(Bill {
            id: BillId(id),
            amount,
            payer: payer.to_string(),
            beneficiaries,
            category,
            date,
            description: String::new(),
        })
    }

    /// Attaches a free-text description.
    pub fn with_description(mut self, description: impl AsRef<str>) -> Self {
        self.description = description.as_ref().trim().to_string();
        self
    }

    pub fn id(&self) -> &BillId {
        &self.id
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn payer(&self) -> &str {
        &self.payer
    }

    pub fn beneficiaries(&self) -> &BTreeSet<String> {
        &self.beneficiaries
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Equal share owed by each beneficiary, unrounded.
    pub fn share_per_person(&self) -> Money {
        // Construction guarantees at least one beneficiary.
        self.amount
            .split(self.beneficiaries.len())
            .unwrap_or(Money::ZERO)
    }

    /// Returns `true` if `name` pays or benefits from this bill.
    pub fn references(&self, name: &str) -> bool {
        self.payer == name || self.beneficiaries.contains(name)
    }
}

fn check_amount(id: &str, amount: Money) -> Result<()> {
    let reason = if !amount.is_positive() {
        "amount must be positive"
    } else if amount > Money::MAX_AMOUNT {
        "amount exceeds the maximum of 1000000.00"
    } else if amount.decimal_places() > Money::SCALE {
        "amount must have at most 2 decimal places"
    } else {
        return Ok(());
    };

    Err(SplitError::InvalidAmount {
        id: id.to_string(),
        amount,
        reason: reason.to_string(),
    })
}

/// Raw participant row: `id,name`.
#[derive(Debug, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    pub name: String,
}

impl ParticipantRecord {
    /// Converts the raw row into a validated participant.
    pub fn parse(&self) -> Result<Participant> {
        Participant::new(self.id.trim(), &self.name)
    }
}

/// Raw bill row: `id,amount,payer,beneficiaries,category,date,description`.
///
/// `beneficiaries` is a `;`-separated list of names. `category`, `date` and
/// `description` may be missing or empty.
#[derive(Debug, Deserialize)]
pub struct BillRecord {
    pub id: String,
    pub amount: String,
    pub payer: String,
    pub beneficiaries: String,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub date: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

impl BillRecord {
    /// Converts the raw row into a validated bill.
    ///
    /// A missing date falls back to `today`.
    pub fn parse(&self, row: usize, today: NaiveDate) -> Result<Bill> {
        let id = self.id.trim();
        let amount = Money::from_str(&self.amount).map_err(|e| SplitError::InvalidRecord {
            row,
            message: format!("amount {:?}: {}", self.amount.trim(), e),
        })?;

        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => today,
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
                SplitError::InvalidRecord {
                    row,
                    message: format!("date {:?}: {}", raw, e),
                }
            })?,
        };

        let bill = Bill::new(
            id,
            amount,
            &self.payer,
            self.beneficiaries.split(BENEFICIARY_SEPARATOR),
            self.category.as_deref().unwrap_or_default(),
            date,
        )?;

        Ok(match self.description.as_deref() {
            Some(description) => bill.with_description(description),
            None => bill,
        })
    }
}
