//! Caller-owned ledger state: the participant list and the bill list.
//!
//! The ledger enforces the add/remove rules and loads CSV input. Derived
//! values (balances, settlements, analytics) are recomputed from scratch on
//! every call; nothing is cached.

use crate::analytics::Analytics;
use crate::balance::{compute_balances, Balances};
use crate::error::{Result, SplitError};
use crate::model::{Bill, BillId, BillRecord, Participant, ParticipantId, ParticipantRecord};
use crate::money::Money;
use crate::settlement::{compute_settlements, Settlement};
use chrono::{Local, NaiveDate};
use csv::{ReaderBuilder, Trim};
use log::{debug, info, warn};
use std::io::Read;

/// Participants and bills for one group of people sharing expenses.
///
/// # Invariants
///
/// - Participant names are unique, compared case-insensitively
/// - Bill IDs are unique
/// - Every bill's payer and beneficiaries name a current participant
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    participants: Vec<Participant>,
    bills: Vec<Bill>,
}

impl Ledger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Ledger {
            participants: Vec::new(),
            bills: Vec::new(),
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Registers a participant.
    ///
    /// Fails with [`SplitError::DuplicateParticipantId`] if the ID is already
    /// registered, or [`SplitError::DuplicateParticipant`] if the name is
    /// already taken, ignoring case.
    pub fn add_participant(&mut self, participant: Participant) -> Result<()> {
        if self.participants.iter().any(|p| p.id() == participant.id()) {
            return Err(SplitError::DuplicateParticipantId(
                participant.id().to_string(),
            ));
        }
        if self
            .participants
            .iter()
            .any(|p| p.same_name(participant.name()))
        {
            return Err(SplitError::DuplicateParticipant(
                participant.name().to_string(),
            ));
        }

        debug!("Added participant {:?}", participant.name());
        self.participants.push(participant);
        Ok(())
    }

    /// Removes a settled participant together with every bill that
    /// references them.
    ///
    /// Fails with [`SplitError::OutstandingBalance`] unless the participant's
    /// balance is within `Money::EPSILON` of zero.
    pub fn remove_participant(&mut self, id: &ParticipantId) -> Result<Participant> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| SplitError::UnknownParticipant(id.to_string()))?;

        let name = self.participants[index].name().to_string();
        let balance = self.balances().get(&name).unwrap_or(Money::ZERO);
        if !balance.is_settled() {
            return Err(SplitError::OutstandingBalance { name, balance });
        }

        let before = self.bills.len();
        self.bills.retain(|bill| !bill.references(&name));
        debug!(
            "Removed participant {:?} and {} bill(s) referencing them",
            name,
            before - self.bills.len()
        );

        Ok(self.participants.remove(index))
    }

    /// Records a bill.
    ///
    /// The payer and every beneficiary must be current participants, and the
    /// bill ID must be new.
    pub fn add_bill(&mut self, bill: Bill) -> Result<()> {
        if self.bills.iter().any(|b| b.id() == bill.id()) {
            return Err(SplitError::DuplicateBill(bill.id().to_string()));
        }

        let unknown = std::iter::once(bill.payer())
            .chain(bill.beneficiaries().iter().map(String::as_str))
            .find(|name| !self.is_participant(name));
        if let Some(name) = unknown {
            return Err(SplitError::UnknownParticipant(name.to_string()));
        }

        debug!("Added bill {} for {}", bill.id(), bill.amount());
        self.bills.push(bill);
        Ok(())
    }

    /// Removes a bill by ID.
    pub fn remove_bill(&mut self, id: &BillId) -> Result<Bill> {
        let index = self
            .bills
            .iter()
            .position(|b| b.id() == id)
            .ok_or_else(|| SplitError::UnknownBill(id.to_string()))?;
        Ok(self.bills.remove(index))
    }

    /// Drops every participant and bill.
    pub fn clear(&mut self) {
        self.participants.clear();
        self.bills.clear();
    }

    fn is_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p.name() == name)
    }

    pub fn balances(&self) -> Balances {
        compute_balances(&self.participants, &self.bills)
    }

    pub fn settlements(&self) -> Vec<Settlement> {
        compute_settlements(&self.balances())
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.participants, &self.bills)
    }

    /// Loads participants from CSV with header `id,name`.
    ///
    /// Invalid or duplicate rows are logged at warn level and skipped.
    pub fn load_participants_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut loaded = 0;
        for (row_idx, result) in csv_reader.deserialize::<ParticipantRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let added = result
                .map_err(SplitError::from)
                .and_then(|record| record.parse())
                .and_then(|participant| self.add_participant(participant));
            match added {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Row {}: {}", row_num, e),
            }
        }

        info!("Loaded {} participant(s)", loaded);
        Ok(())
    }

    /// Loads bills from CSV with header
    /// `id,amount,payer,beneficiaries,category,date,description`.
    ///
    /// Rows with a missing date are dated today. Invalid rows, duplicate IDs
    /// and rows naming unknown participants are logged at warn level and
    /// skipped.
    pub fn load_bills_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        self.load_bills_csv_dated(reader, Local::now().date_naive())
    }

    /// Same as [`Ledger::load_bills_csv`] with an explicit fallback date.
    pub fn load_bills_csv_dated<R: Read>(&mut self, reader: R, today: NaiveDate) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut loaded = 0;
        for (row_idx, result) in csv_reader.deserialize::<BillRecord>().enumerate() {
            let row_num = row_idx + 2;

            let added = result
                .map_err(SplitError::from)
                .and_then(|record| record.parse(row_num, today))
                .and_then(|bill| self.add_bill(bill));
            match added {
                Ok(()) => loaded += 1,
                Err(e) => warn!("Row {}: {}", row_num, e),
            }
        }

        info!("Loaded {} bill(s)", loaded);
        Ok(())
    }
}
