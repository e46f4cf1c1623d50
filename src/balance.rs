//! Net balance per participant, derived from the full bill history.

use crate::model::{Bill, Participant};
use crate::money::Money;
use log::debug;
use std::collections::BTreeMap;

/// Signed balance per participant name.
///
/// Positive means the participant is owed money, negative means they owe.
/// Iteration is ordered by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balances(BTreeMap<String, Money>);

impl Balances {
    /// Balance for `name`, if the participant is tracked.
    pub fn get(&self, name: &str) -> Option<Money> {
        self.0.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Money)> {
        self.0.iter().map(|(name, balance)| (name.as_str(), *balance))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all balances. Zero within `Money::EPSILON` whenever every bill
    /// references only known participants.
    pub fn total(&self) -> Money {
        self.0.values().sum()
    }

    /// Returns `true` if every balance is within `Money::EPSILON` of zero.
    pub fn all_settled(&self) -> bool {
        self.0.values().all(Money::is_settled)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Money> {
        self.0.get_mut(name)
    }
}

impl FromIterator<(String, Money)> for Balances {
    fn from_iter<T: IntoIterator<Item = (String, Money)>>(iter: T) -> Self {
        Balances(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Balances {
    type Item = (&'a String, &'a Money);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Money>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Computes every known participant's net balance.
///
/// Each bill debits `amount / beneficiaries` from every beneficiary and
/// credits the full amount to the payer. Names that match no participant are
/// skipped. No rounding is applied.
///
/// Each participant's terms are summed in ascending order, so any
/// permutation of `participants` or `bills` yields an identical result.
pub fn compute_balances(participants: &[Participant], bills: &[Bill]) -> Balances {
    let mut terms: BTreeMap<&str, Vec<Money>> = participants
        .iter()
        .map(|p| (p.name(), Vec::new()))
        .collect();

    for bill in bills {
        let share = bill.share_per_person();

        for name in bill.beneficiaries() {
            match terms.get_mut(name.as_str()) {
                Some(entries) => entries.push(-share),
                None => debug!(
                    "Bill {}: ignoring unknown beneficiary {:?}",
                    bill.id(),
                    name
                ),
            }
        }

        match terms.get_mut(bill.payer()) {
            Some(entries) => entries.push(bill.amount()),
            None => debug!(
                "Bill {}: ignoring unknown payer {:?}",
                bill.id(),
                bill.payer()
            ),
        }
    }

    terms
        .into_iter()
        .map(|(name, mut entries)| {
            entries.sort_unstable();
            (name.to_string(), entries.into_iter().sum())
        })
        .collect()
}

/// What `name` owes for a single bill; zero unless they are a beneficiary.
pub fn person_share(bill: &Bill, name: &str) -> Money {
    if bill.beneficiaries().contains(name) {
        bill.share_per_person()
    } else {
        Money::ZERO
    }
}
