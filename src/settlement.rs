//! Greedy largest-first settlement planning.
//!
//! Debtors and creditors are matched from the largest magnitude down. The
//! plan uses at most `debtors + creditors - 1` transfers, but it is a
//! heuristic and not a proven minimum.

use crate::balance::Balances;
use crate::money::Money;
use log::debug;
use serde::Serialize;

/// A suggested payment from a net debtor to a net creditor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settlement {
    pub from: String,
    pub to: String,

    /// Rounded to two decimal places, always greater than `Money::EPSILON`.
    pub amount: Money,
}

#[derive(Debug)]
struct Party<'a> {
    name: &'a str,
    remaining: Money,
}

/// Produces the transfers that bring every balance to zero.
///
/// Balances within `Money::EPSILON` of zero are treated as settled. Ties in
/// magnitude keep the balance iteration order. Residual drift smaller than
/// the epsilon is dropped.
pub fn compute_settlements(balances: &Balances) -> Vec<Settlement> {
    let mut debtors = Vec::new();
    let mut creditors = Vec::new();

    for (name, balance) in balances.iter() {
        if balance < -Money::EPSILON {
            debtors.push(Party {
                name,
                remaining: balance.abs(),
            });
        } else if balance > Money::EPSILON {
            creditors.push(Party {
                name,
                remaining: balance,
            });
        }
    }

    // `sort_by` is stable.
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut settlements = Vec::with_capacity(debtors.len() + creditors.len());
    let (mut i, mut j) = (0, 0);

    while i < debtors.len() && j < creditors.len() {
        let debtor = &mut debtors[i];
        let creditor = &mut creditors[j];

        let transfer = debtor.remaining.min(creditor.remaining);
        if transfer > Money::EPSILON {
            settlements.push(Settlement {
                from: debtor.name.to_string(),
                to: creditor.name.to_string(),
                amount: transfer.round2(),
            });
        }

        debtor.remaining -= transfer;
        creditor.remaining -= transfer;

        if debtor.remaining < Money::EPSILON {
            i += 1;
        }
        if creditor.remaining < Money::EPSILON {
            j += 1;
        }
    }

    debug!(
        "Planned {} settlement(s) for {} debtor(s) and {} creditor(s)",
        settlements.len(),
        debtors.len(),
        creditors.len()
    );

    settlements
}

/// Balances after every transfer in `settlements` has been paid.
///
/// Each `from` moves up by the amount and each `to` moves down. Names absent
/// from `balances` are skipped.
pub fn apply_settlements(balances: &Balances, settlements: &[Settlement]) -> Balances {
    let mut adjusted = balances.clone();
    for settlement in settlements {
        if let Some(balance) = adjusted.get_mut(&settlement.from) {
            *balance += settlement.amount;
        }
        if let Some(balance) = adjusted.get_mut(&settlement.to) {
            *balance -= settlement.amount;
        }
    }
    adjusted
}
