//! Read-only reporting views over bills, balances and settlements.
//!
//! Every function here is pure and cheap enough to recompute on each request.

use crate::balance::{compute_balances, Balances};
use crate::model::{Bill, Participant};
use crate::money::Money;
use crate::settlement::{compute_settlements, Settlement};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Totals keyed by a label (category or period), ordered by key.
pub type Totals = BTreeMap<String, Money>;

/// Sum of bill amounts per category.
pub fn category_totals(bills: &[Bill]) -> Totals {
    let mut totals = Totals::new();
    for bill in bills {
        *totals.entry(bill.category().to_string()).or_default() += bill.amount();
    }
    totals
}

/// Spending summary for one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantTotals {
    /// Sum of bills this participant paid for.
    pub paid: Money,

    /// `max(0, -balance)`.
    pub owes: Money,

    pub balance: Money,
}

/// Paid and owed amounts for every known participant, keyed by name.
pub fn participant_totals(
    participants: &[Participant],
    bills: &[Bill],
    balances: &Balances,
) -> BTreeMap<String, ParticipantTotals> {
    participants
        .iter()
        .map(|p| {
            let paid = bills
                .iter()
                .filter(|b| b.payer() == p.name())
                .map(Bill::amount)
                .sum();
            let balance = balances.get(p.name()).unwrap_or(Money::ZERO);
            let owes = if balance.is_negative() {
                -balance
            } else {
                Money::ZERO
            };
            (
                p.name().to_string(),
                ParticipantTotals {
                    paid,
                    owes,
                    balance,
                },
            )
        })
        .collect()
}

/// Granularity for time-bucketed totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Day,
    #[default]
    Month,
    Year,
}

impl Period {
    /// Bucket key for `date`: `YYYY-MM-DD`, `YYYY-MM` or `YYYY`.
    pub fn key(self, date: NaiveDate) -> String {
        match self {
            Period::Day => date.format("%Y-%m-%d").to_string(),
            Period::Month => date.format("%Y-%m").to_string(),
            Period::Year => date.format("%Y").to_string(),
        }
    }
}

/// Sum of bill amounts per period bucket.
pub fn period_totals(bills: &[Bill], period: Period) -> Totals {
    let mut totals = Totals::new();
    for bill in bills {
        *totals.entry(period.key(bill.date())).or_default() += bill.amount();
    }
    totals
}

/// Sum of bill amounts dated within `start..=end`.
pub fn date_range_total(bills: &[Bill], start: NaiveDate, end: NaiveDate) -> Money {
    bills
        .iter()
        .filter(|b| b.date() >= start && b.date() <= end)
        .map(Bill::amount)
        .sum()
}

/// Display heuristic for how compact a settlement plan is.
///
/// `100 - (settlements / participants) * 20`, clamped to `[0, 100]`. This is
/// not a bound on the optimal plan. With no participants the score is 100.
pub fn settlement_efficiency(settlement_count: usize, participant_count: usize) -> Decimal {
    let hundred = Decimal::ONE_HUNDRED;
    if participant_count == 0 {
        return hundred;
    }
    let penalty =
        Decimal::from(settlement_count) / Decimal::from(participant_count) * Decimal::from(20);
    (hundred - penalty).clamp(Decimal::ZERO, hundred)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebtRole {
    Creditor,
    Debtor,
}

impl fmt::Display for DebtRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtRole::Creditor => f.write_str("creditor"),
            DebtRole::Debtor => f.write_str("debtor"),
        }
    }
}

/// One participant's position in the overall flow of debt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtLink {
    pub name: String,
    pub role: DebtRole,

    /// Magnitude of the balance.
    pub amount: Money,

    /// `amount` as a percentage of the total owed by all debtors.
    pub percentage: Decimal,
}

/// Every unsettled participant with their share of the total debt.
///
/// Creditors are measured against the same debtor total, so their
/// percentages sum to roughly 100 as well.
pub fn debt_chain(balances: &Balances) -> Vec<DebtLink> {
    let unsettled: Vec<(&str, Money)> = balances
        .iter()
        .filter(|(_, balance)| !balance.is_settled())
        .collect();

    let total_debt: Money = unsettled
        .iter()
        .filter(|(_, balance)| balance.is_negative())
        .map(|(_, balance)| balance.abs())
        .sum();

    unsettled
        .into_iter()
        .map(|(name, balance)| {
            let amount = balance.abs();
            let percentage = if total_debt.is_positive() {
                amount.as_decimal() / total_debt.as_decimal() * Decimal::ONE_HUNDRED
            } else {
                Decimal::ZERO
            };
            DebtLink {
                name: name.to_string(),
                role: if balance.is_positive() {
                    DebtRole::Creditor
                } else {
                    DebtRole::Debtor
                },
                amount,
                percentage,
            }
        })
        .collect()
}

/// Dashboard snapshot computed from one set of inputs.
#[derive(Debug, Clone)]
pub struct Analytics {
    pub total_expenses: Money,
    pub total_bills: usize,
    pub total_participants: usize,
    pub settlements_needed: usize,
    pub efficiency: Decimal,
    pub category_totals: Totals,
    pub monthly_totals: Totals,
    pub participant_totals: BTreeMap<String, ParticipantTotals>,
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
}

impl Analytics {
    /// Runs the balance calculator and settlement planner, then every view.
    pub fn compute(participants: &[Participant], bills: &[Bill]) -> Self {
        let balances = compute_balances(participants, bills);
        let settlements = compute_settlements(&balances);

        Analytics {
            total_expenses: bills.iter().map(Bill::amount).sum(),
            total_bills: bills.len(),
            total_participants: participants.len(),
            settlements_needed: settlements.len(),
            efficiency: settlement_efficiency(settlements.len(), participants.len()),
            category_totals: category_totals(bills),
            monthly_totals: period_totals(bills, Period::Month),
            participant_totals: participant_totals(participants, bills, &balances),
            balances,
            settlements,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn people(names: &[&str]) -> Vec<Participant> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| Participant::new(i.to_string(), n).unwrap())
            .collect()
    }

    fn bill(id: &str, amount: &str, payer: &str, split: &[&str], cat: &str, on: &str) -> Bill {
        Bill::new(id, Money::from_str(amount).unwrap(), payer, split, cat, date(on)).unwrap()
    }

    fn sample() -> (Vec<Participant>, Vec<Bill>) {
        (
            people(&["Alice", "Bob", "Carol"]),
            vec![
                bill("1", "300", "Alice", &["Alice", "Bob", "Carol"], "food", "2024-01-10"),
                bill("2", "60", "Bob", &["Bob", "Carol"], "transport", "2024-01-31"),
                bill("3", "45.50", "Alice", &["Carol"], "food", "2024-02-01"),
            ],
        )
    }

    #[test]
    fn test_category_totals() {
        let (_, bills) = sample();
        let totals = category_totals(&bills);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals["food"], Money::from_str("345.50").unwrap());
        assert_eq!(totals["transport"], Money::from_units(60));
    }

    #[test]
    fn test_period_totals() {
        let (_, bills) = sample();

        let months = period_totals(&bills, Period::Month);
        assert_eq!(months["2024-01"], Money::from_units(360));
        assert_eq!(months["2024-02"], Money::from_str("45.50").unwrap());

        let years = period_totals(&bills, Period::Year);
        assert_eq!(years.len(), 1);
        assert_eq!(years["2024"], Money::from_str("405.50").unwrap());

        assert_eq!(period_totals(&bills, Period::Day).len(), 3);
    }

    #[test]
    fn test_participant_totals() {
        let (participants, bills) = sample();
        let balances = compute_balances(&participants, &bills);
        let totals = participant_totals(&participants, &bills, &balances);

        let alice = &totals["Alice"];
        assert_eq!(alice.paid, Money::from_str("345.50").unwrap());
        assert_eq!(alice.owes, Money::ZERO);
        assert_eq!(alice.balance, Money::from_str("245.50").unwrap());

        let carol = &totals["Carol"];
        assert_eq!(carol.paid, Money::ZERO);
        assert_eq!(carol.owes, Money::from_str("175.50").unwrap());
    }

    #[test]
    fn test_date_range_total_is_inclusive() {
        let (_, bills) = sample();
        let total = date_range_total(&bills, date("2024-01-10"), date("2024-01-31"));
        assert_eq!(total, Money::from_units(360));
        let none = date_range_total(&bills, date("2023-01-01"), date("2023-12-31"));
        assert!(none.is_zero());
    }

    #[test]
    fn test_settlement_efficiency() {
        assert_eq!(settlement_efficiency(0, 0), Decimal::ONE_HUNDRED);
        assert_eq!(settlement_efficiency(0, 4), Decimal::ONE_HUNDRED);
        assert_eq!(settlement_efficiency(2, 4), Decimal::from(90));
        assert_eq!(settlement_efficiency(1, 3).round_dp(2), Decimal::from_str("93.33").unwrap());
        assert_eq!(settlement_efficiency(10, 1), Decimal::ZERO);
    }

    #[test]
    fn test_debt_chain() {
        let balances: Balances = [
            ("A".to_string(), Money::from_units(-75)),
            ("B".to_string(), Money::from_units(-25)),
            ("C".to_string(), Money::from_units(100)),
            ("D".to_string(), Money::ZERO),
        ]
        .into_iter()
        .collect();

        let chain = debt_chain(&balances);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain[0].role, DebtRole::Debtor);
        assert_eq!(chain[0].percentage, Decimal::from(75));
        assert_eq!(chain[1].percentage, Decimal::from(25));
        assert_eq!(chain[2].role, DebtRole::Creditor);
        assert_eq!(chain[2].percentage, Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_debt_chain_without_debt() {
        let balances: Balances = [("A".to_string(), Money::ZERO)].into_iter().collect();
        assert!(debt_chain(&balances).is_empty());
    }

    #[test]
    fn test_analytics_snapshot() {
        let (participants, bills) = sample();
        let analytics = Analytics::compute(&participants, &bills);

        assert_eq!(analytics.total_expenses, Money::from_str("405.50").unwrap());
        assert_eq!(analytics.total_bills, 3);
        assert_eq!(analytics.total_participants, 3);
        assert_eq!(analytics.settlements_needed, analytics.settlements.len());
        assert_eq!(analytics.monthly_totals.len(), 2);
        assert!(analytics.balances.total().is_settled());
    }
}
