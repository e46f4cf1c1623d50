//! End-to-end scenarios for balances and settlement plans.
//!
//! Each scenario goes through the public library API only.

use bill_splitter::{
    apply_settlements, compute_balances, compute_settlements, Bill, Money, Participant,
    Settlement,
};
use chrono::NaiveDate;
use std::str::FromStr;

fn people(names: &[&str]) -> Vec<Participant> {
    names
        .iter()
        .enumerate()
        .map(|(i, n)| Participant::new(format!("p{}", i), n).unwrap())
        .collect()
}

fn bill(id: &str, amount: &str, payer: &str, split: &[&str]) -> Bill {
    let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
    Bill::new(id, Money::from_str(amount).unwrap(), payer, split, "general", date).unwrap()
}

fn money(s: &str) -> Money {
    Money::from_str(s).unwrap()
}

/// Settlements as sorted `(from, to, amount)` triples, ignoring plan order.
fn pairs(plan: &[Settlement]) -> Vec<(String, String, String)> {
    let mut pairs: Vec<_> = plan
        .iter()
        .map(|s| (s.from.clone(), s.to.clone(), s.amount.to_string()))
        .collect();
    pairs.sort();
    pairs
}

// ==================== DOCUMENTED SCENARIOS ====================

#[test]
fn test_one_payer_three_way_split() {
    let participants = people(&["Alice", "Bob", "Carol"]);
    let bills = vec![bill("1", "300", "Alice", &["Alice", "Bob", "Carol"])];

    let balances = compute_balances(&participants, &bills);
    assert_eq!(balances.get("Alice"), Some(money("200")));
    assert_eq!(balances.get("Bob"), Some(money("-100")));
    assert_eq!(balances.get("Carol"), Some(money("-100")));

    let plan = compute_settlements(&balances);
    assert_eq!(
        pairs(&plan),
        vec![
            ("Bob".to_string(), "Alice".to_string(), "100.00".to_string()),
            ("Carol".to_string(), "Alice".to_string(), "100.00".to_string()),
        ]
    );
}

#[test]
fn test_mutual_payments_need_no_settlement() {
    let participants = people(&["A", "B"]);
    let bills = vec![
        bill("1", "100", "A", &["A", "B"]),
        bill("2", "100", "B", &["A", "B"]),
    ];

    let balances = compute_balances(&participants, &bills);
    assert_eq!(balances.get("A"), Some(Money::ZERO));
    assert_eq!(balances.get("B"), Some(Money::ZERO));
    assert!(compute_settlements(&balances).is_empty());
}

#[test]
fn test_debt_cycle_cancels_out() {
    // A covers B, B covers C, C covers A: everyone nets to zero.
    let participants = people(&["A", "B", "C"]);
    let bills = vec![
        bill("1", "50", "B", &["A"]),
        bill("2", "50", "C", &["B"]),
        bill("3", "50", "A", &["C"]),
    ];

    let balances = compute_balances(&participants, &bills);
    assert!(balances.all_settled());
    assert!(compute_settlements(&balances).is_empty());
}

#[test]
fn test_unknown_beneficiary_share_is_not_debited() {
    let participants = people(&["Alice", "Bob"]);
    let bills = vec![bill("1", "100", "Alice", &["Alice", "Bob", "Ghost"])];

    let balances = compute_balances(&participants, &bills);
    let share = bills[0].share_per_person();

    assert_eq!(balances.get("Alice"), Some(money("100") - share));
    assert_eq!(balances.get("Bob"), Some(-share));
    assert_eq!(balances.get("Ghost"), None);
    // Ghost's share is missing, so the total is not zero.
    assert_eq!(balances.total().round2(), money("33.33"));
}

// ==================== ROUNDING AND EPSILON ====================

#[test]
fn test_uneven_split_settles_within_epsilon() {
    let participants = people(&["A", "B", "C"]);
    let bills = vec![bill("1", "100", "A", &["A", "B", "C"])];

    let balances = compute_balances(&participants, &bills);
    assert!(balances.total().is_settled());

    let plan = compute_settlements(&balances);
    assert_eq!(plan.len(), 2);
    for s in &plan {
        assert_eq!(s.amount, money("33.33"));
    }

    let residual = apply_settlements(&balances, &plan);
    assert!(residual.all_settled());
}

#[test]
fn test_cent_sized_balances_are_settled() {
    let participants = people(&["A", "B"]);
    let bills = vec![bill("1", "0.02", "A", &["A", "B"])];

    let balances = compute_balances(&participants, &bills);
    assert_eq!(balances.get("A"), Some(money("0.01")));
    assert!(compute_settlements(&balances).is_empty());
}

#[test]
fn test_every_transfer_exceeds_epsilon_and_is_rounded() {
    let participants = people(&["A", "B", "C", "D", "E"]);
    let bills = vec![
        bill("1", "99.99", "A", &["A", "B", "C"]),
        bill("2", "10.01", "B", &["C", "D", "E"]),
        bill("3", "7.77", "E", &["A", "B", "C", "D", "E"]),
        bill("4", "123.45", "D", &["A", "E"]),
    ];

    let balances = compute_balances(&participants, &bills);
    let plan = compute_settlements(&balances);

    assert!(!plan.is_empty());
    for s in &plan {
        assert!(s.amount > Money::EPSILON, "transfer too small: {:?}", s);
        assert_eq!(s.amount, s.amount.round2());
        assert_ne!(s.from, s.to);
    }
    assert!(apply_settlements(&balances, &plan).all_settled());
}

// ==================== PLAN SHAPE ====================

#[test]
fn test_plan_is_bounded_by_party_count() {
    let participants = people(&["A", "B", "C", "D", "E", "F"]);
    let bills = vec![
        bill("1", "600", "A", &["A", "B", "C", "D", "E", "F"]),
        bill("2", "90", "B", &["C", "D", "E"]),
        bill("3", "45", "F", &["A", "C"]),
    ];

    let balances = compute_balances(&participants, &bills);
    let plan = compute_settlements(&balances);
    let unsettled = balances.iter().filter(|(_, b)| !b.is_settled()).count();

    assert!(plan.len() < unsettled);
}

#[test]
fn test_repeated_calls_are_identical() {
    let participants = people(&["A", "B", "C"]);
    let bills = vec![
        bill("1", "31.40", "A", &["A", "B", "C"]),
        bill("2", "12.00", "C", &["B"]),
    ];

    let first = compute_balances(&participants, &bills);
    let second = compute_balances(&participants, &bills);
    assert_eq!(first, second);
    assert_eq!(compute_settlements(&first), compute_settlements(&second));
}

#[test]
fn test_no_participants() {
    let bills = vec![bill("1", "10", "A", &["A", "B"])];
    let balances = compute_balances(&[], &bills);
    assert!(balances.is_empty());
    assert!(compute_settlements(&balances).is_empty());
}
