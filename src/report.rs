//! CSV report views over a ledger.
//!
//! Every monetary value is written with exactly two decimal places. Rows are
//! ordered deterministically: by name, key, or plan order for settlements.

use crate::analytics::{category_totals, debt_chain, period_totals, Analytics, Period, Totals};
use crate::error::{Result, SplitError};
use crate::ledger::Ledger;
use crate::model::{Bill, DATE_FORMAT};
use crate::money::Money;
use crate::settlement::apply_settlements;
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::str::FromStr;

/// A report the CLI can print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    /// `name,balance`
    Balances,
    /// `from,to,amount`
    #[default]
    Settlements,
    /// `name,balance` after the settlement plan is applied
    Residual,
    /// `category,total`
    Categories,
    /// `month,total`
    Months,
    /// `name,paid,owes,balance`
    People,
    /// `name,role,amount,percentage`
    Debts,
    /// `metric,value`
    Summary,
    /// `date,description,amount,category,payer,beneficiaries`, in input order
    Bills,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Balances,
        View::Settlements,
        View::Residual,
        View::Categories,
        View::Months,
        View::People,
        View::Debts,
        View::Summary,
        View::Bills,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Balances => "balances",
            View::Settlements => "settlements",
            View::Residual => "residual",
            View::Categories => "categories",
            View::Months => "months",
            View::People => "people",
            View::Debts => "debts",
            View::Summary => "summary",
            View::Bills => "bills",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = SplitError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        View::ALL
            .into_iter()
            .find(|view| view.as_str() == wanted)
            .ok_or_else(|| SplitError::UnknownView(s.to_string()))
    }
}

/// One exported bill; beneficiaries are joined with `;` as on input.
#[derive(Debug, Serialize)]
struct BillRow<'a> {
    date: String,
    description: &'a str,
    amount: Money,
    category: &'a str,
    payer: &'a str,
    beneficiaries: String,
}

impl<'a> From<&'a Bill> for BillRow<'a> {
    fn from(bill: &'a Bill) -> Self {
        BillRow {
            date: bill.date().format(DATE_FORMAT).to_string(),
            description: bill.description(),
            amount: bill.amount(),
            category: bill.category(),
            payer: bill.payer(),
            beneficiaries: bill
                .beneficiaries()
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}

/// Writes `view` for `ledger` as CSV.
pub fn write_report<W: Write>(ledger: &Ledger, view: View, writer: W) -> Result<()> {
    // Headers are written explicitly so empty reports still carry one.
    let mut csv_writer = WriterBuilder::new().has_headers(false).from_writer(writer);

    match view {
        View::Balances => {
            csv_writer.write_record(["name", "balance"])?;
            for (name, balance) in ledger.balances().iter() {
                csv_writer.write_record([name.to_string(), balance.to_string()])?;
            }
        }
        View::Settlements => {
            csv_writer.write_record(["from", "to", "amount"])?;
            for settlement in ledger.settlements() {
                csv_writer.serialize(settlement)?;
            }
        }
        View::Residual => {
            let balances = ledger.balances();
            let residual = apply_settlements(&balances, &ledger.settlements());
            csv_writer.write_record(["name", "balance"])?;
            for (name, balance) in residual.iter() {
                csv_writer.write_record([name.to_string(), balance.to_string()])?;
            }
        }
        View::Categories => {
            write_totals(
                &mut csv_writer,
                "category",
                &category_totals(ledger.bills()),
            )?;
        }
        View::Months => {
            write_totals(
                &mut csv_writer,
                "month",
                &period_totals(ledger.bills(), Period::Month),
            )?;
        }
        View::People => {
            let analytics = ledger.analytics();
            csv_writer.write_record(["name", "paid", "owes", "balance"])?;
            for (name, totals) in &analytics.participant_totals {
                csv_writer.write_record([
                    name.clone(),
                    totals.paid.to_string(),
                    totals.owes.to_string(),
                    totals.balance.to_string(),
                ])?;
            }
        }
        View::Debts => {
            csv_writer.write_record(["name", "role", "amount", "percentage"])?;
            for link in debt_chain(&ledger.balances()) {
                csv_writer.write_record([
                    link.name,
                    link.role.to_string(),
                    link.amount.to_string(),
                    format!("{:.2}", link.percentage.round_dp(2)),
                ])?;
            }
        }
        View::Summary => {
            write_summary(&mut csv_writer, &ledger.analytics())?;
        }
        View::Bills => {
            csv_writer.write_record([
                "date",
                "description",
                "amount",
                "category",
                "payer",
                "beneficiaries",
            ])?;
            for bill in ledger.bills() {
                csv_writer.serialize(BillRow::from(bill))?;
            }
        }
    }

    csv_writer.flush()?;
    Ok(())
}

fn write_totals<W: Write>(
    csv_writer: &mut csv::Writer<W>,
    label: &str,
    totals: &Totals,
) -> Result<()> {
    csv_writer.write_record([label, "total"])?;
    for (key, total) in totals {
        csv_writer.write_record([key.clone(), total.to_string()])?;
    }
    Ok(())
}

fn write_summary<W: Write>(csv_writer: &mut csv::Writer<W>, analytics: &Analytics) -> Result<()> {
    csv_writer.write_record(["metric", "value"])?;
    let rows = [
        ("total_expenses", analytics.total_expenses.to_string()),
        ("total_bills", analytics.total_bills.to_string()),
        ("total_participants", analytics.total_participants.to_string()),
        ("settlements_needed", analytics.settlements_needed.to_string()),
        (
            "efficiency",
            format!("{:.2}", analytics.efficiency.round_dp(2)),
        ),
    ];
    for (metric, value) in rows {
        csv_writer.write_record([metric.to_string(), value])?;
    }
    Ok(())
}
