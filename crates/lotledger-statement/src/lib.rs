//! Statement builder for lotledger.
//!
//! Turns a normalized entry stream into a chronologically ordered,
//! balance-carrying statement:
//!
//! 1. [`period::partition`] - collapse pre-window entries into an opening
//!    balance, keep in-window entries
//! 2. [`merge::merge_rows`] - align same-day trades and payments into
//!    display rows
//! 3. [`accumulate`] - thread the running balance through the rows
//!
//! [`build`] composes all three.
//!
//! # Sign convention
//!
//! Payments are credits, trades are debits, and every balance is
//! `opening + sum(credit - debit)`. A counterparty that owes money therefore
//! carries a *negative* balance; a positive balance is a deposit held for
//! them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod merge;
pub mod period;

pub use merge::merge_rows;
pub use period::{partition, Partition, Period};

use chrono::NaiveDate;
use lotledger_core::Entry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One display row of a statement.
///
/// Produced for presentation only, never persisted. A row may carry a trade,
/// a payment, or (same-day pairing) one of each; the absent side is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRow {
    /// Row date.
    pub date: NaiveDate,
    /// Billed/purchased amount on this row.
    pub debit: Decimal,
    /// Settled amount on this row.
    pub credit: Decimal,
    /// Running balance after this row.
    pub balance: Decimal,
    /// Heads traded.
    pub quantity: u32,
    /// Weight traded, kg.
    pub weight: Decimal,
    /// Unit price applied.
    pub unit_price: Decimal,
    /// Heads lost.
    pub mortality_quantity: u32,
    /// Weight lost, kg.
    pub mortality_weight: Decimal,
    /// Mortality loss valued at sale price.
    pub mortality_value: Decimal,
    /// Unloading cost.
    pub unloading_cost: Decimal,
    /// Driver bonus.
    pub driver_bonus: Decimal,
    /// Operational cost.
    pub operational_cost: Decimal,
    /// Transport cost.
    pub transport_cost: Decimal,
    /// Free-text references of the underlying entries.
    pub reference: String,
}

impl StatementRow {
    /// An empty row shell for the given date.
    #[must_use]
    pub fn blank(date: NaiveDate) -> Self {
        Self {
            date,
            ..Self::default()
        }
    }

    /// Fold an entry's amounts and display metadata into this row.
    pub fn absorb(&mut self, entry: &Entry) {
        self.debit += entry.debit;
        self.credit += entry.credit;
        self.quantity += entry.quantity;
        self.weight += entry.weight;
        self.unit_price += entry.unit_price;
        self.mortality_quantity += entry.mortality_quantity;
        self.mortality_weight += entry.mortality_weight;
        self.mortality_value += entry.mortality_value;
        self.unloading_cost += entry.unloading_cost;
        self.driver_bonus += entry.driver_bonus;
        self.operational_cost += entry.operational_cost;
        self.transport_cost += entry.transport_cost;
        if !entry.reference.is_empty() {
            if !self.reference.is_empty() {
                self.reference.push_str("; ");
            }
            self.reference.push_str(&entry.reference);
        }
    }
}

/// A reconciled counterparty statement over one period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Balance carried in from before the period.
    pub opening_balance: Decimal,
    /// Balance after the last row; equals the opening balance when the
    /// period holds no rows.
    pub closing_balance: Decimal,
    /// Ordered, balance-stamped rows.
    pub rows: Vec<StatementRow>,
    /// Total billed/purchased over the period.
    pub total_debit: Decimal,
    /// Total settled over the period.
    pub total_credit: Decimal,
}

/// Thread the running balance through ordered row shells.
///
/// Invariant: `closing_balance == opening_balance + sum(credit - debit)`
/// over the rows.
#[must_use]
pub fn accumulate(opening_balance: Decimal, mut rows: Vec<StatementRow>) -> Statement {
    let mut balance = opening_balance;
    let mut total_debit = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for row in &mut rows {
        balance += row.credit - row.debit;
        row.balance = balance;
        total_debit += row.debit;
        total_credit += row.credit;
    }

    Statement {
        opening_balance,
        closing_balance: balance,
        rows,
        total_debit,
        total_credit,
    }
}

/// Build a full statement from normalized entries and a period.
#[must_use]
pub fn build(entries: Vec<Entry>, period: Period) -> Statement {
    let Partition {
        opening_balance,
        entries,
    } = partition(entries, period);
    accumulate(opening_balance, merge_rows(&entries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lotledger_core::EntryKind;
    use rust_decimal_macros::dec;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    fn trade(d: u32, debit: Decimal) -> Entry {
        Entry {
            kind: EntryKind::Trade,
            date: date(d),
            debit,
            ..Entry::default()
        }
    }

    fn payment(d: u32, credit: Decimal) -> Entry {
        Entry {
            kind: EntryKind::Payment,
            date: date(d),
            credit,
            ..Entry::default()
        }
    }

    #[test]
    fn test_accumulate_threads_balance() {
        let rows = merge_rows(&[trade(5, dec!(7600)), payment(6, dec!(5000))]);
        let statement = accumulate(dec!(0), rows);

        assert_eq!(statement.rows[0].balance, dec!(-7600));
        assert_eq!(statement.rows[1].balance, dec!(-2600));
        assert_eq!(statement.closing_balance, dec!(-2600));
        assert_eq!(statement.total_debit, dec!(7600));
        assert_eq!(statement.total_credit, dec!(5000));
    }

    #[test]
    fn test_accumulate_starts_from_opening() {
        let rows = merge_rows(&[payment(6, dec!(100))]);
        let statement = accumulate(dec!(-250), rows);
        assert_eq!(statement.opening_balance, dec!(-250));
        assert_eq!(statement.closing_balance, dec!(-150));
    }

    #[test]
    fn test_empty_period_closing_equals_opening() {
        let statement = accumulate(dec!(42), Vec::new());
        assert_eq!(statement.closing_balance, dec!(42));
        assert!(statement.rows.is_empty());
    }

    #[test]
    fn test_build_composes_pipeline() {
        let entries = vec![
            trade(1, dec!(1000)),  // before window -> opening
            trade(5, dec!(7600)),
            payment(6, dec!(5000)),
            payment(20, dec!(9999)), // after window -> discarded
        ];
        let statement = build(entries, Period::between(date(2), date(10)));
        assert_eq!(statement.opening_balance, dec!(-1000));
        assert_eq!(statement.rows.len(), 2);
        assert_eq!(statement.closing_balance, dec!(-3600));
    }
}
