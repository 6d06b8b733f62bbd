//! Same-day trade/payment alignment.
//!
//! Dates carrying entries of both kinds are displayed with the trade and its
//! same-day settlement on one line. For each date the trades and payments
//! are split into two sublists (each keeping stream order) and zipped
//! index-wise; the longer sublist determines the row count and the missing
//! side of a pair stays blank.
//!
//! This pairing is a display convention only. It has no accounting meaning,
//! and the balance math downstream is indifferent to it.

use lotledger_core::{Entry, EntryKind};

use crate::StatementRow;

/// Zip date-ordered entries into display row shells.
///
/// Input must be sorted date-ascending (as [`crate::period::partition`]
/// emits). Balances are not stamped here; see [`crate::accumulate`].
#[must_use]
pub fn merge_rows(entries: &[Entry]) -> Vec<StatementRow> {
    let mut rows = Vec::with_capacity(entries.len());

    let mut start = 0;
    while start < entries.len() {
        let date = entries[start].date;
        let mut end = start;
        while end < entries.len() && entries[end].date == date {
            end += 1;
        }
        let day = &entries[start..end];
        start = end;

        let trades: Vec<&Entry> = day.iter().filter(|e| e.kind == EntryKind::Trade).collect();
        let payments: Vec<&Entry> = day
            .iter()
            .filter(|e| e.kind == EntryKind::Payment)
            .collect();

        for i in 0..trades.len().max(payments.len()) {
            let mut row = StatementRow::blank(date);
            if let Some(trade) = trades.get(i) {
                row.absorb(trade);
            }
            if let Some(payment) = payments.get(i) {
                row.absorb(payment);
            }
            rows.push(row);
        }
    }

    rows
}
