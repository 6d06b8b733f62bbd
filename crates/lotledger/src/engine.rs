//! Snapshot-to-report pipeline.
//!
//! Composes the lower crates into the two entry points presentation code
//! calls: per-counterparty statements and the [`Report`] bundle the refresh
//! loop recomputes. Everything is a pure function of the snapshot; running
//! it twice over unchanged input yields identical output.

use lotledger_analytics::{
    dashboard, lot_summaries, top_receivables, top_sales, top_supplier_spend, unlinked_summary,
    DashboardMetrics, LotSummary, TopEntry, UnlinkedSummary,
};
use lotledger_core::{normalize, PartySelector, Snapshot};
use lotledger_statement::{build, Period, Statement};
use serde::{Deserialize, Serialize};

/// How many counterparties each top list carries.
pub const TOP_N: usize = 5;

/// Statement of a customer's account over a period.
///
/// Trades are the customer's shipments (debit = net billed amount),
/// credits are their payments, standalone or settled on delivery.
#[must_use]
pub fn customer_statement(
    snapshot: &Snapshot,
    selector: &PartySelector,
    period: Period,
) -> Statement {
    build(normalize::customer_entries(snapshot, selector), period)
}

/// Statement of a supplier's account over a period.
///
/// Trades are the supplier's purchase lots (debit = total lot cost),
/// credits are supplier-side payments.
#[must_use]
pub fn supplier_statement(
    snapshot: &Snapshot,
    selector: &PartySelector,
    period: Period,
) -> Statement {
    build(normalize::supplier_entries(snapshot, selector), period)
}

/// Everything the dashboard and recap views consume, computed in one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Global accrual metrics.
    pub dashboard: DashboardMetrics,
    /// Per-lot recaps, date ascending.
    pub lots: Vec<LotSummary>,
    /// The orphaned-shipment bucket.
    pub unlinked: UnlinkedSummary,
    /// Top customers by outstanding balance.
    pub top_receivables: Vec<TopEntry>,
    /// Top customers by billed value.
    pub top_sales: Vec<TopEntry>,
    /// Top suppliers by purchase spend.
    pub top_supplier_spend: Vec<TopEntry>,
}

impl Report {
    /// Compute the full report over a snapshot.
    #[must_use]
    pub fn compute(snapshot: &Snapshot) -> Self {
        Self {
            dashboard: dashboard(snapshot),
            lots: lot_summaries(snapshot),
            unlinked: unlinked_summary(snapshot),
            top_receivables: top_receivables(snapshot, TOP_N),
            top_sales: top_sales(snapshot, TOP_N),
            top_supplier_spend: top_supplier_spend(snapshot, TOP_N),
        }
    }
}
